pub mod blazeface_loader;
pub mod onnx_blazeface_detector;
