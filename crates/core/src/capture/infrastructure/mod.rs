pub mod image_sequence_camera;
#[cfg(feature = "camera")]
pub mod nokhwa_camera;
pub mod still_codec;
