use std::time::Duration;

/// Resolution requested from the camera.
pub const CAMERA_WIDTH: u32 = 640;
pub const CAMERA_HEIGHT: u32 = 480;

/// Max distance, in container pixels, between the mapped face center and
/// the container center for the face to count as aligned.
pub const ALIGNMENT_RADIUS: f64 = 60.0;

/// Tracker tick, roughly one display refresh at 60 Hz.
pub const TRACKER_TICK_INTERVAL: Duration = Duration::from_millis(16);

pub const DEFAULT_ENDPOINT: &str = "http://localhost:8080";
pub const UPLOAD_PATH: &str = "/upload";
pub const UPLOAD_FIELD: &str = "file";
pub const CAPTURE_FILE_NAME: &str = "capture.jpg";
pub const JPEG_QUALITY: u8 = 92;

/// Extensions the analysis endpoint accepts as-is.
pub const UPLOAD_EXTENSIONS: &[&str] = &["jpg", "jpeg"];

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif", "webp"];

pub const BLAZEFACE_MODEL_NAME: &str = "blazeface_128.onnx";

/// Minimum face score kept by the detector.
pub const DETECTOR_CONFIDENCE: f64 = 0.75;

/// Placeholder text shown before any analysis has run.
pub const NO_ANALYSIS_TEXT: &str = "No analysis yet.";
