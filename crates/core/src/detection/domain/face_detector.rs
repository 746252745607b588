use crate::detection::domain::detected_face::DetectedFace;
use crate::detection::domain::detection_error::DetectionError;
use crate::shared::frame::Frame;

/// Domain interface for face detection.
///
/// Returns faces in detector order; callers that only want one face take
/// the first. Implementations may keep per-session state, hence
/// `&mut self`.
pub trait FaceDetector: Send {
    fn estimate_faces(&mut self, frame: &Frame) -> Result<Vec<DetectedFace>, DetectionError>;
}

/// Produces a ready detector. Loading may be slow (model resolution,
/// session creation), so trackers call it from their worker thread.
pub trait FaceModelLoader: Send + Sync {
    fn load(&self) -> Result<Box<dyn FaceDetector>, DetectionError>;
}
