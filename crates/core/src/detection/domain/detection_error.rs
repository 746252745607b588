use thiserror::Error;

/// Failure of the face-detection capability. Terminal for a tracking
/// session.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DetectionError {
    #[error("failed to load face model: {0}")]
    ModelLoad(String),
    #[error("face detection failed: {0}")]
    Inference(String),
}
