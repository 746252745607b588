use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CaptureError {
    /// Camera access denied, no device present, or the device failed to open.
    #[error("capture source unavailable: {0}")]
    SourceUnavailable(String),
    #[error("could not decode image: {0}")]
    Decode(String),
    #[error("could not encode image: {0}")]
    Encode(String),
    #[error("no live source is active")]
    NotActive,
}
