use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransportError {
    /// Connection, timeout or other failure before a response arrived.
    #[error("request failed: {0}")]
    Request(String),
    #[error("server responded with status {0}")]
    Status(u16),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    /// The service answered but refused to score the image.
    #[error("analysis rejected: {0}")]
    Rejected(String),
}
