use crate::analysis::domain::score_map::ScoreMap;
use crate::analysis::domain::transport_error::TransportError;

/// An image ready to be sent for analysis.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub mime: &'static str,
}

impl ImageUpload {
    pub fn jpeg(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
            mime: "image/jpeg",
        }
    }
}

/// Domain interface for the external scoring service.
pub trait AnalysisService: Send + Sync {
    fn submit(&self, upload: &ImageUpload) -> Result<ScoreMap, TransportError>;
}
