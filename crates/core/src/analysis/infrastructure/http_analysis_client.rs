use std::time::Duration;

use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::Client;

use crate::analysis::domain::analysis_service::{AnalysisService, ImageUpload};
use crate::analysis::domain::score_map::ScoreMap;
use crate::analysis::domain::transport_error::TransportError;
use crate::shared::constants::{UPLOAD_FIELD, UPLOAD_PATH};

/// Posts images as `multipart/form-data` to `<endpoint>/upload`.
pub struct HttpAnalysisClient {
    client: Client,
    url: String,
}

impl HttpAnalysisClient {
    pub fn new(endpoint: &str, timeout: Option<Duration>) -> Result<Self, TransportError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| TransportError::Request(e.to_string()))?;
        Ok(Self {
            client,
            url: format!("{}{}", endpoint.trim_end_matches('/'), UPLOAD_PATH),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl AnalysisService for HttpAnalysisClient {
    fn submit(&self, upload: &ImageUpload) -> Result<ScoreMap, TransportError> {
        let part = Part::bytes(upload.bytes.clone())
            .file_name(upload.file_name.clone())
            .mime_str(upload.mime)
            .map_err(|e| TransportError::Request(e.to_string()))?;
        let form = Form::new().part(UPLOAD_FIELD, part);

        log::info!(
            "Submitting {} ({} bytes) to {}",
            upload.file_name,
            upload.bytes.len(),
            self.url
        );
        let response = self
            .client
            .post(&self.url)
            .multipart(form)
            .send()
            .map_err(|e| TransportError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }

        let body: serde_json::Value = response
            .json()
            .map_err(|e| TransportError::InvalidResponse(e.to_string()))?;
        let scores = ScoreMap::from_json(&body)?;
        log::debug!("Received {} scores", scores.len());
        Ok(scores)
    }
}
