use thiserror::Error;

use crate::alignment::alignment_tracker::TrackerError;
use crate::analysis::domain::transport_error::TransportError;
use crate::capture::domain::capture_error::CaptureError;
use crate::detection::domain::detection_error::DetectionError;

/// Everything a user action can fail with.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    #[error("no file selected")]
    NoFileSelected,
    #[error("an analysis request is already in flight")]
    SubmissionInFlight,
    /// Capture was requested while the face is not aligned.
    #[error("capture is disabled until the face is aligned")]
    CaptureDisabled,
    #[error(transparent)]
    Capture(#[from] CaptureError),
    #[error(transparent)]
    Detection(#[from] DetectionError),
    #[error(transparent)]
    Tracker(#[from] TrackerError),
    /// Submitting a user-selected file failed.
    #[error("upload failed: {0}")]
    Upload(TransportError),
    /// Submitting a webcam capture failed.
    #[error("capture upload failed: {0}")]
    CaptureUpload(TransportError),
}

impl SessionError {
    /// Text for the single message slot of the results panel.
    pub fn user_message(&self) -> String {
        match self {
            Self::NoFileSelected => "No file selected".into(),
            Self::SubmissionInFlight => "Analysis already in progress".into(),
            Self::CaptureDisabled => "Center your face to capture".into(),
            Self::Capture(CaptureError::SourceUnavailable(_)) => "Webcam not accessible".into(),
            Self::Capture(CaptureError::Decode(_)) => "Error uploading file".into(),
            Self::Capture(CaptureError::Encode(_) | CaptureError::NotActive) => {
                "Error capturing image".into()
            }
            Self::Detection(_) => "Face detection failed".into(),
            Self::Tracker(TrackerError::SourceInactive) => "Webcam not accessible".into(),
            Self::Tracker(TrackerError::AlreadyRunning) => "Face tracking already running".into(),
            Self::Upload(e) => with_reason("Error uploading file", e),
            Self::CaptureUpload(e) => with_reason("Error capturing image", e),
        }
    }
}

fn with_reason(prefix: &str, error: &TransportError) -> String {
    match error {
        TransportError::Rejected(reason) => format!("{prefix}: {reason}"),
        _ => prefix.to_string(),
    }
}
