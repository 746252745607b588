use std::path::PathBuf;
use std::time::Duration;

use crate::alignment::domain::viewport_mapping::FitMode;
use crate::shared::constants::{
    ALIGNMENT_RADIUS, CAMERA_HEIGHT, CAMERA_WIDTH, DEFAULT_ENDPOINT, DETECTOR_CONFIDENCE,
    JPEG_QUALITY, TRACKER_TICK_INTERVAL,
};
use crate::shared::geometry::Size;

/// Runtime knobs for a capture/analysis session.
///
/// Defaults come from [`crate::shared::constants`]; front ends override
/// individual fields from their own flags.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionConfig {
    pub endpoint: String,
    pub camera_width: u32,
    pub camera_height: u32,
    pub alignment_radius: f64,
    /// On-screen size of the live view. `None` means "same as the frame".
    pub container: Option<Size>,
    /// How the frame is scaled into the container.
    pub fit: FitMode,
    pub tick_interval: Duration,
    pub jpeg_quality: u8,
    /// Request timeout for submissions. `None` keeps the client default.
    pub request_timeout: Option<Duration>,
    pub detector_confidence: f64,
    pub model_path: Option<PathBuf>,
    pub model_url: Option<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            camera_width: CAMERA_WIDTH,
            camera_height: CAMERA_HEIGHT,
            alignment_radius: ALIGNMENT_RADIUS,
            container: None,
            fit: FitMode::Cover,
            tick_interval: TRACKER_TICK_INTERVAL,
            jpeg_quality: JPEG_QUALITY,
            request_timeout: None,
            detector_confidence: DETECTOR_CONFIDENCE,
            model_path: None,
            model_url: None,
        }
    }
}

impl SessionConfig {
    /// Container size to use for the live view.
    pub fn container_size(&self) -> Size {
        self.container.unwrap_or(Size::from((self.camera_width, self.camera_height)))
    }
}
