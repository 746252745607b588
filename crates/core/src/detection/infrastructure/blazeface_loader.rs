use std::path::PathBuf;

use crate::detection::domain::detection_error::DetectionError;
use crate::detection::domain::face_detector::{FaceDetector, FaceModelLoader};
use crate::detection::infrastructure::onnx_blazeface_detector::OnnxBlazefaceDetector;
use crate::shared::constants::BLAZEFACE_MODEL_NAME;
use crate::shared::model_resolver::{self, ModelLocation};

/// Resolves the BlazeFace model file and builds a detector session.
///
/// Only local locations are searched; downloading is left to the front
/// end so it can report progress before tracking starts.
pub struct BlazefaceLoader {
    explicit_path: Option<PathBuf>,
    bundled_dir: Option<PathBuf>,
    confidence: f64,
}

impl BlazefaceLoader {
    pub fn new(confidence: f64) -> Self {
        Self {
            explicit_path: None,
            bundled_dir: None,
            confidence,
        }
    }

    pub fn with_model_path(mut self, path: Option<PathBuf>) -> Self {
        self.explicit_path = path;
        self
    }

    pub fn with_bundled_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.bundled_dir = dir;
        self
    }
}

impl FaceModelLoader for BlazefaceLoader {
    fn load(&self) -> Result<Box<dyn FaceDetector>, DetectionError> {
        let location = ModelLocation {
            name: BLAZEFACE_MODEL_NAME,
            explicit: self.explicit_path.as_deref(),
            bundled_dir: self.bundled_dir.as_deref(),
            url: None,
        };
        let path = model_resolver::resolve(&location, None)
            .map_err(|e| DetectionError::ModelLoad(e.to_string()))?;

        log::info!("Loading face model from {}", path.display());
        let detector = OnnxBlazefaceDetector::new(&path, self.confidence)
            .map_err(|e| DetectionError::ModelLoad(e.to_string()))?;
        Ok(Box::new(detector))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_explicit_model_is_load_error() {
        let loader = BlazefaceLoader::new(0.75)
            .with_model_path(Some(PathBuf::from("/nonexistent/blazeface.onnx")));
        let result = loader.load();
        assert!(matches!(result, Err(DetectionError::ModelLoad(_))));
    }

    #[test]
    fn test_corrupt_model_is_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blazeface.onnx");
        std::fs::write(&path, b"not an onnx graph").unwrap();

        let loader = BlazefaceLoader::new(0.75).with_model_path(Some(path));
        assert!(matches!(loader.load(), Err(DetectionError::ModelLoad(_))));
    }
}
