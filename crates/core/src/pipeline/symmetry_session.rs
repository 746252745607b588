use std::path::Path;
use std::sync::Arc;

use crate::alignment::alignment_tracker::AlignmentTracker;
use crate::alignment::domain::alignment_evaluator::AlignmentEvaluator;
use crate::alignment::domain::display_container::DisplayContainer;
use crate::analysis::domain::analysis_service::AnalysisService;
use crate::analysis::domain::score_map::ScoreMap;
use crate::capture::capture_source_manager::CaptureSourceManager;
use crate::capture::domain::camera_device::{CameraDevice, Resolution};
use crate::detection::domain::face_detector::FaceModelLoader;
use crate::pipeline::session_error::SessionError;
use crate::pipeline::submission_gate::SubmissionGate;
use crate::pipeline::ui_state::{lock_ui, shared_ui, Mode, PreviewState, SharedUiState, UiState};
use crate::pipeline::upload_image_use_case::UploadImageUseCase;
use crate::pipeline::webcam_capture_use_case::WebcamCaptureUseCase;
use crate::shared::config::SessionConfig;

/// Page controller: owns both input modes and the shared UI state.
pub struct SymmetrySession {
    ui: SharedUiState,
    upload: UploadImageUseCase,
    webcam: WebcamCaptureUseCase,
}

impl SymmetrySession {
    pub fn new(
        config: &SessionConfig,
        camera: Box<dyn CameraDevice>,
        loader: Arc<dyn FaceModelLoader>,
        service: Arc<dyn AnalysisService>,
    ) -> Self {
        let ui = shared_ui();
        let gate = SubmissionGate::new();

        let evaluator = AlignmentEvaluator::new(config.alignment_radius).with_fit(config.fit);
        let tracker = AlignmentTracker::new(loader, evaluator, config.tick_interval);
        let capture = CaptureSourceManager::new(
            camera,
            Resolution::new(config.camera_width, config.camera_height),
        );

        let upload = UploadImageUseCase::new(
            service.clone(),
            ui.clone(),
            gate.clone(),
            config.jpeg_quality,
        );
        let webcam = WebcamCaptureUseCase::new(
            capture,
            tracker,
            service,
            DisplayContainer::new(config.container_size()),
            ui.clone(),
            gate,
            config.jpeg_quality,
        );

        Self { ui, upload, webcam }
    }

    /// Switches input mode. Leaving webcam mode releases the camera;
    /// entering it starts the camera and alignment tracking.
    pub fn select_mode(&mut self, mode: Mode) -> Result<(), SessionError> {
        {
            let mut ui = lock_ui(&self.ui);
            ui.mode = mode;
            ui.preview = PreviewState::Hidden;
            ui.file_controls_visible = mode == Mode::File;
            ui.webcam_controls_visible = mode == Mode::Webcam;
        }
        log::info!("Mode: {mode:?}");

        match mode {
            Mode::File => {
                self.webcam.stop();
                lock_ui(&self.ui).clear_results();
                Ok(())
            }
            Mode::Webcam => self.webcam.start(),
        }
    }

    pub fn select_file(&self, name: &str, bytes: Vec<u8>) -> Result<(), SessionError> {
        self.upload.select_file(name, bytes)
    }

    pub fn select_path(&self, path: &Path) -> Result<(), SessionError> {
        self.upload.select_path(path)
    }

    pub fn upload(&self) -> Result<ScoreMap, SessionError> {
        self.upload.upload()
    }

    pub fn capture(&mut self) -> Result<ScoreMap, SessionError> {
        self.webcam.capture()
    }

    pub fn recapture(&mut self) -> Result<(), SessionError> {
        self.webcam.recapture()
    }

    pub fn stop_webcam(&mut self) {
        self.webcam.stop();
    }

    pub fn webcam(&self) -> &WebcamCaptureUseCase {
        &self.webcam
    }

    pub fn ui(&self) -> SharedUiState {
        self.ui.clone()
    }

    pub fn snapshot(&self) -> UiState {
        lock_ui(&self.ui).clone()
    }
}
