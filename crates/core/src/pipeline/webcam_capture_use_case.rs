use std::sync::Arc;

use crate::alignment::alignment_tracker::AlignmentTracker;
use crate::alignment::domain::display_container::DisplayContainer;
use crate::analysis::domain::analysis_service::{AnalysisService, ImageUpload};
use crate::analysis::domain::score_map::ScoreMap;
use crate::capture::capture_source_manager::CaptureSourceManager;
use crate::capture::domain::capture_error::CaptureError;
use crate::capture::domain::frame_source::LiveFeed;
use crate::capture::infrastructure::still_codec;
use crate::pipeline::session_error::SessionError;
use crate::pipeline::submission_gate::SubmissionGate;
use crate::pipeline::ui_state::{lock_ui, SharedUiState, UiAlignmentObserver};
use crate::shared::constants::CAPTURE_FILE_NAME;
use crate::shared::frame::Frame;

/// Webcam mode: live view with alignment guidance, then capture and
/// submit a still.
pub struct WebcamCaptureUseCase {
    capture: CaptureSourceManager,
    tracker: AlignmentTracker,
    service: Arc<dyn AnalysisService>,
    container: DisplayContainer,
    ui: SharedUiState,
    gate: SubmissionGate,
    jpeg_quality: u8,
    still: Option<Frame>,
}

impl WebcamCaptureUseCase {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        capture: CaptureSourceManager,
        tracker: AlignmentTracker,
        service: Arc<dyn AnalysisService>,
        container: DisplayContainer,
        ui: SharedUiState,
        gate: SubmissionGate,
        jpeg_quality: u8,
    ) -> Self {
        Self {
            capture,
            tracker,
            service,
            container,
            ui,
            gate,
            jpeg_quality,
            still: None,
        }
    }

    /// Opens the camera and starts alignment tracking. If the camera
    /// cannot be opened the error is shown and tracking is not started.
    pub fn start(&mut self) -> Result<(), SessionError> {
        let feed = match self.capture.start_live_source() {
            Ok(feed) => feed,
            Err(e) => return Err(self.report(SessionError::from(e))),
        };
        self.still = None;
        lock_ui(&self.ui).reset_webcam_view();
        self.start_tracking(feed)
    }

    /// Freezes the current frame and submits it as `capture.jpg`.
    ///
    /// Refused with [`SessionError::CaptureDisabled`] while the capture
    /// action is disabled; the view is left as it is. Tracking stops first, so capture is disabled for the whole
    /// submission. On success the recapture action replaces capture; on
    /// failure the live view comes back with capture enabled.
    pub fn capture(&mut self) -> Result<ScoreMap, SessionError> {
        let Some(_ticket) = self.gate.try_begin() else {
            log::warn!("Ignoring capture while another request is in flight");
            return Err(SessionError::SubmissionInFlight);
        };
        if !lock_ui(&self.ui).capture_enabled {
            log::debug!("Ignoring capture while the face is not aligned");
            return Err(SessionError::CaptureDisabled);
        }

        self.tracker.stop();
        let Some(frame) = self.capture.capture_still() else {
            return Err(self.revert_to_live(SessionError::from(CaptureError::NotActive)));
        };
        log::info!(
            "Captured frame {} ({}x{})",
            frame.index(),
            frame.width(),
            frame.height()
        );

        {
            let mut ui = lock_ui(&self.ui);
            ui.live_view_visible = false;
            ui.still_visible = true;
            ui.capture_enabled = false;
            ui.show_loading();
        }

        let result = still_codec::encode_jpeg(&frame, self.jpeg_quality)
            .map_err(SessionError::from)
            .and_then(|bytes| {
                self.service
                    .submit(&ImageUpload::jpeg(CAPTURE_FILE_NAME, bytes))
                    .map_err(SessionError::CaptureUpload)
            });
        self.still = Some(frame);

        match result {
            Ok(scores) => {
                let mut ui = lock_ui(&self.ui);
                ui.show_scores(&scores);
                ui.capture_visible = false;
                ui.recapture_visible = true;
                Ok(scores)
            }
            Err(error) => Err(self.revert_to_live(error)),
        }
    }

    /// Drops the frozen still and resumes live tracking.
    pub fn recapture(&mut self) -> Result<(), SessionError> {
        self.still = None;
        lock_ui(&self.ui).reset_webcam_view();
        let feed = match self.capture.feed().filter(|_| self.capture.is_live()) {
            Some(feed) => feed,
            None => match self.capture.start_live_source() {
                Ok(feed) => feed,
                Err(e) => return Err(self.report(SessionError::from(e))),
            },
        };
        self.start_tracking(feed)
    }

    /// Stops tracking and releases the camera. Idempotent.
    pub fn stop(&mut self) {
        self.tracker.stop();
        self.capture.stop_live_source();
        self.still = None;
        lock_ui(&self.ui).reset_webcam_view();
    }

    pub fn is_live(&self) -> bool {
        self.capture.is_live()
    }

    pub fn is_tracking(&self) -> bool {
        self.tracker.is_running()
    }

    pub fn still(&self) -> Option<&Frame> {
        self.still.as_ref()
    }

    /// Handle for reporting on-screen size changes of the live view.
    pub fn container(&self) -> DisplayContainer {
        self.container.clone()
    }

    fn start_tracking(&mut self, feed: Arc<LiveFeed>) -> Result<(), SessionError> {
        if self.tracker.is_running() {
            return Ok(());
        }
        let observer = Box::new(UiAlignmentObserver::new(self.ui.clone()));
        self.tracker
            .start(feed, self.container.clone(), observer)
            .map_err(|e| self.report(SessionError::from(e)))
    }

    fn revert_to_live(&mut self, error: SessionError) -> SessionError {
        log::warn!("Capture failed: {error}");
        self.still = None;
        let mut ui = lock_ui(&self.ui);
        ui.still_visible = false;
        ui.live_view_visible = true;
        ui.capture_enabled = true;
        ui.show_error(error.user_message());
        error
    }

    fn report(&self, error: SessionError) -> SessionError {
        log::warn!("{error}");
        lock_ui(&self.ui).show_error(error.user_message());
        error
    }
}
