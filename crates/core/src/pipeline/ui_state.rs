use std::sync::{Arc, Mutex, MutexGuard};

use crate::alignment::domain::alignment_evaluator::AlignmentReading;
use crate::alignment::domain::alignment_observer::AlignmentObserver;
use crate::alignment::domain::alignment_state::AlignmentState;
use crate::analysis::domain::score_map::ScoreMap;
use crate::detection::domain::detection_error::DetectionError;
use crate::pipeline::session_error::SessionError;
use crate::presentation::score_bar::ScoreBar;
use crate::presentation::text_renderer::{render_scores, DEFAULT_BAR_WIDTH};
use crate::shared::constants::NO_ANALYSIS_TEXT;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    File,
    Webcam,
}

/// Visibility of the analyzed-image preview.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PreviewState {
    #[default]
    Hidden,
    /// A file was picked but not yet submitted.
    Shown,
    /// The previewed image is the one being (or last) analyzed.
    Active,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum ResultsPanel {
    #[default]
    Idle,
    Loading,
    Scores(Vec<ScoreBar>),
    Error(String),
}

/// Everything a front end needs to draw the page.
///
/// Use cases mutate it; renderers only read it.
#[derive(Clone, Debug, PartialEq)]
pub struct UiState {
    pub mode: Mode,
    pub file_controls_visible: bool,
    pub webcam_controls_visible: bool,
    pub preview: PreviewState,
    pub selected_file: Option<String>,
    pub live_view_visible: bool,
    pub still_visible: bool,
    pub capture_visible: bool,
    pub capture_enabled: bool,
    pub recapture_visible: bool,
    pub misaligned: bool,
    pub results: ResultsPanel,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            mode: Mode::File,
            file_controls_visible: true,
            webcam_controls_visible: false,
            preview: PreviewState::Hidden,
            selected_file: None,
            live_view_visible: true,
            still_visible: false,
            capture_visible: true,
            capture_enabled: false,
            recapture_visible: false,
            misaligned: true,
            results: ResultsPanel::Idle,
        }
    }
}

impl UiState {
    /// Live view shown, still hidden, capture visible but disabled until
    /// the face is aligned.
    pub fn reset_webcam_view(&mut self) {
        self.live_view_visible = true;
        self.still_visible = false;
        self.capture_visible = true;
        self.recapture_visible = false;
        self.capture_enabled = false;
    }

    pub fn set_alignment(&mut self, state: AlignmentState) {
        self.misaligned = !state.is_aligned();
        self.capture_enabled = state.is_aligned();
    }

    pub fn show_loading(&mut self) {
        self.results = ResultsPanel::Loading;
    }

    pub fn show_scores(&mut self, scores: &ScoreMap) {
        self.results = ResultsPanel::Scores(ScoreBar::from_scores(scores));
    }

    pub fn show_error(&mut self, message: impl Into<String>) {
        self.results = ResultsPanel::Error(message.into());
    }

    pub fn clear_results(&mut self) {
        self.results = ResultsPanel::Idle;
    }

    pub fn results_text(&self) -> String {
        match &self.results {
            ResultsPanel::Idle => NO_ANALYSIS_TEXT.to_string(),
            ResultsPanel::Loading => "Analyzing...".to_string(),
            ResultsPanel::Scores(bars) => render_scores(bars, DEFAULT_BAR_WIDTH),
            ResultsPanel::Error(message) => message.clone(),
        }
    }
}

pub type SharedUiState = Arc<Mutex<UiState>>;

pub fn shared_ui() -> SharedUiState {
    Arc::new(Mutex::new(UiState::default()))
}

pub fn lock_ui(ui: &SharedUiState) -> MutexGuard<'_, UiState> {
    ui.lock().unwrap_or_else(|e| e.into_inner())
}

/// Routes tracker output into the page state: the misalignment
/// indicator, the capture button and the error slot.
pub struct UiAlignmentObserver {
    ui: SharedUiState,
}

impl UiAlignmentObserver {
    pub fn new(ui: SharedUiState) -> Self {
        Self { ui }
    }
}

impl AlignmentObserver for UiAlignmentObserver {
    fn on_aligned(&mut self, _reading: &AlignmentReading) {
        lock_ui(&self.ui).set_alignment(AlignmentState::Aligned);
    }

    fn on_misaligned(&mut self, _reading: &AlignmentReading) {
        lock_ui(&self.ui).set_alignment(AlignmentState::Misaligned);
    }

    fn on_error(&mut self, error: &DetectionError) {
        let message = SessionError::Detection(error.clone()).user_message();
        lock_ui(&self.ui).show_error(message);
    }
}
