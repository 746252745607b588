use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::analysis::domain::analysis_service::{AnalysisService, ImageUpload};
use crate::analysis::domain::score_map::ScoreMap;
use crate::capture::domain::capture_error::CaptureError;
use crate::capture::infrastructure::still_codec;
use crate::pipeline::session_error::SessionError;
use crate::pipeline::submission_gate::SubmissionGate;
use crate::pipeline::ui_state::{lock_ui, PreviewState, SharedUiState};
use crate::shared::frame::Frame;

struct SelectedFile {
    name: String,
    bytes: Vec<u8>,
    preview: Frame,
}

/// File mode: pick an image, preview it, submit it for analysis.
pub struct UploadImageUseCase {
    service: Arc<dyn AnalysisService>,
    ui: SharedUiState,
    gate: SubmissionGate,
    jpeg_quality: u8,
    selected: Mutex<Option<SelectedFile>>,
}

impl UploadImageUseCase {
    pub fn new(
        service: Arc<dyn AnalysisService>,
        ui: SharedUiState,
        gate: SubmissionGate,
        jpeg_quality: u8,
    ) -> Self {
        Self {
            service,
            ui,
            gate,
            jpeg_quality,
            selected: Mutex::new(None),
        }
    }

    /// Decodes the chosen image and shows it as the preview.
    pub fn select_file(&self, name: &str, bytes: Vec<u8>) -> Result<(), SessionError> {
        let preview = match still_codec::decode(&bytes) {
            Ok(frame) => frame,
            Err(e) => {
                let error = SessionError::from(e);
                let mut ui = lock_ui(&self.ui);
                ui.preview = PreviewState::Hidden;
                ui.selected_file = None;
                ui.show_error(error.user_message());
                *self.lock_selected() = None;
                return Err(error);
            }
        };
        log::info!(
            "Selected {name} ({}x{})",
            preview.width(),
            preview.height()
        );

        {
            let mut ui = lock_ui(&self.ui);
            ui.preview = PreviewState::Shown;
            ui.selected_file = Some(name.to_string());
        }
        *self.lock_selected() = Some(SelectedFile {
            name: name.to_string(),
            bytes,
            preview,
        });
        Ok(())
    }

    pub fn select_path(&self, path: &Path) -> Result<(), SessionError> {
        let bytes = std::fs::read(path)
            .map_err(|e| CaptureError::Decode(format!("{}: {e}", path.display())))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.select_file(&name, bytes)
    }

    pub fn clear_selection(&self) {
        *self.lock_selected() = None;
        let mut ui = lock_ui(&self.ui);
        ui.selected_file = None;
        ui.preview = PreviewState::Hidden;
    }

    /// Submits the selected image and renders the returned scores.
    ///
    /// On failure the preview is hidden and the error shown; the
    /// selection is kept so the user can retry.
    pub fn upload(&self) -> Result<ScoreMap, SessionError> {
        let Some(upload) = self.prepare_upload() else {
            let error = SessionError::NoFileSelected;
            lock_ui(&self.ui).show_error(error.user_message());
            return Err(error);
        };
        let Some(_ticket) = self.gate.try_begin() else {
            log::warn!("Ignoring upload while another request is in flight");
            return Err(SessionError::SubmissionInFlight);
        };

        {
            let mut ui = lock_ui(&self.ui);
            ui.preview = PreviewState::Active;
            ui.show_loading();
        }

        let result = upload
            .map_err(SessionError::from)
            .and_then(|upload| self.service.submit(&upload).map_err(SessionError::Upload));

        let mut ui = lock_ui(&self.ui);
        match result {
            Ok(scores) => {
                ui.show_scores(&scores);
                Ok(scores)
            }
            Err(error) => {
                log::warn!("Upload failed: {error}");
                ui.preview = PreviewState::Hidden;
                ui.show_error(error.user_message());
                Err(error)
            }
        }
    }

    /// `None` when nothing is selected. Non-JPEG selections are
    /// re-encoded from the decoded preview.
    fn prepare_upload(&self) -> Option<Result<ImageUpload, CaptureError>> {
        let selected = self.lock_selected();
        let file = selected.as_ref()?;
        if still_codec::has_upload_extension(&file.name) {
            return Some(Ok(ImageUpload::jpeg(file.name.clone(), file.bytes.clone())));
        }
        let name = still_codec::jpeg_file_name(&file.name);
        log::debug!("Re-encoding {} as {name}", file.name);
        Some(
            still_codec::encode_jpeg(&file.preview, self.jpeg_quality)
                .map(|bytes| ImageUpload::jpeg(name, bytes)),
        )
    }

    fn lock_selected(&self) -> MutexGuard<'_, Option<SelectedFile>> {
        self.selected.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::domain::transport_error::TransportError;
    use crate::pipeline::ui_state::{shared_ui, ResultsPanel};
    use crossbeam_channel::{Receiver, Sender};
    use std::io::Cursor;
    use std::time::Duration;

    struct RecordingService {
        result: Result<ScoreMap, TransportError>,
        uploads: Mutex<Vec<ImageUpload>>,
    }

    impl RecordingService {
        fn new(result: Result<ScoreMap, TransportError>) -> Arc<Self> {
            Arc::new(Self {
                result,
                uploads: Mutex::new(Vec::new()),
            })
        }
    }

    impl AnalysisService for RecordingService {
        fn submit(&self, upload: &ImageUpload) -> Result<ScoreMap, TransportError> {
            self.uploads.lock().unwrap().push(upload.clone());
            self.result.clone()
        }
    }

    /// Blocks inside `submit` until released.
    struct BlockingService {
        entered: Sender<()>,
        release: Receiver<()>,
    }

    impl AnalysisService for BlockingService {
        fn submit(&self, _upload: &ImageUpload) -> Result<ScoreMap, TransportError> {
            self.entered.send(()).unwrap();
            self.release.recv().unwrap();
            Ok(ScoreMap::default())
        }
    }

    fn encoded(format: image::ImageFormat) -> Vec<u8> {
        let img = image::RgbImage::from_pixel(16, 12, image::Rgb([120, 80, 40]));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), format).unwrap();
        bytes
    }

    fn scores() -> ScoreMap {
        ScoreMap::new(vec![("eyes".into(), 97.0), ("jaw".into(), 81.0)])
    }

    fn use_case(service: Arc<dyn AnalysisService>) -> (UploadImageUseCase, SharedUiState) {
        let ui = shared_ui();
        (
            UploadImageUseCase::new(service, ui.clone(), SubmissionGate::new(), 90),
            ui,
        )
    }

    #[test]
    fn test_upload_without_selection() {
        let service = RecordingService::new(Ok(scores()));
        let (uc, ui) = use_case(service.clone());

        assert_eq!(uc.upload(), Err(SessionError::NoFileSelected));
        assert_eq!(
            lock_ui(&ui).results,
            ResultsPanel::Error("No file selected".into())
        );
        assert!(service.uploads.lock().unwrap().is_empty());
    }

    #[test]
    fn test_select_shows_preview() {
        let (uc, ui) = use_case(RecordingService::new(Ok(scores())));
        uc.select_file("me.jpg", encoded(image::ImageFormat::Jpeg))
            .unwrap();

        let ui = lock_ui(&ui);
        assert_eq!(ui.preview, PreviewState::Shown);
        assert_eq!(ui.selected_file.as_deref(), Some("me.jpg"));
    }

    #[test]
    fn test_select_malformed_file() {
        let (uc, ui) = use_case(RecordingService::new(Ok(scores())));
        let result = uc.select_file("broken.jpg", b"garbage".to_vec());

        assert!(matches!(result, Err(SessionError::Capture(_))));
        assert_eq!(lock_ui(&ui).preview, PreviewState::Hidden);
        assert_eq!(uc.upload(), Err(SessionError::NoFileSelected));
    }

    #[test]
    fn test_jpeg_sent_unchanged() {
        let service = RecordingService::new(Ok(scores()));
        let (uc, ui) = use_case(service.clone());
        let bytes = encoded(image::ImageFormat::Jpeg);
        uc.select_file("me.jpeg", bytes.clone()).unwrap();

        let result = uc.upload().unwrap();

        assert_eq!(result, scores());
        let uploads = service.uploads.lock().unwrap();
        assert_eq!(uploads[0].file_name, "me.jpeg");
        assert_eq!(uploads[0].bytes, bytes);
        let ui = lock_ui(&ui);
        assert_eq!(ui.preview, PreviewState::Active);
        assert!(matches!(&ui.results, ResultsPanel::Scores(bars) if bars.len() == 2));
    }

    #[test]
    fn test_png_is_reencoded() {
        let service = RecordingService::new(Ok(scores()));
        let (uc, _ui) = use_case(service.clone());
        uc.select_file("me.png", encoded(image::ImageFormat::Png))
            .unwrap();

        uc.upload().unwrap();

        let uploads = service.uploads.lock().unwrap();
        assert_eq!(uploads[0].file_name, "me.jpg");
        assert_eq!(uploads[0].mime, "image/jpeg");
        assert_eq!(&uploads[0].bytes[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_rejected_upload_hides_preview() {
        let service = RecordingService::new(Err(TransportError::Status(500)));
        let (uc, ui) = use_case(service);
        uc.select_file("me.jpg", encoded(image::ImageFormat::Jpeg))
            .unwrap();

        let result = uc.upload();

        assert_eq!(
            result,
            Err(SessionError::Upload(TransportError::Status(500)))
        );
        let ui = lock_ui(&ui);
        assert_eq!(ui.preview, PreviewState::Hidden);
        assert_eq!(ui.results, ResultsPanel::Error("Error uploading file".into()));
    }

    #[test]
    fn test_retry_after_failure_keeps_selection() {
        let service = RecordingService::new(Err(TransportError::Request("refused".into())));
        let (uc, _ui) = use_case(service.clone());
        uc.select_file("me.jpg", encoded(image::ImageFormat::Jpeg))
            .unwrap();

        assert!(uc.upload().is_err());
        assert!(uc.upload().is_err());
        assert_eq!(service.uploads.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_concurrent_upload_is_refused() {
        let (entered_tx, entered_rx) = crossbeam_channel::bounded(1);
        let (release_tx, release_rx) = crossbeam_channel::bounded(1);
        let service = Arc::new(BlockingService {
            entered: entered_tx,
            release: release_rx,
        });
        let (uc, _ui) = use_case(service);
        uc.select_file("me.jpg", encoded(image::ImageFormat::Jpeg))
            .unwrap();
        let uc = Arc::new(uc);

        let first = {
            let uc = uc.clone();
            std::thread::spawn(move || uc.upload())
        };
        entered_rx.recv_timeout(Duration::from_secs(2)).unwrap();

        assert_eq!(uc.upload(), Err(SessionError::SubmissionInFlight));

        release_tx.send(()).unwrap();
        assert!(first.join().unwrap().is_ok());
    }

    #[test]
    fn test_clear_selection() {
        let (uc, ui) = use_case(RecordingService::new(Ok(scores())));
        uc.select_file("me.jpg", encoded(image::ImageFormat::Jpeg))
            .unwrap();
        uc.clear_selection();

        assert_eq!(lock_ui(&ui).preview, PreviewState::Hidden);
        assert_eq!(uc.upload(), Err(SessionError::NoFileSelected));
    }
}
