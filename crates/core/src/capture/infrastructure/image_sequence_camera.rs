use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::capture::domain::camera_device::{CameraDevice, Resolution};
use crate::capture::domain::capture_error::CaptureError;
use crate::capture::infrastructure::still_codec;
use crate::shared::constants::IMAGE_EXTENSIONS;
use crate::shared::frame::Frame;

/// Plays a set of still images as if they came from a camera.
///
/// Frames loop forever at a fixed interval, each re-numbered with a
/// monotonically increasing index, so the live path can run without
/// capture hardware.
pub struct ImageSequenceCamera {
    source: SequenceSource,
    frames: Vec<Frame>,
    interval: Duration,
    next_due: Option<Instant>,
    emitted: usize,
}

enum SequenceSource {
    Directory(PathBuf),
    Frames(Vec<Frame>),
}

impl ImageSequenceCamera {
    /// Images in `dir` with a known image extension, in file-name order.
    pub fn from_dir(dir: &Path, interval: Duration) -> Self {
        Self::with_source(SequenceSource::Directory(dir.to_path_buf()), interval)
    }

    pub fn from_frames(frames: Vec<Frame>, interval: Duration) -> Self {
        Self::with_source(SequenceSource::Frames(frames), interval)
    }

    fn with_source(source: SequenceSource, interval: Duration) -> Self {
        Self {
            source,
            frames: Vec::new(),
            interval,
            next_due: None,
            emitted: 0,
        }
    }

    fn load_dir(dir: &Path) -> Result<Vec<Frame>, CaptureError> {
        let entries = std::fs::read_dir(dir).map_err(|e| {
            CaptureError::SourceUnavailable(format!("{}: {e}", dir.display()))
        })?;

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| is_image(path))
            .collect();
        paths.sort();

        paths.iter().map(|path| still_codec::decode_file(path)).collect()
    }
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

impl CameraDevice for ImageSequenceCamera {
    fn open(&mut self, resolution: Resolution) -> Result<(), CaptureError> {
        let frames = match &self.source {
            SequenceSource::Directory(dir) => Self::load_dir(dir)?,
            SequenceSource::Frames(frames) => frames.clone(),
        };
        if frames.is_empty() {
            return Err(CaptureError::SourceUnavailable(
                "image sequence contains no frames".into(),
            ));
        }
        log::debug!(
            "Image sequence opened with {} frames (requested {}x{})",
            frames.len(),
            resolution.width,
            resolution.height
        );
        self.frames = frames;
        self.next_due = Some(Instant::now());
        self.emitted = 0;
        Ok(())
    }

    fn read_frame(&mut self) -> Result<Frame, CaptureError> {
        let due = self.next_due.ok_or(CaptureError::NotActive)?;
        let now = Instant::now();
        if due > now {
            std::thread::sleep(due - now);
        }
        self.next_due = Some(due + self.interval);

        let frame = self.frames[self.emitted % self.frames.len()]
            .clone()
            .with_index(self.emitted);
        self.emitted += 1;
        Ok(frame)
    }

    fn close(&mut self) {
        self.frames.clear();
        self.next_due = None;
    }
}
