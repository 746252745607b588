use std::sync::Arc;
use std::thread::JoinHandle;

use crate::capture::domain::camera_device::{CameraDevice, Resolution};
use crate::capture::domain::capture_error::CaptureError;
use crate::capture::domain::frame_source::{FrameSource, LiveFeed};
use crate::capture::infrastructure::still_codec;
use crate::shared::frame::Frame;

/// Owns the camera device and the live stream it feeds.
///
/// While live, a pump thread reads device frames into a shared
/// [`LiveFeed`]. The device is moved into the pump and handed back when
/// the pump is joined, so it can be reopened later.
pub struct CaptureSourceManager {
    resolution: Resolution,
    idle_device: Option<Box<dyn CameraDevice>>,
    live: Option<LiveCapture>,
}

struct LiveCapture {
    feed: Arc<LiveFeed>,
    pump: JoinHandle<Box<dyn CameraDevice>>,
}

impl CaptureSourceManager {
    pub fn new(device: Box<dyn CameraDevice>, resolution: Resolution) -> Self {
        Self {
            resolution,
            idle_device: Some(device),
            live: None,
        }
    }

    /// Opens the camera and starts streaming into a fresh feed.
    ///
    /// Returns the current feed unchanged if one is already live.
    pub fn start_live_source(&mut self) -> Result<Arc<LiveFeed>, CaptureError> {
        if let Some(live) = &self.live {
            if live.feed.is_active() {
                return Ok(live.feed.clone());
            }
        }
        // A pump that ended on its own still holds the device.
        self.stop_live_source();

        let mut device = self.idle_device.take().ok_or_else(|| {
            CaptureError::SourceUnavailable("camera device was lost by a previous capture".into())
        })?;

        if let Err(e) = device.open(self.resolution) {
            device.close();
            self.idle_device = Some(device);
            return Err(match e {
                CaptureError::SourceUnavailable(_) => e,
                other => CaptureError::SourceUnavailable(other.to_string()),
            });
        }

        let feed = LiveFeed::new();
        let pump = spawn_pump(device, feed.clone());
        log::info!(
            "Live source started ({}x{} requested)",
            self.resolution.width,
            self.resolution.height
        );
        self.live = Some(LiveCapture {
            feed: feed.clone(),
            pump,
        });
        Ok(feed)
    }

    /// Stops streaming and releases the device. Idempotent.
    pub fn stop_live_source(&mut self) {
        let Some(live) = self.live.take() else {
            return;
        };
        live.feed.deactivate();
        match live.pump.join() {
            Ok(device) => self.idle_device = Some(device),
            Err(_) => log::error!("Capture pump thread panicked; camera is no longer usable"),
        }
        log::info!("Live source stopped");
    }

    pub fn is_live(&self) -> bool {
        self.live.as_ref().is_some_and(|live| live.feed.is_active())
    }

    pub fn feed(&self) -> Option<Arc<LiveFeed>> {
        self.live.as_ref().map(|live| live.feed.clone())
    }

    /// Freezes the most recent live frame. `None` when nothing is live or
    /// no frame has arrived yet.
    pub fn capture_still(&self) -> Option<Frame> {
        self.live
            .as_ref()
            .filter(|live| live.feed.is_active())
            .and_then(|live| live.feed.latest_frame())
            .map(|frame| Frame::clone(&frame))
    }

    /// Decodes a user-supplied image for preview and upload.
    pub fn load_from_file(&self, bytes: &[u8]) -> Result<Frame, CaptureError> {
        still_codec::decode(bytes)
    }
}

impl Drop for CaptureSourceManager {
    fn drop(&mut self) {
        self.stop_live_source();
    }
}

fn spawn_pump(
    mut device: Box<dyn CameraDevice>,
    feed: Arc<LiveFeed>,
) -> JoinHandle<Box<dyn CameraDevice>> {
    std::thread::spawn(move || {
        while feed.is_active() {
            match device.read_frame() {
                Ok(frame) => feed.publish(frame),
                Err(e) => {
                    log::warn!("Camera stream ended: {e}");
                    feed.deactivate();
                    break;
                }
            }
        }
        device.close();
        device
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::{Duration, Instant};

    #[derive(Default)]
    struct Counters {
        opens: AtomicUsize,
        closes: AtomicUsize,
    }

    struct FakeCamera {
        counters: Arc<Counters>,
        fail_open: bool,
        fail_after: Option<usize>,
        emitted: usize,
    }

    impl FakeCamera {
        fn new(counters: Arc<Counters>) -> Self {
            Self {
                counters,
                fail_open: false,
                fail_after: None,
                emitted: 0,
            }
        }
    }

    impl CameraDevice for FakeCamera {
        fn open(&mut self, _resolution: Resolution) -> Result<(), CaptureError> {
            self.counters.opens.fetch_add(1, Ordering::SeqCst);
            if self.fail_open {
                return Err(CaptureError::SourceUnavailable("permission denied".into()));
            }
            Ok(())
        }

        fn read_frame(&mut self) -> Result<Frame, CaptureError> {
            if self.fail_after.is_some_and(|n| self.emitted >= n) {
                return Err(CaptureError::SourceUnavailable("unplugged".into()));
            }
            std::thread::sleep(Duration::from_millis(1));
            let frame = Frame::new(vec![0u8; 8 * 6 * 3], 8, 6, 3, self.emitted);
            self.emitted += 1;
            Ok(frame)
        }

        fn close(&mut self) {
            self.counters.closes.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn manager(camera: FakeCamera) -> CaptureSourceManager {
        CaptureSourceManager::new(Box::new(camera), Resolution::new(640, 480))
    }

    fn wait_for_frame(manager: &CaptureSourceManager) -> Frame {
        let deadline = Instant::now() + Duration::from_secs(2);
        loop {
            if let Some(frame) = manager.capture_still() {
                return frame;
            }
            assert!(Instant::now() < deadline, "no frame arrived");
            std::thread::sleep(Duration::from_millis(1));
        }
    }

    #[test]
    fn test_start_streams_frames() {
        let counters = Arc::new(Counters::default());
        let mut manager = manager(FakeCamera::new(counters.clone()));

        let feed = manager.start_live_source().unwrap();

        assert!(feed.is_active());
        assert!(manager.is_live());
        assert_eq!(wait_for_frame(&manager).width(), 8);
    }

    #[test]
    fn test_start_twice_returns_same_feed() {
        let counters = Arc::new(Counters::default());
        let mut manager = manager(FakeCamera::new(counters.clone()));

        let a = manager.start_live_source().unwrap();
        let b = manager.start_live_source().unwrap();

        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(counters.opens.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_open_failure_is_source_unavailable() {
        let counters = Arc::new(Counters::default());
        let mut camera = FakeCamera::new(counters.clone());
        camera.fail_open = true;
        let mut manager = manager(camera);

        let result = manager.start_live_source();

        assert!(matches!(result, Err(CaptureError::SourceUnavailable(_))));
        assert!(!manager.is_live());
        // Device stays available for a retry.
        assert!(manager.start_live_source().is_err());
        assert_eq!(counters.opens.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_stop_releases_device_and_is_idempotent() {
        let counters = Arc::new(Counters::default());
        let mut manager = manager(FakeCamera::new(counters.clone()));
        let feed = manager.start_live_source().unwrap();

        manager.stop_live_source();
        manager.stop_live_source();

        assert!(!feed.is_active());
        assert!(!manager.is_live());
        assert_eq!(counters.closes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_stop_without_start_is_noop() {
        let counters = Arc::new(Counters::default());
        let mut manager = manager(FakeCamera::new(counters.clone()));
        manager.stop_live_source();
        assert_eq!(counters.closes.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_restart_after_stop_reopens_device() {
        let counters = Arc::new(Counters::default());
        let mut manager = manager(FakeCamera::new(counters.clone()));
        manager.start_live_source().unwrap();
        manager.stop_live_source();

        manager.start_live_source().unwrap();

        assert_eq!(counters.opens.load(Ordering::SeqCst), 2);
        assert!(manager.is_live());
    }

    #[test]
    fn test_capture_still_without_live_source_is_none() {
        let counters = Arc::new(Counters::default());
        let manager = manager(FakeCamera::new(counters));
        assert!(manager.capture_still().is_none());
    }

    #[test]
    fn test_stream_error_deactivates_feed() {
        let counters = Arc::new(Counters::default());
        let mut camera = FakeCamera::new(counters.clone());
        camera.fail_after = Some(2);
        let mut manager = manager(camera);

        let feed = manager.start_live_source().unwrap();
        let deadline = Instant::now() + Duration::from_secs(2);
        while feed.is_active() {
            assert!(Instant::now() < deadline, "feed never ended");
            std::thread::sleep(Duration::from_millis(1));
        }

        assert!(!manager.is_live());
        assert!(manager.capture_still().is_none());
    }

    #[test]
    fn test_load_from_file_rejects_garbage() {
        let counters = Arc::new(Counters::default());
        let manager = manager(FakeCamera::new(counters));
        assert!(matches!(
            manager.load_from_file(b"nope"),
            Err(CaptureError::Decode(_))
        ));
    }
}
