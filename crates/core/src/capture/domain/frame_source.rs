use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::shared::frame::Frame;

/// Read-only view of a live frame stream.
pub trait FrameSource: Send + Sync {
    /// Most recent frame, if any has arrived yet. Shared, not copied.
    fn latest_frame(&self) -> Option<Arc<Frame>>;

    fn is_active(&self) -> bool;
}

/// Shared slot holding the newest frame of a running capture.
///
/// The capture pump publishes into it; readers (the alignment tracker,
/// still capture) share the stored frame without copying its pixels.
pub struct LiveFeed {
    latest: Mutex<Option<Arc<Frame>>>,
    active: AtomicBool,
}

impl LiveFeed {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            latest: Mutex::new(None),
            active: AtomicBool::new(true),
        })
    }

    pub fn publish(&self, frame: Frame) {
        *self.latest.lock().unwrap_or_else(|e| e.into_inner()) = Some(Arc::new(frame));
    }

    pub fn deactivate(&self) {
        self.active.store(false, Ordering::SeqCst);
    }
}

impl FrameSource for LiveFeed {
    fn latest_frame(&self) -> Option<Arc<Frame>> {
        self.latest
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }
}
