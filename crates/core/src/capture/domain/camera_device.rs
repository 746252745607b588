use crate::capture::domain::capture_error::CaptureError;
use crate::shared::frame::Frame;

/// Requested capture resolution. Devices may deliver the closest mode
/// they support.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Hardware (or simulated) video source.
///
/// `read_frame` may block until the next frame is ready; the capture
/// manager calls it from a dedicated pump thread.
pub trait CameraDevice: Send {
    fn open(&mut self, resolution: Resolution) -> Result<(), CaptureError>;

    fn read_frame(&mut self) -> Result<Frame, CaptureError>;

    /// Releases the device. Must be safe to call when not open.
    fn close(&mut self);
}
