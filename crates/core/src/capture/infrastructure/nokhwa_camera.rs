use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use crossbeam_channel::{bounded, Receiver, Sender};
use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{
    CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType,
    Resolution as NokhwaResolution,
};
use nokhwa::Camera;

use crate::capture::domain::camera_device::{CameraDevice, Resolution};
use crate::capture::domain::capture_error::CaptureError;
use crate::shared::frame::Frame;

/// Native webcam capture via `nokhwa`.
///
/// Platform camera handles are tied to the thread that created them, so
/// the `nokhwa::Camera` is created, read and closed on one dedicated
/// stream thread. Frames cross over a bounded channel.
pub struct NokhwaCamera {
    index: u32,
    stream: Option<StreamThread>,
}

struct StreamThread {
    frames: Receiver<Result<Frame, CaptureError>>,
    running: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

impl NokhwaCamera {
    pub fn new(index: u32) -> Self {
        Self {
            index,
            stream: None,
        }
    }
}

impl CameraDevice for NokhwaCamera {
    /// Blocks until the stream thread reports whether the camera opened.
    fn open(&mut self, resolution: Resolution) -> Result<(), CaptureError> {
        self.close();

        let (ready_tx, ready_rx) = bounded(1);
        let (frame_tx, frame_rx) = bounded(1);
        let running = Arc::new(AtomicBool::new(true));
        let index = self.index;
        let thread_running = running.clone();
        let handle = std::thread::spawn(move || {
            stream_camera(index, resolution, ready_tx, frame_tx, thread_running)
        });

        let opened = ready_rx.recv().unwrap_or_else(|_| {
            Err(CaptureError::SourceUnavailable(
                "camera thread exited before opening".into(),
            ))
        });
        if let Err(e) = opened {
            if handle.join().is_err() {
                log::error!("Camera thread panicked while opening");
            }
            return Err(e);
        }

        self.stream = Some(StreamThread {
            frames: frame_rx,
            running,
            handle,
        });
        Ok(())
    }

    fn read_frame(&mut self) -> Result<Frame, CaptureError> {
        let stream = self.stream.as_ref().ok_or(CaptureError::NotActive)?;
        stream.frames.recv().unwrap_or_else(|_| {
            Err(CaptureError::SourceUnavailable("camera stream ended".into()))
        })
    }

    fn close(&mut self) {
        let Some(stream) = self.stream.take() else {
            return;
        };
        stream.running.store(false, Ordering::SeqCst);
        // Unblocks a stream thread waiting to hand over a frame.
        drop(stream.frames);
        if stream.handle.join().is_err() {
            log::error!("Camera thread panicked");
        }
    }
}

impl Drop for NokhwaCamera {
    fn drop(&mut self) {
        self.close();
    }
}

fn stream_camera(
    index: u32,
    resolution: Resolution,
    ready: Sender<Result<(), CaptureError>>,
    frames: Sender<Result<Frame, CaptureError>>,
    running: Arc<AtomicBool>,
) {
    let mut camera = match open_camera(index, resolution) {
        Ok(camera) => camera,
        Err(e) => {
            let _ = ready.send(Err(e));
            return;
        }
    };
    if ready.send(Ok(())).is_err() {
        return;
    }

    let mut frame_index = 0;
    while running.load(Ordering::SeqCst) {
        let result = read_rgb(&mut camera, frame_index);
        let failed = result.is_err();
        if frames.send(result).is_err() || failed {
            break;
        }
        frame_index += 1;
    }

    if let Err(e) = camera.stop_stream() {
        log::warn!("Failed to stop camera stream: {e}");
    }
}

fn open_camera(index: u32, resolution: Resolution) -> Result<Camera, CaptureError> {
    let format = CameraFormat::new(
        NokhwaResolution::new(resolution.width, resolution.height),
        FrameFormat::YUYV,
        30,
    );
    let requested = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(format));

    let mut camera = Camera::new(CameraIndex::Index(index), requested)
        .map_err(|e| CaptureError::SourceUnavailable(format!("create camera: {e}")))?;
    camera
        .open_stream()
        .map_err(|e| CaptureError::SourceUnavailable(format!("open stream: {e}")))?;

    let actual = camera.resolution();
    log::info!(
        "Camera {index} streaming at {}x{}",
        actual.width(),
        actual.height()
    );
    Ok(camera)
}

fn read_rgb(camera: &mut Camera, frame_index: usize) -> Result<Frame, CaptureError> {
    let buffer = camera
        .frame()
        .map_err(|e| CaptureError::SourceUnavailable(format!("fetch frame: {e}")))?;
    let rgb = buffer
        .decode_image::<RgbFormat>()
        .map_err(|e| CaptureError::Decode(e.to_string()))?;

    let (width, height) = rgb.dimensions();
    Ok(Frame::new(rgb.into_raw(), width, height, 3, frame_index))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send<T: Send>() {}

    #[test]
    fn test_camera_moves_into_capture_pump() {
        assert_send::<NokhwaCamera>();
    }

    #[test]
    fn test_missing_device_fails_open_synchronously() {
        let mut camera = NokhwaCamera::new(9_999);

        let result = camera.open(Resolution::new(640, 480));

        assert!(matches!(result, Err(CaptureError::SourceUnavailable(_))));
        assert!(matches!(camera.read_frame(), Err(CaptureError::NotActive)));
        camera.close();
    }
}
