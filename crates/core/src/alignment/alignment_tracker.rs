use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::JoinHandle;
use std::time::Duration;

use thiserror::Error;

use crate::alignment::domain::alignment_evaluator::{AlignmentEvaluator, AlignmentReading};
use crate::alignment::domain::alignment_observer::AlignmentObserver;
use crate::alignment::domain::alignment_state::AlignmentState;
use crate::alignment::domain::display_container::DisplayContainer;
use crate::capture::domain::frame_source::FrameSource;
use crate::detection::domain::detection_error::DetectionError;
use crate::detection::domain::face_detector::{FaceDetector, FaceModelLoader};
use crate::shared::frame::Frame;
use crate::shared::geometry::Size;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TrackerError {
    #[error("alignment tracking is already running")]
    AlreadyRunning,
    #[error("no live source is active")]
    SourceInactive,
}

/// Why a tracking run ended.
#[derive(Debug, Clone, PartialEq)]
pub enum TrackerExit {
    Stopped,
    SourceEnded,
    Failed(DetectionError),
}

/// One detection + evaluation cycle on a single frame.
pub fn run_cycle(
    detector: &mut dyn FaceDetector,
    evaluator: &AlignmentEvaluator,
    frame: &Frame,
    container: Size,
) -> Result<AlignmentReading, DetectionError> {
    let faces = detector.estimate_faces(frame)?;
    Ok(evaluator.evaluate(&faces, frame.size(), container))
}

/// Continuously evaluates face alignment on a live frame stream.
///
/// Each run owns a worker thread that loads the detector, then evaluates
/// every new frame once per tick, strictly sequentially. `stop()` and the
/// worker's publication of a reading are serialized through one lock, so
/// no reading produced by an in-flight detection can land after a stop.
pub struct AlignmentTracker {
    loader: Arc<dyn FaceModelLoader>,
    evaluator: AlignmentEvaluator,
    tick_interval: Duration,
    run: Option<TrackerRun>,
}

struct TrackerRun {
    gate: Arc<Mutex<Gate>>,
    handle: JoinHandle<TrackerExit>,
}

struct Gate {
    stopped: bool,
    state: AlignmentState,
    observer: Box<dyn AlignmentObserver>,
}

fn lock(gate: &Mutex<Gate>) -> MutexGuard<'_, Gate> {
    gate.lock().unwrap_or_else(|e| e.into_inner())
}

impl AlignmentTracker {
    pub fn new(
        loader: Arc<dyn FaceModelLoader>,
        evaluator: AlignmentEvaluator,
        tick_interval: Duration,
    ) -> Self {
        Self {
            loader,
            evaluator,
            tick_interval,
            run: None,
        }
    }

    /// Begins tracking `source`. The observer is immediately told the
    /// face is misaligned, so capture starts disabled.
    pub fn start(
        &mut self,
        source: Arc<dyn FrameSource>,
        container: DisplayContainer,
        mut observer: Box<dyn AlignmentObserver>,
    ) -> Result<(), TrackerError> {
        if self.is_running() {
            return Err(TrackerError::AlreadyRunning);
        }
        if !source.is_active() {
            return Err(TrackerError::SourceInactive);
        }
        if let Some(finished) = self.run.take() {
            if let Ok(exit) = finished.handle.join() {
                log::debug!("Previous tracking run ended: {exit:?}");
            }
        }

        observer.on_misaligned(&AlignmentReading::misaligned());
        let gate = Arc::new(Mutex::new(Gate {
            stopped: false,
            state: AlignmentState::Misaligned,
            observer,
        }));

        let worker = TrackerWorker {
            loader: self.loader.clone(),
            evaluator: self.evaluator,
            source,
            container,
            gate: gate.clone(),
            tick: crossbeam_channel::tick(self.tick_interval),
        };
        let handle = std::thread::spawn(move || worker.run());
        self.run = Some(TrackerRun { gate, handle });
        log::info!(
            "Alignment tracking started (radius {} px)",
            self.evaluator.radius()
        );
        Ok(())
    }

    /// Halts tracking, forces the state to misaligned and waits for the
    /// worker to finish its current cycle. Returns how the run ended, or
    /// `None` if nothing was started.
    pub fn stop(&mut self) -> Option<TrackerExit> {
        let run = self.run.take()?;
        {
            let mut gate = lock(&run.gate);
            gate.stopped = true;
            gate.state = AlignmentState::Misaligned;
            gate.observer.on_misaligned(&AlignmentReading::misaligned());
        }
        let exit = match run.handle.join() {
            Ok(exit) => exit,
            Err(_) => {
                log::error!("Alignment tracker thread panicked");
                TrackerExit::Stopped
            }
        };
        log::info!("Alignment tracking stopped ({exit:?})");
        Some(exit)
    }

    pub fn is_running(&self) -> bool {
        self.run
            .as_ref()
            .is_some_and(|run| !run.handle.is_finished())
    }

    pub fn state(&self) -> AlignmentState {
        self.run
            .as_ref()
            .map(|run| lock(&run.gate).state)
            .unwrap_or(AlignmentState::Misaligned)
    }
}

impl Drop for AlignmentTracker {
    fn drop(&mut self) {
        self.stop();
    }
}

struct TrackerWorker {
    loader: Arc<dyn FaceModelLoader>,
    evaluator: AlignmentEvaluator,
    source: Arc<dyn FrameSource>,
    container: DisplayContainer,
    gate: Arc<Mutex<Gate>>,
    tick: crossbeam_channel::Receiver<std::time::Instant>,
}

impl TrackerWorker {
    fn run(self) -> TrackerExit {
        let mut detector = match self.loader.load() {
            Ok(detector) => detector,
            Err(e) => return self.fail(e),
        };
        let mut last_index = None;

        loop {
            if lock(&self.gate).stopped {
                return TrackerExit::Stopped;
            }
            if !self.source.is_active() {
                self.publish(&AlignmentReading::misaligned());
                return TrackerExit::SourceEnded;
            }

            if let Some(frame) = self.source.latest_frame() {
                if last_index != Some(frame.index()) {
                    last_index = Some(frame.index());
                    let container = self.container.size();
                    let reading =
                        match run_cycle(detector.as_mut(), &self.evaluator, &frame, container) {
                            Ok(reading) => reading,
                            Err(e) => return self.fail(e),
                        };
                    if !self.publish(&reading) {
                        return TrackerExit::Stopped;
                    }
                }
            }

            if self.tick.recv().is_err() {
                return TrackerExit::Stopped;
            }
        }
    }

    /// Returns false, dropping the reading, if the run was stopped while
    /// the cycle was in flight.
    fn publish(&self, reading: &AlignmentReading) -> bool {
        let mut gate = lock(&self.gate);
        if gate.stopped {
            return false;
        }
        if gate.state != reading.state {
            log::debug!(
                "Alignment {:?} -> {:?} (distance {:?})",
                gate.state,
                reading.state,
                reading.distance
            );
        }
        gate.state = reading.state;
        match reading.state {
            AlignmentState::Aligned => gate.observer.on_aligned(reading),
            AlignmentState::Misaligned => gate.observer.on_misaligned(reading),
        }
        true
    }

    fn fail(&self, error: DetectionError) -> TrackerExit {
        log::error!("Alignment tracking aborted: {error}");
        let mut gate = lock(&self.gate);
        gate.state = AlignmentState::Misaligned;
        if !gate.stopped {
            gate.observer.on_misaligned(&AlignmentReading::misaligned());
            gate.observer.on_error(&error);
        }
        TrackerExit::Failed(error)
    }
}
