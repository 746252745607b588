use crate::alignment::domain::alignment_evaluator::AlignmentReading;
use crate::detection::domain::detection_error::DetectionError;

/// Receives the tracker's outputs. Called from the tracker's worker
/// thread, and from `stop()` on the caller's thread.
pub trait AlignmentObserver: Send {
    /// Clear the misalignment indicator and enable capture.
    fn on_aligned(&mut self, reading: &AlignmentReading);

    /// Set the misalignment indicator and disable capture.
    fn on_misaligned(&mut self, reading: &AlignmentReading);

    /// Tracking ended with a terminal detection failure.
    fn on_error(&mut self, error: &DetectionError);
}
