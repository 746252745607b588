use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Allows one outstanding analysis request at a time, across every
/// use case that shares the gate.
#[derive(Clone, Debug, Default)]
pub struct SubmissionGate {
    busy: Arc<AtomicBool>,
}

impl SubmissionGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` while another submission holds the gate.
    pub fn try_begin(&self) -> Option<SubmissionTicket> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| SubmissionTicket {
                busy: self.busy.clone(),
            })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Held for the duration of a submission; releases the gate on drop.
pub struct SubmissionTicket {
    busy: Arc<AtomicBool>,
}

impl Drop for SubmissionTicket {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_begin_is_refused() {
        let gate = SubmissionGate::new();
        let ticket = gate.try_begin();
        assert!(ticket.is_some());
        assert!(gate.try_begin().is_none());
        assert!(gate.is_busy());
    }

    #[test]
    fn test_drop_releases() {
        let gate = SubmissionGate::new();
        drop(gate.try_begin());
        assert!(!gate.is_busy());
        assert!(gate.try_begin().is_some());
    }

    #[test]
    fn test_clones_share_state() {
        let gate = SubmissionGate::new();
        let other = gate.clone();
        let _ticket = gate.try_begin();
        assert!(other.try_begin().is_none());
    }
}
