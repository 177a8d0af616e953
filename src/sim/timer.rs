//! Cancellable one-shot timers driven by an injected clock
//!
//! A `Timer` holds at most one deadline. Scheduling again replaces the old
//! deadline, so a stale callback can never fire after a reschedule.

/// One-shot deadline (milliseconds on the caller's clock)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Timer {
    deadline: Option<f64>,
}

impl Timer {
    pub const fn idle() -> Self {
        Self { deadline: None }
    }

    /// Arm the timer `delay_ms` from `now`, replacing any pending deadline
    pub fn schedule(&mut self, now: f64, delay_ms: f64) {
        self.deadline = Some(now + delay_ms.max(0.0));
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<f64> {
        self.deadline
    }

    pub fn is_due(&self, now: f64) -> bool {
        matches!(self.deadline, Some(deadline) if now >= deadline)
    }

    /// Returns true exactly once when the deadline has passed, disarming the timer
    pub fn fire(&mut self, now: f64) -> bool {
        if self.is_due(now) {
            self.deadline = None;
            true
        } else {
            false
        }
    }
}
