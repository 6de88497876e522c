use std::time::{Duration, Instant};

/// Fixed delay between a widget's success feedback and its completion signal.
///
/// The timer is owned by the widget that armed it, so dropping the widget
/// cancels it. `poll` reports expiry exactly once.
#[derive(Clone, Debug)]
pub struct CompletionTimer {
    deadline: Instant,
    fired: bool,
}

impl CompletionTimer {
    pub fn start(now: Instant, delay: Duration) -> Self {
        Self {
            deadline: now + delay,
            fired: false,
        }
    }

    pub fn remaining(&self, now: Instant) -> Duration {
        self.deadline.saturating_duration_since(now)
    }

    pub fn has_fired(&self) -> bool {
        self.fired
    }

    pub fn poll(&mut self, now: Instant) -> bool {
        if self.fired || now < self.deadline {
            return false;
        }
        self.fired = true;
        true
    }
}
