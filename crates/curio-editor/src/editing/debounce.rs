use std::time::{Duration, Instant};

/// A cancellable single-shot deadline.
///
/// Owners arm it on a triggering event, re-arm to supersede, cancel on
/// teardown, and poll [`fire`](Debounce::fire) from their tick. Firing
/// consumes the deadline, so a deadline can act at most once per arm and a
/// cancelled one never acts at all. This is the property the debounced history
/// checkpoint and the dropdown's blur-close both rely on.
///
/// Time is always injected by the caller; the type never reads a clock.
#[derive(Debug, Clone)]
pub struct Debounce {
    period: Duration,
    deadline: Option<Instant>,
}

impl Debounce {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            deadline: None,
        }
    }

    /// Starts (or restarts) the quiet period from `now`.
    pub fn arm(&mut self, now: Instant) {
        self.deadline = Some(now + self.period);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// True exactly once when the quiet period has elapsed.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}
