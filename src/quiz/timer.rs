use std::time::{Duration, Instant};

/// A one-shot deadline owned by the component that started it.
///
/// Nothing runs in the background: the owner asks `fire(now)` on every tick.
/// Dropping the owner drops the deadline with it.
#[derive(Debug, Clone, Default)]
pub struct Delay {
    deadline: Option<Instant>,
}

impl Delay {
    pub fn idle() -> Self {
        Self { deadline: None }
    }

    pub fn start(&mut self, now: Instant, after: Duration) {
        self.deadline = Some(now + after);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// True exactly once, on the first call at or after the deadline.
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
