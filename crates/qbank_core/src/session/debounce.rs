//! Caller-owned debounce timer.

use std::time::{Duration, Instant};

/// Delay used by operator input fields.
pub const DEFAULT_DEBOUNCE_DELAY: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone)]
struct Pending<T> {
    due_at: Instant,
    value: T,
}

/// Debounce handle: only the most recently scheduled value fires, and only
/// once its delay has elapsed without another `schedule`.
///
/// Time is supplied by the caller, so the timer holds no ambient state and
/// never spawns threads.
#[derive(Debug, Clone)]
pub struct DebounceTimer<T> {
    delay: Duration,
    pending: Option<Pending<T>>,
}

impl<T> DebounceTimer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedules `value` to fire at `now + delay`, replacing any pending value.
    pub fn schedule(&mut self, now: Instant, value: T) {
        self.pending = Some(Pending {
            due_at: now + self.delay,
            value,
        });
    }

    /// Drops the pending value, returning it if there was one.
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|pending| pending.value)
    }

    /// Returns the pending value if it is due at `now`.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let due = self
            .pending
            .as_ref()
            .is_some_and(|pending| now >= pending.due_at);
        if due {
            self.cancel()
        } else {
            None
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn due_at(&self) -> Option<Instant> {
        self.pending.as_ref().map(|pending| pending.due_at)
    }
}

impl<T> Default for DebounceTimer<T> {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE_DELAY)
    }
}
