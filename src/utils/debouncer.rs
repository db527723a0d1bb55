use std::time::{Duration, Instant};

/// Tracks when an action should fire after a period of input inactivity.
///
/// Every `trigger()` restarts the window, so a burst of events collapses
/// into a single execution carrying whatever value the caller reads once
/// `should_execute()` returns true (last write wins).
#[derive(Debug, Clone)]
pub struct Debouncer {
    /// How long the input must stay quiet before firing
    delay: Duration,
    /// When the last event occurred
    last_event: Option<Instant>,
    /// Whether a trigger is pending
    pending: bool,
}

impl Debouncer {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay: Duration::from_millis(delay_ms),
            last_event: None,
            pending: false,
        }
    }

    /// Register that an event occurred, rescheduling the pending fire
    pub fn trigger(&mut self) {
        self.last_event = Some(Instant::now());
        self.pending = true;
    }

    /// Returns true once the delay has elapsed since the last trigger.
    /// Consumes the pending state.
    pub fn should_execute(&mut self) -> bool {
        if !self.pending {
            return false;
        }

        if let Some(last) = self.last_event {
            if last.elapsed() >= self.delay {
                self.pending = false;
                self.last_event = None;
                return true;
            }
        }
        false
    }

    /// Time left before the pending fire, None if nothing is pending
    pub fn time_remaining(&self) -> Option<Duration> {
        if !self.pending {
            return None;
        }

        self.last_event.map(|last| {
            let elapsed = last.elapsed();
            if elapsed >= self.delay {
                Duration::from_millis(0)
            } else {
                self.delay - elapsed
            }
        })
    }

    /// Cancel any pending fire
    pub fn reset(&mut self) {
        self.last_event = None;
        self.pending = false;
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }
}
