//! Auto-close timer armed when a vote is committed.
//!
//! The timer is a plain deadline; the owner polls it with the current time.
//! Dropping the timer is the cancellation.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CloseTimer {
    armed_at: Instant,
    delay: Duration,
}

impl CloseTimer {
    pub fn arm(now: Instant, delay: Duration) -> Self {
        Self {
            armed_at: now,
            delay,
        }
    }

    /// Whether the delay has fully elapsed at `now`.
    pub fn is_due(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.armed_at) >= self.delay
    }

    /// Time left until the deadline, zero once due.
    pub fn remaining(&self, now: Instant) -> Duration {
        let elapsed = now.saturating_duration_since(self.armed_at);
        self.delay.saturating_sub(elapsed)
    }
}
