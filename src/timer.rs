/*! Deadline bookkeeping for the gravity tick of a running game. */

use std::time::{Duration, Instant};

/// The pending tick deadline of one game session.
///
/// This is a plain value, not a background clock: a game loop waits on
/// [`TickTimer::remaining`] (usually via `recv_timeout`) and calls
/// [`TickTimer::advance`] once the deadline fires. Replacing the whole timer
/// replaces the schedule, which is how a restart cancels stale ticks. Every
/// method takes `now` explicitly so the arithmetic stays testable.
#[derive(Eq, PartialEq, Clone, Copy, Debug)]
pub struct TickTimer {
    interval: Duration,
    next_at: Instant,
}

impl TickTimer {
    /// Starts a fresh schedule with the first deadline one whole `interval`
    /// after `now`.
    pub fn start(interval: Duration, now: Instant) -> Self {
        Self {
            interval,
            next_at: now + interval,
        }
    }

    /// Time left until the pending deadline, zero if it already passed.
    pub fn remaining(&self, now: Instant) -> Duration {
        self.next_at.saturating_duration_since(now)
    }

    /// Moves the deadline one interval past the one that just fired.
    ///
    /// If processing stalled for longer than a whole interval, the schedule
    /// snaps forward relative to `now` instead of queueing a burst of
    /// catch-up ticks.
    pub fn advance(&mut self, now: Instant) {
        self.next_at += self.interval;
        if self.next_at < now {
            self.next_at = now + self.interval;
        }
    }

    /// Replaces the schedule with a new interval counted from `now`.
    ///
    /// Used when a level-up shrinks the drop interval mid-session.
    pub fn reschedule(&mut self, interval: Duration, now: Instant) {
        self.interval = interval;
        self.next_at = now + interval;
    }
}
