use std::time::Duration;

use super::engine::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CountdownState {
    Running,
    Expired,
    Cancelled,
}

/// Session countdown that turns elapsed wall-clock time into a single
/// [`Event::TimerExpired`].
///
/// The countdown never touches progression state itself; the owner feeds the
/// returned event through [`apply`](super::apply) and cancels the countdown
/// once the session has ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Countdown {
    limit: Duration,
    remaining: Duration,
    state: CountdownState,
}

impl Countdown {
    #[must_use]
    pub fn new(limit: Duration) -> Self {
        Self {
            limit,
            remaining: limit,
            state: CountdownState::Running,
        }
    }

    #[must_use]
    pub fn limit(&self) -> Duration {
        self.limit
    }

    #[must_use]
    pub fn remaining(&self) -> Duration {
        self.remaining
    }

    /// Remaining time rounded up to whole seconds, as shown on a timer.
    #[must_use]
    pub fn seconds_left(&self) -> u64 {
        let secs = self.remaining.as_secs();
        if self.remaining.subsec_nanos() > 0 {
            secs + 1
        } else {
            secs
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state == CountdownState::Running
    }

    /// Advance by `elapsed`. Yields `TimerExpired` exactly once, on the tick
    /// that exhausts the remaining time.
    pub fn tick(&mut self, elapsed: Duration) -> Option<Event> {
        if !self.is_running() {
            return None;
        }
        self.remaining = self.remaining.saturating_sub(elapsed);
        if self.remaining.is_zero() {
            self.state = CountdownState::Expired;
            return Some(Event::TimerExpired);
        }
        None
    }

    /// Stop the countdown for good. Later ticks are ignored.
    pub fn cancel(&mut self) {
        if self.is_running() {
            self.state = CountdownState::Cancelled;
        }
    }
}
