//! Countdown derived from a server-issued deadline.
//!
//! The deadline is `server_ts + time_limit`, fixed when the question starts.
//! Latency between the server issuing a question and this client receiving it
//! therefore shortens the remaining time instead of extending it.

use std::time::Duration;

pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(100);

/// One recomputation of the countdown.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Countdown {
    pub remaining_seconds: u64,
    /// Fraction of the answer window already used, `0.0..=1.0`.
    pub elapsed_fraction: f64,
}

#[derive(Debug)]
pub struct DeadlineTimer {
    tick_interval: Duration,
    deadline_ms: Option<i64>,
    total_ms: i64,
    remaining_ms: i64,
    countdown: Option<Countdown>,
    next_tick_ms: Option<i64>,
}

impl DeadlineTimer {
    pub fn new(tick_interval: Duration) -> Self {
        Self {
            tick_interval,
            deadline_ms: None,
            total_ms: 0,
            remaining_ms: 0,
            countdown: None,
            next_tick_ms: None,
        }
    }

    /// Start counting down to `issued_at_ms + time_limit_secs`.
    ///
    /// Replaces any countdown already running.
    pub fn start(&mut self, issued_at_ms: i64, time_limit_secs: u32, now_ms: i64) {
        let total_ms = i64::from(time_limit_secs) * 1000;
        self.deadline_ms = Some(issued_at_ms.saturating_add(total_ms));
        self.total_ms = total_ms;
        self.remaining_ms = i64::MAX;
        self.countdown = None;
        self.next_tick_ms = Some(now_ms);
        self.recompute(now_ms);
    }

    /// Cancel updates and clear the displayed countdown.
    pub fn stop(&mut self) {
        self.deadline_ms = None;
        self.countdown = None;
        self.next_tick_ms = None;
    }

    /// Recompute the countdown if a tick is due.
    pub fn tick(&mut self, now_ms: i64) -> Option<Countdown> {
        match self.next_tick_ms {
            Some(due) if now_ms >= due => {
                self.recompute(now_ms);
                self.countdown
            }
            _ => None,
        }
    }

    /// When the next tick is due, or `None` once stopped or expired.
    pub fn next_tick_ms(&self) -> Option<i64> {
        self.next_tick_ms
    }

    pub fn countdown(&self) -> Option<Countdown> {
        self.countdown
    }

    pub fn is_running(&self) -> bool {
        self.next_tick_ms.is_some()
    }

    /// Whether the answer window has closed as of `now_ms`.
    ///
    /// A stopped timer is never expired; there is nothing to expire.
    pub fn is_expired(&self, now_ms: i64) -> bool {
        match self.deadline_ms {
            Some(deadline) => self.remaining_ms == 0 || deadline <= now_ms,
            None => false,
        }
    }

    fn recompute(&mut self, now_ms: i64) {
        let Some(deadline) = self.deadline_ms else {
            return;
        };

        // Clamp so a local clock stepping backwards never adds time back.
        let remaining_ms = deadline.saturating_sub(now_ms).max(0).min(self.remaining_ms);
        self.remaining_ms = remaining_ms;

        let elapsed_fraction = if self.total_ms > 0 {
            ((self.total_ms - remaining_ms) as f64 / self.total_ms as f64).clamp(0.0, 1.0)
        } else {
            1.0
        };

        self.countdown = Some(Countdown {
            remaining_seconds: (remaining_ms as u64).div_ceil(1000),
            elapsed_fraction,
        });

        self.next_tick_ms = if remaining_ms == 0 {
            None
        } else {
            Some(now_ms.saturating_add(duration_ms(self.tick_interval)))
        };
    }
}

/// Milliseconds in `duration`, saturating at `i64::MAX`.
pub(crate) fn duration_ms(duration: Duration) -> i64 {
    i64::try_from(duration.as_millis()).unwrap_or(i64::MAX)
}

impl Default for DeadlineTimer {
    fn default() -> Self {
        Self::new(DEFAULT_TICK_INTERVAL)
    }
}
