//! Epoch clock for stamping session events.
//!
//! Wall time is read once, then advanced by the tokio monotonic clock, so
//! timer wakeups and `now_ms` always agree (and paused test time works).

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tokio::time::Instant;

#[derive(Debug, Clone, Copy)]
pub struct Clock {
    epoch_ms: i64,
    anchor: Instant,
}

impl Clock {
    pub fn system() -> Self {
        let epoch_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|since| since.as_millis() as i64)
            .unwrap_or_default();
        Self::starting_at(epoch_ms)
    }

    /// A clock reading `epoch_ms` right now.
    pub fn starting_at(epoch_ms: i64) -> Self {
        Self {
            epoch_ms,
            anchor: Instant::now(),
        }
    }

    pub fn now_ms(&self) -> i64 {
        self.epoch_ms + self.anchor.elapsed().as_millis() as i64
    }

    /// The monotonic instant at which this clock reads `epoch_ms`.
    pub fn instant_at(&self, epoch_ms: i64) -> Instant {
        let offset = (epoch_ms - self.epoch_ms).max(0) as u64;
        self.anchor + Duration::from_millis(offset)
    }
}
