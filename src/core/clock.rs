//! Wall-clock seam.
//!
//! Reducer handlers never read the clock themselves: the caller reads it
//! once and passes the value in through `ReduceContext`.

use std::cell::Cell;
use std::time::{SystemTime, UNIX_EPOCH};

use super::entity::Timestamp;

/// Source of the current time.
pub trait Clock {
    /// Current time in milliseconds since the epoch.
    fn now(&self) -> Timestamp;
}

/// Clock backed by `SystemTime`.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        let ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or(0);
        Timestamp(ms)
    }
}

/// Manually driven clock for tests and replays.
#[derive(Clone, Debug, Default)]
pub struct FixedClock {
    now: Cell<i64>,
}

impl FixedClock {
    #[must_use]
    pub fn new(start: Timestamp) -> Self {
        Self {
            now: Cell::new(start.0),
        }
    }

    /// Move the clock forward.
    pub fn advance(&self, ms: i64) {
        self.now.set(self.now.get() + ms);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        Timestamp(self.now.get())
    }
}
