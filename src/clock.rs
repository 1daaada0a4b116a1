//! Clock sources for write timestamps
//!
//! The memtable stamps a write with `Clock::now_micros()` whenever the caller
//! does not supply a timestamp. Readings must never go backwards.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::types::Timestamp;

/// A source of monotonically non-decreasing timestamps
pub trait Clock: Send + Sync {
    /// Current time in microseconds
    fn now_micros(&self) -> Timestamp;
}

/// Wall clock in microseconds since the Unix epoch
///
/// The OS clock may step backwards (NTP adjustments). Readings are clamped
/// against the highest value handed out so far.
#[derive(Debug, Default)]
pub struct SystemClock {
    high_water: AtomicU64,
}

impl SystemClock {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clock for SystemClock {
    fn now_micros(&self) -> Timestamp {
        let wall = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_micros() as u64)
            .unwrap_or(0);

        let prev = self.high_water.fetch_max(wall, Ordering::AcqRel);
        prev.max(wall)
    }
}

/// Caller-driven clock for tests and deterministic replays
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    pub fn new(start: Timestamp) -> Self {
        Self {
            now: AtomicU64::new(start),
        }
    }

    /// Move the clock to `ts`. Ignored if `ts` is behind the current reading.
    pub fn set(&self, ts: Timestamp) {
        self.now.fetch_max(ts, Ordering::AcqRel);
    }

    /// Advance the clock by `delta` microseconds, returning the new reading
    pub fn advance(&self, delta: Timestamp) -> Timestamp {
        self.now.fetch_add(delta, Ordering::AcqRel) + delta
    }
}

impl Clock for ManualClock {
    fn now_micros(&self) -> Timestamp {
        self.now.load(Ordering::Acquire)
    }
}
