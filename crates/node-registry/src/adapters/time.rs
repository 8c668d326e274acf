//! # Time Sources
//!
//! Wall clock with a fixed UTC offset, and a settable clock for tests.

use crate::domain::entities::Timestamp;
use crate::ports::outbound::TimeSource;
use chrono::{Duration, Utc};
use parking_lot::Mutex;

/// System clock formatted in a fixed zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource {
    utc_offset_secs: i64,
}

impl SystemTimeSource {
    /// Clock reporting UTC.
    pub fn utc() -> Self {
        Self::default()
    }

    /// Clock reporting local time of a zone `hours` east of UTC.
    pub fn with_offset_hours(hours: i32) -> Self {
        Self {
            utc_offset_secs: i64::from(hours) * 3600,
        }
    }
}

impl TimeSource for SystemTimeSource {
    fn now(&self) -> Timestamp {
        let local = Utc::now().naive_utc() + Duration::seconds(self.utc_offset_secs);
        Timestamp::from_datetime(&local)
    }
}

/// Deterministic clock. Returns the configured instant until changed.
pub struct FixedTimeSource {
    now: Mutex<Timestamp>,
}

impl FixedTimeSource {
    pub fn new(now: Timestamp) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Move the clock to `now`.
    pub fn set(&self, now: Timestamp) {
        *self.now.lock() = now;
    }
}

impl TimeSource for FixedTimeSource {
    fn now(&self) -> Timestamp {
        self.now.lock().clone()
    }
}
