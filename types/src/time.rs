//! Millisecond timestamps and the clock abstraction.
//!
//! Evidence carries the client-claimed capture instant in epoch milliseconds.
//! Server-side times (when a record was persisted) come from a [`Clock`] so
//! tests can substitute a deterministic one.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// A Unix timestamp in milliseconds since epoch (UTC).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimestampMs(i64);

impl TimestampMs {
    /// The epoch (time zero).
    pub const EPOCH: Self = Self(0);

    pub fn new(millis: i64) -> Self {
        Self(millis)
    }

    /// Get the current system time as a `TimestampMs`.
    pub fn now() -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();
        Self(i64::try_from(millis).unwrap_or(i64::MAX))
    }

    pub fn as_millis(&self) -> i64 {
        self.0
    }

    /// Signed seconds from `earlier` to `self`.
    ///
    /// Negative when `earlier` is actually later than `self`.
    pub fn seconds_since(&self, earlier: TimestampMs) -> f64 {
        (self.0 as f64 - earlier.0 as f64) / 1000.0
    }
}

impl fmt::Display for TimestampMs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

/// Source of server-side time.
pub trait Clock: Send + Sync {
    fn now(&self) -> TimestampMs;
}

/// Wall-clock time from the operating system.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> TimestampMs {
        TimestampMs::now()
    }
}
