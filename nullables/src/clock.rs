//! Nullable clock: deterministic time for testing.

use std::sync::atomic::{AtomicI64, Ordering};
use worktrust_types::{Clock, TimestampMs};

/// A deterministic clock for testing.
///
/// Time only advances when you tell it to.
pub struct NullClock {
    current: AtomicI64,
}

impl NullClock {
    pub fn new(initial_millis: i64) -> Self {
        Self {
            current: AtomicI64::new(initial_millis),
        }
    }

    /// Advance time by a number of milliseconds.
    pub fn advance(&self, millis: i64) {
        self.current.fetch_add(millis, Ordering::SeqCst);
    }

    /// Set the time to a specific value.
    pub fn set(&self, millis: i64) {
        self.current.store(millis, Ordering::SeqCst);
    }
}

impl Clock for NullClock {
    fn now(&self) -> TimestampMs {
        TimestampMs::new(self.current.load(Ordering::SeqCst))
    }
}
