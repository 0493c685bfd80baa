//! Clock sources for the timer state machine

use std::sync::{
    atomic::{AtomicI64, Ordering},
    Arc,
};

/// Milliseconds since the Unix epoch. Also used for durations.
pub type Millis = i64;

/// Sentinel for a timestamp that has not happened and never will.
///
/// Larger than any real reading, so "is it in the future" checks are plain comparisons.
pub const NEVER: Millis = Millis::MAX;

/// Value reported by accessors for a timestamp that is not set.
pub const UNSET: Millis = -1;

/// Source of the current time
pub trait Clock: Send + Sync {
    /// Current reading in milliseconds since the Unix epoch
    fn now(&self) -> Millis;
}

/// Wall clock backed by `chrono`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Millis {
        chrono::Utc::now().timestamp_millis()
    }
}

/// Settable clock for deterministic tests.
///
/// Clones share one reading, so a test can hold a handle while the timer owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicI64>,
}

impl ManualClock {
    pub fn new(at: Millis) -> Self {
        Self {
            now: Arc::new(AtomicI64::new(at)),
        }
    }

    pub fn set(&self, at: Millis) {
        self.now.store(at, Ordering::SeqCst);
    }

    /// Move the reading forward by `by` milliseconds
    pub fn advance(&self, by: Millis) {
        self.now.fetch_add(by, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Millis {
        self.now.load(Ordering::SeqCst)
    }
}

/// True when `at` is a real timestamp rather than the sentinel
pub(crate) fn is_set(at: Millis) -> bool {
    at != NEVER
}
