//! Per-instance timer configuration

use serde::{Deserialize, Serialize};

use super::clock::Millis;
use crate::error::TimerError;

/// Default re-arm used when an evaluation skips an odd overdue count
pub const DEFAULT_OVERDUE_RELIEF: Millis = 20;

/// Immutable configuration for one timer instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerOptions {
    /// Fire period in milliseconds. Zero turns the timer into a stopwatch that never fires.
    pub delay: Millis,
    /// Stop after the first fire
    pub run_once: bool,
    /// Fire at the start instant instead of one delay later
    pub fire_immediately: bool,
    /// Start as soon as the timer is constructed
    pub start_immediately: bool,
    /// Invoke the callback once per missed period when an evaluation runs late
    pub fire_overdue_callbacks: bool,
    /// Re-arm requested when an evaluation defers on an odd overdue count.
    /// `None` disables the deferral.
    pub overdue_relief: Option<Millis>,
}

impl TimerOptions {
    /// Repeating timer firing every `delay` milliseconds
    pub fn interval(delay: Millis) -> Self {
        Self {
            delay,
            ..Self::default()
        }
    }

    /// Timer that only tracks elapsed time
    pub fn stopwatch() -> Self {
        Self::default()
    }

    /// Fires once, `delay` milliseconds after construction
    pub fn one_shot(delay: Millis) -> Self {
        Self {
            delay,
            run_once: true,
            start_immediately: true,
            ..Self::default()
        }
    }

    pub fn run_once(mut self, run_once: bool) -> Self {
        self.run_once = run_once;
        self
    }

    pub fn fire_immediately(mut self, fire_immediately: bool) -> Self {
        self.fire_immediately = fire_immediately;
        self
    }

    pub fn start_immediately(mut self, start_immediately: bool) -> Self {
        self.start_immediately = start_immediately;
        self
    }

    pub fn fire_overdue_callbacks(mut self, fire_overdue_callbacks: bool) -> Self {
        self.fire_overdue_callbacks = fire_overdue_callbacks;
        self
    }

    pub fn overdue_relief(mut self, overdue_relief: Option<Millis>) -> Self {
        self.overdue_relief = overdue_relief;
        self
    }

    /// Whether this configuration ever fires
    pub fn is_stopwatch(&self) -> bool {
        self.delay == 0
    }

    /// Reject configurations the state machine has no defined behavior for
    pub fn validate(&self) -> Result<(), TimerError> {
        if self.delay < 0 {
            return Err(TimerError::InvalidOptions {
                reason: format!("delay must not be negative, got {}ms", self.delay),
            });
        }

        if let Some(relief) = self.overdue_relief {
            if relief <= 0 {
                return Err(TimerError::InvalidOptions {
                    reason: format!("overdue relief must be positive, got {}ms", relief),
                });
            }
        }

        Ok(())
    }
}

impl Default for TimerOptions {
    fn default() -> Self {
        Self {
            delay: 0,
            run_once: false,
            fire_immediately: false,
            start_immediately: false,
            fire_overdue_callbacks: false,
            overdue_relief: Some(DEFAULT_OVERDUE_RELIEF),
        }
    }
}
