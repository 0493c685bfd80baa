//! Point-in-time view of a timer

use serde::{Deserialize, Serialize};

use super::clock::Millis;

/// Coarse lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerStatus {
    Stopped,
    Running,
    Paused,
}

/// Every accessor of a timer evaluated against the same `now`.
///
/// Absent timestamps are reported as `-1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub now: Millis,
    pub status: TimerStatus,
    pub delay: Millis,
    pub start_time: Millis,
    pub last_fire_time: Millis,
    pub next_fire_time: Millis,
    pub pause_time: Millis,
    pub resume_time: Millis,
    pub remaining_time: Millis,
    pub elapsed_started_time: Millis,
    pub elapsed_running_time: Millis,
    pub elapsed_resumed_time: Millis,
    pub period_elapsed_paused_time: Millis,
    pub total_elapsed_paused_time: Millis,
}

impl TimerSnapshot {
    pub fn is_started(&self) -> bool {
        self.status != TimerStatus::Stopped
    }

    pub fn is_running(&self) -> bool {
        self.status == TimerStatus::Running
    }

    pub fn is_paused(&self) -> bool {
        self.status == TimerStatus::Paused
    }
}
