//! Precision Timer - drift-free, pausable interval and one-shot timing
//!
//! The [`timer`] module holds the state machine. The remaining modules host one
//! timer instance in a small server: a tokio task drives its wake-ups, a watch
//! channel exposes its state, and an HTTP API accepts commands.

pub mod api;
pub mod config;
pub mod error;
pub mod state;
pub mod tasks;
pub mod timer;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use config::Config;
pub use error::{HostError, TimerError};
pub use state::AppState;
pub use timer::{Clock, ManualClock, Rearm, SystemClock, Timer, TimerOptions, TimerSnapshot, TimerStatus};
pub use utils::signals::shutdown_signal;
