//! Error types for the timer and its host

use thiserror::Error;

/// Errors raised by a timer instance.
///
/// Callback failures never propagate out of an evaluation; they are handed to the
/// timer's error reporter instead.
#[derive(Debug, Error)]
pub enum TimerError {
    #[error("timer callback failed: {message}")]
    CallbackFailed { message: String },

    #[error("timer callback panicked: {message}")]
    CallbackPanicked { message: String },

    #[error("invalid timer options: {reason}")]
    InvalidOptions { reason: String },
}

/// Errors raised by the host that owns a timer
#[derive(Debug, Error)]
pub enum HostError {
    #[error("{0} lock poisoned")]
    LockPoisoned(&'static str),

    #[error(transparent)]
    Timer(#[from] TimerError),
}
