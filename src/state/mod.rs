//! State management module
//!
//! This module contains the host-side state that owns the timer instance.

pub mod app_state;

// Re-export main types
pub use app_state::AppState;
