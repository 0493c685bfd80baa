//! Background tasks module
//!
//! This module contains background tasks that run alongside the HTTP server.

pub mod snapshot_refresh;
pub mod timer_driver;

// Re-export main functions
pub use snapshot_refresh::snapshot_refresh_task;
pub use timer_driver::timer_driver_task;
