//! Timer state machine
//!
//! One [`Timer`] owns all temporal state for a single interval, one-shot or stopwatch
//! instance. Fire instants are derived from the start timestamp, the delay and the
//! accumulated pause time, never from counting ticks, so late evaluations do not drift.
//! The machine never blocks: [`Timer::tick`] returns a [`Rearm`] telling the host when
//! to evaluate again.

pub mod clock;
pub mod machine;
pub mod options;
pub mod snapshot;

pub use clock::{Clock, ManualClock, Millis, SystemClock, NEVER, UNSET};
pub use machine::{Callback, ErrorReporter, Rearm, Timer};
pub use options::TimerOptions;
pub use snapshot::{TimerSnapshot, TimerStatus};
