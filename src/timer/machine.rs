//! The timer state machine and its tick evaluation

use std::{
    any::Any,
    fmt,
    panic::{self, AssertUnwindSafe},
    time::Duration,
};
use tracing::{debug, error, trace};

use super::{
    clock::{is_set, Clock, Millis, SystemClock, NEVER, UNSET},
    options::TimerOptions,
    snapshot::{TimerSnapshot, TimerStatus},
};
use crate::error::TimerError;

/// User code invoked every time the timer fires
pub type Callback = Box<dyn FnMut() -> anyhow::Result<()> + Send>;

/// Receives callback failures caught during evaluation
pub type ErrorReporter = Box<dyn FnMut(TimerError) + Send>;

/// What the host should do after an evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rearm {
    /// Nothing to wait for until the next command
    Idle,
    /// Evaluate again after this long
    After(Duration),
}

impl Rearm {
    fn after(wait: Millis) -> Self {
        Rearm::After(Duration::from_millis(wait.max(1) as u64))
    }

    /// The requested wait, if any
    pub fn wait(&self) -> Option<Duration> {
        match self {
            Rearm::Idle => None,
            Rearm::After(wait) => Some(*wait),
        }
    }
}

/// Mutable temporal state. Unset timestamps hold [`NEVER`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TimerState {
    started: bool,
    start_time: Millis,
    last_fire_time: Millis,
    next_fire_time: Millis,
    pause_time: Millis,
    resume_time: Millis,
    /// Paused time since the last fire, or since start if it has not fired yet
    period_elapsed_paused_time: Millis,
    /// Paused time since start
    total_elapsed_paused_time: Millis,
}

impl TimerState {
    const fn stopped() -> Self {
        Self {
            started: false,
            start_time: NEVER,
            last_fire_time: NEVER,
            next_fire_time: NEVER,
            pause_time: NEVER,
            resume_time: NEVER,
            period_elapsed_paused_time: 0,
            total_elapsed_paused_time: 0,
        }
    }
}

/// Drift-free interval, one-shot or stopwatch timer.
///
/// Commands and accessors read the clock themselves; the host only has to call
/// [`Timer::tick`] whenever it wants the timer to check whether it is due, and
/// honour the returned [`Rearm`].
pub struct Timer<C: Clock = SystemClock> {
    options: TimerOptions,
    state: TimerState,
    callback: Callback,
    report: ErrorReporter,
    clock: C,
}

impl<C: Clock> Timer<C> {
    /// Create a timer. Starts it right away when `start_immediately` is set.
    pub fn new<F>(options: TimerOptions, callback: F, clock: C) -> Result<Self, TimerError>
    where
        F: FnMut() -> anyhow::Result<()> + Send + 'static,
    {
        options.validate()?;

        let mut timer = Self {
            options,
            state: TimerState::stopped(),
            callback: Box::new(callback),
            report: Box::new(log_callback_error),
            clock,
        };

        if timer.options.start_immediately {
            timer.start();
        }

        Ok(timer)
    }

    /// Create a timer that only tracks elapsed time
    pub fn stopwatch(clock: C) -> Self {
        Self {
            options: TimerOptions::stopwatch(),
            state: TimerState::stopped(),
            callback: Box::new(|| Ok(())),
            report: Box::new(log_callback_error),
            clock,
        }
    }

    /// Replace the default reporter, which logs callback failures
    pub fn with_error_reporter<R>(mut self, reporter: R) -> Self
    where
        R: FnMut(TimerError) + Send + 'static,
    {
        self.report = Box::new(reporter);
        self
    }

    pub fn options(&self) -> &TimerOptions {
        &self.options
    }

    pub fn delay(&self) -> Millis {
        self.options.delay
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Start now
    pub fn start(&mut self) {
        let now = self.clock.now();
        self.start_at(now);
    }

    /// Start as of `at`. Restarts from scratch if already started.
    pub fn start_at(&mut self, at: Millis) {
        let delay = self.options.delay;
        let next_fire_time = if delay > 0 {
            let scheduled = if self.options.fire_immediately {
                at
            } else {
                at.saturating_add(delay)
            };
            scheduled.max(at)
        } else {
            NEVER
        };

        self.state = TimerState {
            started: true,
            start_time: at,
            last_fire_time: NEVER,
            next_fire_time,
            pause_time: NEVER,
            resume_time: at,
            period_elapsed_paused_time: 0,
            total_elapsed_paused_time: 0,
        };

        debug!(start_time = at, delay, "timer started");
    }

    /// Return to the inactive state. Calling it again changes nothing.
    pub fn stop(&mut self) {
        if self.state.started {
            debug!("timer stopped");
        }
        self.state = TimerState::stopped();
    }

    /// Freeze the timer. Ignored unless running.
    pub fn pause(&mut self) {
        if !self.is_running() {
            trace!("pause ignored, timer is not running");
            return;
        }

        let now = self.clock.now();
        self.state.pause_time = now;
        self.state.resume_time = NEVER;
        debug!(pause_time = now, "timer paused");
    }

    /// Continue a paused timer, pushing the next fire back by the time spent paused.
    /// Ignored unless paused.
    pub fn resume(&mut self) {
        if !self.is_started() || !self.is_paused() {
            trace!("resume ignored, timer is not paused");
            return;
        }

        let now = self.clock.now();
        // Must be read while still paused and before the pause is folded in.
        let remaining = self.remaining_time_at(now);
        let paused_for = now.saturating_sub(self.state.pause_time);

        self.state.total_elapsed_paused_time += paused_for;
        self.state.period_elapsed_paused_time += paused_for;
        if self.options.delay > 0 {
            self.state.next_fire_time = now.saturating_add(remaining);
        }
        self.state.pause_time = NEVER;
        self.state.resume_time = now;

        debug!(paused_for, next_fire_time = self.state.next_fire_time, "timer resumed");
    }

    /// Check whether the timer is due and fire it if so.
    ///
    /// Returns when the host should evaluate again.
    pub fn tick(&mut self) -> Rearm {
        let delay = self.options.delay;
        if delay == 0 || !self.is_running() {
            return Rearm::Idle;
        }

        let now = self.clock.now();
        let next_fire_time = self.state.next_fire_time;

        // Whole periods missed beyond the one currently due.
        let overdue = if is_set(self.state.last_fire_time) {
            now.saturating_sub(next_fire_time).div_euclid(delay).max(0)
        } else {
            0
        };

        if overdue % 2 == 1 {
            if let Some(relief) = self.options.overdue_relief {
                trace!(overdue, relief, "deferring overdue evaluation");
                return Rearm::after(relief);
            }
        }

        if now >= next_fire_time {
            let calls = if self.options.fire_overdue_callbacks {
                overdue + 1
            } else {
                1
            };
            debug!(now, overdue, calls, "timer due");

            for _ in 0..calls {
                self.invoke_callback();
            }

            self.state.last_fire_time = now;
            self.state.period_elapsed_paused_time = 0;

            if self.options.run_once {
                self.stop();
                return Rearm::Idle;
            }

            let next_fire_time = next_fire_time
                .saturating_add(delay.saturating_mul(overdue + 1))
                .max(now);
            self.state.next_fire_time = next_fire_time;
            return Rearm::after(next_fire_time - now);
        }

        if is_set(next_fire_time) {
            Rearm::after(next_fire_time - now)
        } else {
            Rearm::Idle
        }
    }

    fn invoke_callback(&mut self) {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| (self.callback)()));
        let err = match outcome {
            Ok(Ok(())) => return,
            Ok(Err(e)) => TimerError::CallbackFailed {
                message: format!("{:#}", e),
            },
            Err(payload) => TimerError::CallbackPanicked {
                message: panic_message(&*payload),
            },
        };
        (self.report)(err);
    }

    pub fn is_started(&self) -> bool {
        self.state.started
    }

    pub fn is_stopped(&self) -> bool {
        !self.state.started
    }

    pub fn is_paused(&self) -> bool {
        self.state.started && is_set(self.state.pause_time)
    }

    pub fn is_running(&self) -> bool {
        self.state.started && !is_set(self.state.pause_time)
    }

    pub fn status(&self) -> TimerStatus {
        if self.is_paused() {
            TimerStatus::Paused
        } else if self.is_running() {
            TimerStatus::Running
        } else {
            TimerStatus::Stopped
        }
    }

    /// When the timer was started, or `-1`
    pub fn start_time(&self) -> Millis {
        if self.is_started() {
            self.state.start_time
        } else {
            UNSET
        }
    }

    /// When the callback last fired, or `-1`
    pub fn last_fire_time(&self) -> Millis {
        if is_set(self.state.last_fire_time) && self.options.delay > 0 {
            self.state.last_fire_time
        } else {
            UNSET
        }
    }

    /// When the callback is scheduled to fire next, or `-1` unless running
    pub fn next_fire_time(&self) -> Millis {
        if self.is_running() && self.options.delay > 0 {
            self.state.next_fire_time
        } else {
            UNSET
        }
    }

    /// When the timer was paused, or `-1` unless paused
    pub fn pause_time(&self) -> Millis {
        if self.is_paused() {
            self.state.pause_time
        } else {
            UNSET
        }
    }

    /// When the timer was last started or resumed, or `-1`
    pub fn resume_time(&self) -> Millis {
        if self.is_started() && is_set(self.state.resume_time) {
            self.state.resume_time
        } else {
            UNSET
        }
    }

    /// Time left until the next fire. Frozen while paused.
    pub fn remaining_time(&self) -> Millis {
        self.remaining_time_at(self.clock.now())
    }

    /// Time since start, including paused time
    pub fn elapsed_started_time(&self) -> Millis {
        self.elapsed_started_time_at(self.clock.now())
    }

    /// Time since start, excluding paused time
    pub fn elapsed_running_time(&self) -> Millis {
        self.elapsed_running_time_at(self.clock.now())
    }

    /// Time since the last start or resume, `0` unless running
    pub fn elapsed_resumed_time(&self) -> Millis {
        self.elapsed_resumed_time_at(self.clock.now())
    }

    /// Paused time within the current fire period, including an ongoing pause
    pub fn period_elapsed_paused_time(&self) -> Millis {
        self.period_elapsed_paused_time_at(self.clock.now())
    }

    /// Paused time since start, including an ongoing pause
    pub fn total_elapsed_paused_time(&self) -> Millis {
        self.total_elapsed_paused_time_at(self.clock.now())
    }

    /// Read every accessor against a single clock reading
    pub fn snapshot(&self) -> TimerSnapshot {
        let now = self.clock.now();
        TimerSnapshot {
            now,
            status: self.status(),
            delay: self.options.delay,
            start_time: self.start_time(),
            last_fire_time: self.last_fire_time(),
            next_fire_time: self.next_fire_time(),
            pause_time: self.pause_time(),
            resume_time: self.resume_time(),
            remaining_time: self.remaining_time_at(now),
            elapsed_started_time: self.elapsed_started_time_at(now),
            elapsed_running_time: self.elapsed_running_time_at(now),
            elapsed_resumed_time: self.elapsed_resumed_time_at(now),
            period_elapsed_paused_time: self.period_elapsed_paused_time_at(now),
            total_elapsed_paused_time: self.total_elapsed_paused_time_at(now),
        }
    }

    fn remaining_time_at(&self, now: Millis) -> Millis {
        let delay = self.options.delay;
        if !self.is_started() || delay == 0 {
            return 0;
        }

        if self.is_paused() {
            let edge = if is_set(self.state.last_fire_time) {
                self.state.last_fire_time
            } else {
                self.state.start_time
            };
            let into_period = self
                .state
                .pause_time
                .saturating_sub(edge)
                .saturating_sub(self.state.period_elapsed_paused_time);
            return delay.saturating_sub(into_period).max(0);
        }

        self.state.next_fire_time.saturating_sub(now).max(0)
    }

    fn elapsed_started_time_at(&self, now: Millis) -> Millis {
        if self.is_started() {
            now.saturating_sub(self.state.start_time)
        } else {
            0
        }
    }

    fn elapsed_running_time_at(&self, now: Millis) -> Millis {
        let until = if self.is_running() {
            now
        } else if self.is_paused() {
            self.state.pause_time
        } else {
            return 0;
        };

        until
            .saturating_sub(self.state.start_time)
            .saturating_sub(self.state.total_elapsed_paused_time)
    }

    fn elapsed_resumed_time_at(&self, now: Millis) -> Millis {
        if self.is_running() {
            now.saturating_sub(self.state.resume_time)
        } else {
            0
        }
    }

    fn period_elapsed_paused_time_at(&self, now: Millis) -> Millis {
        self.state.period_elapsed_paused_time + self.ongoing_pause(now)
    }

    fn total_elapsed_paused_time_at(&self, now: Millis) -> Millis {
        self.state.total_elapsed_paused_time + self.ongoing_pause(now)
    }

    fn ongoing_pause(&self, now: Millis) -> Millis {
        if self.is_paused() {
            now.saturating_sub(self.state.pause_time)
        } else {
            0
        }
    }
}

impl<C: Clock> fmt::Debug for Timer<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timer")
            .field("options", &self.options)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

fn log_callback_error(err: TimerError) {
    error!("{}", err);
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
