//! Host-side owner of the timer instance

use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex, MutexGuard,
    },
    time::Instant,
};
use chrono::{DateTime, Utc};
use tokio::sync::{watch, Notify};
use tracing::{info, warn};

use crate::{
    error::HostError,
    timer::{Clock, Millis, Rearm, SystemClock, Timer, TimerOptions, TimerSnapshot},
};

/// Application state shared between the HTTP handlers and the background tasks
#[derive(Debug)]
pub struct AppState<C: Clock = SystemClock> {
    /// The timer. Every command and evaluation goes through this lock, one at a time.
    pub timer: Arc<Mutex<Timer<C>>>,
    /// Number of callback invocations since the server started
    pub fire_count: Arc<AtomicU64>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
    /// Tells the driver to evaluate now and drop its pending wake-up
    pub wake: Arc<Notify>,
    /// Latest timer snapshot for observers
    pub snapshot_tx: watch::Sender<TimerSnapshot>,
    /// Keep the receiver alive to prevent channel closure
    pub _snapshot_rx: watch::Receiver<TimerSnapshot>,
}

impl<C: Clock> AppState<C> {
    /// Create the state and its timer. The timer callback counts and logs fires.
    pub fn new(port: u16, host: String, options: TimerOptions, clock: C) -> Result<Self, HostError> {
        let fire_count = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&fire_count);

        let timer = Timer::new(
            options,
            move || {
                let fired = counter.fetch_add(1, Ordering::SeqCst) + 1;
                info!(fired, "Timer fired");
                Ok(())
            },
            clock,
        )?;

        let (snapshot_tx, snapshot_rx) = watch::channel(timer.snapshot());

        Ok(Self {
            timer: Arc::new(Mutex::new(timer)),
            fire_count,
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
            wake: Arc::new(Notify::new()),
            snapshot_tx,
            _snapshot_rx: snapshot_rx,
        })
    }

    fn lock_timer(&self) -> Result<MutexGuard<'_, Timer<C>>, HostError> {
        self.timer.lock().map_err(|_| HostError::LockPoisoned("timer"))
    }

    /// Apply a command, publish the result and wake the driver
    fn command<F>(&self, action: &str, apply: F) -> Result<TimerSnapshot, HostError>
    where
        F: FnOnce(&mut Timer<C>),
    {
        let mut timer = self.lock_timer()?;
        apply(&mut *timer);
        let snapshot = timer.snapshot();
        drop(timer); // Release the lock early

        info!("Timer {}: status={:?}", action, snapshot.status);

        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }

        self.publish(snapshot.clone());
        // Any pending wake-up is stale now.
        self.wake.notify_one();

        Ok(snapshot)
    }

    /// Start or restart the timer, as of `at` if given
    pub fn start(&self, at: Option<Millis>) -> Result<TimerSnapshot, HostError> {
        self.command("start", |timer| match at {
            Some(at) => timer.start_at(at),
            None => timer.start(),
        })
    }

    pub fn stop(&self) -> Result<TimerSnapshot, HostError> {
        self.command("stop", |timer| timer.stop())
    }

    pub fn pause(&self) -> Result<TimerSnapshot, HostError> {
        self.command("pause", |timer| timer.pause())
    }

    pub fn resume(&self) -> Result<TimerSnapshot, HostError> {
        self.command("resume", |timer| timer.resume())
    }

    /// Run one tick evaluation and publish the resulting state
    pub fn evaluate(&self) -> Result<Rearm, HostError> {
        let mut timer = self.lock_timer()?;
        let rearm = timer.tick();
        let snapshot = timer.snapshot();
        drop(timer);

        self.publish(snapshot);
        Ok(rearm)
    }

    /// Publish a fresh snapshot if the timer is started. Returns whether it was.
    pub fn refresh(&self) -> Result<bool, HostError> {
        let snapshot = self.snapshot()?;
        let started = snapshot.is_started();
        if started {
            self.publish(snapshot);
        }
        Ok(started)
    }

    /// Get the current timer snapshot
    pub fn snapshot(&self) -> Result<TimerSnapshot, HostError> {
        Ok(self.lock_timer()?.snapshot())
    }

    /// Watch published snapshots
    pub fn subscribe(&self) -> watch::Receiver<TimerSnapshot> {
        self.snapshot_tx.subscribe()
    }

    pub fn fire_count(&self) -> u64 {
        self.fire_count.load(Ordering::SeqCst)
    }

    fn publish(&self, snapshot: TimerSnapshot) {
        if let Err(e) = self.snapshot_tx.send(snapshot) {
            warn!("Failed to publish timer snapshot: {}", e);
        }
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}
