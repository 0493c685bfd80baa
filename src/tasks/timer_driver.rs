//! Timer driver background task

use std::{sync::Arc, time::Duration};
use tokio::time::sleep;
use tracing::{debug, error, info, trace};

use crate::{
    state::AppState,
    timer::{Clock, Rearm},
};

/// Background task that evaluates the timer and re-arms its wake-up.
///
/// At most one wake-up is pending at a time. A command signals `wake`, which drops
/// the pending sleep and evaluates immediately.
pub async fn timer_driver_task<C: Clock + 'static>(state: Arc<AppState<C>>) {
    info!("Starting timer driver task");

    loop {
        let rearm = match state.evaluate() {
            Ok(rearm) => rearm,
            Err(e) => {
                error!("Failed to evaluate timer: {}", e);
                // Wait a bit before retrying
                sleep(Duration::from_secs(1)).await;
                continue;
            }
        };

        match rearm {
            Rearm::After(wait) => {
                trace!(?wait, "Re-arming timer wake-up");
                tokio::select! {
                    _ = sleep(wait) => {}
                    _ = state.wake.notified() => {
                        debug!("Pending wake-up replaced by a command");
                    }
                }
            }
            Rearm::Idle => {
                debug!("Timer idle, waiting for the next command");
                state.wake.notified().await;
            }
        }
    }
}
