//! Snapshot refresh background task

use std::{sync::Arc, time::Duration};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{info, warn};

use crate::{state::AppState, timer::Clock};

/// Background task that republishes the timer snapshot while the timer is started,
/// so observers see elapsed and remaining times move between fires.
pub async fn snapshot_refresh_task<C: Clock + 'static>(state: Arc<AppState<C>>, period: Duration) {
    info!("Starting snapshot refresh task every {:?}", period);

    let mut interval = interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        interval.tick().await;

        if let Err(e) = state.refresh() {
            warn!("Failed to refresh timer snapshot: {}", e);
        }
    }
}
