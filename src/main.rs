//! Precision Timer - serves one drift-free timer over HTTP
//!
//! This is the main entry point for the precision-timer daemon.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use precision_timer::{
    config::Config,
    create_router,
    shutdown_signal,
    state::AppState,
    tasks::{snapshot_refresh_task, timer_driver_task},
    timer::SystemClock,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("precision_timer={},tower_http=info", config.log_level()))
        .init();

    info!("Starting precision-timer server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, delay={}ms",
          config.host, config.port, config.delay);

    let options = config.timer_options();
    if options.is_stopwatch() {
        info!("Delay is 0, running as a stopwatch");
    }

    // Create application state
    let state = Arc::new(AppState::new(config.port, config.host.clone(), options, SystemClock)?);

    // Start the background tasks
    tokio::spawn(timer_driver_task(Arc::clone(&state)));
    if let Some(period) = config.refresh_period() {
        tokio::spawn(snapshot_refresh_task(Arc::clone(&state), period));
    }

    // Create HTTP router with all endpoints
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /start   - Start or restart the timer");
    info!("  POST /stop    - Stop and reset the timer");
    info!("  POST /pause   - Pause the timer");
    info!("  POST /resume  - Resume the timer");
    info!("  GET  /status  - Current timer state");
    info!("  GET  /health  - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        result = shutdown_signal() => {
            match result {
                Ok(()) => info!("Shutdown signal received"),
                Err(e) => tracing::error!("Failed to install signal handler: {}", e),
            }
        }
    }

    info!("Server shutdown complete");
    Ok(())
}
