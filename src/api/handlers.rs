//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use tracing::error;

use crate::{
    error::HostError,
    state::AppState,
    timer::{Clock, TimerSnapshot},
};
use super::responses::{CommandResponse, HealthResponse, StartRequest, StatusResponse};

fn command_response(
    action: &str,
    result: Result<TimerSnapshot, HostError>,
) -> Result<Json<CommandResponse>, StatusCode> {
    match result {
        Ok(snapshot) => Ok(Json(CommandResponse::new(action, snapshot))),
        Err(e) => {
            error!("Failed to {} timer: {}", action, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /start - Start or restart the timer
pub async fn start_handler<C: Clock + 'static>(
    State(state): State<Arc<AppState<C>>>,
    request: Option<Json<StartRequest>>,
) -> Result<Json<CommandResponse>, StatusCode> {
    let at = request.and_then(|Json(request)| request.at);
    command_response("start", state.start(at))
}

/// Handle POST /stop - Stop and reset the timer
pub async fn stop_handler<C: Clock + 'static>(
    State(state): State<Arc<AppState<C>>>,
) -> Result<Json<CommandResponse>, StatusCode> {
    command_response("stop", state.stop())
}

/// Handle POST /pause - Pause a running timer
pub async fn pause_handler<C: Clock + 'static>(
    State(state): State<Arc<AppState<C>>>,
) -> Result<Json<CommandResponse>, StatusCode> {
    command_response("pause", state.pause())
}

/// Handle POST /resume - Resume a paused timer
pub async fn resume_handler<C: Clock + 'static>(
    State(state): State<Arc<AppState<C>>>,
) -> Result<Json<CommandResponse>, StatusCode> {
    command_response("resume", state.resume())
}

/// Handle GET /status - Return the current timer view
pub async fn status_handler<C: Clock + 'static>(
    State(state): State<Arc<AppState<C>>>,
) -> Result<Json<StatusResponse>, StatusCode> {
    let timer = match state.snapshot() {
        Ok(t) => t,
        Err(e) => {
            error!("Failed to get timer snapshot: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        timer,
        fire_count: state.fire_count(),
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
