//! HTTP API module
//!
//! This module contains the timer's control endpoints and response structures.

pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{state::AppState, timer::Clock};
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router<C: Clock + 'static>(state: Arc<AppState<C>>) -> Router {
    Router::new()
        .route("/start", post(start_handler::<C>))
        .route("/stop", post(stop_handler::<C>))
        .route("/pause", post(pause_handler::<C>))
        .route("/resume", post(resume_handler::<C>))
        .route("/status", get(status_handler::<C>))
        .route("/health", get(health_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
