use std::sync::Arc;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use precision_timer::{create_router, AppState, ManualClock, TimerOptions};

fn app() -> (Router, ManualClock) {
    let clock = ManualClock::new(1_000);
    let state = AppState::new(20554, "127.0.0.1".to_string(), TimerOptions::interval(500), clock.clone()).unwrap();
    (create_router(Arc::new(state)), clock)
}

async fn send(router: &Router, method: &str, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
        .unwrap();

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn lifecycle_over_http() {
    let (router, clock) = app();

    let (status, body) = send(&router, "POST", "/start", Some(r#"{"at": 1000}"#)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["action"], "start");
    assert_eq!(body["timer"]["status"], "running");
    assert_eq!(body["timer"]["next_fire_time"], 1500);

    clock.set(1_200);
    let (_, body) = send(&router, "POST", "/pause", None).await;
    assert_eq!(body["timer"]["status"], "paused");
    assert_eq!(body["timer"]["pause_time"], 1200);
    assert_eq!(body["timer"]["remaining_time"], 300);

    clock.set(1_700);
    let (_, body) = send(&router, "POST", "/resume", None).await;
    assert_eq!(body["timer"]["status"], "running");
    assert_eq!(body["timer"]["next_fire_time"], 2000);

    let (status, body) = send(&router, "GET", "/status", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["last_action"], "resume");
    assert_eq!(body["fire_count"], 0);
    assert_eq!(body["port"], 20554);
    assert_eq!(body["timer"]["total_elapsed_paused_time"], 500);

    let (_, body) = send(&router, "POST", "/stop", None).await;
    assert_eq!(body["timer"]["status"], "stopped");
    assert_eq!(body["timer"]["start_time"], -1);
}

#[tokio::test]
async fn start_without_body_uses_the_clock() {
    let (router, _) = app();

    let (status, body) = send(&router, "POST", "/start", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timer"]["start_time"], 1000);
}

#[tokio::test]
async fn misplaced_commands_are_harmless() {
    let (router, _) = app();

    let (status, body) = send(&router, "POST", "/resume", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timer"]["status"], "stopped");
}

#[tokio::test]
async fn health() {
    let (router, _) = app();

    let (status, body) = send(&router, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}
