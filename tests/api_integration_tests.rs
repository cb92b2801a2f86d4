//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycle for each endpoint.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use durable_lru::{api::create_router, AppState, Config};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

// == Helper Functions ==

fn create_test_app(dir: &TempDir) -> (Router, AppState) {
    let config = Config::with_aof_path(dir.path().join("api.aof")).capacity(2);
    let state = AppState::from_config(&config).unwrap();
    (create_router(state.clone()), state)
}

async fn send(app: &Router, method: &str, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

// == PUT / GET ==

#[tokio::test]
async fn test_put_then_get() {
    let dir = TempDir::new().unwrap();
    let (app, _) = create_test_app(&dir);

    let (status, json) = send(&app, "POST", "/cache/1?value=10").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "OK");

    let (status, json) = send(&app, "GET", "/cache/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["key"], "1");
    assert_eq!(json["value"], "10");
}

#[tokio::test]
async fn test_get_not_found() {
    let dir = TempDir::new().unwrap();
    let (app, _) = create_test_app(&dir);

    let (status, json) = send(&app, "GET", "/cache/missing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json["error"].as_str().unwrap().contains("missing"));
}

#[tokio::test]
async fn test_put_requires_value() {
    let dir = TempDir::new().unwrap();
    let (app, _) = create_test_app(&dir);

    let (status, json) = send(&app, "POST", "/cache/1?ttl=100").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().starts_with("Invalid request"));
}

#[tokio::test]
async fn test_put_rejects_non_numeric_ttl() {
    let dir = TempDir::new().unwrap();
    let (app, _) = create_test_app(&dir);

    let (status, _) = send(&app, "POST", "/cache/1?value=a&ttl=soon").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_lru_eviction_through_http() {
    let dir = TempDir::new().unwrap();
    let (app, _) = create_test_app(&dir);

    send(&app, "POST", "/cache/1?value=10").await;
    send(&app, "POST", "/cache/2?value=20").await;
    send(&app, "GET", "/cache/1").await;
    send(&app, "POST", "/cache/3?value=30").await;

    let (status, _) = send(&app, "GET", "/cache/2").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, "GET", "/cache/1").await;
    assert_eq!(status, StatusCode::OK);
}

// == DELETE ==

#[tokio::test]
async fn test_delete_endpoint() {
    let dir = TempDir::new().unwrap();
    let (app, state) = create_test_app(&dir);

    send(&app, "POST", "/cache/k?value=v").await;
    let (status, _) = send(&app, "DELETE", "/cache/k").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(state.cache.pending_records(), 2);

    let (status, _) = send(&app, "DELETE", "/cache/k").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// == STATS / HEALTH ==

#[tokio::test]
async fn test_stats_endpoint() {
    let dir = TempDir::new().unwrap();
    let (app, _) = create_test_app(&dir);

    send(&app, "POST", "/cache/a?value=1").await;
    send(&app, "GET", "/cache/a").await;
    send(&app, "GET", "/cache/b").await;

    let (status, json) = send(&app, "GET", "/stats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["hits"], 1);
    assert_eq!(json["misses"], 1);
    assert_eq!(json["total_entries"], 1);
    assert_eq!(json["capacity"], 2);
}

#[tokio::test]
async fn test_health_endpoint() {
    let dir = TempDir::new().unwrap();
    let (app, _) = create_test_app(&dir);

    let (status, json) = send(&app, "GET", "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
}

// == Persistence ==

#[tokio::test]
async fn test_values_survive_restart() {
    let dir = TempDir::new().unwrap();
    let (app, state) = create_test_app(&dir);

    send(&app, "POST", "/cache/5?value=50&ttl=0").await;
    state.cache.flush().unwrap();
    drop(app);
    drop(state);

    let (app, _) = create_test_app(&dir);
    let (status, json) = send(&app, "GET", "/cache/5").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["value"], "50");
}
