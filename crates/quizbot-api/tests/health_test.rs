//! Integration tests for the health and readiness endpoints.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use quizbot_test_support::{FailingSessionStore, MemorySessionStore};

use common::{TestOptions, build_test_app, build_test_app_with, get_json};

#[tokio::test]
async fn test_health_reports_enabled_platforms() {
    // Arrange
    let app = build_test_app(Arc::new(MemorySessionStore::new()));

    // Act
    let (status, body) = get_json(app.router, "/health").await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(body["platforms"], serde_json::json!(["telegram", "vk"]));
}

#[tokio::test]
async fn test_health_does_not_touch_the_store() {
    let app = build_test_app(Arc::new(FailingSessionStore));

    let (status, _) = get_json(app.router, "/health").await;

    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_ready_when_store_answers() {
    let app = build_test_app(Arc::new(MemorySessionStore::new()));

    let (status, body) = get_json(app.router, "/ready").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
async fn test_not_ready_when_store_is_down() {
    let app = build_test_app(Arc::new(FailingSessionStore));

    let (status, body) = get_json(app.router, "/ready").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], "store_unavailable");
}

#[tokio::test]
async fn test_health_lists_only_enabled_platforms() {
    let options = TestOptions {
        vk: false,
        ..TestOptions::default()
    };
    let app = build_test_app_with(Arc::new(MemorySessionStore::new()), &options);

    let (_, body) = get_json(app.router, "/health").await;

    assert_eq!(body["platforms"], serde_json::json!(["telegram"]));
}
