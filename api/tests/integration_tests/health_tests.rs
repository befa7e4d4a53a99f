//! Integration tests for the health check.
//!
//! Tests cover:
//! - Health check endpoint
//! - Health checks never reaching GitHub

use axum::http::StatusCode;
use wiremock::MockServer;

use super::common::{get, organization, test_app};

#[tokio::test]
async fn test_health_check() {
    let server = MockServer::start().await;
    let (app, _state) = test_app(&server, organization("acme"));

    let (status, _, body) = get(app, "/health").await;
    let response: serde_json::Value = serde_json::from_str(&body).unwrap();

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["status"], "healthy");
    assert_eq!(response["service"], "github2prometheus-api");
}

#[tokio::test]
async fn test_health_check_does_not_call_github() {
    let server = MockServer::start().await;
    let (app, _state) = test_app(&server, organization("acme"));

    let (status, _, _) = get(app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert!(server.received_requests().await.unwrap().is_empty());
}
