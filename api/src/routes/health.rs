//! Health check endpoint.
//!
//! Answers without contacting GitHub, so load balancers can probe it freely.

use crate::state::AppState;
use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status (always "healthy" if reachable).
    pub status: &'static str,
    /// Service name.
    pub service: &'static str,
    /// Service version.
    pub version: &'static str,
    /// Identities collected on every scrape, e.g. "organization 'acme'".
    pub identities: Vec<String>,
}

/// Creates the health check routes.
pub fn health_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .with_state(state)
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "github2prometheus-api",
        version: env!("CARGO_PKG_VERSION"),
        identities: state.identities().iter().map(ToString::to_string).collect(),
    })
}
