//! Prometheus scrape endpoint.
//!
//! Every request runs a full collection cycle against GitHub and renders the
//! result. Nothing is cached between scrapes.

use crate::state::AppState;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use shared::collect::{collect_with_stats, CollectError};
use shared::exposition::{self, CONTENT_TYPE};

/// Path serving the exposition.
pub const METRICS_PATH: &str = "/metrics";

/// Creates the metrics routes.
pub fn metrics_routes(state: AppState) -> Router {
    Router::new()
        .route(METRICS_PATH, get(scrape_metrics))
        .with_state(state)
}

async fn scrape_metrics(State(state): State<AppState>) -> Result<Response, ScrapeError> {
    let (registry, stats) = collect_with_stats(state.source(), state.identities()).await?;
    let body = exposition::render(&registry).map_err(CollectError::from)?;

    tracing::debug!(
        repositories = stats.repositories,
        pages = stats.pages,
        samples = stats.samples,
        "Served scrape"
    );

    Ok(([(header::CONTENT_TYPE, CONTENT_TYPE)], body).into_response())
}

/// A failed collection cycle, answered with a plaintext 500.
#[derive(Debug)]
struct ScrapeError(CollectError);

impl From<CollectError> for ScrapeError {
    fn from(err: CollectError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ScrapeError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self.0, "Collection cycle failed");

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            self.0.to_string(),
        )
            .into_response()
    }
}
