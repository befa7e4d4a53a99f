//! Pushes the exposition to a remote gateway.

use super::{ExportError, Exporter};
use crate::config::PushConfig;
use crate::exposition::{self, CONTENT_TYPE};
use crate::registry::MetricRegistry;
use reqwest::header::CONTENT_TYPE as CONTENT_TYPE_HEADER;
use reqwest::Client;
use std::time::Duration;

const USER_AGENT: &str = concat!("github2prometheus/", env!("CARGO_PKG_VERSION"));

/// Sends the rendered registry to a push gateway with a bearer token.
///
/// A failed push is reported as-is; there is no retry and no buffering.
#[derive(Debug, Clone)]
pub struct PushExporter {
    http: Client,
    config: PushConfig,
}

impl PushExporter {
    /// Creates a push exporter.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: PushConfig, timeout: Duration) -> Result<Self, ExportError> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self { http, config })
    }
}

impl Exporter for PushExporter {
    async fn export(&self, registry: &MetricRegistry) -> Result<(), ExportError> {
        let body = exposition::render(registry)?;
        let bytes = body.len();

        let response = self
            .http
            .post(&self.config.endpoint)
            .bearer_auth(&self.config.auth_token)
            .header(CONTENT_TYPE_HEADER, CONTENT_TYPE)
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ExportError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        tracing::info!(
            endpoint = %self.config.endpoint,
            status = status.as_u16(),
            bytes,
            "Pushed metrics"
        );
        Ok(())
    }
}
