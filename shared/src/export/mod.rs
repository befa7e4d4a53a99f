//! Exporters for a populated registry.
//!
//! Batch mode hands the registry of a finished collection cycle to exactly one
//! [`Exporter`], chosen at startup:
//!
//! - [`PushExporter`] sends the exposition to a push gateway
//! - [`PrintExporter`] writes it to standard output (or any writer)

mod print;
mod push;

pub use print::PrintExporter;
pub use push::PushExporter;

use crate::registry::{MetricRegistry, RegistryError};
use std::future::Future;
use thiserror::Error;

/// Errors that can occur while exporting a registry.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The registry could not be rendered.
    #[error("Failed to render metrics: {0}")]
    Render(#[from] RegistryError),

    /// The push request could not be built or sent.
    #[error("Push request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The push gateway answered with a non-success status.
    #[error("Push endpoint returned {status}: {body}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Response body, as far as it could be read.
        body: String,
    },

    /// Writing the exposition failed.
    #[error("Failed to write metrics: {0}")]
    Io(#[from] std::io::Error),
}

/// Consumes a populated registry.
pub trait Exporter: Send + Sync {
    /// Exports every observed sample of the registry.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering or delivery fails. Nothing is retried.
    fn export(
        &self,
        registry: &MetricRegistry,
    ) -> impl Future<Output = Result<(), ExportError>> + Send;
}
