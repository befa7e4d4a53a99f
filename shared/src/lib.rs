//! github2prometheus Shared Library
//!
//! This crate contains the collection pipeline used by both the HTTP server and
//! the batch CLI: listing GitHub repositories, mapping them into metrics and
//! exporting those in the Prometheus text exposition format.
//!
//! # Modules
//!
//! - [`models`] - Repository, identity and observation models
//! - [`github`] - Paginated repository source backed by the GitHub REST API
//! - [`mapper`] - Repository to observation mapping
//! - [`registry`] - Metrics registry backed by the `prometheus` crate
//! - [`exposition`] - Text exposition rendering and parsing
//! - [`export`] - Push and print exporters
//! - [`collect`] - The collection cycle tying it all together
//! - [`config`] - Environment-driven configuration
//!
//! # Example
//!
//! ```
//! use chrono::Utc;
//! use shared::exposition;
//! use shared::mapper::repository_observations;
//! use shared::models::RepositoryRecord;
//! use shared::registry::MetricRegistry;
//!
//! let registry = MetricRegistry::new();
//! let repo = RepositoryRecord::new(1, "gokit").with_stargazers(12);
//!
//! for observation in repository_observations(&repo, Utc::now(), "function61") {
//!     registry.record(observation).unwrap();
//! }
//!
//! let text = exposition::render(&registry).unwrap();
//! assert_eq!(exposition::parse(&text).unwrap().len(), 5);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod collect;
pub mod config;
pub mod export;
pub mod exposition;
pub mod github;
pub mod mapper;
pub mod models;
pub mod registry;

/// Re-export common dependencies for convenience.
pub use chrono;
pub use serde;
pub use validator;
