//! API route definitions.
//!
//! This module organizes all HTTP routes for the github2prometheus API server.

mod health;
mod metrics;

pub use health::health_routes;
pub use metrics::{metrics_routes, METRICS_PATH};
