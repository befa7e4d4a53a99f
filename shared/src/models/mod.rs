//! Data models for github2prometheus.
//!
//! This module contains the repository snapshot, the identities it is listed
//! for, and the observations derived from it.

pub mod identity;
pub mod observation;
pub mod repository;

pub use identity::{Identities, Identity};
pub use observation::{LabelSet, MetricType, Observation};
pub use repository::{RepositoryOwner, RepositoryRecord};
