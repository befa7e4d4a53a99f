//! Application state module.
//!
//! Defines the shared application state that is passed to route handlers.

use shared::config::GitHubConfig;
use shared::github::{GitHubClient, RepositorySource, SourceError};
use shared::models::Identities;
use std::sync::Arc;

/// Application state shared across all request handlers.
///
/// Holds only immutable collaborators. Every scrape builds its own registry,
/// so requests never share mutable state.
#[derive(Clone)]
pub struct AppState {
    /// Repository source used by every collection cycle.
    source: Arc<RepositorySource<GitHubClient>>,
    /// Identities to collect.
    identities: Arc<Identities>,
}

impl AppState {
    /// Creates a new application state.
    #[must_use]
    pub fn new(client: GitHubClient, identities: Identities) -> Self {
        Self {
            source: Arc::new(RepositorySource::new(client)),
            identities: Arc::new(identities),
        }
    }

    /// Creates the application state from GitHub client settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the GitHub client cannot be built.
    pub fn from_config(github: &GitHubConfig, identities: Identities) -> Result<Self, SourceError> {
        Ok(Self::new(GitHubClient::new(github)?, identities))
    }

    /// Returns the repository source.
    #[must_use]
    pub fn source(&self) -> &RepositorySource<GitHubClient> {
        self.source.as_ref()
    }

    /// Returns the configured identities.
    #[must_use]
    pub fn identities(&self) -> &Identities {
        self.identities.as_ref()
    }
}
