//! Collector configuration.
//!
//! Configuration is read from environment variables through a lookup function,
//! so callers can load it from the process environment or from any other map.
//!
//! - [`github`] - GitHub API client settings
//! - [`push`] - push gateway settings for batch mode

pub mod github;
pub mod push;

pub use github::GitHubConfig;
pub use push::PushConfig;

use crate::models::Identities;
use thiserror::Error;

/// Environment variable holding the organization identity.
pub const ENV_GITHUB_ORG: &str = "GITHUB_ORG";
/// Environment variable holding the user identity.
pub const ENV_GITHUB_USER: &str = "GITHUB_USER";

/// Errors that can occur while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Neither an organization nor a user was configured.
    #[error("GITHUB_ORG and GITHUB_USER both cannot be empty")]
    MissingIdentity,

    /// A required variable is missing or empty.
    #[error("Required configuration '{0}' is not set")]
    MissingVariable(&'static str),

    /// A numeric variable could not be parsed.
    #[error("Invalid value '{value}' for '{key}'")]
    InvalidNumber {
        /// The variable name.
        key: &'static str,
        /// The rejected value.
        value: String,
    },

    /// Field validation failed.
    #[error("Invalid configuration: {0}")]
    ValidationError(#[from] validator::ValidationErrors),
}

impl Identities {
    /// Loads identities from `GITHUB_ORG` and `GITHUB_USER`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingIdentity`] if both are unset or empty.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Self::new(lookup(ENV_GITHUB_ORG), lookup(ENV_GITHUB_USER))
    }

    /// Loads identities from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingIdentity`] if both are unset or empty.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }
}

/// Reads a variable from the process environment.
#[must_use]
pub fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

#[cfg(test)]
pub(crate) fn map_lookup<'a>(
    pairs: &'a [(&'a str, &'a str)],
) -> impl Fn(&str) -> Option<String> + 'a {
    move |key| {
        pairs
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| (*v).to_string())
    }
}
