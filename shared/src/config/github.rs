//! GitHub API client configuration.

use super::{env_lookup, ConfigError};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use validator::Validate;

/// Environment variable holding the optional API token.
pub const ENV_GITHUB_TOKEN: &str = "GITHUB_TOKEN";
/// Environment variable overriding the API base URL.
pub const ENV_GITHUB_API_URL: &str = "GITHUB_API_URL";
/// Environment variable holding the outbound request timeout in seconds.
pub const ENV_HTTP_TIMEOUT_SECS: &str = "HTTP_TIMEOUT_SECS";

/// Public GitHub REST API.
pub const DEFAULT_API_URL: &str = "https://api.github.com";
/// Default outbound request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Settings for the GitHub repository listing client.
///
/// # Example
///
/// ```
/// use shared::config::GitHubConfig;
///
/// let config = GitHubConfig::default().with_token("ghp_example");
/// assert_eq!(config.api_url, "https://api.github.com");
/// assert!(config.validate_config().is_ok());
/// ```
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct GitHubConfig {
    /// API base URL.
    #[validate(url(message = "GitHub API URL must be a valid URL"))]
    pub api_url: String,

    /// Optional token; raises the API rate limit when set.
    #[serde(skip_serializing)]
    pub token: Option<String>,

    /// Outbound request timeout in seconds.
    #[validate(range(min = 1, message = "Timeout must be at least one second"))]
    pub timeout_secs: u64,
}

impl std::fmt::Debug for GitHubConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubConfig")
            .field("api_url", &self.api_url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl GitHubConfig {
    /// Loads the configuration through a lookup function.
    ///
    /// Unset or empty variables fall back to defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the timeout is not a number or validation fails.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let timeout_secs = non_empty(ENV_HTTP_TIMEOUT_SECS)
            .map(|v| {
                v.trim().parse::<u64>().map_err(|_| ConfigError::InvalidNumber {
                    key: ENV_HTTP_TIMEOUT_SECS,
                    value: v,
                })
            })
            .transpose()?
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let config = Self {
            api_url: non_empty(ENV_GITHUB_API_URL).unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            token: non_empty(ENV_GITHUB_TOKEN),
            timeout_secs,
        };
        config.validate_config()?;
        Ok(config)
    }

    /// Loads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the timeout is not a number or validation fails.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    /// Sets the API base URL.
    #[must_use]
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Sets the API token.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Sets the request timeout in seconds.
    #[must_use]
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Returns the request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is malformed or the timeout is zero.
    pub fn validate_config(&self) -> Result<(), ConfigError> {
        self.validate()?;
        Ok(())
    }
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            token: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}
