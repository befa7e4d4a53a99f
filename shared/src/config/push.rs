//! Push gateway configuration.

use super::{env_lookup, ConfigError};
use validator::Validate;

/// Environment variable holding the push endpoint URL.
pub const ENV_PUSH_ENDPOINT: &str = "PROMPIPE_ENDPOINT";
/// Environment variable holding the push bearer token.
pub const ENV_PUSH_AUTH_TOKEN: &str = "PROMPIPE_AUTHTOKEN";

/// Where and how batch mode pushes the exposition.
///
/// # Example
///
/// ```
/// use shared::config::PushConfig;
///
/// let config = PushConfig::new("https://prompipe.example.com/metrics", "token").unwrap();
/// assert_eq!(config.auth_token, "token");
///
/// assert!(PushConfig::new("https://prompipe.example.com/metrics", "").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Validate)]
pub struct PushConfig {
    /// Endpoint receiving the exposition body.
    #[validate(url(message = "Push endpoint must be a valid URL"))]
    pub endpoint: String,

    /// Bearer token sent with every push.
    #[validate(length(min = 1, message = "Push auth token cannot be empty"))]
    pub auth_token: String,
}

impl std::fmt::Debug for PushConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PushConfig")
            .field("endpoint", &self.endpoint)
            .field("auth_token", &"<redacted>")
            .finish()
    }
}

impl PushConfig {
    /// Creates and validates a push configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is not a URL or the token is empty.
    pub fn new(
        endpoint: impl Into<String>,
        auth_token: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            endpoint: endpoint.into(),
            auth_token: auth_token.into(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Loads the configuration through a lookup function.
    ///
    /// # Errors
    ///
    /// Returns an error if either variable is missing or validation fails.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |key: &'static str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::MissingVariable(key))
        };

        Self::new(required(ENV_PUSH_ENDPOINT)?, required(ENV_PUSH_AUTH_TOKEN)?)
    }

    /// Loads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if either variable is missing or validation fails.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }
}
