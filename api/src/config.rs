//! Server configuration module.
//!
//! Handles loading configuration from environment variables with sensible defaults.

use anyhow::{Context, Result};
use shared::config::{env_lookup, GitHubConfig};
use shared::models::Identities;
use std::net::SocketAddr;

/// Environment variable holding the bind host.
pub const ENV_HOST: &str = "GITHUB2PROMETHEUS_HOST";
/// Environment variable holding the bind port.
pub const ENV_PORT: &str = "GITHUB2PROMETHEUS_PORT";

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;

/// Server configuration.
///
/// Configuration values can be set via environment variables:
/// - `GITHUB2PROMETHEUS_HOST`: The host address to bind to (default: "0.0.0.0")
/// - `GITHUB2PROMETHEUS_PORT`: The port to listen on (default: 8080)
/// - `GITHUB_ORG` / `GITHUB_USER`: Identities to collect (at least one)
/// - `GITHUB_TOKEN`, `GITHUB_API_URL`, `HTTP_TIMEOUT_SECS`: GitHub client settings
#[derive(Debug, Clone)]
pub struct Config {
    /// The host address to bind to.
    pub host: String,
    /// The port to listen on.
    pub port: u16,
    /// GitHub client settings.
    pub github: GitHubConfig,
    /// Identities whose repositories are collected on every scrape.
    pub identities: Identities,
}

impl Config {
    /// Creates a configuration with default bind address and GitHub settings.
    #[must_use]
    pub fn new(identities: Identities) -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            github: GitHubConfig::default(),
            identities,
        }
    }

    /// Creates a new configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Neither `GITHUB_ORG` nor `GITHUB_USER` is set
    /// - `GITHUB2PROMETHEUS_PORT` is set but cannot be parsed as a valid port number
    /// - The GitHub client settings are invalid
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(env_lookup)
    }

    /// Creates a new configuration through a lookup function.
    ///
    /// # Errors
    ///
    /// See [`Config::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let host = lookup(ENV_HOST).unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = lookup(ENV_PORT)
            .map(|p| p.parse::<u16>())
            .transpose()
            .with_context(|| format!("{ENV_PORT} is not a valid port number"))?
            .unwrap_or(DEFAULT_PORT);

        let identities = Identities::from_lookup(&lookup)?;
        let github = GitHubConfig::from_lookup(&lookup)?;

        Ok(Self {
            host,
            port,
            github,
            identities,
        })
    }

    /// Returns the socket address for binding.
    ///
    /// # Errors
    ///
    /// Returns an error if the host and port combination is not a valid socket address.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid socket address {}:{}", self.host, self.port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |key| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (*v).to_string())
        }
    }

    #[test]
    fn test_from_lookup_defaults() {
        let config = Config::from_lookup(lookup(&[("GITHUB_ORG", "function61")])).unwrap();

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.github, GitHubConfig::default());
        assert_eq!(config.identities.iter().count(), 1);
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("GITHUB_USER", "joonas"),
            ("GITHUB2PROMETHEUS_HOST", "127.0.0.1"),
            ("GITHUB2PROMETHEUS_PORT", "9100"),
            ("GITHUB_TOKEN", "ghp_x"),
        ]))
        .unwrap();

        assert_eq!(config.socket_addr().unwrap().to_string(), "127.0.0.1:9100");
        assert_eq!(config.github.token.as_deref(), Some("ghp_x"));
    }

    #[test]
    fn test_from_lookup_requires_identity() {
        let result = Config::from_lookup(lookup(&[]));
        assert!(result.is_err());
    }

    #[test]
    fn test_from_lookup_invalid_port() {
        let result = Config::from_lookup(lookup(&[
            ("GITHUB_ORG", "acme"),
            ("GITHUB2PROMETHEUS_PORT", "http"),
        ]));
        assert!(result.is_err());
    }

    #[test]
    fn test_socket_addr_invalid_host() {
        let mut config = Config::new(Identities::new(Some("acme".into()), None).unwrap());
        config.host = "not a host".to_string();

        assert!(config.socket_addr().is_err());
    }
}
