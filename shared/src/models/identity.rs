//! GitHub identities whose repositories are collected.

use crate::config::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An account whose repositories are listed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "lowercase")]
pub enum Identity {
    /// A GitHub organization (`/orgs/{name}/repos`).
    Organization(String),
    /// A GitHub user (`/users/{name}/repos`).
    User(String),
}

impl Identity {
    /// Returns the account name. This is the value of the `owner` label.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Organization(name) | Self::User(name) => name,
        }
    }

    /// Returns a short description of the identity kind.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Organization(_) => "organization",
            Self::User(_) => "user",
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}'", self.kind(), self.name())
    }
}

/// The configured set of identities for a collection cycle.
///
/// At least one of organization or user is always present. Empty names are
/// treated as "not configured".
///
/// # Example
///
/// ```
/// use shared::models::{Identities, Identity};
///
/// let identities = Identities::new(Some("function61".into()), Some(String::new())).unwrap();
/// let all: Vec<_> = identities.iter().cloned().collect();
///
/// assert_eq!(all, vec![Identity::Organization("function61".into())]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identities {
    organization: Option<Identity>,
    user: Option<Identity>,
}

impl Identities {
    /// Creates the identity set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingIdentity`] if both names are absent or empty.
    pub fn new(organization: Option<String>, user: Option<String>) -> Result<Self, ConfigError> {
        let organization = non_empty(organization).map(Identity::Organization);
        let user = non_empty(user).map(Identity::User);

        if organization.is_none() && user.is_none() {
            return Err(ConfigError::MissingIdentity);
        }

        Ok(Self { organization, user })
    }

    /// Identities in collection order: organization first, then user.
    pub fn iter(&self) -> impl Iterator<Item = &Identity> {
        self.organization.iter().chain(self.user.iter())
    }

    /// Returns the configured organization, if any.
    #[must_use]
    pub fn organization(&self) -> Option<&Identity> {
        self.organization.as_ref()
    }

    /// Returns the configured user, if any.
    #[must_use]
    pub fn user(&self) -> Option<&Identity> {
        self.user.as_ref()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
