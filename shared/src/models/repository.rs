//! Repository data model.
//!
//! Defines the `RepositoryRecord` snapshot as returned by the GitHub repository
//! listing endpoints. Only the fields needed for metrics are decoded; everything
//! else in the payload is ignored.

use serde::{Deserialize, Serialize};

/// The account owning a repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryOwner {
    /// Login name of the owning user or organization.
    pub login: String,
}

/// A snapshot of a single repository's statistics.
///
/// # Example
///
/// ```
/// use shared::models::RepositoryRecord;
///
/// let repo = RepositoryRecord::new(42, "varasto")
///     .with_stargazers(10)
///     .with_forks(2);
///
/// assert_eq!(repo.stargazers_count, 10);
/// assert_eq!(repo.forks_count, 2);
/// assert_eq!(repo.open_issues_count, 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryRecord {
    /// Numeric repository ID.
    pub id: u64,

    /// Repository name (without the owner prefix).
    pub name: String,

    /// The owning account, if present in the payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<RepositoryOwner>,

    /// Number of stargazers.
    #[serde(default)]
    pub stargazers_count: u64,

    /// Number of watchers.
    #[serde(default)]
    pub watchers_count: u64,

    /// Repository size in kilobytes.
    #[serde(default)]
    pub size: u64,

    /// Number of forks.
    #[serde(default)]
    pub forks_count: u64,

    /// Number of open issues (GitHub counts open pull requests here too).
    #[serde(default)]
    pub open_issues_count: u64,
}

impl RepositoryRecord {
    /// Creates a record with all counters at zero.
    #[must_use]
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            owner: None,
            stargazers_count: 0,
            watchers_count: 0,
            size: 0,
            forks_count: 0,
            open_issues_count: 0,
        }
    }

    /// Sets the owning account.
    #[must_use]
    pub fn with_owner(mut self, login: impl Into<String>) -> Self {
        self.owner = Some(RepositoryOwner {
            login: login.into(),
        });
        self
    }

    /// Sets the stargazer count.
    #[must_use]
    pub fn with_stargazers(mut self, count: u64) -> Self {
        self.stargazers_count = count;
        self
    }

    /// Sets the watcher count.
    #[must_use]
    pub fn with_watchers(mut self, count: u64) -> Self {
        self.watchers_count = count;
        self
    }

    /// Sets the repository size.
    #[must_use]
    pub fn with_size(mut self, size: u64) -> Self {
        self.size = size;
        self
    }

    /// Sets the fork count.
    #[must_use]
    pub fn with_forks(mut self, count: u64) -> Self {
        self.forks_count = count;
        self
    }

    /// Sets the open issue count.
    #[must_use]
    pub fn with_open_issues(mut self, count: u64) -> Self {
        self.open_issues_count = count;
        self
    }
}
