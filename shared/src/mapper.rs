//! Repository to observation mapping.

use crate::models::{Observation, RepositoryRecord};
use chrono::{DateTime, Utc};

/// Stargazer count metric.
pub const GITHUB_STARS: &str = "github_stars";
/// Watcher count metric.
pub const GITHUB_WATCHERS: &str = "github_watchers";
/// Repository size metric.
pub const GITHUB_SIZE: &str = "github_size";
/// Fork count metric.
pub const GITHUB_FORKS: &str = "github_forks";
/// Open issue count metric.
pub const GITHUB_ISSUES_OPEN: &str = "github_issues_open";

/// Number of observations produced per repository.
pub const OBSERVATIONS_PER_REPOSITORY: usize = 5;

/// Maps one repository into its five observations.
///
/// Every observation carries the labels `id`, `owner` and `repo`. `owner` is the
/// configured identity the repository was listed for, not the repository's own
/// owner field.
///
/// # Example
///
/// ```
/// use chrono::Utc;
/// use shared::mapper::repository_observations;
/// use shared::models::RepositoryRecord;
///
/// let repo = RepositoryRecord::new(1, "gokit").with_stargazers(7);
/// let observations = repository_observations(&repo, Utc::now(), "function61");
///
/// assert_eq!(observations[0].name, "github_stars");
/// assert_eq!(observations[0].value, 7.0);
/// ```
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn repository_observations(
    repo: &RepositoryRecord,
    timestamp: DateTime<Utc>,
    owner: &str,
) -> [Observation; OBSERVATIONS_PER_REPOSITORY] {
    let observe = |name: &str, help: &str, value: u64| {
        Observation::gauge(name, help, value as f64)
            .with_label("id", repo.id.to_string())
            .with_label("repo", repo.name.as_str())
            .with_label("owner", owner)
            .with_timestamp(timestamp)
    };

    [
        observe(
            GITHUB_STARS,
            "Number of stargazers of the repository",
            repo.stargazers_count,
        ),
        observe(
            GITHUB_WATCHERS,
            "Number of watchers of the repository",
            repo.watchers_count,
        ),
        observe(
            GITHUB_SIZE,
            "Size of the repository in kilobytes",
            repo.size,
        ),
        observe(
            GITHUB_FORKS,
            "Number of forks of the repository",
            repo.forks_count,
        ),
        observe(
            GITHUB_ISSUES_OPEN,
            "Number of open issues of the repository",
            repo.open_issues_count,
        ),
    ]
}
