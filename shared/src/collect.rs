//! Collection cycle.
//!
//! One cycle lists the repositories of every configured identity, maps them
//! into observations and records those into a fresh [`MetricRegistry`]. A cycle
//! is all-or-nothing: the registry is only returned if every page of every
//! identity was fetched successfully.

use std::pin::pin;

use futures::TryStreamExt;
use thiserror::Error;

use crate::export::{ExportError, Exporter};
use crate::github::{PageFetcher, RepositorySource, SourceError};
use crate::mapper::repository_observations;
use crate::models::{Identities, Identity};
use crate::registry::{MetricRegistry, RegistryError};

/// Errors that can occur during a collection cycle.
#[derive(Debug, Error)]
pub enum CollectError {
    /// Listing the repositories of an identity failed.
    #[error("Failed to list repositories of {identity}: {source}")]
    Source {
        /// The identity being listed.
        identity: Identity,
        /// The underlying error.
        #[source]
        source: SourceError,
    },

    /// Recording an observation failed.
    #[error("Failed to record metrics: {0}")]
    Registry(#[from] RegistryError),

    /// Exporting the finished registry failed.
    #[error("Failed to export metrics: {0}")]
    Export(#[from] ExportError),
}

/// Summary of a finished collection cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CycleStats {
    /// Repositories seen across all identities.
    pub repositories: usize,
    /// Pages fetched across all identities.
    pub pages: usize,
    /// Observed samples in the registry.
    pub samples: usize,
}

/// Runs one collection cycle and returns the populated registry.
///
/// # Errors
///
/// Returns the first upstream or registry error. No partial registry is returned.
pub async fn collect<F: PageFetcher>(
    source: &RepositorySource<F>,
    identities: &Identities,
) -> Result<MetricRegistry, CollectError> {
    collect_with_stats(source, identities)
        .await
        .map(|(registry, _)| registry)
}

/// Runs one collection cycle and returns the registry together with statistics.
///
/// # Errors
///
/// Returns the first upstream or registry error. No partial registry is returned.
pub async fn collect_with_stats<F: PageFetcher>(
    source: &RepositorySource<F>,
    identities: &Identities,
) -> Result<(MetricRegistry, CycleStats), CollectError> {
    let registry = MetricRegistry::new();
    let mut stats = CycleStats::default();

    for identity in identities.iter() {
        let mut pages = pin!(source.pages(identity));
        let mut repositories = 0;

        while let Some(page) = pages
            .try_next()
            .await
            .map_err(|source| CollectError::Source {
                identity: identity.clone(),
                source,
            })?
        {
            stats.pages += 1;
            repositories += page.repositories.len();

            for repo in &page.repositories {
                for observation in repository_observations(repo, page.fetched_at, identity.name()) {
                    registry.record(observation)?;
                }
            }
        }

        tracing::info!(identity = %identity, repositories, "Collected repository statistics");
        stats.repositories += repositories;
    }

    stats.samples = registry.sample_count()?;
    Ok((registry, stats))
}

/// Runs one collection cycle and hands the registry to an exporter.
///
/// Nothing is exported if collection fails.
///
/// # Errors
///
/// Returns the collection or export error.
pub async fn collect_and_export<F: PageFetcher, E: Exporter>(
    source: &RepositorySource<F>,
    identities: &Identities,
    exporter: &E,
) -> Result<CycleStats, CollectError> {
    let (registry, stats) = collect_with_stats(source, identities).await?;
    exporter.export(&registry).await?;
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::PrintExporter;
    use crate::exposition;
    use crate::github::fake::{repos, FakeFetcher};
    use crate::mapper::OBSERVATIONS_PER_REPOSITORY;

    fn acme() -> Identities {
        Identities::new(Some("acme".to_string()), None).unwrap()
    }

    #[tokio::test]
    async fn test_single_page_organization() {
        let source = RepositorySource::new(FakeFetcher::with_pages(vec![repos(1..4)]));

        let (registry, stats) = collect_with_stats(&source, &acme()).await.unwrap();

        assert_eq!(registry.sample_count().unwrap(), 15);
        assert_eq!(
            stats,
            CycleStats {
                repositories: 3,
                pages: 1,
                samples: 15,
            }
        );

        let text = exposition::render(&registry).unwrap();
        let sample_lines = text.lines().filter(|l| !l.starts_with('#')).count();
        let help_lines = text.lines().filter(|l| l.starts_with("# HELP")).count();
        let type_lines = text.lines().filter(|l| l.starts_with("# TYPE")).count();
        assert_eq!(sample_lines, 15);
        assert_eq!(help_lines, OBSERVATIONS_PER_REPOSITORY);
        assert_eq!(type_lines, OBSERVATIONS_PER_REPOSITORY);

        let samples = exposition::parse(&text).unwrap();
        assert!(samples.iter().all(|s| s.labels["owner"] == "acme"));
    }

    #[tokio::test]
    async fn test_observation_values_come_from_records() {
        let source = RepositorySource::new(FakeFetcher::with_pages(vec![repos(2..3)]));

        let registry = collect(&source, &acme()).await.unwrap();

        let labels = [("id", "2"), ("owner", "acme"), ("repo", "repo-2")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let stars = registry.get("github_stars", &labels).unwrap().unwrap();
        let forks = registry.get("github_forks", &labels).unwrap().unwrap();
        assert_eq!(stars.value, 20.0);
        assert_eq!(forks.value, 2.0);
    }

    #[tokio::test]
    async fn test_failure_on_second_page_returns_no_registry() {
        let source = RepositorySource::new(
            FakeFetcher::with_pages(vec![repos(0..100), repos(100..200), repos(200..250)])
                .failing_on(2),
        );

        let result = collect(&source, &acme()).await;

        match result {
            Err(CollectError::Source { identity, source }) => {
                assert_eq!(identity, Identity::Organization("acme".to_string()));
                assert!(matches!(source, SourceError::Status { status: 502, .. }));
            }
            other => panic!("expected source error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_both_identities_are_collected() {
        let identities =
            Identities::new(Some("acme".to_string()), Some("joonas".to_string())).unwrap();
        let source = RepositorySource::new(FakeFetcher::with_pages(vec![repos(0..2)]));

        let (registry, stats) = collect_with_stats(&source, &identities).await.unwrap();

        // Same repositories under two owners are distinct samples.
        assert_eq!(stats.repositories, 4);
        assert_eq!(registry.sample_count().unwrap(), 20);
        assert_eq!(source.fetcher().calls(), 2);
    }

    #[tokio::test]
    async fn test_empty_listing_produces_empty_registry() {
        let source = RepositorySource::new(FakeFetcher::with_pages(vec![Vec::new()]));

        let registry = collect(&source, &acme()).await.unwrap();

        assert_eq!(registry.sample_count().unwrap(), 0);
        assert_eq!(exposition::render(&registry).unwrap(), "");
    }

    #[tokio::test]
    async fn test_collect_and_export_skips_export_on_failure() {
        let source = RepositorySource::new(
            FakeFetcher::with_pages(vec![repos(0..1), repos(1..2)]).failing_on(2),
        );
        let exporter = PrintExporter::new(Vec::new());

        let result = collect_and_export(&source, &acme(), &exporter).await;

        assert!(matches!(result, Err(CollectError::Source { .. })));
        assert!(exporter.into_inner().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_collect_and_export_writes_exposition() {
        let source = RepositorySource::new(FakeFetcher::with_pages(vec![repos(0..2)]));
        let exporter = PrintExporter::new(Vec::new());

        let stats = collect_and_export(&source, &acme(), &exporter).await.unwrap();

        assert_eq!(stats.samples, 10);
        let output = String::from_utf8(exporter.into_inner().unwrap()).unwrap();
        assert_eq!(exposition::parse(&output).unwrap().len(), 10);
    }
}
