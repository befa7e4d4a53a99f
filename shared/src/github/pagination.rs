//! Paginated repository listing.
//!
//! [`RepositorySource`] turns a [`PageFetcher`] into a lazy stream of pages or
//! repositories, following `next` links until the listing is exhausted. The
//! first failing page ends the stream with its error, and so does a `next` link
//! back to a page already visited.

use std::collections::HashSet;
use std::future::Future;

use chrono::{DateTime, Utc};
use futures::stream::{self, Stream, TryStreamExt};
use reqwest::Url;

use super::error::SourceError;
use crate::models::{Identity, RepositoryRecord};

/// Repositories requested per page.
pub const PAGE_SIZE: u8 = 100;

/// Position in a paginated listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageCursor {
    /// The first page of the listing.
    First,
    /// A page addressed by the `next` link of the previous response.
    Next(Url),
}

/// One page as returned by a [`PageFetcher`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchedPage {
    /// Repositories on this page.
    pub repositories: Vec<RepositoryRecord>,
    /// Link to the following page; `None` on the last page.
    pub next: Option<Url>,
}

/// One page as yielded by a [`RepositorySource`].
#[derive(Debug, Clone, PartialEq)]
pub struct RepositoryPage {
    /// One-based page number within this listing.
    pub number: u32,
    /// When the page arrived. Used as the timestamp of its observations.
    pub fetched_at: DateTime<Utc>,
    /// Repositories on this page.
    pub repositories: Vec<RepositoryRecord>,
}

/// Fetches a single page of an identity's repository listing.
///
/// Implementations must be thread-safe (Send + Sync).
pub trait PageFetcher: Send + Sync {
    /// Fetches the page addressed by `cursor`.
    ///
    /// # Errors
    ///
    /// Returns an error if the page cannot be fetched or decoded.
    fn fetch_page(
        &self,
        identity: &Identity,
        cursor: &PageCursor,
    ) -> impl Future<Output = Result<FetchedPage, SourceError>> + Send;
}

/// Where a listing stands between two pages.
#[derive(Debug)]
struct ListingState {
    cursor: PageCursor,
    number: u32,
    visited: HashSet<Url>,
}

/// Lists all repositories of an identity, hiding pagination.
#[derive(Debug, Clone)]
pub struct RepositorySource<F> {
    fetcher: F,
}

impl<F: PageFetcher> RepositorySource<F> {
    /// Creates a source over the given page fetcher.
    #[must_use]
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }

    /// Returns the underlying page fetcher.
    #[must_use]
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Streams the listing page by page, starting from the first page.
    ///
    /// Every call starts a new listing. The stream ends after the last page
    /// or right after yielding the first error.
    pub fn pages<'a>(
        &'a self,
        identity: &'a Identity,
    ) -> impl Stream<Item = Result<RepositoryPage, SourceError>> + Send + 'a {
        let start = ListingState {
            cursor: PageCursor::First,
            number: 1,
            visited: HashSet::new(),
        };
        stream::try_unfold(Some(start), move |state| self.next_page(identity, state))
    }

    /// Streams all repositories of the identity across pages.
    pub fn repositories<'a>(
        &'a self,
        identity: &'a Identity,
    ) -> impl Stream<Item = Result<RepositoryRecord, SourceError>> + Send + 'a {
        self.pages(identity)
            .map_ok(|page| stream::iter(page.repositories.into_iter().map(Ok::<_, SourceError>)))
            .try_flatten()
    }

    /// Collects all repositories of the identity.
    ///
    /// # Errors
    ///
    /// Returns the first page error; repositories of earlier pages are discarded.
    pub async fn list_all(&self, identity: &Identity) -> Result<Vec<RepositoryRecord>, SourceError> {
        self.repositories(identity).try_collect().await
    }

    async fn next_page(
        &self,
        identity: &Identity,
        state: Option<ListingState>,
    ) -> Result<Option<(RepositoryPage, Option<ListingState>)>, SourceError> {
        let Some(ListingState {
            cursor,
            number,
            mut visited,
        }) = state
        else {
            return Ok(None);
        };

        let fetched = self.fetcher.fetch_page(identity, &cursor).await?;
        let page = RepositoryPage {
            number,
            fetched_at: Utc::now(),
            repositories: fetched.repositories,
        };

        tracing::debug!(
            identity = %identity,
            page = number,
            repositories = page.repositories.len(),
            has_next = fetched.next.is_some(),
            "Fetched repository page"
        );

        if let PageCursor::Next(url) = cursor {
            visited.insert(url);
        }

        let next_state = match fetched.next {
            Some(url) if visited.contains(&url) => {
                tracing::warn!(identity = %identity, %url, "Pagination link repeats a visited page");
                return Err(SourceError::PaginationLoop {
                    url: url.to_string(),
                });
            }
            Some(url) => Some(ListingState {
                cursor: PageCursor::Next(url),
                number: number + 1,
                visited,
            }),
            None => None,
        };
        Ok(Some((page, next_state)))
    }
}

/// Returns the `rel="next"` target of a `Link` header value.
///
/// ```
/// use shared::github::next_link;
///
/// let header = r#"<https://api.github.com/orgs/acme/repos?page=2>; rel="next", <https://api.github.com/orgs/acme/repos?page=5>; rel="last""#;
/// assert_eq!(next_link(header), Some("https://api.github.com/orgs/acme/repos?page=2"));
/// assert_eq!(next_link(r#"<https://x/?page=1>; rel="prev""#), None);
/// ```
#[must_use]
pub fn next_link(header: &str) -> Option<&str> {
    header.split(',').find_map(|part| {
        let mut params = part.split(';');
        let target = params.next()?.trim();
        let is_next = params.any(|param| {
            let param = param.trim();
            param == "rel=\"next\"" || param == "rel=next"
        });

        if is_next {
            target.strip_prefix('<')?.strip_suffix('>')
        } else {
            None
        }
    })
}
