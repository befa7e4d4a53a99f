//! GitHub repository source.
//!
//! - [`GitHubClient`] fetches single listing pages over the REST API
//! - [`RepositorySource`] follows pagination and yields every repository

mod client;
mod error;
mod pagination;

pub use client::GitHubClient;
pub use error::SourceError;
pub use pagination::{
    next_link, FetchedPage, PageCursor, PageFetcher, RepositoryPage, RepositorySource, PAGE_SIZE,
};

#[cfg(test)]
pub(crate) use pagination::fake;
