//! Errors raised while listing repositories.

use thiserror::Error;

/// Errors that can occur while fetching repository pages.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Transport, timeout or body decoding failure.
    #[error("GitHub request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("GitHub API returned {status} for {url}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// The requested URL.
        url: String,
        /// Response body, as far as it could be read.
        body: String,
    },

    /// The API base URL or a pagination link could not be parsed.
    #[error("Invalid GitHub URL '{url}': {reason}")]
    InvalidUrl {
        /// The rejected URL.
        url: String,
        /// Parser message.
        reason: String,
    },

    /// A `next` link pointed at a page already fetched in this listing.
    #[error("GitHub pagination loops back to {url}")]
    PaginationLoop {
        /// The repeated page URL.
        url: String,
    },

    /// The configured token cannot be sent as a header.
    #[error("GitHub token contains characters not allowed in an HTTP header")]
    InvalidToken,
}
