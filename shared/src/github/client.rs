//! GitHub REST API page fetcher.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, LINK};
use reqwest::{Client, Url};

use super::error::SourceError;
use super::pagination::{next_link, FetchedPage, PageCursor, PageFetcher, PAGE_SIZE};
use crate::config::GitHubConfig;
use crate::models::{Identity, RepositoryRecord};

const USER_AGENT: &str = concat!("github2prometheus/", env!("CARGO_PKG_VERSION"));
const GITHUB_MEDIA_TYPE: &str = "application/vnd.github+json";

/// Lists repositories through the GitHub REST API.
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: Client,
    api_url: Url,
}

impl GitHubClient {
    /// Creates a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The API URL cannot be parsed
    /// - The token cannot be used as a header value
    /// - The HTTP client cannot be built
    pub fn new(config: &GitHubConfig) -> Result<Self, SourceError> {
        // Without a trailing slash `Url::join` would drop the last path segment.
        let base = if config.api_url.ends_with('/') {
            config.api_url.clone()
        } else {
            format!("{}/", config.api_url)
        };
        let api_url = Url::parse(&base).map_err(|e| SourceError::InvalidUrl {
            url: config.api_url.clone(),
            reason: e.to_string(),
        })?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_MEDIA_TYPE));

        if let Some(token) = &config.token {
            let mut auth_val = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|_| SourceError::InvalidToken)?;
            auth_val.set_sensitive(true);
            headers.insert(AUTHORIZATION, auth_val);
        }

        let http = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(config.timeout())
            .build()?;

        Ok(Self { http, api_url })
    }

    /// Returns the API base URL.
    #[must_use]
    pub fn api_url(&self) -> &Url {
        &self.api_url
    }

    /// Returns the URL of the first listing page for an identity.
    ///
    /// # Errors
    ///
    /// Returns an error if the identity name produces an invalid URL.
    pub fn first_page_url(&self, identity: &Identity) -> Result<Url, SourceError> {
        let path = match identity {
            Identity::Organization(name) => format!("orgs/{name}/repos"),
            Identity::User(name) => format!("users/{name}/repos"),
        };

        let mut url = self
            .api_url
            .join(&path)
            .map_err(|e| SourceError::InvalidUrl {
                url: path.clone(),
                reason: e.to_string(),
            })?;
        url.query_pairs_mut()
            .append_pair("per_page", &PAGE_SIZE.to_string())
            .append_pair("page", "1");
        Ok(url)
    }

    /// Parses a `next` link, which must stay on the API origin.
    ///
    /// The client sends its token with every request, so links to any other
    /// host are refused.
    fn next_page_url(&self, link: &str) -> Result<Url, SourceError> {
        let url = Url::parse(link).map_err(|e| SourceError::InvalidUrl {
            url: link.to_string(),
            reason: e.to_string(),
        })?;

        if url.origin() != self.api_url.origin() {
            return Err(SourceError::InvalidUrl {
                url: link.to_string(),
                reason: format!(
                    "next link leaves the API origin {}",
                    self.api_url.origin().ascii_serialization()
                ),
            });
        }
        Ok(url)
    }
}

impl PageFetcher for GitHubClient {
    async fn fetch_page(
        &self,
        identity: &Identity,
        cursor: &PageCursor,
    ) -> Result<FetchedPage, SourceError> {
        let url = match cursor {
            PageCursor::First => self.first_page_url(identity)?,
            PageCursor::Next(url) => url.clone(),
        };

        let response = self.http.get(url.clone()).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(
                identity = %identity,
                status = status.as_u16(),
                %url,
                "GitHub API request failed"
            );
            return Err(SourceError::Status {
                status: status.as_u16(),
                url: url.to_string(),
                body,
            });
        }

        let next = response
            .headers()
            .get(LINK)
            .and_then(|value| value.to_str().ok())
            .and_then(next_link)
            .map(|link| self.next_page_url(link))
            .transpose()?;

        let repositories = response.json::<Vec<RepositoryRecord>>().await?;

        Ok(FetchedPage { repositories, next })
    }
}
