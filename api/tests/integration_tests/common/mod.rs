//! Common test utilities and helpers for integration tests.
//!
//! This module provides shared functionality used across all integration tests,
//! including a fake GitHub API, test app setup and HTTP request helpers.

use api::{create_router, AppState};
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use shared::config::GitHubConfig;
use shared::models::Identities;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Builds a GitHub repository payload.
pub fn repo_json(id: u64, name: &str, stars: u64) -> Value {
    json!({
        "id": id,
        "name": name,
        "full_name": format!("acme/{name}"),
        "private": false,
        "owner": {"login": "acme", "type": "Organization"},
        "stargazers_count": stars,
        "watchers_count": stars,
        "size": 1024,
        "forks_count": 2,
        "open_issues_count": 1
    })
}

/// Mounts a paginated repository listing at `listing_path`.
///
/// Pages are linked with `Link: <...>; rel="next"` headers like the real API.
pub async fn mount_listing(server: &MockServer, listing_path: &str, pages: Vec<Vec<Value>>) {
    let count = pages.len();

    for (index, repos) in pages.into_iter().enumerate() {
        let number = index + 1;
        let mut response = ResponseTemplate::new(200).set_body_json(Value::Array(repos));

        if number < count {
            let next = format!(
                "{}{listing_path}?per_page=100&page={}",
                server.uri(),
                number + 1
            );
            response = response.insert_header("link", format!("<{next}>; rel=\"next\"").as_str());
        }

        Mock::given(method("GET"))
            .and(path(listing_path))
            .and(query_param("page", number.to_string().as_str()))
            .respond_with(response)
            .mount(server)
            .await;
    }
}

/// Mounts an error response for one page of a listing.
pub async fn mount_failing_page(server: &MockServer, listing_path: &str, page: usize, status: u16) {
    Mock::given(method("GET"))
        .and(path(listing_path))
        .and(query_param("page", page.to_string().as_str()))
        .respond_with(ResponseTemplate::new(status).set_body_string("upstream exploded"))
        .with_priority(1)
        .mount(server)
        .await;
}

/// Creates a test router talking to the fake GitHub API.
///
/// # Returns
///
/// A tuple containing the configured router and the app state.
pub fn test_app(server: &MockServer, identities: Identities) -> (Router, AppState) {
    let github = GitHubConfig::default().with_api_url(server.uri());
    let state = AppState::from_config(&github, identities).unwrap();
    let router = create_router(state.clone());
    (router, state)
}

/// Identities with only an organization.
pub fn organization(name: &str) -> Identities {
    Identities::new(Some(name.to_string()), None).unwrap()
}

/// Helper to make a GET request.
///
/// # Returns
///
/// A tuple containing the response status code, the content type and the body text.
pub async fn get(app: Router, uri: &str) -> (StatusCode, Option<String>, String) {
    let response = tower::ServiceExt::oneshot(
        app,
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap();

    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string);
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = String::from_utf8(body_bytes.to_vec()).unwrap();

    (status, content_type, body)
}
