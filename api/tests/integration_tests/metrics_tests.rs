//! Integration tests for the `/metrics` scrape endpoint.
//!
//! Tests cover:
//! - Exposition content for single and multi-page listings
//! - Organization and user identities together
//! - All-or-nothing behavior when GitHub fails mid-listing
//! - Fresh upstream calls on every scrape

use axum::http::StatusCode;
use serde_json::Value;
use shared::exposition::{parse, CONTENT_TYPE};
use shared::models::Identities;
use wiremock::MockServer;

use super::common::{
    get, mount_failing_page, mount_listing, organization, repo_json, test_app,
};

fn page_of(ids: std::ops::Range<u64>) -> Vec<Value> {
    ids.map(|id| repo_json(id, &format!("repo-{id}"), id)).collect()
}

#[tokio::test]
async fn test_scrape_single_page_organization() {
    let server = MockServer::start().await;
    mount_listing(
        &server,
        "/orgs/acme/repos",
        vec![vec![
            repo_json(1, "varasto", 12),
            repo_json(2, "gokit", 30),
            repo_json(3, "prompipe", 4),
        ]],
    )
    .await;
    let (app, _state) = test_app(&server, organization("acme"));

    let (status, content_type, body) = get(app, "/metrics").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some(CONTENT_TYPE));

    let samples = parse(&body).unwrap();
    assert_eq!(samples.len(), 15);
    assert_eq!(body.lines().filter(|l| l.starts_with("# HELP ")).count(), 5);
    assert_eq!(body.lines().filter(|l| l.starts_with("# TYPE ")).count(), 5);
    assert!(samples.iter().all(|s| s.labels["owner"] == "acme"));
    assert!(samples.iter().all(|s| s.timestamp_ms.is_some()));

    let gokit_stars = samples
        .iter()
        .find(|s| s.name == "github_stars" && s.labels["repo"] == "gokit")
        .unwrap();
    assert_eq!(gokit_stars.value, 30.0);
    assert_eq!(gokit_stars.labels["id"], "2");

    let size = samples
        .iter()
        .find(|s| s.name == "github_size" && s.labels["repo"] == "varasto")
        .unwrap();
    assert_eq!(size.value, 1024.0);
}

#[tokio::test]
async fn test_scrape_follows_pagination() {
    let server = MockServer::start().await;
    mount_listing(
        &server,
        "/orgs/acme/repos",
        vec![page_of(0..100), page_of(100..200), page_of(200..250)],
    )
    .await;
    let (app, _state) = test_app(&server, organization("acme"));

    let (status, _, body) = get(app, "/metrics").await;

    assert_eq!(status, StatusCode::OK);
    let samples = parse(&body).unwrap();
    assert_eq!(samples.len(), 250 * 5);
    assert_eq!(server.received_requests().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_scrape_organization_and_user() {
    let server = MockServer::start().await;
    mount_listing(&server, "/orgs/acme/repos", vec![page_of(0..2)]).await;
    mount_listing(&server, "/users/joonas/repos", vec![page_of(10..13)]).await;
    let identities = Identities::new(Some("acme".to_string()), Some("joonas".to_string())).unwrap();
    let (app, _state) = test_app(&server, identities);

    let (status, _, body) = get(app, "/metrics").await;

    assert_eq!(status, StatusCode::OK);
    let samples = parse(&body).unwrap();
    let by_owner = |owner: &str| samples.iter().filter(|s| s.labels["owner"] == owner).count();
    assert_eq!(by_owner("acme"), 10);
    assert_eq!(by_owner("joonas"), 15);
}

#[tokio::test]
async fn test_scrape_failure_mid_listing_returns_500_without_metrics() {
    let server = MockServer::start().await;
    mount_listing(
        &server,
        "/orgs/acme/repos",
        vec![page_of(0..100), page_of(100..200), page_of(200..210)],
    )
    .await;
    mount_failing_page(&server, "/orgs/acme/repos", 2, 502).await;
    let (app, _state) = test_app(&server, organization("acme"));

    let (status, content_type, body) = get(app, "/metrics").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(content_type.as_deref(), Some("text/plain; charset=utf-8"));
    assert!(body.contains("organization 'acme'"));
    assert!(body.contains("502"));
    assert!(!body.contains("github_stars"));
}

#[tokio::test]
async fn test_scrape_failure_in_second_identity_discards_first() {
    let server = MockServer::start().await;
    mount_listing(&server, "/orgs/acme/repos", vec![page_of(0..3)]).await;
    mount_failing_page(&server, "/users/ghost/repos", 1, 404).await;
    let identities = Identities::new(Some("acme".to_string()), Some("ghost".to_string())).unwrap();
    let (app, _state) = test_app(&server, identities);

    let (status, _, body) = get(app, "/metrics").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.contains("user 'ghost'"));
    assert!(!body.contains("github_"));
}

#[tokio::test]
async fn test_every_scrape_fetches_again() {
    let server = MockServer::start().await;
    mount_listing(&server, "/orgs/acme/repos", vec![page_of(0..1)]).await;
    let (app, _state) = test_app(&server, organization("acme"));

    let (first, _, _) = get(app.clone(), "/metrics").await;
    let (second, _, _) = get(app, "/metrics").await;

    assert_eq!(first, StatusCode::OK);
    assert_eq!(second, StatusCode::OK);
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_empty_organization_serves_empty_exposition() {
    let server = MockServer::start().await;
    mount_listing(&server, "/orgs/acme/repos", vec![Vec::new()]).await;
    let (app, _state) = test_app(&server, organization("acme"));

    let (status, _, body) = get(app, "/metrics").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.is_empty());
}
