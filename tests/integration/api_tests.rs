// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{page_with_links, service, InMemoryFetcher, SITE};
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use keycrawl::application::use_cases::crawl_job_use_case::CrawlJobService;
use keycrawl::presentation::routes;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::util::ServiceExt;

fn site() -> Arc<InMemoryFetcher> {
    Arc::new(
        InMemoryFetcher::new()
            .page(SITE, &page_with_links("Welcome", &["/about"]))
            .page("http://example.com/about", "Security matters"),
    )
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn post_crawl(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/crawl")
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .unwrap()
}

fn get_crawl(id: &str) -> Request<Body> {
    Request::builder()
        .uri(format!("/crawl/{}", id))
        .body(Body::empty())
        .unwrap()
}

async fn wait_until_finished(app: &Router, id: &str) -> Value {
    for _ in 0..100 {
        let (status, body) = send(app.clone(), get_crawl(id)).await;
        assert_eq!(status, StatusCode::OK);
        if body["status"] != "ACTIVE" {
            return body;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("job {} did not finish", id);
}

#[tokio::test]
async fn test_create_and_poll_job() {
    let service = service(site(), Some(SITE));
    let app = routes::app(service.clone());

    let (status, body) = send(app.clone(), post_crawl(json!({"keyword": "security"}).to_string())).await;
    assert_eq!(status, StatusCode::OK);
    let id = body["id"].as_str().unwrap().to_string();
    assert_eq!(id.len(), 8);

    let body = wait_until_finished(&app, &id).await;
    assert_eq!(body["id"], id.as_str());
    assert_eq!(body["status"], "DONE");
    assert_eq!(body["urls"], json!(["http://example.com/about"]));
    assert!(body["completed_at"].is_string());
}

#[tokio::test]
async fn test_short_keyword_is_rejected_without_creating_a_job() {
    let service = service(site(), Some(SITE));
    let app = routes::app(service.clone());

    let (status, body) = send(app, post_crawl(json!({"keyword": "abc"}).to_string())).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "The search term must be between 4 and 32 characters."
    );
    assert!(service.registry().is_empty());
}

#[tokio::test]
async fn test_missing_or_malformed_keyword_is_rejected() {
    let service = service(site(), Some(SITE));
    let app = routes::app(service.clone());

    for payload in [r#"{}"#, r#"{"keyword": "   "}"#, r#"{"keyword": null}"#, "not json", ""] {
        let (status, body) = send(app.clone(), post_crawl(payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "payload {:?}", payload);
        assert_eq!(body["error"], "Keyword cannot be null or empty");
    }
    assert!(service.registry().is_empty());
}

#[tokio::test]
async fn test_missing_base_url_is_a_server_error() {
    let service = service(site(), None);
    let app = routes::app(service.clone());

    let (status, body) = send(app, post_crawl(json!({"keyword": "security"}).to_string())).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["error"],
        "BASE_URL environment variable is not set or empty."
    );
    assert!(service.registry().is_empty());
}

#[tokio::test]
async fn test_unknown_id_is_not_found() {
    let app = routes::app(service(site(), Some(SITE)));

    let (status, body) = send(app, get_crawl("unknown1")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Search ID not found");
}

#[tokio::test]
async fn test_active_job_exposes_partial_results() {
    let fetcher = Arc::new(
        InMemoryFetcher::new()
            .page(SITE, "security")
            .with_delay(Duration::from_millis(200)),
    );
    let service: Arc<CrawlJobService> = service(fetcher, Some(SITE));
    let app = routes::app(service.clone());

    let (_, body) = send(app.clone(), post_crawl(json!({"keyword": "security"}).to_string())).await;
    let id = body["id"].as_str().unwrap().to_string();

    let (status, body) = send(app.clone(), get_crawl(&id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ACTIVE");
    assert_eq!(body["urls"], json!([]));
    assert!(body["completed_at"].is_null());

    let body = wait_until_finished(&app, &id).await;
    assert_eq!(body["urls"], json!([SITE]));
}

#[tokio::test]
async fn test_start_page_without_trailing_slash_is_visited_once() {
    let fetcher = Arc::new(InMemoryFetcher::new().page(SITE, &page_with_links("security", &["/", "/about"])));
    let service = service(fetcher.clone(), Some("http://example.com"));
    let app = routes::app(service);

    let (_, body) = send(app.clone(), post_crawl(json!({"keyword": "security"}).to_string())).await;
    let id = body["id"].as_str().unwrap().to_string();

    let body = wait_until_finished(&app, &id).await;
    assert_eq!(body["urls"], json!([SITE]));
    assert_eq!(fetcher.requests(), vec![SITE, "http://example.com/about"]);
}
