// tests/http_clients.rs
// Unsplash, Gemini and image download clients against a mock HTTP server

mod common;

use baking_gallery::errors::GalleryError;
use baking_gallery::models::SearchRequest;
use baking_gallery::services::{
    GeminiClient, HttpImageFetcher, ImageDescriber, ImageFetcher, PhotoSearch, UnsplashClient,
};
use common::jpeg;
use serde_json::{json, Value};
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SEARCH_BODY: &str = r#"{
    "total": 2,
    "total_pages": 1,
    "results": [
        {
            "id": "first",
            "width": 5000,
            "height": 3333,
            "description": "Fresh bread",
            "alt_description": null,
            "urls": {"raw": "r1", "full": "f1", "regular": "g1", "small": "s1", "thumb": "t1"},
            "user": {"first_name": "Ana", "last_name": "Lopez", "username": "ana"}
        },
        {
            "id": "second",
            "width": 4000,
            "height": 3000,
            "description": null,
            "alt_description": "strawberry tart",
            "urls": {"raw": "r2", "full": "f2", "regular": "g2", "small": "s2", "thumb": "t2"},
            "user": {"first_name": null, "last_name": null, "username": "tartlover"}
        }
    ]
}"#;

fn fetcher() -> HttpImageFetcher {
    HttpImageFetcher::new(Duration::from_secs(10), Duration::from_secs(15)).unwrap()
}

#[tokio::test]
async fn test_unsplash_search_sends_parameters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/photos"))
        .and(query_param("client_id", "access-key"))
        .and(query_param("query", "baking pastries food desserts"))
        .and(query_param("per_page", "10"))
        .and(query_param("orientation", "landscape"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(SEARCH_BODY.as_bytes().to_vec(), "application/json"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = UnsplashClient::with_base_url("access-key".to_string(), server.uri());
    let photos = client.search_photos(&SearchRequest::default()).await.unwrap();

    let ids: Vec<&str> = photos.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["first", "second"]);
    assert_eq!(photos[0].user.full_name(), "Ana Lopez");
    assert_eq!(photos[1].best_description(), "strawberry tart");
}

#[tokio::test]
async fn test_unsplash_rate_limit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/photos"))
        .respond_with(ResponseTemplate::new(403).set_body_string("Rate Limit Exceeded"))
        .mount(&server)
        .await;

    let client = UnsplashClient::with_base_url("access-key".to_string(), server.uri());
    let err = client.search(&SearchRequest::default()).await.unwrap_err();

    assert_eq!(err, GalleryError::RateLimitExceeded);
}

#[tokio::test]
async fn test_unsplash_error_lists_messages() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/photos"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"errors": ["OAuth error: invalid token"]})),
        )
        .mount(&server)
        .await;

    let client = UnsplashClient::with_base_url("bad-key".to_string(), server.uri());
    let err = client.search(&SearchRequest::default()).await.unwrap_err();

    let detail = err.detail().unwrap();
    assert!(detail.contains("401"));
    assert!(detail.contains("OAuth error: invalid token"));
}

#[tokio::test]
async fn test_gemini_returns_caption() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-1.5-flash:generateContent"))
        .and(query_param("key", "gem-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "A golden brioche."}]}
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = GeminiClient::with_base_url(
        "gem-key".to_string(),
        "gemini-1.5-flash".to_string(),
        server.uri(),
    );
    let text = client
        .describe(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A], "Describe it")
        .await
        .unwrap();
    assert_eq!(text.as_deref(), Some("A golden brioche."));

    let requests = server.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    let parts = &body["contents"][0]["parts"];
    assert_eq!(parts[0]["inline_data"]["mime_type"], "image/png");
    assert_eq!(parts[0]["inline_data"]["data"], "iVBORw0K");
    assert_eq!(parts[1]["text"], "Describe it");
}

#[tokio::test]
async fn test_gemini_surfaces_upstream_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/m:generateContent"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": {"code": 429, "message": "quota exceeded", "status": "RESOURCE_EXHAUSTED"}
        })))
        .mount(&server)
        .await;

    let client = GeminiClient::with_base_url("k".to_string(), "m".to_string(), server.uri());
    let err = client.describe(&jpeg(), "prompt").await.unwrap_err();

    assert_eq!(err.detail().as_deref(), Some("quota exceeded"));
}

#[tokio::test]
async fn test_gemini_without_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/m:generateContent"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"candidates": [{"finishReason": "SAFETY"}]})),
        )
        .mount(&server)
        .await;

    let client = GeminiClient::with_base_url("k".to_string(), "m".to_string(), server.uri());
    let text = client.describe(&jpeg(), "prompt").await.unwrap();

    assert_eq!(text, None);
}

#[tokio::test]
async fn test_image_fetcher_downloads_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/photo.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(jpeg(), "image/jpeg"))
        .expect(1)
        .mount(&server)
        .await;

    let bytes = fetcher()
        .fetch(&format!("{}/photo.jpg", server.uri()))
        .await
        .unwrap();

    assert_eq!(bytes, jpeg());
}

#[tokio::test]
async fn test_image_fetcher_rejects_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gone.jpg"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = fetcher()
        .fetch(&format!("{}/gone.jpg", server.uri()))
        .await
        .unwrap_err();

    assert!(matches!(err, GalleryError::ImageDownload(_)));
}

#[tokio::test]
async fn test_image_fetcher_rejects_html_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(b"<!doctype html><p>Sign in</p>".to_vec(), "text/html"),
        )
        .mount(&server)
        .await;

    let err = fetcher()
        .fetch(&format!("{}/login", server.uri()))
        .await
        .unwrap_err();

    assert!(matches!(err, GalleryError::ImageDownload(_)));
}

#[tokio::test]
async fn test_image_fetcher_rejects_undecodable_bytes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/blob"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(b"definitely not pixels".to_vec(), "application/octet-stream"),
        )
        .mount(&server)
        .await;

    let err = fetcher()
        .fetch(&format!("{}/blob", server.uri()))
        .await
        .unwrap_err();

    assert!(matches!(err, GalleryError::ImageDownload(_)));
}
