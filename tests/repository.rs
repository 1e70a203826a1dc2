//! Integration tests for the content repository
//!
//! These tests verify catalog composition and the full PDF download
//! sequence against a local mock backend, including the cache interplay
//! that makes repeat downloads free.

use std::sync::Arc;

use serde_json::json;
use tempfile::TempDir;
use url::Url;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use lesson_fetcher::app::{ApiClient, ClientConfig, ContentRepository, PdfCache, SessionStore};
use lesson_fetcher::errors::{ApiError, DownloadError};

/// Wire up a repository backed by the mock server and a temp cache
async fn repository_for(
    server: &MockServer,
    temp_dir: &TempDir,
) -> (Arc<SessionStore>, Arc<PdfCache>, ContentRepository) {
    let session = Arc::new(SessionStore::new(temp_dir.path().join("session.json")));
    session.load_from_store().await.unwrap();

    let base_url = Url::parse(&server.uri()).unwrap();
    let api = Arc::new(ApiClient::new(base_url, Arc::clone(&session)).unwrap());
    let cache = Arc::new(
        PdfCache::new(temp_dir.path().join("downloads"))
            .await
            .unwrap(),
    );
    let repository =
        ContentRepository::new(api, Arc::clone(&cache), &ClientConfig::default()).unwrap();

    (session, cache, repository)
}

/// Video listing entry in the backend's wire shape
fn video_json(id: i64, title: &str, display_order: i32, pdfs: serde_json::Value) -> serde_json::Value {
    json!({
        "id": id,
        "videoId": format!("ext-{}", id),
        "title": title,
        "thumbnailUrl": "https://cdn.example.com/thumb.jpg",
        "duration": "10:00",
        "displayOrder": display_order,
        "pdfs": pdfs
    })
}

fn pdf_json(id: i64, title: &str, display_order: i32) -> serde_json::Value {
    json!({
        "id": id,
        "title": title,
        "pdfType": "WORKSHEET",
        "fileUrl": format!("s3://bucket/{}.pdf", id),
        "displayOrder": display_order
    })
}

#[tokio::test]
async fn test_home_sections_keeps_backend_order_and_sorts_videos() {
    let server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();
    let (_session, _cache, repository) = repository_for(&server, &temp_dir).await;

    Mock::given(method("GET"))
        .and(path("/api/sections"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"name": "Algebra"},
            {"name": "Geometry"}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/sections/Algebra/videos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            video_json(2, "Equations", 2, json!([])),
            video_json(1, "Numbers", 1, json!([])),
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/sections/Geometry/videos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let sections = repository.home_sections().await.unwrap();

    let names: Vec<&str> = sections.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Algebra", "Geometry"]);

    let algebra_ids: Vec<i64> = sections[0].videos.iter().map(|v| v.id).collect();
    assert_eq!(algebra_ids, vec![1, 2], "videos sorted by display order");
    assert!(sections[1].videos.is_empty());
}

#[tokio::test]
async fn test_home_sections_fails_when_any_section_fails() {
    let server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();
    let (_session, _cache, repository) = repository_for(&server, &temp_dir).await;

    Mock::given(method("GET"))
        .and(path("/api/sections"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"name": "Algebra"},
            {"name": "Geometry"}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/sections/Algebra/videos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/sections/Geometry/videos"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = repository.home_sections().await.unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 500, .. }));
}

#[tokio::test]
async fn test_video_by_id_walks_the_catalog() {
    let server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();
    let (_session, _cache, repository) = repository_for(&server, &temp_dir).await;

    Mock::given(method("GET"))
        .and(path("/api/sections"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"name": "Algebra"}])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/sections/Algebra/videos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            video_json(7, "Fractions", 1, json!([pdf_json(99, "Worksheet One", 1)])),
        ])))
        .mount(&server)
        .await;

    let video = repository.video_by_id(7).await.unwrap();
    assert_eq!(video.unwrap().title, "Fractions");

    let missing = repository.video_by_id(999).await.unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn test_download_pdf_streams_to_cache_and_records_mapping() {
    let server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();
    let (session, cache, repository) = repository_for(&server, &temp_dir).await;

    session
        .save_session("token-abc", 42, "Asha", "Rao", "asha@example.com")
        .await
        .unwrap();

    let signed_url = format!("{}/files/worksheet-99.pdf?sig=abc123", server.uri());

    // Issuing the signed URL requires the session token
    Mock::given(method("GET"))
        .and(path("/api/videos/7/pdfs/99/download"))
        .and(header("authorization", "Bearer token-abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "url": signed_url,
            "expiresInSeconds": 300
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/files/worksheet-99.pdf"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(b"%PDF-1.4 fake worksheet".to_vec(), "application/pdf"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let saved = repository
        .download_pdf(7, 99, Some(42), "Worksheet One")
        .await
        .unwrap();

    assert!(saved.ends_with("user-42/Worksheet One.pdf"));
    let content = tokio::fs::read(&saved).await.unwrap();
    assert_eq!(content, b"%PDF-1.4 fake worksheet");

    // The cache now resolves the pair without another transfer
    let cached = cache.get_path(Some(42), 7, 99).await.unwrap();
    assert_eq!(cached, Some(saved.clone()));

    // The signed-URL fetch itself must go out unauthenticated
    let requests = server.received_requests().await.unwrap();
    let transfer = requests
        .iter()
        .find(|r| r.url.path() == "/files/worksheet-99.pdf")
        .expect("transfer request not recorded");
    assert!(
        !transfer.headers.contains_key("authorization"),
        "signed-URL transfer must not carry an Authorization header"
    );

    // Second call is served from the cache; expect(1) above would fail
    // the test on any extra request
    let again = repository
        .download_pdf(7, 99, Some(42), "Worksheet One")
        .await
        .unwrap();
    assert_eq!(again, saved);
}

#[tokio::test]
async fn test_download_pdf_rejects_blank_signed_url() {
    let server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();
    let (session, _cache, repository) = repository_for(&server, &temp_dir).await;

    session
        .save_session("token-abc", 42, "Asha", "Rao", "asha@example.com")
        .await
        .unwrap();

    Mock::given(method("GET"))
        .and(path("/api/videos/7/pdfs/99/download"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "url": "   ",
            "expiresInSeconds": 0
        })))
        .mount(&server)
        .await;

    let err = repository
        .download_pdf(7, 99, Some(42), "Worksheet One")
        .await
        .unwrap_err();
    assert!(matches!(err, DownloadError::EmptySignedUrl));
}

#[tokio::test]
async fn test_download_pdf_failure_leaves_no_file_behind() {
    let server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();
    let (session, cache, repository) = repository_for(&server, &temp_dir).await;

    session
        .save_session("token-abc", 42, "Asha", "Rao", "asha@example.com")
        .await
        .unwrap();

    let signed_url = format!("{}/files/worksheet-99.pdf", server.uri());

    Mock::given(method("GET"))
        .and(path("/api/videos/7/pdfs/99/download"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "url": signed_url,
            "expiresInSeconds": 300
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/files/worksheet-99.pdf"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let err = repository
        .download_pdf(7, 99, Some(42), "Worksheet One")
        .await
        .unwrap_err();
    assert!(matches!(err, DownloadError::ServerError { status: 403 }));

    // Neither the final file nor the cache mapping may exist
    let destination = cache.destination(Some(42), "Worksheet One");
    assert!(!destination.exists());
    assert_eq!(cache.get_path(Some(42), 7, 99).await.unwrap(), None);
}

#[tokio::test]
async fn test_clearing_session_leaves_cache_intact() {
    let server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();
    let (session, cache, _repository) = repository_for(&server, &temp_dir).await;

    session
        .save_session("token-abc", 42, "Asha", "Rao", "asha@example.com")
        .await
        .unwrap();

    let saved = cache.destination(Some(42), "Worksheet One");
    tokio::fs::create_dir_all(saved.parent().unwrap())
        .await
        .unwrap();
    tokio::fs::write(&saved, b"%PDF-1.4 fake worksheet")
        .await
        .unwrap();
    cache.save_path(Some(42), 7, 99, &saved).await.unwrap();

    // Logging out erases the session record only; downloads stay mapped
    session.clear_session().await.unwrap();

    assert!(!session.is_logged_in());
    assert_eq!(cache.get_path(Some(42), 7, 99).await.unwrap(), Some(saved));
}
