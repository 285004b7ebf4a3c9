//! Router-level scenarios against the in-memory backend and a recording
//! publisher, exercising the mutation-then-publish flow end to end.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use std::sync::Arc;
use tower::ServiceExt;

use blobsync_server::{create_app, BlobSyncServer};
use events_bus::{EventType, MemoryPublisher};
use storage_engine::MemoryStorage;

const BOUNDARY: &str = "blobsync-test-boundary";

fn test_app() -> (Router, Arc<MemoryPublisher>, Arc<MemoryStorage>) {
    let storage = Arc::new(MemoryStorage::new());
    let publisher = Arc::new(MemoryPublisher::new());
    let server = BlobSyncServer::new(
        Arc::clone(&storage) as _,
        Arc::clone(&publisher) as _,
        "storage-events",
    );
    (create_app(server), publisher, storage)
}

fn multipart_body(filename: &str, content: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n",
            filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

fn upload_request(uri: &str, filename: &str, content: &[u8]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart_body(filename, content)))
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn upload_then_read_returns_the_same_bytes() {
    let (app, _publisher, _storage) = test_app();

    let response = app
        .clone()
        .oneshot(upload_request("/upload/docs/report.txt", "report.txt", b"hello"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .oneshot(empty_request("GET", "/read/docs/report.txt"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&body[..], b"hello");
}

#[tokio::test]
async fn duplicate_upload_conflicts_and_preserves_content() {
    let (app, _publisher, _storage) = test_app();

    let first = app
        .clone()
        .oneshot(upload_request("/upload/a.txt", "a.txt", b"original"))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = app
        .clone()
        .oneshot(upload_request("/upload/a.txt", "a.txt", b"clobbered"))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::CONFLICT);

    let read = app
        .clone()
        .oneshot(empty_request("GET", "/read/a.txt"))
        .await
        .unwrap();
    let body = read.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&body[..], b"original");

    // overwrite=true replaces
    let third = app
        .clone()
        .oneshot(upload_request("/upload/a.txt?overwrite=true", "a.txt", b"v2"))
        .await
        .unwrap();
    assert_eq!(third.status(), StatusCode::CREATED);

    let read = app
        .oneshot(empty_request("GET", "/read/a.txt"))
        .await
        .unwrap();
    let body = read.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&body[..], b"v2");
}

#[tokio::test]
async fn deleting_an_absent_file_is_not_found() {
    let (app, publisher, _storage) = test_app();

    let response = app
        .oneshot(empty_request("DELETE", "/delete/ghost.txt"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    // Failed mutations publish nothing.
    assert!(publisher.published().is_empty());
}

#[tokio::test]
async fn upload_without_a_file_field_is_a_bad_request() {
    let (app, publisher, _storage) = test_app();

    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(b"Content-Disposition: form-data; name=\"other\"\r\n\r\nx\r\n");
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    let request = Request::builder()
        .method("POST")
        .uri("/upload/a.txt")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(publisher.published().is_empty());
}

#[tokio::test]
async fn list_returns_uploaded_paths() {
    let (app, _publisher, _storage) = test_app();

    for path in ["docs/a.txt", "docs/b.txt", "img/c.png"] {
        let uri = format!("/upload/{}", path);
        let response = app
            .clone()
            .oneshot(upload_request(&uri, "f", b"x"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app
        .clone()
        .oneshot(empty_request("GET", "/list/docs"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
    let mut files: Vec<String> = value["files"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap().to_string())
        .collect();
    files.sort();
    assert_eq!(files, vec!["docs/a.txt", "docs/b.txt"]);

    let response = app.oneshot(empty_request("GET", "/list")).await.unwrap();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(value["files"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn every_successful_mutation_publishes_exactly_one_event() {
    let (app, publisher, _storage) = test_app();

    let response = app
        .clone()
        .oneshot(upload_request("/upload/a.txt", "a.txt", b"data"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(empty_request("POST", "/directory/archive"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(empty_request("DELETE", "/delete/a.txt"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .clone()
        .oneshot(empty_request("DELETE", "/directory/archive"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // Reads publish nothing.
    let response = app
        .oneshot(empty_request("GET", "/list"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let published = publisher.published();
    let summary: Vec<(EventType, String)> = published
        .iter()
        .map(|(topic, event)| {
            assert_eq!(topic, "storage-events");
            (event.event_type, event.path.clone())
        })
        .collect();
    assert_eq!(
        summary,
        vec![
            (EventType::FileUploaded, "a.txt".to_string()),
            (EventType::DirectoryCreated, "archive".to_string()),
            (EventType::FileDeleted, "a.txt".to_string()),
            (EventType::DirectoryDeleted, "archive".to_string()),
        ]
    );

    let upload = &published[0].1;
    assert_eq!(upload.size, 4);
    assert_eq!(upload.metadata["filename"], "a.txt");
    assert_eq!(upload.metadata["overwrite"], "false");
}

#[tokio::test]
async fn health_endpoint_reports_healthy() {
    let (app, _publisher, _storage) = test_app();

    let response = app.oneshot(empty_request("GET", "/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(value["status"], "healthy");
}
