//! Object gateway integration tests: range serving and raw uploads.
//!
//! Run with: `cargo test -p clipvault-api --test objects_test`

mod helpers;

use axum::http::StatusCode;
use clipvault_storage::Storage;
use helpers::{patterned_bytes, setup_test_app, setup_test_app_with_limit};

#[tokio::test]
async fn test_full_object_without_range() {
    let app = setup_test_app();
    let data = patterned_bytes(1000);
    app.put("a/b", &data).await;

    let response = app.client().get("/a/b").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.header("content-length"), "1000");
    assert!(response.headers().get("content-range").is_none());
    assert_eq!(response.as_bytes(), &data);
}

#[tokio::test]
async fn test_leading_range_reports_length_in_content_range() {
    let app = setup_test_app();
    let data = patterned_bytes(1000);
    app.put("a/b", &data).await;

    let response = app
        .client()
        .get("/a/b")
        .add_header("Range", "bytes=0-99")
        .await;

    assert_eq!(response.status_code(), StatusCode::PARTIAL_CONTENT);
    assert_eq!(response.header("accept-ranges"), "bytes");
    assert_eq!(response.header("content-range"), "bytes 0-100/1000");
    assert_eq!(response.header("content-length"), "100");
    assert_eq!(response.as_bytes(), &data[..100]);
}

#[tokio::test]
async fn test_middle_and_suffix_ranges() {
    let app = setup_test_app();
    let data = patterned_bytes(1000);
    app.put("clip/video", &data).await;

    let middle = app
        .client()
        .get("/clip/video")
        .add_header("Range", "bytes=500-749")
        .await;
    assert_eq!(middle.status_code(), StatusCode::PARTIAL_CONTENT);
    assert_eq!(middle.header("content-range"), "bytes 500-250/1000");
    assert_eq!(middle.as_bytes(), &data[500..750]);

    let open_ended = app
        .client()
        .get("/clip/video")
        .add_header("Range", "bytes=990-")
        .await;
    assert_eq!(open_ended.status_code(), StatusCode::PARTIAL_CONTENT);
    assert_eq!(open_ended.header("content-length"), "10");
    assert_eq!(open_ended.as_bytes(), &data[990..]);

    let suffix = app
        .client()
        .get("/clip/video")
        .add_header("Range", "bytes=-5")
        .await;
    assert_eq!(suffix.status_code(), StatusCode::PARTIAL_CONTENT);
    assert_eq!(suffix.header("content-range"), "bytes 995-5/1000");
    assert_eq!(suffix.as_bytes(), &data[995..]);
}

#[tokio::test]
async fn test_end_past_size_is_clamped() {
    let app = setup_test_app();
    let data = patterned_bytes(1000);
    app.put("a/b", &data).await;

    let response = app
        .client()
        .get("/a/b")
        .add_header("Range", "bytes=900-5000")
        .await;

    assert_eq!(response.status_code(), StatusCode::PARTIAL_CONTENT);
    assert_eq!(response.header("content-length"), "100");
    assert_eq!(response.as_bytes(), &data[900..]);
}

#[tokio::test]
async fn test_range_beyond_size_is_not_satisfiable() {
    let app = setup_test_app();
    app.put("a/b", &patterned_bytes(1000)).await;

    let response = app
        .client()
        .get("/a/b")
        .add_header("Range", "bytes=2000-2100")
        .await;

    assert_eq!(response.status_code(), StatusCode::RANGE_NOT_SATISFIABLE);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "RANGE_NOT_SATISFIABLE");
}

#[tokio::test]
async fn test_multiple_ranges_are_rejected() {
    let app = setup_test_app();
    app.put("a/b", &patterned_bytes(1000)).await;

    let response = app
        .client()
        .get("/a/b")
        .add_header("Range", "bytes=0-9,20-29")
        .await;

    assert_eq!(response.status_code(), StatusCode::RANGE_NOT_SATISFIABLE);
}

#[tokio::test]
async fn test_multiple_ranges_rejected_even_when_one_cannot_be_served() {
    let app = setup_test_app();
    app.put("a/b", &patterned_bytes(1000)).await;

    for header in ["bytes=0-9,5000-6000", "bytes=5000-,0-9", "bytes=0-9,abc"] {
        let response = app.client().get("/a/b").add_header("Range", header).await;
        assert_eq!(
            response.status_code(),
            StatusCode::RANGE_NOT_SATISFIABLE,
            "range header {:?}",
            header
        );
        assert!(response.headers().get("content-range").is_none());
        let body: serde_json::Value = response.json();
        assert_eq!(body["code"], "RANGE_NOT_SATISFIABLE");
    }
}

#[tokio::test]
async fn test_malformed_range_is_bad_request() {
    let app = setup_test_app();
    app.put("a/b", &patterned_bytes(1000)).await;

    for header in ["items=0-9", "bytes=9-0", "bytes=abc"] {
        let response = app.client().get("/a/b").add_header("Range", header).await;
        assert_eq!(
            response.status_code(),
            StatusCode::BAD_REQUEST,
            "range header {:?}",
            header
        );
    }
}

#[tokio::test]
async fn test_missing_object_is_not_found() {
    let app = setup_test_app();

    let response = app
        .client()
        .get("/nothing/here")
        .add_header("Range", "bytes=0-9")
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_deleted_object_is_not_found() {
    let app = setup_test_app();
    app.put("a/b", &patterned_bytes(100)).await;
    assert_eq!(app.client().get("/a/b").await.status_code(), StatusCode::OK);

    app.storage.delete_object("a/b").await.unwrap();

    let response = app
        .client()
        .get("/a/b")
        .add_header("Range", "bytes=0-9")
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    assert!(response.headers().get("content-range").is_none());
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_get_storage_failure_is_server_error() {
    let app = setup_test_app();
    app.put("a/b", &patterned_bytes(1000)).await;
    app.storage.set_fail_gets(true);

    let response = app
        .client()
        .get("/a/b")
        .add_header("Range", "bytes=0-99")
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.headers().get("content-range").is_none());
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "STORAGE_ERROR");
}

#[tokio::test]
async fn test_seek_failure_is_server_error_before_headers() {
    let app = setup_test_app();
    let data = patterned_bytes(1000);
    app.put("a/b", &data).await;
    app.storage.set_fail_seeks(true);

    let response = app
        .client()
        .get("/a/b")
        .add_header("Range", "bytes=100-199")
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.headers().get("content-range").is_none());
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "STORAGE_ERROR");

    // The whole object is read sequentially and never seeks.
    let full = app.client().get("/a/b").await;
    assert_eq!(full.status_code(), StatusCode::OK);
    assert_eq!(full.as_bytes(), &data);
}

#[tokio::test]
async fn test_put_then_get_round_trip() {
    let app = setup_test_app();
    let data = patterned_bytes(4096);

    let put = app.client().put("/uploads/blob.bin").bytes(data.clone()).await;
    assert_eq!(put.status_code(), StatusCode::OK);
    assert!(put.as_bytes().is_empty());
    assert!(app.has("uploads/blob.bin").await);

    let get = app.client().get("/uploads/blob.bin").await;
    assert_eq!(get.status_code(), StatusCode::OK);
    assert_eq!(get.header("content-length"), "4096");
    assert_eq!(get.as_bytes(), &data);
}

#[tokio::test]
async fn test_put_overwrites_existing_object() {
    let app = setup_test_app();
    app.put("a/b", b"old contents").await;

    let put = app.client().put("/a/b").bytes("new".into()).await;
    assert_eq!(put.status_code(), StatusCode::OK);

    let get = app.client().get("/a/b").await;
    assert_eq!(get.as_bytes().as_ref(), b"new");
}

#[tokio::test]
async fn test_put_storage_failure_is_server_error() {
    let app = setup_test_app();
    app.storage.set_fail_puts(true);

    let put = app.client().put("/a/b").bytes("payload".into()).await;

    assert_eq!(put.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = put.json();
    assert_eq!(body["code"], "STORAGE_ERROR");
    assert!(!app.has("a/b").await);
}

#[tokio::test]
async fn test_put_over_upload_limit_is_rejected() {
    let app = setup_test_app_with_limit(64);

    let put = app
        .client()
        .put("/a/b")
        .bytes(patterned_bytes(1024))
        .await;

    assert!(!put.status_code().is_success());
    assert!(app.storage.is_empty());
}

#[tokio::test]
async fn test_health_and_openapi() {
    let app = setup_test_app();

    let health = app.client().get("/health").await;
    assert_eq!(health.status_code(), StatusCode::OK);
    let body: serde_json::Value = health.json();
    assert_eq!(body["status"], "alive");

    let openapi = app.client().get("/api/openapi.json").await;
    assert_eq!(openapi.status_code(), StatusCode::OK);
    let doc: serde_json::Value = openapi.json();
    assert!(doc["paths"]["/{path}/{file}"].is_object());
}
