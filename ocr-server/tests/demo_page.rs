use axum::http::{header, StatusCode};
use tower::ServiceExt;

use ocr_server::create_router;
use ocr_server::ocr::EXTRACTION_FAILED;

mod common;
use common::*;

#[tokio::test]
async fn test_demo_get_renders_upload_form() {
    let dir = tempfile::tempdir().unwrap();
    let app = create_router(test_state(dir.path()));

    let response = app.oneshot(get_request("/demo")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers().get(header::CONTENT_TYPE).unwrap();
    assert!(content_type.to_str().unwrap().starts_with("text/html"));

    let html = body_text(response).await;
    assert!(html.contains("enctype=\"multipart/form-data\""));
    assert!(html.contains("name=\"image\""));
    assert!(!html.contains("form-error"));
}

#[tokio::test]
async fn test_demo_post_without_file_rerenders_form() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(dir.path());
    let app = create_router(state.clone());

    let response = app
        .oneshot(multipart_request(
            "/demo",
            multipart_text_body("comment", "forgot the file"),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Please choose an image to upload."));
    assert!(html.contains("name=\"image\""));

    // Nothing ran, so nothing changed.
    assert_eq!(state.status.label().as_str(), "active");
    assert_eq!(state.status.processed_count(), 0);
    assert!(archived_bundles(&dir.path().join("archive")).is_empty());
}

#[tokio::test]
async fn test_demo_post_with_image_shows_result() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(dir.path());
    let app = create_router(state.clone());

    let response = app
        .oneshot(multipart_request(
            "/demo",
            multipart_body("image", "<scan>.png", &sample_png(4)),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains(EXTRACTION_FAILED));
    assert!(html.contains("&lt;scan&gt;.png"));
    assert!(!html.contains("<scan>"));

    assert_eq!(state.status.processed_count(), 1);
    assert_eq!(archived_bundles(&dir.path().join("archive")).len(), 1);
}

#[tokio::test]
async fn test_demo_post_with_corrupt_image_shows_error_page() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(dir.path());
    let app = create_router(state.clone());

    let response = app
        .oneshot(multipart_request(
            "/demo",
            multipart_body("image", "broken.png", b"\x89PNG but not really"),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let html = body_text(response).await;
    assert!(html.contains("Error trying OCR"));
    assert_eq!(state.status.label().as_str(), "error");
}

#[tokio::test]
async fn test_demo_post_with_text_field_named_image_rerenders_form() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(dir.path());
    let app = create_router(state.clone());

    let response = app
        .oneshot(multipart_request("/demo", multipart_text_body("image", "x")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Please choose an image to upload."));
    assert!(html.contains("name=\"image\""));

    assert_eq!(state.status.label().as_str(), "active");
    assert!(archived_bundles(&dir.path().join("archive")).is_empty());
}
