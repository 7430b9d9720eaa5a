//! Image replacement integration tests.
//!
//! Replacement removes the old content before the new body is read, so a
//! failed replacement leaves the id with no stored content. These tests pin
//! that behavior.
//!
//! Run with: `cargo test -p pixstore-api --test image_update_test`

mod helpers;

use axum::http::StatusCode;
use axum_test::multipart::{MultipartForm, Part};
use helpers::{fixtures, setup_test_app, TestApp};
use pixstore_core::MEGABYTE;
use uuid::Uuid;

async fn upload_png(app: &TestApp) -> Uuid {
    let part = Part::bytes(bytes::Bytes::from(fixtures::create_minimal_png()))
        .file_name("pixel.png")
        .mime_type("image/png");
    let form = MultipartForm::new().add_part("file", part);
    let response = app.client().post("/images").multipart(form).await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    response.json()
}

#[tokio::test]
async fn test_update_image_raw() {
    let app = setup_test_app().await;
    let client = app.client();
    let id = upload_png(&app).await;

    let response = client
        .put(&format!("/images/{}", id))
        .content_type("image/gif")
        .bytes(fixtures::create_minimal_gif().into())
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    let returned: Uuid = response.json();
    assert_eq!(returned, id);

    let get_response = client.get(&format!("/images/{}", id)).await;
    assert_eq!(get_response.status_code(), StatusCode::OK);
    assert_eq!(
        get_response.header("content-type").to_str().unwrap(),
        "image/gif"
    );
    assert_eq!(
        get_response.as_bytes().to_vec(),
        fixtures::create_minimal_gif()
    );
    // The old folder is gone; only the replacement remains.
    assert_eq!(app.stored_folder_count(), 1);
}

#[tokio::test]
async fn test_update_image_multipart() {
    let app = setup_test_app().await;
    let client = app.client();
    let id = upload_png(&app).await;

    let part = Part::bytes(bytes::Bytes::from(fixtures::create_minimal_gif()))
        .file_name("替换.gif")
        .mime_type("image/gif");
    let form = MultipartForm::new().add_part("file", part);
    let response = client.put(&format!("/images/{}", id)).multipart(form).await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    let returned: Uuid = response.json();
    assert_eq!(returned, id);

    let get_response = client.get(&format!("/images/{}", id)).await;
    assert_eq!(
        get_response.as_bytes().to_vec(),
        fixtures::create_minimal_gif()
    );
}

#[tokio::test]
async fn test_update_unknown_image() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .put(&format!("/images/{}", Uuid::new_v4()))
        .content_type("image/png")
        .bytes(fixtures::create_minimal_png().into())
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_with_invalid_replacement_removes_old_content() {
    let app = setup_test_app().await;
    let client = app.client();
    let id = upload_png(&app).await;

    let response = client
        .put(&format!("/images/{}", id))
        .content_type("image/png")
        .bytes(bytes::Bytes::from_static(b"definitely not an image"))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "UNSUPPORTED_TYPE");

    // The record now has no backing content.
    let get_response = client.get(&format!("/images/{}", id)).await;
    assert_eq!(get_response.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(app.stored_folder_count(), 0);
}

#[tokio::test]
async fn test_update_with_oversized_replacement_removes_old_content() {
    let app = setup_test_app().await;
    let client = app.client();
    let id = upload_png(&app).await;

    let response = client
        .put(&format!("/images/{}", id))
        .content_type("image/png")
        .bytes(fixtures::create_png_of_len(MEGABYTE + 1).into())
        .await;

    assert_eq!(response.status_code(), StatusCode::PAYLOAD_TOO_LARGE);

    let get_response = client.get(&format!("/images/{}", id)).await;
    assert_eq!(get_response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_rejects_unsupported_request_kind() {
    let app = setup_test_app().await;
    let client = app.client();
    let id = upload_png(&app).await;

    let response = client
        .put(&format!("/images/{}", id))
        .content_type("text/plain")
        .bytes(bytes::Bytes::from_static(b"hello"))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Expected a multipart/ or image/ request");

    // Rejected before the old content was touched.
    let get_response = client.get(&format!("/images/{}", id)).await;
    assert_eq!(get_response.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn test_update_multipart_without_file_section_removes_old_content() {
    let app = setup_test_app().await;
    let client = app.client();
    let id = upload_png(&app).await;

    let form = MultipartForm::new().add_text("note", "no file here");
    let response = client.put(&format!("/images/{}", id)).multipart(form).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "BAD_DISPOSITION");

    // The old content was already evicted when the body turned out bad.
    let get_response = client.get(&format!("/images/{}", id)).await;
    assert_eq!(get_response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_multipart_bare_disposition_removes_old_content() {
    let app = setup_test_app().await;
    let client = app.client();
    let id = upload_png(&app).await;

    // A disposition that names no file is rejected on the replacement
    // path too.
    let raw: Vec<u8> =
        b"--XBOUND\r\nContent-Disposition: form-data\r\n\r\nstray\r\n--XBOUND--\r\n".to_vec();

    let response = client
        .put(&format!("/images/{}", id))
        .content_type("multipart/form-data; boundary=XBOUND")
        .bytes(raw.into())
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "BAD_DISPOSITION");

    // The old content was already evicted when the body turned out bad.
    let get_response = client.get(&format!("/images/{}", id)).await;
    assert_eq!(get_response.status_code(), StatusCode::NOT_FOUND);
}
