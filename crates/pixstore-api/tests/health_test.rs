//! Health endpoint integration tests.
//!
//! Run with: `cargo test -p pixstore-api --test health_test`

mod helpers;

use axum::http::StatusCode;
use helpers::setup_test_app;

#[tokio::test]
async fn test_health_check() {
    let app = setup_test_app().await;

    let response = app.client().get("/health").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["storage"], "healthy");
}

#[tokio::test]
async fn test_health_reports_missing_storage_root() {
    let app = setup_test_app().await;
    std::fs::remove_dir_all(&app.storage_root).expect("remove storage root");

    let response = app.client().get("/health").await;

    assert_eq!(response.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["storage"], "missing");
}
