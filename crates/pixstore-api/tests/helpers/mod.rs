//! Test helpers: build the application router for integration tests.
//!
//! Run from workspace root: `cargo test -p pixstore-api --test images_test` or
//! `cargo test -p pixstore-api`. Storage is a per-test temp directory.

#![allow(dead_code)]

pub mod fixtures;

use std::path::PathBuf;

use axum_test::TestServer;
use pixstore_api::setup::initialize_app;
use pixstore_core::{Config, MEGABYTE};
use tempfile::TempDir;

/// Test application: server plus the storage directory it owns.
pub struct TestApp {
    pub server: TestServer,
    pub storage_root: PathBuf,
    pub _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Number of asset folders currently on disk.
    pub fn stored_folder_count(&self) -> usize {
        std::fs::read_dir(&self.storage_root)
            .map(|entries| entries.filter_map(|e| e.ok()).count())
            .unwrap_or(0)
    }
}

/// Setup test app with an isolated storage directory and a 1 MB ceiling.
pub async fn setup_test_app() -> TestApp {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let storage_root = temp_dir.path().to_path_buf();

    let config = Config {
        stored_files_path: storage_root.display().to_string(),
        max_file_size_bytes: MEGABYTE,
        permitted_extensions: vec![
            ".jpg".to_string(),
            ".jpeg".to_string(),
            ".png".to_string(),
            ".gif".to_string(),
        ],
        server_port: 0,
        fetch_timeout_secs: 5,
        cors_origins: vec!["*".to_string()],
    };

    let (_state, router) = initialize_app(config)
        .await
        .expect("Failed to initialize application");

    let server = TestServer::new(router).expect("Failed to start test server");

    TestApp {
        server,
        storage_root,
        _temp_dir: temp_dir,
    }
}
