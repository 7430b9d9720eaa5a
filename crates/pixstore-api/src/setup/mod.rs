//! Application setup and initialization
//!
//! This module contains all application initialization logic extracted from main.rs
//! for better organization and testability.

pub mod routes;
pub mod server;

use std::sync::Arc;

use anyhow::{Context, Result};
use pixstore_core::Config;
use pixstore_db::InMemoryImageRepository;
use pixstore_storage::AssetStorage;

use crate::services::fetch::RemoteFetcher;
use crate::services::images::ImageService;
use crate::state::AppState;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Validate configuration first - fail fast on misconfiguration
    config
        .validate()
        .context("Configuration validation failed")?;

    // Setup storage
    let storage = Arc::new(AssetStorage::new(&config.stored_files_path).await?);

    // Setup the image catalog and services
    let repository = Arc::new(InMemoryImageRepository::new());
    let fetcher = RemoteFetcher::new(config.fetch_timeout_secs)?;
    let images = ImageService::new(&config, storage, repository, fetcher);

    let state = Arc::new(AppState {
        config: config.clone(),
        images,
    });

    // Setup routes
    let router = routes::setup_routes(&config, state.clone())?;

    tracing::info!("Application initialized");

    Ok((state, router))
}
