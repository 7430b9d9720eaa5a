use std::sync::Arc;

use axum::{extract::State, response::Response};

use crate::error::{HttpAppError, ValidatedJson};
use crate::handlers::responses::{created_batch, created_single};
use crate::state::AppState;

/// Download a single image from a URL and store it. The body is the URL
/// as a JSON string.
#[tracing::instrument(skip(state), fields(operation = "upload_image_from_url", url = %url))]
pub async fn upload_image_from_url(
    State(state): State<Arc<AppState>>,
    ValidatedJson(url): ValidatedJson<String>,
) -> Result<Response, HttpAppError> {
    let asset = state.images.create_from_url(&url).await?;
    Ok(created_single(asset.id))
}

/// Download a list of images concurrently and store them as one batch.
/// Any failed download or invalid member fails the whole request.
#[tracing::instrument(skip(state, urls), fields(operation = "upload_images_from_urls", count = urls.len()))]
pub async fn upload_images_from_urls(
    State(state): State<Arc<AppState>>,
    ValidatedJson(urls): ValidatedJson<Vec<String>>,
) -> Result<Response, HttpAppError> {
    let assets = state.images.create_many_from_urls(&urls).await?;
    Ok(created_batch(&assets))
}
