//! Response shapes shared by the upload handlers.

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use pixstore_core::StoredAsset;
use serde::Serialize;
use uuid::Uuid;

/// Identifier and retrieval URI of one stored image.
#[derive(Debug, Serialize)]
pub struct UploadedImage {
    pub id: Uuid,
    pub uri: String,
}

impl From<&StoredAsset> for UploadedImage {
    fn from(asset: &StoredAsset) -> Self {
        Self {
            id: asset.id,
            uri: image_uri(asset.id),
        }
    }
}

/// Retrieval URI for a stored image.
pub fn image_uri(id: Uuid) -> String {
    format!("/images/{}", id)
}

/// 201 with the bare id and a Location header pointing at the new image.
pub fn created_single(id: Uuid) -> Response {
    (
        StatusCode::CREATED,
        [(header::LOCATION, image_uri(id))],
        Json(id),
    )
        .into_response()
}

/// 201 with an id and uri entry per stored image.
pub fn created_batch(assets: &[StoredAsset]) -> Response {
    let body: Vec<UploadedImage> = assets.iter().map(UploadedImage::from).collect();
    (StatusCode::CREATED, Json(body)).into_response()
}
