use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use base64::{engine::general_purpose, Engine as _};
use bytes::Bytes;
use pixstore_core::AppError;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{HttpAppError, ValidatedJson};
use crate::handlers::responses::created_batch;
use crate::services::images::UploadSource;
use crate::state::AppState;

/// One base64-encoded upload.
#[derive(Debug, Deserialize)]
pub struct Base64Upload {
    pub base64: String,
}

/// One base64-encoded replacement for an existing image.
#[derive(Debug, Deserialize)]
pub struct Base64Replacement {
    pub id: Uuid,
    pub base64: String,
}

fn decode(encoded: &str) -> Result<Bytes, AppError> {
    general_purpose::STANDARD
        .decode(encoded)
        .map(Bytes::from)
        .map_err(|e| AppError::BadRequest(format!("Invalid base64 payload: {}", e)))
}

/// Store a list of base64 documents as one atomic batch.
#[tracing::instrument(skip(state, uploads), fields(operation = "upload_images_from_base64", count = uploads.len()))]
pub async fn upload_images_from_base64(
    State(state): State<Arc<AppState>>,
    ValidatedJson(uploads): ValidatedJson<Vec<Base64Upload>>,
) -> Result<Response, HttpAppError> {
    let mut sources = Vec::with_capacity(uploads.len());
    for upload in &uploads {
        sources.push(UploadSource::Anonymous {
            content: decode(&upload.base64)?,
            declared_content_type: None,
        });
    }

    let assets = state.images.create_many(sources).await?;
    Ok(created_batch(&assets))
}

/// Replace the content of several images from base64 documents.
///
/// All members are decoded up front, then applied in order; the first
/// failed replacement stops the request while earlier ones stand.
#[tracing::instrument(skip(state, replacements), fields(operation = "update_images_from_base64", count = replacements.len()))]
pub async fn update_images_from_base64(
    State(state): State<Arc<AppState>>,
    ValidatedJson(replacements): ValidatedJson<Vec<Base64Replacement>>,
) -> Result<Response, HttpAppError> {
    let mut decoded = Vec::with_capacity(replacements.len());
    for replacement in &replacements {
        decoded.push((replacement.id, decode(&replacement.base64)?));
    }

    for (id, content) in decoded {
        state
            .images
            .replace(
                id,
                UploadSource::Anonymous {
                    content,
                    declared_content_type: None,
                },
            )
            .await?;
    }

    Ok(StatusCode::NO_CONTENT.into_response())
}
