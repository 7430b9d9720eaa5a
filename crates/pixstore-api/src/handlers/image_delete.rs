use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use pixstore_core::AppError;
use uuid::Uuid;

use crate::error::{HttpAppError, ValidatedJson};
use crate::state::AppState;

#[tracing::instrument(skip(state), fields(operation = "delete_image", image_id = %id))]
pub async fn delete_image(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Response, HttpAppError> {
    if !state.images.delete(id).await? {
        return Err(AppError::NotFound("Image not found".to_string()).into());
    }
    Ok(StatusCode::NO_CONTENT.into_response())
}

/// Delete a set of images in one request.
///
/// Known ids are removed even when others are unknown; a shortfall is
/// reported as a 404 naming how many records actually went away.
#[tracing::instrument(skip(state, ids), fields(operation = "delete_images", count = ids.len()))]
pub async fn delete_images(
    State(state): State<Arc<AppState>>,
    ValidatedJson(ids): ValidatedJson<Vec<Uuid>>,
) -> Result<Response, HttpAppError> {
    let deleted = state.images.delete_many(&ids).await?;

    if deleted != ids.len() {
        return Err(AppError::NotFound(format!(
            "{} has been deleted instead {}",
            deleted,
            ids.len()
        ))
        .into());
    }
    Ok(StatusCode::NO_CONTENT.into_response())
}
