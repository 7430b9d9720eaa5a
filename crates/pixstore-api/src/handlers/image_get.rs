use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use crate::error::HttpAppError;
use crate::state::AppState;

/// Serve the stored bytes with the canonical content type for the
/// stored file's extension.
#[tracing::instrument(skip(state), fields(operation = "get_image", image_id = %id))]
pub async fn get_image(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Response, HttpAppError> {
    let (content, content_type) = state.images.get(id).await?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, content_type)],
        content,
    )
        .into_response())
}
