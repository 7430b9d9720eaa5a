use std::sync::Arc;

use axum::{
    extract::{FromRequest, Multipart, Path, Request, State},
    response::Response,
};
use pixstore_core::AppError;
use uuid::Uuid;

use crate::error::HttpAppError;
use crate::handlers::image_upload::declared_content_type;
use crate::handlers::responses::created_single;
use crate::state::AppState;

/// Replace the content behind an existing image id.
///
/// Accepts the same two body kinds as the upload route; a multipart body
/// contributes its first file section. The old content is removed before
/// the replacement is read, so a replacement that fails validation leaves
/// the id with no stored content.
#[tracing::instrument(skip(state, request), fields(operation = "update_image", image_id = %id))]
pub async fn update_image(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    request: Request,
) -> Result<Response, HttpAppError> {
    let content_type = declared_content_type(&request);
    let kind = content_type.to_ascii_lowercase();

    if kind.starts_with("multipart/") {
        let multipart = Multipart::from_request(request, &state)
            .await
            .map_err(|e| AppError::BadRequest(format!("Malformed multipart request: {}", e)))?;
        let asset = state.images.replace_from_multipart(id, multipart).await?;
        return Ok(created_single(asset.id));
    }

    if kind.starts_with("image/") {
        let stream = request.into_body().into_data_stream();
        let asset = state
            .images
            .replace_from_stream(id, stream, Some(content_type))
            .await?;
        return Ok(created_single(asset.id));
    }

    Err(AppError::BadRequest("Expected a multipart/ or image/ request".to_string()).into())
}
