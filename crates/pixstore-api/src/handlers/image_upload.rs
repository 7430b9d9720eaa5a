use std::sync::Arc;

use axum::{
    extract::{FromRequest, Multipart, Request, State},
    http::header,
    response::Response,
};
use pixstore_core::AppError;

use crate::error::HttpAppError;
use crate::handlers::responses::{created_batch, created_single};
use crate::state::AppState;

/// Upload one or more images in a single request.
///
/// A multipart body is ingested section by section; a raw `image/*` body is
/// stored as a single image cross-checked against its declared content type.
/// A single stored file answers with its bare id and a Location header,
/// anything else answers with an id and uri list.
#[tracing::instrument(skip(state, request), fields(operation = "upload_images"))]
pub async fn upload_images(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Response, HttpAppError> {
    let content_type = declared_content_type(&request);
    let kind = content_type.to_ascii_lowercase();

    if kind.starts_with("multipart/") {
        let multipart = Multipart::from_request(request, &state)
            .await
            .map_err(|e| AppError::BadRequest(format!("Malformed multipart request: {}", e)))?;
        let assets = state.images.ingest_multipart(multipart).await?;

        if assets.len() == 1 {
            return Ok(created_single(assets[0].id));
        }
        return Ok(created_batch(&assets));
    }

    if kind.starts_with("image/") {
        let stream = request.into_body().into_data_stream();
        let asset = state
            .images
            .create_from_stream(stream, Some(content_type))
            .await?;
        return Ok(created_single(asset.id));
    }

    Err(AppError::BadRequest("Expected a multipart/ or image/ request".to_string()).into())
}

/// The request's Content-Type header as a string, empty when absent.
pub(super) fn declared_content_type(request: &Request) -> String {
    request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("")
        .to_string()
}
