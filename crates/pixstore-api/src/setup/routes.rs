//! Route configuration and setup.

use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, State},
    http::{HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::{delete, get, post, put},
    Json, Router,
};
use pixstore_core::Config;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Extra body allowance on top of the configured file ceiling, covering
/// multipart boundaries and section headers. The per-file ceiling itself
/// is enforced while reading each payload.
const MULTIPART_ENVELOPE_HEADROOM: usize = 64 * 1024;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router, anyhow::Error> {
    let cors = setup_cors(config)?;

    let http_concurrency_limit = std::env::var("HTTP_CONCURRENCY_LIMIT")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(10_000)
        .max(1);
    tracing::info!(
        http_concurrency_limit = http_concurrency_limit,
        "HTTP concurrency limit layer enabled"
    );

    let app = image_routes()
        .route("/health", get(health_check))
        .layer(ConcurrencyLimitLayer::new(http_concurrency_limit))
        .layer(RequestBodyLimitLayer::new(
            config.max_file_size_bytes + MULTIPART_ENVELOPE_HEADROOM,
        ))
        .layer(DefaultBodyLimit::disable())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

fn image_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/images", post(handlers::image_upload::upload_images))
        .route("/images", delete(handlers::image_delete::delete_images))
        .route("/images/{id}", get(handlers::image_get::get_image))
        .route("/images/{id}", put(handlers::image_update::update_image))
        .route("/images/{id}", delete(handlers::image_delete::delete_image))
        .route(
            "/images/url",
            post(handlers::image_upload_url::upload_image_from_url),
        )
        .route(
            "/images/urls",
            post(handlers::image_upload_url::upload_images_from_urls),
        )
        .route(
            "/images/base64",
            post(handlers::image_upload_base64::upload_images_from_base64),
        )
        .route(
            "/images/base64",
            put(handlers::image_upload_base64::update_images_from_base64),
        )
}

fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let cors = if config.cors_origins.contains(&"*".to_string()) {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers(Any)
    } else {
        let origins: Result<Vec<HeaderValue>, _> =
            config.cors_origins.iter().map(|o| o.parse()).collect();

        CorsLayer::new()
            .allow_origin(origins.unwrap_or_default())
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers(Any)
    };
    Ok(cors)
}

#[derive(serde::Serialize)]
struct HealthCheckResponse {
    status: String,
    storage: String,
}

/// Liveness probe plus a storage root check.
async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let storage = match tokio::fs::try_exists(&state.config.stored_files_path).await {
        Ok(true) => "healthy".to_string(),
        Ok(false) => "missing".to_string(),
        Err(e) => format!("error: {}", e),
    };

    let healthy = storage == "healthy";
    let status = if healthy { "healthy" } else { "degraded" };

    (
        if healthy {
            StatusCode::OK
        } else {
            StatusCode::SERVICE_UNAVAILABLE
        },
        Json(HealthCheckResponse {
            status: status.to_string(),
            storage,
        }),
    )
}
