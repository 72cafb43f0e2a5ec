//! # API REST
//!
//! REST API implementation for ConvertX.
//!
//! Handles:
//! - HTTP endpoints with axum (`/api/health`, `/api/convert`)
//! - request validation and error-to-response mapping
//! - OpenAPI documentation (`ApiDoc`)
//!
//! Uses `api-shared` for wire types and authentication, and `convertx-core` for the conversion
//! pipeline itself.

#![warn(rust_2018_idioms)]

pub mod error;
pub mod response;
pub mod validator;

pub use error::ApiError;
pub use validator::{RequestValidator, ValidatedRequest};

use api_shared::{ErrorRes, HealthRes, HealthService};
use axum::{
    extract::{DefaultBodyLimit, Request, State},
    response::{Json, Response},
    routing::{get, post},
    Router,
};
use convertx_core::ConvertService;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use utoipa::{OpenApi, ToSchema};

/// Application state shared across REST API handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    service: Arc<ConvertService>,
    validator: Arc<RequestValidator>,
}

impl AppState {
    pub fn new(service: ConvertService, validator: RequestValidator) -> Self {
        Self {
            service: Arc::new(service),
            validator: Arc::new(validator),
        }
    }
}

/// Multipart body of `POST /api/convert`, for documentation only.
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct ConvertForm {
    /// The file to convert.
    #[schema(value_type = String, format = Binary)]
    file: Vec<u8>,
    /// Desired output format, e.g. `webp` or `pdf`.
    #[schema(example = "webp")]
    target_format: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(health, convert),
    components(schemas(HealthRes, ErrorRes, ConvertForm))
)]
pub struct ApiDoc;

/// Builds the API router.
///
/// `max_upload_bytes` caps the request body; larger uploads are rejected while the form is read.
pub fn router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/convert", post(convert))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service is alive", body = HealthRes)
    )
)]
/// Health check endpoint for monitoring and load balancers.
#[axum::debug_handler]
async fn health() -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    post,
    path = "/api/convert",
    request_body(content = ConvertForm, content_type = "multipart/form-data"),
    params(
        ("x-api-key" = Option<String>, Header, description = "Shared secret, required when the server has one configured")
    ),
    responses(
        (status = 200, description = "Converted file as an attachment named {id}.{target_format}"),
        (status = 400, description = "Invalid request", body = ErrorRes),
        (status = 401, description = "Missing or wrong API key", body = ErrorRes),
        (status = 413, description = "Upload too large", body = ErrorRes),
        (status = 500, description = "Staging or conversion failed", body = ErrorRes)
    )
)]
/// Convert an uploaded file to the requested format.
///
/// Validates the request, stages the upload, runs the converter and streams the result back.
/// Staged inputs and produced outputs stay on disk afterwards.
///
/// # Errors
/// - `401` if an API key is configured and the request does not carry it.
/// - `400` for a non-multipart body, a missing file, a missing or unknown target format.
/// - `500` if the upload cannot be stored or the conversion does not finish with `Done`.
#[axum::debug_handler]
async fn convert(State(state): State<AppState>, request: Request) -> Result<Response, ApiError> {
    let ValidatedRequest { upload, format } = state.validator.validate(request).await?;
    let job = state.service.convert(upload, &format).await?;
    response::file_response(&job).await
}
