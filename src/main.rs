use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use api_rest::{ApiDoc, AppState, RequestValidator};
use api_shared::ApiKeyGuard;
use convertx_core::config::{
    converter_args_from_env_value, converter_program_from_env_value, data_dir_from_env_value,
    list_from_env_value, timeout_from_env_value, upload_limit_from_env_value,
};
use convertx_core::{ConvertService, CoreConfig, DEFAULT_MAX_UPLOAD_MB, KnownFormats};

/// Main entry point for the ConvertX conversion server
///
/// Serves the REST API (`/api/health`, `/api/convert`) plus Swagger UI at `/swagger-ui`.
///
/// # Environment Variables
/// - `CONVERTX_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `CONVERTX_DATA_DIR`: root for `uploads/` and `output/` (default: "data")
/// - `CONVERTX_CONVERTER`: converter program (default: "convertx-convert")
/// - `CONVERTX_CONVERTER_ARGS`: whitespace separated arguments placed before the job arguments
/// - `CONVERTX_CONVERSION_TIMEOUT_SECS`: optional conversion timeout
/// - `CONVERTX_MAX_UPLOAD_MB`: request body limit (default: 100)
/// - `CONVERTX_EXTRA_FORMATS`: comma separated target formats accepted on top of the built-ins
/// - `API_KEY`: shared secret expected in `x-api-key`; unset or empty disables the check
///
/// # Returns
/// * `Ok(())` - If the server starts and runs successfully
/// * `Err(anyhow::Error)` - If configuration is invalid or the server fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("convertx=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = std::env::var("CONVERTX_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

    let cfg = CoreConfig::new(
        data_dir_from_env_value(std::env::var("CONVERTX_DATA_DIR").ok()),
        converter_program_from_env_value(std::env::var("CONVERTX_CONVERTER").ok()),
        converter_args_from_env_value(std::env::var("CONVERTX_CONVERTER_ARGS").ok()),
        timeout_from_env_value(std::env::var("CONVERTX_CONVERSION_TIMEOUT_SECS").ok())?,
    )?;
    let max_upload_bytes = upload_limit_from_env_value(
        std::env::var("CONVERTX_MAX_UPLOAD_MB").ok(),
        DEFAULT_MAX_UPLOAD_MB,
    )?;
    let formats = KnownFormats::with_extra(list_from_env_value(
        std::env::var("CONVERTX_EXTRA_FORMATS").ok(),
    ));
    let guard = ApiKeyGuard::new(std::env::var("API_KEY").ok());

    if !guard.is_enabled() {
        tracing::warn!("API_KEY is not set; /api/convert accepts unauthenticated requests");
    }
    tracing::info!(
        data_dir = %cfg.data_dir().display(),
        converter = %cfg.converter_program().display(),
        max_upload_bytes,
        "++ Starting ConvertX REST on {}",
        rest_addr
    );

    let state = AppState::new(
        ConvertService::from_config(&cfg),
        RequestValidator::new(guard, Arc::new(formats)),
    );
    let app = api_rest::router(state, max_upload_bytes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
