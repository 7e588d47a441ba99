//! Route configuration and setup

use crate::constants::MAX_FILES_PER_REQUEST;
use crate::handlers;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{delete, get, post},
    Json, Router,
};
use slimify_core::Config;
use std::sync::Arc;
use std::time::Duration;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;

    // Base64 in the proxy upload and several files in one compress form both
    // exceed the per-file limit, so the body limit is per request.
    let body_limit = config
        .max_file_size_bytes()
        .saturating_mul(MAX_FILES_PER_REQUEST);

    let http_concurrency_limit = std::env::var("HTTP_CONCURRENCY_LIMIT")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(1_000)
        .max(1);

    tracing::info!(
        body_limit_bytes = body_limit,
        http_concurrency_limit,
        request_timeout_secs = config.request_timeout_secs(),
        "HTTP layers configured"
    );

    let app = app_routes(state)
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.request_timeout_secs(),
        )))
        .layer(ConcurrencyLimitLayer::new(http_concurrency_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    Ok(app)
}

/// Routes without the HTTP layers. Used directly by the integration tests.
pub fn app_routes(state: Arc<AppState>) -> Router<()> {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route(
            "/api/upload",
            post(handlers::proxy::upload_file).fallback(handlers::proxy::method_not_allowed),
        )
        .route(
            "/api/delete",
            delete(handlers::proxy::delete_file).fallback(handlers::proxy::method_not_allowed),
        )
        .route("/api/compress", post(handlers::compress::compress_files))
        .route(
            "/api/users/{user_id}/compressions",
            get(handlers::history::list_compressions),
        )
        .route(
            "/api/users/{user_id}/compressions/{record_id}",
            delete(handlers::history::delete_compression),
        )
        .route(
            "/api/users/{user_id}/stats",
            get(handlers::history::get_user_stats),
        )
        .route(
            "/api/users/{user_id}/export",
            get(handlers::history::export_user_data),
        )
        .route("/media/{*key}", get(handlers::media::get_media))
        .route(
            "/api/openapi.json",
            get(|| async { Json(crate::api_doc::openapi_spec()) }),
        )
        .with_state(state)
}

fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let methods = [Method::GET, Method::POST, Method::DELETE, Method::OPTIONS];

    let cors = if config.cors_origins().iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins()
            .iter()
            .map(|o| o.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow::anyhow!("Invalid CORS origin: {}", e))?;

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(Any)
    };
    Ok(cors)
}
