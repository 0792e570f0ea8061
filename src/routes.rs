//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /health`  - Health check: DB, cache, click queue
//! - `/api/*`        - JSON API
//! - `GET  /{code}`  - Short URL redirect (301)
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **CORS** - Any origin may call the API
//! - **Rate limiting** - Per-IP token bucket, 429 rendered as JSON
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler};
use crate::api::middleware::{rate_limit, tracing};
use crate::state::AppState;
use axum::routing::get;
use axum::{Router, middleware};
use tower::Layer;
use tower_http::cors::CorsLayer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
///
/// The rate limiters key on the peer address, so the result must be served
/// with connect info (see [`crate::server::run`]).
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    let api_router = api::routes::routes().layer(rate_limit::api_layer());

    let redirect_router = Router::new()
        .route("/{code}", get(redirect_handler))
        .layer(rate_limit::layer());

    let router = Router::new()
        .route("/health", get(health_handler))
        .nest("/api", api_router)
        .merge(redirect_router)
        .with_state(state)
        .layer(middleware::map_response(rate_limit::json_rejection))
        .layer(CorsLayer::permissive())
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
