//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /health`           - Health check: DB, cache, geocoding (public)
//! - `POST /api/auth/login`   - Staff login (public, strict rate limit)
//! - `/api/*`                 - REST API (Bearer token required)
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket
//! - **Authentication** - Bearer token resolved to a staff identity
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::health_handler;
use crate::api::middleware::{auth, rate_limit, tracing};
use crate::state::AppState;
use axum::routing::get;
use axum::{Router, middleware};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Routes under `/api` with authentication applied, without rate limiting.
///
/// Useful for in-process tests, which have no peer address to key limits on.
pub fn api_router(state: AppState) -> Router<AppState> {
    let protected = api::routes::protected_routes()
        .route_layer(middleware::from_fn_with_state(state, auth::layer));

    Router::new()
        .merge(api::routes::public_routes())
        .merge(protected)
}

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    let public = api::routes::public_routes().layer(rate_limit::secure_layer());

    let protected = api::routes::protected_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer))
        .layer(rate_limit::layer());

    let router = Router::new()
        .route("/health", get(health_handler))
        .nest("/api", Router::new().merge(public).merge(protected))
        .with_state(state)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
