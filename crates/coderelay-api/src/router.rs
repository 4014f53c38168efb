//! Route definitions for the CodeRelay HTTP API.

use std::time::Duration;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Room for JSON framing and escaping on top of the raw payload limit.
const BODY_OVERHEAD_BYTES: usize = 64 * 1024;

/// Build the complete Axum router with all routes and middleware.
///
/// `/health` sits outside admission control. Every relay route passes the
/// rate limiter before its path or body is extracted.
pub fn build_router(state: AppState) -> Router {
    let body_limit = state
        .config
        .share
        .max_data_bytes
        .saturating_mul(2)
        .saturating_add(BODY_OVERHEAD_BYTES);
    let timeout = Duration::from_secs(state.config.server.request_timeout_seconds);

    let relay_routes = Router::new()
        .route("/check/{code}", get(handlers::share::check_code))
        .route("/share", post(handlers::share::create_share))
        .route("/receive/{code}", get(handlers::share::receive_share))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::admission::admission,
        ));

    Router::new()
        .route("/health", get(handlers::health::health))
        .merge(relay_routes)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TimeoutLayer::new(timeout))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::cors::build_cors_layer(&state.config.server.cors))
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}
