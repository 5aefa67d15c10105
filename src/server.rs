use axum::{middleware as axum_mw, routing::get, Router};
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;

use crate::handlers;
use crate::metrics::stream;
use crate::middleware::timing;
use crate::AppState;

/// Builds the full Axum `Router` with all routes and middleware.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // ── Load-test endpoints ─────────────────────────────────
        .route("/api/test", get(handlers::load::api_test))
        .route("/health", get(handlers::health::health))
        // ── Metrics ─────────────────────────────────────────────
        .route("/api/metrics", get(stream::get_metrics))
        .route("/api/metrics/stream", get(stream::metrics_stream))
        // ── Runs only for matched routes ────────────────────────
        .route_layer(axum_mw::from_fn(timing::capture_route))
        // ── Provide shared state to all routes above ────────────
        .with_state(state.clone())
        // ── Global middleware (applied bottom-up) ───────────────
        // Panics become 500s before the timing layer sees them
        .layer(CatchPanicLayer::new())
        .layer(axum_mw::from_fn_with_state(state, timing::timing_middleware))
        .layer(CorsLayer::permissive())
}
