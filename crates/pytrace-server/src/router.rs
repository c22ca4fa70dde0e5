//! Router assembly for the pytrace HTTP API.
//!
//! [`build_router`] wires all handler functions to their routes with
//! CORS and tracing middleware layers.

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Builds the complete axum router with all API routes.
///
/// CORS is permissive so a browser front end on another origin can call it.
/// TraceLayer provides request-level logging via tracing.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/trace", post(handlers::trace::trace))
        .route("/validate", post(handlers::trace::validate))
        .route("/runtime", get(handlers::runtime::runtime_status))
        .route("/runtime/init", post(handlers::runtime::init_runtime))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
