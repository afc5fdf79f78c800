//! Axum router configuration with middleware.

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the router serving the skill endpoint and health probe.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/skill", post(handlers::invoke_skill))
        .route("/health", get(handlers::health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
