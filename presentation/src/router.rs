//! Route table

use crate::handlers;
use crate::state::AppState;
use axum::Router;
use axum::routing::post;
use tower_http::trace::TraceLayer;

/// Build the gateway router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/generate", post(handlers::generate))
        .route("/generate/stream", post(handlers::generate_stream))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
