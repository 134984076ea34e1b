use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Public Router Module
///
/// Endpoints with no moderation semantics, mounted under `/api/v1`.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Liveness probe used by the admin dashboard and load balancers.
        .route("/health", get(handlers::health))
}
