use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{any, get},
};

/// Admin Router Module
///
/// Mounted at `/api/v1/admin`. There is no caller-identity check in front of these
/// routes; access control is left to the deployment.
///
/// ```text
/// GET  /users?status=...          -> list_users
/// *    /users/{id}/{action}       -> user_action (action table)
/// GET  /listings?status=...       -> list_listings
/// *    /listings/{id}/{action}    -> listing_action (action table)
/// GET  /categories                -> list_categories
/// POST /categories                -> create_category
/// ```
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        // --- User Moderation ---
        .route("/users", get(handlers::list_users))
        // Accepts every method so the action table can answer 404 / 405 itself.
        .route("/users/{*rest}", any(handlers::user_action))
        // --- Listing Moderation ---
        .route("/listings", get(handlers::list_listings))
        .route("/listings/{*rest}", any(handlers::listing_action))
        // --- Category Taxonomy ---
        .route(
            "/categories",
            get(handlers::list_categories).post(handlers::create_category),
        )
}
