//! Router Module Index
//!
//! Splits the API surface by audience. Collection endpoints are registered as
//! plain Axum routes; sub-resource actions go through the declarative action table.

/// Routes open to any caller (health check).
pub mod public;

/// Admin moderation routes, nested under `/admin`.
pub mod admin;

/// The `(collection, suffix, method) -> action` table used by the admin catch-all routes.
pub mod actions;
