use axum::{
    Router,
    extract::FromRef,
    http::{HeaderName, StatusCode},
    routing::get,
};
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    timeout::TimeoutLayer,
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Core moderation components.
pub mod config;
pub mod engine;
pub mod error;
pub mod handlers;
pub mod models;
pub mod store;

// Routing: public endpoints, admin endpoints and the sub-resource action table.
pub mod routes;
use routes::{actions::ActionTable, admin, public};

// --- Public Re-exports ---

pub use config::AppConfig;
pub use engine::{EngineState, InMemoryEngine, ModerationEngine};
pub use error::{ApiError, ModerationError};
pub use store::ModerationStore;

/// ApiDoc
///
/// Aggregates every documented path and schema into the OpenAPI document served
/// at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health, handlers::list_users, handlers::approve_user, handlers::reject_user,
        handlers::change_user_role, handlers::list_listings, handlers::update_listing_status,
        handlers::list_categories, handlers::create_category
    ),
    components(
        schemas(
            models::User, models::UserRole, models::UserStatus, models::Listing,
            models::ListingStatus, models::Category, models::UpdateRoleRequest,
            models::UpdateListingStatusRequest, models::CreateCategoryRequest,
            models::RejectUserResponse, models::HealthResponse,
        )
    ),
    tags(
        (name = "seattle-info-admin", description = "Seattle Info admin moderation API")
    )
)]
struct ApiDoc;

/// AppState
///
/// The single shared container handed to every request: the moderation engine,
/// the action table resolved once at startup, and the immutable configuration.
#[derive(Clone)]
pub struct AppState {
    /// Moderation Engine: owns all users, listings and categories.
    pub engine: EngineState,
    /// Path-Action Router table for `/admin/{collection}/{id}/{action}`.
    pub actions: Arc<ActionTable>,
    pub config: AppConfig,
}

impl AppState {
    /// Builds the state with the standard admin action table.
    pub fn new(engine: EngineState, config: AppConfig) -> Self {
        Self {
            engine,
            actions: Arc::new(ActionTable::standard()),
            config,
        }
    }
}

// --- Axum FromRef Extractor Implementations ---

// Let handlers pull only the component they need out of AppState.

impl FromRef<AppState> for EngineState {
    fn from_ref(app_state: &AppState) -> EngineState {
        app_state.engine.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// create_router
///
/// Assembles the full routing tree, applies the observability layers and registers the state.
///
/// ```text
/// /                   welcome banner
/// /api/v1/health      public
/// /api/v1/admin/...   moderation API
/// /admin/...          admin dashboard static files
/// /swagger-ui         API documentation
/// ```
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let x_request_id = HeaderName::from_static("x-request-id");
    let request_timeout = state.config.request_timeout();
    let dashboard = ServeDir::new(&state.config.static_dir);

    let api_v1 = Router::new()
        .merge(public::public_routes())
        .nest("/admin", admin::admin_routes());

    let base_router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/", get(|| async { "Welcome to Seattle Info Platform API" }))
        .nest("/api/v1", api_v1)
        .nest_service("/admin", dashboard)
        .fallback(handlers::not_found)
        .with_state(state);

    base_router
        .layer(
            ServiceBuilder::new()
                // Every request gets an x-request-id, echoed back on the response.
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(x_request_id))
                .layer(TimeoutLayer::with_status_code(
                    StatusCode::REQUEST_TIMEOUT,
                    request_timeout,
                )),
        )
        .layer(cors)
}

/// trace_span_logger
///
/// Builds the per-request span. Besides method, uri and request id it tags the
/// API surface the path belongs to; admin handlers fill in `collection` once
/// the request has been routed.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
        surface = surface_of(request.uri().path()),
        collection = tracing::field::Empty,
    )
}

/// surface_of
///
/// Classifies a request path into the part of the service that handles it.
pub fn surface_of(path: &str) -> &'static str {
    if path.starts_with("/api/v1/admin/") || path == "/api/v1/admin" {
        "moderation"
    } else if path.starts_with("/api/v1/") {
        "public"
    } else if path.starts_with("/admin/") || path == "/admin" {
        "dashboard"
    } else if path.starts_with("/swagger-ui") || path.starts_with("/api-docs") {
        "docs"
    } else {
        "root"
    }
}
