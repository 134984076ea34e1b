use crate::{
    AppState,
    engine::EngineState,
    error::ApiError,
    models::{
        Category, CreateCategoryRequest, HealthResponse, Listing, RejectUserResponse,
        UpdateListingStatusRequest, UpdateRoleRequest, User,
    },
    routes::actions::{Action, Collection},
};
use axum::{
    Json,
    body::Bytes,
    extract::{Path, Query, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, de::DeserializeOwned};
use tracing::Span;

// --- Filter Structs ---

/// StatusFilter
///
/// Query parameters accepted by the admin list endpoints (`?status=...`).
/// The value is compared verbatim against the entity's wire status string.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StatusFilter {
    /// Exact status string, e.g. `Pending Approval` for users or `pending_approval` for listings.
    pub status: Option<String>,
}

impl StatusFilter {
    /// Builds the filter from raw query pairs. The first `status` wins; repeated
    /// keys and unrelated parameters never fail the request.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        Self {
            status: pairs
                .into_iter()
                .find(|(key, _)| key == "status")
                .map(|(_, value)| value),
        }
    }
}

/// decode_body
///
/// Decodes a JSON body into its typed request structure. The `Content-Type` header
/// is not consulted. Failures never reach the engine.
fn decode_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|e| ApiError::InvalidBody(e.to_string()))
}

// --- Handlers ---

#[utoipa::path(
    get,
    path = "/api/v1/health",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "UP".to_string(),
        message: "Seattle Info API is healthy!".to_string(),
    })
}

/// not_found
///
/// Router fallback for any path no route claims.
pub async fn not_found() -> ApiError {
    ApiError::RouteNotFound
}

/// list_users
///
/// [Admin Route] Lists users in insertion order, optionally narrowed to one status.
#[utoipa::path(
    get,
    path = "/api/v1/admin/users",
    params(StatusFilter),
    responses((status = 200, description = "Users", body = [User]))
)]
pub async fn list_users(
    State(engine): State<EngineState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Json<Vec<User>> {
    let filter = StatusFilter::from_pairs(pairs);
    Span::current().record("collection", Collection::Users.as_str());
    Json(engine.list_users(filter.status.as_deref()).await)
}

/// list_listings
///
/// [Admin Route] Lists listings in insertion order, optionally narrowed to one status.
#[utoipa::path(
    get,
    path = "/api/v1/admin/listings",
    params(StatusFilter),
    responses((status = 200, description = "Listings", body = [Listing]))
)]
pub async fn list_listings(
    State(engine): State<EngineState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Json<Vec<Listing>> {
    let filter = StatusFilter::from_pairs(pairs);
    Span::current().record("collection", Collection::Listings.as_str());
    Json(engine.list_listings(filter.status.as_deref()).await)
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/categories",
    responses((status = 200, description = "Categories", body = [Category]))
)]
pub async fn list_categories(State(engine): State<EngineState>) -> Json<Vec<Category>> {
    Json(engine.list_categories().await)
}

/// create_category
///
/// [Admin Route] Adds a category. The slug is derived from the name by the engine.
#[utoipa::path(
    post,
    path = "/api/v1/admin/categories",
    request_body = CreateCategoryRequest,
    responses(
        (status = 201, description = "Created", body = Category),
        (status = 400, description = "Malformed body or empty name")
    )
)]
pub async fn create_category(
    State(engine): State<EngineState>,
    body: Bytes,
) -> Result<(StatusCode, Json<Category>), ApiError> {
    let payload: CreateCategoryRequest = decode_body(&body)?;
    let category = engine
        .create_category(&payload.name, payload.description.as_deref())
        .await?;
    Ok((StatusCode::CREATED, Json(category)))
}

// --- Sub-resource Actions ---

/// user_action
///
/// [Admin Route] Entry point for everything under `/admin/users/`.
pub async fn user_action(
    State(state): State<AppState>,
    method: Method,
    Path(rest): Path<String>,
    body: Bytes,
) -> Result<Response, ApiError> {
    dispatch_action(&state, Collection::Users, &method, &rest, &body).await
}

/// listing_action
///
/// [Admin Route] Entry point for everything under `/admin/listings/`.
pub async fn listing_action(
    State(state): State<AppState>,
    method: Method,
    Path(rest): Path<String>,
    body: Bytes,
) -> Result<Response, ApiError> {
    dispatch_action(&state, Collection::Listings, &method, &rest, &body).await
}

/// dispatch_action
///
/// Resolves the path against the action table, decodes the body for actions that
/// take one, and runs the matching handler.
pub async fn dispatch_action(
    state: &AppState,
    collection: Collection,
    method: &Method,
    rest: &str,
    body: &Bytes,
) -> Result<Response, ApiError> {
    tracing::debug!(collection = collection.as_str(), path = rest, %method, "routing admin action");
    Span::current().record("collection", collection.as_str());
    let resolved = state.actions.resolve(collection, method, rest)?;
    let engine = State(state.engine.clone());
    let id = Path(resolved.id);

    let response = match resolved.action {
        Action::ApproveUser => approve_user(engine, id).await?.into_response(),
        Action::RejectUser => reject_user(engine, id).await?.into_response(),
        Action::ChangeUserRole => {
            let payload = Json(decode_body(body)?);
            change_user_role(engine, id, payload).await?.into_response()
        }
        Action::UpdateListingStatus => {
            let payload = Json(decode_body(body)?);
            update_listing_status(engine, id, payload)
                .await?
                .into_response()
        }
    };
    Ok(response)
}

/// approve_user
///
/// [Admin Route] Moves a pending user to `Active`.
#[utoipa::path(
    post,
    path = "/api/v1/admin/users/{id}/approve",
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "Approved", body = User),
        (status = 400, description = "User not pending approval"),
        (status = 404, description = "User not found"),
        (status = 405, description = "Wrong method")
    )
)]
pub async fn approve_user(
    State(engine): State<EngineState>,
    Path(id): Path<String>,
) -> Result<Json<User>, ApiError> {
    Ok(Json(engine.approve_user(&id).await?))
}

/// reject_user
///
/// [Admin Route] Records the rejection of a pending user. The account status is not changed.
#[utoipa::path(
    post,
    path = "/api/v1/admin/users/{id}/reject",
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "Rejected (simulated)", body = RejectUserResponse),
        (status = 400, description = "User not pending approval"),
        (status = 404, description = "User not found"),
        (status = 405, description = "Wrong method")
    )
)]
pub async fn reject_user(
    State(engine): State<EngineState>,
    Path(id): Path<String>,
) -> Result<Json<RejectUserResponse>, ApiError> {
    Ok(Json(engine.reject_user(&id).await?))
}

/// change_user_role
///
/// [Admin Route] Sets a user's role to `user` or `admin`, whatever its status.
#[utoipa::path(
    put,
    path = "/api/v1/admin/users/{id}/role",
    params(("id" = String, Path, description = "User ID")),
    request_body = UpdateRoleRequest,
    responses(
        (status = 200, description = "Role changed", body = User),
        (status = 400, description = "Malformed body or unknown role"),
        (status = 404, description = "User not found"),
        (status = 405, description = "Wrong method")
    )
)]
pub async fn change_user_role(
    State(engine): State<EngineState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateRoleRequest>,
) -> Result<Json<User>, ApiError> {
    Ok(Json(engine.change_user_role(&id, &payload.role).await?))
}

/// update_listing_status
///
/// [Admin Route] The core listing moderation endpoint (approve, reject, remove, expire).
#[utoipa::path(
    put,
    path = "/api/v1/admin/listings/{id}/status",
    params(("id" = String, Path, description = "Listing ID")),
    request_body = UpdateListingStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = Listing),
        (status = 400, description = "Malformed body or unknown status"),
        (status = 404, description = "Listing not found"),
        (status = 405, description = "Wrong method")
    )
)]
pub async fn update_listing_status(
    State(engine): State<EngineState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateListingStatusRequest>,
) -> Result<Json<Listing>, ApiError> {
    let listing = engine
        .update_listing_status(&id, &payload.status, payload.rejection_reason.as_deref())
        .await?;
    Ok(Json(listing))
}
