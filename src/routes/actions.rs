use axum::http::Method;

use crate::error::ApiError;

/// Collection
///
/// Admin collections that expose sub-resource actions under `/admin/{collection}/{id}/{action}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Users,
    Listings,
}

impl Collection {
    pub fn as_str(self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::Listings => "listings",
        }
    }
}

/// Action
///
/// One engine operation reachable through a path suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ApproveUser,
    RejectUser,
    ChangeUserRole,
    UpdateListingStatus,
}

/// ActionRoute
///
/// A single row of the action table: `METHOD /{collection}/{id}/{suffix}` runs `action`.
#[derive(Debug, Clone)]
pub struct ActionRoute {
    pub collection: Collection,
    pub suffix: &'static str,
    pub method: Method,
    pub action: Action,
}

/// The outcome of resolving a path against the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAction {
    pub action: Action,
    pub id: String,
}

/// ActionTable
///
/// Declarative mapping of (collection, suffix, method) to an engine action.
/// The table is built once at startup and shared read-only through `AppState`,
/// so resolving a request never re-parses route definitions.
#[derive(Debug, Clone, Default)]
pub struct ActionTable {
    routes: Vec<ActionRoute>,
}

impl ActionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        mut self,
        collection: Collection,
        method: Method,
        suffix: &'static str,
        action: Action,
    ) -> Self {
        self.routes.push(ActionRoute {
            collection,
            suffix,
            method,
            action,
        });
        self
    }

    /// standard
    ///
    /// The admin moderation actions:
    ///
    /// ```text
    /// POST /users/{id}/approve    -> ApproveUser
    /// POST /users/{id}/reject     -> RejectUser
    /// PUT  /users/{id}/role       -> ChangeUserRole
    /// PUT  /listings/{id}/status  -> UpdateListingStatus
    /// ```
    pub fn standard() -> Self {
        Self::new()
            .register(Collection::Users, Method::POST, "approve", Action::ApproveUser)
            .register(Collection::Users, Method::POST, "reject", Action::RejectUser)
            .register(Collection::Users, Method::PUT, "role", Action::ChangeUserRole)
            .register(
                Collection::Listings,
                Method::PUT,
                "status",
                Action::UpdateListingStatus,
            )
    }

    pub fn routes(&self) -> &[ActionRoute] {
        &self.routes
    }

    /// resolve
    ///
    /// Resolves the part of a path that follows `/{collection}/`.
    ///
    /// The final segment selects the route; a suffix with no route is `RouteNotFound`.
    /// The method is checked next, before the id is looked at, so a wrong verb is always
    /// a 405 even when the id segment is missing. The id is the second-to-last segment.
    pub fn resolve(
        &self,
        collection: Collection,
        method: &Method,
        rest: &str,
    ) -> Result<ResolvedAction, ApiError> {
        let rest = rest.strip_prefix('/').unwrap_or(rest);
        let segments: Vec<&str> = rest.split('/').collect();
        let suffix = segments.last().copied().unwrap_or_default();

        let route = self
            .routes
            .iter()
            .find(|route| route.collection == collection && route.suffix == suffix)
            .ok_or_else(|| {
                tracing::debug!(collection = collection.as_str(), path = rest, "no action route matched");
                ApiError::RouteNotFound
            })?;

        if route.method != *method {
            return Err(ApiError::MethodNotAllowed(route.method.clone()));
        }

        let id = segments
            .len()
            .checked_sub(2)
            .map(|index| segments[index])
            .filter(|id| !id.is_empty())
            .ok_or_else(|| {
                ApiError::InvalidPath(format!(
                    "/admin/{}/{{id}}/{}",
                    collection.as_str(),
                    route.suffix
                ))
            })?;

        Ok(ResolvedAction {
            action: route.action,
            id: id.to_string(),
        })
    }
}
