use async_trait::async_trait;
use chrono::Utc;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::{
    error::ModerationError,
    models::{Category, Listing, ListingStatus, RejectUserResponse, User, UserRole, UserStatus},
    store::ModerationStore,
};

/// ModerationEngine Trait
///
/// The contract between the HTTP layer and the moderation state. Handlers only see
/// this trait, so tests can substitute a recording mock for the in-memory engine.
///
/// Every operation touches at most one entity and either applies all of its field
/// updates or none of them.
#[async_trait]
pub trait ModerationEngine: Send + Sync {
    // --- Users ---
    /// All users, or only those whose wire status string equals `status` exactly.
    /// An empty filter is treated as no filter.
    async fn list_users(&self, status: Option<&str>) -> Vec<User>;
    async fn approve_user(&self, id: &str) -> Result<User, ModerationError>;
    /// Stamps `updated_at` on a pending user without changing its status.
    async fn reject_user(&self, id: &str) -> Result<RejectUserResponse, ModerationError>;
    async fn change_user_role(&self, id: &str, role: &str) -> Result<User, ModerationError>;

    // --- Listings ---
    async fn list_listings(&self, status: Option<&str>) -> Vec<Listing>;
    async fn update_listing_status(
        &self,
        id: &str,
        status: &str,
        rejection_reason: Option<&str>,
    ) -> Result<Listing, ModerationError>;

    // --- Categories ---
    async fn list_categories(&self) -> Vec<Category>;
    async fn create_category(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> Result<Category, ModerationError>;
}

/// EngineState
///
/// The shared handle to the moderation engine stored in `AppState`.
pub type EngineState = Arc<dyn ModerationEngine>;

/// InMemoryEngine
///
/// The process-local implementation of `ModerationEngine`.
///
/// All three collections sit behind a single mutex, so every operation runs its
/// lookup, validation and mutation as one critical section. Nothing awaits while
/// the lock is held.
pub struct InMemoryEngine {
    store: Mutex<ModerationStore>,
}

impl InMemoryEngine {
    /// Takes ownership of the store; from here on it is only reachable through the engine.
    pub fn new(store: ModerationStore) -> Self {
        Self {
            store: Mutex::new(store),
        }
    }

    // Mutations only happen after validation succeeds, so a poisoned lock still
    // guards consistent data.
    fn lock(&self) -> MutexGuard<'_, ModerationStore> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn matches_filter(actual: &str, filter: Option<&str>) -> bool {
    match filter {
        None | Some("") => true,
        Some(wanted) => actual == wanted,
    }
}

#[async_trait]
impl ModerationEngine for InMemoryEngine {
    async fn list_users(&self, status: Option<&str>) -> Vec<User> {
        tracing::debug!(status = ?status, "listing users");
        self.lock()
            .users
            .iter()
            .filter(|user| matches_filter(user.status.as_str(), status))
            .cloned()
            .collect()
    }

    /// approve_user
    ///
    /// `PendingApproval` -> `Active`. Approving an already active user is rejected
    /// rather than treated as a no-op.
    async fn approve_user(&self, id: &str) -> Result<User, ModerationError> {
        let mut store = self.lock();
        let user = store
            .users
            .iter_mut()
            .find(|user| user.id == id)
            .ok_or_else(|| ModerationError::user_not_found(id))?;

        match user.status {
            UserStatus::PendingApproval => {
                user.status = UserStatus::Active;
                user.updated_at = Utc::now();
                tracing::info!(user_id = %id, "user approved");
                Ok(user.clone())
            }
            UserStatus::Active => {
                tracing::warn!(user_id = %id, status = %user.status, "user is not pending approval");
                Err(ModerationError::InvalidState(
                    "User not in pending approval state or already active".to_string(),
                ))
            }
        }
    }

    /// reject_user
    ///
    /// There is no terminal rejected state for accounts, so the status is left
    /// untouched and only `updated_at` records that a decision was made.
    async fn reject_user(&self, id: &str) -> Result<RejectUserResponse, ModerationError> {
        let mut store = self.lock();
        let user = store
            .users
            .iter_mut()
            .find(|user| user.id == id)
            .ok_or_else(|| ModerationError::user_not_found(id))?;

        match user.status {
            UserStatus::PendingApproval => {
                user.updated_at = Utc::now();
                tracing::info!(user_id = %id, "user rejected (simulated)");
                Ok(RejectUserResponse {
                    message: "User rejected (simulated)".to_string(),
                    user_id: id.to_string(),
                })
            }
            UserStatus::Active => {
                tracing::warn!(user_id = %id, status = %user.status, "user is not pending approval");
                Err(ModerationError::InvalidState(
                    "User not in pending approval state".to_string(),
                ))
            }
        }
    }

    async fn change_user_role(&self, id: &str, role: &str) -> Result<User, ModerationError> {
        let role: UserRole = role.parse().inspect_err(|_| {
            tracing::warn!(user_id = %id, role, "invalid role specified");
        })?;

        let mut store = self.lock();
        let user = store
            .users
            .iter_mut()
            .find(|user| user.id == id)
            .ok_or_else(|| ModerationError::user_not_found(id))?;

        user.role = role;
        user.updated_at = Utc::now();
        tracing::info!(user_id = %id, role = %role, "user role changed");
        Ok(user.clone())
    }

    async fn list_listings(&self, status: Option<&str>) -> Vec<Listing> {
        tracing::debug!(status = ?status, "listing listings");
        self.lock()
            .listings
            .iter()
            .filter(|listing| matches_filter(listing.status.as_str(), status))
            .cloned()
            .collect()
    }

    /// update_listing_status
    ///
    /// Any status may move to any other status. A rejection keeps a non-empty
    /// reason; moving to any other status drops the reason.
    async fn update_listing_status(
        &self,
        id: &str,
        status: &str,
        rejection_reason: Option<&str>,
    ) -> Result<Listing, ModerationError> {
        let status: ListingStatus = status.parse().inspect_err(|_| {
            tracing::warn!(listing_id = %id, status, "invalid listing status provided");
        })?;

        let mut store = self.lock();
        let listing = store
            .listings
            .iter_mut()
            .find(|listing| listing.id == id)
            .ok_or_else(|| ModerationError::listing_not_found(id))?;

        match status {
            ListingStatus::Rejected => {
                if let Some(reason) = rejection_reason.filter(|reason| !reason.is_empty()) {
                    listing.rejection_reason = Some(reason.to_string());
                }
            }
            ListingStatus::PendingApproval
            | ListingStatus::Active
            | ListingStatus::Expired
            | ListingStatus::AdminRemoved => listing.rejection_reason = None,
        }

        let now = Utc::now();
        listing.status = status;
        listing.last_updated_date = now;
        listing.updated_at = now;
        tracing::info!(listing_id = %id, status = %status, "listing status updated");
        Ok(listing.clone())
    }

    async fn list_categories(&self) -> Vec<Category> {
        self.lock().categories.clone()
    }

    async fn create_category(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> Result<Category, ModerationError> {
        if name.is_empty() {
            tracing::warn!("category name is required");
            return Err(ModerationError::InvalidInput(
                "Category name is required".to_string(),
            ));
        }

        let category = Category::new(name, description, Utc::now());
        self.lock().categories.push(category.clone());
        tracing::info!(category_id = %category.id, name = %category.name, "category created");
        Ok(category)
    }
}
