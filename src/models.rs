use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::ModerationError;

// --- Closed Enumerations ---

/// UserRole
///
/// The RBAC field of a user account. Serialized in lowercase (`"user"` / `"admin"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum UserRole {
    #[default]
    User,
    Admin,
}

impl UserRole {
    pub fn as_str(self) -> &'static str {
        match self {
            UserRole::User => "user",
            UserRole::Admin => "admin",
        }
    }
}

impl FromStr for UserRole {
    type Err = ModerationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "user" => Ok(UserRole::User),
            "admin" => Ok(UserRole::Admin),
            _ => Err(ModerationError::InvalidInput(
                "Invalid role specified. Must be 'user' or 'admin'.".to_string(),
            )),
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// UserStatus
///
/// Account moderation state. The wire values are human-readable
/// (`"Pending Approval"`, `"Active"`), unlike `ListingStatus` which is snake_case.
/// Both spellings are part of the admin dashboard contract and must not be normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub enum UserStatus {
    #[default]
    #[serde(rename = "Pending Approval")]
    PendingApproval,
    #[serde(rename = "Active")]
    Active,
}

impl UserStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            UserStatus::PendingApproval => "Pending Approval",
            UserStatus::Active => "Active",
        }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// ListingStatus
///
/// Moderation state of a listing. Any status may move to any other status;
/// `Expired` is never set automatically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ListingStatus {
    #[default]
    PendingApproval,
    Active,
    Rejected,
    Expired,
    AdminRemoved,
}

impl ListingStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ListingStatus::PendingApproval => "pending_approval",
            ListingStatus::Active => "active",
            ListingStatus::Rejected => "rejected",
            ListingStatus::Expired => "expired",
            ListingStatus::AdminRemoved => "admin_removed",
        }
    }
}

impl FromStr for ListingStatus {
    type Err = ModerationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending_approval" => Ok(ListingStatus::PendingApproval),
            "active" => Ok(ListingStatus::Active),
            "rejected" => Ok(ListingStatus::Rejected),
            "expired" => Ok(ListingStatus::Expired),
            "admin_removed" => Ok(ListingStatus::AdminRemoved),
            _ => Err(ModerationError::InvalidInput(
                "Invalid status value provided".to_string(),
            )),
        }
    }
}

impl fmt::Display for ListingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// --- Core Entities ---

/// User
///
/// A registered platform account under admin review.
/// Self-registered users start in `PendingApproval`; only the moderation engine moves them to `Active`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub first_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub last_name: String,
    pub role: UserRole,
    pub status: UserStatus,
    #[ts(type = "string")]
    pub registration_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture_url: Option<String>,
    // Identity provider that created the account, e.g. "firebase".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_provider: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_email_verified: bool,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// Listing
///
/// A piece of user-submitted content awaiting or past moderation.
///
/// `submitter_id` and `category_id` are lookup keys only; the engine never
/// dereferences them. `rejection_reason` is only ever present while the
/// status is `Rejected`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct Listing {
    pub id: String,
    pub title: String,
    pub description: String,
    pub status: ListingStatus,
    pub submitter_id: String,
    pub category_id: String,
    #[ts(type = "string")]
    pub creation_date: DateTime<Utc>,
    #[ts(type = "string")]
    pub last_updated_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// Category
///
/// A flat taxonomy entry used to organize listings.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct Category {
    pub id: String,
    pub name: String,
    /// URL-friendly form of `name`, see [`slugify`].
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

impl Category {
    /// Builds a new category with a fresh UUID, a slug derived from `name`,
    /// and both timestamps set to `now`. An empty description is stored as absent.
    pub fn new(name: &str, description: Option<&str>, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            slug: slugify(name),
            description: description
                .filter(|text| !text.is_empty())
                .map(str::to_string),
            created_at: now,
            updated_at: now,
        }
    }
}

/// slugify
///
/// Replaces every space with a hyphen and lowercases the result.
/// Punctuation and other characters pass through untouched, so
/// `"Home & Garden"` becomes `"home-&-garden"`.
pub fn slugify(name: &str) -> String {
    name.replace(' ', "-").to_lowercase()
}

// --- Request Payloads (Input Schemas) ---

/// UpdateRoleRequest
///
/// Body for `PUT /admin/users/{id}/role`. The role stays a raw string here so that
/// an unknown value is reported by the engine with its own message rather than
/// as a generic decoding failure.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UpdateRoleRequest {
    #[serde(default)]
    #[schema(example = "admin")]
    pub role: String,
}

/// UpdateListingStatusRequest
///
/// Body for `PUT /admin/listings/{id}/status`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UpdateListingStatusRequest {
    #[serde(default)]
    #[schema(example = "rejected")]
    pub status: String,
    #[serde(
        rename = "rejectionReason",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub rejection_reason: Option<String>,
}

/// CreateCategoryRequest
///
/// Body for `POST /admin/categories`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreateCategoryRequest {
    #[serde(default)]
    #[schema(example = "Home & Garden")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

// --- Output Schemas ---

/// RejectUserResponse
///
/// Confirmation returned by the simulated user rejection.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct RejectUserResponse {
    pub message: String,
    #[serde(rename = "userId")]
    pub user_id: String,
}

/// HealthResponse
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}
