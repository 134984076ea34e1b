use chrono::{DateTime, TimeDelta, Utc};

use crate::models::{Category, Listing, ListingStatus, User, UserRole, UserStatus, slugify};

/// ModerationStore
///
/// The three entity collections, held in insertion order. A store is built once at
/// startup and then handed to the engine, which becomes its only owner; nothing
/// else keeps a reference to the entities between requests.
#[derive(Debug, Clone, Default)]
pub struct ModerationStore {
    pub users: Vec<User>,
    pub listings: Vec<Listing>,
    pub categories: Vec<Category>,
}

impl ModerationStore {
    /// An empty store. Used when `SEED_MOCK_DATA` is disabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// seeded
    ///
    /// Populates the mock data set the admin dashboard is developed against:
    /// two pending users, one active user, one admin, two categories and three listings.
    /// All timestamps are expressed relative to `now` so the data always looks recent.
    pub fn seeded(now: DateTime<Utc>) -> Self {
        let users = vec![
            seed_user(
                ("user1", "pending1@example.com"),
                ("Pending", "UserOne"),
                (UserRole::User, UserStatus::PendingApproval),
                now - TimeDelta::hours(24),
            ),
            seed_user(
                ("user2", "activeuser@example.com"),
                ("Active", "UserTwo"),
                (UserRole::User, UserStatus::Active),
                now - TimeDelta::hours(48),
            ),
            seed_user(
                ("user3", "pending2@example.com"),
                ("Pending", "UserThree"),
                (UserRole::User, UserStatus::PendingApproval),
                now - TimeDelta::hours(72),
            ),
            seed_user(
                ("admin1", "admin@example.com"),
                ("Admin", "Super"),
                (UserRole::Admin, UserStatus::Active),
                now - TimeDelta::hours(96),
            ),
        ];

        let categories = vec![
            seed_category("cat1", "Electronics", now),
            seed_category("cat2", "Furniture", now),
        ];

        let listings = vec![
            seed_listing(
                "listing1",
                ("Pending Laptop", "A great laptop, awaiting approval."),
                ListingStatus::PendingApproval,
                ("user1", "cat1"),
                now - TimeDelta::hours(5),
            ),
            seed_listing(
                "listing2",
                ("Active Chair", "A comfortable office chair."),
                ListingStatus::Active,
                ("user2", "cat2"),
                now - TimeDelta::hours(10),
            ),
            seed_listing(
                "listing3",
                ("Another Pending Item", "Something else to review."),
                ListingStatus::PendingApproval,
                ("user1", "cat1"),
                now - TimeDelta::hours(2),
            ),
        ];

        Self {
            users,
            listings,
            categories,
        }
    }
}

fn seed_user(
    (id, email): (&str, &str),
    (first_name, last_name): (&str, &str),
    (role, status): (UserRole, UserStatus),
    registered: DateTime<Utc>,
) -> User {
    User {
        id: id.to_string(),
        email: email.to_string(),
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        role,
        status,
        registration_date: registered,
        created_at: registered,
        updated_at: registered,
        ..User::default()
    }
}

fn seed_category(id: &str, name: &str, now: DateTime<Utc>) -> Category {
    Category {
        id: id.to_string(),
        name: name.to_string(),
        slug: slugify(name),
        description: None,
        created_at: now,
        updated_at: now,
    }
}

fn seed_listing(
    id: &str,
    (title, description): (&str, &str),
    status: ListingStatus,
    (submitter_id, category_id): (&str, &str),
    created: DateTime<Utc>,
) -> Listing {
    Listing {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        status,
        submitter_id: submitter_id.to_string(),
        category_id: category_id.to_string(),
        creation_date: created,
        last_updated_date: created,
        rejection_reason: None,
        created_at: created,
        updated_at: created,
    }
}
