use chrono::Utc;
use seattle_info_admin::{
    ModerationError,
    engine::{InMemoryEngine, ModerationEngine},
    models::{ListingStatus, UserRole, UserStatus},
    store::ModerationStore,
};
use std::sync::Arc;

// --- Test Utilities ---

fn seeded_engine() -> InMemoryEngine {
    InMemoryEngine::new(ModerationStore::seeded(Utc::now()))
}

fn ids<T>(items: &[T], id: impl Fn(&T) -> &str) -> Vec<String> {
    items.iter().map(|item| id(item).to_string()).collect()
}

// --- User Moderation ---

#[tokio::test]
async fn test_approve_every_pending_user() {
    let engine = seeded_engine();
    let pending = engine.list_users(Some("Pending Approval")).await;
    assert_eq!(pending.len(), 2);

    for user in pending {
        let approved = engine.approve_user(&user.id).await.unwrap();
        assert_eq!(approved.status, UserStatus::Active);
        assert!(approved.updated_at > user.updated_at);

        // A second approval is refused, not silently accepted.
        let again = engine.approve_user(&user.id).await;
        assert!(matches!(again, Err(ModerationError::InvalidState(_))));
    }

    assert!(engine.list_users(Some("Pending Approval")).await.is_empty());
}

#[tokio::test]
async fn test_approve_unknown_user_is_not_found() {
    let engine = seeded_engine();
    let result = engine.approve_user("ghost").await;
    assert_eq!(
        result.unwrap_err(),
        ModerationError::NotFound {
            entity: "User",
            id: "ghost".to_string()
        }
    );
}

#[tokio::test]
async fn test_reject_user_keeps_status() {
    let engine = seeded_engine();
    let before = engine
        .list_users(None)
        .await
        .into_iter()
        .find(|user| user.id == "user3")
        .unwrap();

    let confirmation = engine.reject_user("user3").await.unwrap();
    assert_eq!(confirmation.message, "User rejected (simulated)");
    assert_eq!(confirmation.user_id, "user3");

    let after = engine
        .list_users(None)
        .await
        .into_iter()
        .find(|user| user.id == "user3")
        .unwrap();
    assert_eq!(after.status, UserStatus::PendingApproval);
    assert!(after.updated_at > before.updated_at);
}

#[tokio::test]
async fn test_reject_requires_pending_approval() {
    let engine = seeded_engine();

    let active = engine.reject_user("user2").await;
    assert_eq!(
        active.unwrap_err(),
        ModerationError::InvalidState("User not in pending approval state".to_string())
    );

    let missing = engine.reject_user("nobody").await;
    assert!(matches!(missing, Err(ModerationError::NotFound { .. })));
}

#[tokio::test]
async fn test_change_role_round_trip() {
    let engine = seeded_engine();

    let promoted = engine.change_user_role("user1", "admin").await.unwrap();
    assert_eq!(promoted.role, UserRole::Admin);
    // Role changes do not depend on moderation status.
    assert_eq!(promoted.status, UserStatus::PendingApproval);

    let demoted = engine.change_user_role("user1", "user").await.unwrap();
    assert_eq!(demoted.role, UserRole::User);
    assert!(demoted.updated_at >= promoted.updated_at);
}

#[tokio::test]
async fn test_change_role_rejects_unknown_role_before_lookup() {
    let engine = seeded_engine();

    let bad_role = engine.change_user_role("user1", "superuser").await;
    assert_eq!(
        bad_role.unwrap_err(),
        ModerationError::InvalidInput(
            "Invalid role specified. Must be 'user' or 'admin'.".to_string()
        )
    );

    // Case matters: "Admin" is not a role.
    assert!(engine.change_user_role("user1", "Admin").await.is_err());

    // An invalid role is reported even when the user does not exist.
    let bad_both = engine.change_user_role("ghost", "root").await;
    assert!(matches!(bad_both, Err(ModerationError::InvalidInput(_))));

    let missing = engine.change_user_role("ghost", "admin").await;
    assert!(matches!(missing, Err(ModerationError::NotFound { .. })));
}

#[tokio::test]
async fn test_list_users_filter_is_exact() {
    let engine = seeded_engine();

    let all = engine.list_users(None).await;
    assert_eq!(ids(&all, |u| u.id.as_str()), ["user1", "user2", "user3", "admin1"]);

    let empty_filter = engine.list_users(Some("")).await;
    assert_eq!(ids(&empty_filter, |u| u.id.as_str()), ids(&all, |u| u.id.as_str()));

    let active = engine.list_users(Some("Active")).await;
    assert_eq!(ids(&active, |u| u.id.as_str()), ["user2", "admin1"]);

    assert!(engine.list_users(Some("active")).await.is_empty());
    assert!(engine.list_users(Some("pending_approval")).await.is_empty());
}

// --- Listing Moderation ---

#[tokio::test]
async fn test_rejection_reason_cleared_when_leaving_rejected() {
    let engine = seeded_engine();

    let rejected = engine
        .update_listing_status("listing1", "rejected", Some("spam"))
        .await
        .unwrap();
    assert_eq!(rejected.status, ListingStatus::Rejected);
    assert_eq!(rejected.rejection_reason.as_deref(), Some("spam"));

    let active = engine
        .update_listing_status("listing1", "active", None)
        .await
        .unwrap();
    assert_eq!(active.status, ListingStatus::Active);
    assert_eq!(active.rejection_reason, None);
}

#[tokio::test]
async fn test_reason_ignored_for_non_rejected_status() {
    let engine = seeded_engine();
    let removed = engine
        .update_listing_status("listing2", "admin_removed", Some("should not stick"))
        .await
        .unwrap();
    assert_eq!(removed.status, ListingStatus::AdminRemoved);
    assert_eq!(removed.rejection_reason, None);
}

#[tokio::test]
async fn test_rejecting_again_without_reason_keeps_previous_reason() {
    let engine = seeded_engine();
    engine
        .update_listing_status("listing3", "rejected", Some("duplicate"))
        .await
        .unwrap();

    let again = engine
        .update_listing_status("listing3", "rejected", Some(""))
        .await
        .unwrap();
    assert_eq!(again.rejection_reason.as_deref(), Some("duplicate"));

    let fresh = engine
        .update_listing_status("listing1", "rejected", None)
        .await
        .unwrap();
    assert_eq!(fresh.rejection_reason, None);
}

#[tokio::test]
async fn test_listing_status_graph_is_flat() {
    let engine = seeded_engine();
    let before = engine.list_listings(None).await;
    let original = before.iter().find(|l| l.id == "listing2").unwrap();

    for status in ["expired", "pending_approval", "rejected", "active", "admin_removed"] {
        let listing = engine
            .update_listing_status("listing2", status, None)
            .await
            .unwrap();
        assert_eq!(listing.status.as_str(), status);
        assert_eq!(listing.last_updated_date, listing.updated_at);
        assert!(listing.updated_at > original.updated_at);
        // Creation timestamps are never touched by a transition.
        assert_eq!(listing.creation_date, original.creation_date);
    }
}

#[tokio::test]
async fn test_update_listing_status_errors() {
    let engine = seeded_engine();

    let unknown_status = engine.update_listing_status("listing1", "archived", None).await;
    assert_eq!(
        unknown_status.unwrap_err(),
        ModerationError::InvalidInput("Invalid status value provided".to_string())
    );

    let missing = engine.update_listing_status("listing99", "active", None).await;
    assert_eq!(
        missing.unwrap_err(),
        ModerationError::NotFound {
            entity: "Listing",
            id: "listing99".to_string()
        }
    );

    // A failed update leaves the listing untouched.
    let pending = engine.list_listings(Some("pending_approval")).await;
    assert_eq!(ids(&pending, |l| l.id.as_str()), ["listing1", "listing3"]);
}

// --- Categories ---

#[tokio::test]
async fn test_create_category_slug_and_order() {
    let engine = seeded_engine();

    let category = engine
        .create_category("Home & Garden", Some("Everything for the house"))
        .await
        .unwrap();
    assert_eq!(category.slug, "home-&-garden");
    assert_eq!(category.name, "Home & Garden");
    assert_eq!(category.description.as_deref(), Some("Everything for the house"));
    assert_eq!(category.created_at, category.updated_at);

    let all = engine.list_categories().await;
    assert_eq!(all[0].id, "cat1");
    assert_eq!(all[1].id, "cat2");
    assert_eq!(all.last().unwrap().id, category.id);
}

#[tokio::test]
async fn test_create_category_validation() {
    let engine = InMemoryEngine::new(ModerationStore::new());

    let empty = engine.create_category("", Some("no name")).await;
    assert_eq!(
        empty.unwrap_err(),
        ModerationError::InvalidInput("Category name is required".to_string())
    );
    assert!(engine.list_categories().await.is_empty());

    let first = engine.create_category("Books", Some("")).await.unwrap();
    let second = engine.create_category("Books", None).await.unwrap();
    assert_eq!(first.description, None);
    assert_ne!(first.id, second.id);
    assert_eq!(first.slug, second.slug);
}

#[tokio::test]
async fn test_empty_store_lists_nothing() {
    let engine = InMemoryEngine::new(ModerationStore::new());
    assert!(engine.list_users(None).await.is_empty());
    assert!(engine.list_listings(Some("active")).await.is_empty());
    assert!(matches!(
        engine.approve_user("user1").await,
        Err(ModerationError::NotFound { .. })
    ));
}

// --- Concurrency ---

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_approvals_apply_once() {
    let engine = Arc::new(seeded_engine());

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let engine = engine.clone();
            tokio::spawn(async move { engine.approve_user("user1").await })
        })
        .collect();

    let mut approved = 0;
    for handle in handles {
        if handle.await.unwrap().is_ok() {
            approved += 1;
        }
    }
    assert_eq!(approved, 1);
}
