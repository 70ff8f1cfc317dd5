mod common;

use chrono::{Duration, Utc};
use common::*;
use coursedesk::models::user::{LegacyAccess, User};
use coursedesk::repositories::user::UserStore;
use coursedesk::services::migration::{migrate_legacy_access, MIGRATED_ORDER_MARKER};
use coursedesk::services::sessions;

fn legacy_user(mobile: &str) -> User {
    let mut user = User::new(
        "Asha Verma".to_string(),
        mobile.to_string(),
        "asha@example.com".to_string(),
        None,
    );
    user.legacy = LegacyAccess {
        course_id: Some("soft-skills".to_string()),
        paid: Some(true),
        expires_at: Some(Utc::now() + Duration::days(10)),
        attempts_left: Some(17),
        order_id: Some("order_from_2022".to_string()),
    };
    user
}

#[test]
fn scalars_only_record_gains_both_catalog_courses() {
    let mut user = legacy_user("9876600001");

    assert!(migrate_legacy_access(&mut user));

    assert_eq!(user.courses.len(), 2);
    for entitlement in &user.courses {
        assert!(entitlement.paid);
        assert_eq!(entitlement.order_id, MIGRATED_ORDER_MARKER);
        assert_eq!(entitlement.attempts_left, 17);
    }
    let ids: Vec<&str> = user.courses.iter().map(|e| e.course_id.as_str()).collect();
    assert_eq!(ids, vec!["soft-skills", "language-skills"]);
}

#[test]
fn migration_is_idempotent() {
    let mut user = legacy_user("9876600002");

    assert!(migrate_legacy_access(&mut user));
    let after_first = user.courses.clone();

    assert!(!migrate_legacy_access(&mut user), "second run is a no-op");
    assert_eq!(user.courses.len(), after_first.len());
    for (a, b) in user.courses.iter().zip(after_first.iter()) {
        assert_eq!(a.course_id, b.course_id);
        assert_eq!(a.order_id, b.order_id);
        assert_eq!(a.attempts_left, b.attempts_left);
    }
}

#[test]
fn single_course_record_gains_the_missing_sibling() {
    let mut user = legacy_user("9876600003");
    user.courses.push(paid_entitlement("soft-skills", "order_real_123"));
    user.courses[0].attempts_left = 12;

    assert!(migrate_legacy_access(&mut user));

    assert_eq!(user.courses.len(), 2);
    let sibling = user.entitlement("language-skills").unwrap();
    assert!(sibling.paid);
    assert_eq!(sibling.order_id, "order_real_123", "sibling shares the order");
    assert_eq!(sibling.expires_at, user.courses[0].expires_at);
    assert_eq!(sibling.attempts_left, 30);
    assert_eq!(
        user.entitlement("soft-skills").unwrap().attempts_left,
        12,
        "original grant untouched"
    );
}

#[test]
fn record_with_both_courses_is_left_alone() {
    let mut user = legacy_user("9876600004");
    user.courses.push(paid_entitlement("soft-skills", "order_a"));
    user.courses.push(paid_entitlement("language-skills", "order_b"));

    assert!(!migrate_legacy_access(&mut user));
    assert_eq!(user.courses.len(), 2);
}

#[test]
fn expired_legacy_access_is_not_migrated() {
    let mut user = legacy_user("9876600005");
    user.legacy.expires_at = Some(Utc::now() - Duration::days(1));

    assert!(!migrate_legacy_access(&mut user));
    assert!(user.courses.is_empty());
}

#[test]
fn unpaid_legacy_access_is_not_migrated() {
    let mut user = legacy_user("9876600006");
    user.legacy.paid = Some(false);

    assert!(!migrate_legacy_access(&mut user));
    assert!(user.courses.is_empty());
}

#[test]
fn single_unpaid_course_is_not_eligible_for_a_sibling() {
    let mut user = legacy_user("9876600007");
    let mut entitlement = paid_entitlement("soft-skills", "order_pending");
    entitlement.paid = false;
    user.courses.push(entitlement);

    assert!(!migrate_legacy_access(&mut user));
    assert_eq!(user.courses.len(), 1);
}

#[test]
fn already_migrated_single_course_is_not_retreated_as_real() {
    let mut user = legacy_user("9876600008");
    user.courses
        .push(paid_entitlement("soft-skills", MIGRATED_ORDER_MARKER));

    assert!(!migrate_legacy_access(&mut user));
    assert_eq!(user.courses.len(), 1);
}

#[tokio::test]
async fn login_migrates_and_persists_once() {
    let backend = test_backend();
    let user = legacy_user("9876600009");
    backend.store.save(&user).await.unwrap();

    let grant = sessions::login(
        &backend.state,
        "Asha Verma",
        "9876600009",
        "asha@example.com",
    )
    .await
    .unwrap();
    assert_eq!(grant.courses.len(), 2);

    let stored = backend
        .store
        .find_by_mobile("9876600009")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.courses.len(), 2, "migration was persisted");

    // A second login sees the canonical shape and changes nothing further.
    let grant = sessions::login(
        &backend.state,
        "Asha Verma",
        "9876600009",
        "asha@example.com",
    )
    .await
    .unwrap();
    assert_eq!(grant.courses.len(), 2);
}
