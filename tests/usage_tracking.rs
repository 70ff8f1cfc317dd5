mod common;

use chrono::{Duration, Utc};
use common::*;
use coursedesk::error::AppError;
use coursedesk::repositories::user::UserStore;
use coursedesk::services::{sessions, usage};

#[tokio::test]
async fn attempts_decrement_one_at_a_time() {
    let backend = test_backend();
    seed_paid_user(&backend.store, "9876700001", "soft-skills", 30).await;

    let left = usage::consume_attempt(&backend.state, "9876700001", "soft-skills")
        .await
        .unwrap();
    assert_eq!(left, 29);

    let left = usage::consume_attempt(&backend.state, "9876700001", "soft-skills")
        .await
        .unwrap();
    assert_eq!(left, 28);

    let stored = backend
        .store
        .find_by_mobile("9876700001")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.entitlement("soft-skills").unwrap().attempts_left, 28);
}

#[tokio::test]
async fn attempts_never_go_below_zero() {
    let backend = test_backend();
    seed_paid_user(&backend.store, "9876700002", "soft-skills", 1).await;

    let left = usage::consume_attempt(&backend.state, "9876700002", "soft-skills")
        .await
        .unwrap();
    assert_eq!(left, 0);

    let err = usage::consume_attempt(&backend.state, "9876700002", "soft-skills")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Access(_)));

    let stored = backend
        .store
        .find_by_mobile("9876700002")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        stored.entitlement("soft-skills").unwrap().attempts_left,
        0,
        "denied call leaves the counter at zero"
    );
}

#[tokio::test]
async fn unpaid_course_cannot_consume_attempts() {
    let backend = test_backend();
    let mut user = seed_paid_user(&backend.store, "9876700003", "soft-skills", 30).await;
    user.courses[0].paid = false;
    backend.store.save(&user).await.unwrap();

    let err = usage::consume_attempt(&backend.state, "9876700003", "soft-skills")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound));
}

#[tokio::test]
async fn unknown_course_and_unknown_user_are_not_found() {
    let backend = test_backend();
    seed_paid_user(&backend.store, "9876700004", "soft-skills", 30).await;

    let err = usage::consume_attempt(&backend.state, "9876700004", "language-skills")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound));

    let err = usage::consume_attempt(&backend.state, "9876799999", "soft-skills")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound));
}

#[tokio::test]
async fn expired_but_paid_course_still_consumes_attempts() {
    let backend = test_backend();
    let mut user = seed_paid_user(&backend.store, "9876700005", "soft-skills", 5).await;
    user.courses[0].expires_at = Utc::now() - Duration::days(1);
    backend.store.save(&user).await.unwrap();

    let left = usage::consume_attempt(&backend.state, "9876700005", "soft-skills")
        .await
        .unwrap();
    assert_eq!(left, 4, "expiry is not re-checked on attempt consumption");
}

#[tokio::test]
async fn progress_merges_as_a_set() {
    let backend = test_backend();
    seed_paid_user(&backend.store, "9876700006", "soft-skills", 30).await;

    let first = vec!["m1".to_string(), "m2".to_string()];
    let merged = usage::record_progress(&backend.state, "9876700006", "soft-skills", &first)
        .await
        .unwrap();
    assert_eq!(merged, vec!["m1", "m2"]);

    let overlapping = vec!["m2".to_string(), "m3".to_string(), "m2".to_string()];
    let merged = usage::record_progress(&backend.state, "9876700006", "soft-skills", &overlapping)
        .await
        .unwrap();
    assert_eq!(merged, vec!["m1", "m2", "m3"]);

    // Idempotent: the same submission again changes nothing.
    let merged = usage::record_progress(&backend.state, "9876700006", "soft-skills", &overlapping)
        .await
        .unwrap();
    assert_eq!(merged, vec!["m1", "m2", "m3"]);
}

#[tokio::test]
async fn progress_requires_a_paid_course() {
    let backend = test_backend();
    let mut user = seed_paid_user(&backend.store, "9876700007", "soft-skills", 30).await;
    user.courses[0].paid = false;
    backend.store.save(&user).await.unwrap();

    let modules = vec!["m1".to_string()];
    let err = usage::record_progress(&backend.state, "9876700007", "soft-skills", &modules)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound));
}

#[tokio::test]
async fn login_never_resets_attempts_or_progress() {
    let backend = test_backend();
    seed_paid_user(&backend.store, "9876700008", "soft-skills", 30).await;

    usage::consume_attempt(&backend.state, "9876700008", "soft-skills")
        .await
        .unwrap();
    let modules = vec!["m1".to_string()];
    usage::record_progress(&backend.state, "9876700008", "soft-skills", &modules)
        .await
        .unwrap();

    let grant = sessions::login(
        &backend.state,
        "Asha Verma",
        "9876700008",
        "asha@example.com",
    )
    .await
    .unwrap();

    let course = grant
        .courses
        .iter()
        .find(|c| c.course_id == "soft-skills")
        .unwrap();
    assert_eq!(course.attempts_left, 29);
    assert_eq!(course.completed_modules, vec!["m1"]);
}
