use crate::{
    error::{AppError, Result},
    state::AppState,
};

/// Consumes one attempt on a paid course. The mobile comes from the verified
/// token, never from the client payload.
///
/// Expiry is deliberately not re-checked here; an expired-but-paid course can
/// still burn attempts. Callers wanting stricter behavior re-validate before
/// calling.
pub async fn consume_attempt(state: &AppState, mobile: &str, course_id: &str) -> Result<i32> {
    let _guard = state.user_locks.lock(mobile).await;

    let mut user = state
        .store
        .find_by_mobile(mobile)
        .await?
        .ok_or(AppError::NotFound)?;

    let entitlement = user
        .courses
        .iter_mut()
        .find(|e| e.course_id == course_id && e.paid)
        .ok_or(AppError::NotFound)?;

    if entitlement.attempts_left <= 0 {
        return Err(AppError::Access("No attempts left".to_string()));
    }

    entitlement.attempts_left -= 1;
    let remaining = entitlement.attempts_left;

    state.store.save(&user).await?;
    tracing::debug!("Attempt consumed on {} for {}: {} left", course_id, mobile, remaining);

    Ok(remaining)
}

/// Records completed modules on a paid course as a set union and returns the
/// merged set. Re-submitting a module id changes nothing.
pub async fn record_progress(
    state: &AppState,
    mobile: &str,
    course_id: &str,
    modules: &[String],
) -> Result<Vec<String>> {
    let _guard = state.user_locks.lock(mobile).await;

    let mut user = state
        .store
        .find_by_mobile(mobile)
        .await?
        .ok_or(AppError::NotFound)?;

    let entitlement = user
        .courses
        .iter_mut()
        .find(|e| e.course_id == course_id && e.paid)
        .ok_or(AppError::NotFound)?;

    entitlement.merge_completed(modules);
    let merged = entitlement.completed_modules.clone();

    state.store.save(&user).await?;

    Ok(merged)
}
