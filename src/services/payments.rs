use chrono::Utc;
use crate::{
    error::{AppError, Result},
    models::user::CourseAccess,
    services::sessions,
    state::AppState,
};

/// The outcome of a payment verification. Only `Confirmed` mutates anything.
#[derive(Debug)]
pub enum VerifyOutcome {
    /// Payment confirmed: the order's entitlements were activated and a
    /// session was issued.
    Confirmed {
        token: String,
        courses: Vec<CourseAccess>,
    },
    /// The gateway does not consider the order paid.
    NotPaid { status: String },
    /// No user holds an entitlement under this order.
    UnknownOrder,
    /// A user was found but the order no longer matches any entitlement
    /// (superseded by a later re-purchase). No token is re-issued.
    Stale,
}

/// Reconciles one order against the gateway. On a paid order, activates
/// every entitlement created under that order id in one write (which is what
/// settles both halves of a combo purchase together), then issues a session
/// token.
pub async fn verify_payment(state: &AppState, order_id: &str) -> Result<VerifyOutcome> {
    if order_id.trim().is_empty() {
        return Err(AppError::Validation("order_id is required".to_string()));
    }

    let status = state.gateway.order_status(order_id).await?;
    if !status.is_paid() {
        tracing::info!("Order {} not settled yet: {}", order_id, status.label());
        return Ok(VerifyOutcome::NotPaid {
            status: status.label().to_string(),
        });
    }

    let Some(owner) = state.store.find_by_order_id(order_id).await? else {
        tracing::warn!("Paid order {} has no owning user", order_id);
        return Ok(VerifyOutcome::UnknownOrder);
    };

    let _guard = state.user_locks.lock(&owner.mobile).await;

    // Re-read under the lock; a concurrent re-purchase may have moved the
    // entitlements to a newer order id.
    let mut user = state
        .store
        .find_by_mobile(&owner.mobile)
        .await?
        .ok_or(AppError::NotFound)?;

    let now = Utc::now();
    let mut activated = 0;
    for entitlement in user.courses.iter_mut().filter(|e| e.order_id == order_id) {
        entitlement.paid = true;
        if entitlement.paid_at.is_none() {
            entitlement.paid_at = Some(now);
        }
        activated += 1;
    }

    if activated == 0 {
        tracing::warn!("Order {} matches no entitlement on {}", order_id, user.mobile);
        return Ok(VerifyOutcome::Stale);
    }

    state.store.save(&user).await?;
    tracing::info!(
        "💳 Order {} confirmed: {} entitlement(s) activated for {}",
        order_id,
        activated,
        user.mobile
    );

    let token = sessions::mint_token(&state.config, &user)?;
    user.session_token = Some(token.clone());
    state.store.save(&user).await?;

    let courses = user
        .valid_courses(now)
        .into_iter()
        .map(CourseAccess::from)
        .collect();

    Ok(VerifyOutcome::Confirmed { token, courses })
}
