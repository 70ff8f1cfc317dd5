use chrono::{Duration, Utc};
use uuid::Uuid;
use crate::{
    error::Result,
    gateway::{RemoteCustomer, RemoteOrderRequest},
    models::catalog::{self, COURSE_VALIDITY_DAYS, INITIAL_ATTEMPTS},
    models::user::{Entitlement, User},
    state::AppState,
    validation::orders::validate_order_request,
};

/// The input to order creation.
#[derive(Debug, Clone)]
pub struct CreateOrderInput {
    pub name: String,
    pub mobile: String,
    pub email: String,
    /// A course id or the combo code.
    pub course_id: String,
    /// The client's nominal amount. Recognized selections are priced
    /// server-side instead.
    pub amount: f64,
    /// Template for the post-payment redirect; `{order_id}` is substituted.
    pub return_url: String,
    pub center: Option<String>,
}

/// Generates a fresh order identifier. The random component makes a collision
/// with any stored order id practically impossible.
fn new_order_id() -> String {
    format!("order_{}", Uuid::new_v4().simple())
}

/// Creates or refreshes the entitlement for one resolved course under the
/// new order. A re-purchase overwrites the order id, drops the grant back to
/// unpaid, and extends expiry; attempts are left untouched.
fn apply_course(user: &mut User, course: &catalog::ResolvedCourse, order_id: &str) {
    let now = Utc::now();
    let expires_at = now + Duration::days(COURSE_VALIDITY_DAYS);

    if let Some(entitlement) = user.entitlement_mut(&course.id) {
        entitlement.order_id = order_id.to_string();
        entitlement.paid = false;
        entitlement.paid_at = None;
        entitlement.expires_at = expires_at;
        return;
    }

    user.courses.push(Entitlement {
        course_id: course.id.clone(),
        course_name: course.name.clone(),
        subject: course.subject.clone(),
        paid: false,
        order_id: order_id.to_string(),
        paid_at: None,
        expires_at,
        attempts_left: INITIAL_ATTEMPTS,
        completed_modules: Vec::new(),
    });
}

/// Creates a pending entitlement set for the selection and requests a remote
/// order from the payment gateway. The gateway's payload is relayed verbatim.
///
/// A storage failure while persisting the pending entitlements is logged and
/// swallowed: the remote payment request must still be attempted, and the
/// record is re-synchronized on a later call if possible. A gateway failure
/// is always surfaced.
pub async fn create_order(state: &AppState, input: CreateOrderInput) -> Result<serde_json::Value> {
    validate_order_request(&input)?;

    let _guard = state.user_locks.lock(&input.mobile).await;

    let order_id = new_order_id();
    let (resolved, catalog_price) = catalog::resolve_selection(&input.course_id);
    let amount = catalog_price.unwrap_or(input.amount);

    tracing::info!(
        "📦 Order {} for {}: {} course(s), amount {}",
        order_id,
        input.mobile,
        resolved.len(),
        amount
    );

    let existing = state.store.find_by_mobile(&input.mobile).await?;
    let is_new = existing.is_none();
    let mut user = existing.unwrap_or_else(|| {
        User::new(
            input.name.clone(),
            input.mobile.clone(),
            input.email.clone(),
            input.center.clone(),
        )
    });

    for course in &resolved {
        apply_course(&mut user, course, &order_id);
    }

    let persisted = if is_new {
        state.store.create(&user).await
    } else {
        state.store.save(&user).await
    };
    if let Err(e) = persisted {
        tracing::warn!(
            "Order {} proceeding without persisted entitlements: {}",
            order_id,
            e
        );
    }

    let request = RemoteOrderRequest {
        order_id: order_id.clone(),
        amount,
        currency: state.config.gateway_currency.clone(),
        customer: RemoteCustomer {
            customer_id: user.id.to_string(),
            customer_name: user.name.clone(),
            customer_email: user.email.clone(),
            customer_phone: user.mobile.clone(),
        },
        return_url: input.return_url.replace("{order_id}", &order_id),
    };

    state.gateway.create_order(&request).await
}
