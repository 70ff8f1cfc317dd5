use chrono::Utc;
use crate::models::catalog::{CATALOG, INITIAL_ATTEMPTS};
use crate::models::user::{Entitlement, User};

/// The order id stamped on entitlements synthesized from legacy scalars.
/// Distinct from any gateway-issued order id.
pub const MIGRATED_ORDER_MARKER: &str = "legacy-migrated";

/// Brings a user stored under either historical schema into the canonical
/// multi-entitlement shape. Returns `true` when the record changed and must
/// be persisted.
///
/// Two shapes are bridged:
/// - scalars only (no entitlement sequence): both catalog courses are
///   synthesized from the legacy fields, tagged with the migration marker;
/// - a single paid, unexpired, non-migrated entitlement: the missing catalog
///   sibling is added under the same order id and expiry.
///
/// Idempotent: a user already holding both catalog courses is left unchanged.
/// The check is on course presence, not the marker, since a real order id may
/// also cover a single course.
///
/// Granting both catalog courses to every legacy paid user is the historical
/// business policy, preserved as-is; nothing structural forces it.
pub fn migrate_legacy_access(user: &mut User) -> bool {
    let now = Utc::now();

    if CATALOG.iter().all(|c| user.entitlement(c.id).is_some()) {
        return false;
    }

    let legacy_paid = user.legacy.paid.unwrap_or(false);
    let legacy_live = user.legacy.expires_at.map(|t| t > now).unwrap_or(false);
    if !legacy_paid || !legacy_live {
        return false;
    }

    if user.courses.is_empty() {
        // Oldest shape: nothing but scalars. The expiry was checked live above.
        let Some(expires_at) = user.legacy.expires_at else {
            return false;
        };
        let attempts = user.legacy.attempts_left.unwrap_or(INITIAL_ATTEMPTS);

        for course in &CATALOG {
            user.courses.push(Entitlement {
                course_id: course.id.to_string(),
                course_name: course.name.to_string(),
                subject: course.subject.to_string(),
                paid: true,
                order_id: MIGRATED_ORDER_MARKER.to_string(),
                paid_at: None,
                expires_at,
                attempts_left: attempts,
                completed_modules: Vec::new(),
            });
        }

        tracing::info!("Migrated legacy record for {} from scalar fields", user.mobile);
        return true;
    }

    if user.courses.len() == 1 {
        let existing = &user.courses[0];
        let eligible = existing.paid
            && existing.expires_at > now
            && existing.order_id != MIGRATED_ORDER_MARKER;
        if !eligible {
            return false;
        }

        let order_id = existing.order_id.clone();
        let paid_at = existing.paid_at;
        let expires_at = existing.expires_at;
        let held = existing.course_id.clone();

        let mut changed = false;
        for course in CATALOG.iter().filter(|c| c.id != held) {
            if user.entitlement(course.id).is_some() {
                continue;
            }
            user.courses.push(Entitlement {
                course_id: course.id.to_string(),
                course_name: course.name.to_string(),
                subject: course.subject.to_string(),
                paid: true,
                order_id: order_id.clone(),
                paid_at,
                expires_at,
                attempts_left: INITIAL_ATTEMPTS,
                completed_modules: Vec::new(),
            });
            changed = true;
        }

        if changed {
            tracing::info!("Added missing sibling course for legacy user {}", user.mobile);
        }
        return changed;
    }

    false
}
