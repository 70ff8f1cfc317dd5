use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One course's access grant for a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entitlement {
    /// The course identifier.
    pub course_id: String,
    /// The display name.
    pub course_name: String,
    /// The subject code.
    pub subject: String,
    /// Whether the owning order has been confirmed by the gateway.
    pub paid: bool,
    /// The order this grant was created (or last refreshed) under.
    pub order_id: String,
    /// When payment was confirmed.
    pub paid_at: Option<DateTime<Utc>>,
    /// When this grant stops being usable.
    pub expires_at: DateTime<Utc>,
    /// Remaining attempts, never below zero.
    pub attempts_left: i32,
    /// Identifiers of modules the user has completed. Grows as a set.
    pub completed_modules: Vec<String>,
}

impl Entitlement {
    /// Whether this grant is usable right now: confirmed and not expired.
    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        self.paid && self.expires_at > now
    }

    /// Merges module identifiers into the completed set, suppressing
    /// duplicates. Submitting the same identifier twice has no effect.
    pub fn merge_completed(&mut self, modules: &[String]) {
        for module in modules {
            if !self.completed_modules.contains(module) {
                self.completed_modules.push(module.clone());
            }
        }
    }
}

/// Scalar fields from the pre-multi-course schema. Only populated on records
/// created before entitlements became a sequence; read by the migration and
/// never written by new code.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LegacyAccess {
    pub course_id: Option<String>,
    pub paid: Option<bool>,
    pub expires_at: Option<DateTime<Utc>>,
    pub attempts_left: Option<i32>,
    pub order_id: Option<String>,
}

impl LegacyAccess {
    /// Whether any legacy field carries data.
    pub fn is_empty(&self) -> bool {
        self.course_id.is_none()
            && self.paid.is_none()
            && self.expires_at.is_none()
            && self.attempts_left.is_none()
            && self.order_id.is_none()
    }
}

/// Represents a user and their course entitlements.
///
/// The mobile number is the unique natural key; every mutation path looks the
/// record up by mobile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// The unique identifier for the user.
    pub id: Uuid,
    /// The user's full name.
    pub name: String,
    /// The user's email address.
    pub email: String,
    /// The user's mobile number. Globally unique.
    pub mobile: String,
    /// The display center/branch name, if provided.
    pub center: Option<String>,
    /// The most recently issued session token. Only this token is accepted
    /// for protected operations.
    pub session_token: Option<String>,
    /// Entitlements in purchase/addition order.
    pub courses: Vec<Entitlement>,
    /// Scalars from the pre-multi-course schema.
    pub legacy: LegacyAccess,
    /// The timestamp when the user was created.
    pub created_at: DateTime<Utc>,
    /// The timestamp when the user was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Creates a fresh user with no entitlements.
    pub fn new(name: String, mobile: String, email: String, center: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            email,
            mobile,
            center,
            session_token: None,
            courses: Vec::new(),
            legacy: LegacyAccess::default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns the entitlement for one course id, if held.
    pub fn entitlement(&self, course_id: &str) -> Option<&Entitlement> {
        self.courses.iter().find(|e| e.course_id == course_id)
    }

    /// Mutable access to the entitlement for one course id.
    pub fn entitlement_mut(&mut self, course_id: &str) -> Option<&mut Entitlement> {
        self.courses.iter_mut().find(|e| e.course_id == course_id)
    }

    /// Whether any entitlement was created under the given order.
    pub fn holds_order(&self, order_id: &str) -> bool {
        self.courses.iter().any(|e| e.order_id == order_id)
    }

    /// The entitlements usable at `now`: paid and not expired. Expired grants
    /// are excluded here but never deleted.
    pub fn valid_courses(&self, now: DateTime<Utc>) -> Vec<&Entitlement> {
        self.courses.iter().filter(|e| e.is_valid(now)).collect()
    }
}

/// The client-facing projection of one valid entitlement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseAccess {
    pub course_id: String,
    pub course_name: String,
    pub subject: String,
    pub attempts_left: i32,
    pub completed_modules: Vec<String>,
}

impl From<&Entitlement> for CourseAccess {
    fn from(entitlement: &Entitlement) -> Self {
        Self {
            course_id: entitlement.course_id.clone(),
            course_name: entitlement.course_name.clone(),
            subject: entitlement.subject.clone(),
            attempts_left: entitlement.attempts_left,
            completed_modules: entitlement.completed_modules.clone(),
        }
    }
}
