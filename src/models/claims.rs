use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How long a session token stays valid, independent of course expiry.
pub const SESSION_TTL_HOURS: i64 = 24;

/// The signed contents of a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// The user id the token was issued to.
    pub sub: Uuid,
    /// The mobile number at issue time.
    pub mobile: String,
    /// The name at issue time.
    pub name: String,
    /// Issued-at, seconds since the epoch.
    pub iat: i64,
    /// Expiry, seconds since the epoch.
    pub exp: i64,
}

/// The identity attached to a request after token verification.
#[derive(Debug, Clone)]
pub struct VerifiedIdentity {
    pub user_id: Uuid,
    pub mobile: String,
    pub name: String,
}
