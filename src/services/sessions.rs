use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use crate::{
    config::Config,
    error::{AppError, Result},
    models::claims::{SessionClaims, VerifiedIdentity, SESSION_TTL_HOURS},
    models::user::{CourseAccess, User},
    services::migration,
    state::AppState,
    validation::auth::validate_login_request,
};

/// A freshly issued session plus the courses it grants access to.
#[derive(Debug)]
pub struct SessionGrant {
    pub token: String,
    pub courses: Vec<CourseAccess>,
}

/// Normalizes a name for comparison: trimmed, lower-cased, internal
/// whitespace collapsed to single spaces.
fn normalize_name(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// The name-matching policy: exact equality of normalized names. A looser
/// containment rule existed historically; this is the one policy in force.
pub fn names_match(provided: &str, stored: &str) -> bool {
    normalize_name(provided) == normalize_name(stored)
}

/// Signs a session token for the user: 24 hours, bound to id, mobile, and
/// name.
pub fn mint_token(config: &Config, user: &User) -> Result<String> {
    let now = Utc::now();
    let claims = SessionClaims {
        sub: user.id,
        mobile: user.mobile.clone(),
        name: user.name.clone(),
        iat: now.timestamp(),
        exp: (now + Duration::hours(SESSION_TTL_HOURS)).timestamp(),
    };

    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(&config.session_secret),
    )
    .map_err(|e| AppError::Internal(format!("Token signing failed: {}", e)))
}

/// Validates credentials against the stored record and issues a session
/// token over the currently valid entitlements.
///
/// Storing the new token replaces whatever token was issued before: only the
/// most recent one passes verification, which is what enforces single-device
/// sessions.
pub async fn login(
    state: &AppState,
    name: &str,
    mobile: &str,
    email: &str,
) -> Result<SessionGrant> {
    validate_login_request(name, mobile, email)?;

    let _guard = state.user_locks.lock(mobile).await;

    let mut user = state
        .store
        .find_by_mobile_and_email(mobile, email)
        .await?
        .ok_or(AppError::NotFound)?;

    if !names_match(name, &user.name) {
        tracing::warn!("Login name mismatch for {}", mobile);
        return Err(AppError::Auth("Name does not match our records".to_string()));
    }

    if migration::migrate_legacy_access(&mut user) {
        state.store.save(&user).await?;
    }

    let now = Utc::now();
    let courses: Vec<CourseAccess> = user
        .valid_courses(now)
        .into_iter()
        .map(CourseAccess::from)
        .collect();

    if courses.is_empty() {
        return Err(AppError::Access("No active course".to_string()));
    }

    let token = mint_token(&state.config, &user)?;
    user.session_token = Some(token.clone());
    state.store.save(&user).await?;

    tracing::info!("🔐 Session issued for {}", mobile);

    Ok(SessionGrant { token, courses })
}

/// Verifies a bearer token and returns the identity it proves.
///
/// Beyond the signature and expiry check, the token must exactly equal the
/// user's currently stored one; any later login supersedes it.
pub async fn verify_token(state: &AppState, token: &str) -> Result<VerifiedIdentity> {
    let data = jsonwebtoken::decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(&state.config.session_secret),
        &Validation::default(),
    )
    .map_err(|_| AppError::Auth("Invalid or expired session token".to_string()))?;

    let user = state
        .store
        .find_by_id(&data.claims.sub)
        .await?
        .ok_or_else(|| AppError::Auth("Unknown session".to_string()))?;

    match user.session_token.as_deref() {
        Some(current) if current == token => Ok(VerifiedIdentity {
            user_id: user.id,
            mobile: user.mobile,
            name: user.name,
        }),
        _ => Err(AppError::Auth("Active session elsewhere".to_string())),
    }
}

/// The authenticated profile view: identity plus currently valid courses.
pub async fn profile(state: &AppState, identity: &VerifiedIdentity) -> Result<Vec<CourseAccess>> {
    let user = state
        .store
        .find_by_mobile(&identity.mobile)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(user
        .valid_courses(Utc::now())
        .into_iter()
        .map(CourseAccess::from)
        .collect())
}
