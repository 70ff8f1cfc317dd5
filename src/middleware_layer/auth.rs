use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};

use crate::{
    error::{AppError, Result},
    services::sessions,
    state::AppState,
};

/// Extracts the bearer token from the Authorization header.
fn extract_bearer_token(request: &Request<Body>) -> Option<&str> {
    request
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
}

/// A middleware that requires a valid, current session token.
///
/// The verified identity is attached to the request; handlers read the
/// mobile number from it rather than from the client payload.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response> {
    tracing::debug!("🔐 Checking authentication...");

    let token = extract_bearer_token(&request).ok_or_else(|| {
        tracing::warn!("❌ No bearer token presented");
        AppError::Auth("Missing session token".to_string())
    })?;

    let identity = sessions::verify_token(&state, token).await?;

    tracing::debug!("✅ User authenticated: {}", identity.user_id);

    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}
