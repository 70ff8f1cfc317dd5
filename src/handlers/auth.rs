use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    error::Result,
    models::user::CourseAccess,
    services::sessions,
    state::AppState,
};

/// The request payload for login.
#[derive(Deserialize, Debug)]
pub struct LoginRequest {
    pub name: String,
    pub mobile: String,
    pub email: String,
}

/// The response payload for a successful login.
#[derive(Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub token: String,
    pub courses: Vec<CourseAccess>,
}

/// Handles login. Issues a fresh session token; any previously issued token
/// for the same user stops verifying.
#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Response> {
    tracing::info!("🔐 Login attempt for mobile {}", payload.mobile);

    let grant = sessions::login(&state, &payload.name, &payload.mobile, &payload.email).await?;

    let response = LoginResponse {
        success: true,
        token: grant.token,
        courses: grant.courses,
    };

    Ok((StatusCode::OK, Json(response)).into_response())
}
