use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    error::Result,
    models::catalog::CATALOG,
    models::claims::VerifiedIdentity,
    models::user::CourseAccess,
    services::{sessions, usage},
    state::AppState,
};

/// Handles the public catalog listing.
#[axum::debug_handler]
pub async fn list_catalog() -> Response {
    (StatusCode::OK, Json(CATALOG)).into_response()
}

/// The response payload for the profile view.
#[derive(Serialize)]
pub struct ProfileResponse {
    pub name: String,
    pub mobile: String,
    pub courses: Vec<CourseAccess>,
}

/// Handles the authenticated profile view.
#[axum::debug_handler]
pub async fn profile(
    State(state): State<AppState>,
    Extension(identity): Extension<VerifiedIdentity>,
) -> Result<Response> {
    let courses = sessions::profile(&state, &identity).await?;

    let response = ProfileResponse {
        name: identity.name,
        mobile: identity.mobile,
        courses,
    };

    Ok((StatusCode::OK, Json(response)).into_response())
}

/// The request payload for attempt consumption.
#[derive(Deserialize, Debug)]
pub struct ConsumeAttemptRequest {
    pub course_id: String,
}

/// The response payload for attempt consumption.
#[derive(Serialize)]
pub struct ConsumeAttemptResponse {
    pub course_id: String,
    pub attempts_left: i32,
}

/// Handles attempt consumption on a paid course.
#[axum::debug_handler]
pub async fn consume_attempt(
    State(state): State<AppState>,
    Extension(identity): Extension<VerifiedIdentity>,
    Json(payload): Json<ConsumeAttemptRequest>,
) -> Result<Response> {
    let attempts_left =
        usage::consume_attempt(&state, &identity.mobile, &payload.course_id).await?;

    let response = ConsumeAttemptResponse {
        course_id: payload.course_id,
        attempts_left,
    };

    Ok((StatusCode::OK, Json(response)).into_response())
}

/// The request payload for recording progress.
#[derive(Deserialize, Debug)]
pub struct RecordProgressRequest {
    pub course_id: String,
    pub completed_modules: Vec<String>,
}

/// The response payload for recording progress.
#[derive(Serialize)]
pub struct RecordProgressResponse {
    pub course_id: String,
    pub completed_modules: Vec<String>,
}

/// Handles progress recording on a paid course.
#[axum::debug_handler]
pub async fn record_progress(
    State(state): State<AppState>,
    Extension(identity): Extension<VerifiedIdentity>,
    Json(payload): Json<RecordProgressRequest>,
) -> Result<Response> {
    let merged = usage::record_progress(
        &state,
        &identity.mobile,
        &payload.course_id,
        &payload.completed_modules,
    )
    .await?;

    let response = RecordProgressResponse {
        course_id: payload.course_id,
        completed_modules: merged,
    };

    Ok((StatusCode::OK, Json(response)).into_response())
}
