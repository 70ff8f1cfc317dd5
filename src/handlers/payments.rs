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
    services::payments::{self, VerifyOutcome},
    state::AppState,
};

/// The request payload for payment verification.
#[derive(Deserialize, Debug)]
pub struct VerifyPaymentRequest {
    pub order_id: String,
}

/// The response payload for payment verification.
#[derive(Serialize)]
pub struct VerifyPaymentResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub courses: Option<Vec<CourseAccess>>,
}

/// Handles payment verification after the client returns from the gateway.
#[axum::debug_handler]
pub async fn verify_payment(
    State(state): State<AppState>,
    Json(payload): Json<VerifyPaymentRequest>,
) -> Result<Response> {
    tracing::info!("💳 Verify request for order {}", payload.order_id);

    let response = match payments::verify_payment(&state, &payload.order_id).await? {
        VerifyOutcome::Confirmed { token, courses } => VerifyPaymentResponse {
            success: true,
            message: "Payment confirmed".to_string(),
            token: Some(token),
            courses: Some(courses),
        },
        VerifyOutcome::NotPaid { status } => VerifyPaymentResponse {
            success: false,
            message: format!("Payment not completed (status: {})", status),
            token: None,
            courses: None,
        },
        VerifyOutcome::UnknownOrder => VerifyPaymentResponse {
            success: false,
            message: "No user recorded for this order".to_string(),
            token: None,
            courses: None,
        },
        VerifyOutcome::Stale => VerifyPaymentResponse {
            success: false,
            message: "Order already superseded".to_string(),
            token: None,
            courses: None,
        },
    };

    Ok((StatusCode::OK, Json(response)).into_response())
}
