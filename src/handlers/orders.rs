use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use crate::{
    error::Result,
    services::orders::{self, CreateOrderInput},
    state::AppState,
};

/// The request payload for order creation.
#[derive(Deserialize, Debug)]
pub struct CreateOrderRequest {
    pub name: String,
    pub mobile: String,
    pub email: String,
    pub course_id: String,
    pub amount: f64,
    pub return_url: String,
    #[serde(default)]
    pub center: Option<String>,
}

/// Handles order creation. The gateway's payload is relayed verbatim so the
/// client can open the payment page.
#[axum::debug_handler]
pub async fn create_order(
    State(state): State<AppState>,
    Json(payload): Json<CreateOrderRequest>,
) -> Result<Response> {
    tracing::info!("📦 Order request for mobile {}", payload.mobile);

    let gateway_payload = orders::create_order(
        &state,
        CreateOrderInput {
            name: payload.name,
            mobile: payload.mobile,
            email: payload.email,
            course_id: payload.course_id,
            amount: payload.amount,
            return_url: payload.return_url,
            center: payload.center,
        },
    )
    .await?;

    Ok((StatusCode::OK, Json(gateway_payload)).into_response())
}
