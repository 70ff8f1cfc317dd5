use crate::error::{AppError, Result};
use crate::services::orders::CreateOrderInput;

/// Validates an order-creation request. Name, mobile, email, and amount must
/// be present; anything missing is the caller's problem to fix, never retried.
pub fn validate_order_request(input: &CreateOrderInput) -> Result<()> {
    if input.name.trim().is_empty() {
        return Err(AppError::Validation("Name cannot be empty".to_string()));
    }

    if input.mobile.trim().is_empty() {
        return Err(AppError::Validation("Mobile number cannot be empty".to_string()));
    }

    if input.email.trim().is_empty() {
        return Err(AppError::Validation("Email cannot be empty".to_string()));
    }

    if !input.email.contains('@') {
        return Err(AppError::Validation("Email is malformed".to_string()));
    }

    if input.amount <= 0.0 {
        return Err(AppError::Validation("Amount must be greater than zero".to_string()));
    }

    Ok(())
}
