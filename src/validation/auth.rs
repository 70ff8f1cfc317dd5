use crate::error::{AppError, Result};

/// Validates a login request. All three fields are required.
pub fn validate_login_request(name: &str, mobile: &str, email: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(AppError::Validation("Name cannot be empty".to_string()));
    }

    if mobile.trim().is_empty() {
        return Err(AppError::Validation("Mobile number cannot be empty".to_string()));
    }

    if email.trim().is_empty() {
        return Err(AppError::Validation("Email cannot be empty".to_string()));
    }

    Ok(())
}
