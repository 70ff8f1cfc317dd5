use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// The application's error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// A validation error.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A resource not found error.
    #[error("Resource not found")]
    NotFound,

    /// An authentication error.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// A business-rule denial, distinct from authentication.
    #[error("Access denied: {0}")]
    Access(String),

    /// A payment gateway error carrying the provider's payload.
    #[error("Payment gateway error: {0}")]
    Gateway(serde_json::Value),

    /// A database pool error.
    #[error("Storage error: {0}")]
    Pool(#[from] deadpool_postgres::PoolError),

    /// A database error.
    #[error("Storage error: {0}")]
    Postgres(#[from] tokio_postgres::Error),

    /// A storage error outside the database driver.
    #[error("Storage error: {0}")]
    Storage(String),

    /// An internal server error.
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Whether this error originated in the record store.
    pub fn is_storage(&self) -> bool {
        matches!(
            self,
            AppError::Pool(_) | AppError::Postgres(_) | AppError::Storage(_)
        )
    }
}

/// A `Result` type that uses `AppError` as the error type.
pub type Result<T> = std::result::Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Validation(ref msg) => {
                tracing::debug!("Validation error: {}", msg);
                (StatusCode::BAD_REQUEST, msg.clone())
            }

            AppError::NotFound => {
                tracing::debug!("Resource not found");
                (StatusCode::NOT_FOUND, "Resource not found".to_string())
            }

            AppError::Auth(ref msg) => {
                tracing::warn!("Authentication failed: {}", msg);
                (StatusCode::UNAUTHORIZED, msg.clone())
            }

            AppError::Access(ref msg) => {
                tracing::warn!("Access denied: {}", msg);
                (StatusCode::FORBIDDEN, msg.clone())
            }

            AppError::Gateway(ref payload) => {
                tracing::error!("Payment gateway error: {}", payload);
                (StatusCode::BAD_GATEWAY, format!("Payment gateway error: {}", payload))
            }

            AppError::Pool(ref e) => {
                tracing::error!("Database pool error: {}", e);
                (StatusCode::SERVICE_UNAVAILABLE, "Storage unavailable".to_string())
            }

            AppError::Postgres(ref e) => {
                tracing::error!("Database error: {}", e);
                (StatusCode::SERVICE_UNAVAILABLE, "Storage unavailable".to_string())
            }

            AppError::Storage(ref msg) => {
                tracing::error!("Storage error: {}", msg);
                (StatusCode::SERVICE_UNAVAILABLE, "Storage unavailable".to_string())
            }

            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        let body = sonic_rs::to_string(&sonic_rs::json!({
            "error": message
        }))
        .unwrap_or_else(|_| r#"{"error":"Internal server error"}"#.to_string());

        (status, body).into_response()
    }
}
