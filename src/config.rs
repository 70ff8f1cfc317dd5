use std::env;
use anyhow::{Context, Result};
use zeroize::{Zeroize, Zeroizing};

/// The application's configuration.
#[derive(Clone)]
pub struct Config {
    /// The URL of the PostgreSQL database.
    pub database_url: String,
    /// The key used to sign session tokens.
    pub session_secret: Zeroizing<Vec<u8>>,
    /// The base URL of the payment gateway API.
    pub gateway_base_url: String,
    /// The client id issued by the payment gateway.
    pub gateway_client_id: String,
    /// The client secret issued by the payment gateway.
    pub gateway_client_secret: String,
    /// The currency code sent with remote orders.
    pub gateway_currency: String,
}

impl Config {
    /// Creates a new `Config` from environment variables.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `Config`.
    pub fn from_env() -> Result<Self> {
        let mut session_secret_hex = env::var("SESSION_SECRET")
            .context("SESSION_SECRET must be set (generate with: openssl rand -hex 32)")?;

        let session_secret_bytes = hex::decode(&session_secret_hex)
            .context("SESSION_SECRET must be valid hexadecimal")?;

        session_secret_hex.zeroize();

        if session_secret_bytes.len() != 32 {
            anyhow::bail!("SESSION_SECRET must be exactly 32 bytes (64 hex characters)");
        }

        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .context("DATABASE_URL must be set")?,
            session_secret: Zeroizing::new(session_secret_bytes),
            gateway_base_url: env::var("GATEWAY_BASE_URL")
                .context("GATEWAY_BASE_URL must be set")?,
            gateway_client_id: env::var("GATEWAY_CLIENT_ID")
                .context("GATEWAY_CLIENT_ID must be set")?,
            gateway_client_secret: env::var("GATEWAY_CLIENT_SECRET")
                .context("GATEWAY_CLIENT_SECRET must be set")?,
            gateway_currency: env::var("GATEWAY_CURRENCY")
                .unwrap_or_else(|_| "INR".to_string()),
        })
    }
}
