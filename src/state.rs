use std::sync::Arc;
use crate::config::Config;
use crate::error::Result;
use crate::gateway::{HttpGateway, PaymentGateway};
use crate::locks::UserLocks;
use crate::repositories::user::{PgUserStore, UserStore};

/// The application's state.
#[derive(Clone)]
pub struct AppState {
    /// The record store.
    pub store: Arc<dyn UserStore>,
    /// The payment gateway client.
    pub gateway: Arc<dyn PaymentGateway>,
    /// The application's configuration.
    pub config: Config,
    /// Per-user mutation serialization.
    pub user_locks: UserLocks,
}

impl AppState {
    /// Creates the production `AppState`: PostgreSQL store plus HTTP gateway.
    ///
    /// # Arguments
    ///
    /// * `config` - The application's configuration.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `AppState`.
    pub async fn new(config: &Config) -> Result<Self> {
        let pool = crate::db::create_pool(&config.database_url)?;
        tracing::info!("✅ PostgreSQL Pool initialized with deadpool-postgres");

        let store: Arc<dyn UserStore> = Arc::new(PgUserStore::new(pool));
        let gateway: Arc<dyn PaymentGateway> = Arc::new(HttpGateway::new(config));
        tracing::info!("✅ Payment gateway client initialized");

        Ok(Self::with_backends(store, gateway, config.clone()))
    }

    /// Assembles an `AppState` from explicit backends. Tests substitute an
    /// in-memory store and a scripted gateway here.
    pub fn with_backends(
        store: Arc<dyn UserStore>,
        gateway: Arc<dyn PaymentGateway>,
        config: Config,
    ) -> Self {
        AppState {
            store,
            gateway,
            config,
            user_locks: UserLocks::new(),
        }
    }
}
