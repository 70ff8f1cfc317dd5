use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;
use crate::{
    error::{AppError, Result},
    models::user::User,
    repositories::user::UserStore,
};

/// An in-process `UserStore` keyed by mobile number. Backs the test suite and
/// local development without a database.
#[derive(Default)]
pub struct InMemoryUserStore {
    users: Mutex<HashMap<String, User>>,
    /// When set, writes fail with a storage error. Lets tests exercise the
    /// degraded order-creation path.
    fail_writes: Mutex<bool>,
}

impl InMemoryUserStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes subsequent writes fail, simulating an outage.
    pub fn set_fail_writes(&self, fail: bool) {
        *self.fail_writes.lock().unwrap() = fail;
    }

    fn check_writable(&self) -> Result<()> {
        if *self.fail_writes.lock().unwrap() {
            return Err(AppError::Storage("store unavailable".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_mobile(&self, mobile: &str) -> Result<Option<User>> {
        Ok(self.users.lock().unwrap().get(mobile).cloned())
    }

    async fn find_by_mobile_and_email(&self, mobile: &str, email: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .get(mobile)
            .filter(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_by_order_id(&self, order_id: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.holds_order(order_id))
            .cloned())
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.id == *id)
            .cloned())
    }

    async fn create(&self, user: &User) -> Result<()> {
        self.check_writable()?;
        let mut users = self.users.lock().unwrap();
        if users.contains_key(&user.mobile) {
            return Err(AppError::Storage(format!(
                "duplicate mobile: {}",
                user.mobile
            )));
        }
        users.insert(user.mobile.clone(), user.clone());
        Ok(())
    }

    async fn save(&self, user: &User) -> Result<()> {
        self.check_writable()?;
        self.users
            .lock()
            .unwrap()
            .insert(user.mobile.clone(), user.clone());
        Ok(())
    }
}
