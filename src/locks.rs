use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Serializes record mutations per mobile number.
///
/// The record store itself does read-modify-write with no locking, so two
/// concurrent requests for the same user could otherwise lose an entitlement
/// update. Holding the per-mobile guard across the read and the save closes
/// that window within this process.
#[derive(Clone, Default)]
pub struct UserLocks {
    inner: Arc<Mutex<HashMap<String, Arc<AsyncMutex<()>>>>>,
}

impl UserLocks {
    /// Creates a new `UserLocks`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires the mutation guard for one mobile number.
    pub async fn lock(&self, mobile: &str) -> OwnedMutexGuard<()> {
        let entry = {
            let mut map = self.inner.lock().unwrap();
            map.entry(mobile.to_string())
                .or_insert_with(|| Arc::new(AsyncMutex::new(())))
                .clone()
        };
        entry.lock_owned().await
    }
}
