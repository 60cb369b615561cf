//! Per contact serialization of the find-or-create sequence.
//!
//! Two relays for the same brand new contact would otherwise both miss the
//! contact search and create the contact twice. The guard is process local:
//! several bridge processes sharing one Chatwoot account can still race.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, Weak},
};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::models::jid::ContactKey;

#[derive(Default)]
pub struct ContactLocks {
    locks: Mutex<HashMap<String, Weak<AsyncMutex<()>>>>,
}

impl ContactLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits until no other task holds the lock of `(tenant_id, key)`.
    pub async fn lock(&self, tenant_id: i64, key: &ContactKey) -> OwnedMutexGuard<()> {
        let mutex = {
            let mut locks = self
                .locks
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());

            // entries nobody holds anymore
            locks.retain(|_, lock| lock.strong_count() > 0);

            let lock_key = format!("{tenant_id}:{key}");
            match locks.get(&lock_key).and_then(Weak::upgrade) {
                Some(mutex) => mutex,
                None => {
                    let mutex = Arc::new(AsyncMutex::new(()));
                    locks.insert(lock_key, Arc::downgrade(&mutex));
                    mutex
                }
            }
        };

        mutex.lock_owned().await
    }

    #[cfg(test)]
    pub fn active_keys(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .values()
            .filter(|lock| lock.strong_count() > 0)
            .count()
    }

    #[cfg(test)]
    fn stored_keys(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }
}
