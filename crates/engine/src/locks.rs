//! Per-user serialization of event application.
//!
//! Two events for the same user must not interleave their read-modify-write
//! cycles; events for different users stay fully parallel. The map of locks
//! grows with the set of users seen by this process and is never pruned —
//! one mutex per user.

use std::collections::HashMap;
use std::sync::Arc;

use studyforge_core::types::DbId;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// A map of per-user async mutexes.
#[derive(Default)]
pub struct UserLocks {
    inner: Mutex<HashMap<DbId, Arc<Mutex<()>>>>,
}

impl UserLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the lock for one user. The guard is held across the whole
    /// event pipeline, including the badge unlock pass.
    pub async fn acquire(&self, user_id: DbId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut map = self.inner.lock().await;
            Arc::clone(map.entry(user_id).or_default())
        };
        lock.lock_owned().await
    }
}
