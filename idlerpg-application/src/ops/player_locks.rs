use std::collections::HashMap;
use std::sync::Arc;

use idlerpg_domain::{PlayerKey, TeamId};
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

/// Per-player async locks. Holding a player's guard makes its
/// load-modify-save a single writer across the tick and webhook paths.
#[derive(Default)]
pub struct PlayerLocks {
    locks: RwLock<HashMap<PlayerKey, Arc<Mutex<()>>>>,
}

impl PlayerLocks {
    pub async fn acquire(&self, key: &PlayerKey) -> OwnedMutexGuard<()> {
        let existing = { self.locks.read().await.get(key).cloned() };
        let lock = match existing {
            Some(lock) => lock,
            None => {
                let mut locks = self.locks.write().await;
                locks.entry(key.clone()).or_default().clone()
            }
        };
        lock.lock_owned().await
    }

    pub async fn forget_team(&self, team: &TeamId) {
        let mut locks = self.locks.write().await;
        locks.retain(|key, _| &key.team != team);
    }

    pub async fn len(&self) -> usize {
        self.locks.read().await.len()
    }
}
