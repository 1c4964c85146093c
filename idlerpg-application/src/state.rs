use std::sync::Arc;

use idlerpg_domain::ports::{ChatPlatform, HealthCheckService};
use idlerpg_domain::{PlayerKey, RuntimeConfig};
use tokio::sync::OwnedMutexGuard;

use crate::{GameStore, Metrics, PlayerLocks};

#[derive(Clone)]
pub struct AppState {
    pub config: RuntimeConfig,
    pub store: GameStore,
    pub chat: Arc<dyn ChatPlatform>,
    pub health: Arc<dyn HealthCheckService>,
    pub metrics: Arc<Metrics>,
    pub player_locks: Arc<PlayerLocks>,
}

impl AppState {
    /// Takes the player's update lock when `serialize_player_updates` is on.
    /// Without it, concurrent tick and webhook writes to one player can
    /// overwrite each other.
    pub async fn lock_player(&self, key: &PlayerKey) -> Option<OwnedMutexGuard<()>> {
        if !self.config.serialize_player_updates {
            return None;
        }
        Some(self.player_locks.acquire(key).await)
    }
}
