use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};

use idlerpg_application::{AppState, GameStore, Metrics, PlayerLocks};
use idlerpg_domain::ports::KeyValueStore;
use idlerpg_domain::StoreConfig;
use idlerpg_infrastructure::{AppConfig, DefaultHealthService, MemoryStore, RedisStore, SlackPlatform};

pub struct AppContext {
    pub state: AppState,
}

impl AppContext {
    pub async fn new() -> Result<Self> {
        let config = AppConfig::load().await?;
        let runtime_config = config.to_runtime_config();

        let kv = build_store(&config.to_store_config()).await?;
        let store = GameStore::new(kv);
        let chat = Arc::new(SlackPlatform::new(config.to_slack_config())?);

        if runtime_config.signing_secret.is_none() {
            warn!("slack_signing_secret not set, webhook requests are not verified");
        }

        let state = AppState {
            config: runtime_config,
            store: store.clone(),
            chat,
            health: Arc::new(DefaultHealthService::new(store)),
            metrics: Arc::new(Metrics::default()),
            player_locks: Arc::new(PlayerLocks::default()),
        };

        Ok(Self { state })
    }
}

async fn build_store(config: &StoreConfig) -> Result<Arc<dyn KeyValueStore>> {
    let Some(url) = &config.redis_url else {
        warn!("redis_url not set, game state is kept in memory and lost on restart");
        return Ok(Arc::new(MemoryStore::new()));
    };
    let store = RedisStore::new(url, config.redis_prefix.clone())?;
    if let Err(err) = store.ping().await {
        warn!("redis not reachable yet, will retry on first use: {}", err);
    } else {
        info!("connected to redis");
    }
    Ok(Arc::new(store))
}
