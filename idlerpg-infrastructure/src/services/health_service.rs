use async_trait::async_trait;
use idlerpg_application::GameStore;
use idlerpg_domain::ports::HealthCheckService;

pub struct DefaultHealthService {
    store: GameStore,
}

impl DefaultHealthService {
    pub fn new(store: GameStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl HealthCheckService for DefaultHealthService {
    async fn check_store(&self) -> anyhow::Result<bool> {
        self.store.ping().await.map(|_| true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;
    use std::sync::Arc;

    #[tokio::test]
    async fn memory_store_is_always_ready() {
        let service = DefaultHealthService::new(GameStore::new(Arc::new(MemoryStore::new())));
        assert!(service.check_store().await.expect("ready"));
    }
}
