use async_trait::async_trait;

/// String-keyed store holding both plain values and sets. Keys follow the
/// layout in `value_objects::store_keys`.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> anyhow::Result<()>;
    async fn members(&self, key: &str) -> anyhow::Result<Vec<String>>;
    async fn add_member(&self, key: &str, member: &str) -> anyhow::Result<()>;
    async fn remove(&self, key: &str) -> anyhow::Result<()>;
    async fn ping(&self) -> anyhow::Result<()>;

    async fn is_member(&self, key: &str, member: &str) -> anyhow::Result<bool> {
        Ok(self.members(key).await?.iter().any(|item| item == member))
    }
}
