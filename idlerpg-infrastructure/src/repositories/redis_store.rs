use anyhow::{Context, Result};
use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tokio::sync::Mutex;
use tracing::warn;

use idlerpg_domain::ports::KeyValueStore;

/// Redis-backed store. The connection is opened on first use and dropped
/// after any failed command so the next call reconnects.
pub struct RedisStore {
    client: redis::Client,
    connection: Mutex<Option<ConnectionManager>>,
    prefix: String,
}

impl RedisStore {
    pub fn new(url: &str, prefix: impl Into<String>) -> Result<Self> {
        let client = redis::Client::open(url).context("invalid redis_url")?;
        Ok(Self {
            client,
            connection: Mutex::new(None),
            prefix: prefix.into(),
        })
    }

    fn key(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }

    async fn connection(&self) -> Result<ConnectionManager> {
        let mut guard = self.connection.lock().await;
        if let Some(connection) = guard.as_ref() {
            return Ok(connection.clone());
        }
        let connection = self
            .client
            .get_connection_manager()
            .await
            .context("redis connection failed")?;
        *guard = Some(connection.clone());
        Ok(connection)
    }

    async fn reset(&self, err: &redis::RedisError) {
        warn!("redis command failed, dropping connection: {}", err);
        *self.connection.lock().await = None;
    }

    async fn checked<T>(&self, result: redis::RedisResult<T>) -> Result<T> {
        match result {
            Ok(value) => Ok(value),
            Err(err) => {
                self.reset(&err).await;
                Err(err.into())
            }
        }
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.connection().await?;
        let result = conn.get(self.key(key)).await;
        self.checked(result).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut conn = self.connection().await?;
        let result = conn.set(self.key(key), value).await;
        self.checked(result).await
    }

    async fn members(&self, key: &str) -> Result<Vec<String>> {
        let mut conn = self.connection().await?;
        let result = conn.smembers(self.key(key)).await;
        self.checked(result).await
    }

    async fn add_member(&self, key: &str, member: &str) -> Result<()> {
        let mut conn = self.connection().await?;
        let result = conn.sadd(self.key(key), member).await;
        self.checked(result).await
    }

    async fn is_member(&self, key: &str, member: &str) -> Result<bool> {
        let mut conn = self.connection().await?;
        let result = conn.sismember(self.key(key), member).await;
        self.checked(result).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let mut conn = self.connection().await?;
        let result = conn.del(self.key(key)).await;
        self.checked(result).await
    }

    async fn ping(&self) -> Result<()> {
        let mut conn = self.connection().await?;
        let result: redis::RedisResult<String> = redis::cmd("PING").query_async(&mut conn).await;
        self.checked(result).await.map(|_| ())
    }
}
