use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use tokio::sync::RwLock;
use tracing::debug;

use idlerpg_domain::ports::{ChatClient, ChatPlatform};
use idlerpg_domain::{OAuthAccess, SlackConfig};

use super::slack_client::{build_http_client, exchange_oauth_code, SlackClient};

/// Slack entry point. One client per access token, created on first use and
/// shared afterwards. All clients reuse a single HTTP connection pool.
pub struct SlackPlatform {
    config: SlackConfig,
    http: Client,
    clients: RwLock<HashMap<String, Arc<SlackClient>>>,
}

impl SlackPlatform {
    pub fn new(config: SlackConfig) -> Result<Self> {
        let http = build_http_client(&config)?;
        Ok(Self {
            config,
            http,
            clients: RwLock::new(HashMap::new()),
        })
    }

    pub async fn cached_clients(&self) -> usize {
        self.clients.read().await.len()
    }

    async fn client_for(&self, token: &str) -> Arc<SlackClient> {
        if let Some(client) = self.clients.read().await.get(token) {
            return client.clone();
        }
        let mut clients = self.clients.write().await;
        let cached = clients.len();
        clients
            .entry(token.to_string())
            .or_insert_with(|| {
                debug!("creating chat client, {} already cached", cached);
                Arc::new(SlackClient::new(
                    self.http.clone(),
                    self.config.api_base_url.clone(),
                    token,
                ))
            })
            .clone()
    }
}

#[async_trait]
impl ChatPlatform for SlackPlatform {
    async fn client(&self, token: &str) -> Result<Arc<dyn ChatClient>> {
        let client: Arc<dyn ChatClient> = self.client_for(token).await;
        Ok(client)
    }

    async fn oauth_access(&self, code: &str) -> Result<OAuthAccess> {
        exchange_oauth_code(&self.http, &self.config, code).await
    }
}
