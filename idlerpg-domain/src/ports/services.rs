use std::sync::Arc;

use async_trait::async_trait;

use crate::entities::{ChannelInfo, ChannelListOptions, ChatUser, OAuthAccess};

/// API calls made with one team's access token.
#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn list_channels(&self, options: ChannelListOptions) -> anyhow::Result<Vec<ChannelInfo>>;
    async fn post_message(&self, channel: &str, text: &str) -> anyhow::Result<()>;
    async fn user_info(&self, user: &str) -> anyhow::Result<ChatUser>;
}

/// Entry point to the chat platform. Hands out per-token clients and
/// performs the OAuth code exchange.
#[async_trait]
pub trait ChatPlatform: Send + Sync {
    async fn client(&self, token: &str) -> anyhow::Result<Arc<dyn ChatClient>>;
    async fn oauth_access(&self, code: &str) -> anyhow::Result<OAuthAccess>;
}

#[async_trait]
pub trait HealthCheckService: Send + Sync {
    async fn check_store(&self) -> anyhow::Result<bool>;
}
