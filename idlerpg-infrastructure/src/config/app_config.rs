use std::env;
use std::path::Path;

use anyhow::{anyhow, Result};
use serde::Deserialize;
use tokio::fs;
use tracing::warn;

use idlerpg_domain::{RuntimeConfig, SlackConfig, StoreConfig};

use super::validation::{validate_base_url, validate_channel_name, validate_redis_url};
use crate::utils::{non_blank, parse_env_bool, trim_trailing_slash};

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub bind_addr: String,
    pub redis_url: Option<String>,
    pub redis_prefix: String,
    pub slack_api_base_url: String,
    pub slack_client_id: Option<String>,
    pub slack_client_secret: Option<String>,
    pub slack_signing_secret: Option<String>,
    pub oauth_redirect_uri: Option<String>,
    pub channel_name: String,
    pub tick_interval_seconds: u64,
    pub serialize_player_updates: bool,
    pub max_body_bytes: u64,
    pub request_timeout_seconds: u64,
    pub signature_max_age_seconds: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            redis_url: None,
            redis_prefix: String::new(),
            slack_api_base_url: "https://slack.com/api".to_string(),
            slack_client_id: None,
            slack_client_secret: None,
            slack_signing_secret: None,
            oauth_redirect_uri: None,
            channel_name: "idlerpg".to_string(),
            tick_interval_seconds: 10,
            serialize_player_updates: false,
            max_body_bytes: 1024 * 1024,
            request_timeout_seconds: 15,
            signature_max_age_seconds: 300,
        }
    }
}

impl AppConfig {
    pub async fn load() -> Result<Self> {
        let path = env::var("IDLERPG_CONFIG").unwrap_or_else(|_| "./config.toml".to_string());
        let file_path = Path::new(&path);
        let mut config = if file_path.exists() {
            let content = fs::read_to_string(file_path).await?;
            Self::from_toml(&content)?
        } else {
            warn!("{} not found, using defaults", path);
            AppConfig::default()
        };
        config.apply_env_overrides();
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|err| anyhow!("invalid config file: {}", err))
    }

    pub fn normalize(&mut self) {
        self.redis_url = non_blank(self.redis_url.take());
        self.slack_client_id = non_blank(self.slack_client_id.take());
        self.slack_client_secret = non_blank(self.slack_client_secret.take());
        self.slack_signing_secret = non_blank(self.slack_signing_secret.take());
        self.oauth_redirect_uri = non_blank(self.oauth_redirect_uri.take());
        self.redis_prefix = self.redis_prefix.trim().to_string();
        self.slack_api_base_url = trim_trailing_slash(&self.slack_api_base_url);
        self.channel_name = self
            .channel_name
            .trim()
            .trim_start_matches('#')
            .to_string();
    }

    pub fn validate(&self) -> Result<()> {
        self.bind_addr
            .parse::<std::net::SocketAddr>()
            .map_err(|err| anyhow!("invalid bind_addr: {}", err))?;
        if let Some(url) = &self.redis_url {
            validate_redis_url(url)?;
        }
        validate_base_url("slack_api_base_url", &self.slack_api_base_url)?;
        validate_channel_name(&self.channel_name)?;
        if self.slack_client_id.is_none() || self.slack_client_secret.is_none() {
            return Err(anyhow!(
                "slack_client_id and slack_client_secret must be configured"
            ));
        }
        if self.tick_interval_seconds == 0 {
            return Err(anyhow!("tick_interval_seconds must be greater than 0"));
        }
        if self.max_body_bytes == 0 {
            return Err(anyhow!("max_body_bytes must be greater than 0"));
        }
        if self.request_timeout_seconds == 0 {
            return Err(anyhow!("request_timeout_seconds must be greater than 0"));
        }
        Ok(())
    }

    pub fn to_runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            bind_addr: self.bind_addr.clone(),
            channel_name: self.channel_name.clone(),
            tick_interval_seconds: self.tick_interval_seconds,
            serialize_player_updates: self.serialize_player_updates,
            signing_secret: self.slack_signing_secret.clone(),
            signature_max_age_seconds: self.signature_max_age_seconds,
            max_body_bytes: self.max_body_bytes,
            request_timeout_seconds: self.request_timeout_seconds,
        }
    }

    pub fn to_store_config(&self) -> StoreConfig {
        StoreConfig {
            redis_url: self.redis_url.clone(),
            redis_prefix: self.redis_prefix.clone(),
        }
    }

    pub fn to_slack_config(&self) -> SlackConfig {
        SlackConfig {
            api_base_url: self.slack_api_base_url.clone(),
            client_id: self.slack_client_id.clone().unwrap_or_default(),
            client_secret: self.slack_client_secret.clone().unwrap_or_default(),
            redirect_uri: self.oauth_redirect_uri.clone(),
            request_timeout_seconds: self.request_timeout_seconds,
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(value) = env::var("IDLERPG_BIND_ADDR") {
            self.bind_addr = value;
        }
        if let Ok(value) = env::var("IDLERPG_REDIS_URL") {
            self.redis_url = Some(value);
        }
        if let Ok(value) = env::var("IDLERPG_REDIS_PREFIX") {
            self.redis_prefix = value;
        }
        if let Ok(value) = env::var("IDLERPG_SLACK_API_BASE_URL") {
            self.slack_api_base_url = value;
        }
        if let Ok(value) = env::var("IDLERPG_SLACK_CLIENT_ID") {
            self.slack_client_id = Some(value);
        }
        if let Ok(value) = env::var("IDLERPG_SLACK_CLIENT_SECRET") {
            self.slack_client_secret = Some(value);
        }
        if let Ok(value) = env::var("IDLERPG_SLACK_SIGNING_SECRET") {
            self.slack_signing_secret = Some(value);
        }
        if let Ok(value) = env::var("IDLERPG_OAUTH_REDIRECT_URI") {
            self.oauth_redirect_uri = Some(value);
        }
        if let Ok(value) = env::var("IDLERPG_CHANNEL_NAME") {
            self.channel_name = value;
        }
        if let Ok(value) = env::var("IDLERPG_TICK_INTERVAL_SECONDS") {
            self.tick_interval_seconds = value.parse().unwrap_or(self.tick_interval_seconds);
        }
        if let Ok(value) = env::var("IDLERPG_SERIALIZE_PLAYER_UPDATES") {
            self.serialize_player_updates =
                parse_env_bool(&value).unwrap_or(self.serialize_player_updates);
        }
        if let Ok(value) = env::var("IDLERPG_MAX_BODY_BYTES") {
            self.max_body_bytes = value.parse().unwrap_or(self.max_body_bytes);
        }
        if let Ok(value) = env::var("IDLERPG_REQUEST_TIMEOUT_SECONDS") {
            self.request_timeout_seconds = value.parse().unwrap_or(self.request_timeout_seconds);
        }
        if let Ok(value) = env::var("IDLERPG_SIGNATURE_MAX_AGE_SECONDS") {
            self.signature_max_age_seconds =
                value.parse().unwrap_or(self.signature_max_age_seconds);
        }
    }
}
