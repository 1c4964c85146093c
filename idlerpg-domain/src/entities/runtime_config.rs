// Runtime configuration shared with the application and HTTP layers

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub bind_addr: String,
    pub channel_name: String,
    pub tick_interval_seconds: u64,
    pub serialize_player_updates: bool,
    pub signing_secret: Option<String>,
    pub signature_max_age_seconds: u64,
    pub max_body_bytes: u64,
    pub request_timeout_seconds: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            channel_name: "idlerpg".to_string(),
            tick_interval_seconds: 10,
            serialize_player_updates: false,
            signing_secret: None,
            signature_max_age_seconds: 300,
            max_body_bytes: 1024 * 1024,
            request_timeout_seconds: 15,
        }
    }
}

#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub redis_url: Option<String>,
    pub redis_prefix: String,
}

#[derive(Debug, Clone)]
pub struct SlackConfig {
    pub api_base_url: String,
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: Option<String>,
    pub request_timeout_seconds: u64,
}
