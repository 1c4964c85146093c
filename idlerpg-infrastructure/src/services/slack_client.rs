use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;

use idlerpg_domain::ports::ChatClient;
use idlerpg_domain::{ChannelInfo, ChannelListOptions, ChatUser, OAuthAccess, SlackConfig};

#[derive(Debug, Error)]
pub enum SlackApiError {
    #[error("{method} failed: {error}")]
    Api { method: String, error: String },
    #[error("{method} returned an unexpected body: {source}")]
    Decode {
        method: String,
        #[source]
        source: serde_json::Error,
    },
}

pub fn build_http_client(config: &SlackConfig) -> Result<Client> {
    Ok(Client::builder()
        .timeout(Duration::from_secs(config.request_timeout_seconds.max(3)))
        .build()?)
}

/// Web API client bound to one team's access token.
pub struct SlackClient {
    http: Client,
    base_url: String,
    token: String,
}

impl SlackClient {
    pub fn new(http: Client, base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            token: token.into(),
        }
    }

    async fn get<T: DeserializeOwned>(&self, method: &str, query: &[(&str, String)]) -> Result<T> {
        let body = self
            .http
            .get(method_url(&self.base_url, method))
            .bearer_auth(&self.token)
            .query(query)
            .send()
            .await?
            .error_for_status()?
            .json::<Value>()
            .await?;
        Ok(parse_response(method, body)?)
    }

    async fn post<T: DeserializeOwned>(&self, method: &str, payload: Value) -> Result<T> {
        let body = self
            .http
            .post(method_url(&self.base_url, method))
            .bearer_auth(&self.token)
            .json(&payload)
            .send()
            .await?
            .error_for_status()?
            .json::<Value>()
            .await?;
        Ok(parse_response(method, body)?)
    }
}

#[derive(Deserialize)]
struct ChannelList {
    #[serde(default)]
    channels: Vec<ChannelInfo>,
}

#[derive(Deserialize)]
struct UserInfo {
    user: ChatUser,
}

#[derive(Debug, Deserialize)]
struct Posted {}

#[async_trait]
impl ChatClient for SlackClient {
    async fn list_channels(&self, options: ChannelListOptions) -> Result<Vec<ChannelInfo>> {
        let query = [
            ("exclude_archived", options.exclude_archived.to_string()),
            ("exclude_members", options.exclude_members.to_string()),
        ];
        let list: ChannelList = self.get("conversations.list", &query).await?;
        Ok(list.channels)
    }

    async fn post_message(&self, channel: &str, text: &str) -> Result<()> {
        let _: Posted = self
            .post("chat.postMessage", json!({ "channel": channel, "text": text }))
            .await?;
        Ok(())
    }

    async fn user_info(&self, user: &str) -> Result<ChatUser> {
        let info: UserInfo = self.get("users.info", &[("user", user.to_string())]).await?;
        Ok(info.user)
    }
}

/// Exchanges an install code for a bot token.
pub async fn exchange_oauth_code(
    http: &Client,
    config: &SlackConfig,
    code: &str,
) -> Result<OAuthAccess> {
    let mut form = vec![
        ("client_id", config.client_id.clone()),
        ("client_secret", config.client_secret.clone()),
        ("code", code.to_string()),
    ];
    if let Some(redirect_uri) = &config.redirect_uri {
        form.push(("redirect_uri", redirect_uri.clone()));
    }
    let body = http
        .post(method_url(&config.api_base_url, "oauth.v2.access"))
        .form(&form)
        .send()
        .await?
        .error_for_status()?
        .json::<Value>()
        .await?;
    parse_oauth_access(body)
}

fn method_url(base_url: &str, method: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), method)
}

/// Unwraps Slack's `{"ok": ..., "error": ...}` envelope.
fn parse_response<T: DeserializeOwned>(method: &str, body: Value) -> Result<T, SlackApiError> {
    if !body.get("ok").and_then(Value::as_bool).unwrap_or(false) {
        let error = body
            .get("error")
            .and_then(Value::as_str)
            .unwrap_or("unknown_error")
            .to_string();
        return Err(SlackApiError::Api {
            method: method.to_string(),
            error,
        });
    }
    serde_json::from_value(body).map_err(|source| SlackApiError::Decode {
        method: method.to_string(),
        source,
    })
}

#[derive(Deserialize)]
struct OAuthResponse {
    access_token: String,
    #[serde(default)]
    team_id: Option<String>,
    #[serde(default)]
    team: Option<OAuthTeam>,
}

#[derive(Deserialize)]
struct OAuthTeam {
    id: String,
    #[serde(default)]
    name: Option<String>,
}

fn parse_oauth_access(body: Value) -> Result<OAuthAccess> {
    let response: OAuthResponse = parse_response("oauth.v2.access", body)?;
    let team_name = response.team.as_ref().and_then(|team| team.name.clone());
    let team_id = response
        .team
        .map(|team| team.id)
        .or(response.team_id)
        .ok_or_else(|| anyhow::anyhow!("oauth.v2.access returned no team id"))?;
    Ok(OAuthAccess {
        team_id,
        access_token: response.access_token,
        team_name,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_ok_carries_the_slack_error() {
        let err = parse_response::<Posted>(
            "chat.postMessage",
            json!({ "ok": false, "error": "channel_not_found" }),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "chat.postMessage failed: channel_not_found");
    }

    #[test]
    fn channel_list_decodes_first_page() {
        let list: ChannelList = parse_response(
            "conversations.list",
            json!({
                "ok": true,
                "channels": [
                    { "id": "C1", "name": "general", "is_archived": false, "is_member": true },
                    { "id": "C2", "name": "idlerpg" }
                ],
                "response_metadata": { "next_cursor": "dGVhbTpDMDYx" }
            }),
        )
        .expect("decode");
        assert_eq!(list.channels.len(), 2);
        assert_eq!(list.channels[1].name, "idlerpg");
        assert!(!list.channels[1].is_archived);
    }

    #[test]
    fn user_info_exposes_privileges() {
        let info: UserInfo = parse_response(
            "users.info",
            json!({ "ok": true, "user": { "id": "U1", "name": "ada", "is_owner": true } }),
        )
        .expect("decode");
        assert!(info.user.is_privileged());
        assert!(!info.user.is_admin);
    }

    #[test]
    fn oauth_accepts_nested_or_flat_team() {
        let nested = parse_oauth_access(json!({
            "ok": true,
            "access_token": "xoxb-1",
            "team": { "id": "T1", "name": "Acme" }
        }))
        .expect("nested");
        assert_eq!(nested.team_id, "T1");
        assert_eq!(nested.team_name.as_deref(), Some("Acme"));

        let flat = parse_oauth_access(json!({
            "ok": true,
            "access_token": "xoxp-2",
            "team_id": "T2"
        }))
        .expect("flat");
        assert_eq!(flat.team_id, "T2");

        assert!(parse_oauth_access(json!({ "ok": false, "error": "invalid_code" })).is_err());
    }

    #[test]
    fn method_urls_ignore_trailing_slash() {
        assert_eq!(
            method_url("https://slack.com/api/", "users.info"),
            "https://slack.com/api/users.info"
        );
    }
}
