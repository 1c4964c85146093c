use idlerpg_domain::TeamId;
use tracing::{error, info, warn};

use super::channel_commands::discover_channel;
use crate::AppState;

/// Completes an install. Always answers with text the installer can read,
/// failures included.
pub async fn authorize(state: &AppState, code: &str) -> String {
    let code = code.trim();
    if code.is_empty() {
        return "Missing authorization code. Start the install from the Add to Slack button."
            .to_string();
    }

    let access = match state.chat.oauth_access(code).await {
        Ok(access) => access,
        Err(err) => {
            warn!("oauth exchange failed: {}", err);
            return format!("Authorization failed ({}). Please try installing again.", err);
        }
    };
    let team = TeamId::new(access.team_id.trim());
    if team.as_str().is_empty() || access.access_token.trim().is_empty() {
        warn!("oauth exchange returned no team or token");
        return "Authorization failed (incomplete response). Please try installing again."
            .to_string();
    }

    let saved = async {
        state.store.set_token(&team, access.access_token.trim()).await?;
        state.store.add_team(&team).await
    }
    .await;
    if let Err(err) = saved {
        error!("could not store authorization for team {}: {}", team, err);
        return "Authorization succeeded but the team could not be saved. Please try again."
            .to_string();
    }
    info!("team {} authorized", team);

    let channel_name = &state.config.channel_name;
    match discover_channel(state, &team).await {
        Ok(Some(channel)) => format!(
            "Idle RPG is installed! Head over to <#{}> and type `/idle register` to start playing.",
            channel
        ),
        Ok(None) => format!(
            "Idle RPG is installed! Create a #{} channel, invite the bot and type `/idle register` there to start playing.",
            channel_name
        ),
        Err(err) => {
            warn!("channel discovery after install failed for team {}: {}", team, err);
            format!(
                "Idle RPG is installed! Type `/idle register` in #{} to start playing.",
                channel_name
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeChat, Harness};

    #[tokio::test]
    async fn successful_install_stores_team_and_channel() {
        let chat = FakeChat::default()
            .with_oauth("T1", "xoxb-new")
            .with_channel("C5", "idlerpg");
        let harness = Harness::new(chat);

        let reply = authorize(&harness.state, "code-123").await;
        assert!(reply.contains("<#C5>"));

        let team = TeamId::new("T1");
        assert!(harness.state.store.is_known_team(&team).await.unwrap());
        assert_eq!(
            harness.state.store.token(&team).await.unwrap().as_deref(),
            Some("xoxb-new")
        );
        assert_eq!(
            harness.state.store.channel_id(&team).await.unwrap().as_deref(),
            Some("C5")
        );
    }

    #[tokio::test]
    async fn failed_exchange_still_answers() {
        let harness = Harness::new(FakeChat::default());
        let reply = authorize(&harness.state, "bad").await;
        assert!(reply.starts_with("Authorization failed"));
        assert!(harness.state.store.teams().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_code_is_explained() {
        let harness = Harness::new(FakeChat::default().with_oauth("T1", "xoxb"));
        assert!(authorize(&harness.state, "  ").await.starts_with("Missing authorization code"));
    }

    #[tokio::test]
    async fn install_without_game_channel_asks_for_one() {
        let harness = Harness::new(FakeChat::default().with_oauth("T1", "xoxb"));
        let reply = authorize(&harness.state, "code").await;
        assert!(reply.contains("Create a #idlerpg channel"));
    }
}
