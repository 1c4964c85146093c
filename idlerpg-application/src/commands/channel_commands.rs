use std::sync::Arc;

use idlerpg_domain::ports::ChatClient;
use idlerpg_domain::{ChannelInfo, ChannelListOptions, TeamId};
use tracing::{error, info, warn};

use crate::{AppError, AppState};

/// Scans the team's channel list for the game channel and stores its id.
/// Only the first page returned by the platform is searched.
pub async fn discover_channel(state: &AppState, team: &TeamId) -> Result<Option<String>, AppError> {
    let Some(token) = state.store.token(team).await? else {
        warn!("team {} has no access token, skipping channel discovery", team);
        return Ok(None);
    };
    let client = state.chat.client(&token).await.map_err(AppError::upstream)?;
    let channels = client
        .list_channels(ChannelListOptions::default())
        .await
        .map_err(AppError::upstream)?;

    let wanted = state.config.channel_name.as_str();
    let Some(channel) = find_game_channel(&channels, wanted) else {
        warn!(
            "team {} has no #{} channel among {} channels, game paused",
            team,
            wanted,
            channels.len()
        );
        return Ok(None);
    };
    state.store.set_channel_id(team, &channel.id).await?;
    info!("team {} plays in #{} ({})", team, wanted, channel.id);
    Ok(Some(channel.id.clone()))
}

/// Discovery pass over every known team. Returns how many teams have a
/// game channel afterwards.
pub async fn discover_all_channels(state: &AppState) -> usize {
    let teams = match state.store.teams().await {
        Ok(teams) => teams,
        Err(err) => {
            error!("channel discovery could not list teams: {}", err);
            return 0;
        }
    };
    let mut resolved = 0;
    for team in &teams {
        match discover_channel(state, team).await {
            Ok(Some(_)) => resolved += 1,
            Ok(None) => {}
            Err(err) => error!("channel discovery failed for team {}: {}", team, err),
        }
    }
    info!("channel discovery resolved {}/{} teams", resolved, teams.len());
    resolved
}

fn find_game_channel<'a>(channels: &'a [ChannelInfo], name: &str) -> Option<&'a ChannelInfo> {
    channels
        .iter()
        .find(|channel| !channel.is_archived && channel.name == name)
}

/// Posts to a channel. Failures are logged and otherwise ignored.
pub(crate) async fn announce(client: &Arc<dyn ChatClient>, channel: &str, text: &str) {
    if let Err(err) = client.post_message(channel, text).await {
        warn!("failed to post to channel {}: {}", channel, err);
    }
}
