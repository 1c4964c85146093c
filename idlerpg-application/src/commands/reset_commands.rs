use idlerpg_domain::{reset_message, PlayerKey, SlashCommand, TeamId};
use tracing::{info, warn};

use super::channel_commands::announce;
use super::register_commands::NOT_INSTALLED;
use crate::{AppError, AppState};

pub(crate) const ADMIN_ONLY: &str = "Only workspace admins can reset the game.";

/// Wipes every player of the team. Only admins and owners may do this.
pub async fn reset(state: &AppState, command: &SlashCommand) -> Result<String, AppError> {
    let team = TeamId::new(command.team_id.trim());
    if team.as_str().is_empty() || !state.store.is_known_team(&team).await? {
        return Ok(NOT_INSTALLED.to_string());
    }
    let Some(token) = state.store.token(&team).await? else {
        return Ok(NOT_INSTALLED.to_string());
    };
    let client = state.chat.client(&token).await.map_err(AppError::upstream)?;
    let user = client
        .user_info(command.user_id.trim())
        .await
        .map_err(AppError::upstream)?;
    if !user.is_privileged() {
        warn!("user {} tried to reset team {} without admin rights", command.user_id, team);
        return Ok(ADMIN_ONLY.to_string());
    }

    // Wait out in-flight updates so no record is saved back after removal.
    let mut guards = Vec::new();
    for user in state.store.player_ids(&team).await? {
        guards.extend(state.lock_player(&PlayerKey::new(team.clone(), user)).await);
    }
    let removed = state.store.remove_all_players(&team).await?;
    drop(guards);
    state.player_locks.forget_team(&team).await;
    info!("team {} reset by {}, {} players removed", team, command.user_id, removed);

    let message = reset_message(command.user_id.trim(), removed);
    if let Some(channel) = state.store.channel_id(&team).await? {
        announce(&client, &channel, &message).await;
    }
    Ok(message)
}
