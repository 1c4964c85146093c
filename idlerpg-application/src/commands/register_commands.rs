use idlerpg_domain::{
    format_duration, registration_message, status_message, Player, SlashCommand, TeamId, UserId,
};
use tracing::info;

use super::channel_commands::{announce, discover_channel};
use crate::{AppError, AppState};

pub(crate) const NOT_INSTALLED: &str =
    "Idle RPG is not installed for this team yet. Ask an admin to add it to your workspace first.";

/// Registers the issuing user. Checks run in order: known team, game
/// channel, existing registration.
pub async fn register(state: &AppState, command: &SlashCommand) -> Result<String, AppError> {
    let team = TeamId::new(command.team_id.trim());
    let user = UserId::new(command.user_id.trim());
    if team.as_str().is_empty() || !state.store.is_known_team(&team).await? {
        return Ok(NOT_INSTALLED.to_string());
    }

    let channel = match state.store.channel_id(&team).await? {
        Some(channel) => Some(channel),
        None => discover_channel(state, &team).await?,
    };
    let Some(channel) = channel else {
        return Ok(format!(
            "There is no #{} channel yet. Create it, invite the bot, then register from there.",
            state.config.channel_name
        ));
    };
    if command.channel_id != channel {
        return Ok(format!("Please register from <#{}>.", channel));
    }

    if state.store.is_registered(&team, &user).await? {
        if let Some(player) = state.store.load_player(&team, &user).await? {
            return Ok(status_message(&player));
        }
    }

    let player = Player::new(team.clone(), user, Some(command.user_name.clone()));
    state.store.register_player(&player).await?;
    info!("player {} registered", player.key());

    if let Some(token) = state.store.token(&team).await? {
        let client = state.chat.client(&token).await.map_err(AppError::upstream)?;
        announce(&client, &channel, &registration_message(&player)).await;
    }
    Ok(format!(
        "Welcome to Idle RPG! You are level {}, next level in {}. Stay quiet in <#{}> to level faster.",
        player.level,
        format_duration(player.time_to_level.max(0) as u64),
        channel
    ))
}
