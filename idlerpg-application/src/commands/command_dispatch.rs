use idlerpg_domain::{GameCommand, SlashCommand};
use tracing::{debug, error};

use super::register_commands::register;
use super::reset_commands::reset;
use crate::{AppError, AppState};

const UPSTREAM_FAILURE: &str = "Something went wrong talking to Slack. Please try again in a moment.";
const INTERNAL_FAILURE: &str = "Something went wrong on our side. Please try again later.";

/// Runs a slash command and returns the text shown to the issuing user.
pub async fn handle_command(state: &AppState, command: &SlashCommand) -> String {
    state.metrics.record_command();
    debug!(
        "command {} '{}' from {}:{}",
        command.command, command.text, command.team_id, command.user_id
    );

    let result = match command.game_command() {
        GameCommand::Register => register(state, command).await,
        GameCommand::Reset => reset(state, command).await,
        GameCommand::Unknown => return echo(command),
    };
    match result {
        Ok(reply) => reply,
        Err(err) => {
            error!("command '{}' failed for team {}: {}", command.name(), command.team_id, err);
            match err {
                AppError::Upstream(_) => UPSTREAM_FAILURE.to_string(),
                AppError::Internal(_) => INTERNAL_FAILURE.to_string(),
            }
        }
    }
}

fn echo(command: &SlashCommand) -> String {
    format!("Received command: {} {}", command.command, command.text)
        .trim_end()
        .to_string()
}
