// Slash command entity

use serde::{Deserialize, Serialize};

/// Form fields posted by the chat platform for a slash command.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SlashCommand {
    #[serde(default)]
    pub team_id: String,
    #[serde(default)]
    pub channel_id: String,
    #[serde(default)]
    pub channel_name: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub command: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub response_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameCommand {
    Register,
    Reset,
    Unknown,
}

impl SlashCommand {
    /// `/idle register` and a bare `/register` both name `register`.
    pub fn name(&self) -> String {
        let command = self.command.trim().trim_start_matches('/').to_lowercase();
        if command == "idle" || command.is_empty() {
            return self
                .text
                .split_whitespace()
                .next()
                .map(str::to_lowercase)
                .unwrap_or_default();
        }
        command
    }

    pub fn game_command(&self) -> GameCommand {
        match self.name().as_str() {
            "register" => GameCommand::Register,
            "reset" => GameCommand::Reset,
            _ => GameCommand::Unknown,
        }
    }
}
