use axum::extract::State;
use axum::Form;

use idlerpg_application::commands::handle_command;
use idlerpg_application::AppState;
use idlerpg_domain::SlashCommand;

/// Slash command endpoint. The reply text is shown only to the issuer.
pub async fn receive_command(
    State(state): State<AppState>,
    Form(command): Form<SlashCommand>,
) -> String {
    handle_command(&state, &command).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use idlerpg_application::testing::{FakeChat, Harness};

    #[tokio::test]
    async fn register_over_http() {
        let harness = Harness::new(FakeChat::default()).with_team("T1", "C1").await;
        let command = SlashCommand {
            team_id: "T1".to_string(),
            channel_id: "C1".to_string(),
            user_id: "U1".to_string(),
            command: "/idle".to_string(),
            text: "register".to_string(),
            ..SlashCommand::default()
        };
        let reply = receive_command(State(harness.state.clone()), Form(command)).await;
        assert!(reply.starts_with("Welcome"));
        assert!(harness.player("T1", "U1").await.is_some());
    }
}
