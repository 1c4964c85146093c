use axum::extract::{Query, State};
use serde::Deserialize;
use tracing::warn;

use idlerpg_application::commands::authorize;
use idlerpg_application::AppState;

#[derive(Debug, Deserialize)]
pub struct OAuthQuery {
    pub code: Option<String>,
    pub error: Option<String>,
}

/// Redirect target of the install flow.
pub async fn oauth_callback(State(state): State<AppState>, Query(query): Query<OAuthQuery>) -> String {
    if let Some(error) = query.error.filter(|error| !error.trim().is_empty()) {
        warn!("install cancelled: {}", error);
        return format!("Installation was cancelled ({}). You can start again at any time.", error);
    }
    authorize(&state, query.code.as_deref().unwrap_or_default()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use idlerpg_application::testing::{FakeChat, Harness};

    #[tokio::test]
    async fn denied_install_is_explained() {
        let harness = Harness::new(FakeChat::default());
        let reply = oauth_callback(
            State(harness.state),
            Query(OAuthQuery {
                code: None,
                error: Some("access_denied".to_string()),
            }),
        )
        .await;
        assert!(reply.contains("access_denied"));
    }

    #[tokio::test]
    async fn code_is_exchanged() {
        let harness = Harness::new(FakeChat::default().with_oauth("T1", "xoxb"));
        let reply = oauth_callback(
            State(harness.state.clone()),
            Query(OAuthQuery {
                code: Some("abc".to_string()),
                error: None,
            }),
        )
        .await;
        assert!(reply.starts_with("Idle RPG is installed!"));
        assert_eq!(harness.state.store.teams().await.unwrap().len(), 1);
    }
}
