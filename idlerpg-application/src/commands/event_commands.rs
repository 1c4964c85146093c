use chrono::{DateTime, Utc};
use idlerpg_domain::{
    classify, penalty_message, EventEnvelope, PenaltyApplied, PlayerKey, TeamId, UserId,
};
use tracing::{debug, info, warn};

use super::channel_commands::announce;
use crate::{AppError, AppState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    Malformed,
    Bot,
    MissingTeam,
    MissingUser,
    MissingChannel,
    UnknownTeam,
    Unregistered,
    ChannelUnset,
    MissingRecord,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EventOutcome {
    Dropped(DropReason),
    /// Accepted, but posted outside the game channel.
    OutsideGameChannel,
    NotPenalizable,
    Penalized(PenaltyApplied),
}

/// Routes one webhook event to the classifier and the acting player.
/// Noise is dropped quietly; only store and upstream failures are errors.
pub async fn handle_event(
    state: &AppState,
    envelope: &EventEnvelope,
    now: DateTime<Utc>,
) -> Result<EventOutcome, AppError> {
    state.metrics.record_event();
    let outcome = route_event(state, envelope, now).await;
    if matches!(outcome, Ok(EventOutcome::Dropped(_))) {
        state.metrics.record_event_dropped();
    }
    outcome
}

async fn route_event(
    state: &AppState,
    envelope: &EventEnvelope,
    now: DateTime<Utc>,
) -> Result<EventOutcome, AppError> {
    let Some(event) = envelope.event.as_ref().filter(|event| event.kind().is_some()) else {
        warn!("dropping malformed event envelope {:?}", envelope.event_id);
        return Ok(EventOutcome::Dropped(DropReason::Malformed));
    };
    if event.is_bot() {
        return Ok(EventOutcome::Dropped(DropReason::Bot));
    }
    let Some(team) = envelope.team().map(TeamId::new) else {
        return Ok(EventOutcome::Dropped(DropReason::MissingTeam));
    };
    let Some(user) = event.acting_user().map(UserId::new) else {
        return Ok(EventOutcome::Dropped(DropReason::MissingUser));
    };
    let Some(channel) = event.channel() else {
        return Ok(EventOutcome::Dropped(DropReason::MissingChannel));
    };

    if !state.store.is_known_team(&team).await? {
        debug!("event from unknown team {}", team);
        return Ok(EventOutcome::Dropped(DropReason::UnknownTeam));
    }
    if !state.store.is_registered(&team, &user).await? {
        debug!("event from unregistered user {}:{}", team, user);
        return Ok(EventOutcome::Dropped(DropReason::Unregistered));
    }
    let Some(game_channel) = state.store.channel_id(&team).await? else {
        debug!("team {} has no game channel yet", team);
        return Ok(EventOutcome::Dropped(DropReason::ChannelUnset));
    };
    if game_channel != channel {
        return Ok(EventOutcome::OutsideGameChannel);
    }

    let Some(penalty) = classify(event) else {
        return Ok(EventOutcome::NotPenalizable);
    };

    let key = PlayerKey::new(team.clone(), user.clone());
    let (player, applied) = {
        let _guard = state.lock_player(&key).await;
        let Some(mut player) = state.store.load_player(&team, &user).await? else {
            warn!("player {} is registered but has no record", key);
            return Ok(EventOutcome::Dropped(DropReason::MissingRecord));
        };
        let applied = player.apply_penalty(penalty, now.timestamp_millis());
        state.store.save_player(&player).await?;
        (player, applied)
    };
    state.metrics.record_penalty();
    info!(
        "player {} penalized {}s for {}",
        key,
        applied.seconds,
        applied.penalty.kind.as_str()
    );

    if let Some(token) = state.store.token(&team).await? {
        let client = state.chat.client(&token).await.map_err(AppError::upstream)?;
        announce(&client, &game_channel, &penalty_message(&player, &applied)).await;
    } else {
        warn!("team {} has no access token, penalty not announced", team);
    }
    Ok(EventOutcome::Penalized(applied))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeChat, Harness};
    use idlerpg_domain::{ChatEvent, EventItem, PenaltyKind};

    fn envelope(event: ChatEvent) -> EventEnvelope {
        EventEnvelope {
            kind: Some("event_callback".to_string()),
            team_id: Some("T1".to_string()),
            event: Some(event),
            ..EventEnvelope::default()
        }
    }

    fn message(user: &str, channel: &str, text: &str) -> ChatEvent {
        ChatEvent {
            kind: Some("message".to_string()),
            user: Some(user.to_string()),
            channel: Some(channel.to_string()),
            text: Some(text.to_string()),
            ts: Some("1.0".to_string()),
            ..ChatEvent::default()
        }
    }

    async fn harness() -> Harness {
        Harness::new(FakeChat::default())
            .with_team("T1", "C1")
            .await
            .with_player("T1", "U1")
            .await
    }

    #[tokio::test]
    async fn message_in_game_channel_is_penalized_and_announced() {
        let harness = harness().await;
        let outcome = handle_event(
            &harness.state,
            &envelope(message("U1", "C1", "hello")),
            Utc::now(),
        )
        .await
        .expect("event");

        let EventOutcome::Penalized(applied) = outcome else {
            panic!("expected a penalty, got {:?}", outcome);
        };
        assert_eq!(applied.penalty.kind, PenaltyKind::Message);
        assert_eq!(applied.seconds, 5);

        let player = harness.player("T1", "U1").await.unwrap();
        assert_eq!(player.time_to_level, 305);
        assert_eq!(player.events.len(), 1);

        let posted = harness.chat.posted();
        assert_eq!(posted.len(), 1);
        assert_eq!(posted[0].0, "C1");
        assert!(posted[0].1.contains("sending a message"));
        assert_eq!(harness.state.metrics.penalties(), 1);
    }

    #[tokio::test]
    async fn pin_reaches_the_channel_through_its_item() {
        let harness = harness().await;
        let event = ChatEvent {
            kind: Some("pin_added".to_string()),
            user: Some("U1".to_string()),
            item: Some(EventItem {
                channel: Some("C1".to_string()),
                ..EventItem::default()
            }),
            ..ChatEvent::default()
        };
        let outcome = handle_event(&harness.state, &envelope(event), Utc::now())
            .await
            .expect("event");
        assert!(matches!(outcome, EventOutcome::Penalized(applied) if applied.penalty.kind == PenaltyKind::PinAdded));
    }

    #[tokio::test]
    async fn other_channels_are_accepted_but_free() {
        let harness = harness().await;
        let outcome = handle_event(
            &harness.state,
            &envelope(message("U1", "C2", "hello")),
            Utc::now(),
        )
        .await
        .expect("event");
        assert_eq!(outcome, EventOutcome::OutsideGameChannel);
        assert_eq!(harness.player("T1", "U1").await.unwrap().time_to_level, 300);
        assert!(harness.chat.posted().is_empty());
    }

    #[tokio::test]
    async fn noise_is_dropped_without_touching_players() {
        let harness = harness().await;
        let cases = vec![
            (EventEnvelope::default(), DropReason::Malformed),
            (
                envelope(ChatEvent {
                    kind: Some("message".to_string()),
                    bot_id: Some("B1".to_string()),
                    channel: Some("C1".to_string()),
                    ..ChatEvent::default()
                }),
                DropReason::Bot,
            ),
            (envelope(message("U9", "C1", "hi")), DropReason::Unregistered),
            (
                EventEnvelope {
                    team_id: Some("T9".to_string()),
                    ..envelope(message("U1", "C1", "hi"))
                },
                DropReason::UnknownTeam,
            ),
        ];
        for (envelope, reason) in cases {
            let outcome = handle_event(&harness.state, &envelope, Utc::now())
                .await
                .expect("event");
            assert_eq!(outcome, EventOutcome::Dropped(reason));
        }
        assert_eq!(harness.player("T1", "U1").await.unwrap().time_to_level, 300);
    }

    #[tokio::test]
    async fn pin_notification_message_is_not_charged_twice() {
        let harness = harness().await;
        let mut event = message("U1", "C1", "pinned a message");
        event.subtype = Some("pin_added".to_string());
        let outcome = handle_event(&harness.state, &envelope(event), Utc::now())
            .await
            .expect("event");
        assert_eq!(outcome, EventOutcome::NotPenalizable);
    }

    #[tokio::test]
    async fn deleting_a_message_charges_its_author() {
        let harness = harness().await;
        let envelope: EventEnvelope = serde_json::from_str(
            r#"{"type":"event_callback","team_id":"T1","event_id":"Ev9","event":{"type":"message","subtype":"message_deleted","hidden":true,"channel":"C1","ts":"1358878755.000001","deleted_ts":"1358878749.000002","previous_message":{"type":"message","user":"U1","text":"hello","ts":"1358878749.000002"}}}"#,
        )
        .expect("envelope");
        let outcome = handle_event(&harness.state, &envelope, Utc::now())
            .await
            .expect("event");

        let EventOutcome::Penalized(applied) = outcome else {
            panic!("expected a penalty, got {:?}", outcome);
        };
        assert_eq!(applied.penalty.kind, PenaltyKind::MessageDeleted);
        assert!(applied.seconds > 0);
        assert_eq!(
            harness.player("T1", "U1").await.unwrap().time_to_level,
            300 + applied.seconds
        );
    }

    #[tokio::test]
    async fn serialized_updates_still_penalize() {
        let mut harness = harness().await;
        harness.state.config.serialize_player_updates = true;
        let outcome = handle_event(
            &harness.state,
            &envelope(message("U1", "C1", "hi")),
            Utc::now(),
        )
        .await
        .expect("event");
        assert!(matches!(outcome, EventOutcome::Penalized(_)));
        assert_eq!(harness.state.player_locks.len().await, 1);
    }
}
