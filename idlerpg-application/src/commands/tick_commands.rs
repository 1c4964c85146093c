use std::sync::Arc;

use chrono::{DateTime, Utc};
use idlerpg_domain::level_up_message;
use idlerpg_domain::ports::ChatClient;
use idlerpg_domain::{PlayerKey, TeamId, UserId};
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use super::channel_commands::announce;
use crate::{AppError, AppState};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub elapsed_seconds: i64,
    pub teams: usize,
    pub players: usize,
    pub level_ups: usize,
}

/// One pass of the game clock. Every registered player of every playable
/// team loses the seconds elapsed since the previous tick. Returns once all
/// team and player work has settled.
pub async fn run_tick(state: &AppState, now: DateTime<Utc>) -> Result<TickReport, AppError> {
    let now_seconds = now.timestamp();
    let elapsed_seconds = match state.store.last_timestamp().await? {
        Some(last) => (now_seconds - last).max(0),
        None => 0,
    };
    state.store.set_last_timestamp(now_seconds).await?;

    let teams = state.store.teams().await?;
    debug!(
        "tick at {} advancing {} teams by {}s",
        now_seconds,
        teams.len(),
        elapsed_seconds
    );

    let at_millis = now.timestamp_millis();
    let mut tasks = JoinSet::new();
    for team in teams {
        let state = state.clone();
        tasks.spawn(async move {
            let outcome = advance_team(&state, &team, elapsed_seconds, at_millis).await;
            (team, outcome)
        });
    }

    let mut report = TickReport {
        elapsed_seconds,
        ..TickReport::default()
    };
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((_, Ok(None))) => {}
            Ok((_, Ok(Some((players, level_ups))))) => {
                report.teams += 1;
                report.players += players;
                report.level_ups += level_ups;
            }
            Ok((team, Err(err))) => error!("tick failed for team {}: {}", team, err),
            Err(err) => error!("tick team task aborted: {}", err),
        }
    }

    state.metrics.record_tick(report.players);
    state.metrics.record_level_ups(report.level_ups);
    if report.level_ups > 0 {
        info!(
            "tick advanced {} players in {} teams, {} level-ups",
            report.players, report.teams, report.level_ups
        );
    }
    Ok(report)
}

/// `None` when the team cannot be played yet.
async fn advance_team(
    state: &AppState,
    team: &TeamId,
    elapsed_seconds: i64,
    at_millis: i64,
) -> Result<Option<(usize, usize)>, AppError> {
    let team = state.store.load_team(team).await?;
    let Some(channel) = team.channel_id.clone() else {
        error!("team {} has no game channel, skipping tick", team.id);
        return Ok(None);
    };
    let Some(token) = team.token.as_deref() else {
        error!("team {} has no access token, skipping tick", team.id);
        return Ok(None);
    };
    let client = state.chat.client(token).await.map_err(AppError::upstream)?;

    let mut tasks = JoinSet::new();
    for user in team.players {
        let state = state.clone();
        let client = client.clone();
        let team_id = team.id.clone();
        let channel = channel.clone();
        tasks.spawn(async move {
            let outcome = advance_player(
                &state,
                &client,
                &team_id,
                &user,
                &channel,
                elapsed_seconds,
                at_millis,
            )
            .await;
            (user, outcome)
        });
    }

    let mut players = 0;
    let mut level_ups = 0;
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((_, Ok(Some(count)))) => {
                players += 1;
                level_ups += count;
            }
            Ok((_, Ok(None))) => {}
            Ok((user, Err(err))) => {
                error!("tick failed for player {}:{}: {}", team.id, user, err)
            }
            Err(err) => error!("tick player task aborted: {}", err),
        }
    }
    Ok(Some((players, level_ups)))
}

async fn advance_player(
    state: &AppState,
    client: &Arc<dyn ChatClient>,
    team: &TeamId,
    user: &UserId,
    channel: &str,
    elapsed_seconds: i64,
    at_millis: i64,
) -> Result<Option<usize>, AppError> {
    let key = PlayerKey::new(team.clone(), user.clone());
    let (player, level_ups) = {
        let _guard = state.lock_player(&key).await;
        let Some(mut player) = state.store.load_player(team, user).await? else {
            warn!("player {} is registered but has no record", key);
            return Ok(None);
        };
        let level_ups = {
            let mut rng = rand::thread_rng();
            player.advance(elapsed_seconds, at_millis, &mut rng)
        };
        state.store.save_player(&player).await?;
        (player, level_ups)
    };

    for level_up in &level_ups {
        info!("player {} reached level {}", key, level_up.level);
        announce(client, channel, &level_up_message(&player, level_up)).await;
    }
    Ok(Some(level_ups.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeChat, Harness};
    use crate::PlayerLocks;
    use anyhow::anyhow;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use idlerpg_domain::ports::ChatPlatform;
    use idlerpg_domain::{ChannelInfo, ChannelListOptions, ChatUser, OAuthAccess};
    use std::sync::Mutex;
    use std::time::Duration;

    /// Records whether the player's lock could be taken while posting.
    struct LockCheckingChat {
        locks: Arc<PlayerLocks>,
        key: PlayerKey,
        lock_free: Mutex<Vec<bool>>,
    }

    #[async_trait]
    impl ChatClient for LockCheckingChat {
        async fn list_channels(&self, _options: ChannelListOptions) -> anyhow::Result<Vec<ChannelInfo>> {
            Ok(Vec::new())
        }

        async fn post_message(&self, _channel: &str, _text: &str) -> anyhow::Result<()> {
            let free = tokio::time::timeout(Duration::from_millis(100), self.locks.acquire(&self.key))
                .await
                .is_ok();
            self.lock_free.lock().unwrap().push(free);
            Ok(())
        }

        async fn user_info(&self, _user: &str) -> anyhow::Result<ChatUser> {
            Err(anyhow!("user_not_found"))
        }
    }

    struct LockCheckingPlatform(Arc<LockCheckingChat>);

    #[async_trait]
    impl ChatPlatform for LockCheckingPlatform {
        async fn client(&self, _token: &str) -> anyhow::Result<Arc<dyn ChatClient>> {
            Ok(self.0.clone())
        }

        async fn oauth_access(&self, _code: &str) -> anyhow::Result<OAuthAccess> {
            Err(anyhow!("invalid_code"))
        }
    }

    fn at(seconds: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(seconds, 0).single().expect("timestamp")
    }

    #[tokio::test]
    async fn first_tick_only_records_the_clock() {
        let harness = Harness::new(FakeChat::default())
            .with_team("T1", "C1")
            .await
            .with_player("T1", "U1")
            .await;

        let report = run_tick(&harness.state, at(1_000)).await.expect("tick");
        assert_eq!(report.elapsed_seconds, 0);
        assert_eq!(report.players, 1);
        assert_eq!(harness.player("T1", "U1").await.unwrap().time_to_level, 300);
        assert_eq!(harness.state.store.last_timestamp().await.unwrap(), Some(1_000));
    }

    #[tokio::test]
    async fn elapsed_time_is_taken_off_every_player() {
        let harness = Harness::new(FakeChat::default())
            .with_team("T1", "C1")
            .await
            .with_player("T1", "U1")
            .await
            .with_player("T1", "U2")
            .await;
        harness.state.store.set_last_timestamp(1_000).await.unwrap();

        let report = run_tick(&harness.state, at(1_010)).await.expect("tick");
        assert_eq!(report.elapsed_seconds, 10);
        assert_eq!(report.players, 2);
        for user in ["U1", "U2"] {
            assert_eq!(harness.player("T1", user).await.unwrap().time_to_level, 290);
        }
        assert!(harness.chat.posted().is_empty());
    }

    #[tokio::test]
    async fn level_up_is_announced_in_the_game_channel() {
        let harness = Harness::new(FakeChat::default())
            .with_team("T1", "C1")
            .await
            .with_player("T1", "U1")
            .await;
        harness.state.store.set_last_timestamp(1_000).await.unwrap();

        let report = run_tick(&harness.state, at(1_400)).await.expect("tick");
        assert_eq!(report.level_ups, 1);

        let player = harness.player("T1", "U1").await.unwrap();
        assert_eq!(player.level, 2);
        assert_eq!(player.items.len(), 1);

        let posted = harness.chat.posted();
        assert_eq!(posted.len(), 1);
        assert_eq!(posted[0].0, "C1");
        assert!(posted[0].1.starts_with("<@U1> has reached level 2!"));
        assert_eq!(harness.state.metrics.level_ups(), 1);
    }

    #[tokio::test]
    async fn clock_going_backwards_advances_nobody() {
        let harness = Harness::new(FakeChat::default())
            .with_team("T1", "C1")
            .await
            .with_player("T1", "U1")
            .await;
        harness.state.store.set_last_timestamp(2_000).await.unwrap();

        let report = run_tick(&harness.state, at(1_990)).await.expect("tick");
        assert_eq!(report.elapsed_seconds, 0);
        assert_eq!(harness.player("T1", "U1").await.unwrap().time_to_level, 300);
    }

    #[tokio::test]
    async fn team_without_channel_is_skipped() {
        let harness = Harness::new(FakeChat::default());
        let team = TeamId::new("T1");
        harness.state.store.add_team(&team).await.unwrap();
        harness.state.store.set_token(&team, "xoxb").await.unwrap();
        let harness = harness.with_player("T1", "U1").await;
        harness.state.store.set_last_timestamp(1_000).await.unwrap();

        let report = run_tick(&harness.state, at(1_100)).await.expect("tick");
        assert_eq!(report.teams, 0);
        assert_eq!(harness.player("T1", "U1").await.unwrap().time_to_level, 300);
    }

    #[tokio::test]
    async fn missing_record_does_not_stop_the_team() {
        let harness = Harness::new(FakeChat::default())
            .with_team("T1", "C1")
            .await
            .with_player("T1", "U1")
            .await;
        harness
            .state
            .store
            .register_player(&idlerpg_domain::Player::new(
                TeamId::new("T1"),
                UserId::new("U2"),
                None,
            ))
            .await
            .unwrap();
        harness.kv.remove_value("T1:U2");
        harness.state.store.set_last_timestamp(1_000).await.unwrap();

        let report = run_tick(&harness.state, at(1_050)).await.expect("tick");
        assert_eq!(report.players, 1);
        assert_eq!(harness.player("T1", "U1").await.unwrap().time_to_level, 250);
    }

    #[tokio::test]
    async fn player_lock_is_released_before_announcing() {
        let mut harness = Harness::new(FakeChat::default())
            .with_team("T1", "C1")
            .await
            .with_player("T1", "U1")
            .await;
        harness.state.config.serialize_player_updates = true;
        let chat = Arc::new(LockCheckingChat {
            locks: harness.state.player_locks.clone(),
            key: PlayerKey::new(TeamId::new("T1"), UserId::new("U1")),
            lock_free: Mutex::new(Vec::new()),
        });
        harness.state.chat = Arc::new(LockCheckingPlatform(chat.clone()));
        harness.state.store.set_last_timestamp(1_000).await.unwrap();

        let report = run_tick(&harness.state, at(1_400)).await.expect("tick");
        assert_eq!(report.level_ups, 1);
        assert_eq!(*chat.lock_free.lock().unwrap(), vec![true]);
    }
}
