use std::sync::Arc;

use anyhow::Context;
use idlerpg_domain::ports::KeyValueStore;
use idlerpg_domain::{
    channel_key, player_key, players_key, token_key, Player, Team, TeamId, UserId,
    LAST_TIMESTAMP_KEY, TEAMS_KEY,
};

/// Typed access to the game's key space on top of a raw key-value store.
#[derive(Clone)]
pub struct GameStore {
    kv: Arc<dyn KeyValueStore>,
}

impl GameStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    pub async fn ping(&self) -> anyhow::Result<()> {
        self.kv.ping().await
    }

    pub async fn teams(&self) -> anyhow::Result<Vec<TeamId>> {
        let mut teams = self
            .kv
            .members(TEAMS_KEY)
            .await?
            .into_iter()
            .map(TeamId)
            .collect::<Vec<_>>();
        teams.sort();
        Ok(teams)
    }

    pub async fn is_known_team(&self, team: &TeamId) -> anyhow::Result<bool> {
        self.kv.is_member(TEAMS_KEY, team.as_str()).await
    }

    pub async fn add_team(&self, team: &TeamId) -> anyhow::Result<()> {
        self.kv.add_member(TEAMS_KEY, team.as_str()).await
    }

    pub async fn last_timestamp(&self) -> anyhow::Result<Option<i64>> {
        let Some(raw) = self.kv.get(LAST_TIMESTAMP_KEY).await? else {
            return Ok(None);
        };
        let value = raw
            .trim()
            .parse::<i64>()
            .with_context(|| format!("invalid {} value '{}'", LAST_TIMESTAMP_KEY, raw))?;
        Ok(Some(value))
    }

    pub async fn set_last_timestamp(&self, seconds: i64) -> anyhow::Result<()> {
        self.kv.set(LAST_TIMESTAMP_KEY, &seconds.to_string()).await
    }

    pub async fn token(&self, team: &TeamId) -> anyhow::Result<Option<String>> {
        Ok(self
            .kv
            .get(&token_key(team))
            .await?
            .filter(|token| !token.trim().is_empty()))
    }

    pub async fn set_token(&self, team: &TeamId, token: &str) -> anyhow::Result<()> {
        self.kv.set(&token_key(team), token).await
    }

    pub async fn channel_id(&self, team: &TeamId) -> anyhow::Result<Option<String>> {
        Ok(self
            .kv
            .get(&channel_key(team))
            .await?
            .filter(|channel| !channel.trim().is_empty()))
    }

    pub async fn set_channel_id(&self, team: &TeamId, channel: &str) -> anyhow::Result<()> {
        self.kv.set(&channel_key(team), channel).await
    }

    pub async fn player_ids(&self, team: &TeamId) -> anyhow::Result<Vec<UserId>> {
        let mut players = self
            .kv
            .members(&players_key(team))
            .await?
            .into_iter()
            .map(UserId)
            .collect::<Vec<_>>();
        players.sort();
        Ok(players)
    }

    pub async fn is_registered(&self, team: &TeamId, user: &UserId) -> anyhow::Result<bool> {
        self.kv.is_member(&players_key(team), user.as_str()).await
    }

    pub async fn load_team(&self, team: &TeamId) -> anyhow::Result<Team> {
        Ok(Team {
            id: team.clone(),
            token: self.token(team).await?,
            channel_id: self.channel_id(team).await?,
            players: self.player_ids(team).await?,
        })
    }

    pub async fn load_player(&self, team: &TeamId, user: &UserId) -> anyhow::Result<Option<Player>> {
        let key = player_key(team, user);
        let Some(raw) = self.kv.get(&key).await? else {
            return Ok(None);
        };
        let player = serde_json::from_str(&raw)
            .with_context(|| format!("invalid player record at '{}'", key))?;
        Ok(Some(player))
    }

    pub async fn save_player(&self, player: &Player) -> anyhow::Result<()> {
        let content = serde_json::to_string(player)?;
        self.kv
            .set(&player_key(&player.team_id, &player.user_id), &content)
            .await
    }

    /// Writes the record, then adds the user to the team's player set.
    pub async fn register_player(&self, player: &Player) -> anyhow::Result<()> {
        self.save_player(player).await?;
        self.kv
            .add_member(&players_key(&player.team_id), player.user_id.as_str())
            .await
    }

    /// Deletes every player record of the team and the player set itself.
    /// Returns how many players were removed.
    pub async fn remove_all_players(&self, team: &TeamId) -> anyhow::Result<usize> {
        let players = self.player_ids(team).await?;
        for user in &players {
            self.kv.remove(&player_key(team, user)).await?;
        }
        self.kv.remove(&players_key(team)).await?;
        Ok(players.len())
    }
}
