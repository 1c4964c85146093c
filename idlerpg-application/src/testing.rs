// In-process fakes for the store and chat ports

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex};

use anyhow::anyhow;
use async_trait::async_trait;
use idlerpg_domain::ports::{ChatClient, ChatPlatform, HealthCheckService, KeyValueStore};
use idlerpg_domain::{
    ChannelInfo, ChannelListOptions, ChatUser, OAuthAccess, Player, RuntimeConfig, TeamId, UserId,
};

use crate::{AppState, GameStore, Metrics, PlayerLocks};

#[derive(Default)]
pub struct FakeKv {
    values: Mutex<HashMap<String, String>>,
    sets: Mutex<HashMap<String, BTreeSet<String>>>,
}

impl FakeKv {
    pub fn raw(&self, key: &str) -> Option<String> {
        self.values.lock().unwrap().get(key).cloned()
    }

    pub fn remove_value(&self, key: &str) {
        self.values.lock().unwrap().remove(key);
    }
}

#[async_trait]
impl KeyValueStore for FakeKv {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.values.lock().unwrap().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn members(&self, key: &str) -> anyhow::Result<Vec<String>> {
        Ok(self
            .sets
            .lock()
            .unwrap()
            .get(key)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default())
    }

    async fn add_member(&self, key: &str, member: &str) -> anyhow::Result<()> {
        self.sets
            .lock()
            .unwrap()
            .entry(key.to_string())
            .or_default()
            .insert(member.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> anyhow::Result<()> {
        self.values.lock().unwrap().remove(key);
        self.sets.lock().unwrap().remove(key);
        Ok(())
    }

    async fn ping(&self) -> anyhow::Result<()> {
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeChat {
    pub channels: Mutex<Vec<ChannelInfo>>,
    pub users: Mutex<HashMap<String, ChatUser>>,
    pub posted: Mutex<Vec<(String, String)>>,
    pub oauth: Mutex<Option<OAuthAccess>>,
    pub tokens_seen: Mutex<Vec<String>>,
}

impl FakeChat {
    pub fn with_channel(self, id: &str, name: &str) -> Self {
        self.channels.lock().unwrap().push(ChannelInfo {
            id: id.to_string(),
            name: name.to_string(),
            is_archived: false,
        });
        self
    }

    pub fn with_user(self, id: &str, is_admin: bool) -> Self {
        self.users.lock().unwrap().insert(
            id.to_string(),
            ChatUser {
                id: id.to_string(),
                is_admin,
                ..ChatUser::default()
            },
        );
        self
    }

    pub fn with_oauth(self, team_id: &str, token: &str) -> Self {
        *self.oauth.lock().unwrap() = Some(OAuthAccess {
            team_id: team_id.to_string(),
            access_token: token.to_string(),
            team_name: None,
        });
        self
    }

    pub fn posted(&self) -> Vec<(String, String)> {
        self.posted.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatClient for FakeChat {
    async fn list_channels(&self, _options: ChannelListOptions) -> anyhow::Result<Vec<ChannelInfo>> {
        Ok(self.channels.lock().unwrap().clone())
    }

    async fn post_message(&self, channel: &str, text: &str) -> anyhow::Result<()> {
        self.posted
            .lock()
            .unwrap()
            .push((channel.to_string(), text.to_string()));
        Ok(())
    }

    async fn user_info(&self, user: &str) -> anyhow::Result<ChatUser> {
        self.users
            .lock()
            .unwrap()
            .get(user)
            .cloned()
            .ok_or_else(|| anyhow!("user_not_found"))
    }
}

/// Shares one `FakeChat` between the platform and client roles.
pub struct FakePlatform(pub Arc<FakeChat>);

#[async_trait]
impl ChatPlatform for FakePlatform {
    async fn client(&self, token: &str) -> anyhow::Result<Arc<dyn ChatClient>> {
        self.0.tokens_seen.lock().unwrap().push(token.to_string());
        Ok(self.0.clone())
    }

    async fn oauth_access(&self, _code: &str) -> anyhow::Result<OAuthAccess> {
        self.0
            .oauth
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| anyhow!("invalid_code"))
    }
}

pub struct AlwaysReady;

#[async_trait]
impl HealthCheckService for AlwaysReady {
    async fn check_store(&self) -> anyhow::Result<bool> {
        Ok(true)
    }
}

pub struct Harness {
    pub state: AppState,
    pub kv: Arc<FakeKv>,
    pub chat: Arc<FakeChat>,
}

impl Harness {
    pub fn new(chat: FakeChat) -> Self {
        let kv = Arc::new(FakeKv::default());
        let chat = Arc::new(chat);
        let state = AppState {
            config: RuntimeConfig::default(),
            store: GameStore::new(kv.clone()),
            chat: Arc::new(FakePlatform(chat.clone())),
            health: Arc::new(AlwaysReady),
            metrics: Arc::new(Metrics::default()),
            player_locks: Arc::new(PlayerLocks::default()),
        };
        Self { state, kv, chat }
    }

    /// A known team with a token and a resolved game channel.
    pub async fn with_team(self, team: &str, channel: &str) -> Self {
        let team = TeamId::new(team);
        self.state.store.add_team(&team).await.unwrap();
        self.state.store.set_token(&team, "xoxb-test").await.unwrap();
        self.state.store.set_channel_id(&team, channel).await.unwrap();
        self
    }

    pub async fn with_player(self, team: &str, user: &str) -> Self {
        let player = Player::new(TeamId::new(team), UserId::new(user), None);
        self.state.store.register_player(&player).await.unwrap();
        self
    }

    pub async fn player(&self, team: &str, user: &str) -> Option<Player> {
        self.state
            .store
            .load_player(&TeamId::new(team), &UserId::new(user))
            .await
            .unwrap()
    }
}
