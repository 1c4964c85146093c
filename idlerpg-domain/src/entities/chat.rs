// Chat platform entities
// Shapes returned by the chat API that the game consumes

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelInfo {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub is_archived: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelListOptions {
    pub exclude_archived: bool,
    pub exclude_members: bool,
}

impl Default for ChannelListOptions {
    fn default() -> Self {
        Self {
            exclude_archived: true,
            exclude_members: true,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatUser {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub real_name: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub is_owner: bool,
}

impl ChatUser {
    pub fn is_privileged(&self) -> bool {
        self.is_admin || self.is_owner
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuthAccess {
    pub team_id: String,
    pub access_token: String,
    #[serde(default)]
    pub team_name: Option<String>,
}
