// Team entity
// One workspace installation of the game

use serde::{Deserialize, Serialize};

use crate::value_objects::{TeamId, UserId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub token: Option<String>,
    pub channel_id: Option<String>,
    pub players: Vec<UserId>,
}

