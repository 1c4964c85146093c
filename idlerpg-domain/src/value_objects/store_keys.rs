// Key space of the persistent store

use crate::value_objects::{TeamId, UserId};

pub const TEAMS_KEY: &str = "teams";
pub const LAST_TIMESTAMP_KEY: &str = "last_timestamp";

pub fn token_key(team: &TeamId) -> String {
    format!("{}:token", team)
}

pub fn channel_key(team: &TeamId) -> String {
    format!("{}:channel_id", team)
}

pub fn players_key(team: &TeamId) -> String {
    format!("{}:players", team)
}

pub fn player_key(team: &TeamId, user: &UserId) -> String {
    format!("{}:{}", team, user)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_team_scoped_keys() {
        let team = TeamId::new("T01");
        let user = UserId::new("U000001");
        assert_eq!(token_key(&team), "T01:token");
        assert_eq!(channel_key(&team), "T01:channel_id");
        assert_eq!(players_key(&team), "T01:players");
        assert_eq!(player_key(&team, &user), "T01:U000001");
    }
}
