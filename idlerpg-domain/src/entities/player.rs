// Player entity
// One user's progression record within a team

use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::entities::{Item, ItemOutcome};
use crate::services::{generate_item, penalty_seconds, time_to_level};
use crate::value_objects::{Penalty, PlayerKey, TeamId, UserId};

pub const MAX_EVENTS: usize = 10;
pub const MAX_ITEMS: usize = 3;
pub const ITEM_LEVEL_FACTOR: f64 = 1.5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub team_id: TeamId,
    pub user_id: UserId,
    pub level: u32,
    pub time_to_level: i64,
    #[serde(default)]
    pub display_name: Option<String>,
    /// Audit log keyed by millisecond timestamp; holds at most `MAX_EVENTS`.
    #[serde(default)]
    pub events: BTreeMap<i64, String>,
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(default)]
    pub away: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelUp {
    pub level: u32,
    pub time_to_level: i64,
    pub item: ItemOutcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PenaltyApplied {
    pub penalty: Penalty,
    pub seconds: i64,
    pub time_to_level: i64,
}

impl Player {
    pub fn new(team_id: TeamId, user_id: UserId, display_name: Option<String>) -> Self {
        Self {
            team_id,
            user_id,
            level: 1,
            time_to_level: time_to_level(1),
            display_name: display_name.filter(|name| !name.trim().is_empty()),
            events: BTreeMap::new(),
            items: Vec::new(),
            away: false,
        }
    }

    pub fn key(&self) -> PlayerKey {
        PlayerKey::new(self.team_id.clone(), self.user_id.clone())
    }

    pub fn mention(&self) -> String {
        self.user_id.mention()
    }

    /// Counts `elapsed_seconds` off the clock, levelling up as many times as
    /// the balance allows. Each level-up carries the negative remainder
    /// forward.
    pub fn advance<R: Rng + ?Sized>(
        &mut self,
        elapsed_seconds: i64,
        at_millis: i64,
        rng: &mut R,
    ) -> Vec<LevelUp> {
        self.time_to_level -= elapsed_seconds.max(0);
        let mut level_ups = Vec::new();
        while self.time_to_level <= 0 {
            level_ups.push(self.level_up(at_millis, rng));
        }
        level_ups
    }

    pub fn level_up<R: Rng + ?Sized>(&mut self, at_millis: i64, rng: &mut R) -> LevelUp {
        self.level += 1;
        self.time_to_level += time_to_level(self.level + 1);
        self.record_event(at_millis, format!("Reached level {}", self.level));

        let found = generate_item(self.level as f64 * ITEM_LEVEL_FACTOR, rng);
        let item = self.equip(found);

        LevelUp {
            level: self.level,
            time_to_level: self.time_to_level,
            item,
        }
    }

    pub fn apply_penalty(&mut self, penalty: Penalty, at_millis: i64) -> PenaltyApplied {
        let seconds = penalty_seconds(penalty.modifier, self.level);
        self.time_to_level += seconds;
        self.record_event(
            at_millis,
            format!(
                "Penalized {} seconds for {}",
                seconds,
                penalty.kind.describe()
            ),
        );
        PenaltyApplied {
            penalty,
            seconds,
            time_to_level: self.time_to_level,
        }
    }

    /// Fills free slots in order; once full, replaces the weakest held item
    /// only when the new one is strictly stronger.
    pub fn equip(&mut self, found: Item) -> ItemOutcome {
        if self.items.len() < MAX_ITEMS {
            self.items.push(found.clone());
            return ItemOutcome::Equipped(found);
        }
        let Some((index, weakest)) = self
            .items
            .iter()
            .enumerate()
            .min_by_key(|(_, item)| item.level)
            .map(|(index, item)| (index, item.clone()))
        else {
            self.items.push(found.clone());
            return ItemOutcome::Equipped(found);
        };
        if found.level > weakest.level {
            self.items[index] = found.clone();
            ItemOutcome::Replaced {
                found,
                dropped: weakest,
            }
        } else {
            ItemOutcome::Discarded { found, weakest }
        }
    }

    pub fn record_event(&mut self, at_millis: i64, description: String) {
        let mut key = at_millis;
        while self.events.contains_key(&key) {
            key += 1;
        }
        self.events.insert(key, description);
        self.trim_events();
    }

    fn trim_events(&mut self) {
        while self.events.len() > MAX_EVENTS {
            self.events.pop_first();
        }
    }
}
