// Channel and command reply text

use crate::entities::{Item, ItemOutcome, LevelUp, PenaltyApplied, Player};
use crate::services::format_duration;

fn remaining(seconds: i64) -> String {
    format_duration(seconds.max(0) as u64)
}

fn with_article(name: &str) -> String {
    let vowel = name
        .chars()
        .next()
        .map(|ch| matches!(ch.to_ascii_lowercase(), 'a' | 'e' | 'i' | 'o' | 'u'))
        .unwrap_or(false);
    if vowel {
        format!("an {}", name)
    } else {
        format!("a {}", name)
    }
}

fn describe_item(item: &Item) -> String {
    format!("{} (level {})", with_article(&item.name), item.level)
}

pub fn item_narrative(who: &str, outcome: &ItemOutcome) -> String {
    match outcome {
        ItemOutcome::Equipped(item) => {
            format!("{} found {} and equipped it.", who, describe_item(item))
        }
        ItemOutcome::Replaced { found, dropped } => format!(
            "{} found {} and swapped it for their {} (level {}).",
            who,
            describe_item(found),
            dropped.name,
            dropped.level
        ),
        ItemOutcome::Discarded { found, weakest } => format!(
            "{} found {}, but it is no better than their {} (level {}), so they left it behind.",
            who,
            describe_item(found),
            weakest.name,
            weakest.level
        ),
    }
}

pub fn level_up_message(player: &Player, level_up: &LevelUp) -> String {
    let who = player.mention();
    format!(
        "{} has reached level {}! Next level in {}. {}",
        who,
        level_up.level,
        remaining(level_up.time_to_level),
        item_narrative(&who, &level_up.item)
    )
}

pub fn penalty_message(player: &Player, applied: &PenaltyApplied) -> String {
    format!(
        "{} was penalized {} for {}. Next level in {}.",
        player.mention(),
        remaining(applied.seconds),
        applied.penalty.kind.describe(),
        remaining(applied.time_to_level)
    )
}

pub fn registration_message(player: &Player) -> String {
    format!(
        "{} has joined the game at level {}! Next level in {}.",
        player.mention(),
        player.level,
        remaining(player.time_to_level)
    )
}

pub fn status_message(player: &Player) -> String {
    let mut text = format!(
        "You are already registered. You are level {}, next level in {}.",
        player.level,
        remaining(player.time_to_level)
    );
    if !player.items.is_empty() {
        let items = player
            .items
            .iter()
            .map(describe_item)
            .collect::<Vec<_>>()
            .join(", ");
        text.push_str(&format!(" You are carrying {}.", items));
    }
    text
}

pub fn reset_message(reset_by: &str, removed: usize) -> String {
    let noun = if removed == 1 { "player" } else { "players" };
    format!(
        "<@{}> has reset the game. {} {} removed.",
        reset_by, removed, noun
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::{Penalty, PenaltyKind, TeamId, UserId};

    fn player() -> Player {
        Player::new(TeamId::new("T1"), UserId::new("U1"), None)
    }

    #[test]
    fn level_up_mentions_level_time_and_item() {
        let level_up = LevelUp {
            level: 2,
            time_to_level: 303,
            item: ItemOutcome::Equipped(Item::new(3, "Ancient Sword")),
        };
        let text = level_up_message(&player(), &level_up);
        assert_eq!(
            text,
            "<@U1> has reached level 2! Next level in 5 minutes, 3 seconds. \
<@U1> found an Ancient Sword (level 3) and equipped it."
        );
    }

    #[test]
    fn penalty_message_clamps_negative_balance() {
        let applied = PenaltyApplied {
            penalty: Penalty::new(PenaltyKind::ReactionAdded, 2),
            seconds: 2,
            time_to_level: -5,
        };
        assert_eq!(
            penalty_message(&player(), &applied),
            "<@U1> was penalized 2 seconds for adding a reaction. Next level in 0 seconds."
        );
    }

    #[test]
    fn narrative_covers_every_outcome() {
        let replaced = ItemOutcome::Replaced {
            found: Item::new(6, "Ring"),
            dropped: Item::new(2, "Rusty Dagger"),
        };
        assert!(item_narrative("x", &replaced).contains("swapped it for their Rusty Dagger"));
        let discarded = ItemOutcome::Discarded {
            found: Item::new(1, "Boots"),
            weakest: Item::new(2, "Cloak"),
        };
        assert!(item_narrative("x", &discarded).contains("left it behind"));
    }

    #[test]
    fn reset_message_pluralizes() {
        assert_eq!(reset_message("U9", 1), "<@U9> has reset the game. 1 player removed.");
        assert_eq!(reset_message("U9", 3), "<@U9> has reset the game. 3 players removed.");
    }
}
