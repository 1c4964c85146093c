use rand::seq::SliceRandom;
use rand::Rng;

use crate::entities::Item;

pub const ADJECTIVE_CHANCE: f64 = 0.5;
pub const SUFFIX_CHANCE: f64 = 0.2;

pub const ADJECTIVES: &[&str] = &[
    "Rusty",
    "Shiny",
    "Cursed",
    "Blessed",
    "Ancient",
    "Glowing",
    "Dented",
    "Gilded",
    "Enchanted",
    "Ordinary",
    "Mighty",
    "Crooked",
];

pub const NOUNS: &[&str] = &[
    "Sword",
    "Shield",
    "Helmet",
    "Amulet",
    "Ring",
    "Boots",
    "Gauntlets",
    "Dagger",
    "Staff",
    "Bow",
    "Cloak",
    "Spear",
    "Mace",
    "Tome",
];

pub const SUFFIXES: &[&str] = &[
    "of Doom",
    "of the Bear",
    "of Slack",
    "of Procrastination",
    "of the Idle",
    "of Unread Messages",
    "of Swiftness",
    "of the Owl",
];

/// Rolls an item whose level is uniform in `[1, floor(max_level)]`.
pub fn generate_item<R: Rng + ?Sized>(max_level: f64, rng: &mut R) -> Item {
    let ceiling = (max_level.floor() as u32).max(1);
    let level = rng.gen_range(1..=ceiling);

    let adjective = if rng.gen_bool(ADJECTIVE_CHANCE) {
        ADJECTIVES.choose(rng).copied()
    } else {
        None
    };
    let noun = NOUNS.choose(rng).copied().unwrap_or("Trinket");
    let suffix = if rng.gen_bool(SUFFIX_CHANCE) {
        SUFFIXES.choose(rng).copied()
    } else {
        None
    };

    Item::new(level, compose_name(adjective, noun, suffix))
}

/// Joins the name parts with single spaces.
pub fn compose_name(adjective: Option<&str>, noun: &str, suffix: Option<&str>) -> String {
    [adjective.unwrap_or(""), noun, suffix.unwrap_or("")]
        .iter()
        .flat_map(|part| part.split_whitespace())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn compose_name_normalizes_whitespace() {
        assert_eq!(compose_name(None, "Sword", None), "Sword");
        assert_eq!(compose_name(Some("Rusty"), "Sword", None), "Rusty Sword");
        assert_eq!(
            compose_name(Some(" Rusty "), "Sword", Some("of  Doom ")),
            "Rusty Sword of Doom"
        );
        assert_eq!(compose_name(Some(""), "Ring", Some("")), "Ring");
    }

    #[test]
    fn item_level_stays_within_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        for player_level in 1..20u32 {
            let max = player_level as f64 * 1.5;
            for _ in 0..50 {
                let item = generate_item(max, &mut rng);
                assert!(item.level >= 1);
                assert!(item.level <= max.floor() as u32);
            }
        }
    }

    #[test]
    fn low_ceiling_still_rolls_level_one() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(generate_item(0.5, &mut rng).level, 1);
        assert_eq!(generate_item(1.5, &mut rng).level, 1);
    }

    #[test]
    fn names_are_built_from_known_parts() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut saw_adjective = false;
        let mut saw_suffix = false;
        let mut saw_bare = false;
        for _ in 0..500 {
            let item = generate_item(10.0, &mut rng);
            assert!(!item.name.contains("  "));
            assert_eq!(item.name.trim(), item.name);

            let mut rest = item.name.as_str();
            if let Some(adjective) = ADJECTIVES
                .iter()
                .find(|adj| rest.starts_with(&format!("{} ", adj)))
            {
                saw_adjective = true;
                rest = &rest[adjective.len() + 1..];
            }
            let noun = NOUNS
                .iter()
                .find(|noun| rest.starts_with(*noun))
                .expect("every name has a base noun");
            rest = rest[noun.len()..].trim_start();
            if rest.is_empty() {
                if item.name == *noun {
                    saw_bare = true;
                }
            } else {
                assert!(SUFFIXES.contains(&rest), "unknown suffix {:?}", rest);
                saw_suffix = true;
            }
        }
        assert!(saw_adjective && saw_suffix && saw_bare);
    }
}
