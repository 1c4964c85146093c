// Item entity
// Equipment carried in a player's inventory slots

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub level: u32,
    pub name: String,
}

impl Item {
    pub fn new(level: u32, name: impl Into<String>) -> Self {
        Self {
            level,
            name: name.into(),
        }
    }
}

/// What happened to a freshly found item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    /// A free slot was available.
    Equipped(Item),
    /// The weakest held item was dropped for the new one.
    Replaced { found: Item, dropped: Item },
    /// Nothing held was weaker than the new item.
    Discarded { found: Item, weakest: Item },
}

