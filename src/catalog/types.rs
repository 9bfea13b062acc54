use crate::items::Item;
use serde::{Deserialize, Serialize};

/// Item template. Anything handed to a character or placed in a room is a clone.
pub type ItemDef = Item;

/// One weighted entry of a drop table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropEntry {
    /// Catalog item key
    pub item: String,
    pub weight: u32,
}

impl DropEntry {
    pub fn new(item: impl Into<String>, weight: u32) -> Self {
        Self {
            item: item.into(),
            weight,
        }
    }
}

/// Enemy template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyDef {
    pub key: String,
    pub name: String,
    pub tier: u8,
    pub attack: u32,
    pub defense: u32,
    pub health: u32,
    pub xp_value: u64,
    pub min_copper: u32,
    pub max_copper: u32,
    #[serde(default)]
    pub common_drops: Vec<DropEntry>,
    #[serde(default)]
    pub rare_drops: Vec<DropEntry>,
    /// Relative chance of being picked when a room spawns enemies
    #[serde(default = "default_spawn_weight")]
    pub spawn_weight: u32,
}

fn default_spawn_weight() -> u32 {
    1
}

/// Base stats and perks of a progression tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierDef {
    pub tier: u8,
    pub title: String,
    pub attack: u32,
    pub defense: u32,
    pub health: u32,
    /// Flat bonus added to every attack
    pub attack_bonus: u32,
    /// XP needed to be promoted into this tier
    pub min_xp: u64,
    #[serde(default)]
    pub starting_weapon: Option<String>,
    #[serde(default)]
    pub starting_armor: Option<String>,
    #[serde(default)]
    pub special_ability: Option<String>,
}
