use serde::{Deserialize, Serialize};

/// Slot category of an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemSlot {
    Weapon,
    Armor,
    Shield,
    Consumable,
    Tool,
}

impl ItemSlot {
    /// Whether items of this slot can be equipped.
    pub fn is_equippable(&self) -> bool {
        matches!(self, ItemSlot::Weapon | ItemSlot::Armor | ItemSlot::Shield)
    }

    pub fn name(&self) -> &'static str {
        match self {
            ItemSlot::Weapon => "Weapon",
            ItemSlot::Armor => "Armor",
            ItemSlot::Shield => "Shield",
            ItemSlot::Consumable => "Consumable",
            ItemSlot::Tool => "Tool",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rarity {
    Common = 0,
    Rare = 1,
    Legendary = 2,
}

impl Rarity {
    /// Returns the display name for this rarity tier.
    pub fn name(&self) -> &'static str {
        match self {
            Rarity::Common => "Common",
            Rarity::Rare => "Rare",
            Rarity::Legendary => "Legendary",
        }
    }
}

/// Numeric effect of an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemEffect {
    /// Damage rolled uniformly per swing
    Damage { min: u32, max: u32 },
    /// Flat defense and max-health bonus while equipped
    Protection { defense: u32, max_health: u32 },
    /// Restores health when consumed
    Heal { amount: u32 },
    /// No combat effect
    Utility,
}

/// An item template or instance.
///
/// Catalog entries are templates; anything a character carries, a merchant
/// lists or a room holds is an independent clone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub key: String,
    pub name: String,
    pub slot: ItemSlot,
    pub effect: ItemEffect,
    pub rarity: Rarity,
    pub tier: u8,
    /// Value in copper before merchant price variation
    pub base_value: u64,
}

impl Item {
    /// Weapon damage range, if this item deals damage.
    pub fn damage_range(&self) -> Option<(u32, u32)> {
        match self.effect {
            ItemEffect::Damage { min, max } => Some((min.min(max), max.max(min))),
            _ => None,
        }
    }

    /// Defense granted while equipped.
    pub fn defense_bonus(&self) -> u32 {
        match self.effect {
            ItemEffect::Protection { defense, .. } => defense,
            _ => 0,
        }
    }

    /// Max health granted while equipped.
    pub fn health_bonus(&self) -> u32 {
        match self.effect {
            ItemEffect::Protection { max_health, .. } => max_health,
            _ => 0,
        }
    }

    /// Health restored when consumed.
    pub fn heal_amount(&self) -> Option<u32> {
        match self.effect {
            ItemEffect::Heal { amount } => Some(amount),
            _ => None,
        }
    }

    pub fn is_consumable(&self) -> bool {
        self.slot == ItemSlot::Consumable
    }

    /// One-line description for logs and reports
    pub fn describe(&self) -> String {
        match self.effect {
            ItemEffect::Damage { min, max } => format!("{} (DMG {}-{})", self.name, min, max),
            ItemEffect::Protection {
                defense,
                max_health: 0,
            } => format!("{} (DEF {})", self.name, defense),
            ItemEffect::Protection {
                defense,
                max_health,
            } => format!("{} (DEF {}, HP +{})", self.name, defense, max_health),
            ItemEffect::Heal { amount } => format!("{} (heals {})", self.name, amount),
            ItemEffect::Utility => self.name.clone(),
        }
    }
}
