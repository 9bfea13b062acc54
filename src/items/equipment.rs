use super::types::{Item, ItemSlot};
use serde::{Deserialize, Serialize};

/// Equipped gear. Each slot holds at most one item of its own slot type.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Equipment {
    pub weapon: Option<Item>,
    pub armor: Option<Item>,
    pub shield: Option<Item>,
}

impl Equipment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the item in a slot. Non-equippable slots are always empty.
    pub fn get(&self, slot: ItemSlot) -> Option<&Item> {
        match slot {
            ItemSlot::Weapon => self.weapon.as_ref(),
            ItemSlot::Armor => self.armor.as_ref(),
            ItemSlot::Shield => self.shield.as_ref(),
            ItemSlot::Consumable | ItemSlot::Tool => None,
        }
    }

    /// Puts `item` into its own slot and returns whatever was there.
    /// Returns the item back untouched if its slot is not equippable.
    pub fn replace(&mut self, item: Item) -> Result<Option<Item>, Item> {
        let slot = match item.slot {
            ItemSlot::Weapon => &mut self.weapon,
            ItemSlot::Armor => &mut self.armor,
            ItemSlot::Shield => &mut self.shield,
            ItemSlot::Consumable | ItemSlot::Tool => return Err(item),
        };
        Ok(slot.replace(item))
    }

    /// Empties a slot, returning its item.
    pub fn take(&mut self, slot: ItemSlot) -> Option<Item> {
        match slot {
            ItemSlot::Weapon => self.weapon.take(),
            ItemSlot::Armor => self.armor.take(),
            ItemSlot::Shield => self.shield.take(),
            ItemSlot::Consumable | ItemSlot::Tool => None,
        }
    }

    pub fn iter_equipped(&self) -> impl Iterator<Item = &Item> {
        [&self.weapon, &self.armor, &self.shield]
            .into_iter()
            .filter_map(|item| item.as_ref())
    }

    /// Sum of defense bonuses from armor and shield.
    pub fn defense_bonus(&self) -> u32 {
        self.iter_equipped()
            .map(Item::defense_bonus)
            .fold(0, u32::saturating_add)
    }

    /// Sum of max-health bonuses from equipped gear.
    pub fn health_bonus(&self) -> u32 {
        self.iter_equipped()
            .map(Item::health_bonus)
            .fold(0, u32::saturating_add)
    }
}
