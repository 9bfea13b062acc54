//! The player character and its inventory operations.

use crate::catalog::{CatalogProvider, TierDef};
use crate::core::constants::{STARTING_MONEY, STARTING_POTION_COUNT, STARTING_POTION_KEY};
use crate::core::error::{EngineError, Result};
use crate::items::{Equipment, Item, ItemSlot};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Tier base stats copied from the catalog at creation or promotion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseStats {
    pub attack: u32,
    pub defense: u32,
    pub health: u32,
    pub attack_bonus: u32,
}

impl BaseStats {
    pub fn from_tier(def: &TierDef) -> Self {
        Self {
            attack: def.attack,
            defense: def.defense,
            health: def.health,
            attack_bonus: def.attack_bonus,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub name: String,
    pub age: u32,
    /// Only changed by promotion
    pub(crate) tier: u8,
    pub xp: u64,
    pub(crate) current_health: u32,
    /// Copper
    pub money: u64,
    pub inventory: Vec<Item>,
    pub equipment: Equipment,
    pub(crate) base: BaseStats,
    pub special_ability: Option<String>,
}

impl Character {
    /// Creates a new tier 1 character with that tier's starting gear equipped,
    /// starting copper and a stack of lesser health potions.
    pub fn new(name: impl Into<String>, age: u32, catalog: &dyn CatalogProvider) -> Result<Self> {
        let tier = catalog.get_tier(1)?;
        let mut character = Self::from_tier(name, age, tier);

        for key in tier.starting_weapon.iter().chain(&tier.starting_armor) {
            let item = catalog.get_item(key)?.clone();
            // Starting gear comes from the catalog, so a bad slot is a content bug
            character.equipment.replace(item).map_err(|item| {
                EngineError::Config(format!("starting item {} is not equippable", item.key))
            })?;
        }

        let potion = catalog.get_item(STARTING_POTION_KEY)?;
        character
            .inventory
            .extend(std::iter::repeat(potion).take(STARTING_POTION_COUNT).cloned());
        character.money = STARTING_MONEY;
        character.current_health = character.max_health();

        debug!(name = %character.name, "character created");
        Ok(character)
    }

    /// A bare character at the given tier: no gear, no money, full health.
    pub fn from_tier(name: impl Into<String>, age: u32, tier: &TierDef) -> Self {
        let base = BaseStats::from_tier(tier);
        Self {
            name: name.into(),
            age,
            tier: tier.tier,
            xp: tier.min_xp,
            current_health: base.health,
            money: 0,
            inventory: Vec::new(),
            equipment: Equipment::new(),
            base,
            special_ability: tier.special_ability.clone(),
        }
    }

    pub fn tier(&self) -> u8 {
        self.tier
    }

    pub fn current_health(&self) -> u32 {
        self.current_health
    }

    pub fn base_stats(&self) -> BaseStats {
        self.base
    }

    pub fn is_alive(&self) -> bool {
        self.current_health > 0
    }

    /// Restores health up to the max. Returns the amount actually healed.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let max = self.max_health();
        let healed = amount.min(max.saturating_sub(self.current_health));
        self.current_health += healed;
        healed
    }

    /// Returns true if still alive
    pub fn take_damage(&mut self, amount: u32) -> bool {
        self.current_health = self.current_health.saturating_sub(amount);
        self.is_alive()
    }

    pub fn can_afford(&self, price: u64) -> bool {
        self.money >= price
    }

    /// Index of the first inventory item with this key
    pub fn find_item(&self, key: &str) -> Option<usize> {
        self.inventory.iter().position(|item| item.key == key)
    }

    pub fn count_item(&self, key: &str) -> usize {
        self.inventory.iter().filter(|item| item.key == key).count()
    }

    fn inventory_item(&self, index: usize) -> Result<&Item> {
        self.inventory.get(index).ok_or_else(|| {
            EngineError::invalid_action(format!("no inventory item at index {index}"))
        })
    }

    /// Equips the inventory item at `index`, returning any previously equipped
    /// item of that slot to the inventory.
    pub fn equip(&mut self, index: usize) -> Result<()> {
        let item = self.inventory_item(index)?;
        if !item.slot.is_equippable() {
            return Err(EngineError::invalid_action(format!(
                "{} cannot be equipped",
                item.name
            )));
        }

        let item = self.inventory.remove(index);
        debug!(item = %item.name, "equipped");
        if let Ok(Some(previous)) = self.equipment.replace(item) {
            self.inventory.push(previous);
        }
        self.clamp_health();
        Ok(())
    }

    pub fn unequip(&mut self, slot: ItemSlot) -> Result<()> {
        let item = self.equipment.take(slot).ok_or_else(|| {
            EngineError::invalid_action(format!("nothing equipped in {} slot", slot.name()))
        })?;
        self.inventory.push(item);
        self.clamp_health();
        Ok(())
    }

    /// Consumes the inventory item at `index`. Returns the item and the amount
    /// healed.
    pub fn use_consumable(&mut self, index: usize) -> Result<(Item, u32)> {
        let item = self.inventory_item(index)?;
        let Some(amount) = item.heal_amount().filter(|_| item.is_consumable()) else {
            return Err(EngineError::invalid_action(format!(
                "{} cannot be used",
                item.name
            )));
        };

        let item = self.inventory.remove(index);
        let healed = self.heal(amount);
        debug!(item = %item.name, healed, "consumable used");
        Ok((item, healed))
    }

    /// Inventory index of the consumable with the largest heal, if any.
    pub fn best_healing_item(&self) -> Option<usize> {
        self.inventory
            .iter()
            .enumerate()
            .filter(|(_, item)| item.is_consumable())
            .filter_map(|(i, item)| item.heal_amount().map(|heal| (i, heal)))
            .max_by_key(|&(i, heal)| (heal, std::cmp::Reverse(i)))
            .map(|(i, _)| i)
    }

    pub(crate) fn clamp_health(&mut self) {
        self.current_health = self.current_health.min(self.max_health());
    }
}
