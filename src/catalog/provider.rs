//! Read-only catalog lookups.
//!
//! The engine never reaches for global content. Everything that needs item,
//! enemy or tier definitions takes a `&dyn CatalogProvider`, so tests can hand
//! in small fixture catalogs.

use super::types::{EnemyDef, ItemDef, TierDef};
use crate::core::error::{CatalogKind, EngineError, Result};
use crate::items::Rarity;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub trait CatalogProvider {
    fn get_item(&self, key: &str) -> Result<&ItemDef>;
    fn get_enemy(&self, key: &str) -> Result<&EnemyDef>;
    fn get_tier(&self, tier: u8) -> Result<&TierDef>;

    /// All items in key order
    fn items(&self) -> Vec<&ItemDef>;

    /// All enemies in key order
    fn enemies(&self) -> Vec<&EnemyDef>;

    fn items_up_to_tier(&self, max_tier: u8) -> Vec<&ItemDef> {
        self.items()
            .into_iter()
            .filter(|item| item.tier <= max_tier)
            .collect()
    }

    fn enemies_up_to_tier(&self, max_tier: u8) -> Vec<&EnemyDef> {
        self.enemies()
            .into_iter()
            .filter(|enemy| enemy.tier <= max_tier)
            .collect()
    }

    fn items_of_rarity(&self, rarity: Rarity) -> Vec<&ItemDef> {
        self.items()
            .into_iter()
            .filter(|item| item.rarity == rarity)
            .collect()
    }
}

/// In-memory catalog backed by ordered maps.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StaticCatalog {
    items: BTreeMap<String, ItemDef>,
    enemies: BTreeMap<String, EnemyDef>,
    tiers: BTreeMap<u8, TierDef>,
}

/// JSON shape accepted by [`StaticCatalog::from_json`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogData {
    pub items: Vec<ItemDef>,
    pub enemies: Vec<EnemyDef>,
    pub tiers: Vec<TierDef>,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_item(mut self, item: ItemDef) -> Self {
        self.items.insert(item.key.clone(), item);
        self
    }

    pub fn with_enemy(mut self, enemy: EnemyDef) -> Self {
        self.enemies.insert(enemy.key.clone(), enemy);
        self
    }

    pub fn with_tier(mut self, tier: TierDef) -> Self {
        self.tiers.insert(tier.tier, tier);
        self
    }

    pub fn from_data(data: CatalogData) -> Self {
        let catalog = data.items.into_iter().fold(Self::new(), Self::with_item);
        let catalog = data.enemies.into_iter().fold(catalog, Self::with_enemy);
        data.tiers.into_iter().fold(catalog, Self::with_tier)
    }

    /// Parses and validates a JSON catalog.
    pub fn from_json(json: &str) -> Result<Self> {
        let data: CatalogData = serde_json::from_str(json)?;
        let catalog = Self::from_data(data);
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn to_data(&self) -> CatalogData {
        CatalogData {
            items: self.items.values().cloned().collect(),
            enemies: self.enemies.values().cloned().collect(),
            tiers: self.tiers.values().cloned().collect(),
        }
    }

    /// Checks that every key referenced by an enemy or tier resolves and that
    /// every tier with enemies can spawn one.
    pub fn validate(&self) -> Result<()> {
        for enemy in self.enemies.values() {
            for entry in enemy.common_drops.iter().chain(&enemy.rare_drops) {
                if !self.items.contains_key(&entry.item) {
                    return Err(EngineError::Config(format!(
                        "enemy {} drops unknown item {}",
                        enemy.key, entry.item
                    )));
                }
            }
            if enemy.min_copper > enemy.max_copper {
                return Err(EngineError::Config(format!(
                    "enemy {} has inverted copper range",
                    enemy.key
                )));
            }
        }
        for tier in self.tiers.values() {
            for key in tier.starting_weapon.iter().chain(&tier.starting_armor) {
                if !self.items.contains_key(key) {
                    return Err(EngineError::Config(format!(
                        "tier {} starts with unknown item {}",
                        tier.tier, key
                    )));
                }
            }
            let pool = self.enemies_up_to_tier(tier.tier);
            if !pool.is_empty() && pool.iter().all(|enemy| enemy.spawn_weight == 0) {
                return Err(EngineError::Config(format!(
                    "tier {} has enemies but no positive spawn weight",
                    tier.tier
                )));
            }
        }
        Ok(())
    }
}

impl CatalogProvider for StaticCatalog {
    fn get_item(&self, key: &str) -> Result<&ItemDef> {
        self.items
            .get(key)
            .ok_or_else(|| EngineError::not_found(CatalogKind::Item, key))
    }

    fn get_enemy(&self, key: &str) -> Result<&EnemyDef> {
        self.enemies
            .get(key)
            .ok_or_else(|| EngineError::not_found(CatalogKind::Enemy, key))
    }

    fn get_tier(&self, tier: u8) -> Result<&TierDef> {
        self.tiers
            .get(&tier)
            .ok_or_else(|| EngineError::not_found(CatalogKind::Tier, tier.to_string()))
    }

    fn items(&self) -> Vec<&ItemDef> {
        self.items.values().collect()
    }

    fn enemies(&self) -> Vec<&EnemyDef> {
        self.enemies.values().collect()
    }
}
