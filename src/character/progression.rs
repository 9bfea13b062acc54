//! XP accumulation and tier promotion.

use super::types::{BaseStats, Character};
use crate::catalog::{CatalogProvider, TierDef};
use crate::core::config::EngineConfig;
use crate::core::constants::MAX_TIER;
use crate::core::error::Result;
use crate::items::Item;
use serde::{Deserialize, Serialize};
use tracing::info;

/// A tier change produced by [`Character::add_xp`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Promotion {
    pub from_tier: u8,
    pub to_tier: u8,
    pub title: String,
    /// Starting gear handed out when the regrant policy is on
    pub granted_items: Vec<Item>,
}

impl Character {
    /// Adds xp and promotes through every tier whose threshold is crossed.
    ///
    /// All catalog lookups happen before any state changes, so a catalog miss
    /// leaves the character untouched.
    pub fn add_xp(
        &mut self,
        amount: u64,
        catalog: &dyn CatalogProvider,
        config: &EngineConfig,
    ) -> Result<Option<Promotion>> {
        let new_xp = self.xp.saturating_add(amount);

        let mut target: Option<&TierDef> = None;
        let mut next_tier = self.tier;
        while next_tier < MAX_TIER {
            let def = catalog.get_tier(next_tier + 1)?;
            if new_xp < def.min_xp {
                break;
            }
            next_tier = def.tier;
            target = Some(def);
        }

        let granted_items = match target {
            Some(def) if config.regrant_gear_on_promotion => def
                .starting_weapon
                .iter()
                .chain(&def.starting_armor)
                .map(|key| catalog.get_item(key).cloned())
                .collect::<Result<Vec<_>>>()?,
            _ => Vec::new(),
        };

        self.xp = new_xp;
        let Some(def) = target else {
            return Ok(None);
        };

        let from_tier = self.tier;
        self.promote_to(def);
        self.inventory.extend(granted_items.iter().cloned());

        info!(
            name = %self.name,
            from_tier,
            to_tier = def.tier,
            title = %def.title,
            "character promoted"
        );

        Ok(Some(Promotion {
            from_tier,
            to_tier: def.tier,
            title: def.title.clone(),
            granted_items,
        }))
    }

    /// Replaces base stats with the tier's, keeping the same health fraction.
    fn promote_to(&mut self, def: &TierDef) {
        let fraction = self.health_fraction();
        self.tier = def.tier;
        self.base = BaseStats::from_tier(def);
        if def.special_ability.is_some() {
            self.special_ability = def.special_ability.clone();
        }
        let max = self.max_health();
        self.current_health = ((fraction * max as f64).round() as u32).min(max);
    }

    /// XP still needed for the next tier, or None at the cap.
    pub fn xp_to_next_tier(&self, catalog: &dyn CatalogProvider) -> Result<Option<u64>> {
        if self.tier >= MAX_TIER {
            return Ok(None);
        }
        let next = catalog.get_tier(self.tier + 1)?;
        Ok(Some(next.min_xp.saturating_sub(self.xp)))
    }
}
