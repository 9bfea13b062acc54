//! Tunable engine rules.
//!
//! Defaults reproduce the standard ruleset. Any subset of fields can be
//! overridden from JSON; missing fields keep their default.

use super::constants::{DEFAULT_REQUIRED_EXPLORATION, DEFAULT_VIEW_RANGE};
use super::error::{EngineError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Radius (in rooms) revealed around the player after each move
    pub view_range: u32,
    /// Chance for a non-start room to hold enemies
    pub enemy_spawn_chance: f64,
    /// Chance for an empty room to hold a loose item
    pub loose_item_chance: f64,
    /// Chance per adjacent room pair to add a corridor beyond the spanning maze
    pub extra_connection_chance: f64,
    /// Minimum door distance between start and end room
    pub min_exit_distance: usize,
    /// Generation attempts (each with a fresh seed) before giving up
    pub max_generation_attempts: u32,
    /// Fraction of rooms that must be visible to complete a dungeon
    pub required_exploration: f64,

    /// Added to the player's d20 hit roll
    pub player_hit_bonus: u32,
    /// Applied to player damage after defense subtraction
    pub player_damage_multiplier: f64,
    /// Added to the defender's defense to form the hit target
    pub armor_class_base: u32,
    pub flee_dc: u32,
    pub player_flee_bonus: u32,

    pub common_drop_chance: f64,
    pub rare_drop_chance: f64,
    pub legendary_drop_chance: f64,
    pub bonus_copper_chance: f64,
    /// (min, max) multiplier for a bonus copper roll
    pub bonus_copper_multiplier: (f64, f64),

    /// Listed price varies by up to this fraction of base value
    pub merchant_price_variation: f64,
    /// Fraction of base value paid when selling to the merchant
    pub merchant_sell_ratio: f64,

    /// When true, promotion adds the new tier's starting gear to the inventory
    pub regrant_gear_on_promotion: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            view_range: DEFAULT_VIEW_RANGE,
            enemy_spawn_chance: 0.4,
            loose_item_chance: 0.1,
            extra_connection_chance: 0.15,
            min_exit_distance: 5,
            max_generation_attempts: 5,
            required_exploration: DEFAULT_REQUIRED_EXPLORATION,
            player_hit_bonus: 2,
            player_damage_multiplier: 1.2,
            armor_class_base: 0,
            flee_dc: 10,
            player_flee_bonus: 2,
            common_drop_chance: 0.6,
            rare_drop_chance: 0.1,
            legendary_drop_chance: 0.02,
            bonus_copper_chance: 0.2,
            bonus_copper_multiplier: (1.5, 3.0),
            merchant_price_variation: 0.2,
            merchant_sell_ratio: 0.5,
            regrant_gear_on_promotion: false,
        }
    }
}

impl EngineConfig {
    /// Parses a (possibly partial) JSON override of the default rules.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values that would break engine invariants.
    pub fn validate(&self) -> Result<()> {
        let probabilities = [
            ("enemy_spawn_chance", self.enemy_spawn_chance),
            ("loose_item_chance", self.loose_item_chance),
            ("extra_connection_chance", self.extra_connection_chance),
            ("required_exploration", self.required_exploration),
            ("common_drop_chance", self.common_drop_chance),
            ("rare_drop_chance", self.rare_drop_chance),
            ("legendary_drop_chance", self.legendary_drop_chance),
            ("bonus_copper_chance", self.bonus_copper_chance),
        ];
        for (name, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(EngineError::Config(format!(
                    "{name} must be within [0, 1], got {value}"
                )));
            }
        }
        if self.max_generation_attempts == 0 {
            return Err(EngineError::Config(
                "max_generation_attempts must be at least 1".to_string(),
            ));
        }
        if !(0.0..1.0).contains(&self.merchant_price_variation) {
            return Err(EngineError::Config(format!(
                "merchant_price_variation must be within [0, 1), got {}",
                self.merchant_price_variation
            )));
        }
        // Selling must never beat the cheapest possible listing.
        if self.merchant_sell_ratio > 1.0 - self.merchant_price_variation {
            return Err(EngineError::Config(format!(
                "merchant_sell_ratio {} exceeds minimum buy ratio {}",
                self.merchant_sell_ratio,
                1.0 - self.merchant_price_variation
            )));
        }
        if self.player_damage_multiplier < 1.0 {
            return Err(EngineError::Config(
                "player_damage_multiplier must be at least 1.0".to_string(),
            ));
        }
        let (low, high) = self.bonus_copper_multiplier;
        if low < 1.0 || high < low {
            return Err(EngineError::Config(format!(
                "bonus_copper_multiplier must satisfy 1.0 <= min <= max, got ({low}, {high})"
            )));
        }
        Ok(())
    }
}
