use super::types::{BaseStats, Character};
use crate::core::rng::RandomSource;
use crate::items::Equipment;
use serde::{Deserialize, Serialize};

/// Combat stats of a character with its current gear
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedStats {
    /// Lowest possible total attack (weapon rolls its minimum)
    pub min_attack: u32,
    /// Highest possible total attack (weapon rolls its maximum)
    pub max_attack: u32,
    pub defense: u32,
    pub max_health: u32,
}

impl DerivedStats {
    /// Calculates derived stats from tier base stats and equipment bonuses.
    ///
    /// Empty slots contribute nothing.
    pub fn calculate_derived_stats(base: &BaseStats, equipment: &Equipment) -> Self {
        let (weapon_min, weapon_max) = weapon_range(equipment);
        let flat_attack = base.attack.saturating_add(base.attack_bonus);

        Self {
            min_attack: flat_attack.saturating_add(weapon_min),
            max_attack: flat_attack.saturating_add(weapon_max),
            defense: base.defense.saturating_add(equipment.defense_bonus()),
            max_health: base.health.saturating_add(equipment.health_bonus()),
        }
    }
}

fn weapon_range(equipment: &Equipment) -> (u32, u32) {
    equipment
        .weapon
        .as_ref()
        .and_then(|weapon| weapon.damage_range())
        .unwrap_or((0, 0))
}

impl Character {
    pub fn derived_stats(&self) -> DerivedStats {
        DerivedStats::calculate_derived_stats(&self.base, &self.equipment)
    }

    /// Tier attack + a fresh weapon damage roll + tier bonus.
    pub fn total_attack(&self, rng: &mut impl RandomSource) -> u32 {
        let (min, max) = weapon_range(&self.equipment);
        let weapon_roll = if max > 0 {
            rng.range_inclusive(min, max)
        } else {
            0
        };
        self.base
            .attack
            .saturating_add(weapon_roll)
            .saturating_add(self.base.attack_bonus)
    }

    /// Tier defense + armor + shield.
    pub fn total_defense(&self) -> u32 {
        self.base.defense.saturating_add(self.equipment.defense_bonus())
    }

    pub fn max_health(&self) -> u32 {
        self.base.health.saturating_add(self.equipment.health_bonus())
    }

    pub fn health_fraction(&self) -> f64 {
        let max = self.max_health();
        if max == 0 {
            return 0.0;
        }
        self.current_health as f64 / max as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{default_catalog, CatalogProvider};
    use crate::core::rng::ScriptedRolls;

    #[test]
    fn test_unarmed_attack_is_base_plus_bonus() {
        let catalog = default_catalog();
        let character = Character::from_tier("Bare", 20, catalog.get_tier(3).unwrap());
        let mut rng = ScriptedRolls::new(0);
        // Tier 3: attack 7, bonus 1, no weapon
        assert_eq!(character.total_attack(&mut rng), 8);
        assert_eq!(character.total_defense(), 6);
        assert_eq!(character.max_health(), 50);
    }

    #[test]
    fn test_weapon_roll_is_fresh_per_swing() {
        let character = Character::new("Ayla", 19, &default_catalog()).unwrap();
        // Rusty dagger rolls 1-3
        let mut rng = ScriptedRolls::new(0).with_ranges([1, 3, 2]);
        assert_eq!(character.total_attack(&mut rng), 4);
        assert_eq!(character.total_attack(&mut rng), 6);
        assert_eq!(character.total_attack(&mut rng), 5);
    }

    #[test]
    fn test_derived_stats_bounds_contain_rolls() {
        let character = Character::new("Ayla", 19, &default_catalog()).unwrap();
        let stats = character.derived_stats();
        assert_eq!((stats.min_attack, stats.max_attack), (4, 6));
        assert_eq!(stats.defense, 4);
        assert_eq!(stats.max_health, 25);

        let mut rng = ScriptedRolls::new(11);
        for _ in 0..200 {
            let attack = character.total_attack(&mut rng);
            assert!((stats.min_attack..=stats.max_attack).contains(&attack));
        }
    }
}
