//! Victory rewards: xp, copper and drop-table rolls.

use super::types::{Enemy, Rewards};
use crate::catalog::{CatalogProvider, DropEntry};
use crate::character::Character;
use crate::core::config::EngineConfig;
use crate::core::error::Result;
use crate::core::rng::RandomSource;
use crate::items::{Item, Rarity};
use tracing::{debug, info};

/// Copper dropped by one enemy: uniform in its range, sometimes multiplied.
pub fn roll_copper<R: RandomSource>(enemy: &Enemy, config: &EngineConfig, rng: &mut R) -> u64 {
    let base = rng.range_inclusive(enemy.min_copper, enemy.max_copper) as u64;
    if rng.chance(config.bonus_copper_chance) {
        let (low, high) = config.bonus_copper_multiplier;
        (base as f64 * rng.uniform(low, high)).round() as u64
    } else {
        base
    }
}

/// Picks one key from a drop table by weight.
fn pick_drop<'a, R: RandomSource>(table: &'a [DropEntry], rng: &mut R) -> Option<&'a str> {
    let weights: Vec<f64> = table.iter().map(|entry| entry.weight as f64).collect();
    rng.weighted_index(&weights)
        .map(|index| table[index].item.as_str())
}

/// Rolls the common, rare and legendary drops of one enemy.
pub fn roll_drops<R: RandomSource>(
    enemy: &Enemy,
    catalog: &dyn CatalogProvider,
    config: &EngineConfig,
    rng: &mut R,
) -> Result<Vec<Item>> {
    let mut drops = Vec::new();

    for (table, chance) in [
        (&enemy.common_drops, config.common_drop_chance),
        (&enemy.rare_drops, config.rare_drop_chance),
    ] {
        if rng.chance(chance) {
            if let Some(key) = pick_drop(table, rng) {
                drops.push(catalog.get_item(key)?.clone());
            }
        }
    }

    if rng.chance(config.legendary_drop_chance) {
        let legendaries = catalog.items_of_rarity(Rarity::Legendary);
        if !legendaries.is_empty() {
            drops.push(legendaries[rng.index(legendaries.len())].clone());
        }
    }

    Ok(drops)
}

/// Applies the rewards for every defeated enemy to the character.
///
/// Drops are resolved and the promotion check runs before money and items are
/// handed out, so a catalog miss leaves the character as it was.
pub fn distribute_rewards<R: RandomSource>(
    character: &mut Character,
    defeated: &[Enemy],
    catalog: &dyn CatalogProvider,
    config: &EngineConfig,
    rng: &mut R,
) -> Result<Rewards> {
    let mut rewards = Rewards::default();
    for enemy in defeated {
        rewards.xp += enemy.xp_value;
        rewards.copper += roll_copper(enemy, config, rng);
        rewards.items.extend(roll_drops(enemy, catalog, config, rng)?);
    }

    rewards.promotion = character.add_xp(rewards.xp, catalog, config)?;
    character.money += rewards.copper;
    character.inventory.extend(rewards.items.iter().cloned());

    for item in &rewards.items {
        debug!(item = %item.name, rarity = item.rarity.name(), "item dropped");
    }
    info!(
        enemies = defeated.len(),
        xp = rewards.xp,
        copper = rewards.copper,
        items = rewards.items.len(),
        "rewards distributed"
    );

    Ok(rewards)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{default_catalog, CatalogProvider, StaticCatalog};
    use crate::core::error::EngineError;
    use crate::core::rng::ScriptedRolls;

    fn goblin() -> Enemy {
        Enemy::from_def(default_catalog().get_enemy("goblin_scout").unwrap())
    }

    fn no_luck_config() -> EngineConfig {
        EngineConfig {
            bonus_copper_chance: 0.0,
            common_drop_chance: 0.0,
            rare_drop_chance: 0.0,
            legendary_drop_chance: 0.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_copper_stays_in_enemy_range_without_bonus() {
        let config = no_luck_config();
        let enemy = goblin();
        let mut rng = ScriptedRolls::new(3);
        for _ in 0..200 {
            let copper = roll_copper(&enemy, &config, &mut rng);
            assert!((enemy.min_copper as u64..=enemy.max_copper as u64).contains(&copper));
        }
    }

    #[test]
    fn test_bonus_copper_multiplies() {
        let config = EngineConfig::default();
        let enemy = goblin();
        // Base 10, bonus roll hits, multiplier draw 0.5 -> 1.5 + 1.5 * 0.5 = 2.25
        let mut rng = ScriptedRolls::new(0)
            .with_ranges([10])
            .with_units([0.0, 0.5]);
        assert_eq!(roll_copper(&enemy, &config, &mut rng), 23);
    }

    #[test]
    fn test_forced_common_drop() {
        let catalog = default_catalog();
        let config = EngineConfig::default();
        let enemy = goblin();
        // common hit, pick first entry, rare miss, legendary miss
        let mut rng = ScriptedRolls::new(0).with_units([0.0, 0.0, 0.99, 0.99]);
        let drops = roll_drops(&enemy, &catalog, &config, &mut rng).unwrap();
        assert_eq!(drops.len(), 1);
        assert_eq!(drops[0].key, "lesser_health_potion");
    }

    #[test]
    fn test_distribute_rewards_sums_xp_and_applies() {
        let catalog = default_catalog();
        let config = no_luck_config();
        let mut character = Character::new("Ayla", 19, &catalog).unwrap();
        let money_before = character.money;
        let defeated = vec![goblin(), goblin()];
        let mut rng = ScriptedRolls::new(0).with_ranges([4, 6]);

        let rewards =
            distribute_rewards(&mut character, &defeated, &catalog, &config, &mut rng).unwrap();

        assert_eq!(rewards.xp, 30);
        assert_eq!(rewards.copper, 10);
        assert!(rewards.items.is_empty());
        assert!(rewards.promotion.is_none());
        assert_eq!(character.xp, 30);
        assert_eq!(character.money, money_before + 10);
    }

    #[test]
    fn test_rewards_trigger_promotion() {
        let catalog = default_catalog();
        let config = no_luck_config();
        let mut character = Character::new("Ayla", 19, &catalog).unwrap();
        character.xp = 95;
        let mut rng = ScriptedRolls::new(0);

        let rewards =
            distribute_rewards(&mut character, &[goblin()], &catalog, &config, &mut rng).unwrap();
        assert_eq!(rewards.promotion.map(|p| p.to_tier), Some(2));
        assert_eq!(character.tier(), 2);
    }

    #[test]
    fn test_unknown_drop_key_propagates_not_found() {
        let full = default_catalog();
        let catalog = StaticCatalog::new().with_tier(full.get_tier(1).unwrap().clone());
        let config = EngineConfig {
            common_drop_chance: 1.0,
            ..no_luck_config()
        };
        let mut character = Character::from_tier("Ayla", 19, full.get_tier(1).unwrap());
        let before = character.clone();
        let mut rng = ScriptedRolls::new(0);

        let err = distribute_rewards(&mut character, &[goblin()], &catalog, &config, &mut rng)
            .unwrap_err();
        assert!(matches!(err, EngineError::NotFound { .. }));
        assert_eq!(character, before);
    }
}
