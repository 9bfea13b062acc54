//! Main simulation runner.
//!
//! Every run drives a fresh character through the public engine API only,
//! so simulated results follow the same rules as real play.

use super::config::SimConfig;
use super::policy::{choose_action, equip_upgrades, healing_items, next_step};
use super::report::{RunStats, SimReport};
use crate::catalog::CatalogProvider;
use crate::character::Character;
use crate::combat::{CombatOutcome, TurnEvent};
use crate::core::constants::MIN_TIER;
use crate::core::error::{EngineError, Result};
use crate::dungeon::{Direction, Dungeon, DungeonGenerator, Room};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

/// How a single dungeon ended for the simulated character
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DungeonEnd {
    Completed { next_tier: u8 },
    Died,
    Stalled,
}

/// Run the full simulation and return a report.
pub fn run_simulation(config: &SimConfig, catalog: &dyn CatalogProvider) -> Result<SimReport> {
    config.engine.validate()?;
    let mut all_runs = Vec::with_capacity(config.num_runs as usize);

    for run_idx in 0..config.num_runs {
        let mut rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed.wrapping_add(run_idx as u64)),
            None => ChaCha8Rng::from_entropy(),
        };

        let stats = simulate_single_run(config, catalog, &mut rng)?;
        info!(
            run = run_idx + 1,
            tier = stats.final_tier,
            dungeons = stats.dungeons_completed,
            enemies = stats.enemies_defeated,
            died = stats.died,
            "run finished"
        );
        all_runs.push(stats);
    }

    Ok(SimReport::from_runs(all_runs))
}

/// Plays one character from tier 1 until death, a stall or the dungeon budget.
pub fn simulate_single_run(
    config: &SimConfig,
    catalog: &dyn CatalogProvider,
    rng: &mut ChaCha8Rng,
) -> Result<RunStats> {
    let generator = DungeonGenerator::new(catalog, &config.engine);
    let mut hero = Character::new("Simulant", 20, catalog)?;
    let mut stats = RunStats::default();
    let mut tier = MIN_TIER;

    for _ in 0..config.max_dungeons {
        let mut dungeon = generator.generate(tier, rng.gen::<u64>())?;
        match play_dungeon(&mut dungeon, &mut hero, catalog, config, rng, &mut stats)? {
            DungeonEnd::Completed { next_tier } => {
                stats.dungeons_completed += 1;
                tier = next_tier;
            }
            DungeonEnd::Died => {
                stats.died = true;
                break;
            }
            DungeonEnd::Stalled => {
                stats.stalled = true;
                break;
            }
        }
    }

    stats.final_tier = hero.tier();
    stats.final_xp = hero.xp;
    stats.final_money = hero.money;
    Ok(stats)
}

fn play_dungeon(
    dungeon: &mut Dungeon,
    hero: &mut Character,
    catalog: &dyn CatalogProvider,
    config: &SimConfig,
    rng: &mut ChaCha8Rng,
    stats: &mut RunStats,
) -> Result<DungeonEnd> {
    for _ in 0..config.max_actions_per_dungeon {
        if dungeon.current_room().is_some_and(Room::has_living_enemies) {
            let outcome = fight(dungeon, hero, catalog, config, rng, stats)?;
            if matches!(outcome, CombatOutcome::Defeat) {
                return Ok(DungeonEnd::Died);
            }
            continue;
        }

        let (treasure, item, merchant) = dungeon
            .current_room()
            .map(|room| {
                (
                    room.has_unlooted_treasure(),
                    room.item_drop.is_some(),
                    room.has_merchant && !room.merchant_visited,
                )
            })
            .unwrap_or_default();
        if treasure {
            dungeon.loot_treasure(hero)?;
            stats.treasure_looted += 1;
        }
        if item {
            dungeon.pick_up_item(hero)?;
            stats.items_picked_up += 1;
        }
        if merchant {
            shop(dungeon, hero, config, stats)?;
        }
        stats.upgrades_equipped += equip_upgrades(hero) as u64;

        if dungeon.is_complete() {
            let reward = dungeon.complete_dungeon(hero, catalog, &config.engine)?;
            return Ok(DungeonEnd::Completed {
                next_tier: reward.next_tier,
            });
        }

        let Some(next) = next_step(dungeon) else {
            return Ok(DungeonEnd::Stalled);
        };
        let direction = Direction::between(dungeon.player_pos, next).ok_or_else(|| {
            EngineError::invalid_action(format!("{next} is not adjacent to the player"))
        })?;
        dungeon.move_player(direction)?;
    }

    debug!(tier = dungeon.tier, "dungeon action budget exhausted");
    Ok(DungeonEnd::Stalled)
}

fn fight(
    dungeon: &mut Dungeon,
    hero: &mut Character,
    catalog: &dyn CatalogProvider,
    config: &SimConfig,
    rng: &mut ChaCha8Rng,
    stats: &mut RunStats,
) -> Result<CombatOutcome> {
    let mut encounter = dungeon.start_encounter()?;
    let alive_at_start = encounter.living_enemies().count() as u64;
    while !encounter.state.is_finished() {
        let action = choose_action(hero, &encounter, config);
        let result = encounter.take_action(hero, action, &config.engine, rng)?;
        stats.potions_used += result
            .events
            .iter()
            .filter(|event| matches!(event, TurnEvent::ItemUsed { .. }))
            .count() as u64;
    }
    stats.combat_turns += encounter.turns as u64;

    let outcome = dungeon.resolve_encounter(&encounter, hero, catalog, &config.engine, rng)?;
    // Bodies from an earlier fled fight are already counted
    let slain = alive_at_start - encounter.living_enemies().count() as u64;
    match &outcome {
        CombatOutcome::Victory { .. } => {
            stats.fights_won += 1;
            stats.enemies_defeated += slain;
        }
        CombatOutcome::Fled { .. } => {
            stats.fights_fled += 1;
            stats.enemies_defeated += slain;
        }
        CombatOutcome::Defeat => {}
    }
    Ok(outcome)
}

/// Tops up healing items from the cheapest healing listings.
fn shop(
    dungeon: &mut Dungeon,
    hero: &mut Character,
    config: &SimConfig,
    stats: &mut RunStats,
) -> Result<()> {
    let merchant = dungeon.visit_merchant()?;
    let mut potions: Vec<(u64, String)> = merchant
        .listings
        .iter()
        .filter(|listing| listing.item.is_consumable() && listing.item.heal_amount().is_some())
        .map(|listing| (listing.price, listing.item.key.clone()))
        .collect();
    potions.sort();

    for (_, key) in potions {
        while healing_items(hero) < config.potion_reserve {
            match merchant.buy_item(hero, &key) {
                Ok(_) => stats.items_bought += 1,
                Err(EngineError::OutOfStock { .. } | EngineError::InsufficientFunds { .. }) => break,
                Err(err) => return Err(err),
            }
        }
    }
    Ok(())
}
