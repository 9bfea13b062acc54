//! Dungeon procedural generation.
//!
//! Layout is a randomized depth-first maze over the full grid with a few extra
//! corridors, so every room is reachable by construction. Connectivity, the
//! exit distance and merchant placement are still verified before a dungeon is
//! handed out; a rejected attempt is retried with the next seed.

use super::types::{grid_side_for_tier, Direction, Dungeon, Position, TreasureLoot};
use crate::catalog::{CatalogProvider, EnemyDef};
use crate::combat::Enemy;
use crate::core::config::EngineConfig;
use crate::core::constants::{
    MAX_TIER, TREASURE_COPPER_PER_TIER, TREASURE_MIN_ITEMS, TREASURE_RARITY_WEIGHTS,
    TREASURE_TIER_REACH,
};
use crate::core::error::{EngineError, Result};
use crate::core::rng::RandomSource;
use crate::items::{Item, Rarity};
use crate::merchant::Merchant;
use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::VecDeque;
use tracing::{debug, info, warn};

/// Why a single generation attempt produced no dungeon
#[derive(Debug)]
enum AttemptError {
    /// A layout postcondition failed; another seed may pass
    Rejected(String),
    /// Broken content that no reseed can fix
    Fatal(EngineError),
}

impl From<EngineError> for AttemptError {
    fn from(err: EngineError) -> Self {
        Self::Fatal(err)
    }
}

type Attempt<T> = std::result::Result<T, AttemptError>;

/// Builds dungeons from catalog content.
pub struct DungeonGenerator<'a> {
    catalog: &'a dyn CatalogProvider,
    config: &'a EngineConfig,
}

impl<'a> DungeonGenerator<'a> {
    pub fn new(catalog: &'a dyn CatalogProvider, config: &'a EngineConfig) -> Self {
        Self { catalog, config }
    }

    /// Generates a fully connected dungeon for `tier`.
    ///
    /// Attempt `n` uses seed `seed + n`; the seed that succeeded is stored on
    /// the dungeon. Fails with `Generation` once every attempt was rejected.
    pub fn generate(&self, tier: u8, seed: u64) -> Result<Dungeon> {
        self.catalog.get_tier(tier)?;
        let enemy_pool = self.catalog.enemies_up_to_tier(tier);
        if enemy_pool.is_empty() {
            return Err(EngineError::Generation {
                tier,
                attempts: 0,
                reason: "no enemies available for tier".to_string(),
            });
        }

        self.generate_with(tier, seed, |rng, attempt_seed| {
            let mut dungeon = self.build_layout(tier, attempt_seed, rng)?;
            self.populate(&mut dungeon, &enemy_pool, rng)?;
            dungeon.merchant = Merchant::generate(tier, self.catalog, self.config, rng);
            Ok(dungeon)
        })
    }

    /// Runs `attempt` on seeds `seed`, `seed + 1`, ... until one is accepted
    /// or the configured attempts are used up.
    fn generate_with<F>(&self, tier: u8, seed: u64, mut attempt: F) -> Result<Dungeon>
    where
        F: FnMut(&mut ChaCha8Rng, u64) -> Attempt<Dungeon>,
    {
        let attempts = self.config.max_generation_attempts;
        let mut last_reason = String::new();
        for n in 0..attempts {
            let attempt_seed = seed.wrapping_add(n as u64);
            let mut rng = ChaCha8Rng::seed_from_u64(attempt_seed);

            match attempt(&mut rng, attempt_seed) {
                Ok(dungeon) => {
                    info!(
                        tier,
                        size = dungeon.rows,
                        seed = attempt_seed,
                        attempts = n + 1,
                        "dungeon generated"
                    );
                    return Ok(dungeon);
                }
                Err(AttemptError::Rejected(reason)) => {
                    warn!(tier, seed = attempt_seed, %reason, "dungeon attempt rejected");
                    last_reason = reason;
                }
                Err(AttemptError::Fatal(err)) => return Err(err),
            }
        }

        Err(EngineError::Generation {
            tier,
            attempts,
            reason: last_reason,
        })
    }

    /// Carves the maze, adds extra corridors and picks the end room.
    fn build_layout(&self, tier: u8, seed: u64, rng: &mut ChaCha8Rng) -> Attempt<Dungeon> {
        let side = grid_side_for_tier(tier);
        let mut dungeon = Dungeon::new(tier, side, side, seed);
        dungeon.view_range = self.config.view_range;
        dungeon.required_exploration = self.config.required_exploration;

        generate_maze(&mut dungeon, rng);
        add_extra_connections(&mut dungeon, self.config.extra_connection_chance, rng);

        let distances = distances_from(&dungeon, dungeon.start_pos);
        if distances.iter().any(Option::is_none) {
            return Err(AttemptError::Rejected(
                "not every room is reachable from the start".to_string(),
            ));
        }

        let (end, exit_distance) = farthest_room(&dungeon, &distances).ok_or_else(|| {
            AttemptError::Rejected("no room distinct from the start".to_string())
        })?;
        let diameter = dungeon.rows + dungeon.cols - 2;
        let required = self.config.min_exit_distance.min(diameter);
        if exit_distance < required {
            return Err(AttemptError::Rejected(format!(
                "end room only {exit_distance} doors from start, need {required}"
            )));
        }

        dungeon.end_pos = end;
        if let Some(room) = dungeon.room_mut(end) {
            room.is_end_room = true;
        }

        debug!(tier, side, exit_distance, "layout carved");
        Ok(dungeon)
    }

    /// Places enemies, treasure, the merchant and loose items.
    fn populate(
        &self,
        dungeon: &mut Dungeon,
        enemy_pool: &[&EnemyDef],
        rng: &mut ChaCha8Rng,
    ) -> Attempt<()> {
        let tier = dungeon.tier;
        let start = dungeon.start_pos;
        let end = dungeon.end_pos;
        let max_group = 1 + tier as u32 / 3;
        let spawn_weights = spawn_weights(enemy_pool)?;

        // Enemies: the end room is always guarded
        for pos in dungeon.positions().collect::<Vec<_>>() {
            if pos == start {
                continue;
            }
            if pos == end || rng.chance(self.config.enemy_spawn_chance) {
                let count = rng.range_inclusive(1, max_group);
                let group: Vec<Enemy> = (0..count)
                    .map(|_| Enemy::from_def(enemy_pool[spawn_weights.sample(rng)]))
                    .collect();
                if let Some(room) = dungeon.room_mut(pos) {
                    room.enemies = group;
                }
            }
        }

        // Treasure
        let mut quiet = quiet_rooms(dungeon);
        quiet.shuffle(rng);
        let treasure_count = (rng.range_inclusive(1, tier as u32) as usize).min(quiet.len());
        for &pos in &quiet[..treasure_count] {
            let loot = self.roll_treasure(tier, rng);
            if let Some(room) = dungeon.room_mut(pos) {
                room.has_treasure = true;
                room.treasure = Some(loot);
            }
        }

        // Merchant: exactly one, emptying an enemy room if nothing is free
        let free: Vec<Position> = quiet[treasure_count..].to_vec();
        let merchant_pos = match free.choose(rng) {
            Some(&pos) => pos,
            None => {
                let fallback: Vec<Position> = dungeon
                    .positions()
                    .filter(|&p| p != start && p != end)
                    .filter(|&p| dungeon.room(p).is_some_and(|r| !r.has_treasure))
                    .collect();
                *fallback.choose(rng).ok_or_else(|| {
                    AttemptError::Rejected("no room available for the merchant".to_string())
                })?
            }
        };
        if let Some(room) = dungeon.room_mut(merchant_pos) {
            room.enemies.clear();
            room.has_merchant = true;
        }
        dungeon.merchant_pos = Some(merchant_pos);

        // Loose items in a few of the remaining empty rooms
        let loose_pool: Vec<&Item> = self
            .catalog
            .items_up_to_tier(tier)
            .into_iter()
            .filter(|item| item.rarity == Rarity::Common)
            .collect();
        for pos in free.into_iter().filter(|&p| p != merchant_pos) {
            if !rng.chance(self.config.loose_item_chance) {
                continue;
            }
            if let (Some(&item), Some(room)) = (loose_pool.choose(rng), dungeon.room_mut(pos)) {
                room.item_drop = Some(item.clone());
            }
        }

        Ok(())
    }

    /// Copper plus a handful of distinct items weighted by rarity.
    fn roll_treasure(&self, tier: u8, rng: &mut ChaCha8Rng) -> TreasureLoot {
        let base = TREASURE_COPPER_PER_TIER * tier as u64;
        let copper = base + rng.range_inclusive(0, base as u32) as u64;

        let max_tier = tier.saturating_add(TREASURE_TIER_REACH).min(MAX_TIER);
        let pool = self.catalog.items_up_to_tier(max_tier);
        let wanted = rng.range_inclusive(TREASURE_MIN_ITEMS as u32, 3 + tier as u32) as usize;

        // Rarity weights are fixed and positive, so only an empty pool yields nothing
        let items: Vec<Item> = pool
            .choose_multiple_weighted(rng, wanted, |item| rarity_weight(item.rarity))
            .map(|chosen| chosen.map(|&item| item.clone()).collect())
            .unwrap_or_default();

        TreasureLoot { copper, items }
    }
}

/// Enemy-free rooms other than the start and end room.
fn quiet_rooms(dungeon: &Dungeon) -> Vec<Position> {
    dungeon
        .positions()
        .filter(|&p| p != dungeon.start_pos && p != dungeon.end_pos)
        .filter(|&p| dungeon.room(p).is_some_and(|r| r.enemies.is_empty()))
        .collect()
}

fn rarity_weight(rarity: Rarity) -> f64 {
    let (common, rare, legendary) = TREASURE_RARITY_WEIGHTS;
    match rarity {
        Rarity::Common => common,
        Rarity::Rare => rare,
        Rarity::Legendary => legendary,
    }
}

/// Spawn distribution over the tier's enemy pool.
fn spawn_weights(pool: &[&EnemyDef]) -> Result<WeightedIndex<u32>> {
    WeightedIndex::new(pool.iter().map(|def| def.spawn_weight)).map_err(|err| {
        EngineError::Config(format!("enemy spawn weights cannot be sampled: {err}"))
    })
}

/// Carves a spanning maze over the whole grid with an iterative
/// depth-first search (recursive backtracker) starting at the start room.
fn generate_maze(dungeon: &mut Dungeon, rng: &mut ChaCha8Rng) {
    let start = dungeon.start_pos;
    let mut visited = vec![false; dungeon.room_count()];
    let mut stack: Vec<Position> = vec![start];
    visited[start.row * dungeon.cols + start.col] = true;

    while let Some(&current) = stack.last() {
        let unvisited: Vec<(Direction, Position)> = Direction::ALL
            .into_iter()
            .filter_map(|dir| dungeon.neighbor(current, dir).map(|next| (dir, next)))
            .filter(|(_, next)| !visited[next.row * dungeon.cols + next.col])
            .collect();

        let Some(&(dir, next)) = unvisited.choose(rng) else {
            // Backtrack
            stack.pop();
            continue;
        };
        dungeon.connect(current, dir);
        visited[next.row * dungeon.cols + next.col] = true;
        stack.push(next);
    }
}

/// Adds extra corridors between adjacent rooms for variety.
fn add_extra_connections(dungeon: &mut Dungeon, chance: f64, rng: &mut ChaCha8Rng) {
    for pos in dungeon.positions().collect::<Vec<_>>() {
        // Right and down only, so each pair is considered once
        for dir in [Direction::East, Direction::South] {
            if dungeon.neighbor(pos, dir).is_none() || dungeon.is_connected(pos, dir) {
                continue;
            }
            if rng.chance(chance) {
                dungeon.connect(pos, dir);
            }
        }
    }
}

/// BFS door distance from `from` to every room (row-major, None = unreachable).
pub fn distances_from(dungeon: &Dungeon, from: Position) -> Vec<Option<usize>> {
    let mut distances = vec![None; dungeon.room_count()];
    if !dungeon.contains(from) {
        return distances;
    }
    let mut queue = VecDeque::new();
    distances[from.row * dungeon.cols + from.col] = Some(0);
    queue.push_back(from);

    while let Some(pos) = queue.pop_front() {
        let distance = distances[pos.row * dungeon.cols + pos.col].unwrap_or(0);
        for next in dungeon.connected_neighbors(pos) {
            let slot = &mut distances[next.row * dungeon.cols + next.col];
            if slot.is_none() {
                *slot = Some(distance + 1);
                queue.push_back(next);
            }
        }
    }
    distances
}

/// Reachable room farthest from the start and its distance
/// (first in row-major order on ties).
fn farthest_room(dungeon: &Dungeon, distances: &[Option<usize>]) -> Option<(Position, usize)> {
    dungeon
        .positions()
        .zip(distances)
        .filter_map(|(pos, &distance)| distance.map(|d| (pos, d)))
        .filter(|&(_, d)| d > 0)
        .max_by(|a, b| a.1.cmp(&b.1).then(b.0.cmp(&a.0)))
}
