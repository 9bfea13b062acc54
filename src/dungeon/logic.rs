//! Dungeon navigation, exploration and room interactions.

use super::generation::distances_from;
use super::types::{Direction, Dungeon, MoveResult, Position, Room, TreasureLoot};
use crate::catalog::CatalogProvider;
use crate::character::{Character, Promotion};
use crate::combat::{distribute_rewards, CombatOutcome, CombatState, Encounter, Enemy};
use crate::core::config::EngineConfig;
use crate::core::constants::{COMPLETION_COPPER_PER_TIER, COMPLETION_XP_PER_TIER, MAX_TIER};
use crate::core::error::{EngineError, MoveBlock, Result};
use crate::core::rng::RandomSource;
use crate::items::Item;
use crate::merchant::Merchant;
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};
use tracing::{debug, info};

/// Bonus granted by [`Dungeon::complete_dungeon`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionReward {
    pub tier: u8,
    pub xp: u64,
    pub copper: u64,
    /// Tier of the dungeon to enter next
    pub next_tier: u8,
    pub promotion: Option<Promotion>,
}

impl Dungeon {
    /// Rooms reachable through an open door of `pos`
    pub fn connected_neighbors(&self, pos: Position) -> Vec<Position> {
        Direction::ALL
            .into_iter()
            .filter(|&dir| self.is_connected(pos, dir))
            .filter_map(|dir| self.neighbor(pos, dir))
            .collect()
    }

    /// Number of rooms reachable from `from`, including itself.
    pub fn reachable_from(&self, from: Position) -> usize {
        distances_from(self, from)
            .iter()
            .filter(|d| d.is_some())
            .count()
    }

    pub fn is_fully_connected(&self) -> bool {
        self.reachable_from(self.start_pos) == self.room_count()
    }

    /// BFS shortest path over open doors, both ends included.
    pub fn path_between(&self, from: Position, to: Position) -> Option<Vec<Position>> {
        if !self.contains(from) || !self.contains(to) {
            return None;
        }
        if from == to {
            return Some(vec![from]);
        }

        let mut visited: HashSet<Position> = HashSet::new();
        let mut queue: VecDeque<(Position, Vec<Position>)> = VecDeque::new();
        visited.insert(from);
        queue.push_back((from, vec![from]));

        while let Some((pos, path)) = queue.pop_front() {
            for next in self.connected_neighbors(pos) {
                if !visited.insert(next) {
                    continue;
                }
                let mut new_path = path.clone();
                new_path.push(next);
                if next == to {
                    return Some(new_path);
                }
                queue.push_back((next, new_path));
            }
        }

        None
    }

    pub fn path_to_end(&self) -> Option<Vec<Position>> {
        self.path_between(self.player_pos, self.end_pos)
    }

    /// Fraction of rooms that have become visible
    pub fn exploration_ratio(&self) -> f64 {
        if self.rooms.is_empty() {
            return 0.0;
        }
        self.visible_count() as f64 / self.room_count() as f64
    }

    /// Reveals every room within `view_range` (euclidean) of `center`.
    /// Returns how many rooms became visible.
    fn reveal_around(&mut self, center: Position) -> usize {
        let range = self.view_range as usize;
        let mut revealed = 0;
        for pos in self.positions().collect::<Vec<_>>() {
            let dr = pos.row.abs_diff(center.row);
            let dc = pos.col.abs_diff(center.col);
            if dr * dr + dc * dc > range * range {
                continue;
            }
            if let Some(room) = self.room_mut(pos) {
                if !room.is_visible {
                    room.is_visible = true;
                    revealed += 1;
                }
            }
        }
        revealed
    }

    /// Moves the player through an open door of the current room.
    ///
    /// A rejected move changes nothing. Entering a room with living enemies
    /// returns [`MoveResult::CombatRequired`]; that room stays uncleared.
    pub fn move_player(&mut self, direction: Direction) -> Result<MoveResult> {
        let from = self.player_pos;
        let blocked = |reason| EngineError::InvalidMove {
            from,
            direction,
            reason,
        };

        let current = self
            .current_room()
            .ok_or_else(|| EngineError::invalid_action(format!("player is off the grid at {from}")))?;
        if current.has_living_enemies() {
            return Err(blocked(MoveBlock::EnemiesPresent));
        }
        let to = self
            .neighbor(from, direction)
            .ok_or_else(|| blocked(MoveBlock::OutOfBounds))?;
        if !current.has_door(direction) {
            return Err(blocked(MoveBlock::NoDoor));
        }

        Ok(self.enter_room(to))
    }

    /// Moves through a random door of the current room, ignoring enemies in
    /// it. Rooms without living enemies are preferred.
    pub fn move_player_random_adjacent<R: RandomSource>(&mut self, rng: &mut R) -> Result<MoveResult> {
        let from = self.player_pos;
        let exits = self.connected_neighbors(from);
        if exits.is_empty() {
            return Err(EngineError::invalid_action(format!("no door out of {from}")));
        }

        let calm: Vec<Position> = exits
            .iter()
            .copied()
            .filter(|&p| !self.room(p).is_some_and(Room::has_living_enemies))
            .collect();
        let pool = if calm.is_empty() { &exits } else { &calm };
        let to = pool[rng.index(pool.len())];

        Ok(self.enter_room(to))
    }

    fn enter_room(&mut self, to: Position) -> MoveResult {
        self.player_pos = to;
        let revealed = self.reveal_around(to);

        let enemies = self.room(to).map_or(0, Room::living_enemies);
        if enemies > 0 {
            debug!(%to, enemies, "entered occupied room");
            return MoveResult::CombatRequired {
                to,
                revealed,
                enemies,
            };
        }

        if let Some(room) = self.room_mut(to) {
            room.is_visited = true;
            room.is_cleared = true;
            room.entered_after_clear = true;
        }
        debug!(%to, revealed, "entered room");
        MoveResult::Moved { to, revealed }
    }

    /// True once enough of the dungeon is visible and the player stands in
    /// the cleared end room, having walked in after it was cleared.
    pub fn is_complete(&self) -> bool {
        let Some(end) = self.room(self.end_pos) else {
            return false;
        };
        self.exploration_ratio() >= self.required_exploration
            && end.is_cleared
            && self.player_pos == self.end_pos
            && end.entered_after_clear
    }

    /// Hands out the pre-rolled treasure of `pos` exactly once.
    pub fn get_treasure_loot(&mut self, pos: Position) -> Result<TreasureLoot> {
        let room = self
            .room_mut(pos)
            .ok_or_else(|| EngineError::invalid_action(format!("no room at {pos}")))?;
        if !room.has_treasure {
            return Err(EngineError::invalid_action(format!("no treasure at {pos}")));
        }
        if room.treasure_looted {
            return Err(EngineError::AlreadyLooted { position: pos });
        }

        room.treasure_looted = true;
        let loot = room.treasure.take().unwrap_or_default();
        info!(%pos, copper = loot.copper, items = loot.items.len(), "treasure looted");
        Ok(loot)
    }

    /// Loots the current room's treasure straight into the character's purse
    /// and inventory.
    pub fn loot_treasure(&mut self, character: &mut Character) -> Result<TreasureLoot> {
        let loot = self.get_treasure_loot(self.player_pos)?;
        character.money += loot.copper;
        character.inventory.extend(loot.items.iter().cloned());
        Ok(loot)
    }

    /// Picks up the loose item of the current room.
    pub fn pick_up_item(&mut self, character: &mut Character) -> Result<Item> {
        let pos = self.player_pos;
        let room = self
            .current_room_mut()
            .ok_or_else(|| EngineError::invalid_action(format!("no room at {pos}")))?;
        if room.has_living_enemies() {
            return Err(EngineError::invalid_action("enemies guard the item"));
        }
        let item = room
            .item_drop
            .take()
            .ok_or_else(|| EngineError::invalid_action(format!("nothing to pick up at {pos}")))?;

        debug!(item = %item.name, %pos, "item picked up");
        character.inventory.push(item.clone());
        Ok(item)
    }

    /// Opens the shop when the player stands in the merchant room.
    pub fn visit_merchant(&mut self) -> Result<&mut Merchant> {
        let pos = self.player_pos;
        let room = self
            .current_room_mut()
            .filter(|room| room.has_merchant)
            .ok_or_else(|| EngineError::invalid_action(format!("no merchant at {pos}")))?;
        room.merchant_visited = true;
        Ok(&mut self.merchant)
    }

    /// Starts a fight against the living enemies of the current room.
    ///
    /// The encounter works on copies; [`Dungeon::resolve_encounter`] writes
    /// the result back.
    pub fn start_encounter(&self) -> Result<Encounter> {
        let room = self
            .current_room()
            .filter(|room| room.has_living_enemies())
            .ok_or_else(|| {
                EngineError::invalid_action(format!("no enemies at {}", self.player_pos))
            })?;
        Ok(Encounter::new(self.player_pos, room.enemies.clone()))
    }

    /// Applies a finished encounter to the dungeon and the character.
    ///
    /// Victory hands out rewards for every enemy slain in the room, including
    /// kills from earlier fights the player fled, and clears the room. A
    /// successful flee moves the player to a random neighbour; the room keeps
    /// the whole group as the fight left it.
    pub fn resolve_encounter<R: RandomSource>(
        &mut self,
        encounter: &Encounter,
        character: &mut Character,
        catalog: &dyn CatalogProvider,
        config: &EngineConfig,
        rng: &mut R,
    ) -> Result<CombatOutcome> {
        let pos = self.player_pos;
        if encounter.position != pos {
            return Err(EngineError::invalid_action(format!(
                "encounter at {} but player is at {pos}",
                encounter.position
            )));
        }
        if !self.current_room().is_some_and(Room::has_living_enemies) {
            return Err(EngineError::invalid_action(format!(
                "no fight to resolve at {pos}"
            )));
        }

        match encounter.state {
            CombatState::Victory => {
                let defeated: Vec<Enemy> = encounter
                    .enemies
                    .iter()
                    .filter(|e| !e.is_alive())
                    .cloned()
                    .collect();
                let rewards = distribute_rewards(character, &defeated, catalog, config, rng)?;
                if let Some(room) = self.current_room_mut() {
                    room.enemies.clear();
                    room.is_cleared = true;
                    room.is_visited = true;
                }
                info!(%pos, turns = encounter.turns, "room cleared");
                Ok(CombatOutcome::Victory { rewards })
            }
            CombatState::Fled => {
                let arrival = self.move_player_random_adjacent(rng)?;
                if let Some(room) = self.room_mut(pos) {
                    room.enemies = encounter.enemies.clone();
                }
                info!(from = %pos, to = %arrival.position(), "fled");
                Ok(CombatOutcome::Fled { arrival })
            }
            CombatState::Defeat => {
                if let Some(room) = self.room_mut(pos) {
                    room.enemies = encounter.enemies.clone();
                }
                info!(%pos, name = %character.name, "character defeated");
                Ok(CombatOutcome::Defeat)
            }
            CombatState::AwaitingAction | CombatState::ResolvingTurn => Err(
                EngineError::invalid_action("encounter is still in progress"),
            ),
        }
    }

    /// Grants the completion bonus once the dungeon is complete.
    pub fn complete_dungeon(
        &mut self,
        character: &mut Character,
        catalog: &dyn CatalogProvider,
        config: &EngineConfig,
    ) -> Result<CompletionReward> {
        if self.completed {
            return Err(EngineError::invalid_action("dungeon already completed"));
        }
        if !self.is_complete() {
            return Err(EngineError::invalid_action(format!(
                "dungeon not complete: {:.0}% explored, end room {}",
                self.exploration_ratio() * 100.0,
                if self.player_pos == self.end_pos {
                    "reached"
                } else {
                    "not reached"
                }
            )));
        }

        let xp = COMPLETION_XP_PER_TIER * self.tier as u64;
        let copper = COMPLETION_COPPER_PER_TIER * self.tier as u64;
        let promotion = character.add_xp(xp, catalog, config)?;
        character.money += copper;
        self.completed = true;

        let next_tier = self.tier.saturating_add(1).min(MAX_TIER);
        info!(tier = self.tier, xp, copper, next_tier, "dungeon completed");

        Ok(CompletionReward {
            tier: self.tier,
            xp,
            copper,
            next_tier,
            promotion,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::default_catalog;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    /// 1 x n corridor with doors between all neighbours, end room at the far
    /// end.
    fn corridor(n: usize) -> Dungeon {
        let mut dungeon = Dungeon::new(1, 1, n, 0);
        for col in 0..n - 1 {
            dungeon.connect(Position::new(0, col), Direction::East);
        }
        dungeon.end_pos = Position::new(0, n - 1);
        dungeon.room_mut(dungeon.end_pos).unwrap().is_end_room = true;
        dungeon.view_range = 1;
        dungeon
    }

    fn rat() -> Enemy {
        let catalog = default_catalog();
        Enemy::from_def(catalog.get_enemy("giant_rat").unwrap())
    }

    #[test]
    fn test_move_through_open_door() {
        let mut dungeon = corridor(4);
        let result = dungeon.move_player(Direction::East).unwrap();
        assert_eq!(result.position(), Position::new(0, 1));
        assert!(!result.needs_combat());
        let room = dungeon.current_room().unwrap();
        assert!(room.is_visited && room.is_cleared && room.entered_after_clear);
    }

    #[test]
    fn test_blocked_moves_change_nothing() {
        let mut dungeon = corridor(4);
        let before = dungeon.clone();

        assert!(matches!(
            dungeon.move_player(Direction::West),
            Err(EngineError::InvalidMove {
                reason: MoveBlock::OutOfBounds,
                ..
            })
        ));
        assert_eq!(dungeon, before);

        let mut grid = Dungeon::new(1, 2, 2, 0);
        let before = grid.clone();
        assert!(matches!(
            grid.move_player(Direction::South),
            Err(EngineError::InvalidMove {
                reason: MoveBlock::NoDoor,
                ..
            })
        ));
        assert_eq!(grid, before);
    }

    #[test]
    fn test_occupied_room_requires_combat() {
        let mut dungeon = corridor(4);
        dungeon.room_mut(Position::new(0, 1)).unwrap().enemies = vec![rat(), rat()];

        let result = dungeon.move_player(Direction::East).unwrap();
        assert_eq!(
            result,
            MoveResult::CombatRequired {
                to: Position::new(0, 1),
                revealed: 2,
                enemies: 2
            }
        );
        let room = dungeon.current_room().unwrap();
        assert!(!room.is_cleared && !room.entered_after_clear);

        assert!(matches!(
            dungeon.move_player(Direction::West),
            Err(EngineError::InvalidMove {
                reason: MoveBlock::EnemiesPresent,
                ..
            })
        ));
    }

    #[test]
    fn test_visibility_is_monotonic_within_range() {
        let mut dungeon = corridor(6);
        dungeon.view_range = 2;
        dungeon.move_player(Direction::East).unwrap();
        let visible: Vec<bool> = dungeon.rooms.iter().map(|r| r.is_visible).collect();
        assert_eq!(visible, vec![true, true, true, true, false, false]);

        dungeon.move_player(Direction::West).unwrap();
        assert_eq!(dungeon.visible_count(), 4);
    }

    fn two_by_five(visible: usize) -> Dungeon {
        let mut dungeon = Dungeon::new(1, 2, 5, 0);
        for (i, room) in dungeon.rooms.iter_mut().enumerate() {
            room.is_visible = i < visible;
        }
        dungeon.end_pos = Position::new(1, 4);
        dungeon.player_pos = dungeon.end_pos;
        let end = dungeon.room_mut(Position::new(1, 4)).unwrap();
        end.is_end_room = true;
        end.is_cleared = true;
        end.entered_after_clear = true;
        dungeon
    }

    #[test]
    fn test_completion_needs_exploration() {
        assert!(two_by_five(8).is_complete());
        assert!(!two_by_five(5).is_complete());
    }

    #[test]
    fn test_completion_needs_entry_after_clear() {
        let mut dungeon = two_by_five(10);
        dungeon.room_mut(dungeon.end_pos).unwrap().entered_after_clear = false;
        assert!(!dungeon.is_complete());

        let mut dungeon = two_by_five(10);
        dungeon.player_pos = Position::new(0, 0);
        assert!(!dungeon.is_complete());
    }

    #[test]
    fn test_treasure_loots_once() {
        let mut dungeon = corridor(3);
        let pos = Position::new(0, 1);
        let room = dungeon.room_mut(pos).unwrap();
        room.has_treasure = true;
        room.treasure = Some(TreasureLoot {
            copper: 120,
            items: Vec::new(),
        });

        assert_eq!(dungeon.get_treasure_loot(pos).unwrap().copper, 120);
        assert_eq!(
            dungeon.get_treasure_loot(pos),
            Err(EngineError::AlreadyLooted { position: pos })
        );
        assert!(matches!(
            dungeon.get_treasure_loot(Position::new(0, 2)),
            Err(EngineError::InvalidAction(_))
        ));
    }

    #[test]
    fn test_path_to_end_is_shortest() {
        let mut dungeon = Dungeon::new(1, 2, 3, 0);
        dungeon.connect(Position::new(0, 0), Direction::East);
        dungeon.connect(Position::new(0, 1), Direction::East);
        dungeon.connect(Position::new(0, 2), Direction::South);
        dungeon.connect(Position::new(0, 0), Direction::South);
        dungeon.connect(Position::new(1, 0), Direction::East);
        dungeon.end_pos = Position::new(1, 1);

        let path = dungeon.path_to_end().unwrap();
        assert_eq!(path.len(), 3);
        assert_eq!(path[0], Position::new(0, 0));
        assert_eq!(path[2], Position::new(1, 1));
        assert!(dungeon.is_fully_connected());
    }

    #[test]
    fn test_unreachable_room_has_no_path() {
        let mut dungeon = Dungeon::new(1, 1, 3, 0);
        dungeon.connect(Position::new(0, 0), Direction::East);
        assert_eq!(dungeon.path_between(Position::new(0, 0), Position::new(0, 2)), None);
        assert_eq!(dungeon.reachable_from(Position::new(0, 0)), 2);
        assert!(!dungeon.is_fully_connected());
    }

    #[test]
    fn test_victory_clears_room_and_rewards() {
        let catalog = default_catalog();
        let config = EngineConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut dungeon = corridor(3);
        let mut hero = Character::new("Ayla", 19, &catalog).unwrap();

        dungeon.room_mut(Position::new(0, 1)).unwrap().enemies = vec![rat()];
        dungeon.move_player(Direction::East).unwrap();

        let mut encounter = dungeon.start_encounter().unwrap();
        encounter.enemies[0].current_health = 0;
        encounter.state = CombatState::Victory;

        let outcome = dungeon
            .resolve_encounter(&encounter, &mut hero, &catalog, &config, &mut rng)
            .unwrap();
        let CombatOutcome::Victory { rewards } = outcome else {
            panic!("expected victory");
        };
        assert_eq!(rewards.xp, rat().xp_value);
        assert_eq!(hero.xp, rat().xp_value);

        let room = dungeon.current_room().unwrap();
        assert!(room.enemies.is_empty() && room.is_cleared);
        assert!(!room.entered_after_clear);

        // Rewards are handed out once
        assert!(dungeon
            .resolve_encounter(&encounter, &mut hero, &catalog, &config, &mut rng)
            .is_err());
    }

    #[test]
    fn test_flee_moves_player_and_keeps_wounds() {
        let catalog = default_catalog();
        let config = EngineConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut dungeon = corridor(3);
        let mut hero = Character::new("Ayla", 19, &catalog).unwrap();
        let pos = Position::new(0, 1);

        dungeon.room_mut(pos).unwrap().enemies = vec![rat(), rat()];
        dungeon.move_player(Direction::East).unwrap();

        let mut encounter = dungeon.start_encounter().unwrap();
        encounter.enemies[0].current_health = 0;
        encounter.enemies[1].current_health = 2;
        encounter.state = CombatState::Fled;

        let outcome = dungeon
            .resolve_encounter(&encounter, &mut hero, &catalog, &config, &mut rng)
            .unwrap();
        let CombatOutcome::Fled { arrival } = outcome else {
            panic!("expected flee");
        };
        assert_ne!(arrival.position(), pos);
        assert_eq!(dungeon.player_pos, arrival.position());

        let room = dungeon.room(pos).unwrap();
        assert_eq!(room.enemies.len(), 2);
        assert_eq!(room.living_enemies(), 1);
        assert_eq!(room.enemies[1].current_health, 2);
        assert!(!room.is_cleared);
        assert_eq!(hero.xp, 0);
    }

    #[test]
    fn test_kills_before_flee_pay_out_on_victory() {
        let catalog = default_catalog();
        let config = EngineConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let mut dungeon = corridor(3);
        let mut hero = Character::new("Ayla", 19, &catalog).unwrap();
        let pos = Position::new(0, 1);

        dungeon.room_mut(pos).unwrap().enemies = vec![rat(), rat()];
        dungeon.move_player(Direction::East).unwrap();

        // First fight: one rat dies, then the player gets away
        let mut encounter = dungeon.start_encounter().unwrap();
        encounter.enemies[0].current_health = 0;
        encounter.state = CombatState::Fled;
        dungeon
            .resolve_encounter(&encounter, &mut hero, &catalog, &config, &mut rng)
            .unwrap();
        assert_ne!(dungeon.player_pos, pos);
        assert_eq!(hero.xp, 0);

        // Back in to finish the second rat
        let back = Direction::between(dungeon.player_pos, pos).unwrap();
        assert!(dungeon.move_player(back).unwrap().needs_combat());
        let mut encounter = dungeon.start_encounter().unwrap();
        assert_eq!(encounter.living_enemies().count(), 1);
        encounter.enemies[1].current_health = 0;
        encounter.state = CombatState::Victory;

        let outcome = dungeon
            .resolve_encounter(&encounter, &mut hero, &catalog, &config, &mut rng)
            .unwrap();
        let CombatOutcome::Victory { rewards } = outcome else {
            panic!("expected victory");
        };
        assert_eq!(rewards.xp, 2 * rat().xp_value);
        assert_eq!(hero.xp, 2 * rat().xp_value);
        assert!(dungeon.room(pos).unwrap().enemies.is_empty());
    }

    #[test]
    fn test_unfinished_encounter_is_rejected() {
        let catalog = default_catalog();
        let config = EngineConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut dungeon = corridor(3);
        let mut hero = Character::new("Ayla", 19, &catalog).unwrap();

        dungeon.room_mut(Position::new(0, 1)).unwrap().enemies = vec![rat()];
        dungeon.move_player(Direction::East).unwrap();
        let encounter = dungeon.start_encounter().unwrap();
        assert!(dungeon
            .resolve_encounter(&encounter, &mut hero, &catalog, &config, &mut rng)
            .is_err());
    }

    #[test]
    fn test_start_encounter_needs_enemies() {
        let dungeon = corridor(3);
        assert!(dungeon.start_encounter().is_err());
    }

    #[test]
    fn test_complete_dungeon_grants_bonus_once() {
        let catalog = default_catalog();
        let config = EngineConfig::default();
        let mut dungeon = two_by_five(10);
        let mut hero = Character::new("Ayla", 19, &catalog).unwrap();

        let reward = dungeon.complete_dungeon(&mut hero, &catalog, &config).unwrap();
        assert_eq!(reward.xp, 100);
        assert_eq!(reward.copper, 50);
        assert_eq!(reward.next_tier, 2);
        assert_eq!(hero.money, 150);
        assert_eq!(reward.promotion.map(|p| p.to_tier), Some(2));

        assert!(dungeon.complete_dungeon(&mut hero, &catalog, &config).is_err());
        assert_eq!(hero.money, 150);
    }

    #[test]
    fn test_incomplete_dungeon_cannot_be_completed() {
        let catalog = default_catalog();
        let mut dungeon = two_by_five(5);
        let mut hero = Character::new("Ayla", 19, &catalog).unwrap();
        assert!(matches!(
            dungeon.complete_dungeon(&mut hero, &catalog, &EngineConfig::default()),
            Err(EngineError::InvalidAction(_))
        ));
        assert_eq!(hero.xp, 0);
    }

    #[test]
    fn test_pick_up_and_merchant() {
        let catalog = default_catalog();
        let mut dungeon = corridor(3);
        let mut hero = Character::new("Ayla", 19, &catalog).unwrap();
        let torch = catalog.get_item("torch").unwrap().clone();
        let room = dungeon.room_mut(Position::new(0, 1)).unwrap();
        room.item_drop = Some(torch.clone());
        room.has_merchant = true;

        assert!(dungeon.visit_merchant().is_err());
        dungeon.move_player(Direction::East).unwrap();

        assert_eq!(dungeon.pick_up_item(&mut hero).unwrap(), torch);
        assert_eq!(hero.count_item("torch"), 1);
        assert!(dungeon.pick_up_item(&mut hero).is_err());

        assert!(dungeon.visit_merchant().is_ok());
        assert!(dungeon.current_room().unwrap().merchant_visited);
    }
}
