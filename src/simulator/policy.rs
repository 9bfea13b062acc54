//! Decisions of the auto-play character.

use super::config::SimConfig;
use crate::character::Character;
use crate::combat::{CombatAction, Encounter};
use crate::dungeon::{Dungeon, Position};
use crate::items::{Item, ItemSlot};

/// Potion when hurt, flee from a drawn-out fight, otherwise attack.
pub fn choose_action(hero: &Character, encounter: &Encounter, config: &SimConfig) -> CombatAction {
    if hero.health_fraction() < config.potion_threshold {
        if let Some(inventory_index) = hero.best_healing_item() {
            return CombatAction::UseItem { inventory_index };
        }
    }
    if encounter.turns >= config.flee_after_turns {
        return CombatAction::Flee;
    }
    CombatAction::Attack { target: None }
}

/// Next room to step into: the nearest unvisited room while exploring, then
/// the end room. Standing in an end room that was cleared by a fight, step
/// out so it can be entered again.
pub fn next_step(dungeon: &Dungeon) -> Option<Position> {
    let here = dungeon.player_pos;
    let explored = dungeon.exploration_ratio() >= dungeon.required_exploration;

    if !explored {
        let mut best_path: Option<Vec<Position>> = None;
        for pos in dungeon.positions() {
            if pos == here || pos == dungeon.end_pos {
                continue;
            }
            if dungeon.room(pos).is_some_and(|room| room.is_visited) {
                continue;
            }
            if let Some(path) = dungeon.path_between(here, pos) {
                let is_shorter = best_path
                    .as_ref()
                    .is_none_or(|best| path.len() < best.len());
                if is_shorter {
                    best_path = Some(path);
                }
            }
        }
        if let Some(step) = best_path.and_then(|path| path.get(1).copied()) {
            return Some(step);
        }
    }

    if here == dungeon.end_pos {
        return dungeon.connected_neighbors(here).into_iter().next();
    }
    dungeon.path_to_end().and_then(|path| path.get(1).copied())
}

fn gear_score(item: &Item) -> u32 {
    let damage = item.damage_range().map_or(0, |(min, max)| min + max);
    damage + item.defense_bonus() * 2 + item.health_bonus()
}

/// Equips any inventory item that beats what is worn in its slot.
/// Returns how many items were equipped.
pub fn equip_upgrades(hero: &mut Character) -> usize {
    let mut equipped = 0;
    for slot in [ItemSlot::Weapon, ItemSlot::Armor, ItemSlot::Shield] {
        let worn = hero.equipment.get(slot).map_or(0, gear_score);
        let best = hero
            .inventory
            .iter()
            .enumerate()
            .filter(|(_, item)| item.slot == slot)
            .map(|(i, item)| (i, gear_score(item)))
            .max_by_key(|&(_, score)| score);

        if let Some((index, score)) = best {
            if score > worn && hero.equip(index).is_ok() {
                equipped += 1;
            }
        }
    }
    equipped
}

pub fn healing_items(hero: &Character) -> usize {
    hero.inventory
        .iter()
        .filter(|item| item.is_consumable() && item.heal_amount().is_some())
        .count()
}
