//! d20 turn resolution.
//!
//! A player action resolves first. Actions that cost a turn then hand the round
//! to every living enemy in room order; free actions (item use) do not.

use super::types::{
    AttackOutcome, CombatAction, CombatState, CombatTurnResult, Encounter, Enemy, TurnCost,
    TurnEvent,
};
use crate::character::Character;
use crate::core::config::EngineConfig;
use crate::core::constants::{
    CRITICAL_HIT_MULTIPLIER, CRITICAL_ROLL, D20_SIDES, FUMBLE_ROLL, MIN_CRITICAL_DAMAGE,
};
use crate::core::error::{EngineError, Result};
use crate::core::rng::RandomSource;
use crate::items::Item;
use tracing::{debug, info};

/// Anything that can take part in a fight
pub trait Combatant {
    fn name(&self) -> &str;

    /// Player-controlled combatants get the player hit bonus and damage multiplier
    fn is_player(&self) -> bool;

    /// Attack value for one swing. May draw from `rng` (weapon damage).
    fn roll_attack<R: RandomSource>(&self, rng: &mut R) -> u32;

    fn defense(&self) -> u32;

    fn health(&self) -> u32;

    fn apply_damage(&mut self, amount: u32);

    /// Uses an inventory item. Returns the item and the health restored.
    fn use_item(&mut self, _index: usize) -> Result<(Item, u32)> {
        Err(EngineError::invalid_action(format!(
            "{} cannot use items",
            self.name()
        )))
    }

    fn is_alive(&self) -> bool {
        self.health() > 0
    }
}

impl Combatant for Character {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_player(&self) -> bool {
        true
    }

    fn roll_attack<R: RandomSource>(&self, rng: &mut R) -> u32 {
        self.total_attack(rng)
    }

    fn defense(&self) -> u32 {
        self.total_defense()
    }

    fn health(&self) -> u32 {
        self.current_health()
    }

    fn apply_damage(&mut self, amount: u32) {
        self.take_damage(amount);
    }

    fn use_item(&mut self, index: usize) -> Result<(Item, u32)> {
        self.use_consumable(index)
    }
}

impl Combatant for Enemy {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_player(&self) -> bool {
        false
    }

    fn roll_attack<R: RandomSource>(&self, _rng: &mut R) -> u32 {
        self.attack
    }

    fn defense(&self) -> u32 {
        self.defense
    }

    fn health(&self) -> u32 {
        self.current_health
    }

    fn apply_damage(&mut self, amount: u32) {
        self.take_damage(amount);
    }
}

/// Damage of a landed swing.
///
/// Defense is subtracted once, after the critical doubling. A critical always
/// deals at least 1 so it beats any non-critical hit with the same stats. The
/// player multiplier applies last and rounds down.
pub fn attack_damage(
    raw_attack: u32,
    defense: u32,
    critical: bool,
    is_player: bool,
    config: &EngineConfig,
) -> u32 {
    let damage = if critical {
        raw_attack
            .saturating_mul(CRITICAL_HIT_MULTIPLIER)
            .saturating_sub(defense)
            .max(MIN_CRITICAL_DAMAGE)
    } else {
        raw_attack.saturating_sub(defense)
    };

    if is_player {
        (damage as f64 * config.player_damage_multiplier).floor() as u32
    } else {
        damage
    }
}

/// Rolls a d20 and resolves one swing, applying damage to the defender.
pub fn resolve_attack<A, D, R>(
    attacker: &A,
    defender: &mut D,
    config: &EngineConfig,
    rng: &mut R,
) -> AttackOutcome
where
    A: Combatant,
    D: Combatant,
    R: RandomSource,
{
    let roll = rng.roll_die(D20_SIDES);
    let raw_attack = attacker.roll_attack(rng);
    let defense = defender.defense();
    let is_player = attacker.is_player();

    let (hit, critical) = match roll {
        CRITICAL_ROLL => (true, true),
        FUMBLE_ROLL => (false, false),
        _ => {
            let bonus = if is_player { config.player_hit_bonus } else { 0 };
            (
                roll.saturating_add(raw_attack).saturating_add(bonus)
                    >= config.armor_class_base.saturating_add(defense),
                false,
            )
        }
    };

    let damage = if hit {
        attack_damage(raw_attack, defense, critical, is_player, config)
    } else {
        0
    };
    defender.apply_damage(damage);

    debug!(
        attacker = attacker.name(),
        defender = defender.name(),
        roll,
        raw_attack,
        hit,
        critical,
        damage,
        "attack resolved"
    );

    AttackOutcome {
        attacker: attacker.name().to_string(),
        defender: defender.name().to_string(),
        roll,
        raw_attack,
        hit,
        critical,
        damage,
        defender_health: defender.health(),
    }
}

/// d20 + player bonus against the flee DC. Returns (natural roll, success).
pub fn attempt_flee<R: RandomSource>(is_player: bool, config: &EngineConfig, rng: &mut R) -> (u32, bool) {
    let roll = rng.roll_die(D20_SIDES);
    let bonus = if is_player { config.player_flee_bonus } else { 0 };
    (roll, roll.saturating_add(bonus) >= config.flee_dc)
}

/// Applies one action of `attacker` against `defender`.
pub fn process_turn<A, D, R>(
    attacker: &mut A,
    defender: &mut D,
    action: CombatAction,
    config: &EngineConfig,
    rng: &mut R,
) -> Result<TurnEvent>
where
    A: Combatant,
    D: Combatant,
    R: RandomSource,
{
    match action {
        CombatAction::Attack { .. } => Ok(TurnEvent::Attack(resolve_attack(
            &*attacker, defender, config, rng,
        ))),
        CombatAction::UseItem { inventory_index } => {
            let (item, healed) = attacker.use_item(inventory_index)?;
            Ok(TurnEvent::ItemUsed {
                item: item.name,
                healed,
            })
        }
        CombatAction::Flee => {
            let (roll, success) = attempt_flee(attacker.is_player(), config, rng);
            debug!(who = attacker.name(), roll, success, "flee attempt");
            Ok(TurnEvent::FleeAttempt { roll, success })
        }
    }
}

impl Encounter {
    /// Runs one player action and, when it costs a turn, the enemy replies.
    ///
    /// A rejected action (bad target, unusable item, finished encounter)
    /// returns an error and changes nothing.
    pub fn take_action<R: RandomSource>(
        &mut self,
        character: &mut Character,
        action: CombatAction,
        config: &EngineConfig,
        rng: &mut R,
    ) -> Result<CombatTurnResult> {
        if self.state != CombatState::AwaitingAction {
            return Err(EngineError::invalid_action(format!(
                "encounter is not awaiting an action ({:?})",
                self.state
            )));
        }

        let target = self.target_index(action)?;
        let defender = self
            .enemies
            .get_mut(target)
            .ok_or_else(|| EngineError::invalid_action("no enemy to target"))?;
        let player_event = process_turn(character, defender, action, config, rng)?;

        self.state = CombatState::ResolvingTurn;
        self.turns += 1;
        let fled = matches!(player_event, TurnEvent::FleeAttempt { success: true, .. });
        let mut events = vec![player_event];

        if fled {
            self.state = CombatState::Fled;
        } else if self.first_living().is_none() {
            self.state = CombatState::Victory;
        } else if action.turn_cost() == TurnCost::Full {
            self.enemy_round(character, config, rng, &mut events)?;
        }

        if self.state == CombatState::ResolvingTurn {
            self.state = CombatState::AwaitingAction;
        } else {
            info!(turns = self.turns, state = ?self.state, "encounter finished");
        }

        Ok(CombatTurnResult {
            turn: self.turns,
            events,
            state: self.state,
        })
    }

    fn target_index(&self, action: CombatAction) -> Result<usize> {
        match action {
            CombatAction::Attack {
                target: Some(index),
            } => match self.enemies.get(index) {
                Some(enemy) if enemy.is_alive() => Ok(index),
                Some(_) => Err(EngineError::invalid_action(format!(
                    "enemy {index} is already defeated"
                ))),
                None => Err(EngineError::invalid_action(format!(
                    "no enemy at index {index}"
                ))),
            },
            _ => self
                .first_living()
                .ok_or_else(|| EngineError::invalid_action("no living enemies")),
        }
    }

    /// Every living enemy attacks once, in order, until the character falls.
    fn enemy_round<R: RandomSource>(
        &mut self,
        character: &mut Character,
        config: &EngineConfig,
        rng: &mut R,
        events: &mut Vec<TurnEvent>,
    ) -> Result<()> {
        let attack = CombatAction::Attack { target: None };
        for enemy in self.enemies.iter_mut().filter(|e| e.is_alive()) {
            events.push(process_turn(enemy, character, attack, config, rng)?);
            if !character.is_alive() {
                self.state = CombatState::Defeat;
                break;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{default_catalog, CatalogProvider};
    use crate::core::rng::ScriptedRolls;

    fn tier_one() -> Character {
        let catalog = default_catalog();
        Character::from_tier("Ayla", 19, catalog.get_tier(1).unwrap())
    }

    fn enemy(attack: u32, defense: u32, health: u32) -> Enemy {
        let mut def = default_catalog().get_enemy("goblin_scout").unwrap().clone();
        def.attack = attack;
        def.defense = defense;
        def.health = health;
        Enemy::from_def(&def)
    }

    #[test]
    fn test_natural_twenty_is_critical() {
        let config = EngineConfig::default();
        let character = tier_one();
        let mut target = enemy(1, 3, 100);
        let mut rng = ScriptedRolls::new(0).with_dice([20]);

        let outcome = resolve_attack(&character, &mut target, &config, &mut rng);
        assert!(outcome.hit && outcome.critical);
        // 2 * 3 - 3 = 3, then floor(3 * 1.2) = 3
        assert_eq!(outcome.damage, 3);
        assert_eq!(target.current_health, 97);
    }

    #[test]
    fn test_natural_one_always_misses() {
        let config = EngineConfig::default();
        let mut rng = ScriptedRolls::new(0).with_dice([1]);
        let strong = enemy(500, 0, 10);
        let mut character = tier_one();

        let outcome = resolve_attack(&strong, &mut character, &config, &mut rng);
        assert!(!outcome.hit);
        assert_eq!(outcome.damage, 0);
        assert_eq!(character.current_health(), 25);
    }

    #[test]
    fn test_extreme_catalog_stats_saturate() {
        let config = EngineConfig::default();
        let giant = enemy(u32::MAX, 0, 10);

        let mut character = tier_one();
        let mut rng = ScriptedRolls::new(0).with_dice([20]);
        let critical = resolve_attack(&giant, &mut character, &config, &mut rng);
        assert!(critical.critical);
        assert_eq!(critical.damage, u32::MAX - 3);
        assert_eq!(character.current_health(), 0);

        let mut character = tier_one();
        let mut rng = ScriptedRolls::new(0).with_dice([15]);
        let normal = resolve_attack(&giant, &mut character, &config, &mut rng);
        assert!(normal.hit && !normal.critical);
        assert_eq!(character.current_health(), 0);

        // Defense at the ceiling cannot be reached by a normal roll
        let mut wall = enemy(1, u32::MAX, 100);
        let mut rng = ScriptedRolls::new(0).with_dice([19]);
        let blocked = resolve_attack(&tier_one(), &mut wall, &config, &mut rng);
        assert!(!blocked.hit);
        assert_eq!(wall.current_health, 100);
    }

    #[test]
    fn test_hit_threshold_uses_roll_plus_attack() {
        let config = EngineConfig::default();
        // Enemy attack 5 vs defense 15: roll 9 misses (14), roll 10 hits (15)
        let attacker = enemy(5, 0, 10);
        let mut defender = enemy(1, 15, 100);
        let mut rng = ScriptedRolls::new(0).with_dice([9, 10]);
        assert!(!resolve_attack(&attacker, &mut defender, &config, &mut rng).hit);
        let landed = resolve_attack(&attacker, &mut defender, &config, &mut rng);
        assert!(landed.hit);
        // Hit but attack below defense: no damage
        assert_eq!(landed.damage, 0);
    }

    #[test]
    fn test_attack_damage_rules() {
        let config = EngineConfig::default();
        assert_eq!(attack_damage(10, 4, false, false, &config), 6);
        assert_eq!(attack_damage(10, 4, true, false, &config), 16);
        assert_eq!(attack_damage(2, 10, false, false, &config), 0);
        assert_eq!(attack_damage(2, 10, true, false, &config), 1);
        // Player multiplier floors: 6 * 1.2 = 7.2
        assert_eq!(attack_damage(10, 4, false, true, &config), 7);
    }

    #[test]
    fn test_critical_beats_normal_hit() {
        let config = EngineConfig::default();
        for raw in 0..30 {
            for defense in 0..30 {
                for is_player in [false, true] {
                    let normal = attack_damage(raw, defense, false, is_player, &config);
                    let critical = attack_damage(raw, defense, true, is_player, &config);
                    assert!(critical > normal, "raw {raw} def {defense}");
                }
            }
        }
    }

    #[test]
    fn test_flee_threshold() {
        let config = EngineConfig::default();
        let mut rng = ScriptedRolls::new(0).with_dice([7, 8]);
        assert_eq!(attempt_flee(true, &config, &mut rng), (7, false));
        assert_eq!(attempt_flee(true, &config, &mut rng), (8, true));
    }

    #[test]
    fn test_use_item_is_free_action() {
        let config = EngineConfig::default();
        let mut character = Character::new("Ayla", 19, &default_catalog()).unwrap();
        character.take_damage(10);
        let mut encounter = Encounter::new(crate::dungeon::Position::new(0, 0), vec![enemy(50, 0, 30)]);
        let mut rng = ScriptedRolls::new(0);

        let result = encounter
            .take_action(
                &mut character,
                CombatAction::UseItem { inventory_index: 0 },
                &config,
                &mut rng,
            )
            .unwrap();

        assert_eq!(result.events.len(), 1);
        assert!(matches!(result.events[0], TurnEvent::ItemUsed { healed: 10, .. }));
        assert_eq!(result.state, CombatState::AwaitingAction);
        assert_eq!(character.current_health(), character.max_health());
    }

    #[test]
    fn test_enemies_retaliate_in_order() {
        let config = EngineConfig::default();
        let mut character = tier_one();
        let mut encounter = Encounter::new(
            crate::dungeon::Position::new(0, 0),
            vec![enemy(5, 0, 100), enemy(6, 0, 100)],
        );
        // Player 10, enemies 15 and 15 all hit
        let mut rng = ScriptedRolls::new(0).with_dice([10, 15, 15]);

        let result = encounter
            .take_action(&mut character, CombatAction::Attack { target: None }, &config, &mut rng)
            .unwrap();

        assert_eq!(result.events.len(), 3);
        // 5 - 3 = 2 and 6 - 3 = 3
        assert_eq!(character.current_health(), 20);
        assert_eq!(result.state, CombatState::AwaitingAction);
    }

    #[test]
    fn test_victory_skips_enemy_round() {
        let config = EngineConfig::default();
        let mut character = tier_one();
        let mut encounter =
            Encounter::new(crate::dungeon::Position::new(0, 0), vec![enemy(50, 0, 1)]);
        let mut rng = ScriptedRolls::new(0).with_dice([15]);

        let result = encounter
            .take_action(&mut character, CombatAction::Attack { target: None }, &config, &mut rng)
            .unwrap();
        assert_eq!(result.state, CombatState::Victory);
        assert_eq!(result.events.len(), 1);
        assert_eq!(character.current_health(), 25);

        assert!(encounter
            .take_action(&mut character, CombatAction::Flee, &config, &mut rng)
            .is_err());
    }

    #[test]
    fn test_defeat_when_health_reaches_zero() {
        let config = EngineConfig::default();
        let mut character = tier_one();
        let mut encounter =
            Encounter::new(crate::dungeon::Position::new(0, 0), vec![enemy(100, 50, 100)]);
        // Player misses on a fumble, enemy lands a normal hit for 97
        let mut rng = ScriptedRolls::new(0).with_dice([1, 10]);

        let result = encounter
            .take_action(&mut character, CombatAction::Attack { target: None }, &config, &mut rng)
            .unwrap();
        assert_eq!(result.state, CombatState::Defeat);
        assert!(!character.is_alive());
    }

    #[test]
    fn test_failed_flee_costs_a_turn() {
        let config = EngineConfig::default();
        let mut character = tier_one();
        let mut encounter =
            Encounter::new(crate::dungeon::Position::new(0, 0), vec![enemy(5, 0, 100)]);
        let mut rng = ScriptedRolls::new(0).with_dice([2, 15]);

        let result = encounter
            .take_action(&mut character, CombatAction::Flee, &config, &mut rng)
            .unwrap();
        assert_eq!(result.events.len(), 2);
        assert_eq!(result.state, CombatState::AwaitingAction);
        assert_eq!(character.current_health(), 23);

        let mut rng = ScriptedRolls::new(0).with_dice([19]);
        let result = encounter
            .take_action(&mut character, CombatAction::Flee, &config, &mut rng)
            .unwrap();
        assert_eq!(result.state, CombatState::Fled);
        assert_eq!(result.events.len(), 1);
    }

    #[test]
    fn test_invalid_target_rejected_without_change() {
        let config = EngineConfig::default();
        let mut character = tier_one();
        let mut encounter =
            Encounter::new(crate::dungeon::Position::new(0, 0), vec![enemy(5, 0, 100)]);
        let before = encounter.clone();
        let mut rng = ScriptedRolls::new(0);

        let err = encounter
            .take_action(
                &mut character,
                CombatAction::Attack { target: Some(3) },
                &config,
                &mut rng,
            )
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidAction(_)));
        assert_eq!(encounter, before);
    }
}
