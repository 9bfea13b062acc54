use crate::catalog::{DropEntry, EnemyDef};
use crate::character::Promotion;
use crate::dungeon::types::{MoveResult, Position};
use crate::items::Item;
use serde::{Deserialize, Serialize};

/// A live enemy instance, cloned out of its catalog definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub key: String,
    pub name: String,
    pub tier: u8,
    pub max_health: u32,
    pub current_health: u32,
    pub attack: u32,
    pub defense: u32,
    pub xp_value: u64,
    pub min_copper: u32,
    pub max_copper: u32,
    pub common_drops: Vec<DropEntry>,
    pub rare_drops: Vec<DropEntry>,
}

impl Enemy {
    pub fn from_def(def: &EnemyDef) -> Self {
        Self {
            key: def.key.clone(),
            name: def.name.clone(),
            tier: def.tier,
            max_health: def.health,
            current_health: def.health,
            attack: def.attack,
            defense: def.defense,
            xp_value: def.xp_value,
            min_copper: def.min_copper,
            max_copper: def.max_copper,
            common_drops: def.common_drops.clone(),
            rare_drops: def.rare_drops.clone(),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.current_health > 0
    }

    pub fn take_damage(&mut self, amount: u32) {
        self.current_health = self.current_health.saturating_sub(amount);
    }
}

/// Encounter lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombatState {
    AwaitingAction,
    /// Transient while a turn is being applied
    ResolvingTurn,
    Victory,
    Defeat,
    Fled,
}

impl CombatState {
    pub fn is_finished(&self) -> bool {
        matches!(
            self,
            CombatState::Victory | CombatState::Defeat | CombatState::Fled
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombatAction {
    /// Attack the enemy at `target`, or the first living one
    Attack { target: Option<usize> },
    /// Use the inventory item at this index
    UseItem { inventory_index: usize },
    Flee,
}

/// Whether an action hands the round to the enemies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnCost {
    /// Enemies do not retaliate
    Free,
    /// Every living enemy attacks afterwards
    Full,
}

impl CombatAction {
    pub fn turn_cost(&self) -> TurnCost {
        match self {
            CombatAction::UseItem { .. } => TurnCost::Free,
            CombatAction::Attack { .. } | CombatAction::Flee => TurnCost::Full,
        }
    }
}

/// Result of a single attack swing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackOutcome {
    pub attacker: String,
    pub defender: String,
    /// Natural d20 roll
    pub roll: u32,
    /// Attack value sampled for this swing
    pub raw_attack: u32,
    pub hit: bool,
    pub critical: bool,
    pub damage: u32,
    pub defender_health: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnEvent {
    Attack(AttackOutcome),
    ItemUsed { item: String, healed: u32 },
    FleeAttempt { roll: u32, success: bool },
}

/// Everything that happened during one player action and the enemy replies
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatTurnResult {
    pub turn: u32,
    pub events: Vec<TurnEvent>,
    pub state: CombatState,
}

/// Spoils of a won encounter
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Rewards {
    pub xp: u64,
    pub copper: u64,
    pub items: Vec<Item>,
    pub promotion: Option<Promotion>,
}

/// Final result of an encounter, after the dungeon applied it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CombatOutcome {
    Victory { rewards: Rewards },
    Defeat,
    Fled { arrival: MoveResult },
}

/// One fight between the character and the enemies of a single room
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Encounter {
    /// Room the fight takes place in
    pub position: Position,
    pub enemies: Vec<Enemy>,
    pub state: CombatState,
    pub turns: u32,
}

impl Encounter {
    pub fn new(position: Position, enemies: Vec<Enemy>) -> Self {
        let state = if enemies.iter().any(Enemy::is_alive) {
            CombatState::AwaitingAction
        } else {
            CombatState::Victory
        };
        Self {
            position,
            enemies,
            state,
            turns: 0,
        }
    }

    pub fn living_enemies(&self) -> impl Iterator<Item = &Enemy> {
        self.enemies.iter().filter(|e| e.is_alive())
    }

    pub fn first_living(&self) -> Option<usize> {
        self.enemies.iter().position(Enemy::is_alive)
    }

    pub fn total_xp(&self) -> u64 {
        self.enemies.iter().map(|e| e.xp_value).sum()
    }
}
