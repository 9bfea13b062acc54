//! Engine error kinds.
//!
//! Every fallible engine operation returns [`Result`]. Errors are return-path
//! signals only: a rejected operation leaves all state untouched.

use crate::dungeon::types::{Direction, Position};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, EngineError>;

/// Which catalog table a lookup missed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CatalogKind {
    Item,
    Enemy,
    Tier,
}

impl std::fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogKind::Item => write!(f, "item"),
            CatalogKind::Enemy => write!(f, "enemy"),
            CatalogKind::Tier => write!(f, "tier"),
        }
    }
}

/// Why a move was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveBlock {
    /// No open door in that direction
    NoDoor,
    /// Door leads off the grid
    OutOfBounds,
    /// Living enemies in the current room must be fought or fled first
    EnemiesPresent,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("cannot move {direction:?} from {from}: {reason:?}")]
    InvalidMove {
        from: Position,
        direction: Direction,
        reason: MoveBlock,
    },

    #[error("failed to generate tier {tier} dungeon after {attempts} attempts: {reason}")]
    Generation {
        tier: u8,
        attempts: u32,
        reason: String,
    },

    #[error("{kind} not found: {key}")]
    NotFound { kind: CatalogKind, key: String },

    #[error("insufficient funds: price {price}, available {available}")]
    InsufficientFunds { price: u64, available: u64 },

    #[error("out of stock: {item}")]
    OutOfStock { item: String },

    #[error("item not owned: {item}")]
    NotOwned { item: String },

    #[error("treasure at {position} already looted")]
    AlreadyLooted { position: Position },

    #[error("invalid action: {0}")]
    InvalidAction(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl EngineError {
    pub fn not_found(kind: CatalogKind, key: impl Into<String>) -> Self {
        EngineError::NotFound {
            kind,
            key: key.into(),
        }
    }

    pub fn invalid_action(message: impl Into<String>) -> Self {
        EngineError::InvalidAction(message.into())
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        EngineError::Config(err.to_string())
    }
}
