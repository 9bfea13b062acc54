//! Turn-based combat: encounter state machine, d20 resolution and rewards.

#![allow(unused_imports)]

pub mod logic;
pub mod rewards;
pub mod types;

pub use logic::*;
pub use rewards::*;
pub use types::*;
