//! Per-dungeon shop with prices fixed at stocking time.

#![allow(unused_imports)]

pub mod logic;
pub mod types;

pub use logic::*;
pub use types::*;
