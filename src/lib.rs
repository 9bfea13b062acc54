//! Delve - turn-based dungeon crawler engine.
//!
//! Tiered character progression, procedurally generated dungeons with
//! guaranteed connectivity, and a d20 combat resolver. Content comes from an
//! injected [`catalog::CatalogProvider`]; every random draw goes through a
//! [`core::rng::RandomSource`] so outcomes can be scripted in tests.

pub mod catalog;
pub mod character;
pub mod combat;
pub mod core;
pub mod dungeon;
pub mod items;
pub mod merchant;
pub mod simulator;
