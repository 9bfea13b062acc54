//! Player character: stats, inventory and tier progression.

#![allow(unused_imports)]

pub mod derived_stats;
pub mod progression;
pub mod types;

pub use derived_stats::*;
pub use progression::*;
pub use types::*;
