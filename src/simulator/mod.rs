//! Monte Carlo auto-play for balance analysis.
//!
//! Runs many seeded playthroughs through the public engine API: a simple
//! policy walks each dungeon, fights, shops and moves up tiers until the
//! character dies or the run budget ends.

mod config;
mod policy;
mod report;
mod runner;

pub use config::SimConfig;
pub use report::{RunStats, SimReport};
pub use runner::{run_simulation, simulate_single_run};
