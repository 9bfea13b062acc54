//! Simulation configuration.

use crate::core::config::EngineConfig;

/// Configuration for a simulation run.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Number of simulated characters
    pub num_runs: u32,

    /// Random seed for reproducibility (None = random)
    pub seed: Option<u64>,

    /// Dungeons a character may attempt before the run stops
    pub max_dungeons: u32,

    /// Moves and fights per dungeon before the run counts as stalled
    pub max_actions_per_dungeon: u32,

    /// Drink a potion in combat below this health fraction
    pub potion_threshold: f64,

    /// Try to flee once a fight has lasted this many turns
    pub flee_after_turns: u32,

    /// Healing items to keep stocked when visiting a merchant
    pub potion_reserve: usize,

    /// Engine rules used for every run
    pub engine: EngineConfig,

    /// Log verbosity (0 = silent, 1 = summary, 2 = per run)
    pub verbosity: u8,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            num_runs: 200,
            seed: None,
            max_dungeons: 12,
            max_actions_per_dungeon: 2_000,
            potion_threshold: 0.35,
            flee_after_turns: 60,
            potion_reserve: 5,
            engine: EngineConfig::default(),
            verbosity: 1,
        }
    }
}

impl SimConfig {
    /// Small seeded config for smoke tests
    pub fn quick(seed: u64) -> Self {
        Self {
            num_runs: 10,
            seed: Some(seed),
            max_dungeons: 4,
            ..Default::default()
        }
    }
}
