//! Simulation report generation.

use crate::core::constants::{MAX_TIER, MIN_TIER};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Everything tracked for one simulated character.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunStats {
    pub final_tier: u8,
    pub final_xp: u64,
    pub final_money: u64,
    pub dungeons_completed: u32,
    pub enemies_defeated: u64,
    pub fights_won: u64,
    pub fights_fled: u64,
    pub treasure_looted: u64,
    pub items_picked_up: u64,
    pub potions_used: u64,
    pub items_bought: u64,
    pub upgrades_equipped: u64,
    pub combat_turns: u64,
    pub died: bool,
    /// A dungeon ran out of actions before completion
    pub stalled: bool,
}

/// Aggregated results from multiple simulation runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimReport {
    pub num_runs: u32,
    pub deaths: u32,
    pub stalls: u32,

    pub avg_final_tier: f64,
    pub avg_final_xp: f64,
    pub avg_final_money: f64,
    pub avg_dungeons_completed: f64,
    pub avg_enemies_defeated: f64,
    pub avg_fights_fled: f64,
    pub avg_treasure_looted: f64,
    pub avg_potions_used: f64,
    pub avg_items_bought: f64,
    pub avg_turns_per_fight: f64,

    /// Final tier -> number of runs ending there
    pub tier_distribution: BTreeMap<u8, u32>,

    pub run_stats: Vec<RunStats>,
}

fn average(runs: &[RunStats], value: impl Fn(&RunStats) -> f64) -> f64 {
    if runs.is_empty() {
        return 0.0;
    }
    runs.iter().map(value).sum::<f64>() / runs.len() as f64
}

impl SimReport {
    pub fn from_runs(runs: Vec<RunStats>) -> Self {
        let num_runs = runs.len() as u32;
        let deaths = runs.iter().filter(|r| r.died).count() as u32;
        let stalls = runs.iter().filter(|r| r.stalled).count() as u32;

        let mut tier_distribution = BTreeMap::new();
        for run in &runs {
            *tier_distribution.entry(run.final_tier).or_insert(0) += 1;
        }

        let fights: u64 = runs.iter().map(|r| r.fights_won + r.fights_fled).sum();
        let turns: u64 = runs.iter().map(|r| r.combat_turns).sum();

        Self {
            num_runs,
            deaths,
            stalls,
            avg_final_tier: average(&runs, |r| r.final_tier as f64),
            avg_final_xp: average(&runs, |r| r.final_xp as f64),
            avg_final_money: average(&runs, |r| r.final_money as f64),
            avg_dungeons_completed: average(&runs, |r| r.dungeons_completed as f64),
            avg_enemies_defeated: average(&runs, |r| r.enemies_defeated as f64),
            avg_fights_fled: average(&runs, |r| r.fights_fled as f64),
            avg_treasure_looted: average(&runs, |r| r.treasure_looted as f64),
            avg_potions_used: average(&runs, |r| r.potions_used as f64),
            avg_items_bought: average(&runs, |r| r.items_bought as f64),
            avg_turns_per_fight: turns as f64 / fights.max(1) as f64,
            tier_distribution,
            run_stats: runs,
        }
    }

    /// Generate a text report.
    pub fn to_text(&self) -> String {
        let mut report = String::new();

        report.push_str("═══════════════════════════════════════════════════════════════\n");
        report.push_str("                    SIMULATION REPORT\n");
        report.push_str("═══════════════════════════════════════════════════════════════\n\n");

        report.push_str(&format!(
            "Runs: {} total, {} died, {} stalled\n\n",
            self.num_runs, self.deaths, self.stalls
        ));

        report.push_str("── PROGRESSION ──────────────────────────────────────────────────\n");
        report.push_str(&format!("  Avg Final Tier:      {:.2}\n", self.avg_final_tier));
        report.push_str(&format!("  Avg Final XP:        {:.0}\n", self.avg_final_xp));
        report.push_str(&format!(
            "  Avg Dungeons Done:   {:.2}\n\n",
            self.avg_dungeons_completed
        ));

        report.push_str("── COMBAT ───────────────────────────────────────────────────────\n");
        report.push_str(&format!("  Avg Enemies Slain:   {:.1}\n", self.avg_enemies_defeated));
        report.push_str(&format!("  Avg Fights Fled:     {:.2}\n", self.avg_fights_fled));
        report.push_str(&format!("  Avg Turns / Fight:   {:.2}\n", self.avg_turns_per_fight));
        report.push_str(&format!("  Avg Potions Used:    {:.1}\n\n", self.avg_potions_used));

        report.push_str("── ECONOMY ──────────────────────────────────────────────────────\n");
        report.push_str(&format!("  Avg Final Copper:    {:.0}\n", self.avg_final_money));
        report.push_str(&format!("  Avg Treasure Rooms:  {:.2}\n", self.avg_treasure_looted));
        report.push_str(&format!("  Avg Items Bought:    {:.1}\n\n", self.avg_items_bought));

        report.push_str("── FINAL TIER ───────────────────────────────────────────────────\n");
        for tier in MIN_TIER..=MAX_TIER {
            let reached = self.tier_distribution.get(&tier).copied().unwrap_or(0);
            let pct = (reached as f64 / self.num_runs.max(1) as f64) * 100.0;
            let bar: String = "█".repeat((pct / 5.0) as usize);
            report.push_str(&format!("  Tier {}: {:>5.1}% {}\n", tier, pct, bar));
        }

        report
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(tier: u8, died: bool) -> RunStats {
        RunStats {
            final_tier: tier,
            died,
            fights_won: 4,
            combat_turns: 12,
            ..Default::default()
        }
    }

    #[test]
    fn test_report_aggregates_runs() {
        let report = SimReport::from_runs(vec![run(1, true), run(3, false), run(3, false)]);
        assert_eq!(report.num_runs, 3);
        assert_eq!(report.deaths, 1);
        assert_eq!(report.tier_distribution.get(&3), Some(&2));
        assert!((report.avg_final_tier - 7.0 / 3.0).abs() < 1e-9);
        assert!((report.avg_turns_per_fight - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_report() {
        let report = SimReport::from_runs(Vec::new());
        assert_eq!(report.avg_final_tier, 0.0);
        assert!(report.to_text().contains("Runs: 0 total"));
    }

    #[test]
    fn test_json_report() {
        let report = SimReport::from_runs(vec![run(2, false)]);
        let value: serde_json::Value = serde_json::from_str(&report.to_json()).unwrap();
        assert_eq!(value["num_runs"], 1);
        assert_eq!(value["run_stats"][0]["final_tier"], 2);
    }
}
