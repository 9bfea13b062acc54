//! Random source used by every randomized rule in the engine.
//!
//! Any `rand::Rng` is a [`RandomSource`]. Tests use [`ScriptedRolls`] to force
//! exact dice and draws.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::VecDeque;

pub trait RandomSource {
    /// Rolls one die with the given number of sides (1..=sides).
    fn roll_die(&mut self, sides: u32) -> u32;

    /// Uniform integer in `low..=high`. Returns `low` when `high < low`.
    fn range_inclusive(&mut self, low: u32, high: u32) -> u32;

    /// Uniform float in `[0, 1)`.
    fn unit(&mut self) -> f64;

    fn chance(&mut self, probability: f64) -> bool {
        self.unit() < probability
    }

    /// Uniform float in `[low, high)`.
    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        low + (high - low) * self.unit()
    }

    /// Uniform index into a collection of `len` elements (`len` must be > 0).
    fn index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0);
        let high = len.saturating_sub(1).min(u32::MAX as usize) as u32;
        self.range_inclusive(0, high) as usize
    }

    /// Fisher-Yates shuffle.
    fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.index(i + 1);
            items.swap(i, j);
        }
    }

    /// Picks an index with probability proportional to its weight.
    /// Returns None when no weight is positive.
    fn weighted_index(&mut self, weights: &[f64]) -> Option<usize> {
        let total: f64 = weights.iter().filter(|w| **w > 0.0).sum();
        if total <= 0.0 {
            return None;
        }
        let mut roll = self.unit() * total;
        let mut last_positive = None;
        for (i, &w) in weights.iter().enumerate() {
            if w <= 0.0 {
                continue;
            }
            if roll < w {
                return Some(i);
            }
            roll -= w;
            last_positive = Some(i);
        }
        last_positive
    }
}

impl<R: Rng> RandomSource for R {
    fn roll_die(&mut self, sides: u32) -> u32 {
        self.gen_range(1..=sides.max(1))
    }

    fn range_inclusive(&mut self, low: u32, high: u32) -> u32 {
        if high <= low {
            return low;
        }
        self.gen_range(low..=high)
    }

    fn unit(&mut self) -> f64 {
        self.gen::<f64>()
    }
}

/// Deterministic random source with queued results.
///
/// Each queue is consumed front to back by its own method. Once a queue is
/// empty the draw falls through to a seeded ChaCha8 stream, so a script only
/// needs to pin the values a test cares about.
#[derive(Debug, Clone)]
pub struct ScriptedRolls {
    dice: VecDeque<u32>,
    ranges: VecDeque<u32>,
    units: VecDeque<f64>,
    fallback: ChaCha8Rng,
}

impl ScriptedRolls {
    pub fn new(seed: u64) -> Self {
        Self {
            dice: VecDeque::new(),
            ranges: VecDeque::new(),
            units: VecDeque::new(),
            fallback: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Queues die results (clamped to the die's sides when rolled).
    pub fn with_dice(mut self, rolls: impl IntoIterator<Item = u32>) -> Self {
        self.dice.extend(rolls);
        self
    }

    /// Queues `range_inclusive` results (clamped into the requested range).
    pub fn with_ranges(mut self, values: impl IntoIterator<Item = u32>) -> Self {
        self.ranges.extend(values);
        self
    }

    /// Queues unit draws (clamped into `[0, 1)`).
    pub fn with_units(mut self, values: impl IntoIterator<Item = f64>) -> Self {
        self.units.extend(values);
        self
    }

    pub fn push_die(&mut self, roll: u32) {
        self.dice.push_back(roll);
    }

    pub fn push_unit(&mut self, value: f64) {
        self.units.push_back(value);
    }

    /// Total queued values not yet consumed.
    pub fn remaining(&self) -> usize {
        self.dice.len() + self.ranges.len() + self.units.len()
    }
}

impl RandomSource for ScriptedRolls {
    fn roll_die(&mut self, sides: u32) -> u32 {
        match self.dice.pop_front() {
            Some(roll) => roll.clamp(1, sides.max(1)),
            None => self.fallback.roll_die(sides),
        }
    }

    fn range_inclusive(&mut self, low: u32, high: u32) -> u32 {
        if high <= low {
            return low;
        }
        match self.ranges.pop_front() {
            Some(value) => value.clamp(low, high),
            None => self.fallback.range_inclusive(low, high),
        }
    }

    fn unit(&mut self) -> f64 {
        match self.units.pop_front() {
            Some(value) => value.clamp(0.0, 1.0 - f64::EPSILON),
            None => self.fallback.unit(),
        }
    }
}
