//! Seedable random source for chance-based effects
//!
//! xorshift64, so that a seeded engine replays the same damage negations and
//! bonus enchant rolls in tests and on every platform.

use serde::{Deserialize, Serialize};

/// Deterministic xorshift64 generator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameRng {
    state: u64,
}

impl GameRng {
    pub fn new(seed: u64) -> Self {
        // xorshift is stuck at zero
        Self {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    /// Current state, for persisting and resuming the sequence
    pub fn state(&self) -> u64 {
        self.state
    }

    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Uniform value in [0, 1)
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() as f64) / (u64::MAX as f64 + 1.0)
    }

    /// Uniform integer in [min, max]; returns `min` when the range is empty
    pub fn range_i64(&mut self, min: i64, max: i64) -> i64 {
        if max <= min {
            return min;
        }
        let span = (max - min + 1) as u64;
        min + (self.next_u64() % span) as i64
    }

    /// One draw, true with the given probability
    pub fn chance(&mut self, probability: f64) -> bool {
        self.next_f64() < probability
    }

    pub fn pick<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        if slice.is_empty() {
            None
        } else {
            let i = (self.next_u64() as usize) % slice.len();
            Some(&slice[i])
        }
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self::new(0x5eed_cafe)
    }
}
