//! Engine configuration
//!
//! Loaded from RON by the host (or built in code), then clamped to sane
//! ranges. Every field has a default, so a config file only needs the values
//! it overrides:
//!
//! ```
//! use runeforge_core::EngineConfig;
//!
//! let config = EngineConfig::from_ron_str("(periodic_interval_ticks: 40)").unwrap();
//! assert_eq!(config.periodic_interval_ticks(), 40);
//! assert_eq!(config.bonus_enchant_delay_ticks(), 2);
//! ```

use crate::error::Result;
use crate::schedule::Tick;
use serde::{Deserialize, Serialize};

/// Tunables for [`crate::Engine`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Ticks between periodic passes; 20 is once per second on a 20 TPS server
    ///
    /// Clamped to at least 1.
    periodic_interval_ticks: Tick,
    /// Delay before a bonus enchantment is written to the enchanted item
    bonus_enchant_delay_ticks: Tick,
    /// Probability of a bonus enchantment per enchanting action, clamped to `[0, 1]`
    bonus_enchant_chance: f64,
    /// Seed for chance-based effects and bonus rolls
    rng_seed: u64,
    /// Re-check the unlock gate on every trigger, not only when enchanting
    enforce_unlock_on_trigger: bool,
}

impl EngineConfig {
    /// Parse a RON document and clamp the result
    pub fn from_ron_str(source: &str) -> Result<Self> {
        let config: Self = ron::from_str(source)?;
        Ok(config.clamped())
    }

    fn clamped(mut self) -> Self {
        self.periodic_interval_ticks = self.periodic_interval_ticks.max(1);
        self.bonus_enchant_chance = if self.bonus_enchant_chance.is_nan() {
            Self::default().bonus_enchant_chance
        } else {
            self.bonus_enchant_chance.clamp(0.0, 1.0)
        };
        self
    }

    pub fn periodic_interval_ticks(&self) -> Tick {
        self.periodic_interval_ticks
    }

    pub fn bonus_enchant_delay_ticks(&self) -> Tick {
        self.bonus_enchant_delay_ticks
    }

    pub fn bonus_enchant_chance(&self) -> f64 {
        self.bonus_enchant_chance
    }

    pub fn rng_seed(&self) -> u64 {
        self.rng_seed
    }

    pub fn enforce_unlock_on_trigger(&self) -> bool {
        self.enforce_unlock_on_trigger
    }

    pub fn with_periodic_interval(mut self, ticks: Tick) -> Self {
        self.periodic_interval_ticks = ticks;
        self.clamped()
    }

    pub fn with_bonus_enchant_delay(mut self, ticks: Tick) -> Self {
        self.bonus_enchant_delay_ticks = ticks;
        self
    }

    pub fn with_bonus_enchant_chance(mut self, chance: f64) -> Self {
        self.bonus_enchant_chance = chance;
        self.clamped()
    }

    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = seed;
        self
    }

    pub fn with_unlock_enforcement(mut self, enforce: bool) -> Self {
        self.enforce_unlock_on_trigger = enforce;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            periodic_interval_ticks: 20,
            bonus_enchant_delay_ticks: 2,
            bonus_enchant_chance: 0.3,
            rng_seed: 0x5eed_cafe,
            enforce_unlock_on_trigger: false,
        }
    }
}
