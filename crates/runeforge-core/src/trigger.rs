//! Occasions on which enchantment effects fire

use serde::{Deserialize, Serialize};

/// A named occasion on which effects may fire
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum Trigger {
    /// The wielder hits an entity (main hand)
    OnAttack,
    /// The wearer takes damage from any source (armor)
    OnDamaged,
    /// The wielder breaks a block (main hand)
    OnBlockBreak,
    /// The wielder kills an entity (main hand)
    OnKill,
    /// Evaluated by the periodic driver; never consumes charges
    Passive,
    /// The wearer moves to a different block (boots)
    OnMove,
    /// The wearer takes fall damage (boots)
    OnFall,
    /// The wearer takes damage at least equal to current health (armor)
    OnLethalDamage,
    /// The item is placed as a block
    OnBlockPlace,
    /// Evaluated by the periodic driver; consumes charges
    Periodic,
}

impl Trigger {
    /// Whether a successful execution on this trigger spends a charge
    pub fn consumes_charge(self) -> bool {
        !matches!(self, Trigger::Passive)
    }

    /// Triggers evaluated by the periodic driver, in evaluation order
    pub fn periodic() -> [Trigger; 2] {
        [Trigger::Passive, Trigger::Periodic]
    }
}
