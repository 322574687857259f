//! Effect kinds and effect instances
//!
//! An effect instance is a kind plus the parameters that kind reads. The
//! behavior of every kind lives in [`crate::executor`].

use crate::param::{EffectParams, ParamValue};
use serde::{Deserialize, Serialize};

/// The closed set of effect behaviors
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
pub enum EffectKind {
    // === Health and damage ===
    HealPlayer,
    DamageNearby,
    DamageBonus,
    ReflectDamage,
    NegateDamage,
    PreventDeath,
    IncreaseDamageTaken,
    DamageSelf,

    // === Potions ===
    ApplyPotion,
    SpeedBoost,
    CurseEffect,
    ReduceMaxHealth,
    ApplyDebuff,

    // === Blocks and drops ===
    BreakBlocks,
    VeinMine,
    AutoSmelt,
    AutoReplant,
    IncreaseDrops,
    Magnetism,

    // === World and items ===
    SpawnLightning,
    SpawnParticles,
    IncreaseDurabilityDamage,
    DrainHunger,

    // === Control ===
    /// Gates the effects declared after it; has no side effect of its own
    ConditionalCheck,
}

/// One effect declared by an enchantment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectInstance {
    pub kind: EffectKind,
    #[serde(default)]
    pub params: EffectParams,
}

impl EffectInstance {
    pub fn new(kind: EffectKind) -> Self {
        Self {
            kind,
            params: EffectParams::new(),
        }
    }

    /// Builder-style parameter
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.params.insert(key, value);
        self
    }

    /// Shorthand for a `CONDITIONAL_CHECK` on a named condition
    pub fn condition(name: &str) -> Self {
        Self::new(EffectKind::ConditionalCheck).with("condition", name)
    }

    pub fn is_conditional(&self) -> bool {
        self.kind == EffectKind::ConditionalCheck
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_kind_names() {
        assert_eq!(EffectKind::IncreaseDurabilityDamage.as_ref(), "INCREASE_DURABILITY_DAMAGE");
        assert_eq!(EffectKind::from_str("vein_mine").ok(), Some(EffectKind::VeinMine));
        assert!(EffectKind::from_str("TELEPORT").is_err());
    }

    #[test]
    fn test_instance_builder() {
        let effect = EffectInstance::new(EffectKind::HealPlayer).with("amount", "damage * 0.25");
        assert!(!effect.is_conditional());
        assert_eq!(effect.params.text("amount"), Some("damage * 0.25"));

        let check = EffectInstance::condition("full_health");
        assert!(check.is_conditional());
        assert_eq!(check.params.text("condition"), Some("full_health"));
    }
}
