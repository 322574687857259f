//! Enchantment descriptors
//!
//! A descriptor is the immutable declaration of one enchantment. It holds no
//! per-item state; levels and charges live in the host's item store.

use crate::effect::EffectInstance;
use crate::error::{Error, Result};
use crate::identity::Material;
use crate::trigger::Trigger;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// Declaration of one enchantment; build with [`EnchantmentDescriptor::builder`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnchantmentDescriptor {
    id: String,
    display_name: String,
    description: Vec<String>,
    color: String,
    max_level: u8,
    required_level: u32,
    rarity: u32,
    curse: bool,
    chargeable: bool,
    max_charges: u32,
    visual_effects: bool,
    hidden: bool,
    primary_kinds: IndexSet<Material>,
    supported_kinds: IndexSet<Material>,
    conflicts: IndexSet<String>,
    triggers: Vec<Trigger>,
    effects: Vec<EffectInstance>,
}

impl EnchantmentDescriptor {
    pub fn builder(id: impl Into<String>) -> DescriptorBuilder {
        DescriptorBuilder::new(id)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn description(&self) -> &[String] {
        &self.description
    }

    /// Legacy color code, e.g. `&7`
    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn max_level(&self) -> u8 {
        self.max_level
    }

    pub fn required_level(&self) -> u32 {
        self.required_level
    }

    /// Relative weight; lower is rarer
    pub fn rarity(&self) -> u32 {
        self.rarity
    }

    pub fn is_curse(&self) -> bool {
        self.curse
    }

    pub fn is_chargeable(&self) -> bool {
        self.chargeable
    }

    pub fn max_charges(&self) -> u32 {
        self.max_charges
    }

    pub fn has_visual_effects(&self) -> bool {
        self.visual_effects
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn primary_kinds(&self) -> &IndexSet<Material> {
        &self.primary_kinds
    }

    /// Always a superset of [`Self::primary_kinds`]
    pub fn supported_kinds(&self) -> &IndexSet<Material> {
        &self.supported_kinds
    }

    pub fn conflicts(&self) -> &IndexSet<String> {
        &self.conflicts
    }

    pub fn triggers(&self) -> &[Trigger] {
        &self.triggers
    }

    pub fn effects(&self) -> &[EffectInstance] {
        &self.effects
    }

    pub fn has_trigger(&self, trigger: Trigger) -> bool {
        self.triggers.contains(&trigger)
    }

    pub fn has_effects(&self) -> bool {
        !self.effects.is_empty()
    }

    /// Whether the enchantment may be applied to this item kind
    pub fn can_enchant(&self, kind: &Material) -> bool {
        self.supported_kinds.contains(kind)
    }

    pub fn is_primary_for(&self, kind: &Material) -> bool {
        self.primary_kinds.contains(kind)
    }

    pub fn conflicts_with(&self, other: &str) -> bool {
        self.conflicts.contains(other)
    }

    /// Name with the level appended as a roman numeral, e.g. `Vampiric III`
    pub fn display_with_level(&self, level: u8) -> String {
        if self.max_level <= 1 {
            self.display_name.clone()
        } else {
            format!("{} {}", self.display_name, roman_numeral(level))
        }
    }
}

/// Roman numeral for 1..=10, decimal otherwise
pub fn roman_numeral(level: u8) -> String {
    const NUMERALS: [&str; 10] = ["I", "II", "III", "IV", "V", "VI", "VII", "VIII", "IX", "X"];
    match level {
        1..=10 => NUMERALS[level as usize - 1].to_string(),
        _ => level.to_string(),
    }
}

/// Builder for [`EnchantmentDescriptor`]
#[derive(Debug, Clone)]
pub struct DescriptorBuilder {
    inner: EnchantmentDescriptor,
}

impl DescriptorBuilder {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            inner: EnchantmentDescriptor {
                id: id.into(),
                display_name: String::new(),
                description: Vec::new(),
                color: "&7".to_string(),
                max_level: 1,
                required_level: 0,
                rarity: 10,
                curse: false,
                chargeable: false,
                max_charges: 0,
                visual_effects: true,
                hidden: false,
                primary_kinds: IndexSet::new(),
                supported_kinds: IndexSet::new(),
                conflicts: IndexSet::new(),
                triggers: Vec::new(),
                effects: Vec::new(),
            },
        }
    }

    pub fn display_name(mut self, name: impl Into<String>) -> Self {
        self.inner.display_name = name.into();
        self
    }

    pub fn description_line(mut self, line: impl Into<String>) -> Self {
        self.inner.description.push(line.into());
        self
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.inner.color = color.into();
        self
    }

    /// Clamped to at least 1
    pub fn max_level(mut self, level: u8) -> Self {
        self.inner.max_level = level.max(1);
        self
    }

    pub fn required_level(mut self, level: u32) -> Self {
        self.inner.required_level = level;
        self
    }

    pub fn rarity(mut self, rarity: u32) -> Self {
        self.inner.rarity = rarity;
        self
    }

    pub fn curse(mut self, curse: bool) -> Self {
        self.inner.curse = curse;
        self
    }

    /// Make the enchantment chargeable with `max_charges` charges
    pub fn charges(mut self, max_charges: u32) -> Self {
        self.inner.chargeable = true;
        self.inner.max_charges = max_charges;
        self
    }

    pub fn visual_effects(mut self, enabled: bool) -> Self {
        self.inner.visual_effects = enabled;
        self
    }

    pub fn hidden(mut self, hidden: bool) -> Self {
        self.inner.hidden = hidden;
        self
    }

    pub fn primary_kinds<I, M>(mut self, kinds: I) -> Self
    where
        I: IntoIterator<Item = M>,
        M: Into<Material>,
    {
        self.inner.primary_kinds.extend(kinds.into_iter().map(Into::into));
        self
    }

    pub fn supported_kinds<I, M>(mut self, kinds: I) -> Self
    where
        I: IntoIterator<Item = M>,
        M: Into<Material>,
    {
        self.inner.supported_kinds.extend(kinds.into_iter().map(Into::into));
        self
    }

    pub fn conflicts_with(mut self, id: impl Into<String>) -> Self {
        self.inner.conflicts.insert(id.into());
        self
    }

    pub fn trigger(mut self, trigger: Trigger) -> Self {
        if !self.inner.triggers.contains(&trigger) {
            self.inner.triggers.push(trigger);
        }
        self
    }

    pub fn effect(mut self, effect: EffectInstance) -> Self {
        self.inner.effects.push(effect);
        self
    }

    /// Validate and freeze
    ///
    /// Fails when the id or display name is blank. Primary kinds are folded
    /// into the supported kinds.
    pub fn build(self) -> Result<EnchantmentDescriptor> {
        let mut descriptor = self.inner;
        if descriptor.id.trim().is_empty() {
            return Err(Error::EmptyId);
        }
        if descriptor.display_name.trim().is_empty() {
            return Err(Error::EmptyDisplayName(descriptor.id));
        }
        let primary = descriptor.primary_kinds.clone();
        descriptor.supported_kinds.extend(primary);
        Ok(descriptor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::EffectKind;

    #[test]
    fn test_defaults() {
        let d = EnchantmentDescriptor::builder("glow").display_name("Glow").build().unwrap();
        assert_eq!(d.max_level(), 1);
        assert_eq!(d.rarity(), 10);
        assert_eq!(d.required_level(), 0);
        assert_eq!(d.color(), "&7");
        assert!(d.has_visual_effects());
        assert!(!d.is_chargeable());
        assert_eq!(d.max_charges(), 0);
        assert!(!d.is_curse());
        assert!(!d.is_hidden());
        assert!(!d.has_effects());
    }

    #[test]
    fn test_validation() {
        assert!(matches!(
            EnchantmentDescriptor::builder("").display_name("X").build(),
            Err(Error::EmptyId)
        ));
        assert!(matches!(
            EnchantmentDescriptor::builder("x").build(),
            Err(Error::EmptyDisplayName(id)) if id == "x"
        ));
    }

    #[test]
    fn test_primary_folded_into_supported() {
        let d = EnchantmentDescriptor::builder("vampiric")
            .display_name("Vampiric")
            .primary_kinds(["DIAMOND_SWORD"])
            .supported_kinds(["DIAMOND_AXE"])
            .build()
            .unwrap();
        assert!(d.can_enchant(&"DIAMOND_SWORD".into()));
        assert!(d.can_enchant(&"DIAMOND_AXE".into()));
        assert!(d.is_primary_for(&"DIAMOND_SWORD".into()));
        assert!(!d.is_primary_for(&"DIAMOND_AXE".into()));
        assert!(!d.can_enchant(&"BOW".into()));
    }

    #[test]
    fn test_triggers_and_effects() {
        let d = EnchantmentDescriptor::builder("frost")
            .display_name("Frost")
            .max_level(3)
            .charges(50)
            .trigger(Trigger::OnAttack)
            .trigger(Trigger::OnAttack)
            .effect(EffectInstance::new(EffectKind::ApplyPotion).with("type", "SLOWNESS"))
            .conflicts_with("vampiric")
            .build()
            .unwrap();
        assert_eq!(d.triggers(), &[Trigger::OnAttack]);
        assert!(d.has_trigger(Trigger::OnAttack));
        assert!(!d.has_trigger(Trigger::OnKill));
        assert!(d.has_effects());
        assert!(d.is_chargeable());
        assert_eq!(d.max_charges(), 50);
        assert!(d.conflicts_with("vampiric"));
        assert_eq!(d.display_with_level(2), "Frost II");
    }

    #[test]
    fn test_roman_numerals() {
        assert_eq!(roman_numeral(1), "I");
        assert_eq!(roman_numeral(4), "IV");
        assert_eq!(roman_numeral(10), "X");
        assert_eq!(roman_numeral(11), "11");
        assert_eq!(roman_numeral(0), "0");
    }
}
