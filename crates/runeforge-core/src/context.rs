//! Per-dispatch trigger context and the in-flight event outcome

use crate::formula::Variables;
use crate::host::{ItemRef, Location};
use crate::identity::{EntityId, Material};
use crate::region::BlockPos;
use crate::trigger::Trigger;
use serde::{Deserialize, Serialize};

/// Mutable view of the host event being processed
///
/// The host seeds the fields relevant to the event, the engine's effects
/// adjust them, and the host applies the result before finalizing the event.
/// Fields that do not apply to an event stay `None`; effects touching them are
/// no-ops.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    damage: Option<f64>,
    cancelled: bool,
    drop_quantity: Option<i64>,
    smelt_into: Option<Material>,
}

impl Outcome {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_damage(damage: f64) -> Self {
        Self {
            damage: Some(damage),
            ..Self::default()
        }
    }

    pub fn with_drops(quantity: i64) -> Self {
        Self {
            drop_quantity: Some(quantity),
            ..Self::default()
        }
    }

    pub fn damage(&self) -> Option<f64> {
        self.damage
    }

    /// Only takes effect on events that carry damage
    pub fn set_damage(&mut self, damage: f64) {
        if self.damage.is_some() {
            self.damage = Some(damage.max(0.0));
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn set_cancelled(&mut self, cancelled: bool) {
        self.cancelled = cancelled;
    }

    /// Experience (or item count) the event will drop
    pub fn drop_quantity(&self) -> Option<i64> {
        self.drop_quantity
    }

    pub fn set_drop_quantity(&mut self, quantity: i64) {
        if self.drop_quantity.is_some() {
            self.drop_quantity = Some(quantity.max(0));
        }
    }

    /// Replacement drop for a broken block
    pub fn smelt_into(&self) -> Option<&Material> {
        self.smelt_into.as_ref()
    }

    pub fn set_smelt_into(&mut self, material: Material) {
        self.smelt_into = Some(material);
    }
}

/// The block an event is about
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockTarget {
    pub pos: BlockPos,
    pub material: Material,
}

/// Everything one effect list sees while executing
///
/// Built per enchantment per dispatch and dropped afterwards.
#[derive(Debug)]
pub struct TriggerContext<'a> {
    pub trigger: Trigger,
    pub actor: EntityId,
    /// The other party: victim of an attack, attacker of a damage event
    pub target: Option<EntityId>,
    /// The item carrying the enchantment
    pub tool: Option<ItemRef>,
    pub location: Location,
    pub block: Option<BlockTarget>,
    pub variables: Variables,
    pub outcome: &'a mut Outcome,
}

impl<'a> TriggerContext<'a> {
    pub fn new(trigger: Trigger, actor: EntityId, location: Location, outcome: &'a mut Outcome) -> Self {
        Self {
            trigger,
            actor,
            target: None,
            tool: None,
            location,
            block: None,
            variables: Variables::new(),
            outcome,
        }
    }

    pub fn with_target(mut self, target: Option<EntityId>) -> Self {
        self.target = target;
        self
    }

    pub fn with_tool(mut self, tool: Option<ItemRef>) -> Self {
        self.tool = tool;
        self
    }

    pub fn with_block(mut self, block: Option<BlockTarget>) -> Self {
        self.block = block;
        self
    }

    pub fn with_variables(mut self, variables: Variables) -> Self {
        self.variables = variables;
        self
    }

    pub fn variable(&self, name: &str) -> Option<f64> {
        self.variables.get(name).copied()
    }

    /// Enchantment level, 1 when unset
    pub fn level(&self) -> f64 {
        self.variable("level").unwrap_or(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_fields_only_apply_when_present() {
        let mut outcome = Outcome::new();
        outcome.set_damage(5.0);
        outcome.set_drop_quantity(3);
        assert_eq!(outcome.damage(), None);
        assert_eq!(outcome.drop_quantity(), None);

        let mut outcome = Outcome::with_damage(4.0);
        outcome.set_damage(-1.0);
        assert_eq!(outcome.damage(), Some(0.0));

        let mut outcome = Outcome::with_drops(10);
        outcome.set_drop_quantity(25);
        assert_eq!(outcome.drop_quantity(), Some(25));
    }

    #[test]
    fn test_context_level_default() {
        let mut outcome = Outcome::new();
        let mut ctx = TriggerContext::new(Trigger::Passive, EntityId(1), Location::default(), &mut outcome);
        assert_eq!(ctx.level(), 1.0);
        ctx.variables.insert("level".into(), 3.0);
        assert_eq!(ctx.level(), 3.0);
        assert_eq!(ctx.variable("damage"), None);
    }
}
