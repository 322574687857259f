//! Named predicates used by `CONDITIONAL_CHECK` and `DAMAGE_BONUS`
//!
//! Conditions see only the actor and the optional target. They fail open:
//! a missing or unknown name, or an entity the host can no longer resolve,
//! counts as passing.

use crate::host::EntityAccess;
use crate::identity::EntityId;
use std::str::FromStr;
use tracing::debug;

/// Entity types treated as undead
pub const UNDEAD_TYPES: &[&str] = &[
    "SKELETON",
    "ZOMBIE",
    "WITHER_SKELETON",
    "ZOMBIE_VILLAGER",
    "HUSK",
    "DROWNED",
    "PHANTOM",
    "WITHER",
];

const LOW_HEALTH_RATIO: f64 = 0.3;

/// A known condition
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Condition {
    /// There is a target and it is not undead
    EntityNotUndead,
    WearingLeatherArmor,
    NotWearingLeatherArmor,
    FullHealth,
    /// Actor below 30% of max health
    LowHealth,
    /// Target below 30% of max health
    TargetLowHealth,
}

impl Condition {
    pub fn evaluate<H: EntityAccess + ?Sized>(
        self,
        host: &H,
        actor: EntityId,
        target: Option<EntityId>,
    ) -> crate::Result<bool> {
        Ok(match self {
            Condition::EntityNotUndead => match target {
                Some(target) => {
                    let kind = host.entity_type(target)?;
                    !UNDEAD_TYPES.contains(&kind.as_str())
                }
                None => false,
            },
            Condition::WearingLeatherArmor => wears_leather(host, actor)?,
            Condition::NotWearingLeatherArmor => !wears_leather(host, actor)?,
            Condition::FullHealth => host.health(actor)? >= host.max_health(actor)?,
            Condition::LowHealth => is_low(host, actor)?,
            Condition::TargetLowHealth => match target {
                Some(target) => is_low(host, target)?,
                None => false,
            },
        })
    }
}

/// Evaluate a condition by name
pub fn check<H: EntityAccess + ?Sized>(
    name: Option<&str>,
    host: &H,
    actor: EntityId,
    target: Option<EntityId>,
) -> bool {
    let Some(name) = name else {
        return true;
    };
    let Ok(condition) = Condition::from_str(name.trim()) else {
        debug!(name, "unknown condition passes");
        return true;
    };
    condition.evaluate(host, actor, target).unwrap_or_else(|err| {
        debug!(%condition, %err, "condition could not be evaluated, passing");
        true
    })
}

fn wears_leather<H: EntityAccess + ?Sized>(host: &H, actor: EntityId) -> crate::Result<bool> {
    let equipment = host.equipment(actor)?;
    Ok(equipment
        .chestplate
        .is_some_and(|item| item.material.as_str() == "LEATHER_CHESTPLATE"))
}

fn is_low<H: EntityAccess + ?Sized>(host: &H, id: EntityId) -> crate::Result<bool> {
    Ok(host.health(id)? < host.max_health(id)? * LOW_HEALTH_RATIO)
}
