//! Effect execution
//!
//! [`execute`] runs one enchantment's effect list against a trigger context.
//! Before anything runs, the list is scanned once for `CONDITIONAL_CHECK`
//! entries; the first one that fails ends the scan, and only the effects
//! declared before it run. Checks themselves have no side effects.
//!
//! A failing effect (typically an entity the host no longer knows) is logged
//! and skipped; the rest of the list still runs. Cancelling the outcome does
//! not stop the list either.

use crate::condition;
use crate::context::TriggerContext;
use crate::effect::{EffectInstance, EffectKind};
use crate::error::Result;
use crate::host::{Host, PotionSpec};
use crate::identity::{EntityId, Material};
use crate::param::EffectParams;
use crate::region::{find_region, is_preferred_tool, is_unbreakable, BlockPos, Connectivity};
use crate::rng::GameRng;
use crate::schedule::{DeferredTask, Tick};
use crate::smelting::smelt_result;
use indexmap::IndexSet;
use tracing::{debug, trace, warn};

/// Largest radius `BREAK_BLOCKS` will search
pub const MAX_AREA_RADIUS: i32 = 8;

/// What one call to [`execute`] did
#[derive(Debug, Clone, Default)]
pub struct ExecutionReport {
    /// Non-conditional effects that completed, in order
    pub applied: Vec<EffectKind>,
    /// Index of the `CONDITIONAL_CHECK` that stopped the chain
    pub gated_at: Option<usize>,
    /// Effects that failed and were skipped
    pub failures: usize,
    /// Blocks removed by region breaks (origin excluded)
    pub blocks_broken: usize,
    /// Work to schedule, as (delay, task)
    pub deferred: Vec<(Tick, DeferredTask)>,
}

impl ExecutionReport {
    pub fn applied(&self, kind: EffectKind) -> bool {
        self.applied.contains(&kind)
    }
}

/// Execute `effects` in declaration order under the conditional-chain rule
pub fn execute<H: Host + ?Sized>(
    effects: &[EffectInstance],
    ctx: &mut TriggerContext<'_>,
    host: &mut H,
    rng: &mut GameRng,
) -> ExecutionReport {
    let mut report = ExecutionReport::default();

    let gate = effects.iter().position(|effect| {
        effect.is_conditional()
            && !condition::check(effect.params.text("condition"), &*host, ctx.actor, ctx.target)
    });
    if let Some(index) = gate {
        trace!(index, trigger = %ctx.trigger, "effect chain gated by condition");
    }
    report.gated_at = gate;

    let runnable = &effects[..gate.unwrap_or(effects.len())];
    for effect in runnable.iter().filter(|effect| !effect.is_conditional()) {
        match apply(effect, ctx, host, rng, &mut report) {
            Ok(()) => report.applied.push(effect.kind),
            Err(err) => {
                report.failures += 1;
                warn!(kind = %effect.kind, actor = %ctx.actor, %err, "effect skipped");
            }
        }
    }
    report
}

fn apply<H: Host + ?Sized>(
    effect: &EffectInstance,
    ctx: &mut TriggerContext<'_>,
    host: &mut H,
    rng: &mut GameRng,
    report: &mut ExecutionReport,
) -> Result<()> {
    let params = &effect.params;
    match effect.kind {
        EffectKind::HealPlayer => heal(params, ctx, host),
        EffectKind::DamageNearby => damage_nearby(params, ctx, host),
        EffectKind::DamageBonus => {
            if let Some(name) = params.text("condition") {
                if !condition::check(Some(name), &*host, ctx.actor, ctx.target) {
                    return Ok(());
                }
            }
            let amount = params.number("amount", &ctx.variables, 0.0);
            if let Some(damage) = ctx.outcome.damage() {
                ctx.outcome.set_damage(damage + amount);
            }
            Ok(())
        }
        EffectKind::ApplyPotion => apply_potion(params, ctx, host),
        EffectKind::BreakBlocks => {
            report.blocks_broken += break_area(params, ctx, host);
            Ok(())
        }
        EffectKind::AutoSmelt => {
            if let Some(result) = ctx.block.as_ref().and_then(|b| smelt_result(&b.material)) {
                ctx.outcome.set_smelt_into(result);
            }
            Ok(())
        }
        EffectKind::SpawnLightning => {
            let damaging = params.boolean("damaging", false);
            let at = match ctx.target {
                Some(target) => host.location(target)?,
                None => ctx.location,
            };
            host.strike_lightning(at, damaging);
            Ok(())
        }
        EffectKind::ReflectDamage => {
            let Some(attacker) = ctx.target else {
                return Ok(());
            };
            let percent = params.number("percent", &ctx.variables, 0.0);
            let taken = ctx
                .variable("finalDamage")
                .or_else(|| ctx.outcome.damage())
                .unwrap_or(0.0);
            let reflected = taken * percent;
            if reflected > 0.0 {
                host.damage(attacker, reflected, Some(ctx.actor))?;
            }
            Ok(())
        }
        EffectKind::IncreaseDrops => {
            let drop_type = params.text_or("dropType", "experience");
            if !drop_type.eq_ignore_ascii_case("experience") {
                debug!(drop_type, "unsupported drop type ignored");
                return Ok(());
            }
            let multiplier = params.number("multiplier", &ctx.variables, 1.0);
            if let Some(quantity) = ctx.outcome.drop_quantity() {
                ctx.outcome.set_drop_quantity((quantity as f64 * multiplier) as i64);
            }
            Ok(())
        }
        EffectKind::NegateDamage => {
            let chance = params.number("chance", &ctx.variables, 1.0);
            if rng.chance(chance) {
                ctx.outcome.set_cancelled(true);
            }
            Ok(())
        }
        EffectKind::VeinMine => {
            report.blocks_broken += vein_mine(params, ctx, host);
            Ok(())
        }
        EffectKind::Magnetism => {
            let radius = params.number("radius", &ctx.variables, 5.0);
            let moved = host.attract_items(ctx.actor, radius);
            trace!(moved, "items attracted");
            Ok(())
        }
        EffectKind::AutoReplant => {
            if let Some(task) = replant_task(params, ctx) {
                let delay = params.number("delay", &ctx.variables, 0.0).max(0.0) as Tick;
                report.deferred.push((delay, task));
            }
            Ok(())
        }
        EffectKind::SpeedBoost => {
            let potion = PotionSpec::new(
                "SPEED",
                params.number("duration", &ctx.variables, 40.0) as i64,
                params.number("amplifier", &ctx.variables, 0.0) as i64,
            );
            give_potion(host, ctx.actor, &potion)
        }
        EffectKind::PreventDeath => {
            let keep = params.number("health", &ctx.variables, 1.0);
            let health = host.health(ctx.actor)?;
            ctx.outcome.set_damage((health - keep).max(0.0));
            for (name, duration, amplifier) in
                [("REGENERATION", 100, 1), ("FIRE_RESISTANCE", 100, 0), ("ABSORPTION", 100, 1)]
            {
                give_potion(host, ctx.actor, &PotionSpec::new(name, duration, amplifier))?;
            }
            Ok(())
        }
        EffectKind::CurseEffect => {
            let Some(name) = params.text("curseType").or_else(|| params.text("type")) else {
                return Ok(());
            };
            self_potion(params, ctx, host, name)
        }
        EffectKind::IncreaseDurabilityDamage => {
            if let Some(tool) = &ctx.tool {
                let extra = params.number("extraDamage", &ctx.variables, ctx.level()).max(0.0);
                host.damage_item(tool.id, extra as u32);
            }
            Ok(())
        }
        EffectKind::SpawnParticles => {
            let kind = params.text_or("type", "ENCHANT");
            let count = params.number("count", &ctx.variables, 10.0).max(0.0) as u32;
            let spread = params.number("spread", &ctx.variables, 0.5);
            host.spawn_particles(ctx.location, kind, count, spread);
            Ok(())
        }
        EffectKind::DrainHunger => {
            let amount = params.number("amount", &ctx.variables, 1.0) as i64;
            let saturation = params.number("saturation", &ctx.variables, 0.0);
            let (food, current) = host.food(ctx.actor)?;
            host.set_food(ctx.actor, food.saturating_sub(amount).max(0), (current - saturation).max(0.0))
        }
        EffectKind::IncreaseDamageTaken => {
            let multiplier = params.number("multiplier", &ctx.variables, 1.0);
            if let Some(damage) = ctx.outcome.damage() {
                ctx.outcome.set_damage(damage * multiplier);
            }
            Ok(())
        }
        EffectKind::ReduceMaxHealth => {
            let amount = params.number("amount", &ctx.variables, 2.0);
            let duration = params.number("duration", &ctx.variables, 100.0) as i64;
            let potion = PotionSpec::new("HEALTH_BOOST", duration, -((amount / 4.0) as i64));
            give_potion(host, ctx.actor, &potion)
        }
        EffectKind::ApplyDebuff => {
            let Some(name) = params.text("type") else {
                return Ok(());
            };
            self_potion(params, ctx, host, name)
        }
        EffectKind::DamageSelf => {
            if !params.contains("amount") {
                return Ok(());
            }
            let amount = params.number("amount", &ctx.variables, 0.0).max(0.0);
            if params.boolean("ignoreArmor", false) {
                let health = host.health(ctx.actor)?;
                host.set_health(ctx.actor, (health - amount).max(0.0))
            } else {
                host.damage(ctx.actor, amount, None)
            }
        }
        EffectKind::ConditionalCheck => Ok(()),
    }
}

fn heal<H: Host + ?Sized>(params: &EffectParams, ctx: &TriggerContext<'_>, host: &mut H) -> Result<()> {
    let amount = params.number("amount", &ctx.variables, 0.0);
    let health = host.health(ctx.actor)?;
    let max = host.max_health(ctx.actor)?;
    host.set_health(ctx.actor, (health + amount).min(max).max(0.0))
}

/// Damage up to `maxTargets` living entities around the context location,
/// skipping the actor and the entity already involved in the event
fn damage_nearby<H: Host + ?Sized>(
    params: &EffectParams,
    ctx: &TriggerContext<'_>,
    host: &mut H,
) -> Result<()> {
    if !params.contains("damage") {
        return Ok(());
    }
    let radius = params.number("radius", &ctx.variables, 4.0);
    let damage = params.number("damage", &ctx.variables, 0.0);
    let max_targets = params.number("maxTargets", &ctx.variables, 3.0).max(0.0) as usize;

    let victims: Vec<EntityId> = host
        .nearby_living(ctx.location, radius)
        .into_iter()
        .filter(|&id| id != ctx.actor && Some(id) != ctx.target)
        .take(max_targets)
        .collect();
    for victim in victims {
        if let Err(err) = host.damage(victim, damage, Some(ctx.actor)) {
            debug!(%victim, %err, "nearby target vanished");
        }
    }
    Ok(())
}

fn apply_potion<H: Host + ?Sized>(
    params: &EffectParams,
    ctx: &TriggerContext<'_>,
    host: &mut H,
) -> Result<()> {
    let Some(name) = params.text("type") else {
        return Ok(());
    };
    let recipient = match params.text_or("target", "self").to_ascii_lowercase().as_str() {
        "victim" | "target" | "other" => ctx.target.unwrap_or(ctx.actor),
        _ => ctx.actor,
    };
    let potion = PotionSpec {
        ambient: params.boolean("ambient", true),
        particles: params.boolean("particles", false),
        ..PotionSpec::new(
            name,
            params.number("duration", &ctx.variables, 100.0) as i64,
            params.number("amplifier", &ctx.variables, 0.0) as i64,
        )
    };
    give_potion(host, recipient, &potion)
}

fn self_potion<H: Host + ?Sized>(
    params: &EffectParams,
    ctx: &TriggerContext<'_>,
    host: &mut H,
    name: &str,
) -> Result<()> {
    let potion = PotionSpec::new(
        name,
        params.number("duration", &ctx.variables, 100.0) as i64,
        params.number("amplifier", &ctx.variables, 0.0) as i64,
    );
    give_potion(host, ctx.actor, &potion)
}

fn give_potion<H: Host + ?Sized>(host: &mut H, who: EntityId, potion: &PotionSpec) -> Result<()> {
    if !host.apply_potion(who, potion)? {
        debug!(effect = %potion.effect, "unknown potion type ignored");
    }
    Ok(())
}

/// Area mining: same-kind blocks within the radius box, face-connected to the origin
fn break_area<H: Host + ?Sized>(params: &EffectParams, ctx: &TriggerContext<'_>, host: &mut H) -> usize {
    let Some(block) = &ctx.block else {
        return 0;
    };
    let tool = ctx.tool.as_ref().map(|t| &t.material);
    if !is_preferred_tool(tool, &block.material) {
        return 0;
    }
    let radius = (params.number("radius", &ctx.variables, 1.0).max(0.0) as i32).min(MAX_AREA_RADIUS);
    let side = (2 * radius + 1) as usize;
    let max_blocks = side.pow(3) - 1;

    let world: &H = host;
    let region = find_region(
        block.pos,
        |pos| {
            if pos.chebyshev(&block.pos) > radius {
                return false;
            }
            let found = world.block_at(pos);
            found == block.material && !is_unbreakable(&found) && is_preferred_tool(tool, &found)
        },
        Connectivity::Faces,
        max_blocks,
    );
    break_region(region, block.pos, ctx, host)
}

/// Vein mining: same-kind blocks connected to the origin, diagonals included by default
fn vein_mine<H: Host + ?Sized>(params: &EffectParams, ctx: &TriggerContext<'_>, host: &mut H) -> usize {
    let Some(block) = &ctx.block else {
        return 0;
    };
    if !is_preferred_tool(ctx.tool.as_ref().map(|t| &t.material), &block.material) {
        return 0;
    }
    let max_blocks = params.number("maxBlocks", &ctx.variables, 16.0).max(1.0) as usize;
    let connectivity = if params.boolean("diagonal", true) {
        Connectivity::Cube
    } else {
        Connectivity::Faces
    };

    let world: &H = host;
    let region = find_region(
        block.pos,
        |pos| world.block_at(pos) == block.material,
        connectivity,
        max_blocks,
    );
    break_region(region, block.pos, ctx, host)
}

/// Break every block of `region` except the origin; returns how many were not cancelled
fn break_region<H: Host + ?Sized>(
    region: IndexSet<BlockPos>,
    origin: BlockPos,
    ctx: &TriggerContext<'_>,
    host: &mut H,
) -> usize {
    let mut broken = 0;
    for pos in region.into_iter().filter(|pos| *pos != origin) {
        if host.break_block(pos, ctx.actor, ctx.tool.as_ref()) {
            trace!(%pos, "region break cancelled by host");
        } else {
            broken += 1;
        }
    }
    if broken > 0 {
        debug!(actor = %ctx.actor, broken, "region broken");
    }
    broken
}

/// Which block to put back where the broken one was
///
/// With `blockType` set, only matching blocks are replanted and the matched
/// fragment is swapped for `replantType` (`OAK_LEAVES` → `OAK_SAPLING`).
fn replant_task(params: &EffectParams, ctx: &TriggerContext<'_>) -> Option<DeferredTask> {
    let block = ctx.block.as_ref()?;
    let replant = params.text("replantType")?.to_ascii_uppercase();
    let material = match params.text("blockType") {
        Some(fragment) => {
            let fragment = fragment.to_ascii_uppercase();
            if !block.material.contains(&fragment) {
                return None;
            }
            Material::new(block.material.as_str().replace(&fragment, &replant))
        }
        None => Material::new(replant),
    };
    Some(DeferredTask::PlaceBlock {
        pos: block.pos,
        material,
    })
}
