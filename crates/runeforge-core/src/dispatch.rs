//! Trigger dispatch
//!
//! The [`Engine`] turns host events into triggers, finds the enchanted items
//! involved, and runs each matching enchantment's effects. It also owns the
//! server-tick side of the system: the deferred task queue and the periodic
//! PASSIVE/PERIODIC pass.
//!
//! Per item, enchantments run in the item store's iteration order. An
//! enchantment is skipped when it is unknown to the catalog, does not declare
//! the trigger, has no effects, or is chargeable and out of charges. After it
//! runs, one charge is spent (PASSIVE never spends).

use crate::catalog::Catalog;
use crate::charges;
use crate::config::EngineConfig;
use crate::context::{BlockTarget, Outcome, TriggerContext};
use crate::error::Result;
use crate::executor;
use crate::formula::Variables;
use crate::host::{EntityAccess, Host, ItemRef, ItemStore, Location};
use crate::identity::{EntityId, ItemId, Material};
use crate::region::BlockPos;
use crate::rng::GameRng;
use crate::schedule::{DeferredTask, Scheduler, Tick};
use crate::trigger::Trigger;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, trace, warn};

/// Why an entity took damage, as far as the engine cares
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum DamageCause {
    Fall,
    EntityAttack,
    Projectile,
    Fire,
    Other,
}

/// A host occurrence the engine reacts to
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// `attacker` hit `victim` with their main hand
    Attack {
        attacker: EntityId,
        victim: EntityId,
        damage: f64,
    },
    /// `victim` is about to take damage
    Damaged {
        victim: EntityId,
        damager: Option<EntityId>,
        cause: DamageCause,
        damage: f64,
        final_damage: f64,
    },
    /// `actor` broke a block; `region_break` marks breaks the engine itself caused
    BlockBreak {
        actor: EntityId,
        pos: BlockPos,
        block: Material,
        experience: i64,
        region_break: bool,
    },
    Kill {
        killer: EntityId,
        victim: EntityId,
        experience: i64,
    },
    Move {
        actor: EntityId,
        from: Location,
        to: Location,
    },
    /// `actor` placed `item` as `block` at `pos`
    BlockPlace {
        actor: EntityId,
        pos: BlockPos,
        block: Material,
        item: ItemRef,
    },
}

impl GameEvent {
    /// The outcome the host hands in before any effect runs
    pub fn initial_outcome(&self) -> Outcome {
        match self {
            GameEvent::Attack { damage, .. } | GameEvent::Damaged { damage, .. } => {
                Outcome::with_damage(*damage)
            }
            GameEvent::BlockBreak { experience, .. } | GameEvent::Kill { experience, .. } => {
                Outcome::with_drops(*experience)
            }
            GameEvent::Move { .. } | GameEvent::BlockPlace { .. } => Outcome::new(),
        }
    }
}

/// What one server tick did
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub tick: Tick,
    /// Deferred tasks that ran to completion
    pub deferred_run: usize,
    /// Whether this tick ran the periodic pass
    pub periodic: bool,
    /// Enchantment executions during the periodic pass
    pub periodic_executions: usize,
    /// Actors skipped because the host could not resolve them
    pub failed_actors: usize,
}

/// Shared inputs for every enchantment fired by one event
struct Site {
    actor: EntityId,
    target: Option<EntityId>,
    location: Location,
    block: Option<BlockTarget>,
    variables: Variables,
}

/// The dispatch engine
pub struct Engine {
    catalog: Arc<Catalog>,
    config: EngineConfig,
    rng: GameRng,
    scheduler: Scheduler,
    tick: Tick,
}

impl Engine {
    pub fn new(catalog: Arc<Catalog>, config: EngineConfig) -> Self {
        Self {
            rng: GameRng::new(config.rng_seed()),
            catalog,
            config,
            scheduler: Scheduler::new(),
            tick: 0,
        }
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn current_tick(&self) -> Tick {
        self.tick
    }

    pub fn pending_tasks(&self) -> usize {
        self.scheduler.pending()
    }

    /// Handle one host event and return the adjusted outcome
    ///
    /// If the host cannot resolve the acting entity the event passes through
    /// unchanged.
    pub fn dispatch<H: Host + ?Sized>(&mut self, host: &mut H, event: &GameEvent) -> Outcome {
        let mut outcome = event.initial_outcome();
        if let Err(err) = self.route(host, event, &mut outcome) {
            debug!(?event, %err, "event skipped");
        }
        outcome
    }

    fn route<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        event: &GameEvent,
        outcome: &mut Outcome,
    ) -> Result<()> {
        match event {
            &GameEvent::Attack {
                attacker,
                victim,
                damage,
            } => {
                let Some(weapon) = host.equipment(attacker)?.main_hand else {
                    return Ok(());
                };
                let mut variables = actor_variables(host, attacker)?;
                variables.insert("damage".into(), damage);
                variables.insert("baseDamage".into(), damage);
                if let Ok(health) = host.health(victim) {
                    variables.insert("targetHealth".into(), health);
                }
                if let Ok(max) = host.max_health(victim) {
                    variables.insert("targetMaxHealth".into(), max);
                }
                let site = Site {
                    actor: attacker,
                    target: Some(victim),
                    location: host.location(victim)?,
                    block: None,
                    variables,
                };
                self.fire(host, Trigger::OnAttack, &weapon, &site, outcome);
            }
            &GameEvent::Damaged {
                victim,
                damager,
                cause,
                damage,
                final_damage,
            } => {
                let equipment = host.equipment(victim)?;
                let health = host.health(victim)?;
                let mut variables = actor_variables(host, victim)?;
                variables.insert("damage".into(), damage);
                variables.insert("baseDamage".into(), damage);
                variables.insert("finalDamage".into(), final_damage);
                let site = Site {
                    actor: victim,
                    target: damager,
                    location: host.location(victim)?,
                    block: None,
                    variables,
                };
                let armor = equipment.armor();
                for piece in &armor {
                    self.fire(host, Trigger::OnDamaged, piece, &site, outcome);
                }
                if cause == DamageCause::Fall {
                    if let Some(boots) = &equipment.boots {
                        self.fire(host, Trigger::OnFall, boots, &site, outcome);
                    }
                }
                // Lethality is judged on the damage left after ON_DAMAGED/ON_FALL
                let incoming = outcome.damage().unwrap_or(final_damage);
                if incoming >= health && !outcome.is_cancelled() {
                    for piece in &armor {
                        self.fire(host, Trigger::OnLethalDamage, piece, &site, outcome);
                    }
                }
            }
            GameEvent::BlockBreak {
                actor,
                pos,
                block,
                experience,
                region_break,
            } => {
                if *region_break {
                    return Ok(());
                }
                let Some(tool) = host.equipment(*actor)?.main_hand else {
                    return Ok(());
                };
                let mut variables = actor_variables(host, *actor)?;
                variables.insert("experience".into(), *experience as f64);
                let site = Site {
                    actor: *actor,
                    target: None,
                    location: (*pos).into(),
                    block: Some(BlockTarget {
                        pos: *pos,
                        material: block.clone(),
                    }),
                    variables,
                };
                self.fire(host, Trigger::OnBlockBreak, &tool, &site, outcome);
            }
            &GameEvent::Kill {
                killer,
                victim,
                experience,
            } => {
                let Some(weapon) = host.equipment(killer)?.main_hand else {
                    return Ok(());
                };
                let mut variables = actor_variables(host, killer)?;
                variables.insert("experience".into(), experience as f64);
                let site = Site {
                    actor: killer,
                    target: Some(victim),
                    location: host.location(killer)?,
                    block: None,
                    variables,
                };
                self.fire(host, Trigger::OnKill, &weapon, &site, outcome);
            }
            &GameEvent::Move { actor, from, to } => {
                if from.block() == to.block() {
                    return Ok(());
                }
                let Some(boots) = host.equipment(actor)?.boots else {
                    return Ok(());
                };
                let site = Site {
                    actor,
                    target: None,
                    location: to,
                    block: None,
                    variables: actor_variables(host, actor)?,
                };
                self.fire(host, Trigger::OnMove, &boots, &site, outcome);
            }
            GameEvent::BlockPlace {
                actor,
                pos,
                block,
                item,
            } => {
                let site = Site {
                    actor: *actor,
                    target: None,
                    location: (*pos).into(),
                    block: Some(BlockTarget {
                        pos: *pos,
                        material: block.clone(),
                    }),
                    variables: actor_variables(host, *actor)?,
                };
                self.fire(host, Trigger::OnBlockPlace, item, &site, outcome);
            }
        }
        Ok(())
    }

    /// Run every enchantment on `item` that reacts to `trigger`; returns how many ran
    fn fire<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        trigger: Trigger,
        item: &ItemRef,
        site: &Site,
        outcome: &mut Outcome,
    ) -> usize {
        let mut executed = 0;
        for (id, level) in host.attached(item.id) {
            let Some(descriptor) = self.catalog.get(&id) else {
                trace!(enchant = %id, %item.id, "unknown enchantment on item");
                continue;
            };
            if !descriptor.has_trigger(trigger) || !descriptor.has_effects() {
                continue;
            }
            if !charges::has_charge(&*host, item.id, &descriptor) {
                debug!(enchant = %id, %item.id, "out of charges");
                continue;
            }
            if self.config.enforce_unlock_on_trigger() && !host.meets_requirement(site.actor, &descriptor) {
                trace!(enchant = %id, actor = %site.actor, "enchantment locked for actor");
                continue;
            }

            let mut variables = site.variables.clone();
            variables.insert("level".into(), level as f64);
            let mut ctx = TriggerContext::new(trigger, site.actor, site.location, &mut *outcome)
                .with_target(site.target)
                .with_tool(Some(item.clone()))
                .with_block(site.block.clone())
                .with_variables(variables);
            let report = executor::execute(descriptor.effects(), &mut ctx, host, &mut self.rng);

            for (delay, task) in report.deferred {
                self.scheduler.schedule(task, delay, self.tick);
            }
            if descriptor.is_chargeable() && trigger.consumes_charge() {
                charges::consume_charge(host, item.id, &descriptor);
            }
            trace!(%trigger, enchant = %id, level, applied = report.applied.len(), "enchantment fired");
            executed += 1;
        }
        executed
    }

    /// Advance one server tick
    ///
    /// Runs deferred tasks that have come due, then, every
    /// `periodic_interval_ticks`, the PASSIVE/PERIODIC pass over every online
    /// actor's main hand and armor. Actors the host cannot resolve are logged
    /// and skipped.
    pub fn on_server_tick<H: Host + ?Sized>(&mut self, host: &mut H) -> TickReport {
        self.tick += 1;
        let mut report = TickReport {
            tick: self.tick,
            ..TickReport::default()
        };

        for task in self.scheduler.drain_due(self.tick) {
            if self.run_deferred(host, task) {
                report.deferred_run += 1;
            }
        }

        if self.tick % self.config.periodic_interval_ticks() == 0 {
            report.periodic = true;
            for actor in host.online_actors() {
                match self.periodic_for(host, actor) {
                    Ok(executed) => report.periodic_executions += executed,
                    Err(err) => {
                        report.failed_actors += 1;
                        warn!(%actor, %err, "periodic pass skipped actor");
                    }
                }
            }
        }
        report
    }

    fn periodic_for<H: Host + ?Sized>(&mut self, host: &mut H, actor: EntityId) -> Result<usize> {
        let equipment = host.equipment(actor)?;
        let site = Site {
            actor,
            target: None,
            location: host.location(actor)?,
            block: None,
            variables: actor_variables(host, actor)?,
        };
        let mut outcome = Outcome::new();
        let mut executed = 0;
        for item in equipment.all() {
            for trigger in Trigger::periodic() {
                executed += self.fire(host, trigger, &item, &site, &mut outcome);
            }
        }
        Ok(executed)
    }

    fn run_deferred<H: Host + ?Sized>(&mut self, host: &mut H, task: DeferredTask) -> bool {
        match task {
            DeferredTask::PlaceBlock { pos, material } => {
                host.place_block(pos, &material);
                true
            }
            DeferredTask::ApplyBonusEnchant {
                actor,
                enchant,
                level,
            } => {
                let Some(descriptor) = self.catalog.get(&enchant) else {
                    debug!(%enchant, "bonus enchantment no longer registered");
                    return false;
                };
                let Some(item) = host.live_enchant_result(actor) else {
                    debug!(%actor, %enchant, "enchanted item no longer available");
                    return false;
                };
                let mut levels = host.attached(item.id);
                levels.insert(enchant.clone(), level);
                host.set_attached(item.id, levels);
                if descriptor.is_chargeable() {
                    charges::set_charge(host, item.id, &descriptor, descriptor.max_charges() as i64);
                }
                info!(%actor, %enchant, level, item = %item.id, "bonus enchantment applied");
                true
            }
        }
    }

    /// Roll for a bonus enchantment after `actor` enchanted an item of `item_kind`
    ///
    /// Candidates are the catalog entries for the kind that the actor has
    /// unlocked. On success the chosen enchantment is written to the live
    /// result item `bonus_enchant_delay_ticks` later; the returned pair is what
    /// was scheduled.
    pub fn on_enchant_item<H: Host + ?Sized>(
        &mut self,
        host: &H,
        actor: EntityId,
        item_kind: &Material,
        cost: u32,
    ) -> Option<(String, u8)> {
        if host.unlock_level(actor) == 0 {
            return None;
        }
        let candidates: Vec<_> = self
            .catalog
            .all_for_item_kind(item_kind)
            .into_iter()
            .filter(|d| host.meets_requirement(actor, d))
            .collect();
        if candidates.is_empty() || !self.rng.chance(self.config.bonus_enchant_chance()) {
            return None;
        }
        let chosen = self.rng.pick(&candidates)?;
        let max_possible = (chosen.max_level() as i64).min(cost as i64 / 10 + 1);
        let level = self.rng.range_i64(1, max_possible).clamp(1, u8::MAX as i64) as u8;

        let enchant = chosen.id().to_string();
        self.scheduler.schedule(
            DeferredTask::ApplyBonusEnchant {
                actor,
                enchant: enchant.clone(),
                level,
            },
            self.config.bonus_enchant_delay_ticks(),
            self.tick,
        );
        debug!(%actor, %enchant, level, "bonus enchantment rolled");
        Some((enchant, level))
    }

    /// Remaining charges of `enchant` on `item`; `None` for unknown enchantments
    pub fn charge<S: ItemStore + ?Sized>(&self, store: &S, item: ItemId, enchant: &str) -> Option<i64> {
        let descriptor = self.catalog.get(enchant)?;
        Some(charges::current_charge(store, item, &descriptor))
    }

    /// Set the charge of `enchant` on `item`, clamped; `false` when unknown or not chargeable
    pub fn set_charge<S: ItemStore + ?Sized>(
        &self,
        store: &mut S,
        item: ItemId,
        enchant: &str,
        charge: i64,
    ) -> bool {
        match self.catalog.get(enchant) {
            Some(descriptor) => charges::set_charge(store, item, &descriptor, charge),
            None => false,
        }
    }
}

fn actor_variables<H: EntityAccess + ?Sized>(host: &H, actor: EntityId) -> Result<Variables> {
    let mut variables = Variables::new();
    variables.insert("health".into(), host.health(actor)?);
    variables.insert("maxHealth".into(), host.max_health(actor)?);
    Ok(variables)
}
