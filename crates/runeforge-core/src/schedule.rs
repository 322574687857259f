//! Tick-delayed work
//!
//! Some mutations must wait until the host has finished the event that caused
//! them (placing a replanted sapling after the break, enchanting the result
//! item after the table has produced it). They are queued here and drained by
//! the engine's server tick.

use crate::identity::{EntityId, Material};
use crate::region::BlockPos;

/// A discrete server tick
pub type Tick = u64;

/// Work to run on a later tick
#[derive(Debug, Clone, PartialEq)]
pub enum DeferredTask {
    /// Place a block, e.g. a sapling where leaves were broken
    PlaceBlock { pos: BlockPos, material: Material },
    /// Attach a bonus enchantment to wherever the actor's enchanting result
    /// lives when the task runs
    ApplyBonusEnchant {
        actor: EntityId,
        enchant: String,
        level: u8,
    },
}

/// Tick-ordered queue of deferred tasks
#[derive(Debug, Default)]
pub struct Scheduler {
    scheduled: Vec<(Tick, DeferredTask)>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `task` to run `delay` ticks after `now`
    ///
    /// Tasks due on the same tick run in scheduling order.
    pub fn schedule(&mut self, task: DeferredTask, delay: Tick, now: Tick) {
        let due = now.saturating_add(delay);
        self.scheduled.push((due, task));
        self.scheduled.sort_by_key(|(tick, _)| *tick);
    }

    /// Remove and return every task due at or before `now`
    pub fn drain_due(&mut self, now: Tick) -> Vec<DeferredTask> {
        let split = self.scheduled.partition_point(|(tick, _)| *tick <= now);
        self.scheduled.drain(..split).map(|(_, task)| task).collect()
    }

    pub fn pending(&self) -> usize {
        self.scheduled.len()
    }
}
