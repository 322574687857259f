//! Runeforge Core - data-driven enchantment engine
//!
//! This crate provides the engine that turns declarative enchantment
//! descriptors into gameplay behavior:
//! - Descriptors and the thread-safe [`Catalog`] they are registered in
//! - Formula evaluation over per-event variables
//! - Triggers, conditions and the effect executor
//! - Region search for area and vein mining
//! - Charges, deferred tasks and the periodic driver in [`Engine`]
//!
//! The engine owns no game state. Everything it touches goes through the
//! collaborator traits in [`host`], implemented by the game server.
//!
//! ## Sandbox Feature
//!
//! Enable the `sandbox` feature for an in-memory [`host::Host`] used by demos
//! and integration tests:
//! ```toml
//! runeforge-core = { version = "0.1", features = ["sandbox"] }
//! ```

mod catalog;
pub mod charges;
pub mod condition;
mod config;
mod context;
mod descriptor;
mod dispatch;
mod effect;
mod error;
pub mod executor;
pub mod formula;
pub mod host;
mod identity;
mod param;
pub mod region;
mod rng;
pub mod schedule;
pub mod smelting;
mod trigger;

#[cfg(any(test, feature = "sandbox"))]
pub mod sandbox;

pub use catalog::Catalog;
pub use condition::Condition;
pub use config::EngineConfig;
pub use context::{BlockTarget, Outcome, TriggerContext};
pub use descriptor::{roman_numeral, DescriptorBuilder, EnchantmentDescriptor};
pub use dispatch::{DamageCause, Engine, GameEvent, TickReport};
pub use effect::{EffectInstance, EffectKind};
pub use error::{Error, Result};
pub use executor::{execute, ExecutionReport};
pub use formula::{evaluate, Variables};
pub use host::{
    EnchantLevels, EntityAccess, Equipment, Host, ItemRef, ItemStore, Location, PotionSpec, Slot,
    UnlockGate, WorldAccess,
};
pub use identity::{EntityId, ItemId, Material};
pub use param::{EffectParams, ParamValue};
pub use region::{BlockPos, Connectivity, ToolCategory};
pub use rng::GameRng;
pub use schedule::{DeferredTask, Scheduler, Tick};
pub use trigger::Trigger;
