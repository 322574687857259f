//! Runeforge Content - stock enchantments
//!
//! Ready-made descriptors built on `runeforge-core`, plus the item kind groups
//! they are declared against. Hosts usually call [`register_stock`] once at
//! startup and then register their own descriptors on top.

pub mod kinds;
mod stock;

pub use stock::{
    area_mining, auto_plant, chain_strike, execute, feather_fall, frost, lightweight,
    night_vision, reflection, register_stock, stock_set, undying, vampiric, vein_miner,
};
