//! Collaborator interfaces implemented by the game server
//!
//! The engine never owns entities, blocks or item data. Everything it reads
//! or mutates goes through these traits, split by concern so that tests can
//! reason about each one separately. [`Host`] bundles them for the engine.

use crate::descriptor::EnchantmentDescriptor;
use crate::error::Result;
use crate::identity::{EntityId, ItemId, Material};
use crate::region::BlockPos;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Enchantment id → level, in the store's own iteration order
pub type EnchantLevels = IndexMap<String, u8>;

/// A point in the world
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Location {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Location {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// The block containing this point
    pub fn block(&self) -> BlockPos {
        BlockPos::new(self.x.floor() as i32, self.y.floor() as i32, self.z.floor() as i32)
    }

    pub fn distance(&self, other: &Location) -> f64 {
        let (dx, dy, dz) = (self.x - other.x, self.y - other.y, self.z - other.z);
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

impl From<BlockPos> for Location {
    /// Center of the block
    fn from(pos: BlockPos) -> Self {
        Self::new(pos.x as f64 + 0.5, pos.y as f64 + 0.5, pos.z as f64 + 0.5)
    }
}

/// A concrete item stack
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemRef {
    pub id: ItemId,
    pub material: Material,
}

impl ItemRef {
    pub fn new(id: ItemId, material: impl Into<Material>) -> Self {
        Self {
            id,
            material: material.into(),
        }
    }
}

/// Equipment slots the engine looks at
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum Slot {
    MainHand,
    Helmet,
    Chestplate,
    Leggings,
    Boots,
}

/// Snapshot of what an entity holds and wears
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Equipment {
    pub main_hand: Option<ItemRef>,
    pub helmet: Option<ItemRef>,
    pub chestplate: Option<ItemRef>,
    pub leggings: Option<ItemRef>,
    pub boots: Option<ItemRef>,
}

impl Equipment {
    pub fn get(&self, slot: Slot) -> Option<&ItemRef> {
        match slot {
            Slot::MainHand => self.main_hand.as_ref(),
            Slot::Helmet => self.helmet.as_ref(),
            Slot::Chestplate => self.chestplate.as_ref(),
            Slot::Leggings => self.leggings.as_ref(),
            Slot::Boots => self.boots.as_ref(),
        }
    }

    pub fn set(&mut self, slot: Slot, item: Option<ItemRef>) {
        let place = match slot {
            Slot::MainHand => &mut self.main_hand,
            Slot::Helmet => &mut self.helmet,
            Slot::Chestplate => &mut self.chestplate,
            Slot::Leggings => &mut self.leggings,
            Slot::Boots => &mut self.boots,
        };
        *place = item;
    }

    /// Worn armor, helmet to boots
    pub fn armor(&self) -> Vec<ItemRef> {
        [Slot::Helmet, Slot::Chestplate, Slot::Leggings, Slot::Boots]
            .into_iter()
            .filter_map(|slot| self.get(slot).cloned())
            .collect()
    }

    /// Main hand followed by armor; the items the periodic driver evaluates
    pub fn all(&self) -> Vec<ItemRef> {
        let mut items: Vec<ItemRef> = self.main_hand.iter().cloned().collect();
        items.extend(self.armor());
        items
    }
}

/// A potion application request; `effect` is a host-owned name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PotionSpec {
    pub effect: String,
    /// Duration in ticks
    pub duration: i64,
    pub amplifier: i64,
    pub ambient: bool,
    pub particles: bool,
}

impl PotionSpec {
    pub fn new(effect: impl AsRef<str>, duration: i64, amplifier: i64) -> Self {
        Self {
            effect: effect.as_ref().trim().to_ascii_uppercase(),
            duration,
            amplifier,
            ambient: true,
            particles: false,
        }
    }
}

/// Reads and mutates living entities
pub trait EntityAccess {
    fn health(&self, id: EntityId) -> Result<f64>;
    fn max_health(&self, id: EntityId) -> Result<f64>;
    fn set_health(&mut self, id: EntityId, health: f64) -> Result<()>;
    /// Deal damage through the host's normal damage pipeline (armor applies)
    fn damage(&mut self, id: EntityId, amount: f64, source: Option<EntityId>) -> Result<()>;
    /// Host type name, e.g. `ZOMBIE` or `PLAYER`
    fn entity_type(&self, id: EntityId) -> Result<String>;
    fn location(&self, id: EntityId) -> Result<Location>;
    fn equipment(&self, id: EntityId) -> Result<Equipment>;
    /// Living entities within `radius` of `center`, in host order
    fn nearby_living(&self, center: Location, radius: f64) -> Vec<EntityId>;
    /// Food level and saturation
    fn food(&self, id: EntityId) -> Result<(i64, f64)>;
    fn set_food(&mut self, id: EntityId, food: i64, saturation: f64) -> Result<()>;
    /// Returns `false` when the host does not know the potion name
    fn apply_potion(&mut self, id: EntityId, potion: &PotionSpec) -> Result<bool>;
}

/// Blocks and world effects
pub trait WorldAccess {
    fn block_at(&self, pos: BlockPos) -> Material;
    /// Break a block as if `actor` broke it with `tool`
    ///
    /// The host fires its own block-break notification (so progression
    /// systems see it) and returns `true` when a listener cancelled the break.
    fn break_block(&mut self, pos: BlockPos, actor: EntityId, tool: Option<&ItemRef>) -> bool;
    fn place_block(&mut self, pos: BlockPos, material: &Material);
    fn strike_lightning(&mut self, at: Location, damaging: bool);
    fn spawn_particles(&mut self, at: Location, kind: &str, count: u32, spread: f64);
    /// Pull dropped items within `radius` toward `actor`; returns how many moved
    fn attract_items(&mut self, actor: EntityId, radius: f64) -> usize;
}

/// Persistence of enchantment levels and charges on item stacks
pub trait ItemStore {
    fn attached(&self, item: ItemId) -> EnchantLevels;
    fn set_attached(&mut self, item: ItemId, levels: EnchantLevels);
    /// `None` when no charge was ever stored for this pair
    fn stored_charge(&self, item: ItemId, enchant: &str) -> Option<i64>;
    fn store_charge(&mut self, item: ItemId, enchant: &str, charge: i64);
    fn damage_item(&mut self, item: ItemId, amount: u32);
}

/// Progression gating; the engine only consumes a yes/no per descriptor
pub trait UnlockGate {
    /// The actor's progression level relevant to enchanting
    fn unlock_level(&self, actor: EntityId) -> u32;

    fn meets_requirement(&self, actor: EntityId, descriptor: &EnchantmentDescriptor) -> bool {
        self.unlock_level(actor) >= descriptor.required_level()
    }
}

/// Everything the engine needs from the game server
pub trait Host: EntityAccess + WorldAccess + ItemStore + UnlockGate {
    /// Actors currently connected, for the periodic driver
    fn online_actors(&self) -> Vec<EntityId>;

    /// Where the result of the actor's last enchanting action lives right now:
    /// the item on the cursor first, otherwise the item still in the table
    fn live_enchant_result(&self, actor: EntityId) -> Option<ItemRef>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_block() {
        let loc = Location::new(1.7, -0.2, 3.0);
        assert_eq!(loc.block(), BlockPos::new(1, -1, 3));
        let center: Location = BlockPos::new(0, 0, 0).into();
        assert_eq!(center, Location::new(0.5, 0.5, 0.5));
        assert_eq!(Location::new(0.0, 0.0, 0.0).distance(&Location::new(3.0, 4.0, 0.0)), 5.0);
    }

    #[test]
    fn test_equipment_order() {
        let mut eq = Equipment::default();
        eq.set(Slot::Boots, Some(ItemRef::new(ItemId(4), "IRON_BOOTS")));
        eq.set(Slot::MainHand, Some(ItemRef::new(ItemId(1), "IRON_SWORD")));
        eq.set(Slot::Helmet, Some(ItemRef::new(ItemId(2), "IRON_HELMET")));

        let ids: Vec<_> = eq.all().into_iter().map(|i| i.id.0).collect();
        assert_eq!(ids, vec![1, 2, 4]);
        assert_eq!(eq.armor().len(), 2);
        assert!(eq.get(Slot::Chestplate).is_none());
    }

    #[test]
    fn test_potion_name_normalized() {
        let potion = PotionSpec::new("night_vision", 400, 0);
        assert_eq!(potion.effect, "NIGHT_VISION");
        assert!(potion.ambient);
        assert!(!potion.particles);
    }
}
