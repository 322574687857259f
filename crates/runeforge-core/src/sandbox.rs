//! In-memory host for tests and demos
//!
//! `SandboxWorld` implements every collaborator trait over plain maps and
//! records the side effects the engine asks for, so callers can assert on
//! them afterwards. Damage is applied as-is (no armor), and only a fixed list
//! of potion names is recognized.

use crate::error::{Error, Result};
use crate::host::{
    EnchantLevels, EntityAccess, Equipment, Host, ItemRef, ItemStore, Location, PotionSpec, Slot,
    UnlockGate, WorldAccess,
};
use crate::identity::{EntityId, ItemId, Material};
use crate::region::BlockPos;
use indexmap::{IndexMap, IndexSet};

/// Potion names the sandbox accepts
pub const KNOWN_POTIONS: &[&str] = &[
    "SPEED",
    "SLOWNESS",
    "HASTE",
    "MINING_FATIGUE",
    "STRENGTH",
    "INSTANT_HEALTH",
    "INSTANT_DAMAGE",
    "JUMP_BOOST",
    "NAUSEA",
    "REGENERATION",
    "RESISTANCE",
    "FIRE_RESISTANCE",
    "WATER_BREATHING",
    "INVISIBILITY",
    "BLINDNESS",
    "NIGHT_VISION",
    "HUNGER",
    "WEAKNESS",
    "POISON",
    "WITHER",
    "HEALTH_BOOST",
    "ABSORPTION",
    "SATURATION",
    "GLOWING",
    "LEVITATION",
    "SLOW_FALLING",
    "DARKNESS",
];

/// One living entity
#[derive(Debug, Clone, PartialEq)]
pub struct SandboxEntity {
    pub kind: String,
    pub health: f64,
    pub max_health: f64,
    pub location: Location,
    pub equipment: Equipment,
    pub food: i64,
    pub saturation: f64,
    /// Potions applied, in order
    pub potions: Vec<PotionSpec>,
    /// (amount, source) for every damage call
    pub damage_log: Vec<(f64, Option<EntityId>)>,
}

/// In-memory world
#[derive(Debug, Default)]
pub struct SandboxWorld {
    entities: IndexMap<EntityId, SandboxEntity>,
    online: Vec<EntityId>,
    blocks: IndexMap<BlockPos, Material>,
    enchants: IndexMap<ItemId, EnchantLevels>,
    charges: IndexMap<(ItemId, String), i64>,
    durability: IndexMap<ItemId, u32>,
    unlock_levels: IndexMap<EntityId, u32>,
    enchant_results: IndexMap<EntityId, ItemRef>,
    cancelled_breaks: IndexSet<BlockPos>,
    next_entity: u64,
    next_item: u64,

    /// Blocks broken through `break_block`, in order
    pub broken: Vec<BlockPos>,
    /// Blocks placed through `place_block`
    pub placed: Vec<(BlockPos, Material)>,
    pub lightning: Vec<(Location, bool)>,
    pub particles: Vec<(Location, String, u32, f64)>,
    pub attract_calls: usize,
}

impl SandboxWorld {
    pub fn new() -> Self {
        Self::default()
    }

    fn spawn(&mut self, kind: &str, health: f64, location: Location) -> EntityId {
        self.next_entity += 1;
        let id = EntityId(self.next_entity);
        self.entities.insert(
            id,
            SandboxEntity {
                kind: kind.to_ascii_uppercase(),
                health,
                max_health: health,
                location,
                equipment: Equipment::default(),
                food: 20,
                saturation: 5.0,
                potions: Vec::new(),
                damage_log: Vec::new(),
            },
        );
        id
    }

    /// A connected player with 20 health
    pub fn spawn_player(&mut self, location: Location) -> EntityId {
        let id = self.spawn("PLAYER", 20.0, location);
        self.online.push(id);
        id
    }

    /// A mob at full health
    pub fn spawn_mob(&mut self, kind: &str, health: f64, location: Location) -> EntityId {
        self.spawn(kind, health, location)
    }

    pub fn entity(&self, id: EntityId) -> Option<&SandboxEntity> {
        self.entities.get(&id)
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut SandboxEntity> {
        self.entities.get_mut(&id)
    }

    /// Drop the entity but leave it in the online list, like a player leaving mid-pass
    pub fn remove_entity(&mut self, id: EntityId) {
        self.entities.shift_remove(&id);
    }

    pub fn disconnect(&mut self, id: EntityId) {
        self.online.retain(|online| *online != id);
    }

    /// Create a fresh item and put it in `slot`; unknown entities get nothing equipped
    pub fn equip(&mut self, id: EntityId, slot: Slot, material: &str) -> ItemRef {
        let item = self.new_item(material);
        if let Some(entity) = self.entities.get_mut(&id) {
            entity.equipment.set(slot, Some(item.clone()));
        }
        item
    }

    pub fn new_item(&mut self, material: &str) -> ItemRef {
        self.next_item += 1;
        ItemRef::new(ItemId(self.next_item), material)
    }

    /// Attach an enchantment at `level`
    pub fn enchant(&mut self, item: ItemId, enchant: &str, level: u8) {
        self.enchants
            .entry(item)
            .or_default()
            .insert(enchant.to_string(), level);
    }

    pub fn set_block(&mut self, pos: BlockPos, material: &str) {
        self.blocks.insert(pos, Material::new(material));
    }

    /// Fill the inclusive box between two corners
    pub fn fill(&mut self, from: BlockPos, to: BlockPos, material: &str) {
        for x in from.x.min(to.x)..=from.x.max(to.x) {
            for y in from.y.min(to.y)..=from.y.max(to.y) {
                for z in from.z.min(to.z)..=from.z.max(to.z) {
                    self.set_block(BlockPos::new(x, y, z), material);
                }
            }
        }
    }

    /// Make a listener cancel the next breaks at `pos`
    pub fn cancel_break_at(&mut self, pos: BlockPos) {
        self.cancelled_breaks.insert(pos);
    }

    pub fn set_unlock_level(&mut self, actor: EntityId, level: u32) {
        self.unlock_levels.insert(actor, level);
    }

    /// Where the actor's enchanting result currently is; `None` once it was taken away
    pub fn set_enchant_result(&mut self, actor: EntityId, item: Option<ItemRef>) {
        match item {
            Some(item) => {
                self.enchant_results.insert(actor, item);
            }
            None => {
                self.enchant_results.shift_remove(&actor);
            }
        }
    }

    /// Durability damage dealt to an item so far
    pub fn item_damage(&self, item: ItemId) -> u32 {
        self.durability.get(&item).copied().unwrap_or(0)
    }

    fn get(&self, id: EntityId) -> Result<&SandboxEntity> {
        self.entities.get(&id).ok_or(Error::EntityNotFound(id))
    }

    fn get_mut(&mut self, id: EntityId) -> Result<&mut SandboxEntity> {
        self.entities.get_mut(&id).ok_or(Error::EntityNotFound(id))
    }
}

impl EntityAccess for SandboxWorld {
    fn health(&self, id: EntityId) -> Result<f64> {
        Ok(self.get(id)?.health)
    }

    fn max_health(&self, id: EntityId) -> Result<f64> {
        Ok(self.get(id)?.max_health)
    }

    fn set_health(&mut self, id: EntityId, health: f64) -> Result<()> {
        let entity = self.get_mut(id)?;
        entity.health = health.clamp(0.0, entity.max_health);
        Ok(())
    }

    fn damage(&mut self, id: EntityId, amount: f64, source: Option<EntityId>) -> Result<()> {
        let entity = self.get_mut(id)?;
        entity.health = (entity.health - amount).max(0.0);
        entity.damage_log.push((amount, source));
        Ok(())
    }

    fn entity_type(&self, id: EntityId) -> Result<String> {
        Ok(self.get(id)?.kind.clone())
    }

    fn location(&self, id: EntityId) -> Result<Location> {
        Ok(self.get(id)?.location)
    }

    fn equipment(&self, id: EntityId) -> Result<Equipment> {
        Ok(self.get(id)?.equipment.clone())
    }

    fn nearby_living(&self, center: Location, radius: f64) -> Vec<EntityId> {
        self.entities
            .iter()
            .filter(|(_, e)| e.health > 0.0 && e.location.distance(&center) <= radius)
            .map(|(id, _)| *id)
            .collect()
    }

    fn food(&self, id: EntityId) -> Result<(i64, f64)> {
        let entity = self.get(id)?;
        Ok((entity.food, entity.saturation))
    }

    fn set_food(&mut self, id: EntityId, food: i64, saturation: f64) -> Result<()> {
        let entity = self.get_mut(id)?;
        entity.food = food;
        entity.saturation = saturation;
        Ok(())
    }

    fn apply_potion(&mut self, id: EntityId, potion: &PotionSpec) -> Result<bool> {
        let entity = self.get_mut(id)?;
        if !KNOWN_POTIONS.contains(&potion.effect.as_str()) {
            return Ok(false);
        }
        entity.potions.push(potion.clone());
        Ok(true)
    }
}

impl WorldAccess for SandboxWorld {
    fn block_at(&self, pos: BlockPos) -> Material {
        self.blocks.get(&pos).cloned().unwrap_or_else(Material::air)
    }

    fn break_block(&mut self, pos: BlockPos, _actor: EntityId, _tool: Option<&ItemRef>) -> bool {
        if self.cancelled_breaks.contains(&pos) {
            return true;
        }
        self.blocks.insert(pos, Material::air());
        self.broken.push(pos);
        false
    }

    fn place_block(&mut self, pos: BlockPos, material: &Material) {
        self.blocks.insert(pos, material.clone());
        self.placed.push((pos, material.clone()));
    }

    fn strike_lightning(&mut self, at: Location, damaging: bool) {
        self.lightning.push((at, damaging));
    }

    fn spawn_particles(&mut self, at: Location, kind: &str, count: u32, spread: f64) {
        self.particles.push((at, kind.to_string(), count, spread));
    }

    fn attract_items(&mut self, _actor: EntityId, _radius: f64) -> usize {
        self.attract_calls += 1;
        0
    }
}

impl ItemStore for SandboxWorld {
    fn attached(&self, item: ItemId) -> EnchantLevels {
        self.enchants.get(&item).cloned().unwrap_or_default()
    }

    fn set_attached(&mut self, item: ItemId, levels: EnchantLevels) {
        self.enchants.insert(item, levels);
    }

    fn stored_charge(&self, item: ItemId, enchant: &str) -> Option<i64> {
        self.charges.get(&(item, enchant.to_string())).copied()
    }

    fn store_charge(&mut self, item: ItemId, enchant: &str, charge: i64) {
        self.charges.insert((item, enchant.to_string()), charge);
    }

    fn damage_item(&mut self, item: ItemId, amount: u32) {
        *self.durability.entry(item).or_default() += amount;
    }
}

impl UnlockGate for SandboxWorld {
    fn unlock_level(&self, actor: EntityId) -> u32 {
        self.unlock_levels.get(&actor).copied().unwrap_or(0)
    }
}

impl Host for SandboxWorld {
    fn online_actors(&self) -> Vec<EntityId> {
        self.online.clone()
    }

    fn live_enchant_result(&self, actor: EntityId) -> Option<ItemRef> {
        self.enchant_results.get(&actor).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_entity_errors() {
        let mut world = SandboxWorld::new();
        assert!(matches!(world.health(EntityId(1)), Err(Error::EntityNotFound(_))));
        assert!(world.damage(EntityId(1), 1.0, None).is_err());
    }

    #[test]
    fn test_break_and_cancel() {
        let mut world = SandboxWorld::new();
        let player = world.spawn_player(Location::default());
        world.set_block(BlockPos::new(0, 0, 0), "STONE");
        world.set_block(BlockPos::new(1, 0, 0), "STONE");
        world.cancel_break_at(BlockPos::new(1, 0, 0));

        assert!(!world.break_block(BlockPos::new(0, 0, 0), player, None));
        assert!(world.break_block(BlockPos::new(1, 0, 0), player, None));
        assert!(world.block_at(BlockPos::new(0, 0, 0)).is_air());
        assert_eq!(world.block_at(BlockPos::new(1, 0, 0)).as_str(), "STONE");
        assert_eq!(world.broken, vec![BlockPos::new(0, 0, 0)]);
    }

    #[test]
    fn test_nearby_excludes_dead_and_far() {
        let mut world = SandboxWorld::new();
        let near = world.spawn_mob("COW", 10.0, Location::new(1.0, 0.0, 0.0));
        let dead = world.spawn_mob("COW", 10.0, Location::new(1.0, 0.0, 0.0));
        world.spawn_mob("COW", 10.0, Location::new(9.0, 0.0, 0.0));
        world.entity_mut(dead).unwrap().health = 0.0;
        assert_eq!(world.nearby_living(Location::default(), 4.0), vec![near]);
    }

    #[test]
    fn test_online_tracking() {
        let mut world = SandboxWorld::new();
        let a = world.spawn_player(Location::default());
        let b = world.spawn_player(Location::default());
        world.spawn_mob("ZOMBIE", 20.0, Location::default());
        assert_eq!(world.online_actors(), vec![a, b]);
        world.disconnect(a);
        assert_eq!(world.online_actors(), vec![b]);
    }
}
