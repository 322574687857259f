//! The stock enchantment set
//!
//! Each function builds one descriptor purely from data; none of them needs
//! code beyond the effect kinds the core engine already executes.

use crate::kinds;
use runeforge_core::{
    Catalog, EffectInstance, EffectKind, EnchantmentDescriptor, Result, Trigger,
};
use tracing::{info, warn};

/// Heals the wielder for part of the damage dealt; no effect on undead
pub fn vampiric() -> Result<EnchantmentDescriptor> {
    EnchantmentDescriptor::builder("vampiric")
        .display_name("Vampiric")
        .description_line("&7Heals you for part of the damage you deal")
        .description_line("&8Undead have no blood to drain")
        .color("&c")
        .max_level(3)
        .required_level(15)
        .charges(100)
        .rarity(6)
        .primary_kinds(kinds::swords())
        .trigger(Trigger::OnAttack)
        .effect(EffectInstance::condition("entity_not_undead"))
        .effect(
            EffectInstance::new(EffectKind::HealPlayer)
                .with("amount", "damage * (0.15 + {level} * 0.1)"),
        )
        .build()
}

/// Spreads part of each hit to enemies around the victim
pub fn chain_strike() -> Result<EnchantmentDescriptor> {
    EnchantmentDescriptor::builder("chain_strike")
        .display_name("Chain Strike")
        .description_line("&7Hits arc to nearby enemies")
        .color("&e")
        .max_level(3)
        .required_level(25)
        .charges(50)
        .rarity(4)
        .primary_kinds(kinds::swords())
        .trigger(Trigger::OnAttack)
        .effect(
            EffectInstance::new(EffectKind::DamageNearby)
                .with("radius", "3.0 + {level} * 1.0")
                .with("damage", "damage * (0.3 + {level} * 0.1)")
                .with("maxTargets", "2 + {level}"),
        )
        .effect(EffectInstance::new(EffectKind::SpawnLightning).with("damaging", false))
        .build()
}

/// Extra damage against targets below 30% health
pub fn execute() -> Result<EnchantmentDescriptor> {
    EnchantmentDescriptor::builder("execute")
        .display_name("Execute")
        .description_line("&7Bonus damage against weakened enemies")
        .color("&4")
        .max_level(3)
        .required_level(30)
        .charges(30)
        .rarity(3)
        .primary_kinds(kinds::swords())
        .trigger(Trigger::OnAttack)
        .effect(
            EffectInstance::new(EffectKind::DamageBonus)
                .with("amount", "4.0 + {level} * 2.0")
                .with("condition", "target_low_health"),
        )
        .effect(EffectInstance::new(EffectKind::SpawnLightning).with("damaging", false))
        .build()
}

/// Slows the victim; without leather armor the wielder is slowed too
pub fn frost() -> Result<EnchantmentDescriptor> {
    EnchantmentDescriptor::builder("frost")
        .display_name("Frost")
        .description_line("&7Freezes enemies in place")
        .description_line("&8Chills you too unless you wear leather")
        .color("&b")
        .max_level(3)
        .required_level(20)
        .charges(80)
        .rarity(7)
        .primary_kinds(kinds::swords())
        .trigger(Trigger::OnAttack)
        .effect(
            EffectInstance::new(EffectKind::ApplyPotion)
                .with("type", "SLOWNESS")
                .with("duration", "40 + {level} * 20")
                .with("amplifier", "{level} - 1")
                .with("target", "victim"),
        )
        .effect(EffectInstance::condition("not_wearing_leather_armor"))
        .effect(
            EffectInstance::new(EffectKind::ApplyDebuff)
                .with("type", "SLOWNESS")
                .with("duration", "20 + {level} * 10")
                .with("amplifier", "0"),
        )
        .build()
}

pub fn feather_fall() -> Result<EnchantmentDescriptor> {
    EnchantmentDescriptor::builder("feather_fall")
        .display_name("Feather Fall")
        .description_line("&7Usually shrugs off fall damage")
        .color("&f")
        .required_level(10)
        .charges(50)
        .visual_effects(false)
        .rarity(8)
        .primary_kinds(kinds::boots())
        .trigger(Trigger::OnFall)
        .effect(EffectInstance::new(EffectKind::NegateDamage).with("chance", 0.8))
        .build()
}

/// Survive one lethal hit per item
pub fn undying() -> Result<EnchantmentDescriptor> {
    EnchantmentDescriptor::builder("undying")
        .display_name("Undying")
        .description_line("&7Cheats death once")
        .color("&6")
        .required_level(40)
        .charges(1)
        .rarity(2)
        .primary_kinds(kinds::armor())
        .trigger(Trigger::OnLethalDamage)
        .effect(EffectInstance::new(EffectKind::PreventDeath).with("health", 1.0))
        .build()
}

pub fn reflection() -> Result<EnchantmentDescriptor> {
    EnchantmentDescriptor::builder("reflection")
        .display_name("Reflection")
        .description_line("&7Returns part of the damage to the attacker")
        .color("&d")
        .max_level(3)
        .required_level(25)
        .charges(100)
        .rarity(5)
        .primary_kinds(kinds::armor())
        .trigger(Trigger::OnDamaged)
        .effect(EffectInstance::new(EffectKind::ReflectDamage).with("percent", "0.15 + {level} * 0.1"))
        .build()
}

pub fn night_vision() -> Result<EnchantmentDescriptor> {
    EnchantmentDescriptor::builder("night_vision")
        .display_name("Night Vision")
        .description_line("&7See in the dark while worn")
        .color("&9")
        .required_level(5)
        .visual_effects(false)
        .rarity(10)
        .primary_kinds(kinds::helmets())
        .trigger(Trigger::Passive)
        .effect(
            EffectInstance::new(EffectKind::ApplyPotion)
                .with("type", "NIGHT_VISION")
                .with("duration", 400)
                .with("amplifier", 0)
                .with("ambient", true)
                .with("particles", false)
                .with("target", "player"),
        )
        .build()
}

/// Speed while worn, paid for with extra damage taken
pub fn lightweight() -> Result<EnchantmentDescriptor> {
    EnchantmentDescriptor::builder("lightweight")
        .display_name("Lightweight")
        .description_line("&7Move faster while worn")
        .description_line("&8You take more damage")
        .color("&f")
        .max_level(3)
        .required_level(15)
        .visual_effects(false)
        .rarity(8)
        .primary_kinds(kinds::armor())
        .trigger(Trigger::Passive)
        .trigger(Trigger::OnDamaged)
        .effect(
            EffectInstance::new(EffectKind::SpeedBoost)
                .with("amplifier", "{level} - 1")
                .with("duration", 40),
        )
        .effect(EffectInstance::new(EffectKind::IncreaseDamageTaken).with("multiplier", "1.0 + {level} * 0.1"))
        .build()
}

/// Mines the surrounding cube at the cost of food
pub fn area_mining() -> Result<EnchantmentDescriptor> {
    EnchantmentDescriptor::builder("area_mining")
        .display_name("Area Mining")
        .description_line("&7Breaks the blocks around the one you mine")
        .description_line("&8Makes you hungry")
        .color("&6")
        .max_level(3)
        .required_level(20)
        .charges(100)
        .visual_effects(false)
        .rarity(5)
        .primary_kinds(kinds::pickaxes())
        .trigger(Trigger::OnBlockBreak)
        .effect(EffectInstance::new(EffectKind::BreakBlocks).with("radius", "{level}"))
        .effect(
            EffectInstance::new(EffectKind::DrainHunger)
                .with("amount", "{level}")
                .with("saturation", "0.5"),
        )
        .build()
}

pub fn auto_plant() -> Result<EnchantmentDescriptor> {
    EnchantmentDescriptor::builder("auto_plant")
        .display_name("Auto Plant")
        .description_line("&7Replants saplings where leaves fall")
        .color("&2")
        .required_level(10)
        .visual_effects(false)
        .rarity(9)
        .primary_kinds(kinds::axes())
        .trigger(Trigger::OnBlockBreak)
        .effect(
            EffectInstance::new(EffectKind::AutoReplant)
                .with("blockType", "leaves")
                .with("replantType", "sapling"),
        )
        .build()
}

pub fn vein_miner() -> Result<EnchantmentDescriptor> {
    EnchantmentDescriptor::builder("vein_miner")
        .display_name("Vein Miner")
        .description_line("&7Mines a whole ore vein at once")
        .color("&b")
        .max_level(3)
        .required_level(30)
        .charges(50)
        .rarity(3)
        .primary_kinds(kinds::pickaxes())
        .trigger(Trigger::OnBlockBreak)
        .effect(EffectInstance::new(EffectKind::VeinMine).with("maxBlocks", "8 + {level} * 4"))
        .build()
}

/// Build the whole stock set, in registration order
pub fn stock_set() -> Result<Vec<EnchantmentDescriptor>> {
    [
        vampiric,
        chain_strike,
        execute,
        frost,
        feather_fall,
        undying,
        reflection,
        night_vision,
        lightweight,
        area_mining,
        auto_plant,
        vein_miner,
    ]
    .into_iter()
    .map(|build| build())
    .collect()
}

/// Register the stock set; returns how many were newly registered
///
/// Ids already present in the catalog are left untouched.
pub fn register_stock(catalog: &Catalog) -> Result<usize> {
    let mut registered = 0;
    for descriptor in stock_set()? {
        let id = descriptor.id().to_string();
        if catalog.register(descriptor) {
            registered += 1;
        } else {
            warn!(enchant = %id, "stock enchantment already registered");
        }
    }
    info!(registered, total = catalog.len(), "stock enchantments registered");
    Ok(registered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use runeforge_core::sandbox::SandboxWorld;
    use runeforge_core::{
        Engine, EngineConfig, EntityAccess, GameEvent, Location, Material, Slot,
    };
    use std::sync::Arc;

    fn engine() -> Engine {
        let catalog = Arc::new(Catalog::new());
        assert_eq!(register_stock(&catalog).unwrap(), 12);
        Engine::new(catalog, EngineConfig::default())
    }

    #[test]
    fn test_register_twice() {
        let catalog = Catalog::new();
        assert_eq!(register_stock(&catalog).unwrap(), 12);
        assert_eq!(register_stock(&catalog).unwrap(), 0);
        assert_eq!(catalog.len(), 12);
    }

    #[test]
    fn test_kind_index() {
        let catalog = Catalog::new();
        register_stock(&catalog).unwrap();
        let for_sword: Vec<_> = catalog
            .all_for_item_kind(&Material::new("IRON_SWORD"))
            .iter()
            .map(|d| d.id().to_string())
            .collect();
        assert_eq!(for_sword, vec!["vampiric", "chain_strike", "execute", "frost"]);
        // feather_fall plus the three armor-wide enchantments
        assert_eq!(catalog.all_for_item_kind(&Material::new("DIAMOND_BOOTS")).len(), 4);
        assert_eq!(catalog.for_unlock_level(10).len(), 3);
    }

    #[test]
    fn test_vampiric_skips_undead() {
        let mut engine = engine();
        let mut world = SandboxWorld::new();
        let player = world.spawn_player(Location::default());
        let cow = world.spawn_mob("COW", 10.0, Location::new(1.0, 0.0, 0.0));
        let zombie = world.spawn_mob("ZOMBIE", 20.0, Location::new(1.0, 0.0, 0.0));
        let sword = world.equip(player, Slot::MainHand, "DIAMOND_SWORD");
        world.enchant(sword.id, "vampiric", 1);
        world.entity_mut(player).unwrap().health = 10.0;

        let hit = |victim| GameEvent::Attack {
            attacker: player,
            victim,
            damage: 8.0,
        };
        engine.dispatch(&mut world, &hit(zombie));
        assert_eq!(world.health(player).unwrap(), 10.0);
        engine.dispatch(&mut world, &hit(cow));
        assert!((world.health(player).unwrap() - 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_execute_only_on_weakened() {
        let mut engine = engine();
        let mut world = SandboxWorld::new();
        let player = world.spawn_player(Location::default());
        let mob = world.spawn_mob("SPIDER", 20.0, Location::new(1.0, 0.0, 0.0));
        let sword = world.equip(player, Slot::MainHand, "IRON_SWORD");
        world.enchant(sword.id, "execute", 2);

        let hit = GameEvent::Attack {
            attacker: player,
            victim: mob,
            damage: 5.0,
        };
        assert_eq!(engine.dispatch(&mut world, &hit).damage(), Some(5.0));
        world.entity_mut(mob).unwrap().health = 5.0;
        assert_eq!(engine.dispatch(&mut world, &hit).damage(), Some(13.0));
        assert_eq!(world.lightning.len(), 2);
    }

    #[test]
    fn test_frost_spares_leather_wearers() {
        let mut engine = engine();
        let mut world = SandboxWorld::new();
        let player = world.spawn_player(Location::default());
        let mob = world.spawn_mob("SPIDER", 20.0, Location::new(1.0, 0.0, 0.0));
        let sword = world.equip(player, Slot::MainHand, "IRON_SWORD");
        world.enchant(sword.id, "frost", 1);
        let hit = GameEvent::Attack {
            attacker: player,
            victim: mob,
            damage: 5.0,
        };

        engine.dispatch(&mut world, &hit);
        assert_eq!(world.entity(player).unwrap().potions.len(), 1);

        world.equip(player, Slot::Chestplate, "LEATHER_CHESTPLATE");
        engine.dispatch(&mut world, &hit);
        assert_eq!(world.entity(player).unwrap().potions.len(), 1);
        assert_eq!(world.entity(mob).unwrap().potions.len(), 2);
    }

    #[test]
    fn test_lightweight_both_sides() {
        let mut engine = engine();
        let mut world = SandboxWorld::new();
        let player = world.spawn_player(Location::default());
        let legs = world.equip(player, Slot::Leggings, "IRON_LEGGINGS");
        world.enchant(legs.id, "lightweight", 2);

        let outcome = engine.dispatch(
            &mut world,
            &GameEvent::Damaged {
                victim: player,
                damager: None,
                cause: runeforge_core::DamageCause::EntityAttack,
                damage: 10.0,
                final_damage: 10.0,
            },
        );
        assert!((outcome.damage().unwrap() - 12.0).abs() < 1e-9);

        for _ in 0..20 {
            engine.on_server_tick(&mut world);
        }
        // The effect list runs whole on either trigger
        let potions = &world.entity(player).unwrap().potions;
        assert_eq!(potions.len(), 2);
        assert!(potions.iter().all(|p| p.effect == "SPEED" && p.amplifier == 1));
    }
}
