//! Forge Demo
//!
//! Registers the stock enchantments, equips a player in the in-memory sandbox
//! world and walks through a few encounters: a vampiric hit, a vein of ore,
//! a long fall, a lethal blow and a second of periodic ticks. Finishes with a
//! bonus enchantment rolled at the enchanting table.
//!
//! Run with `RUST_LOG=runeforge_core=debug` to see dispatch internals.

use runeforge_content::register_stock;
use runeforge_core::sandbox::SandboxWorld;
use runeforge_core::{
    roman_numeral, BlockPos, Catalog, DamageCause, Engine, EngineConfig, EntityAccess, GameEvent,
    ItemStore, Location, Material, Slot,
};
use std::sync::Arc;
use tracing::info;

const CONFIG: &str = "(periodic_interval_ticks: 20, bonus_enchant_chance: 1.0, rng_seed: 42)";

fn main() -> runeforge_core::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    println!("=== Runeforge Demo ===\n");

    let catalog = Arc::new(Catalog::new());
    let registered = register_stock(&catalog)?;
    let config = EngineConfig::from_ron_str(CONFIG)?;
    let mut engine = Engine::new(Arc::clone(&catalog), config);
    println!("Registered {registered} stock enchantments");
    for descriptor in catalog.visible() {
        println!(
            "  {:<14} unlock {:>2}  {}",
            descriptor.id(),
            descriptor.required_level(),
            descriptor.display_with_level(descriptor.max_level())
        );
    }

    let mut world = SandboxWorld::new();
    let player = world.spawn_player(Location::new(0.5, 64.0, 0.5));
    world.set_unlock_level(player, 35);
    let sword = world.equip(player, Slot::MainHand, "DIAMOND_SWORD");
    world.enchant(sword.id, "vampiric", 3);
    let helmet = world.equip(player, Slot::Helmet, "IRON_HELMET");
    world.enchant(helmet.id, "night_vision", 1);
    let chest = world.equip(player, Slot::Chestplate, "IRON_CHESTPLATE");
    world.enchant(chest.id, "undying", 1);
    world.enchant(chest.id, "reflection", 2);
    let boots = world.equip(player, Slot::Boots, "IRON_BOOTS");
    world.enchant(boots.id, "feather_fall", 1);

    // Combat
    println!("\n--- Combat ---");
    let skeleton = world.spawn_mob("SKELETON", 20.0, Location::new(2.5, 64.0, 0.5));
    let pig = world.spawn_mob("PIG", 10.0, Location::new(1.5, 64.0, 0.5));
    world.set_health(player, 10.0)?;
    for victim in [skeleton, pig] {
        let outcome = engine.dispatch(
            &mut world,
            &GameEvent::Attack {
                attacker: player,
                victim,
                damage: 8.0,
            },
        );
        info!(
            victim = %world.entity_type(victim)?,
            damage = ?outcome.damage(),
            health = world.health(player)?,
            "hit landed"
        );
    }

    let outcome = engine.dispatch(
        &mut world,
        &GameEvent::Damaged {
            victim: player,
            damager: Some(skeleton),
            cause: DamageCause::Projectile,
            damage: 4.0,
            final_damage: 4.0,
        },
    );
    info!(
        taken = ?outcome.damage(),
        skeleton_health = world.health(skeleton)?,
        "arrow reflected"
    );

    // Mining
    println!("\n--- Mining ---");
    let pick = world.equip(player, Slot::MainHand, "IRON_PICKAXE");
    world.enchant(pick.id, "vein_miner", 2);
    world.fill(BlockPos::new(0, 60, 0), BlockPos::new(3, 60, 3), "IRON_ORE");
    let outcome = engine.dispatch(
        &mut world,
        &GameEvent::BlockBreak {
            actor: player,
            pos: BlockPos::new(0, 60, 0),
            block: Material::new("IRON_ORE"),
            experience: 2,
            region_break: false,
        },
    );
    info!(
        broken = world.broken.len(),
        experience = ?outcome.drop_quantity(),
        "ore vein mined"
    );

    // Falls and lethal damage
    println!("\n--- Survival ---");
    for attempt in 1..=3 {
        let outcome = engine.dispatch(
            &mut world,
            &GameEvent::Damaged {
                victim: player,
                damager: None,
                cause: DamageCause::Fall,
                damage: 6.0,
                final_damage: 6.0,
            },
        );
        info!(attempt, negated = outcome.is_cancelled(), "fell from a ledge");
    }
    let health = world.health(player)?;
    let outcome = engine.dispatch(
        &mut world,
        &GameEvent::Damaged {
            victim: player,
            damager: None,
            cause: DamageCause::Other,
            damage: 50.0,
            final_damage: 50.0,
        },
    );
    info!(health, taken = ?outcome.damage(), "lethal blow");
    info!(
        undying = ?engine.charge(&world, chest.id, "undying"),
        feather_fall = ?engine.charge(&world, boots.id, "feather_fall"),
        "charges left"
    );

    // Periodic
    println!("\n--- Periodic ---");
    for _ in 0..engine.config().periodic_interval_ticks() {
        let report = engine.on_server_tick(&mut world);
        if report.periodic {
            info!(
                tick = report.tick,
                executions = report.periodic_executions,
                "periodic pass"
            );
        }
    }

    // Enchanting table
    println!("\n--- Enchanting ---");
    let result = world.new_item("DIAMOND_SWORD");
    world.set_enchant_result(player, Some(result.clone()));
    match engine.on_enchant_item(&world, player, &result.material, 30) {
        Some((enchant, level)) => {
            info!(%enchant, level = %roman_numeral(level), "bonus enchantment rolled");
            for _ in 0..engine.config().bonus_enchant_delay_ticks() {
                engine.on_server_tick(&mut world);
            }
            info!(attached = ?world.attached(result.id), "result item");
        }
        None => info!("no bonus this time"),
    }

    println!("\n=== Demo Complete ===");
    Ok(())
}
