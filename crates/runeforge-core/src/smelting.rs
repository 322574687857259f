//! Smelting results used by `AUTO_SMELT`

use crate::identity::Material;

const SMELT_TABLE: &[(&str, &str)] = &[
    ("IRON_ORE", "IRON_INGOT"),
    ("DEEPSLATE_IRON_ORE", "IRON_INGOT"),
    ("GOLD_ORE", "GOLD_INGOT"),
    ("DEEPSLATE_GOLD_ORE", "GOLD_INGOT"),
    ("NETHER_GOLD_ORE", "GOLD_INGOT"),
    ("COPPER_ORE", "COPPER_INGOT"),
    ("DEEPSLATE_COPPER_ORE", "COPPER_INGOT"),
    ("COBBLESTONE", "STONE"),
    ("DEEPSLATE", "DEEPSLATE"),
    ("COBBLED_DEEPSLATE", "DEEPSLATE"),
    ("SAND", "GLASS"),
    ("RED_SAND", "GLASS"),
    ("OAK_LOG", "CHARCOAL"),
    ("BIRCH_LOG", "CHARCOAL"),
    ("SPRUCE_LOG", "CHARCOAL"),
    ("JUNGLE_LOG", "CHARCOAL"),
    ("ACACIA_LOG", "CHARCOAL"),
    ("DARK_OAK_LOG", "CHARCOAL"),
    ("MANGROVE_LOG", "CHARCOAL"),
    ("CHERRY_LOG", "CHARCOAL"),
];

/// What a broken block drops when smelted, if anything
pub fn smelt_result(block: &Material) -> Option<Material> {
    SMELT_TABLE
        .iter()
        .find(|(from, _)| *from == block.as_str())
        .map(|(_, to)| Material::new(to))
}
