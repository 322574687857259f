//! Item kind groups used when declaring which items an enchantment fits

use runeforge_core::Material;

const TIERS: [&str; 6] = ["WOODEN", "STONE", "IRON", "GOLDEN", "DIAMOND", "NETHERITE"];
const ARMOR_TIERS: [&str; 6] = ["LEATHER", "CHAINMAIL", "IRON", "GOLDEN", "DIAMOND", "NETHERITE"];

fn tiered(tiers: &[&str], piece: &str) -> Vec<Material> {
    tiers
        .iter()
        .map(|tier| Material::new(format!("{tier}_{piece}")))
        .collect()
}

pub fn swords() -> Vec<Material> {
    tiered(&TIERS, "SWORD")
}

pub fn pickaxes() -> Vec<Material> {
    tiered(&TIERS, "PICKAXE")
}

pub fn axes() -> Vec<Material> {
    tiered(&TIERS, "AXE")
}

pub fn shovels() -> Vec<Material> {
    tiered(&TIERS, "SHOVEL")
}

pub fn hoes() -> Vec<Material> {
    tiered(&TIERS, "HOE")
}

pub fn helmets() -> Vec<Material> {
    tiered(&ARMOR_TIERS, "HELMET")
}

pub fn chestplates() -> Vec<Material> {
    tiered(&ARMOR_TIERS, "CHESTPLATE")
}

pub fn leggings() -> Vec<Material> {
    tiered(&ARMOR_TIERS, "LEGGINGS")
}

pub fn boots() -> Vec<Material> {
    tiered(&ARMOR_TIERS, "BOOTS")
}

/// Every armor piece, helmet to boots
pub fn armor() -> Vec<Material> {
    let mut all = helmets();
    all.extend(chestplates());
    all.extend(leggings());
    all.extend(boots());
    all
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_groups() {
        assert_eq!(swords().len(), 6);
        assert!(swords().contains(&Material::new("netherite_sword")));
        assert!(boots().contains(&Material::new("CHAINMAIL_BOOTS")));
        assert!(!boots().contains(&Material::new("WOODEN_BOOTS")));
        assert_eq!(armor().len(), 24);
        assert_eq!(armor()[0], Material::new("LEATHER_HELMET"));
    }
}
