//! Identity types for entities, item instances and materials

use serde::{Deserialize, Serialize};
use std::fmt;

/// Host-assigned identifier of a living entity (players and mobs alike)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl EntityId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entity:{}", self.0)
    }
}

/// Identifier of one concrete item stack
///
/// Levels and charges are keyed by this id together with the enchantment id;
/// the engine never caches them between dispatches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId(pub u64);

impl ItemId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "item:{}", self.0)
    }
}

/// A block or item kind name as the host spells it (`DIAMOND_PICKAXE`, `OAK_LOG`)
///
/// Names are normalized to upper case on construction so that lookups are
/// insensitive to how content authors typed them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Material(String);

impl Material {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(name.as_ref().trim().to_ascii_uppercase())
    }

    pub fn air() -> Self {
        Self("AIR".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_air(&self) -> bool {
        matches!(self.0.as_str(), "AIR" | "CAVE_AIR" | "VOID_AIR")
    }

    /// Check whether the name contains the given fragment
    pub fn contains(&self, fragment: &str) -> bool {
        self.0.contains(fragment)
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Material {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Material {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_id() {
        let id = EntityId::new(42);
        assert_eq!(id.raw(), 42);
        assert_eq!(format!("{}", id), "entity:42");
    }

    #[test]
    fn test_material_normalized() {
        let m = Material::new(" diamond_pickaxe ");
        assert_eq!(m.as_str(), "DIAMOND_PICKAXE");
        assert_eq!(m, Material::from("DIAMOND_PICKAXE"));
        assert!(m.contains("PICKAXE"));
        assert!(Material::new("cave_air").is_air());
        assert!(!Material::new("STONE").is_air());
    }
}
