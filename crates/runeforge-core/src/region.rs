//! Bounded flood fill over block positions, and tool appropriateness
//!
//! Vein mining and area mining share [`find_region`]; they differ only in the
//! neighborhood shape and the predicate they pass in.

use crate::identity::Material;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

/// Integer block coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    pub fn offset(&self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }

    /// Largest per-axis distance; the box of radius `r` is `chebyshev <= r`
    pub fn chebyshev(&self, other: &BlockPos) -> i32 {
        (self.x - other.x)
            .abs()
            .max((self.y - other.y).abs())
            .max((self.z - other.z).abs())
    }
}

impl fmt::Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Which neighbors a flood fill expands into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Connectivity {
    /// The 6 face-adjacent blocks
    Faces,
    /// All 26 blocks of the surrounding cube
    Cube,
}

const FACE_OFFSETS: [(i32, i32, i32); 6] = [
    (1, 0, 0),
    (-1, 0, 0),
    (0, 1, 0),
    (0, -1, 0),
    (0, 0, 1),
    (0, 0, -1),
];

impl Connectivity {
    pub fn neighbors(self, pos: BlockPos) -> Vec<BlockPos> {
        match self {
            Connectivity::Faces => FACE_OFFSETS
                .iter()
                .map(|&(dx, dy, dz)| pos.offset(dx, dy, dz))
                .collect(),
            Connectivity::Cube => {
                let mut out = Vec::with_capacity(26);
                for dx in -1..=1 {
                    for dy in -1..=1 {
                        for dz in -1..=1 {
                            if (dx, dy, dz) != (0, 0, 0) {
                                out.push(pos.offset(dx, dy, dz));
                            }
                        }
                    }
                }
                out
            }
        }
    }
}

/// Breadth-first search from `origin`
///
/// The origin is always included and is not tested against `matches`. A
/// neighbor is admitted when it is unvisited and `matches` holds. The search
/// stops when the frontier empties or `max_count` positions were visited, so
/// the result never exceeds `max_count` (clamped to at least 1). Positions are
/// returned in visit order.
pub fn find_region<F>(
    origin: BlockPos,
    mut matches: F,
    connectivity: Connectivity,
    max_count: usize,
) -> IndexSet<BlockPos>
where
    F: FnMut(BlockPos) -> bool,
{
    let max_count = max_count.max(1);
    let mut visited = IndexSet::new();
    visited.insert(origin);
    let mut frontier = VecDeque::from([origin]);

    while let Some(current) = frontier.pop_front() {
        for next in connectivity.neighbors(current) {
            if visited.len() >= max_count {
                return visited;
            }
            if !visited.contains(&next) && matches(next) {
                visited.insert(next);
                frontier.push_back(next);
            }
        }
    }
    visited
}

/// Tool family a block wants
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum ToolCategory {
    Pickaxe,
    Axe,
    Shovel,
    Hoe,
}

impl ToolCategory {
    /// Category of a wielded item, if it is a tool
    pub fn of_tool(material: &Material) -> Option<Self> {
        let name = material.as_str();
        const TIERS: [&str; 6] = ["WOODEN_", "STONE_", "IRON_", "GOLDEN_", "DIAMOND_", "NETHERITE_"];
        let rest = TIERS.iter().find_map(|tier| name.strip_prefix(tier))?;
        match rest {
            "PICKAXE" => Some(ToolCategory::Pickaxe),
            "AXE" => Some(ToolCategory::Axe),
            "SHOVEL" => Some(ToolCategory::Shovel),
            "HOE" => Some(ToolCategory::Hoe),
            _ => None,
        }
    }

    /// Category a block prefers; `None` means any tool will do
    pub fn preferred_for(block: &Material) -> Option<Self> {
        let name = block.as_str();
        if is_pickaxe_block(name) {
            Some(ToolCategory::Pickaxe)
        } else if is_axe_block(name) {
            Some(ToolCategory::Axe)
        } else if is_shovel_block(name) {
            Some(ToolCategory::Shovel)
        } else if is_hoe_block(name) {
            Some(ToolCategory::Hoe)
        } else {
            None
        }
    }
}

/// Whether `tool` is appropriate for `block`
///
/// Blocks without a recognized category accept anything, including an empty
/// hand.
pub fn is_preferred_tool(tool: Option<&Material>, block: &Material) -> bool {
    match ToolCategory::preferred_for(block) {
        None => true,
        Some(wanted) => tool.and_then(ToolCategory::of_tool) == Some(wanted),
    }
}

/// Blocks a region break never removes
pub fn is_unbreakable(block: &Material) -> bool {
    block.is_air() || block.as_str() == "BEDROCK"
}

fn is_pickaxe_block(name: &str) -> bool {
    const FRAGMENTS: [&str; 12] = [
        "_ORE",
        "STONE",
        "COBBLESTONE",
        "DEEPSLATE",
        "GRANITE",
        "DIORITE",
        "ANDESITE",
        "NETHERRACK",
        "BLACKSTONE",
        "BASALT",
        "CONCRETE",
        "BRICK",
    ];
    const EXACT: [&str; 12] = [
        "OBSIDIAN",
        "CRYING_OBSIDIAN",
        "ANCIENT_DEBRIS",
        "IRON_BLOCK",
        "GOLD_BLOCK",
        "DIAMOND_BLOCK",
        "EMERALD_BLOCK",
        "NETHERITE_BLOCK",
        "QUARTZ_BLOCK",
        "TERRACOTTA",
        "END_STONE",
        "COPPER_BLOCK",
    ];
    FRAGMENTS.iter().any(|f| name.contains(f)) || EXACT.contains(&name)
}

fn is_axe_block(name: &str) -> bool {
    name.contains("LOG")
        || name.contains("WOOD")
        || name.contains("PLANKS")
        || (name.contains("FENCE") && !name.contains("NETHER_BRICK"))
        || name.contains("HYPHAE")
        || matches!(
            name,
            "CRAFTING_TABLE" | "CHEST" | "BARREL" | "BOOKSHELF" | "MUSHROOM_STEM"
        )
}

fn is_shovel_block(name: &str) -> bool {
    matches!(
        name,
        "DIRT"
            | "GRASS_BLOCK"
            | "SAND"
            | "RED_SAND"
            | "GRAVEL"
            | "CLAY"
            | "SOUL_SAND"
            | "SOUL_SOIL"
            | "SNOW"
            | "SNOW_BLOCK"
            | "MYCELIUM"
            | "PODZOL"
            | "COARSE_DIRT"
            | "ROOTED_DIRT"
    )
}

fn is_hoe_block(name: &str) -> bool {
    name.contains("LEAVES")
        || matches!(
            name,
            "HAY_BLOCK" | "DRIED_KELP_BLOCK" | "TARGET" | "SPONGE" | "WET_SPONGE"
        )
        || name.contains("WART_BLOCK")
}
