use serde::{Deserialize, Serialize};

use crate::constants::*;

/// Block and item identifiers. The discriminant is the stored byte.
#[repr(u8)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
pub enum BlockType {
    #[default]
    Air = 0,
    Grass = 1,
    Dirt = 2,
    Stone = 3,
    Sand = 4,
    Water = 5,
    Wood = 6,
    Leaves = 7,
    Planks = 8,
    Bedrock = 9,
    // Inventory-only ids, never stored in a chunk by generation
    Stick = 100,
    Apple = 101,
}

impl BlockType {
    pub const ALL: [BlockType; 12] = [
        BlockType::Air,
        BlockType::Grass,
        BlockType::Dirt,
        BlockType::Stone,
        BlockType::Sand,
        BlockType::Water,
        BlockType::Wood,
        BlockType::Leaves,
        BlockType::Planks,
        BlockType::Bedrock,
        BlockType::Stick,
        BlockType::Apple,
    ];

    pub fn id(self) -> u8 {
        self as u8
    }

    pub fn from_id(id: u8) -> Option<Self> {
        Self::ALL.iter().copied().find(|b| b.id() == id)
    }

    pub fn is_air(&self) -> bool {
        *self == BlockType::Air
    }

    pub fn is_solid(&self) -> bool {
        !matches!(self, BlockType::Air | BlockType::Water) && !self.is_item()
    }

    pub fn is_item(&self) -> bool {
        matches!(self, BlockType::Stick | BlockType::Apple)
    }

    /// Whether the player may put this id into the world.
    pub fn is_placeable(&self) -> bool {
        !self.is_air() && !self.is_item() && *self != BlockType::Bedrock
    }

    pub fn is_tree_part(&self) -> bool {
        matches!(self, BlockType::Wood | BlockType::Leaves)
    }

    /// Ground that keeps a tree standing when it sits directly below a tree block.
    pub fn supports_tree(&self) -> bool {
        !matches!(
            self,
            BlockType::Air | BlockType::Wood | BlockType::Leaves | BlockType::Water
        )
    }

    pub fn tex_top(&self) -> f32 {
        match self {
            BlockType::Grass => TEX_GRASS_TOP,
            BlockType::Dirt => TEX_DIRT,
            BlockType::Stone => TEX_STONE,
            BlockType::Sand => TEX_SAND,
            BlockType::Water => TEX_WATER,
            BlockType::Wood => TEX_WOOD_TOP,
            BlockType::Leaves => TEX_LEAVES,
            BlockType::Planks => TEX_PLANKS,
            BlockType::Bedrock => TEX_BEDROCK,
            BlockType::Air | BlockType::Stick | BlockType::Apple => 0.0,
        }
    }

    pub fn tex_side(&self) -> f32 {
        match self {
            BlockType::Grass => TEX_GRASS_SIDE,
            BlockType::Wood => TEX_WOOD_SIDE,
            _ => self.tex_top(),
        }
    }

    pub fn tex_bottom(&self) -> f32 {
        match self {
            BlockType::Grass => TEX_DIRT,
            _ => self.tex_top(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_map_back_to_blocks() {
        for block in BlockType::ALL {
            assert_eq!(BlockType::from_id(block.id()), Some(block));
        }
        assert_eq!(BlockType::from_id(42), None);
        assert_eq!(BlockType::default(), BlockType::Air);
    }

    #[test]
    fn classification() {
        assert!(BlockType::Stone.is_solid());
        assert!(!BlockType::Water.is_solid());
        assert!(!BlockType::Apple.is_solid());
        assert!(BlockType::Stick.is_item());
        assert!(!BlockType::Stick.is_placeable());
        assert!(!BlockType::Air.is_placeable());
        assert!(BlockType::Planks.is_placeable());
        assert!(BlockType::Leaves.is_tree_part());
        assert!(BlockType::Dirt.supports_tree());
        assert!(!BlockType::Water.supports_tree());
        assert!(!BlockType::Wood.supports_tree());
    }

    #[test]
    fn grass_uses_distinct_faces() {
        assert_eq!(BlockType::Grass.tex_top(), TEX_GRASS_TOP);
        assert_eq!(BlockType::Grass.tex_side(), TEX_GRASS_SIDE);
        assert_eq!(BlockType::Grass.tex_bottom(), TEX_DIRT);
        assert_eq!(BlockType::Stone.tex_side(), BlockType::Stone.tex_bottom());
    }
}
