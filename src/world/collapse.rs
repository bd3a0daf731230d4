//! Trees that lose their footing come down as loose blocks.

use std::collections::VecDeque;

use glam::IVec3;
use rustc_hash::FxHashSet;

use crate::constants::MAX_TREE_BLOCKS;
use crate::core::block::BlockType;
use crate::world::manager::World;

const ADJACENT: [IVec3; 6] = [
    IVec3::NEG_X,
    IVec3::X,
    IVec3::NEG_Y,
    IVec3::Y,
    IVec3::NEG_Z,
    IVec3::Z,
];

/// A block pulled out of the world, to be handed to a physics layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FallingBlock {
    pub position: IVec3,
    pub block: BlockType,
}

impl World {
    /// Breaks one block. Breaking wood can leave parts of a tree floating;
    /// every such part is removed and returned.
    pub fn break_block(&mut self, x: i32, y: i32, z: i32) -> Vec<FallingBlock> {
        let broken = self.get_block(x, y, z);
        if broken.is_air() || !self.set_block(x, y, z, BlockType::Air) {
            return Vec::new();
        }
        if broken != BlockType::Wood {
            return Vec::new();
        }

        let origin = IVec3::new(x, y, z);
        let mut seen = FxHashSet::default();
        let mut falling = Vec::new();

        for offset in ADJACENT {
            let start = origin + offset;
            if seen.contains(&start) || !self.block_at(start).is_tree_part() {
                continue;
            }
            let Some(component) = self.tree_component(start, &mut seen) else {
                tracing::debug!(x, y, z, "tree too large to collapse");
                continue;
            };
            if !self.is_supported(&component) {
                falling.extend(component);
            }
        }

        if !falling.is_empty() {
            self.set_blocks(falling.iter().map(|f| (f.position, BlockType::Air)));
            tracing::debug!(x, y, z, blocks = falling.len(), "tree collapsed");
        }
        falling
    }

    fn block_at(&self, pos: IVec3) -> BlockType {
        self.get_block(pos.x, pos.y, pos.z)
    }

    /// Wood and leaves 6-connected to `start`. `None` once the fill passes
    /// `MAX_TREE_BLOCKS`.
    fn tree_component(
        &self,
        start: IVec3,
        seen: &mut FxHashSet<IVec3>,
    ) -> Option<Vec<FallingBlock>> {
        let mut component = Vec::new();
        let mut frontier = VecDeque::from([start]);
        seen.insert(start);

        while let Some(position) = frontier.pop_front() {
            component.push(FallingBlock {
                position,
                block: self.block_at(position),
            });
            if component.len() > MAX_TREE_BLOCKS {
                return None;
            }
            for offset in ADJACENT {
                let next = position + offset;
                if self.block_at(next).is_tree_part() && seen.insert(next) {
                    frontier.push_back(next);
                }
            }
        }
        Some(component)
    }

    fn is_supported(&self, component: &[FallingBlock]) -> bool {
        component
            .iter()
            .any(|f| self.block_at(f.position - IVec3::Y).supports_tree())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::*;
    use crate::world::testing::{flat_terrain, settle, test_world};

    const TRUNK: (i32, i32) = (5, 5);
    const GROUND: i32 = BASE_HEIGHT;

    fn tree_world() -> World {
        let mut world = test_world(0, 0, flat_terrain());
        settle(&mut world);

        let (tx, tz) = TRUNK;
        let mut edits = Vec::new();
        for y in GROUND..GROUND + 5 {
            edits.push((IVec3::new(tx, y, tz), BlockType::Wood));
        }
        for y in [GROUND + 3, GROUND + 4] {
            for dz in -1..=1 {
                for dx in -1..=1 {
                    if dx != 0 || dz != 0 {
                        edits.push((IVec3::new(tx + dx, y, tz + dz), BlockType::Leaves));
                    }
                }
            }
        }
        edits.push((IVec3::new(tx, GROUND + 5, tz), BlockType::Leaves));
        world.set_blocks(edits);
        world
    }

    #[test]
    fn cut_trunk_drops_the_crown() {
        let mut world = tree_world();
        let (tx, tz) = TRUNK;

        let falling = world.break_block(tx, GROUND + 1, tz);
        let wood = falling.iter().filter(|f| f.block == BlockType::Wood).count();
        let leaves = falling.iter().filter(|f| f.block == BlockType::Leaves).count();
        assert_eq!(wood, 3);
        assert_eq!(leaves, 17);

        for f in &falling {
            assert_eq!(world.block_at(f.position), BlockType::Air);
        }
        // The stump still stands on grass
        assert_eq!(world.get_block(tx, GROUND, tz), BlockType::Wood);
        assert_eq!(world.get_block(tx, GROUND + 1, tz), BlockType::Air);

        let chunk = world.chunk(crate::core::chunk::ChunkCoord::new(0, 0)).unwrap();
        assert_eq!(chunk.mesh(), &chunk.build_mesh(&world));
    }

    #[test]
    fn leaves_touching_ground_hold_the_tree() {
        let mut world = tree_world();
        let (tx, tz) = TRUNK;
        world.set_blocks(
            (GROUND..GROUND + 3).map(|y| (IVec3::new(tx - 1, y, tz), BlockType::Leaves)),
        );

        assert!(world.break_block(tx, GROUND + 1, tz).is_empty());
        assert_eq!(world.get_block(tx, GROUND + 4, tz), BlockType::Wood);
        assert_eq!(world.get_block(tx - 1, GROUND + 3, tz), BlockType::Leaves);
    }

    #[test]
    fn other_blocks_break_alone() {
        let mut world = tree_world();
        let (tx, tz) = TRUNK;
        assert!(world.break_block(tx + 3, GROUND - 1, tz).is_empty());
        assert_eq!(world.get_block(tx + 3, GROUND - 1, tz), BlockType::Air);

        // Removing a leaf never brings anything down
        assert!(world.break_block(tx + 1, GROUND + 3, tz).is_empty());
        assert_eq!(world.get_block(tx, GROUND + 4, tz), BlockType::Wood);
    }

    #[test]
    fn unloaded_or_empty_cells_do_nothing() {
        let mut world = tree_world();
        assert!(world.break_block(500, GROUND, 500).is_empty());
        assert!(world.break_block(1, GROUND + 10, 1).is_empty());
    }
}
