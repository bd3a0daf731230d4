use glam::{IVec3, Vec3};
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::core::block::BlockType;
use crate::render::mesh::{self, MeshBuffers};

/// Horizontal position of a chunk in chunk units.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkCoord {
    pub x: i32,
    pub z: i32,
}

impl ChunkCoord {
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Chunk owning the world-space block column `(wx, wz)`.
    pub fn from_block(wx: i32, wz: i32) -> Self {
        Self {
            x: wx.div_euclid(CHUNK_SIZE_X),
            z: wz.div_euclid(CHUNK_SIZE_Z),
        }
    }

    /// Chunk containing a world-space point, by floor division.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            x: (position.x / CHUNK_SIZE_X as f32).floor() as i32,
            z: (position.z / CHUNK_SIZE_Z as f32).floor() as i32,
        }
    }

    /// World-space position of local block `(0, 0, 0)`.
    pub fn origin(&self) -> IVec3 {
        IVec3::new(self.x * CHUNK_SIZE_X, 0, self.z * CHUNK_SIZE_Z)
    }

    pub fn manhattan_distance(&self, other: ChunkCoord) -> i32 {
        (self.x - other.x).abs() + (self.z - other.z).abs()
    }

    pub fn chebyshev_distance(&self, other: ChunkCoord) -> i32 {
        (self.x - other.x).abs().max((self.z - other.z).abs())
    }

    /// The four horizontally adjacent coordinates: -X, +X, -Z, +Z.
    pub fn neighbors(&self) -> [ChunkCoord; 4] {
        [
            ChunkCoord::new(self.x - 1, self.z),
            ChunkCoord::new(self.x + 1, self.z),
            ChunkCoord::new(self.x, self.z - 1),
            ChunkCoord::new(self.x, self.z + 1),
        ]
    }
}

pub fn in_bounds(x: i32, y: i32, z: i32) -> bool {
    (0..CHUNK_SIZE_X).contains(&x) && (0..CHUNK_SIZE_Y).contains(&y) && (0..CHUNK_SIZE_Z).contains(&z)
}

/// Flat storage index: x varies fastest, then z, then y.
/// Callers must check `in_bounds` first.
#[inline]
pub fn flat_index(x: i32, y: i32, z: i32) -> usize {
    (x + z * CHUNK_SIZE_X + y * CHUNK_LAYER) as usize
}

/// Read access to blocks in world coordinates.
pub trait BlockSource {
    fn block(&self, wx: i32, wy: i32, wz: i32) -> BlockType;
}

impl<F> BlockSource for F
where
    F: Fn(i32, i32, i32) -> BlockType,
{
    fn block(&self, wx: i32, wy: i32, wz: i32) -> BlockType {
        self(wx, wy, wz)
    }
}

/// Dense block storage for one chunk.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct BlockGrid {
    blocks: Box<[BlockType]>,
}

impl Default for BlockGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockGrid {
    pub fn new() -> Self {
        Self {
            blocks: vec![BlockType::Air; CHUNK_VOLUME].into_boxed_slice(),
        }
    }

    pub fn get(&self, x: i32, y: i32, z: i32) -> BlockType {
        if in_bounds(x, y, z) {
            self.blocks[flat_index(x, y, z)]
        } else {
            BlockType::Air
        }
    }

    pub fn set(&mut self, x: i32, y: i32, z: i32, block: BlockType) {
        if in_bounds(x, y, z) {
            self.blocks[flat_index(x, y, z)] = block;
        }
    }

    pub fn as_slice(&self) -> &[BlockType] {
        &self.blocks
    }

    /// Raw block ids in storage order.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.blocks.iter().map(|b| b.id()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.iter().all(BlockType::is_air)
    }
}

pub struct Chunk {
    coord: ChunkCoord,
    blocks: BlockGrid,
    mesh: MeshBuffers,
    pub player_modified: bool,
}

impl Chunk {
    pub fn new(coord: ChunkCoord) -> Self {
        Self::from_generated(coord, BlockGrid::new(), MeshBuffers::default())
    }

    /// Wraps a grid and a mesh that were produced off the main thread.
    pub fn from_generated(coord: ChunkCoord, blocks: BlockGrid, mesh: MeshBuffers) -> Self {
        Chunk {
            coord,
            blocks,
            mesh,
            player_modified: false,
        }
    }

    pub fn coord(&self) -> ChunkCoord {
        self.coord
    }

    pub fn origin(&self) -> IVec3 {
        self.coord.origin()
    }

    pub fn blocks(&self) -> &BlockGrid {
        &self.blocks
    }

    pub fn mesh(&self) -> &MeshBuffers {
        &self.mesh
    }

    pub fn get(&self, x: i32, y: i32, z: i32) -> BlockType {
        self.blocks.get(x, y, z)
    }

    /// Writes one block. The mesh is left untouched so generation and batched
    /// edits can rebuild once at the end.
    pub fn set(&mut self, x: i32, y: i32, z: i32, block: BlockType) {
        self.blocks.set(x, y, z, block);
    }

    /// Like `get`, but cells outside the chunk horizontally are resolved
    /// through `world`. Nothing exists above or below the chunk.
    pub fn neighbor(&self, world: &impl BlockSource, x: i32, y: i32, z: i32) -> BlockType {
        if !(0..CHUNK_SIZE_Y).contains(&y) {
            return BlockType::Air;
        }
        if in_bounds(x, y, z) {
            return self.blocks.get(x, y, z);
        }
        let origin = self.origin();
        world.block(origin.x + x, y, origin.z + z)
    }

    pub fn build_mesh(&self, world: &impl BlockSource) -> MeshBuffers {
        mesh::build_mesh(&self.blocks, |x, y, z| self.neighbor(world, x, y, z))
    }

    pub fn rebuild_mesh(&mut self, world: &impl BlockSource) -> &MeshBuffers {
        self.mesh = self.build_mesh(world);
        &self.mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_layout() {
        assert_eq!(flat_index(0, 0, 0), 0);
        for y in 0..CHUNK_SIZE_Y {
            for z in 0..CHUNK_SIZE_Z {
                for x in 0..CHUNK_SIZE_X {
                    let idx = flat_index(x, y, z);
                    if x > 0 {
                        assert_eq!(idx, flat_index(x - 1, y, z) + 1);
                    }
                    if z > 0 {
                        assert_eq!(idx, flat_index(x, y, z - 1) + CHUNK_SIZE_X as usize);
                    }
                    if y > 0 {
                        assert_eq!(idx, flat_index(x, y - 1, z) + CHUNK_LAYER as usize);
                    }
                }
            }
        }
        assert_eq!(
            flat_index(CHUNK_SIZE_X - 1, CHUNK_SIZE_Y - 1, CHUNK_SIZE_Z - 1),
            CHUNK_VOLUME - 1
        );
    }

    #[test]
    fn out_of_range_reads_air_and_writes_nothing() {
        let mut chunk = Chunk::new(ChunkCoord::new(0, 0));
        chunk.set(-1, 0, 0, BlockType::Stone);
        chunk.set(0, CHUNK_SIZE_Y, 0, BlockType::Stone);
        chunk.set(0, 0, CHUNK_SIZE_Z, BlockType::Stone);
        assert!(chunk.blocks().is_empty());
        assert_eq!(chunk.get(CHUNK_SIZE_X, 0, 0), BlockType::Air);

        chunk.set(3, 10, 7, BlockType::Dirt);
        assert_eq!(chunk.get(3, 10, 7), BlockType::Dirt);
        assert_eq!(chunk.blocks().as_slice()[flat_index(3, 10, 7)], BlockType::Dirt);
    }

    #[test]
    fn neighbor_crosses_horizontally_only() {
        let chunk = Chunk::new(ChunkCoord::new(2, -1));
        let world = |wx: i32, _wy: i32, wz: i32| {
            if wx == 2 * CHUNK_SIZE_X - 1 && wz == -CHUNK_SIZE_Z + 4 {
                BlockType::Stone
            } else {
                BlockType::Air
            }
        };
        assert_eq!(chunk.neighbor(&world, -1, 5, 4), BlockType::Stone);
        assert_eq!(chunk.neighbor(&world, -1, 5, 5), BlockType::Air);
        let solid = |_: i32, _: i32, _: i32| BlockType::Stone;
        assert_eq!(chunk.neighbor(&solid, 0, -1, 0), BlockType::Air);
        assert_eq!(chunk.neighbor(&solid, 0, CHUNK_SIZE_Y, 0), BlockType::Air);
    }

    #[test]
    fn coords_from_negative_positions() {
        assert_eq!(ChunkCoord::from_block(-1, -17), ChunkCoord::new(-1, -2));
        assert_eq!(ChunkCoord::from_block(15, 16), ChunkCoord::new(0, 1));
        assert_eq!(
            ChunkCoord::from_position(Vec3::new(-0.5, 30.0, 16.0)),
            ChunkCoord::new(-1, 1)
        );
        assert_eq!(ChunkCoord::new(-2, 3).origin(), IVec3::new(-32, 0, 48));
    }

    #[test]
    fn distances() {
        let a = ChunkCoord::new(0, 0);
        let b = ChunkCoord::new(3, -2);
        assert_eq!(a.manhattan_distance(b), 5);
        assert_eq!(a.chebyshev_distance(b), 3);
        assert_eq!(b.chebyshev_distance(a), 3);
    }
}
