//! Naive per-voxel surface mesher.
//!
//! Every solid/air boundary becomes one unit quad, emitted as two
//! counter-clockwise triangles (viewed from outside, Y up). No faces are
//! merged and no index buffer is produced.

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::core::block::BlockType;
use crate::core::chunk::{BlockGrid, flat_index};

pub const VERTICES_PER_FACE: usize = 6;

// Two triangles over the quad corners v0..v3
pub(crate) const QUAD_ORDER: [usize; VERTICES_PER_FACE] = [0, 1, 2, 0, 2, 3];

/// Texture class of a face; the atlas pass maps it to a tile.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum FaceKind {
    Top,
    Bottom,
    Side,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum FaceDir {
    PosX,
    NegX,
    PosY,
    NegY,
    PosZ,
    NegZ,
}

impl FaceDir {
    pub const ALL: [FaceDir; 6] = [
        FaceDir::PosX,
        FaceDir::NegX,
        FaceDir::PosY,
        FaceDir::NegY,
        FaceDir::PosZ,
        FaceDir::NegZ,
    ];

    pub fn offset(self) -> (i32, i32, i32) {
        match self {
            FaceDir::PosX => (1, 0, 0),
            FaceDir::NegX => (-1, 0, 0),
            FaceDir::PosY => (0, 1, 0),
            FaceDir::NegY => (0, -1, 0),
            FaceDir::PosZ => (0, 0, 1),
            FaceDir::NegZ => (0, 0, -1),
        }
    }

    pub fn normal(self) -> [f32; 3] {
        let (x, y, z) = self.offset();
        [x as f32, y as f32, z as f32]
    }

    pub fn kind(self) -> FaceKind {
        match self {
            FaceDir::PosY => FaceKind::Top,
            FaceDir::NegY => FaceKind::Bottom,
            _ => FaceKind::Side,
        }
    }

    /// Unit-cube corners of this face, counter-clockwise seen from outside.
    fn corners(self) -> [[f32; 3]; 4] {
        match self {
            FaceDir::PosX => [
                [1.0, 0.0, 1.0],
                [1.0, 0.0, 0.0],
                [1.0, 1.0, 0.0],
                [1.0, 1.0, 1.0],
            ],
            FaceDir::NegX => [
                [0.0, 0.0, 0.0],
                [0.0, 0.0, 1.0],
                [0.0, 1.0, 1.0],
                [0.0, 1.0, 0.0],
            ],
            FaceDir::PosY => [
                [0.0, 1.0, 0.0],
                [0.0, 1.0, 1.0],
                [1.0, 1.0, 1.0],
                [1.0, 1.0, 0.0],
            ],
            FaceDir::NegY => [
                [0.0, 0.0, 1.0],
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [1.0, 0.0, 1.0],
            ],
            FaceDir::PosZ => [
                [0.0, 0.0, 1.0],
                [1.0, 0.0, 1.0],
                [1.0, 1.0, 1.0],
                [0.0, 1.0, 1.0],
            ],
            FaceDir::NegZ => [
                [1.0, 0.0, 0.0],
                [0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0],
                [1.0, 1.0, 0.0],
            ],
        }
    }
}

/// Per-vertex tag used for deferred UV assignment.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct FaceTag {
    pub block: BlockType,
    pub face: FaceKind,
}

/// Non-indexed triangle list in chunk-local coordinates.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshBuffers {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub tags: Vec<FaceTag>,
}

impl MeshBuffers {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn face_count(&self) -> usize {
        self.positions.len() / VERTICES_PER_FACE
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    fn push_face(&mut self, x: i32, y: i32, z: i32, dir: FaceDir, block: BlockType) {
        let corners = dir.corners();
        let normal = dir.normal();
        let tag = FaceTag {
            block,
            face: dir.kind(),
        };
        for corner in QUAD_ORDER {
            let [cx, cy, cz] = corners[corner];
            self.positions
                .push([x as f32 + cx, y as f32 + cy, z as f32 + cz]);
            self.normals.push(normal);
            self.tags.push(tag);
        }
    }
}

/// Meshes `grid`, asking `outside` for any neighbor cell that falls outside
/// the grid (local coordinates). Voxels are visited in storage order and
/// faces in `FaceDir::ALL` order, so equal inputs give equal buffers.
pub fn build_mesh<F>(grid: &BlockGrid, outside: F) -> MeshBuffers
where
    F: Fn(i32, i32, i32) -> BlockType,
{
    let blocks = grid.as_slice();
    let row = CHUNK_SIZE_X as usize;
    let layer = CHUNK_LAYER as usize;
    let mut mesh = MeshBuffers::default();

    for y in 0..CHUNK_SIZE_Y {
        for z in 0..CHUNK_SIZE_Z {
            for x in 0..CHUNK_SIZE_X {
                let idx = flat_index(x, y, z);
                let block = blocks[idx];
                if block.is_air() {
                    continue;
                }

                for dir in FaceDir::ALL {
                    let neighbor = match dir {
                        FaceDir::PosX if x + 1 < CHUNK_SIZE_X => blocks[idx + 1],
                        FaceDir::NegX if x > 0 => blocks[idx - 1],
                        FaceDir::PosY if y + 1 < CHUNK_SIZE_Y => blocks[idx + layer],
                        FaceDir::NegY if y > 0 => blocks[idx - layer],
                        FaceDir::PosZ if z + 1 < CHUNK_SIZE_Z => blocks[idx + row],
                        FaceDir::NegZ if z > 0 => blocks[idx - row],
                        _ => {
                            let (dx, dy, dz) = dir.offset();
                            outside(x + dx, y + dy, z + dz)
                        }
                    };
                    if neighbor.is_air() {
                        mesh.push_face(x, y, z, dir, block);
                    }
                }
            }
        }
    }

    mesh
}

/// Background variant: everything outside the grid counts as air.
pub fn build_isolated_mesh(grid: &BlockGrid) -> MeshBuffers {
    build_mesh(grid, |_, _, _| BlockType::Air)
}
