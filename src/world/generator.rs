//! Deterministic terrain generation using FastNoiseLite
//!
//! Generation is a pure function of `TerrainParams` and a chunk coordinate.
//! Every worker job builds its own `ChunkGenerator`, so no noise state is
//! ever shared between threads.

use fastnoise_lite::{FastNoiseLite, FractalType, NoiseType};

use crate::constants::*;
use crate::core::block::BlockType;
use crate::core::chunk::{BlockGrid, ChunkCoord};

/// Tuning knobs for one generation epoch, passed by value to workers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TerrainParams {
    pub seed: u32,
    pub frequency: f32,
    pub octaves: i32,
    pub lacunarity: f32,
    pub gain: f32,
    pub base_height: i32,
    pub amplitude: f32,
    pub trees: bool,
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }
}

impl TerrainParams {
    pub fn with_seed(seed: u32) -> Self {
        Self {
            seed,
            frequency: NOISE_FREQUENCY,
            octaves: NOISE_OCTAVES,
            lacunarity: NOISE_LACUNARITY,
            gain: NOISE_GAIN,
            base_height: BASE_HEIGHT,
            amplitude: TERRAIN_AMPLITUDE,
            trees: true,
        }
    }

    /// Treeless terrain where every column has the same height.
    pub fn flat(seed: u32, height: i32) -> Self {
        Self {
            base_height: height,
            amplitude: 0.0,
            trees: false,
            ..Self::with_seed(seed)
        }
    }
}

pub struct ChunkGenerator {
    noise_height: FastNoiseLite,
    params: TerrainParams,
}

impl ChunkGenerator {
    pub fn new(params: TerrainParams) -> Self {
        ChunkGenerator {
            noise_height: Self::create_fbm_noise(&params),
            params,
        }
    }

    fn create_fbm_noise(params: &TerrainParams) -> FastNoiseLite {
        let mut noise = FastNoiseLite::with_seed(params.seed as i32);
        noise.set_noise_type(Some(NoiseType::OpenSimplex2));
        noise.set_fractal_type(Some(FractalType::FBm));
        noise.set_fractal_octaves(Some(params.octaves));
        noise.set_fractal_lacunarity(Some(params.lacunarity));
        noise.set_fractal_gain(Some(params.gain));
        noise.set_frequency(Some(params.frequency));
        noise
    }

    /// Number of filled cells in the world column `(wx, wz)`; the grass
    /// block sits at `surface_height - 1`.
    pub fn surface_height(&self, wx: i32, wz: i32) -> i32 {
        let noise = self.noise_height.get_noise_2d(wx as f32, wz as f32);
        let height = (self.params.base_height as f32 + noise * self.params.amplitude).round();
        (height as i32).clamp(1, CHUNK_SIZE_Y - 1)
    }

    /// Generate a complete chunk at the given coordinates
    pub fn generate_chunk(&self, coord: ChunkCoord) -> BlockGrid {
        let mut grid = BlockGrid::new();
        let origin = coord.origin();
        let mut height_map = [[0i32; CHUNK_SIZE_X as usize]; CHUNK_SIZE_Z as usize];

        for lz in 0..CHUNK_SIZE_Z {
            for lx in 0..CHUNK_SIZE_X {
                let height = self.surface_height(origin.x + lx, origin.z + lz);
                height_map[lz as usize][lx as usize] = height;
                fill_column(&mut grid, lx, lz, height);
            }
        }

        if self.params.trees {
            self.generate_trees(&mut grid, coord, &height_map);
        }

        grid
    }

    fn generate_trees(
        &self,
        grid: &mut BlockGrid,
        coord: ChunkCoord,
        height_map: &[[i32; CHUNK_SIZE_X as usize]; CHUNK_SIZE_Z as usize],
    ) {
        let origin = coord.origin();
        for lz in TREE_BORDER..(CHUNK_SIZE_Z - TREE_BORDER) {
            for lx in TREE_BORDER..(CHUNK_SIZE_X - TREE_BORDER) {
                if let Some(trunk_height) = self.tree_at(origin.x + lx, origin.z + lz) {
                    let ground = height_map[lz as usize][lx as usize];
                    place_tree(grid, lx, ground, lz, trunk_height);
                }
            }
        }
    }

    /// Trunk height of the tree rooted in world column `(wx, wz)`, if any.
    pub fn tree_at(&self, wx: i32, wz: i32) -> Option<i32> {
        let hash = self.position_hash(wx, wz);
        (hash % TREE_SPACING == 0).then(|| TREE_MIN_TRUNK + (hash % 3) as i32)
    }

    fn position_hash(&self, x: i32, z: i32) -> u32 {
        let mut hash = self.params.seed;
        hash = hash.wrapping_add(x as u32).wrapping_mul(73856093);
        hash = hash.wrapping_add(z as u32).wrapping_mul(19349663);
        hash ^ (hash >> 16)
    }
}

/// Convenience wrapper that builds a fresh generator for one chunk.
pub fn generate(params: TerrainParams, coord: ChunkCoord) -> BlockGrid {
    ChunkGenerator::new(params).generate_chunk(coord)
}

fn fill_column(grid: &mut BlockGrid, lx: i32, lz: i32, height: i32) {
    for y in 0..height {
        let block = if y == height - 1 {
            BlockType::Grass
        } else if y >= height - DIRT_DEPTH {
            BlockType::Dirt
        } else {
            BlockType::Stone
        };
        grid.set(lx, y, lz, block);
    }
}

fn place_tree(grid: &mut BlockGrid, lx: i32, ground: i32, lz: i32, trunk_height: i32) {
    for dy in 0..trunk_height {
        grid.set(lx, ground + dy, lz, BlockType::Wood);
    }

    // 5x5x4 canopy around the trunk top; the highest layer shrinks to a plus
    let top = ground + trunk_height - 1;
    for y in (top - 2)..=(top + 1) {
        let radius: i32 = if y > top { 1 } else { 2 };
        for dz in -radius..=radius {
            for dx in -radius..=radius {
                if dx.abs() == radius && dz.abs() == radius {
                    continue;
                }
                let (x, z) = (lx + dx, lz + dz);
                if grid.get(x, y, z).is_air() {
                    grid.set(x, y, z, BlockType::Leaves);
                }
            }
        }
    }
}
