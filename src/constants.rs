// Chunk dimensions
pub const CHUNK_SIZE_X: i32 = 16;
pub const CHUNK_SIZE_Y: i32 = 64;
pub const CHUNK_SIZE_Z: i32 = 16;
pub const CHUNK_LAYER: i32 = CHUNK_SIZE_X * CHUNK_SIZE_Z;
pub const CHUNK_VOLUME: usize = (CHUNK_SIZE_X * CHUNK_SIZE_Y * CHUNK_SIZE_Z) as usize;

const _: () = assert!(CHUNK_SIZE_X > 0 && CHUNK_SIZE_Y > 0 && CHUNK_SIZE_Z > 0);

// Streaming defaults
pub const LOAD_RADIUS: i32 = 4;
pub const UNLOAD_RADIUS: i32 = 6;
pub const MAX_STARTS_PER_TICK: usize = 4;
pub const MAX_FINALIZES_PER_TICK: usize = 3;
pub const MAX_REMESH_PER_TICK: usize = 6;
pub const MAX_IN_FLIGHT: usize = 32;
pub const MAX_ASYNC_WORKERS: usize = 8;

// Terrain tuning
pub const DEFAULT_SEED: u32 = 2137;
pub const NOISE_FREQUENCY: f32 = 0.02;
pub const NOISE_OCTAVES: i32 = 4;
pub const NOISE_LACUNARITY: f32 = 2.0;
pub const NOISE_GAIN: f32 = 0.5;
pub const BASE_HEIGHT: i32 = 20;
pub const TERRAIN_AMPLITUDE: f32 = 5.0;
pub const DIRT_DEPTH: i32 = 4;
pub const TREE_SPACING: u32 = 47;
pub const TREE_BORDER: i32 = 2;
pub const TREE_MIN_TRUNK: i32 = 4;

// Upper bound for a single tree-collapse flood fill
pub const MAX_TREE_BLOCKS: usize = 512;

//indexes of textures in atlas
pub const TEX_GRASS_TOP: f32 = 0.0;
pub const TEX_GRASS_SIDE: f32 = 1.0;
pub const TEX_DIRT: f32 = 2.0;
pub const TEX_STONE: f32 = 3.0;
pub const TEX_SAND: f32 = 4.0;
pub const TEX_WATER: f32 = 5.0;
pub const TEX_WOOD_SIDE: f32 = 6.0;
pub const TEX_WOOD_TOP: f32 = 7.0;
pub const TEX_LEAVES: f32 = 8.0;
pub const TEX_BEDROCK: f32 = 9.0;
pub const TEX_PLANKS: f32 = 10.0;
pub const ATLAS_SIZE: u32 = 4;
