// Core module with fundamental types
pub mod core;

// Render module with meshing code
pub mod render;

// World module with generation and streaming
pub mod world;

// Other modules
pub mod constants;
pub mod error;
pub mod settings;

// Re-exports
pub use constants::*;
pub use crate::core::{BlockGrid, BlockSource, BlockType, Chunk, ChunkCoord, Vertex};
pub use error::ConfigError;
pub use render::{MeshBuffers, build_mesh, build_vertices};
pub use settings::{StreamSettings, TerrainSettings, WorldSettings, load_settings, save_settings};
pub use world::{
    ChunkGenerator, ChunkLoader, FallingBlock, StreamState, TerrainParams, TickReport, World,
    WorldStats,
};
