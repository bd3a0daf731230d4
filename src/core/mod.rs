//! Core data structures
//! Contains fundamental types like blocks, chunks, and vertices.

pub mod block;
pub mod chunk;
pub mod vertex;

// Re-export commonly used types
pub use block::BlockType;
pub use chunk::{BlockGrid, BlockSource, Chunk, ChunkCoord};
pub use vertex::Vertex;
