//! Meshing-related modules
//! Contains the chunk surface mesher and the atlas UV pass.

pub mod atlas;
pub mod mesh;

// Re-export commonly used types
pub use atlas::{atlas_uv, build_vertices};
pub use mesh::{FaceDir, FaceKind, FaceTag, MeshBuffers, build_isolated_mesh, build_mesh};
