//! UV assignment, kept out of the mesher so meshing never needs texture data.

use glam::IVec3;

use crate::constants::ATLAS_SIZE;
use crate::core::vertex::Vertex;
use crate::render::mesh::{FaceKind, FaceTag, MeshBuffers, QUAD_ORDER, VERTICES_PER_FACE};

// Per-corner UVs for quad corners v0..v3
const QUAD_UVS: [[f32; 2]; 4] = [[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]];

pub fn tex_index(tag: FaceTag) -> f32 {
    match tag.face {
        FaceKind::Top => tag.block.tex_top(),
        FaceKind::Bottom => tag.block.tex_bottom(),
        FaceKind::Side => tag.block.tex_side(),
    }
}

/// Maps a tile-local UV into the square atlas.
pub fn atlas_uv(tex_index: f32, uv: [f32; 2]) -> [f32; 2] {
    let tile = tex_index as u32;
    let col = (tile % ATLAS_SIZE) as f32;
    let row = (tile / ATLAS_SIZE) as f32;
    let scale = 1.0 / ATLAS_SIZE as f32;
    [(col + uv[0]) * scale, (row + uv[1]) * scale]
}

/// Interleaves a chunk mesh into world-space vertices with UVs already
/// placed inside the face's atlas tile.
pub fn build_vertices(mesh: &MeshBuffers, origin: IVec3) -> Vec<Vertex> {
    let offset = origin.as_vec3();
    mesh.positions
        .iter()
        .zip(&mesh.normals)
        .zip(&mesh.tags)
        .enumerate()
        .map(|(i, ((position, normal), tag))| {
            let tile = tex_index(*tag);
            Vertex {
                position: [
                    position[0] + offset.x,
                    position[1] + offset.y,
                    position[2] + offset.z,
                ],
                normal: *normal,
                uv: atlas_uv(tile, QUAD_UVS[QUAD_ORDER[i % VERTICES_PER_FACE]]),
                tex_index: tile,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::*;
    use crate::core::block::BlockType;
    use crate::core::chunk::BlockGrid;
    use crate::render::mesh::build_isolated_mesh;

    #[test]
    fn grass_faces_pick_their_tiles() {
        let mut grid = BlockGrid::new();
        grid.set(0, 0, 0, BlockType::Grass);
        let mesh = build_isolated_mesh(&grid);
        let vertices = build_vertices(&mesh, IVec3::new(32, 0, -16));
        assert_eq!(vertices.len(), mesh.vertex_count());

        for v in &vertices {
            let expected = if v.normal[1] > 0.0 {
                TEX_GRASS_TOP
            } else if v.normal[1] < 0.0 {
                TEX_DIRT
            } else {
                TEX_GRASS_SIDE
            };
            assert_eq!(v.tex_index, expected);
            assert!((32.0..=33.0).contains(&v.position[0]));
            assert!((-16.0..=-15.0).contains(&v.position[2]));
        }
    }

    #[test]
    fn corners_cover_the_whole_tile() {
        let mut grid = BlockGrid::new();
        grid.set(1, 1, 1, BlockType::Stone);
        let vertices = build_vertices(&build_isolated_mesh(&grid), IVec3::ZERO);
        let face = &vertices[..VERTICES_PER_FACE];
        for uv in QUAD_UVS {
            let expected = atlas_uv(TEX_STONE, uv);
            assert!(face.iter().any(|v| v.uv == expected));
        }
        // Stone is tile 3: the last column of the first row
        for v in &vertices {
            assert!((0.75..=1.0).contains(&v.uv[0]));
            assert!((0.0..=0.25).contains(&v.uv[1]));
        }
        assert_eq!(
            Vertex::as_bytes(&vertices).len(),
            vertices.len() * Vertex::STRIDE
        );
    }

    #[test]
    fn atlas_rows_and_columns() {
        assert_eq!(atlas_uv(0.0, [0.0, 0.0]), [0.0, 0.0]);
        assert_eq!(atlas_uv(5.0, [1.0, 1.0]), [0.5, 0.5]);
        assert_eq!(atlas_uv(TEX_PLANKS, [0.0, 0.0]), [0.5, 0.5]);
    }
}
