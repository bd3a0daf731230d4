use bytemuck::{Pod, Zeroable};

/// Interleaved vertex as handed to a renderer for upload.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
    pub tex_index: f32,
}

impl Vertex {
    pub const STRIDE: usize = std::mem::size_of::<Vertex>();

    pub fn as_bytes(vertices: &[Vertex]) -> &[u8] {
        bytemuck::cast_slice(vertices)
    }
}
