// Vertex structure for the full-window quad

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

/// Vertex in clip space with texture coordinates
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    /// Position in clip space (-1..1)
    pub position: [f32; 2],
    /// Texture coordinates (UV, origin top-left)
    pub tex_coords: [f32; 2],
}

/// Two triangles covering the whole window
pub const QUAD_INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];

impl Vertex {
    /// Create a new vertex
    pub fn new(position: Vec2, tex_coords: Vec2) -> Self {
        Self {
            position: position.to_array(),
            tex_coords: tex_coords.to_array(),
        }
    }

    /// Corners of the full-window quad, counter-clockwise from bottom-left
    pub fn quad() -> [Vertex; 4] {
        [
            Vertex::new(Vec2::new(-1.0, -1.0), Vec2::new(0.0, 1.0)),
            Vertex::new(Vec2::new(1.0, -1.0), Vec2::new(1.0, 1.0)),
            Vertex::new(Vec2::new(1.0, 1.0), Vec2::new(1.0, 0.0)),
            Vertex::new(Vec2::new(-1.0, 1.0), Vec2::new(0.0, 0.0)),
        ]
    }

    /// Get the vertex buffer layout descriptor
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                // Position
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                // Tex Coords
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_layout_is_packed() {
        assert_eq!(std::mem::size_of::<Vertex>(), 16);
        assert_eq!(Vertex::desc().array_stride, 16);
    }

    #[test]
    fn test_quad_maps_top_left_to_uv_origin() {
        let quad = Vertex::quad();
        let top_left = quad
            .iter()
            .find(|v| v.position == [-1.0, 1.0])
            .map(|v| v.tex_coords);
        assert_eq!(top_left, Some([0.0, 0.0]));
        assert!(QUAD_INDICES.iter().all(|&i| (i as usize) < quad.len()));
    }
}
