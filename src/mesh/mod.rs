//! Mesh data for the visual side of track pieces
//!
//! The scene graph receives plain vertex/index buffers; how they are uploaded
//! is the scene graph's business.

pub mod hull;
pub mod shapes;
pub mod vertex;

pub use hull::{ConvexHull, HullFace};
pub use vertex::{Vertex, colors};

use serde::{Deserialize, Serialize};

/// Indexed triangle list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn with_capacity(vertices: usize, indices: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertices),
            indices: Vec::with_capacity(indices),
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Raw vertex bytes, ready for a GPU buffer upload
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

/// Surface appearance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub color: [f32; 4],
    /// Emissive glow strength (0 = none)
    pub emissive: f32,
    pub wireframe: bool,
}

impl Material {
    pub fn solid(color: [f32; 4]) -> Self {
        Self {
            color,
            emissive: 0.0,
            wireframe: false,
        }
    }

    pub fn glowing(color: [f32; 4], emissive: f32) -> Self {
        Self {
            color,
            emissive,
            wireframe: false,
        }
    }

    /// Translucent volume marker for sensors
    pub fn sensor(color: [f32; 4]) -> Self {
        Self {
            color,
            emissive: 0.5,
            wireframe: true,
        }
    }
}
