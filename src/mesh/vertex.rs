//! Vertex types for 3D track meshes

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

/// Lit vertex with position, normal and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(position: [f32; 3], normal: [f32; 3], color: [f32; 4]) -> Self {
        Self {
            position,
            normal,
            color,
        }
    }

    pub fn from_vec(position: Vec3, normal: Vec3, color: [f32; 4]) -> Self {
        Self::new(position.to_array(), normal.to_array(), color)
    }
}

/// Colors for adventure track elements
pub mod colors {
    pub const RAMP: [f32; 4] = [0.12, 0.14, 0.22, 1.0];
    pub const WALL: [f32; 4] = [0.3, 0.85, 1.0, 0.6];
    pub const PIN: [f32; 4] = [0.85, 0.85, 0.9, 1.0];
    pub const CRUSHER: [f32; 4] = [1.0, 0.35, 0.15, 1.0];
    pub const SWEEPER: [f32; 4] = [1.0, 0.8, 0.2, 1.0];
    pub const PADDLE: [f32; 4] = [0.2, 0.8, 0.4, 1.0];
    pub const DEBRIS: [f32; 4] = [0.45, 0.4, 0.5, 1.0];
    pub const PRISM: [f32; 4] = [0.7, 0.4, 1.0, 0.8];
    pub const BALL: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const CONVEYOR: [f32; 4] = [0.2, 1.0, 0.6, 0.3];
    pub const GRAVITY_WELL: [f32; 4] = [0.6, 0.2, 0.8, 0.3];
    pub const DAMPING: [f32; 4] = [0.3, 0.5, 0.9, 0.3];
    pub const FEEDER: [f32; 4] = [0.9, 0.9, 0.3, 1.0];
}
