//! Pachinball Adventure - procedural track core for a 3D pachinko/pinball game
//!
//! Core modules:
//! - `adventure`: Track generation, obstacles, choreography, zones, feeders, session
//! - `engine`: Physics world / scene graph interface, rapier3d backend
//! - `mesh`: Vertex data for the primitives the track is built from
//! - `platform`: Browser/native platform abstraction
//! - `tuning`: Data-driven force and size magnitudes

pub mod adventure;
pub mod engine;
pub mod error;
pub mod mesh;
pub mod platform;
pub mod tuning;

pub use error::{HullError, LevelError};
pub use tuning::Tuning;

use glam::Vec3;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz for smooth physics)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Largest frame delta accepted by the stepper (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 0.5;
    /// Ball drop height above the start cursor
    pub const BALL_SPAWN_HEIGHT: f32 = 1.5;
    /// Horizontal distance down the track from the start cursor to the first spawn row
    pub const BALL_SPAWN_AHEAD: f32 = 2.0;

    /// Margin kept clear at both ends of a segment for randomized placements
    pub const DEFAULT_PLACEMENT_MARGIN: f32 = 0.15;
    /// Largest allowed placement margin (fraction of segment length)
    pub const MAX_PLACEMENT_MARGIN: f32 = 0.45;

    /// Most chords a curved ramp may be split into
    pub const MAX_CHORDS: u32 = 256;
    /// Most obstacles a single spec may place on one segment
    pub const MAX_OBSTACLES_PER_PIECE: u32 = 512;
}

/// Normalized angle to [-π, π)
///
/// Non-finite input comes back as NaN.
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    if (-PI..PI).contains(&angle) {
        return angle;
    }
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    // rem_euclid can round up to TAU for tiny negative inputs
    if wrapped >= PI { wrapped - TAU } else { wrapped }
}

/// Horizontal unit vector for a heading (yaw about +Y, 0 = +Z)
#[inline]
pub fn heading_to_forward(heading: f32) -> Vec3 {
    Vec3::new(heading.sin(), 0.0, heading.cos())
}
