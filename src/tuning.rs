//! Designer-tunable magnitudes
//!
//! Force scales and sizes here are tuning values picked by feel, not derived
//! from physics. Levels and the native runner can override them from JSON.

use serde::{Deserialize, Serialize};

use crate::error::LevelError;

/// Tuning values for one adventure session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === World ===
    /// Downward gravity magnitude (m/s²)
    pub gravity: f32,

    // === Ball ===
    pub ball_radius: f32,
    pub ball_mass: f32,
    pub ball_friction: f32,
    pub ball_restitution: f32,

    // === Track ===
    /// Ramp floor slab thickness
    pub ramp_thickness: f32,
    /// Side wall thickness
    pub wall_thickness: f32,
    /// Default ramp surface friction
    pub ramp_friction: f32,
    /// How far below the lowest track point a ball is considered lost
    pub kill_plane_margin: f32,

    // === Zone force scales ===
    /// Multiplier on conveyor belt speed
    pub conveyor_scale: f32,
    /// Multiplier on gravity well strength
    pub gravity_well_scale: f32,
    /// Multiplier on damping field coefficient
    pub damping_scale: f32,

    // === Feeders ===
    /// Multiplier on every feeder eject impulse
    pub feeder_impulse_scale: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: 9.81,

            ball_radius: crate::consts::BALL_RADIUS,
            ball_mass: 1.0,
            ball_friction: 0.2,
            ball_restitution: 0.4,

            ramp_thickness: 0.5,
            wall_thickness: 0.3,
            ramp_friction: 0.1,
            kill_plane_margin: 10.0,

            conveyor_scale: 10.0,
            gravity_well_scale: 10.0,
            damping_scale: 1.0,

            feeder_impulse_scale: 1.0,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        log::info!("Loaded tuning overrides");
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, LevelError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load tuning from a JSON file (native only)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: &str) -> Result<Self, LevelError> {
        let json = std::fs::read_to_string(path).map_err(|source| LevelError::Io {
            path: path.to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn gravity_vector(&self) -> glam::Vec3 {
        glam::Vec3::new(0.0, -self.gravity, 0.0)
    }
}
