//! Level descriptions
//!
//! A level is an ordered list of track pieces laid end to end from a start
//! cursor. Zones and feeders attach to the most recently placed segment.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use super::feeders::{FeederKind, FeederSpec};
use super::frame::Cursor;
use super::obstacles::ObstacleSpec;
use super::track::{CurvedRampParams, StraightRampParams};
use super::zones::{ZoneEffectSpec, ZoneSpec};
use crate::consts::{MAX_CHORDS, MAX_OBSTACLES_PER_PIECE};
use crate::engine::ChromaColor;
use crate::error::LevelError;

/// Most balls a level may drop at once
pub const MAX_BALLS: u32 = 16;

/// Built-in tracks, in rotation order
pub const BUILTIN_LEVELS: [&str; 11] = [
    "neon_helix",
    "cyber_core",
    "quantum_grid",
    "singularity_well",
    "glitch_spire",
    "retro_wave_hills",
    "chrono_core",
    "hyper_drift",
    "pachinko_spire",
    "orbital_junkyard",
    "firewall_breach",
];

fn default_ball_count() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "piece", rename_all = "snake_case")]
pub enum TrackPiece {
    Straight {
        ramp: StraightRampParams,
        #[serde(default)]
        obstacles: Vec<ObstacleSpec>,
    },
    Curve {
        ramp: CurvedRampParams,
    },
    /// Open jump: the cursor moves without placing geometry
    Gap { length: f32, drop: f32 },
    Zone(ZoneSpec),
    Feeder(FeederSpec),
}

impl TrackPiece {
    fn places_segment(&self) -> bool {
        matches!(self, TrackPiece::Straight { .. } | TrackPiece::Curve { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelSpec {
    pub name: String,
    /// Seed for randomized placements
    #[serde(default)]
    pub seed: u64,
    #[serde(default)]
    pub start: Cursor,
    #[serde(default = "default_ball_count")]
    pub ball_count: u32,
    pub pieces: Vec<TrackPiece>,
}

impl LevelSpec {
    /// Parse and validate a level
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        let level: LevelSpec = serde_json::from_str(json)?;
        level.validate()?;
        Ok(level)
    }

    pub fn to_json(&self) -> Result<String, LevelError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a level from a JSON file (native only)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: &str) -> Result<Self, LevelError> {
        let json = std::fs::read_to_string(path).map_err(|source| LevelError::Io {
            path: path.to_string(),
            source,
        })?;
        let level = Self::from_json(&json)?;
        log::info!("Loaded level '{}' from {}", level.name, path);
        Ok(level)
    }

    /// Reject levels that cannot produce a playable track. Individual bad pieces
    /// are tolerated (skipped at build time); these checks cover the level as a whole.
    pub fn validate(&self) -> Result<(), LevelError> {
        let invalid = |reason: &str| LevelError::Invalid {
            name: self.name.clone(),
            reason: reason.to_string(),
        };
        if self.name.trim().is_empty() {
            return Err(invalid("name is empty"));
        }
        if !self.start.is_finite() {
            return Err(invalid("start cursor is not finite"));
        }
        if self.ball_count == 0 || self.ball_count > MAX_BALLS {
            return Err(invalid(&format!(
                "ball_count must be in 1..={MAX_BALLS}, got {}",
                self.ball_count
            )));
        }
        let Some(first) = self.pieces.iter().position(TrackPiece::places_segment) else {
            return Err(invalid("no straight or curve pieces"));
        };
        if self.pieces[..first]
            .iter()
            .any(|p| matches!(p, TrackPiece::Zone(_) | TrackPiece::Feeder(_)))
        {
            return Err(invalid("zone or feeder placed before the first segment"));
        }
        for (index, piece) in self.pieces.iter().enumerate() {
            match piece {
                TrackPiece::Curve { ramp } if ramp.segments > MAX_CHORDS => {
                    return Err(invalid(&format!(
                        "piece {index}: curve has {} chords, limit is {MAX_CHORDS}",
                        ramp.segments
                    )));
                }
                TrackPiece::Straight { obstacles, .. } => {
                    if let Some(spec) = obstacles
                        .iter()
                        .find(|o| o.requested_count() > u64::from(MAX_OBSTACLES_PER_PIECE))
                    {
                        return Err(invalid(&format!(
                            "piece {index}: {} obstacles requested, limit is {MAX_OBSTACLES_PER_PIECE}",
                            spec.requested_count()
                        )));
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Straight and curve pieces only
    pub fn segment_pieces(&self) -> usize {
        self.pieces.iter().filter(|p| p.places_segment()).count()
    }
}

/// Look up a built-in level by name
pub fn builtin(name: &str) -> Result<LevelSpec, LevelError> {
    let level = match name {
        "neon_helix" => neon_helix(),
        "cyber_core" => cyber_core(),
        "quantum_grid" => quantum_grid(),
        "singularity_well" => singularity_well(),
        "glitch_spire" => glitch_spire(),
        "retro_wave_hills" => retro_wave_hills(),
        "chrono_core" => chrono_core(),
        "hyper_drift" => hyper_drift(),
        "pachinko_spire" => pachinko_spire(),
        "orbital_junkyard" => orbital_junkyard(),
        "firewall_breach" => firewall_breach(),
        _ => return Err(LevelError::UnknownLevel(name.to_string())),
    };
    Ok(level)
}

pub fn builtin_names() -> &'static [&'static str] {
    &BUILTIN_LEVELS
}

/// Position of a built-in in the rotation
pub fn builtin_index(name: &str) -> Option<usize> {
    BUILTIN_LEVELS.iter().position(|n| *n == name)
}

/// HUD form of a level name: `retro_wave_hills` -> `RETRO WAVE HILLS`
pub fn display_name(name: &str) -> String {
    name.replace('_', " ").to_uppercase()
}

fn straight(length: f32, incline: f32, obstacles: Vec<ObstacleSpec>) -> TrackPiece {
    TrackPiece::Straight {
        ramp: StraightRampParams {
            length,
            incline,
            ..Default::default()
        },
        obstacles,
    }
}

fn curve(radius: f32, total_angle: f32, incline: f32, banking: f32) -> TrackPiece {
    TrackPiece::Curve {
        ramp: CurvedRampParams {
            radius,
            total_angle,
            incline,
            banking,
            ..Default::default()
        },
    }
}

fn zone(at: f32, half_extents: Vec3, effect: ZoneEffectSpec) -> TrackPiece {
    TrackPiece::Zone(ZoneSpec {
        at,
        across: 0.0,
        half_extents,
        effect,
    })
}

fn feeder(kind: FeederKind, at: f32) -> TrackPiece {
    TrackPiece::Feeder(FeederSpec {
        kind,
        at,
        across: 0.0,
        height: 1.0,
        config: None,
    })
}

fn gap(length: f32, drop: f32) -> TrackPiece {
    TrackPiece::Gap { length, drop }
}

fn pins(rows: u32, cols: u32, pin_radius: f32) -> ObstacleSpec {
    ObstacleSpec::PinGrid {
        rows,
        cols,
        pin_radius,
        pin_height: 1.0,
        margin: 0.2,
    }
}

fn debris(count: u32, min_size: f32, max_size: f32) -> ObstacleSpec {
    ObstacleSpec::Debris {
        count,
        min_size,
        max_size,
        margin: 0.2,
    }
}

fn prisms(count: u32, radius: f32) -> ObstacleSpec {
    ObstacleSpec::Prisms {
        count,
        radius,
        margin: 0.2,
    }
}

fn barrier(at: f32, color: ChromaColor, height: f32) -> ObstacleSpec {
    ObstacleSpec::ChromaBarrier {
        at,
        color,
        thickness: 0.4,
        height,
    }
}

fn gate(at: f32, color: ChromaColor) -> TrackPiece {
    zone(
        at,
        Vec3::new(3.5, 1.5, 1.0),
        ZoneEffectSpec::ChromaGate { color },
    )
}

fn level(name: &str, seed: u64, start: Cursor, ball_count: u32, pieces: Vec<TrackPiece>) -> LevelSpec {
    LevelSpec {
        name: name.to_string(),
        seed,
        start,
        ball_count,
        pieces,
    }
}

/// Two banked half turns with pins, debris and prisms
fn neon_helix() -> LevelSpec {
    level(
        "neon_helix",
        0x5EED_0001,
        Cursor::new(Vec3::new(0.0, 40.0, 0.0), 0.0),
        3,
        vec![
            straight(16.0, 0.2, vec![pins(4, 5, 0.2)]),
            curve(12.0, PI, 0.12, 0.08),
            straight(12.0, 0.15, vec![debris(6, 0.3, 0.8)]),
            zone(
                0.5,
                Vec3::new(3.0, 1.0, 3.0),
                ZoneEffectSpec::Conveyor { speed: 1.0 },
            ),
            curve(12.0, PI, 0.12, 0.08),
            straight(14.0, 0.18, vec![prisms(5, 0.5)]),
            feeder(FeederKind::MagneticSpinner, 0.9),
            straight(10.0, 0.1, Vec::new()),
        ],
    )
}

/// Moving hazards, a jump and a gauss cannon
fn cyber_core() -> LevelSpec {
    level(
        "cyber_core",
        0x5EED_0002,
        Cursor::new(Vec3::new(0.0, 30.0, 0.0), FRAC_PI_2),
        2,
        vec![
            straight(
                24.0,
                0.15,
                vec![
                    ObstacleSpec::Crusher {
                        at: 0.35,
                        size: Vec3::new(4.0, 1.5, 2.0),
                        amplitude: 1.2,
                        frequency: 2.0,
                        phase: 0.0,
                    },
                    ObstacleSpec::Sweeper {
                        at: 0.7,
                        length: 3.0,
                        thickness: 0.4,
                        amplitude: 2.0,
                        frequency: 1.5,
                        phase: FRAC_PI_2,
                    },
                ],
            ),
            gap(3.0, 1.5),
            straight(
                20.0,
                0.12,
                vec![
                    ObstacleSpec::Paddle {
                        at: 0.3,
                        across: -0.4,
                        length: 2.5,
                        amplitude: 0.9,
                        frequency: 3.0,
                        phase: 0.0,
                    },
                    ObstacleSpec::Chicane {
                        count: 3,
                        reach: 0.55,
                        thickness: 0.4,
                        height: 0.8,
                        margin: 0.45,
                    },
                ],
            ),
            zone(
                0.85,
                Vec3::new(3.0, 1.5, 2.0),
                ZoneEffectSpec::GravityWell { strength: 0.8 },
            ),
            curve(10.0, -FRAC_PI_2, 0.1, -0.05),
            feeder(FeederKind::GaussCannon, 0.5),
            straight(18.0, 0.1, Vec::new()),
            zone(
                0.5,
                Vec3::new(3.0, 1.0, 4.0),
                ZoneEffectSpec::Damping { coefficient: 2.0 },
            ),
        ],
    )
}

/// Colour gates ahead of barriers, a prism core and a quantum tunnel
fn quantum_grid() -> LevelSpec {
    level(
        "quantum_grid",
        0x5EED_0003,
        Cursor::new(Vec3::new(0.0, 35.0, 0.0), 0.0),
        4,
        vec![
            straight(12.0, 0.2, Vec::new()),
            gate(0.3, ChromaColor::Red),
            straight(12.0, 0.2, vec![barrier(0.3, ChromaColor::Blue, 2.0)]),
            feeder(FeederKind::PrismCore, 0.8),
            curve(14.0, FRAC_PI_2, 0.1, 0.0),
            gate(0.5, ChromaColor::Green),
            straight(16.0, 0.14, vec![barrier(0.6, ChromaColor::Red, 2.0)]),
            feeder(FeederKind::QuantumTunnel, 0.4),
            feeder(FeederKind::NanoLoom, 0.9),
            straight(12.0, 0.1, Vec::new()),
        ],
    )
}

/// Gravity wells pulling across a switchback
fn singularity_well() -> LevelSpec {
    level(
        "singularity_well",
        0x5EED_0004,
        Cursor::new(Vec3::new(0.0, 45.0, 0.0), 0.0),
        3,
        vec![
            straight(14.0, 0.18, Vec::new()),
            zone(
                0.6,
                Vec3::new(3.0, 1.5, 3.0),
                ZoneEffectSpec::GravityWell { strength: 1.5 },
            ),
            curve(10.0, PI, 0.12, 0.1),
            straight(16.0, 0.15, vec![debris(8, 0.3, 0.7)]),
            zone(
                0.5,
                Vec3::new(3.0, 1.5, 3.0),
                ZoneEffectSpec::GravityWell { strength: 2.0 },
            ),
            feeder(FeederKind::MagneticSpinner, 0.85),
            curve(10.0, -PI, 0.12, -0.1),
            straight(12.0, 0.12, Vec::new()),
            zone(
                0.5,
                Vec3::new(3.0, 1.0, 4.0),
                ZoneEffectSpec::Damping { coefficient: 1.5 },
            ),
        ],
    )
}

/// Steep drops broken by a sweeper, a jump and a paddle
fn glitch_spire() -> LevelSpec {
    level(
        "glitch_spire",
        0x5EED_0005,
        Cursor::new(Vec3::new(0.0, 50.0, 0.0), -FRAC_PI_2),
        2,
        vec![
            straight(12.0, 0.22, Vec::new()),
            straight(
                14.0,
                0.18,
                vec![ObstacleSpec::Sweeper {
                    at: 0.5,
                    length: 2.5,
                    thickness: 0.4,
                    amplitude: 1.8,
                    frequency: 2.5,
                    phase: 0.0,
                }],
            ),
            feeder(FeederKind::NanoLoom, 0.9),
            gap(2.5, 1.0),
            straight(14.0, 0.15, vec![prisms(6, 0.5)]),
            zone(
                0.4,
                Vec3::new(3.0, 1.0, 2.0),
                ZoneEffectSpec::Conveyor { speed: 2.0 },
            ),
            curve(12.0, FRAC_PI_2, 0.1, 0.05),
            straight(
                12.0,
                0.12,
                vec![ObstacleSpec::Paddle {
                    at: 0.5,
                    across: 0.4,
                    length: 2.5,
                    amplitude: 1.0,
                    frequency: 2.0,
                    phase: 0.0,
                }],
            ),
        ],
    )
}

/// Alternating steep and shallow runs with conveyors on the flats
fn retro_wave_hills() -> LevelSpec {
    level(
        "retro_wave_hills",
        0x5EED_0006,
        Cursor::new(Vec3::new(0.0, 30.0, 0.0), PI),
        4,
        vec![
            straight(12.0, 0.22, Vec::new()),
            straight(10.0, 0.04, Vec::new()),
            zone(
                0.5,
                Vec3::new(3.0, 1.0, 4.0),
                ZoneEffectSpec::Conveyor { speed: 1.5 },
            ),
            straight(12.0, 0.2, vec![pins(3, 6, 0.2)]),
            curve(16.0, FRAC_PI_2, 0.06, 0.08),
            straight(12.0, 0.05, Vec::new()),
            zone(
                0.5,
                Vec3::new(3.0, 1.0, 4.0),
                ZoneEffectSpec::Conveyor { speed: 2.0 },
            ),
            feeder(FeederKind::GaussCannon, 0.8),
            straight(16.0, 0.12, Vec::new()),
        ],
    )
}

/// Crushers and paddles out of phase with each other
fn chrono_core() -> LevelSpec {
    let crusher = |at, phase| ObstacleSpec::Crusher {
        at,
        size: Vec3::new(4.0, 1.5, 1.5),
        amplitude: 1.0,
        frequency: 1.5,
        phase,
    };
    let paddle = |at, across, phase| ObstacleSpec::Paddle {
        at,
        across,
        length: 2.2,
        amplitude: 0.8,
        frequency: 2.0,
        phase,
    };
    level(
        "chrono_core",
        0x5EED_0007,
        Cursor::new(Vec3::new(0.0, 38.0, 0.0), FRAC_PI_4),
        2,
        vec![
            straight(14.0, 0.16, Vec::new()),
            straight(18.0, 0.14, vec![crusher(0.3, 0.0), crusher(0.6, PI)]),
            zone(
                0.85,
                Vec3::new(3.0, 1.0, 2.0),
                ZoneEffectSpec::Damping { coefficient: 1.0 },
            ),
            curve(12.0, -FRAC_PI_2, 0.1, -0.05),
            straight(
                16.0,
                0.12,
                vec![paddle(0.4, 0.4, 0.0), paddle(0.7, -0.4, FRAC_PI_2)],
            ),
            feeder(FeederKind::QuantumTunnel, 0.5),
            straight(10.0, 0.1, Vec::new()),
        ],
    )
}

/// Fast banked S-bend into a chicane and a cannon jump
fn hyper_drift() -> LevelSpec {
    level(
        "hyper_drift",
        0x5EED_0008,
        Cursor::new(Vec3::new(0.0, 42.0, 0.0), 0.0),
        3,
        vec![
            straight(20.0, 0.25, Vec::new()),
            zone(
                0.7,
                Vec3::new(3.0, 1.0, 3.0),
                ZoneEffectSpec::Conveyor { speed: 3.0 },
            ),
            curve(18.0, PI, 0.12, 0.15),
            curve(18.0, -PI, 0.12, -0.15),
            straight(
                14.0,
                0.15,
                vec![ObstacleSpec::Chicane {
                    count: 4,
                    reach: 0.55,
                    thickness: 0.4,
                    height: 0.8,
                    margin: 0.3,
                }],
            ),
            feeder(FeederKind::GaussCannon, 0.9),
            gap(4.0, 2.0),
            straight(16.0, 0.1, Vec::new()),
            zone(
                0.5,
                Vec3::new(3.0, 1.0, 5.0),
                ZoneEffectSpec::Damping { coefficient: 2.5 },
            ),
        ],
    )
}

/// Two dense pin fields joined by hairpins
fn pachinko_spire() -> LevelSpec {
    level(
        "pachinko_spire",
        0x5EED_0009,
        Cursor::new(Vec3::new(0.0, 55.0, 0.0), 0.0),
        8,
        vec![
            straight(10.0, 0.2, Vec::new()),
            straight(18.0, 0.28, vec![pins(6, 7, 0.18)]),
            zone(
                0.9,
                Vec3::new(3.0, 1.5, 2.0),
                ZoneEffectSpec::GravityWell { strength: 0.6 },
            ),
            curve(10.0, PI, 0.12, 0.1),
            straight(18.0, 0.25, vec![pins(5, 6, 0.2)]),
            feeder(FeederKind::PrismCore, 0.9),
            curve(10.0, -PI, 0.12, -0.1),
            straight(12.0, 0.1, Vec::new()),
        ],
    )
}

/// Scattered debris and prisms with two feeders
fn orbital_junkyard() -> LevelSpec {
    level(
        "orbital_junkyard",
        0x5EED_000A,
        Cursor::new(Vec3::new(0.0, 40.0, 0.0), -FRAC_PI_4),
        3,
        vec![
            straight(14.0, 0.18, Vec::new()),
            straight(16.0, 0.16, vec![debris(10, 0.3, 0.9)]),
            zone(
                0.5,
                Vec3::new(3.0, 1.5, 3.0),
                ZoneEffectSpec::GravityWell { strength: 1.0 },
            ),
            feeder(FeederKind::MagneticSpinner, 0.85),
            curve(14.0, FRAC_PI_2, 0.1, 0.05),
            straight(16.0, 0.14, vec![prisms(8, 0.45)]),
            feeder(FeederKind::NanoLoom, 0.8),
            straight(12.0, 0.1, vec![debris(5, 0.3, 0.6)]),
        ],
    )
}

/// Barrier pairs that only a freshly gated ball gets through
fn firewall_breach() -> LevelSpec {
    level(
        "firewall_breach",
        0x5EED_000B,
        Cursor::new(Vec3::new(0.0, 36.0, 0.0), FRAC_PI_2),
        3,
        vec![
            straight(12.0, 0.2, Vec::new()),
            gate(0.4, ChromaColor::Green),
            straight(
                14.0,
                0.15,
                vec![
                    barrier(0.3, ChromaColor::Red, 1.5),
                    barrier(0.7, ChromaColor::Blue, 1.5),
                ],
            ),
            feeder(FeederKind::QuantumTunnel, 0.9),
            curve(12.0, -FRAC_PI_2, 0.1, 0.0),
            gate(0.5, ChromaColor::Blue),
            straight(
                14.0,
                0.14,
                vec![
                    barrier(0.4, ChromaColor::Green, 1.5),
                    ObstacleSpec::Sweeper {
                        at: 0.75,
                        length: 2.0,
                        thickness: 0.4,
                        amplitude: 1.5,
                        frequency: 1.2,
                        phase: 0.0,
                    },
                ],
            ),
            feeder(FeederKind::PrismCore, 0.9),
            straight(10.0, 0.1, Vec::new()),
        ],
    )
}
