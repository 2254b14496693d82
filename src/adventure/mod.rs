//! Adventure mode: procedural tracks, hazards, zones and feeders
//!
//! Everything here talks to the physics world and scene graph only through
//! [`crate::engine::Engine`], passed in per call.

pub mod ball;
pub mod feeders;
pub mod frame;
pub mod kinematics;
pub mod levels;
pub mod obstacles;
pub mod registry;
pub mod session;
pub mod track;
pub mod zones;

pub use ball::{Ball, BallMode};
pub use feeders::{Feeder, FeederBank, FeederConfig, FeederEvent, FeederKind, FeederPhase, FeederSpec, HoldMotion};
pub use frame::{Cursor, SurfaceFrame};
pub use kinematics::{Choreographer, KinematicObstacle, Motion};
pub use levels::{BUILTIN_LEVELS, LevelSpec, TrackPiece, builtin, builtin_index, builtin_names, display_name};
pub use obstacles::{Obstacle, ObstacleField, ObstacleKind, ObstacleSpec};
pub use registry::Registry;
pub use session::{AdventureSession, FrameStepper, SessionStats};
pub use track::{CurvedRampParams, Segment, StraightRampParams, TrackGenerator};
pub use zones::{Zone, ZoneEffect, ZoneEffectSpec, ZoneField, ZoneSpec};
