//! Capture/release feeders
//!
//! Every feeder runs the same automaton:
//!
//! ```text
//! Idle -> Capture (load) -> Hold (spin/aim/weave) -> Release -> Cooldown -> Idle
//! ```
//!
//! The five presets differ only in their `FeederConfig`: timings, eject
//! impulse and direction, and how the ball moves while held.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use super::ball::{Ball, BallMode, FeederId};
use super::frame::SurfaceFrame;
use super::registry::{Registry, Spawned};
use crate::engine::{BodyDesc, ColliderDesc, Engine, Pose, Shape};
use crate::mesh::{Material, colors, shapes};

/// How a held ball moves, relative to the feeder center
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HoldMotion {
    Still,
    /// Orbit in the surface plane
    Spin { radius: f32, rate: f32 },
    /// Stay centered while the barrel sweeps left and right; fires along the aim
    Aim { sweep: f32, rate: f32 },
    /// Slide side to side across the track
    Weave { amplitude: f32, rate: f32 },
    /// Jump to the exit and eject from there
    Tunnel { exit_offset: Vec3 },
}

impl HoldMotion {
    /// Local offset of the held ball after `t` seconds of hold
    pub fn offset(&self, t: f32) -> Vec3 {
        match *self {
            HoldMotion::Still | HoldMotion::Aim { .. } => Vec3::ZERO,
            HoldMotion::Spin { radius, rate } => {
                Vec3::new((rate * t).sin() * radius, 0.0, (rate * t).cos() * radius)
            }
            HoldMotion::Weave { amplitude, rate } => Vec3::X * (rate * t).sin() * amplitude,
            HoldMotion::Tunnel { exit_offset } => exit_offset,
        }
    }

    /// Barrel yaw about the local up axis after `t` seconds of hold
    pub fn aim(&self, t: f32) -> f32 {
        match *self {
            HoldMotion::Aim { sweep, rate } => (rate * t).sin() * sweep,
            _ => 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeederConfig {
    pub capture_radius: f32,
    /// Seconds spent pulling the ball to the hold point
    pub load_time: f32,
    pub hold_time: f32,
    pub cooldown: f32,
    pub eject_impulse: f32,
    /// Eject direction in the feeder's local frame (+Z runs down the track)
    pub eject_direction: Vec3,
    pub hold_motion: HoldMotion,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeederKind {
    MagneticSpinner,
    PrismCore,
    GaussCannon,
    NanoLoom,
    QuantumTunnel,
}

impl FeederKind {
    pub const ALL: [FeederKind; 5] = [
        FeederKind::MagneticSpinner,
        FeederKind::PrismCore,
        FeederKind::GaussCannon,
        FeederKind::NanoLoom,
        FeederKind::QuantumTunnel,
    ];

    pub fn config(self) -> FeederConfig {
        match self {
            FeederKind::MagneticSpinner => FeederConfig {
                capture_radius: 1.5,
                load_time: 0.5,
                hold_time: 1.5,
                cooldown: 2.0,
                eject_impulse: 12.0,
                eject_direction: Vec3::new(0.0, 0.3, 1.0),
                hold_motion: HoldMotion::Spin {
                    radius: 1.0,
                    rate: 8.0,
                },
            },
            FeederKind::PrismCore => FeederConfig {
                capture_radius: 2.0,
                load_time: 0.8,
                hold_time: 1.0,
                cooldown: 3.0,
                eject_impulse: 10.0,
                eject_direction: Vec3::new(0.0, 1.0, 0.5),
                hold_motion: HoldMotion::Still,
            },
            FeederKind::GaussCannon => FeederConfig {
                capture_radius: 1.5,
                load_time: 0.4,
                hold_time: 2.0,
                cooldown: 2.5,
                eject_impulse: 25.0,
                eject_direction: Vec3::new(0.0, 0.15, 1.0),
                hold_motion: HoldMotion::Aim {
                    sweep: 0.6,
                    rate: 2.0,
                },
            },
            FeederKind::NanoLoom => FeederConfig {
                capture_radius: 1.5,
                load_time: 0.5,
                hold_time: 2.5,
                cooldown: 2.0,
                eject_impulse: 8.0,
                eject_direction: Vec3::new(0.0, 0.2, 1.0),
                hold_motion: HoldMotion::Weave {
                    amplitude: 1.0,
                    rate: 3.0,
                },
            },
            FeederKind::QuantumTunnel => FeederConfig {
                capture_radius: 1.2,
                load_time: 0.3,
                hold_time: 0.5,
                cooldown: 1.5,
                eject_impulse: 6.0,
                eject_direction: Vec3::Z,
                hold_motion: HoldMotion::Tunnel {
                    exit_offset: Vec3::new(0.0, 0.0, 8.0),
                },
            },
        }
    }

    fn name(self) -> &'static str {
        match self {
            FeederKind::MagneticSpinner => "magnetic_spinner",
            FeederKind::PrismCore => "prism_core",
            FeederKind::GaussCannon => "gauss_cannon",
            FeederKind::NanoLoom => "nano_loom",
            FeederKind::QuantumTunnel => "quantum_tunnel",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FeederPhase {
    Idle,
    Capture { ball: u32, elapsed: f32, from: Vec3 },
    Hold { ball: u32, elapsed: f32 },
    Release { ball: u32, point: Vec3, direction: Vec3 },
    Cooldown { remaining: f32 },
}

/// Observable transitions, reported to the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeederEvent {
    Captured { feeder: FeederId, ball: u32 },
    Released { feeder: FeederId, ball: u32 },
    /// The held ball vanished
    Lost { feeder: FeederId, ball: u32 },
}

/// Feeder placement on the most recent segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeederSpec {
    pub kind: FeederKind,
    pub at: f32,
    #[serde(default)]
    pub across: f32,
    /// Height of the capture point above the surface
    #[serde(default = "default_feeder_height")]
    pub height: f32,
    /// Replaces the preset wholesale
    #[serde(default)]
    pub config: Option<FeederConfig>,
}

fn default_feeder_height() -> f32 {
    1.0
}

#[inline]
fn smoothstep(s: f32) -> f32 {
    let s = s.clamp(0.0, 1.0);
    s * s * (3.0 - 2.0 * s)
}

#[derive(Debug, Clone)]
pub struct Feeder {
    pub id: FeederId,
    pub kind: FeederKind,
    pub config: FeederConfig,
    pub center: Vec3,
    /// Orientation of the local frame (that of the host surface)
    pub rotation: Quat,
    pub phase: FeederPhase,
    pub housing: Spawned,
    pub captures: u32,
    pub releases: u32,
}

impl Feeder {
    /// World position of the held ball after `t` seconds of hold
    pub fn hold_point(&self, t: f32) -> Vec3 {
        self.center + self.rotation * self.config.hold_motion.offset(t)
    }

    /// World eject direction after `t` seconds of hold
    pub fn eject_direction(&self, t: f32) -> Vec3 {
        let local = self
            .config
            .eject_direction
            .try_normalize()
            .unwrap_or(Vec3::Z);
        self.rotation * Quat::from_rotation_y(self.config.hold_motion.aim(t)) * local
    }

    pub fn is_idle(&self) -> bool {
        self.phase == FeederPhase::Idle
    }

    /// Advance the automaton by `dt`
    pub fn tick(
        &mut self,
        engine: &mut Engine<'_>,
        balls: &mut [Ball],
        dt: f32,
        impulse_scale: f32,
    ) -> Option<FeederEvent> {
        match self.phase {
            FeederPhase::Idle => {
                let radius = self.config.capture_radius;
                let ball = balls.iter_mut().find(|b| {
                    b.is_free()
                        && b.position(engine.world)
                            .is_some_and(|p| p.distance(self.center) <= radius)
                })?;
                let from = ball.position(engine.world)?;
                if !ball.capture(engine.world, self.id) {
                    return None;
                }
                self.captures += 1;
                self.phase = FeederPhase::Capture {
                    ball: ball.id,
                    elapsed: 0.0,
                    from,
                };
                log::debug!("{} {} captured ball {}", self.kind.name(), self.id, ball.id);
                Some(FeederEvent::Captured {
                    feeder: self.id,
                    ball: ball.id,
                })
            }
            FeederPhase::Capture { ball, elapsed, from } => {
                let Some(held) = self.held(engine, balls, ball) else {
                    return self.lose(ball);
                };
                let elapsed = elapsed + dt;
                let s = if self.config.load_time > 0.0 {
                    smoothstep(elapsed / self.config.load_time)
                } else {
                    1.0
                };
                let target = from.lerp(self.hold_point(0.0), s);
                engine
                    .world
                    .set_next_kinematic_pose(held.body, Pose::from_position(target));
                self.phase = if elapsed >= self.config.load_time {
                    FeederPhase::Hold { ball, elapsed: 0.0 }
                } else {
                    FeederPhase::Capture { ball, elapsed, from }
                };
                None
            }
            FeederPhase::Hold { ball, elapsed } => {
                let Some(held) = self.held(engine, balls, ball) else {
                    return self.lose(ball);
                };
                let elapsed = elapsed + dt;
                let point = self.hold_point(elapsed);
                engine
                    .world
                    .set_next_kinematic_pose(held.body, Pose::from_position(point));
                self.phase = if elapsed >= self.config.hold_time {
                    FeederPhase::Release {
                        ball,
                        point,
                        direction: self.eject_direction(elapsed),
                    }
                } else {
                    FeederPhase::Hold { ball, elapsed }
                };
                None
            }
            FeederPhase::Release {
                ball,
                point,
                direction,
            } => {
                let Some(held) = self.held(engine, balls, ball) else {
                    return self.lose(ball);
                };
                held.release(engine.world);
                engine.world.set_pose(held.body, Pose::from_position(point));
                engine.world.set_linear_velocity(held.body, Vec3::ZERO);
                engine.world.apply_impulse(
                    held.body,
                    direction * self.config.eject_impulse * impulse_scale,
                );
                self.releases += 1;
                self.phase = FeederPhase::Cooldown {
                    remaining: self.config.cooldown,
                };
                log::debug!("{} {} released ball {}", self.kind.name(), self.id, ball);
                Some(FeederEvent::Released {
                    feeder: self.id,
                    ball,
                })
            }
            FeederPhase::Cooldown { remaining } => {
                let remaining = remaining - dt;
                self.phase = if remaining <= 0.0 {
                    FeederPhase::Idle
                } else {
                    FeederPhase::Cooldown { remaining }
                };
                None
            }
        }
    }

    /// The ball this feeder holds, if it still exists and is still ours
    fn held<'b>(&self, engine: &Engine<'_>, balls: &'b mut [Ball], id: u32) -> Option<&'b mut Ball> {
        balls.iter_mut().find(|b| {
            b.id == id
                && b.mode == BallMode::Captured { by: self.id }
                && engine.world.contains_body(b.body)
        })
    }

    fn lose(&mut self, ball: u32) -> Option<FeederEvent> {
        log::warn!("{} {} lost ball {}", self.kind.name(), self.id, ball);
        self.phase = FeederPhase::Cooldown {
            remaining: self.config.cooldown,
        };
        Some(FeederEvent::Lost {
            feeder: self.id,
            ball,
        })
    }
}

/// All feeders of a session
#[derive(Debug, Default)]
pub struct FeederBank {
    feeders: Vec<Feeder>,
    next_id: FeederId,
}

impl FeederBank {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn feeders(&self) -> &[Feeder] {
        &self.feeders
    }

    pub fn len(&self) -> usize {
        self.feeders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.feeders.is_empty()
    }

    pub fn clear(&mut self) {
        self.feeders.clear();
        self.next_id = 0;
    }

    /// Build the housing (sensor sphere of the capture radius plus a pad mesh)
    pub fn place(
        &mut self,
        engine: &mut Engine<'_>,
        registry: &mut Registry,
        frame: &SurfaceFrame,
        spec: &FeederSpec,
    ) -> Option<&Feeder> {
        let config = spec.config.unwrap_or_else(|| spec.kind.config());
        if !(config.capture_radius.is_finite() && config.capture_radius > 0.0) {
            log::warn!("Skipping {:?} with capture radius {}", spec.kind, config.capture_radius);
            return None;
        }
        let center = frame.point_at(spec.at.clamp(0.0, 1.0), spec.across.clamp(-1.0, 1.0), spec.height);
        let id = self.next_id;
        let housing = registry.spawn(
            engine,
            &format!("{}_{id}", spec.kind.name()),
            &BodyDesc::fixed(frame.pose_at(center)),
            &ColliderDesc::sensor(Shape::Ball {
                radius: config.capture_radius,
            }),
            shapes::cylinder(config.capture_radius * 0.5, 0.1, 16, colors::FEEDER),
            Material::glowing(colors::FEEDER, 0.8),
        )?;
        self.next_id += 1;
        log::debug!("Feeder {:?} #{} at {:?}", spec.kind, id, center);
        self.feeders.push(Feeder {
            id,
            kind: spec.kind,
            config,
            center,
            rotation: frame.rotation,
            phase: FeederPhase::Idle,
            housing,
            captures: 0,
            releases: 0,
        });
        self.feeders.last()
    }

    /// Tick every feeder in placement order
    pub fn tick(
        &mut self,
        engine: &mut Engine<'_>,
        balls: &mut [Ball],
        dt: f32,
        impulse_scale: f32,
    ) -> Vec<FeederEvent> {
        self.feeders
            .iter_mut()
            .filter_map(|f| f.tick(engine, balls, dt, impulse_scale))
            .collect()
    }
}
