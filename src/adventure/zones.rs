//! Zone effect engine
//!
//! Zones are sensor volumes with an effect payload. Each tick every zone is
//! tested against every free ball (zones × balls, both small) and overlapping
//! balls receive the effect. Zones keep no state between ticks.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::ball::Ball;
use super::frame::SurfaceFrame;
use super::registry::{Registry, Spawned};
use crate::engine::{BodyDesc, ChromaColor, ColliderDesc, Engine, Shape};
use crate::mesh::{Material, colors, shapes};
use crate::tuning::Tuning;

/// Resolved effect, in world terms
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ZoneEffect {
    /// Constant push: impulse = force·dt
    Conveyor { force: Vec3 },
    /// Pull toward (or, with negative strength, push away from) a point
    GravityWell { center: Vec3, strength: f32 },
    /// Velocity drag: impulse = -velocity·damping·dt
    Damping { coefficient: f32 },
    /// Retags the ball with a colour
    ChromaGate { color: ChromaColor },
}

impl ZoneEffect {
    /// Impulse for a ball at `position` moving at `velocity`; `None` for
    /// effects that do not push (chroma gates)
    pub fn impulse(&self, position: Vec3, velocity: Vec3, dt: f32) -> Option<Vec3> {
        match *self {
            ZoneEffect::Conveyor { force } => Some(force * dt),
            ZoneEffect::GravityWell { center, strength } => {
                Some((center - position).normalize_or_zero() * strength * dt)
            }
            ZoneEffect::Damping { coefficient } => Some(-velocity * coefficient * dt),
            ZoneEffect::ChromaGate { .. } => None,
        }
    }

    fn color(&self) -> [f32; 4] {
        match self {
            ZoneEffect::Conveyor { .. } => colors::CONVEYOR,
            ZoneEffect::GravityWell { .. } => colors::GRAVITY_WELL,
            ZoneEffect::Damping { .. } => colors::DAMPING,
            ZoneEffect::ChromaGate { color } => {
                let [r, g, b, _] = color.rgba();
                [r, g, b, 0.35]
            }
        }
    }
}

/// Effect as authored in a level, relative to the host segment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ZoneEffectSpec {
    /// Push down the segment (negative speed pushes back uphill)
    Conveyor { speed: f32 },
    GravityWell { strength: f32 },
    Damping { coefficient: f32 },
    ChromaGate { color: ChromaColor },
}

impl ZoneEffectSpec {
    /// Resolve against the host frame, zone center and tuning scales
    pub fn resolve(&self, frame: &SurfaceFrame, center: Vec3, tuning: &Tuning) -> ZoneEffect {
        match *self {
            ZoneEffectSpec::Conveyor { speed } => ZoneEffect::Conveyor {
                force: frame.forward * speed * tuning.conveyor_scale,
            },
            ZoneEffectSpec::GravityWell { strength } => ZoneEffect::GravityWell {
                center,
                strength: strength * tuning.gravity_well_scale,
            },
            ZoneEffectSpec::Damping { coefficient } => ZoneEffect::Damping {
                coefficient: coefficient * tuning.damping_scale,
            },
            ZoneEffectSpec::ChromaGate { color } => ZoneEffect::ChromaGate { color },
        }
    }
}

/// Zone placement on the most recent segment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoneSpec {
    /// Fraction along the segment (0 = start, 1 = end)
    pub at: f32,
    /// Fraction across the half width (-1 .. 1)
    #[serde(default)]
    pub across: f32,
    pub half_extents: Vec3,
    pub effect: ZoneEffectSpec,
}

#[derive(Debug, Clone)]
pub struct Zone {
    pub sensor: Spawned,
    pub center: Vec3,
    pub effect: ZoneEffect,
}

#[derive(Debug, Default)]
pub struct ZoneField {
    zones: Vec<Zone>,
}

impl ZoneField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    pub fn clear(&mut self) {
        self.zones.clear();
    }

    /// Create a sensor box on `frame` and register it
    pub fn place(
        &mut self,
        engine: &mut Engine<'_>,
        registry: &mut Registry,
        tuning: &Tuning,
        frame: &SurfaceFrame,
        spec: &ZoneSpec,
    ) -> Option<&Zone> {
        let at = spec.at.clamp(0.0, 1.0);
        let across = spec.across.clamp(-1.0, 1.0);
        let half = spec.half_extents.abs();
        let center = frame.point_at(at, across, half.y);
        let effect = spec.effect.resolve(frame, center, tuning);

        let sensor = registry.spawn(
            engine,
            &format!("zone_{}", self.zones.len()),
            &BodyDesc::fixed(frame.pose_at(center)),
            &ColliderDesc::sensor(Shape::Cuboid { half_extents: half }),
            shapes::cuboid(half, effect.color()),
            Material::sensor(effect.color()),
        )?;
        log::debug!("Zone {:?} at {:?}", effect, center);
        self.zones.push(Zone {
            sensor,
            center,
            effect,
        });
        self.zones.last()
    }

    /// Apply every zone to every overlapping free ball; returns overlaps handled
    pub fn apply(&self, engine: &mut Engine<'_>, balls: &mut [Ball], dt: f32) -> usize {
        let mut hits = 0;
        for zone in &self.zones {
            for ball in balls.iter_mut() {
                if !ball.is_free() || !engine.world.intersects(zone.sensor.collider, ball.collider) {
                    continue;
                }
                hits += 1;
                match zone.effect {
                    ZoneEffect::ChromaGate { color } => ball.set_chroma(engine, Some(color)),
                    effect => {
                        let (Some(pose), Some(velocity)) = (
                            engine.world.pose(ball.body),
                            engine.world.linear_velocity(ball.body),
                        ) else {
                            continue;
                        };
                        if let Some(impulse) = effect.impulse(pose.position, velocity, dt) {
                            engine.world.apply_impulse(ball.body, impulse);
                        }
                    }
                }
            }
        }
        hits
    }
}
