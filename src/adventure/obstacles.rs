//! Obstacle placement
//!
//! Hazards are laid out in a segment's surface frame: `along` runs down the
//! ramp, `across` spans the width, heights are measured from the riding
//! surface. Grid placements are deterministic; debris and prisms draw from the
//! level's seeded generator and stay clear of the segment's entry and exit.

use glam::{Quat, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::kinematics::{Choreographer, KinematicObstacle, Motion};
use super::registry::{Registry, Spawned};
use super::track::Segment;
use crate::consts::{DEFAULT_PLACEMENT_MARGIN, MAX_OBSTACLES_PER_PIECE, MAX_PLACEMENT_MARGIN};
use crate::engine::{BodyDesc, ChromaColor, ColliderDesc, CollisionGroups, Engine, Pose, Shape};
use crate::mesh::{ConvexHull, Material, MeshData, colors, shapes};

fn default_margin() -> f32 {
    DEFAULT_PLACEMENT_MARGIN
}

fn default_pin_radius() -> f32 {
    0.2
}

fn default_pin_height() -> f32 {
    1.0
}

fn default_bar_height() -> f32 {
    0.8
}

fn default_thickness() -> f32 {
    0.4
}

fn default_reach() -> f32 {
    0.6
}

/// Obstacle layout as authored in a level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ObstacleSpec {
    /// Rows of cylinder pins, odd rows staggered by half a column
    PinGrid {
        rows: u32,
        cols: u32,
        #[serde(default = "default_pin_radius")]
        pin_radius: f32,
        #[serde(default = "default_pin_height")]
        pin_height: f32,
        #[serde(default = "default_margin")]
        margin: f32,
    },
    /// Block pumping up and down at `at` (fraction of the segment length)
    Crusher {
        at: f32,
        /// Full edge lengths
        size: Vec3,
        amplitude: f32,
        frequency: f32,
        #[serde(default)]
        phase: f32,
    },
    /// Bar lying along the track and sliding side to side
    Sweeper {
        at: f32,
        length: f32,
        #[serde(default = "default_thickness")]
        thickness: f32,
        amplitude: f32,
        frequency: f32,
        #[serde(default)]
        phase: f32,
    },
    /// Bar swinging about the surface normal
    Paddle {
        at: f32,
        #[serde(default)]
        across: f32,
        length: f32,
        /// Swing angle in radians
        amplitude: f32,
        frequency: f32,
        #[serde(default)]
        phase: f32,
    },
    /// Baffles reaching in alternately from the left and right walls
    Chicane {
        count: u32,
        /// Fraction of the width each baffle covers
        #[serde(default = "default_reach")]
        reach: f32,
        #[serde(default = "default_thickness")]
        thickness: f32,
        #[serde(default = "default_bar_height")]
        height: f32,
        #[serde(default = "default_margin")]
        margin: f32,
    },
    /// Randomly sized and rotated boxes
    Debris {
        count: u32,
        min_size: f32,
        max_size: f32,
        #[serde(default = "default_margin")]
        margin: f32,
    },
    /// Randomly jittered triangular prisms with hull colliders
    Prisms {
        count: u32,
        radius: f32,
        #[serde(default = "default_margin")]
        margin: f32,
    },
    /// Full-width wall that only matching (or untagged) balls collide with
    ChromaBarrier {
        at: f32,
        color: ChromaColor,
        #[serde(default = "default_thickness")]
        thickness: f32,
        #[serde(default = "default_pin_height")]
        height: f32,
    },
}

impl ObstacleSpec {
    /// How many bodies the spec asks for
    pub fn requested_count(&self) -> u64 {
        match *self {
            ObstacleSpec::PinGrid { rows, cols, .. } => u64::from(rows) * u64::from(cols),
            ObstacleSpec::Chicane { count, .. }
            | ObstacleSpec::Debris { count, .. }
            | ObstacleSpec::Prisms { count, .. } => u64::from(count),
            ObstacleSpec::Crusher { .. }
            | ObstacleSpec::Sweeper { .. }
            | ObstacleSpec::Paddle { .. }
            | ObstacleSpec::ChromaBarrier { .. } => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObstacleKind {
    Pin,
    Crusher,
    Sweeper,
    Paddle,
    Baffle,
    Debris,
    Prism,
    ChromaBarrier,
}

impl ObstacleKind {
    fn name(self) -> &'static str {
        match self {
            ObstacleKind::Pin => "pin",
            ObstacleKind::Crusher => "crusher",
            ObstacleKind::Sweeper => "sweeper",
            ObstacleKind::Paddle => "paddle",
            ObstacleKind::Baffle => "baffle",
            ObstacleKind::Debris => "debris",
            ObstacleKind::Prism => "prism",
            ObstacleKind::ChromaBarrier => "chroma_barrier",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Obstacle {
    pub kind: ObstacleKind,
    pub segment: u32,
    pub parts: Spawned,
    pub pose: Pose,
}

/// One body to create
struct Part {
    kind: ObstacleKind,
    pose: Pose,
    shape: Shape,
    mesh: MeshData,
    color: [f32; 4],
    groups: CollisionGroups,
    kinematic: bool,
}

impl Part {
    fn fixed(kind: ObstacleKind, pose: Pose, shape: Shape, mesh: MeshData, color: [f32; 4]) -> Self {
        Self {
            kind,
            pose,
            shape,
            mesh,
            color,
            groups: CollisionGroups::UNIVERSAL_GEOMETRY,
            kinematic: false,
        }
    }
}

/// Clamp a margin and return the usable `[lo, hi]` fraction of the length
fn usable_range(margin: f32) -> (f32, f32) {
    let m = if margin.is_finite() {
        margin.clamp(0.0, MAX_PLACEMENT_MARGIN)
    } else {
        DEFAULT_PLACEMENT_MARGIN
    };
    (m, 1.0 - m)
}

fn positive(values: &[f32]) -> bool {
    values.iter().all(|v| v.is_finite() && *v > 0.0)
}

/// Every obstacle placed during the session
#[derive(Debug, Default)]
pub struct ObstacleField {
    obstacles: Vec<Obstacle>,
}

impl ObstacleField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    pub fn count(&self, kind: ObstacleKind) -> usize {
        self.obstacles.iter().filter(|o| o.kind == kind).count()
    }

    pub fn clear(&mut self) {
        self.obstacles.clear();
    }

    /// Lay out `spec` on `segment`; returns how many obstacles were created.
    /// Kinematic obstacles are handed to the choreographer.
    pub fn place(
        &mut self,
        engine: &mut Engine<'_>,
        registry: &mut Registry,
        segment: &Segment,
        spec: &ObstacleSpec,
        rng: &mut impl Rng,
        choreographer: &mut Choreographer,
    ) -> usize {
        let requested = spec.requested_count();
        if requested > u64::from(MAX_OBSTACLES_PER_PIECE) {
            log::warn!(
                "Skipping {} obstacles on segment {}, limit is {}",
                requested,
                segment.id,
                MAX_OBSTACLES_PER_PIECE
            );
            return 0;
        }
        let before = self.obstacles.len();
        let frame = &segment.frame;
        let half_width = segment.width / 2.0;

        match *spec {
            ObstacleSpec::PinGrid {
                rows,
                cols,
                pin_radius,
                pin_height,
                margin,
            } => {
                if rows == 0 || cols == 0 || !positive(&[pin_radius, pin_height]) {
                    log::warn!("Skipping empty pin grid on segment {}", segment.id);
                    return 0;
                }
                let (lo, hi) = usable_range(margin);
                let row_step = if rows > 1 { (hi - lo) / (rows - 1) as f32 } else { 0.0 };
                let span = (segment.width - 2.0 * pin_radius).max(0.0);
                let col_step = span / cols as f32;
                for row in 0..rows {
                    let u = if rows > 1 { lo + row_step * row as f32 } else { 0.5 };
                    let stagger = if row % 2 == 1 { col_step / 2.0 } else { 0.0 };
                    for col in 0..cols {
                        // Column centers sit in the middle of equal cells; staggered rows
                        // shift right and wrap the last pin back to the first cell.
                        let mut x = -span / 2.0 + col_step * (col as f32 + 0.5) + stagger;
                        if x > span / 2.0 {
                            x -= span;
                        }
                        let center = frame.point(u * segment.length, x, pin_height / 2.0);
                        let half_height = pin_height / 2.0;
                        self.add(
                            engine,
                            registry,
                            segment.id,
                            Part::fixed(
                                ObstacleKind::Pin,
                                frame.pose_at(center),
                                Shape::Cylinder {
                                    half_height,
                                    radius: pin_radius,
                                },
                                shapes::cylinder(pin_radius, half_height, 12, colors::PIN),
                                colors::PIN,
                            ),
                        );
                    }
                }
            }
            ObstacleSpec::Crusher {
                at,
                size,
                amplitude,
                frequency,
                phase,
            } => {
                if !positive(&[size.x, size.y, size.z]) || !amplitude.is_finite() {
                    log::warn!("Skipping crusher with size {:?}", size);
                    return 0;
                }
                let half = size / 2.0;
                // Lowest point of the stroke touches the surface
                let base = frame.pose_at(frame.point_at(at.clamp(0.0, 1.0), 0.0, half.y + amplitude.abs()));
                self.add_kinematic(
                    engine,
                    registry,
                    choreographer,
                    segment.id,
                    ObstacleKind::Crusher,
                    base,
                    half,
                    colors::CRUSHER,
                    (Motion::Piston, amplitude, frequency, phase),
                );
            }
            ObstacleSpec::Sweeper {
                at,
                length,
                thickness,
                amplitude,
                frequency,
                phase,
            } => {
                if !positive(&[length, thickness]) || !amplitude.is_finite() {
                    log::warn!("Skipping sweeper of length {}", length);
                    return 0;
                }
                let half = Vec3::new(thickness / 2.0, default_bar_height() / 2.0, length / 2.0);
                // Keep the stroke inside the walls
                let amplitude = amplitude.clamp(-half_width, half_width);
                let amplitude = amplitude.signum() * amplitude.abs().min((half_width - half.x).max(0.0));
                let base = frame.pose_at(frame.point_at(at.clamp(0.0, 1.0), 0.0, half.y));
                self.add_kinematic(
                    engine,
                    registry,
                    choreographer,
                    segment.id,
                    ObstacleKind::Sweeper,
                    base,
                    half,
                    colors::SWEEPER,
                    (
                        Motion::Oscillator {
                            axis: frame.lateral,
                        },
                        amplitude,
                        frequency,
                        phase,
                    ),
                );
            }
            ObstacleSpec::Paddle {
                at,
                across,
                length,
                amplitude,
                frequency,
                phase,
            } => {
                if !positive(&[length]) || !amplitude.is_finite() {
                    log::warn!("Skipping paddle of length {}", length);
                    return 0;
                }
                let half = Vec3::new(length / 2.0, default_bar_height() / 2.0, default_thickness() / 2.0);
                let base = frame.pose_at(frame.point_at(at.clamp(0.0, 1.0), across.clamp(-1.0, 1.0), half.y));
                self.add_kinematic(
                    engine,
                    registry,
                    choreographer,
                    segment.id,
                    ObstacleKind::Paddle,
                    base,
                    half,
                    colors::PADDLE,
                    (Motion::RotatingOscillator { axis: Vec3::Y }, amplitude, frequency, phase),
                );
            }
            ObstacleSpec::Chicane {
                count,
                reach,
                thickness,
                height,
                margin,
            } => {
                if count == 0 || !positive(&[reach, thickness, height]) {
                    log::warn!("Skipping empty chicane on segment {}", segment.id);
                    return 0;
                }
                let (lo, hi) = usable_range(margin);
                let baffle = segment.width * reach.min(0.9);
                let half = Vec3::new(baffle / 2.0, height / 2.0, thickness / 2.0);
                for i in 0..count {
                    let u = lo + (hi - lo) * (i as f32 + 0.5) / count as f32;
                    let side = if i % 2 == 0 { -1.0 } else { 1.0 };
                    let center = frame.point(u * segment.length, side * (half_width - half.x), half.y);
                    self.add(
                        engine,
                        registry,
                        segment.id,
                        Part::fixed(
                            ObstacleKind::Baffle,
                            frame.pose_at(center),
                            Shape::Cuboid { half_extents: half },
                            shapes::cuboid(half, colors::WALL),
                            colors::WALL,
                        ),
                    );
                }
            }
            ObstacleSpec::Debris {
                count,
                min_size,
                max_size,
                margin,
            } => {
                if !positive(&[min_size, max_size]) {
                    log::warn!("Skipping debris with sizes {}..{}", min_size, max_size);
                    return 0;
                }
                let (lo, hi) = usable_range(margin);
                let (min_size, max_size) = (min_size.min(max_size), min_size.max(max_size));
                for _ in 0..count {
                    let half = Vec3::new(
                        rng.random_range(min_size..=max_size),
                        rng.random_range(min_size..=max_size),
                        rng.random_range(min_size..=max_size),
                    ) / 2.0;
                    let u = rng.random_range(lo..=hi);
                    let room = (half_width - half.x.max(half.z)).max(0.0);
                    let x = rng.random_range(-1.0f32..=1.0) * room;
                    let yaw = rng.random_range(-std::f32::consts::PI..std::f32::consts::PI);
                    let pose = Pose::new(
                        frame.point(u * segment.length, x, half.y),
                        frame.rotation * Quat::from_rotation_y(yaw),
                    );
                    self.add(
                        engine,
                        registry,
                        segment.id,
                        Part::fixed(
                            ObstacleKind::Debris,
                            pose,
                            Shape::Cuboid { half_extents: half },
                            shapes::cuboid(half, colors::DEBRIS),
                            colors::DEBRIS,
                        ),
                    );
                }
            }
            ObstacleSpec::Prisms { count, radius, margin } => {
                if !radius.is_finite() || radius < 0.0 {
                    log::warn!("Skipping prisms with radius {}", radius);
                    return 0;
                }
                let (lo, hi) = usable_range(margin);
                for _ in 0..count {
                    let points = prism_points(radius, rng);
                    let hull = match ConvexHull::new(&points) {
                        Ok(hull) => hull,
                        Err(err) => {
                            log::warn!("Skipping prism on segment {}: {}", segment.id, err);
                            continue;
                        }
                    };
                    let u = rng.random_range(lo..=hi);
                    let room = (half_width - radius).max(0.0);
                    let x = rng.random_range(-1.0f32..=1.0) * room;
                    let pose = frame.pose_at(frame.point(u * segment.length, x, 0.0));
                    let mesh = shapes::hull(&hull, colors::PRISM);
                    self.add(
                        engine,
                        registry,
                        segment.id,
                        Part::fixed(
                            ObstacleKind::Prism,
                            pose,
                            Shape::ConvexHull { points },
                            mesh,
                            colors::PRISM,
                        ),
                    );
                }
            }
            ObstacleSpec::ChromaBarrier {
                at,
                color,
                thickness,
                height,
            } => {
                if !positive(&[thickness, height]) {
                    log::warn!("Skipping chroma barrier on segment {}", segment.id);
                    return 0;
                }
                let half = Vec3::new(half_width, height / 2.0, thickness / 2.0);
                let center = frame.point_at(at.clamp(0.0, 1.0), 0.0, half.y);
                let [r, g, b, _] = color.rgba();
                let tint = [r, g, b, 0.5];
                self.add(
                    engine,
                    registry,
                    segment.id,
                    Part {
                        groups: color.geometry_groups(),
                        ..Part::fixed(
                            ObstacleKind::ChromaBarrier,
                            frame.pose_at(center),
                            Shape::Cuboid { half_extents: half },
                            shapes::cuboid(half, tint),
                            tint,
                        )
                    },
                );
            }
        }

        let placed = self.obstacles.len() - before;
        log::debug!("Placed {} obstacles on segment {}", placed, segment.id);
        placed
    }

    fn add(
        &mut self,
        engine: &mut Engine<'_>,
        registry: &mut Registry,
        segment: u32,
        part: Part,
    ) -> Option<&Obstacle> {
        let body = if part.kinematic {
            BodyDesc::kinematic(part.pose)
        } else {
            BodyDesc::fixed(part.pose)
        };
        let material = if part.kinematic {
            Material::glowing(part.color, 0.4)
        } else {
            Material::solid(part.color)
        };
        let name = format!("{}_{}", part.kind.name(), self.obstacles.len());
        let parts = registry.spawn(
            engine,
            &name,
            &body,
            &ColliderDesc::solid(part.shape)
                .with_restitution(0.6)
                .with_groups(part.groups),
            part.mesh,
            material,
        )?;
        self.obstacles.push(Obstacle {
            kind: part.kind,
            segment,
            parts,
            pose: part.pose,
        });
        self.obstacles.last()
    }

    #[allow(clippy::too_many_arguments)]
    fn add_kinematic(
        &mut self,
        engine: &mut Engine<'_>,
        registry: &mut Registry,
        choreographer: &mut Choreographer,
        segment: u32,
        kind: ObstacleKind,
        base: Pose,
        half: Vec3,
        color: [f32; 4],
        (motion, amplitude, frequency, phase): (Motion, f32, f32, f32),
    ) {
        let part = Part {
            kinematic: true,
            ..Part::fixed(
                kind,
                base,
                Shape::Cuboid { half_extents: half },
                shapes::cuboid(half, color),
                color,
            )
        };
        let Some(obstacle) = self.add(engine, registry, segment, part) else {
            return;
        };
        choreographer.register(KinematicObstacle {
            body: obstacle.parts.body,
            mesh: obstacle.parts.mesh,
            motion,
            base,
            amplitude,
            frequency: if frequency.is_finite() { frequency } else { 0.0 },
            phase,
        });
    }
}

/// Triangular prism around the local origin, resting on the surface, with
/// every corner jittered by up to 15% of the radius
fn prism_points(radius: f32, rng: &mut impl Rng) -> Vec<Vec3> {
    let height = radius * 1.2;
    let yaw = rng.random_range(0.0..std::f32::consts::TAU);
    let jitter = radius * 0.15;
    let mut points = Vec::with_capacity(6);
    for y in [0.0, height] {
        for k in 0..3 {
            let angle = yaw + k as f32 * std::f32::consts::TAU / 3.0;
            let mut p = Vec3::new(angle.sin() * radius, y, angle.cos() * radius);
            if jitter > 0.0 {
                p += Vec3::new(
                    rng.random_range(-jitter..=jitter),
                    0.0,
                    rng.random_range(-jitter..=jitter),
                );
            }
            points.push(p);
        }
    }
    points
}
