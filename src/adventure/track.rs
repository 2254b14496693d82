//! Track segment generator
//!
//! Chains ramp pieces from a cursor. Straight ramps are one slab; curved ramps
//! are a fan of straight chords whose endpoints lie on the arc.
//!
//! Degenerate requests (zero segments, non-positive sizes, non-finite input)
//! place nothing and hand back the input cursor.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::frame::{Cursor, SurfaceFrame};
use super::registry::{Registry, Spawned};
use crate::consts::MAX_CHORDS;
use crate::engine::{BodyDesc, ColliderDesc, Engine, Shape};
use crate::mesh::{Material, colors, shapes};
use crate::tuning::Tuning;

/// Straight ramp request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StraightRampParams {
    pub width: f32,
    pub length: f32,
    /// Downhill pitch (radians, positive = descending)
    pub incline: f32,
    /// Roll about the ramp axis (radians)
    pub banking: f32,
    /// Side wall height (0 = no walls)
    pub wall_height: f32,
    /// Surface friction override
    pub friction: Option<f32>,
}

impl Default for StraightRampParams {
    fn default() -> Self {
        Self {
            width: 6.0,
            length: 20.0,
            incline: 0.15,
            banking: 0.0,
            wall_height: 1.0,
            friction: None,
        }
    }
}

/// Curved ramp request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurvedRampParams {
    /// Centerline radius
    pub radius: f32,
    /// Signed turn (radians, positive turns toward +X from +Z)
    pub total_angle: f32,
    pub incline: f32,
    pub width: f32,
    pub wall_height: f32,
    /// Number of chords
    pub segments: u32,
    pub banking: f32,
    pub friction: Option<f32>,
}

impl Default for CurvedRampParams {
    fn default() -> Self {
        Self {
            radius: 15.0,
            total_angle: std::f32::consts::FRAC_PI_2,
            incline: 0.1,
            width: 6.0,
            wall_height: 1.5,
            segments: 8,
            banking: 0.0,
            friction: None,
        }
    }
}

/// One chord of a curved ramp
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChordPlan {
    /// Chord start, heading centered on its arc
    pub start: Cursor,
    /// Horizontal chord length `2r·sin(Δθ/2)`
    pub chord: f32,
    /// Vertical drop `r·Δθ·sin(incline)`
    pub drop: f32,
}

impl ChordPlan {
    /// Slab length along the slope
    pub fn surface_length(&self) -> f32 {
        self.chord.hypot(self.drop)
    }

    /// Slab pitch matching the drop
    pub fn pitch(&self) -> f32 {
        self.drop.atan2(self.chord)
    }
}

/// End cursor of a straight ramp; `None` for degenerate input
pub fn straight_ramp_end(cursor: &Cursor, params: &StraightRampParams) -> Option<Cursor> {
    let valid = cursor.is_finite()
        && params.width.is_finite()
        && params.length.is_finite()
        && params.incline.is_finite()
        && params.width > 0.0
        && params.length > 0.0;
    if !valid {
        return None;
    }
    let horizontal = params.length * params.incline.cos();
    let drop = params.length * params.incline.sin();
    Some(Cursor::new(
        cursor.position + cursor.forward() * horizontal - Vec3::Y * drop,
        cursor.heading,
    ))
}

/// Chord layout of a curved ramp and its end cursor; `None` for degenerate input
pub fn plan_curved_ramp(cursor: &Cursor, params: &CurvedRampParams) -> Option<(Vec<ChordPlan>, Cursor)> {
    let valid = cursor.is_finite()
        && params.segments > 0
        && params.radius.is_finite()
        && params.total_angle.is_finite()
        && params.incline.is_finite()
        && params.width.is_finite()
        && params.radius > 0.0
        && params.width > 0.0
        && params.total_angle != 0.0;
    if !valid {
        return None;
    }
    if params.segments > MAX_CHORDS {
        log::warn!(
            "Curved ramp asks for {} chords, limit is {}",
            params.segments,
            MAX_CHORDS
        );
        return None;
    }

    let seg_angle = params.total_angle / params.segments as f32;
    let chord = 2.0 * params.radius * (seg_angle.abs() / 2.0).sin();
    let arc_length = params.radius * seg_angle.abs();
    let drop = arc_length * params.incline.sin();

    let mut position = cursor.position;
    let mut heading = cursor.heading;
    let mut chords = Vec::with_capacity(params.segments as usize);
    for _ in 0..params.segments {
        heading += seg_angle / 2.0;
        let start = Cursor::new(position, heading);
        chords.push(ChordPlan { start, chord, drop });
        position += start.forward() * chord - Vec3::Y * drop;
        heading += seg_angle / 2.0;
    }
    Some((chords, Cursor::new(position, heading)))
}

/// How a segment was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SegmentKind {
    Straight,
    Chord { index: u32, of: u32 },
}

/// One placed ramp piece
#[derive(Debug, Clone)]
pub struct Segment {
    pub id: u32,
    pub kind: SegmentKind,
    pub start: Cursor,
    pub end: Cursor,
    pub width: f32,
    pub length: f32,
    pub incline: f32,
    pub banking: f32,
    pub wall_height: f32,
    pub friction: f32,
    pub frame: SurfaceFrame,
    pub floor: Spawned,
    pub walls: Vec<Spawned>,
}

impl Segment {
    /// Lowest surface point of the segment
    pub fn min_height(&self) -> f32 {
        self.start.position.y.min(self.end.position.y)
    }
}

/// Places segments and keeps them for the session
#[derive(Debug, Default)]
pub struct TrackGenerator {
    segments: Vec<Segment>,
    next_id: u32,
}

/// Shape of a single slab to place
struct PieceSpec {
    kind: SegmentKind,
    start: Cursor,
    end: Cursor,
    length: f32,
    pitch: f32,
    width: f32,
    banking: f32,
    wall_height: f32,
    friction: f32,
}

impl TrackGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn last(&self) -> Option<&Segment> {
        self.segments.last()
    }

    pub fn segment(&self, id: u32) -> Option<&Segment> {
        self.segments.iter().find(|s| s.id == id)
    }

    pub fn clear(&mut self) {
        self.segments.clear();
        self.next_id = 0;
    }

    /// Lowest point across all segments
    pub fn min_height(&self) -> Option<f32> {
        self.segments
            .iter()
            .map(Segment::min_height)
            .reduce(f32::min)
    }

    /// Append a straight ramp; returns the new cursor
    pub fn add_straight_ramp(
        &mut self,
        engine: &mut Engine<'_>,
        registry: &mut Registry,
        tuning: &Tuning,
        cursor: Cursor,
        params: &StraightRampParams,
    ) -> Cursor {
        let Some(end) = straight_ramp_end(&cursor, params) else {
            log::warn!("Skipping degenerate straight ramp {:?}", params);
            return cursor;
        };
        let piece = PieceSpec {
            kind: SegmentKind::Straight,
            start: cursor,
            end,
            length: params.length,
            pitch: params.incline,
            width: params.width,
            banking: params.banking,
            wall_height: params.wall_height.max(0.0),
            friction: params.friction.unwrap_or(tuning.ramp_friction),
        };
        if self.place(engine, registry, tuning, piece).is_none() {
            return cursor;
        }
        end
    }

    /// Append a curved ramp as `segments` chords; returns the new cursor
    pub fn add_curved_ramp(
        &mut self,
        engine: &mut Engine<'_>,
        registry: &mut Registry,
        tuning: &Tuning,
        cursor: Cursor,
        params: &CurvedRampParams,
    ) -> Cursor {
        let Some((chords, end)) = plan_curved_ramp(&cursor, params) else {
            log::warn!("Skipping degenerate curved ramp {:?}", params);
            return cursor;
        };

        let of = chords.len() as u32;
        for (index, chord) in chords.iter().enumerate() {
            let chord_end = Cursor::new(
                chord.start.position + chord.start.forward() * chord.chord - Vec3::Y * chord.drop,
                chord.start.heading,
            );
            let piece = PieceSpec {
                kind: SegmentKind::Chord {
                    index: index as u32,
                    of,
                },
                start: chord.start,
                end: chord_end,
                length: chord.surface_length(),
                pitch: chord.pitch(),
                width: params.width,
                banking: params.banking,
                wall_height: params.wall_height.max(0.0),
                friction: params.friction.unwrap_or(tuning.ramp_friction),
            };
            self.place(engine, registry, tuning, piece);
        }
        log::debug!(
            "Curved ramp r={} angle={:.2} in {} chords",
            params.radius,
            params.total_angle,
            of
        );
        end
    }

    /// Advance the cursor over an open gap (a jump) without placing geometry
    pub fn skip_gap(cursor: Cursor, length: f32, drop: f32) -> Cursor {
        if !length.is_finite() || !drop.is_finite() || length < 0.0 {
            return cursor;
        }
        Cursor::new(
            cursor.position + cursor.forward() * length - Vec3::Y * drop,
            cursor.heading,
        )
    }

    fn place(
        &mut self,
        engine: &mut Engine<'_>,
        registry: &mut Registry,
        tuning: &Tuning,
        piece: PieceSpec,
    ) -> Option<&Segment> {
        let frame = SurfaceFrame::new(
            piece.start.position,
            piece.start.heading,
            piece.pitch,
            piece.banking,
            piece.length,
            piece.width,
        );
        let thickness = tuning.ramp_thickness;
        let id = self.next_id;

        let floor_half = Vec3::new(piece.width / 2.0, thickness / 2.0, piece.length / 2.0);
        let floor_pose = frame.pose_at(frame.point(piece.length / 2.0, 0.0, -thickness / 2.0));
        let floor = registry.spawn(
            engine,
            &format!("ramp_{id}"),
            &BodyDesc::fixed(floor_pose),
            &ColliderDesc::solid(Shape::Cuboid {
                half_extents: floor_half,
            })
            .with_friction(piece.friction),
            shapes::cuboid(floor_half, colors::RAMP),
            Material::solid(colors::RAMP),
        )?;

        let mut walls = Vec::new();
        if piece.wall_height > 0.0 {
            let wt = tuning.wall_thickness;
            let wall_half = Vec3::new(wt / 2.0, piece.wall_height / 2.0, piece.length / 2.0);
            for (side, name) in [(-1.0, "left"), (1.0, "right")] {
                let center = frame.point(
                    piece.length / 2.0,
                    side * (piece.width / 2.0 + wt / 2.0),
                    piece.wall_height / 2.0,
                );
                let wall = registry.spawn(
                    engine,
                    &format!("ramp_{id}_wall_{name}"),
                    &BodyDesc::fixed(frame.pose_at(center)),
                    &ColliderDesc::solid(Shape::Cuboid {
                        half_extents: wall_half,
                    })
                    .with_friction(0.0),
                    shapes::cuboid(wall_half, colors::WALL),
                    Material::glowing(colors::WALL, 0.6),
                );
                walls.extend(wall);
            }
        }

        self.next_id += 1;
        self.segments.push(Segment {
            id,
            kind: piece.kind,
            start: piece.start,
            end: piece.end,
            width: piece.width,
            length: piece.length,
            incline: piece.pitch,
            banking: piece.banking,
            wall_height: piece.wall_height,
            friction: piece.friction,
            frame,
            floor,
            walls,
        });
        self.segments.last()
    }
}
