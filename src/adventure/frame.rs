//! Generator cursor and segment surface frames

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::engine::Pose;
use crate::{heading_to_forward, normalize_angle};

/// Where the next segment starts: position on the track surface centerline
/// plus the horizontal heading (yaw about +Y, 0 = +Z)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawCursor")]
pub struct Cursor {
    pub position: Vec3,
    pub heading: f32,
}

/// Deserialized form; goes through `Cursor::new` so headings are wrapped
#[derive(Deserialize)]
struct RawCursor {
    position: Vec3,
    heading: f32,
}

impl From<RawCursor> for Cursor {
    fn from(raw: RawCursor) -> Self {
        Cursor::new(raw.position, raw.heading)
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            heading: 0.0,
        }
    }
}

impl Cursor {
    pub fn new(position: Vec3, heading: f32) -> Self {
        Self {
            position,
            heading: normalize_angle(heading),
        }
    }

    /// Horizontal unit forward vector
    #[inline]
    pub fn forward(&self) -> Vec3 {
        heading_to_forward(self.heading)
    }

    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.heading.is_finite()
    }

    /// Horizontal distance between two cursors
    pub fn horizontal_distance(&self, other: &Cursor) -> f32 {
        let d = other.position - self.position;
        (d.x * d.x + d.z * d.z).sqrt()
    }
}

/// Local frame of a segment surface
///
/// `forward` runs down the ramp, `lateral` is the local +X across the ramp,
/// `normal` points out of the riding surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceFrame {
    /// Start of the surface centerline
    pub origin: Vec3,
    pub rotation: Quat,
    pub forward: Vec3,
    pub lateral: Vec3,
    pub normal: Vec3,
    pub length: f32,
    pub width: f32,
}

impl SurfaceFrame {
    /// Build the frame: yaw by heading, pitch down by incline, roll by banking
    pub fn new(origin: Vec3, heading: f32, incline: f32, banking: f32, length: f32, width: f32) -> Self {
        let rotation = Quat::from_rotation_y(heading)
            * Quat::from_rotation_x(incline)
            * Quat::from_rotation_z(banking);
        Self {
            origin,
            rotation,
            forward: rotation * Vec3::Z,
            lateral: rotation * Vec3::X,
            normal: rotation * Vec3::Y,
            length,
            width,
        }
    }

    /// World point at `along` down the segment, `across` from the centerline,
    /// `height` above the surface
    #[inline]
    pub fn point(&self, along: f32, across: f32, height: f32) -> Vec3 {
        self.origin + self.forward * along + self.lateral * across + self.normal * height
    }

    /// Like `point`, with `u` in [0, 1] along the length and `v` in [-1, 1] across the half width
    #[inline]
    pub fn point_at(&self, u: f32, v: f32, height: f32) -> Vec3 {
        self.point(u * self.length, v * self.width * 0.5, height)
    }

    /// Pose aligned with the surface at a world point
    pub fn pose_at(&self, position: Vec3) -> Pose {
        Pose::new(position, self.rotation)
    }

    /// End of the surface centerline
    pub fn end(&self) -> Vec3 {
        self.point(self.length, 0.0, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_flat_frame_axes() {
        let frame = SurfaceFrame::new(Vec3::ZERO, 0.0, 0.0, 0.0, 10.0, 4.0);
        assert!((frame.forward - Vec3::Z).length() < 1e-6);
        assert!((frame.lateral - Vec3::X).length() < 1e-6);
        assert!((frame.normal - Vec3::Y).length() < 1e-6);
        assert!((frame.end() - Vec3::Z * 10.0).length() < 1e-5);
    }

    #[test]
    fn test_incline_points_forward_downhill() {
        let incline = 0.3_f32;
        let frame = SurfaceFrame::new(Vec3::ZERO, FRAC_PI_2, incline, 0.0, 1.0, 1.0);
        assert!((frame.forward.y + incline.sin()).abs() < 1e-5);
        assert!((frame.forward.x - incline.cos()).abs() < 1e-5);
        assert!(frame.normal.y > 0.0);
        assert!(frame.forward.dot(frame.normal).abs() < 1e-5);
        assert!(frame.forward.dot(frame.lateral).abs() < 1e-5);
    }

    #[test]
    fn test_banking_tilts_normal_sideways() {
        let frame = SurfaceFrame::new(Vec3::ZERO, 0.0, 0.0, 0.2, 1.0, 1.0);
        assert!(frame.normal.x.abs() > 0.1);
        assert!((frame.forward - Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn test_point_at_corners() {
        let frame = SurfaceFrame::new(Vec3::ONE, 0.0, 0.0, 0.0, 10.0, 4.0);
        let p = frame.point_at(1.0, -1.0, 0.5);
        assert!((p - Vec3::new(-1.0, 1.5, 11.0)).length() < 1e-5);
    }

    #[test]
    fn test_cursor_normalizes_heading() {
        let cursor = Cursor::new(Vec3::ZERO, 3.0 * std::f32::consts::PI);
        assert!(cursor.heading >= -std::f32::consts::PI && cursor.heading < std::f32::consts::PI);
    }

    #[test]
    fn test_deserialized_cursor_heading_is_wrapped() {
        let json = r#"{ "position": [0.0, 5.0, 0.0], "heading": 1e9 }"#;
        let cursor: Cursor = serde_json::from_str(json).unwrap();
        assert!((-std::f32::consts::PI..std::f32::consts::PI).contains(&cursor.heading));
        assert_eq!(cursor.position, Vec3::new(0.0, 5.0, 0.0));
    }
}
