//! Convex hulls for prism obstacles and hull colliders
//!
//! Triangulation is parry's quickhull. The checks in front of it turn input
//! quickhull cannot handle (flat, collinear or coincident clouds) into a
//! `HullError` instead of a panic deep inside the physics crate.

use glam::Vec3;
use nalgebra::Point3;
use rapier3d::parry::transformation;

use crate::error::HullError;

/// Largest point cloud accepted by `ConvexHull::new`
pub const MAX_HULL_POINTS: usize = 256;

const PLANE_EPSILON: f32 = 1e-4;

/// One outward-facing triangle of the hull
#[derive(Debug, Clone, PartialEq)]
pub struct HullFace {
    /// Indices into `ConvexHull::vertices`, counter-clockwise seen from outside
    pub indices: [usize; 3],
    pub normal: Vec3,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConvexHull {
    vertices: Vec<Vec3>,
    faces: Vec<HullFace>,
}

impl ConvexHull {
    pub fn new(points: &[Vec3]) -> Result<Self, HullError> {
        if points.len() < 4 {
            return Err(HullError::TooFewPoints(points.len()));
        }
        if points.len() > MAX_HULL_POINTS {
            return Err(HullError::TooManyPoints {
                got: points.len(),
                max: MAX_HULL_POINTS,
            });
        }
        if let Some(i) = points.iter().position(|p| !p.is_finite()) {
            return Err(HullError::NonFinite(i));
        }
        if !spans_volume(points) {
            return Err(HullError::Degenerate);
        }

        let cloud: Vec<Point3<f32>> = points.iter().map(|p| Point3::new(p.x, p.y, p.z)).collect();
        let (verts, tris) =
            transformation::try_convex_hull(&cloud).map_err(|_| HullError::Degenerate)?;
        if tris.len() < 4 {
            return Err(HullError::Degenerate);
        }

        let vertices: Vec<Vec3> = verts.iter().map(|p| Vec3::new(p.x, p.y, p.z)).collect();
        let centroid = vertices.iter().copied().sum::<Vec3>() / vertices.len() as f32;
        let faces = tris
            .iter()
            .filter_map(|t| {
                let [i, j, k] = t.map(|i| i as usize);
                let (a, b, c) = (vertices[i], vertices[j], vertices[k]);
                let normal = (b - a).cross(c - a).try_normalize()?;
                // quickhull already winds outward; this only guards sliver faces
                Some(if normal.dot(a - centroid) >= 0.0 {
                    HullFace {
                        indices: [i, j, k],
                        normal,
                    }
                } else {
                    HullFace {
                        indices: [i, k, j],
                        normal: -normal,
                    }
                })
            })
            .collect();

        Ok(Self { vertices, faces })
    }

    /// Points on the hull surface; interior input points are dropped
    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn faces(&self) -> &[HullFace] {
        &self.faces
    }
}

/// True when the cloud is not flat: it has a point off the line through its
/// two farthest-apart candidates and a point off the plane through those three
fn spans_volume(points: &[Vec3]) -> bool {
    let a = points[0];
    let farthest = |score: &dyn Fn(Vec3) -> f32| {
        points
            .iter()
            .copied()
            .map(|p| (p, score(p)))
            .fold((a, 0.0_f32), |best, cur| if cur.1 > best.1 { cur } else { best })
    };

    let (b, ab) = farthest(&|p| (p - a).length());
    let eps = PLANE_EPSILON * ab.max(1.0);
    if ab < eps {
        return false;
    }
    let axis = (b - a) / ab;
    let (c, off_line) = farthest(&|p| (p - a).reject_from_normalized(axis).length());
    if off_line < eps {
        return false;
    }
    let normal = axis.cross(c - a).normalize();
    let (_, off_plane) = farthest(&|p| normal.dot(p - a).abs());
    off_plane >= eps
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cube() -> Vec<Vec3> {
        let mut pts = Vec::new();
        for x in [-1.0, 1.0] {
            for y in [-1.0, 1.0] {
                for z in [-1.0, 1.0] {
                    pts.push(Vec3::new(x, y, z));
                }
            }
        }
        pts
    }

    #[test]
    fn test_tetrahedron_has_four_outward_faces() {
        let pts = [Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::Z];
        let hull = ConvexHull::new(&pts).unwrap();
        assert_eq!(hull.faces().len(), 4);
        assert_eq!(hull.vertices().len(), 4);

        let v = hull.vertices();
        let centroid = v.iter().copied().sum::<Vec3>() / v.len() as f32;
        for face in hull.faces() {
            let face_center = face.indices.iter().map(|&i| v[i]).sum::<Vec3>() / 3.0;
            assert!(face.normal.dot(face_center - centroid) > 0.0);
        }
    }

    #[test]
    fn test_cube_faces_wind_outward() {
        let hull = ConvexHull::new(&cube()).unwrap();
        assert_eq!(hull.faces().len(), 12);
        let v = hull.vertices();
        for face in hull.faces() {
            let [i, j, k] = face.indices;
            let winding = (v[j] - v[i]).cross(v[k] - v[i]);
            assert!(winding.dot(face.normal) > 0.0);
            // every cube face normal is axis aligned
            assert!((face.normal.abs().max_element() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_interior_point_is_not_a_vertex() {
        let mut pts = cube();
        pts.push(Vec3::new(0.1, 0.2, 0.0));
        let hull = ConvexHull::new(&pts).unwrap();
        assert_eq!(hull.vertices().len(), 8);
        assert!(!hull.vertices().contains(&Vec3::new(0.1, 0.2, 0.0)));
    }

    #[test]
    fn test_errors() {
        assert_eq!(
            ConvexHull::new(&[Vec3::ZERO, Vec3::X, Vec3::Y]),
            Err(HullError::TooFewPoints(3))
        );

        let flat = [Vec3::ZERO, Vec3::X, Vec3::Z, Vec3::new(1.0, 0.0, 1.0)];
        assert_eq!(ConvexHull::new(&flat), Err(HullError::Degenerate));

        let line = [Vec3::ZERO, Vec3::X, Vec3::X * 2.0, Vec3::X * 3.0];
        assert_eq!(ConvexHull::new(&line), Err(HullError::Degenerate));

        let coincident = [Vec3::ONE; 5];
        assert_eq!(ConvexHull::new(&coincident), Err(HullError::Degenerate));

        let bad = [Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::new(f32::NAN, 0.0, 0.0)];
        assert_eq!(ConvexHull::new(&bad), Err(HullError::NonFinite(3)));

        let many = vec![Vec3::ZERO; MAX_HULL_POINTS + 1];
        assert!(matches!(
            ConvexHull::new(&many),
            Err(HullError::TooManyPoints { .. })
        ));
    }
}
