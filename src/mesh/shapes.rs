//! Shape generation for 3D primitives
//!
//! All meshes are generated in local space, centered on the origin, so the
//! scene graph can place them with the same pose as their physics body.

use glam::Vec3;
use std::f32::consts::{PI, TAU};

use super::MeshData;
use super::hull::ConvexHull;
use super::vertex::Vertex;

/// Axis aligned box with per-face normals (24 vertices, 36 indices)
pub fn cuboid(half_extents: Vec3, color: [f32; 4]) -> MeshData {
    let h = half_extents;
    // (normal, u axis, v axis) per face
    let faces = [
        (Vec3::X, Vec3::Z, Vec3::Y),
        (Vec3::NEG_X, Vec3::NEG_Z, Vec3::Y),
        (Vec3::Y, Vec3::X, Vec3::Z),
        (Vec3::NEG_Y, Vec3::X, Vec3::NEG_Z),
        (Vec3::Z, Vec3::NEG_X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::X, Vec3::Y),
    ];

    let mut mesh = MeshData::with_capacity(24, 36);
    for (normal, u, v) in faces {
        let center = normal * h;
        let du = u * h;
        let dv = v * h;
        let base = mesh.vertices.len() as u32;
        for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
            let p = center + du * su + dv * sv;
            mesh.vertices.push(Vertex::from_vec(p, normal, color));
        }
        mesh.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    mesh
}

/// Capped cylinder along +Y
pub fn cylinder(radius: f32, half_height: f32, segments: u32, color: [f32; 4]) -> MeshData {
    let segments = segments.max(3);
    let mut mesh = MeshData::with_capacity(
        (segments as usize + 1) * 4 + 2,
        segments as usize * 12,
    );

    // Side wall
    for i in 0..=segments {
        let theta = i as f32 / segments as f32 * TAU;
        let n = Vec3::new(theta.cos(), 0.0, theta.sin());
        let p = n * radius;
        mesh.vertices
            .push(Vertex::from_vec(p + Vec3::Y * half_height, n, color));
        mesh.vertices
            .push(Vertex::from_vec(p - Vec3::Y * half_height, n, color));
    }
    for i in 0..segments {
        let a = i * 2;
        mesh.indices
            .extend_from_slice(&[a, a + 1, a + 2, a + 1, a + 3, a + 2]);
    }

    // Caps
    for (y, normal) in [(half_height, Vec3::Y), (-half_height, Vec3::NEG_Y)] {
        let center = mesh.vertices.len() as u32;
        mesh.vertices
            .push(Vertex::from_vec(Vec3::new(0.0, y, 0.0), normal, color));
        for i in 0..=segments {
            let theta = i as f32 / segments as f32 * TAU;
            let p = Vec3::new(theta.cos() * radius, y, theta.sin() * radius);
            mesh.vertices.push(Vertex::from_vec(p, normal, color));
        }
        for i in 0..segments {
            let a = center + 1 + i;
            if normal.y > 0.0 {
                mesh.indices.extend_from_slice(&[center, a + 1, a]);
            } else {
                mesh.indices.extend_from_slice(&[center, a, a + 1]);
            }
        }
    }
    mesh
}

/// UV sphere
pub fn sphere(radius: f32, rings: u32, sectors: u32, color: [f32; 4]) -> MeshData {
    let rings = rings.max(2);
    let sectors = sectors.max(3);
    let mut mesh = MeshData::with_capacity(
        ((rings + 1) * (sectors + 1)) as usize,
        (rings * sectors * 6) as usize,
    );

    for r in 0..=rings {
        let phi = r as f32 / rings as f32 * PI;
        for s in 0..=sectors {
            let theta = s as f32 / sectors as f32 * TAU;
            let n = Vec3::new(phi.sin() * theta.cos(), phi.cos(), phi.sin() * theta.sin());
            mesh.vertices.push(Vertex::from_vec(n * radius, n, color));
        }
    }

    let stride = sectors + 1;
    for r in 0..rings {
        for s in 0..sectors {
            let a = r * stride + s;
            let b = a + stride;
            mesh.indices
                .extend_from_slice(&[a, a + 1, b, a + 1, b + 1, b]);
        }
    }
    mesh
}

/// Flat-shaded hull (one triangle per hull face)
pub fn hull(hull: &ConvexHull, color: [f32; 4]) -> MeshData {
    let faces = hull.faces();
    let mut mesh = MeshData::with_capacity(faces.len() * 3, faces.len() * 3);
    for face in faces {
        let base = mesh.vertices.len() as u32;
        for &i in &face.indices {
            mesh.vertices
                .push(Vertex::from_vec(hull.vertices()[i], face.normal, color));
        }
        mesh.indices.extend_from_slice(&[base, base + 1, base + 2]);
    }
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cuboid_counts_and_bounds() {
        let mesh = cuboid(Vec3::new(1.0, 2.0, 3.0), [1.0; 4]);
        assert_eq!(mesh.vertices.len(), 24);
        assert_eq!(mesh.indices.len(), 36);
        assert_eq!(mesh.triangle_count(), 12);
        for v in &mesh.vertices {
            assert!(v.position[0].abs() <= 1.0 + 1e-5);
            assert!(v.position[1].abs() <= 2.0 + 1e-5);
            assert!(v.position[2].abs() <= 3.0 + 1e-5);
        }
    }

    #[test]
    fn test_cylinder_indices_in_range() {
        let mesh = cylinder(0.5, 1.0, 12, [1.0; 4]);
        let n = mesh.vertices.len() as u32;
        assert!(mesh.indices.iter().all(|&i| i < n));
        assert_eq!(mesh.indices.len() % 3, 0);
    }

    #[test]
    fn test_sphere_vertices_on_radius() {
        let mesh = sphere(2.0, 8, 12, [1.0; 4]);
        for v in &mesh.vertices {
            let p = Vec3::from_array(v.position);
            assert!((p.length() - 2.0).abs() < 1e-4);
        }
    }
}
