//! Ownership ledger for every body and mesh a session creates
//!
//! All engine objects are created through the registry so that `release`
//! can tear them down without leaks across repeated start/end cycles.

use crate::engine::{
    BodyDesc, BodyHandle, ColliderDesc, ColliderHandle, Engine, MeshHandle, PhysicsWorld,
    SceneGraph,
};
use crate::mesh::{Material, MeshData};

/// Body + collider + mesh created together
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spawned {
    pub body: BodyHandle,
    pub collider: ColliderHandle,
    pub mesh: MeshHandle,
}

#[derive(Debug, Default)]
pub struct Registry {
    bodies: Vec<BodyHandle>,
    meshes: Vec<MeshHandle>,
    root: Option<MeshHandle>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty() && self.meshes.is_empty()
    }

    pub fn bodies(&self) -> &[BodyHandle] {
        &self.bodies
    }

    /// Session root node; every mesh is parented under it
    pub fn root(&mut self, scene: &mut dyn SceneGraph) -> MeshHandle {
        if let Some(root) = self.root {
            if scene.contains(root) {
                return root;
            }
        }
        let root = scene.create_mesh(
            "adventure_root",
            MeshData::default(),
            Material::solid([0.0; 4]),
        );
        self.meshes.push(root);
        self.root = Some(root);
        root
    }

    pub fn create_body(&mut self, world: &mut dyn PhysicsWorld, desc: &BodyDesc) -> BodyHandle {
        let body = world.create_body(desc);
        self.bodies.push(body);
        body
    }

    pub fn create_mesh(
        &mut self,
        scene: &mut dyn SceneGraph,
        name: &str,
        data: MeshData,
        material: Material,
    ) -> MeshHandle {
        let root = self.root(scene);
        let mesh = scene.create_mesh(name, data, material);
        scene.set_parent(mesh, Some(root));
        self.meshes.push(mesh);
        mesh
    }

    /// Create a body with one collider and a matching mesh placed at the body pose.
    /// Returns `None` (and leaves nothing behind) when the collider is rejected.
    pub fn spawn(
        &mut self,
        engine: &mut Engine<'_>,
        name: &str,
        body: &BodyDesc,
        collider: &ColliderDesc,
        data: MeshData,
        material: Material,
    ) -> Option<Spawned> {
        let handle = engine.world.create_body(body);
        let Some(collider) = engine.world.create_collider(collider, handle) else {
            engine.world.remove_body(handle);
            return None;
        };
        self.bodies.push(handle);

        let mesh = self.create_mesh(engine.scene, name, data, material);
        engine.scene.set_transform(mesh, body.pose);
        Some(Spawned {
            body: handle,
            collider,
            mesh,
        })
    }

    /// Remove every body and dispose every mesh, newest first.
    /// Returns (bodies removed, meshes disposed).
    pub fn release(&mut self, engine: &mut Engine<'_>) -> (usize, usize) {
        let mut bodies = 0;
        for body in self.bodies.drain(..).rev() {
            if engine.world.remove_body(body) {
                bodies += 1;
            }
        }
        let mut meshes = 0;
        for mesh in self.meshes.drain(..).rev() {
            if engine.scene.dispose(mesh) {
                meshes += 1;
            }
        }
        self.root = None;
        (bodies, meshes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{HeadlessScene, RapierWorld, Pose, Shape};
    use crate::mesh::{colors, shapes};
    use glam::Vec3;

    #[test]
    fn test_spawn_and_release() {
        let mut world = RapierWorld::default();
        let mut scene = HeadlessScene::new();
        let mut engine = Engine::new(&mut world, &mut scene);
        let mut registry = Registry::new();

        let spawned = registry
            .spawn(
                &mut engine,
                "box",
                &BodyDesc::fixed(Pose::from_position(Vec3::Y)),
                &ColliderDesc::solid(Shape::Cuboid {
                    half_extents: Vec3::ONE,
                }),
                shapes::cuboid(Vec3::ONE, colors::RAMP),
                Material::solid(colors::RAMP),
            )
            .unwrap();
        assert!(engine.world.contains_body(spawned.body));
        assert!(engine.scene.contains(spawned.mesh));
        assert_eq!(registry.body_count(), 1);
        // root + box
        assert_eq!(registry.mesh_count(), 2);

        let (bodies, _) = registry.release(&mut engine);
        assert_eq!(bodies, 1);
        assert!(registry.is_empty());
        assert_eq!(engine.world.body_count(), 0);
        assert_eq!(engine.scene.mesh_count(), 0);

        // Releasing again is harmless
        assert_eq!(registry.release(&mut engine), (0, 0));
    }

    #[test]
    fn test_rejected_collider_leaves_nothing() {
        let mut world = RapierWorld::default();
        let mut scene = HeadlessScene::new();
        let mut engine = Engine::new(&mut world, &mut scene);
        let mut registry = Registry::new();

        let spawned = registry.spawn(
            &mut engine,
            "flat",
            &BodyDesc::fixed(Pose::IDENTITY),
            &ColliderDesc::solid(Shape::ConvexHull {
                points: vec![Vec3::ZERO, Vec3::X, Vec3::Z, Vec3::X + Vec3::Z],
            }),
            MeshData::default(),
            Material::solid(colors::PRISM),
        );
        assert!(spawned.is_none());
        assert_eq!(engine.world.body_count(), 0);
        assert_eq!(registry.body_count(), 0);
    }
}
