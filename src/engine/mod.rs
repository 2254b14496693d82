//! Engine interface boundary
//!
//! The adventure core never talks to a concrete renderer or physics engine.
//! Everything it creates goes through `PhysicsWorld` and `SceneGraph`, which
//! callers pass in explicitly (see `Engine`). `RapierWorld` implements the
//! physics side on rapier3d; `HeadlessScene` records scene state in memory.

pub mod groups;
pub mod rapier;
pub mod scene;

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::mesh::{Material, MeshData};

pub use groups::{ChromaColor, CollisionGroups};
pub use rapier::RapierWorld;
pub use scene::HeadlessScene;

/// Opaque rigid body handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BodyHandle(pub u32);

/// Opaque collider handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ColliderHandle(pub u32);

/// Opaque scene node handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MeshHandle(pub u32);

/// Position + orientation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Pose {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
        }
    }

    /// Transform a point from local into world space
    #[inline]
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        self.position + self.rotation * p
    }

    /// Transform a world point into local space
    #[inline]
    pub fn inverse_transform_point(&self, p: Vec3) -> Vec3 {
        self.rotation.inverse() * (p - self.position)
    }
}

/// How a body is moved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyType {
    /// Never moves
    Fixed,
    /// Moved by the simulation
    Dynamic,
    /// Moved externally through `set_next_kinematic_pose`
    Kinematic,
}

/// Rigid body creation parameters
#[derive(Debug, Clone)]
pub struct BodyDesc {
    pub body_type: BodyType,
    pub pose: Pose,
    pub mass: f32,
    /// Continuous collision detection for fast bodies
    pub ccd: bool,
}

impl BodyDesc {
    pub fn fixed(pose: Pose) -> Self {
        Self {
            body_type: BodyType::Fixed,
            pose,
            mass: 0.0,
            ccd: false,
        }
    }

    pub fn dynamic(pose: Pose, mass: f32) -> Self {
        Self {
            body_type: BodyType::Dynamic,
            pose,
            mass,
            ccd: true,
        }
    }

    pub fn kinematic(pose: Pose) -> Self {
        Self {
            body_type: BodyType::Kinematic,
            pose,
            mass: 0.0,
            ccd: false,
        }
    }
}

/// Collision shape, expressed in the owning body's local frame
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Cuboid { half_extents: Vec3 },
    Ball { radius: f32 },
    /// Cylinder along local +Y
    Cylinder { half_height: f32, radius: f32 },
    ConvexHull { points: Vec<Vec3> },
}

/// Collider creation parameters
#[derive(Debug, Clone)]
pub struct ColliderDesc {
    pub shape: Shape,
    pub friction: f32,
    pub restitution: f32,
    pub sensor: bool,
    pub groups: CollisionGroups,
}

impl ColliderDesc {
    pub fn solid(shape: Shape) -> Self {
        Self {
            shape,
            friction: 0.5,
            restitution: 0.3,
            sensor: false,
            groups: CollisionGroups::UNIVERSAL_GEOMETRY,
        }
    }

    pub fn sensor(shape: Shape) -> Self {
        Self {
            shape,
            friction: 0.0,
            restitution: 0.0,
            sensor: true,
            groups: CollisionGroups::UNIVERSAL_GEOMETRY,
        }
    }

    pub fn with_friction(mut self, friction: f32) -> Self {
        self.friction = friction;
        self
    }

    pub fn with_restitution(mut self, restitution: f32) -> Self {
        self.restitution = restitution;
        self
    }

    pub fn with_groups(mut self, groups: CollisionGroups) -> Self {
        self.groups = groups;
        self
    }
}

/// Collision start/stop notification drained after each step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionEvent {
    Started {
        a: ColliderHandle,
        b: ColliderHandle,
        sensor: bool,
    },
    Stopped {
        a: ColliderHandle,
        b: ColliderHandle,
        sensor: bool,
    },
}

/// Rigid-body physics world
pub trait PhysicsWorld {
    fn create_body(&mut self, desc: &BodyDesc) -> BodyHandle;
    /// Returns `None` when the parent body does not exist
    fn create_collider(&mut self, desc: &ColliderDesc, body: BodyHandle) -> Option<ColliderHandle>;
    /// Removes the body and every collider attached to it
    fn remove_body(&mut self, body: BodyHandle) -> bool;
    fn contains_body(&self, body: BodyHandle) -> bool;
    fn body_count(&self) -> usize;

    fn body_type(&self, body: BodyHandle) -> Option<BodyType>;
    fn set_body_type(&mut self, body: BodyHandle, body_type: BodyType);
    fn pose(&self, body: BodyHandle) -> Option<Pose>;
    /// Teleport
    fn set_pose(&mut self, body: BodyHandle, pose: Pose);
    /// Target pose a kinematic body reaches at the end of the next step
    fn set_next_kinematic_pose(&mut self, body: BodyHandle, pose: Pose);
    fn linear_velocity(&self, body: BodyHandle) -> Option<Vec3>;
    fn set_linear_velocity(&mut self, body: BodyHandle, velocity: Vec3);
    fn apply_impulse(&mut self, body: BodyHandle, impulse: Vec3);

    fn collision_groups(&self, collider: ColliderHandle) -> Option<CollisionGroups>;
    fn set_collision_groups(&mut self, collider: ColliderHandle, groups: CollisionGroups);
    /// True when both colliders exist, their groups interact and their shapes overlap
    fn intersects(&self, a: ColliderHandle, b: ColliderHandle) -> bool;

    fn step(&mut self, dt: f32);
    fn drain_collision_events(&mut self) -> Vec<CollisionEvent>;
}

/// Scene graph / mesh factory
pub trait SceneGraph {
    fn create_mesh(&mut self, name: &str, data: MeshData, material: Material) -> MeshHandle;
    fn set_parent(&mut self, mesh: MeshHandle, parent: Option<MeshHandle>);
    fn set_transform(&mut self, mesh: MeshHandle, pose: Pose);
    fn set_color(&mut self, mesh: MeshHandle, color: [f32; 4]);
    /// Disposes the node and its children
    fn dispose(&mut self, mesh: MeshHandle) -> bool;
    fn contains(&self, mesh: MeshHandle) -> bool;
    fn mesh_count(&self) -> usize;
}

/// The engine collaborators a session works against for one call
pub struct Engine<'a> {
    pub world: &'a mut dyn PhysicsWorld,
    pub scene: &'a mut dyn SceneGraph,
}

impl<'a> Engine<'a> {
    pub fn new(world: &'a mut dyn PhysicsWorld, scene: &'a mut dyn SceneGraph) -> Self {
        Self { world, scene }
    }
}
