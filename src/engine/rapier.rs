//! rapier3d backend
//!
//! `RapierWorld` owns a full rapier pipeline and exposes it through
//! `PhysicsWorld`. Handles handed out to the adventure core are our own
//! monotonically increasing ids; the rapier handles stay private.
//! Collision events are produced by diffing the narrow phase pairs after
//! each step, iterated in handle order so runs are reproducible.

use std::collections::BTreeMap;

use glam::{Quat, Vec3};
use nalgebra::{Isometry3, Point3, Quaternion, Translation3, UnitQuaternion, Vector3};
use rapier3d::parry::query;
use rapier3d::prelude::{
    CCDSolver, ColliderBuilder, ColliderSet, DefaultBroadPhase, Group, ImpulseJointSet,
    IntegrationParameters, InteractionGroups, IslandManager, MultibodyJointSet, NarrowPhase,
    PhysicsPipeline, QueryPipeline, RigidBodyBuilder, RigidBodySet, RigidBodyType,
};

use super::{
    BodyDesc, BodyHandle, BodyType, ColliderDesc, ColliderHandle, CollisionEvent,
    CollisionGroups, PhysicsWorld, Pose, Shape,
};
use crate::mesh::ConvexHull;

/// Default gravity (m/s²)
pub const DEFAULT_GRAVITY: Vec3 = Vec3::new(0.0, -9.81, 0.0);

struct BodyEntry {
    handle: rapier3d::prelude::RigidBodyHandle,
    /// Mass from the creation descriptor, used for impulses
    mass: f32,
    colliders: Vec<ColliderHandle>,
}

struct ColliderEntry {
    handle: rapier3d::prelude::ColliderHandle,
    body: BodyHandle,
}

/// Rigid body world backed by rapier3d
pub struct RapierWorld {
    gravity: Vector3<f32>,
    rigid_body_set: RigidBodySet,
    collider_set: ColliderSet,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    impulse_joint_set: ImpulseJointSet,
    multibody_joint_set: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,

    bodies: BTreeMap<BodyHandle, BodyEntry>,
    colliders: BTreeMap<ColliderHandle, ColliderEntry>,
    /// Touching pairs after the last step; the value is the sensor flag
    active_pairs: BTreeMap<(ColliderHandle, ColliderHandle), bool>,
    events: Vec<CollisionEvent>,
    next_id: u32,
}

impl Default for RapierWorld {
    fn default() -> Self {
        Self::new(DEFAULT_GRAVITY)
    }
}

impl RapierWorld {
    pub fn new(gravity: Vec3) -> Self {
        Self {
            gravity: Vector3::new(gravity.x, gravity.y, gravity.z),
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            bodies: BTreeMap::new(),
            colliders: BTreeMap::new(),
            active_pairs: BTreeMap::new(),
            events: Vec::new(),
            next_id: 0,
        }
    }

    fn next_id(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    fn body(&self, body: BodyHandle) -> Option<&rapier3d::prelude::RigidBody> {
        let entry = self.bodies.get(&body)?;
        self.rigid_body_set.get(entry.handle)
    }

    fn body_mut(&mut self, body: BodyHandle) -> Option<&mut rapier3d::prelude::RigidBody> {
        let entry = self.bodies.get(&body)?;
        self.rigid_body_set.get_mut(entry.handle)
    }

    fn collider(&self, collider: ColliderHandle) -> Option<&rapier3d::prelude::Collider> {
        let entry = self.colliders.get(&collider)?;
        self.collider_set.get(entry.handle)
    }

    /// Our handle for a rapier collider, read back from its user data
    fn our_collider(&self, handle: rapier3d::prelude::ColliderHandle) -> Option<ColliderHandle> {
        let id = self.collider_set.get(handle)?.user_data;
        Some(ColliderHandle(id as u32))
    }

    fn pair_key(
        &self,
        a: rapier3d::prelude::ColliderHandle,
        b: rapier3d::prelude::ColliderHandle,
    ) -> Option<(ColliderHandle, ColliderHandle)> {
        let (a, b) = (self.our_collider(a)?, self.our_collider(b)?);
        Some(if a < b { (a, b) } else { (b, a) })
    }

    /// Diff the narrow phase against the previous step into start/stop events
    fn collect_events(&mut self) {
        let mut touching = BTreeMap::new();
        for (a, b, intersecting) in self.narrow_phase.intersection_pairs() {
            if intersecting {
                if let Some(key) = self.pair_key(a, b) {
                    touching.insert(key, true);
                }
            }
        }
        for pair in self.narrow_phase.contact_pairs() {
            if pair.has_any_active_contact {
                if let Some(key) = self.pair_key(pair.collider1, pair.collider2) {
                    touching.entry(key).or_insert(false);
                }
            }
        }

        for (&(a, b), &sensor) in &touching {
            if !self.active_pairs.contains_key(&(a, b)) {
                self.events.push(CollisionEvent::Started { a, b, sensor });
            }
        }
        for (&(a, b), &sensor) in &self.active_pairs {
            if !touching.contains_key(&(a, b)) {
                self.events.push(CollisionEvent::Stopped { a, b, sensor });
            }
        }
        self.active_pairs = touching;
    }
}

fn to_isometry(pose: &Pose) -> Isometry3<f32> {
    let q = pose.rotation.normalize();
    Isometry3::from_parts(
        Translation3::new(pose.position.x, pose.position.y, pose.position.z),
        UnitQuaternion::new_unchecked(Quaternion::new(q.w, q.x, q.y, q.z)),
    )
}

fn from_isometry(iso: &Isometry3<f32>) -> Pose {
    let t = iso.translation.vector;
    let c = iso.rotation.quaternion().coords;
    Pose::new(Vec3::new(t.x, t.y, t.z), Quat::from_xyzw(c.x, c.y, c.z, c.w))
}

fn to_vector(v: Vec3) -> Vector3<f32> {
    Vector3::new(v.x, v.y, v.z)
}

fn to_interaction_groups(groups: CollisionGroups) -> InteractionGroups {
    InteractionGroups::new(
        Group::from_bits_truncate(groups.memberships),
        Group::from_bits_truncate(groups.filter),
    )
}

fn from_interaction_groups(groups: InteractionGroups) -> CollisionGroups {
    CollisionGroups::new(groups.memberships.bits(), groups.filter.bits())
}

fn rapier_body_type(body_type: BodyType) -> RigidBodyType {
    match body_type {
        BodyType::Fixed => RigidBodyType::Fixed,
        BodyType::Dynamic => RigidBodyType::Dynamic,
        BodyType::Kinematic => RigidBodyType::KinematicPositionBased,
    }
}

/// `None` for hulls that cannot enclose a volume
fn collider_builder(shape: &Shape) -> Option<ColliderBuilder> {
    Some(match shape {
        Shape::Cuboid { half_extents } => {
            ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
        }
        Shape::Ball { radius } => ColliderBuilder::ball(*radius),
        Shape::Cylinder {
            half_height,
            radius,
        } => ColliderBuilder::cylinder(*half_height, *radius),
        Shape::ConvexHull { points } => {
            if let Err(err) = ConvexHull::new(points) {
                log::warn!("Rejecting hull collider: {}", err);
                return None;
            }
            let cloud: Vec<Point3<f32>> =
                points.iter().map(|p| Point3::new(p.x, p.y, p.z)).collect();
            ColliderBuilder::convex_hull(&cloud)?
        }
    })
}

impl PhysicsWorld for RapierWorld {
    fn create_body(&mut self, desc: &BodyDesc) -> BodyHandle {
        let builder = match desc.body_type {
            BodyType::Fixed => RigidBodyBuilder::fixed(),
            BodyType::Dynamic => RigidBodyBuilder::dynamic(),
            BodyType::Kinematic => RigidBodyBuilder::kinematic_position_based(),
        };
        let handle = self.rigid_body_set.insert(
            builder
                .position(to_isometry(&desc.pose))
                .ccd_enabled(desc.ccd)
                .build(),
        );
        let id = BodyHandle(self.next_id());
        self.bodies.insert(
            id,
            BodyEntry {
                handle,
                mass: desc.mass,
                colliders: Vec::new(),
            },
        );
        id
    }

    fn create_collider(&mut self, desc: &ColliderDesc, body: BodyHandle) -> Option<ColliderHandle> {
        let (parent, mass) = {
            let entry = self.bodies.get(&body)?;
            (entry.handle, entry.mass)
        };
        let dynamic = self.rigid_body_set.get(parent)?.is_dynamic();
        let builder = collider_builder(&desc.shape)?;

        let id = ColliderHandle(self.next_id());
        let mut builder = builder
            .friction(desc.friction)
            .restitution(desc.restitution)
            .sensor(desc.sensor)
            .collision_groups(to_interaction_groups(desc.groups))
            .user_data(u128::from(id.0));
        if desc.sensor {
            builder = builder.density(0.0);
        } else if dynamic && mass > 0.0 {
            builder = builder.mass(mass);
        }
        let handle =
            self.collider_set
                .insert_with_parent(builder.build(), parent, &mut self.rigid_body_set);

        self.colliders.insert(id, ColliderEntry { handle, body });
        if let Some(entry) = self.bodies.get_mut(&body) {
            entry.colliders.push(id);
        }
        Some(id)
    }

    fn remove_body(&mut self, body: BodyHandle) -> bool {
        let Some(entry) = self.bodies.remove(&body) else {
            return false;
        };
        self.rigid_body_set.remove(
            entry.handle,
            &mut self.island_manager,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            true,
        );
        for collider in &entry.colliders {
            self.colliders.remove(collider);
        }
        self.active_pairs
            .retain(|(a, b), _| !entry.colliders.contains(a) && !entry.colliders.contains(b));
        true
    }

    fn contains_body(&self, body: BodyHandle) -> bool {
        self.bodies.contains_key(&body)
    }

    fn body_count(&self) -> usize {
        self.bodies.len()
    }

    fn body_type(&self, body: BodyHandle) -> Option<BodyType> {
        Some(match self.body(body)?.body_type() {
            RigidBodyType::Fixed => BodyType::Fixed,
            RigidBodyType::Dynamic => BodyType::Dynamic,
            RigidBodyType::KinematicPositionBased | RigidBodyType::KinematicVelocityBased => {
                BodyType::Kinematic
            }
        })
    }

    fn set_body_type(&mut self, body: BodyHandle, body_type: BodyType) {
        let Some(rb) = self.body_mut(body) else {
            return;
        };
        rb.set_body_type(rapier_body_type(body_type), true);
        rb.set_angvel(Vector3::zeros(), true);
        if body_type != BodyType::Dynamic {
            rb.set_linvel(Vector3::zeros(), true);
        }
    }

    fn pose(&self, body: BodyHandle) -> Option<Pose> {
        Some(from_isometry(self.body(body)?.position()))
    }

    fn set_pose(&mut self, body: BodyHandle, pose: Pose) {
        let Some(rb) = self.body_mut(body) else {
            return;
        };
        let iso = to_isometry(&pose);
        rb.set_position(iso, true);
        if rb.is_kinematic() {
            rb.set_next_kinematic_position(iso);
        }
    }

    fn set_next_kinematic_pose(&mut self, body: BodyHandle, pose: Pose) {
        if let Some(rb) = self.body_mut(body) {
            if rb.is_kinematic() {
                rb.set_next_kinematic_position(to_isometry(&pose));
            }
        }
    }

    fn linear_velocity(&self, body: BodyHandle) -> Option<Vec3> {
        let v = self.body(body)?.linvel();
        Some(Vec3::new(v.x, v.y, v.z))
    }

    fn set_linear_velocity(&mut self, body: BodyHandle, velocity: Vec3) {
        if let Some(rb) = self.body_mut(body) {
            rb.set_linvel(to_vector(velocity), true);
        }
    }

    fn apply_impulse(&mut self, body: BodyHandle, impulse: Vec3) {
        let Some(mass) = self.bodies.get(&body).map(|e| e.mass) else {
            return;
        };
        let Some(rb) = self.body_mut(body) else {
            return;
        };
        if !rb.is_dynamic() {
            return;
        }
        let mass = if mass > 0.0 { mass } else { rb.mass() };
        if mass <= 0.0 {
            return;
        }
        let linvel = *rb.linvel() + to_vector(impulse / mass);
        rb.set_linvel(linvel, true);
    }

    fn collision_groups(&self, collider: ColliderHandle) -> Option<CollisionGroups> {
        Some(from_interaction_groups(self.collider(collider)?.collision_groups()))
    }

    fn set_collision_groups(&mut self, collider: ColliderHandle, groups: CollisionGroups) {
        let Some(entry) = self.colliders.get(&collider) else {
            return;
        };
        if let Some(c) = self.collider_set.get_mut(entry.handle) {
            c.set_collision_groups(to_interaction_groups(groups));
        }
    }

    fn intersects(&self, a: ColliderHandle, b: ColliderHandle) -> bool {
        let (Some(ea), Some(eb)) = (self.colliders.get(&a), self.colliders.get(&b)) else {
            return false;
        };
        let (Some(ca), Some(cb)) = (
            self.collider_set.get(ea.handle),
            self.collider_set.get(eb.handle),
        ) else {
            return false;
        };
        if !from_interaction_groups(ca.collision_groups())
            .interacts_with(&from_interaction_groups(cb.collision_groups()))
        {
            return false;
        }
        // Colliders sit at their body's origin, and body poses are current
        // even between steps
        let (Some(pa), Some(pb)) = (self.body(ea.body), self.body(eb.body)) else {
            return false;
        };
        query::intersection_test(pa.position(), ca.shape(), pb.position(), cb.shape())
            .unwrap_or(false)
    }

    fn step(&mut self, dt: f32) {
        if !(dt > 0.0) || !dt.is_finite() {
            return;
        }
        self.integration_parameters.dt = dt;
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );
        self.collect_events();
    }

    fn drain_collision_events(&mut self) -> Vec<CollisionEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ChromaColor;

    const DT: f32 = 1.0 / 120.0;

    fn ball(world: &mut RapierWorld, pos: Vec3) -> (BodyHandle, ColliderHandle) {
        let body = world.create_body(&BodyDesc::dynamic(Pose::from_position(pos), 1.0));
        let collider = world
            .create_collider(
                &ColliderDesc::solid(Shape::Ball { radius: 0.5 })
                    .with_groups(CollisionGroups::NEUTRAL_BALL),
                body,
            )
            .unwrap();
        (body, collider)
    }

    fn fixed_box(world: &mut RapierWorld, pos: Vec3, half: Vec3, groups: CollisionGroups) {
        let body = world.create_body(&BodyDesc::fixed(Pose::from_position(pos)));
        world
            .create_collider(
                &ColliderDesc::solid(Shape::Cuboid { half_extents: half }).with_groups(groups),
                body,
            )
            .unwrap();
    }

    fn sensor_box(world: &mut RapierWorld, pos: Vec3) -> ColliderHandle {
        let body = world.create_body(&BodyDesc::fixed(Pose::from_position(pos)));
        world
            .create_collider(
                &ColliderDesc::sensor(Shape::Cuboid {
                    half_extents: Vec3::ONE,
                }),
                body,
            )
            .unwrap()
    }

    fn run(world: &mut RapierWorld, seconds: f32) {
        for _ in 0..(seconds / DT) as usize {
            world.step(DT);
        }
    }

    #[test]
    fn test_dynamic_body_falls() {
        let mut world = RapierWorld::default();
        let (body, _) = ball(&mut world, Vec3::new(0.0, 10.0, 0.0));
        run(&mut world, 1.0);
        let pose = world.pose(body).unwrap();
        assert!(pose.position.y < 10.0 - 4.0);
        assert!(world.linear_velocity(body).unwrap().y < -9.0);
    }

    #[test]
    fn test_ball_rests_on_floor() {
        let mut world = RapierWorld::default();
        fixed_box(
            &mut world,
            Vec3::ZERO,
            Vec3::new(5.0, 0.5, 5.0),
            CollisionGroups::UNIVERSAL_GEOMETRY,
        );
        let (body, _) = ball(&mut world, Vec3::new(0.0, 3.0, 0.0));
        run(&mut world, 2.0);
        let y = world.pose(body).unwrap().position.y;
        assert!((y - 1.0).abs() < 0.1, "ball settled at {y}");
        assert!(world.linear_velocity(body).unwrap().length() < 0.5);
    }

    #[test]
    fn test_chroma_barrier_stops_only_other_colors() {
        let run_into_blue_wall = |groups: CollisionGroups| {
            let mut world = RapierWorld::new(Vec3::ZERO);
            fixed_box(
                &mut world,
                Vec3::new(0.0, 0.0, 3.0),
                Vec3::new(3.0, 3.0, 0.2),
                ChromaColor::Blue.geometry_groups(),
            );
            let (body, collider) = ball(&mut world, Vec3::ZERO);
            world.set_collision_groups(collider, groups);
            world.set_linear_velocity(body, Vec3::Z * 6.0);
            run(&mut world, 1.5);
            world.pose(body).unwrap().position.z
        };

        assert!(run_into_blue_wall(ChromaColor::Red.ball_groups()) > 5.0);
        assert!(run_into_blue_wall(ChromaColor::Blue.ball_groups()) < 3.0);
        assert!(run_into_blue_wall(CollisionGroups::NEUTRAL_BALL) < 3.0);
    }

    #[test]
    fn test_impulse_only_moves_dynamic() {
        let mut world = RapierWorld::new(Vec3::ZERO);
        let (body, _) = ball(&mut world, Vec3::ZERO);
        world.apply_impulse(body, Vec3::X * 2.0);
        assert_eq!(world.linear_velocity(body), Some(Vec3::X * 2.0));

        world.set_body_type(body, BodyType::Kinematic);
        assert_eq!(world.body_type(body), Some(BodyType::Kinematic));
        assert_eq!(world.linear_velocity(body), Some(Vec3::ZERO));
        world.apply_impulse(body, Vec3::X * 2.0);
        assert_eq!(world.linear_velocity(body), Some(Vec3::ZERO));
    }

    #[test]
    fn test_kinematic_moves_to_next_pose() {
        let mut world = RapierWorld::default();
        let body = world.create_body(&BodyDesc::kinematic(Pose::IDENTITY));
        world.set_next_kinematic_pose(body, Pose::from_position(Vec3::Y));
        world.step(0.5);
        assert!((world.pose(body).unwrap().position - Vec3::Y).length() < 1e-5);
    }

    #[test]
    fn test_held_kinematic_ignores_gravity() {
        let mut world = RapierWorld::default();
        let (body, _) = ball(&mut world, Vec3::new(0.0, 5.0, 0.0));
        world.set_body_type(body, BodyType::Kinematic);
        world.set_pose(body, Pose::from_position(Vec3::new(1.0, 5.0, 0.0)));
        run(&mut world, 0.5);
        assert!((world.pose(body).unwrap().position - Vec3::new(1.0, 5.0, 0.0)).length() < 1e-5);

        world.set_body_type(body, BodyType::Dynamic);
        run(&mut world, 0.5);
        assert!(world.pose(body).unwrap().position.y < 4.0);
    }

    #[test]
    fn test_sensor_events_start_and_stop() {
        let mut world = RapierWorld::new(Vec3::ZERO);
        let (body, ball_collider) = ball(&mut world, Vec3::new(0.0, 0.0, -3.0));
        let sensor = sensor_box(&mut world, Vec3::ZERO);

        world.step(DT);
        assert!(world.drain_collision_events().is_empty());
        assert!(!world.intersects(ball_collider, sensor));

        world.set_pose(body, Pose::from_position(Vec3::new(0.0, 0.0, 1.2)));
        assert!(world.intersects(ball_collider, sensor));
        world.step(DT);
        let events = world.drain_collision_events();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], CollisionEvent::Started { sensor: true, .. }));

        world.set_pose(body, Pose::from_position(Vec3::new(0.0, 0.0, 5.0)));
        world.step(DT);
        let events = world.drain_collision_events();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], CollisionEvent::Stopped { sensor: true, .. }));
    }

    #[test]
    fn test_groups_filter_intersection() {
        let mut world = RapierWorld::new(Vec3::ZERO);
        let (_, ball_collider) = ball(&mut world, Vec3::ZERO);
        let wall_body = world.create_body(&BodyDesc::fixed(Pose::IDENTITY));
        let wall = world
            .create_collider(
                &ColliderDesc::solid(Shape::Cuboid {
                    half_extents: Vec3::ONE,
                })
                .with_groups(ChromaColor::Blue.geometry_groups()),
                wall_body,
            )
            .unwrap();

        assert!(world.intersects(ball_collider, wall));
        world.set_collision_groups(ball_collider, ChromaColor::Red.ball_groups());
        assert_eq!(
            world.collision_groups(ball_collider),
            Some(ChromaColor::Red.ball_groups())
        );
        assert!(!world.intersects(ball_collider, wall));
        world.set_collision_groups(ball_collider, ChromaColor::Blue.ball_groups());
        assert!(world.intersects(ball_collider, wall));
    }

    #[test]
    fn test_rotated_box_overlap() {
        let mut world = RapierWorld::new(Vec3::ZERO);
        let (ball_body, ball_collider) = ball(&mut world, Vec3::ZERO);
        let rotation = Quat::from_rotation_y(std::f32::consts::FRAC_PI_4);
        let rotated = world.create_body(&BodyDesc::fixed(Pose::new(Vec3::new(10.0, 0.0, 0.0), rotation)));
        let bar = world
            .create_collider(
                &ColliderDesc::solid(Shape::Cuboid {
                    half_extents: Vec3::new(2.0, 0.1, 0.1),
                }),
                rotated,
            )
            .unwrap();
        world.set_pose(ball_body, Pose::from_position(Vec3::new(10.0, 0.0, 0.0) + rotation * Vec3::X * 1.8));
        assert!(world.intersects(ball_collider, bar));
        world.set_pose(ball_body, Pose::from_position(Vec3::new(11.8, 0.0, 0.0)));
        assert!(!world.intersects(ball_collider, bar));
    }

    #[test]
    fn test_hull_colliders() {
        let mut world = RapierWorld::default();
        let body = world.create_body(&BodyDesc::fixed(Pose::IDENTITY));
        let flat = Shape::ConvexHull {
            points: vec![Vec3::ZERO, Vec3::X, Vec3::Z, Vec3::new(1.0, 0.0, 1.0)],
        };
        assert!(world.create_collider(&ColliderDesc::solid(flat), body).is_none());
        assert!(
            world
                .create_collider(&ColliderDesc::solid(Shape::Ball { radius: 1.0 }), BodyHandle(999))
                .is_none()
        );

        // Wedge floor: a ball dropped on it comes to rest on top
        let wedge = Shape::ConvexHull {
            points: vec![
                Vec3::new(-4.0, -1.0, -4.0),
                Vec3::new(4.0, -1.0, -4.0),
                Vec3::new(-4.0, -1.0, 4.0),
                Vec3::new(4.0, -1.0, 4.0),
                Vec3::new(-4.0, 0.0, -4.0),
                Vec3::new(4.0, 0.0, -4.0),
                Vec3::new(-4.0, 0.0, 4.0),
                Vec3::new(4.0, 0.0, 4.0),
            ],
        };
        assert!(world.create_collider(&ColliderDesc::solid(wedge), body).is_some());
        let (ball_body, _) = ball(&mut world, Vec3::new(0.0, 2.0, 0.0));
        run(&mut world, 2.0);
        assert!(world.pose(ball_body).unwrap().position.y > 0.3);
    }

    #[test]
    fn test_remove_body_drops_colliders() {
        let mut world = RapierWorld::default();
        let (body, collider) = ball(&mut world, Vec3::ZERO);
        assert!(world.collision_groups(collider).is_some());
        assert!(world.remove_body(body));
        assert!(!world.remove_body(body));
        assert!(!world.contains_body(body));
        assert!(world.collision_groups(collider).is_none());
    }
}
