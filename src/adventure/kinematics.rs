//! Kinematic choreographer
//!
//! Periodic obstacles are pure functions of session time: every tick the pose
//! is evaluated in closed form, pushed to the physics body as its next
//! kinematic pose and mirrored to the mesh.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::engine::{BodyHandle, Engine, MeshHandle, Pose};

/// Motion type, fixed at creation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Motion {
    /// Displacement along world +Y
    Piston,
    /// Displacement along a world axis
    Oscillator { axis: Vec3 },
    /// Rotation about an axis in the obstacle's local frame
    RotatingOscillator { axis: Vec3 },
}

#[derive(Debug, Clone)]
pub struct KinematicObstacle {
    pub body: BodyHandle,
    pub mesh: MeshHandle,
    pub motion: Motion,
    pub base: Pose,
    /// Distance (or angle, for rotation) at the peak of the swing
    pub amplitude: f32,
    /// Angular frequency (radians/second)
    pub frequency: f32,
    pub phase: f32,
}

impl KinematicObstacle {
    /// `sin(t·freq + phase)·amplitude`
    #[inline]
    pub fn offset(&self, t: f32) -> f32 {
        (t * self.frequency + self.phase).sin() * self.amplitude
    }

    /// Seconds per full cycle (`None` when the obstacle never moves)
    pub fn period(&self) -> Option<f32> {
        (self.frequency != 0.0).then(|| std::f32::consts::TAU / self.frequency.abs())
    }

    pub fn pose_at(&self, t: f32) -> Pose {
        let offset = self.offset(t);
        match self.motion {
            Motion::Piston => Pose::new(self.base.position + Vec3::Y * offset, self.base.rotation),
            Motion::Oscillator { axis } => Pose::new(
                self.base.position + axis.normalize_or_zero() * offset,
                self.base.rotation,
            ),
            Motion::RotatingOscillator { axis } => {
                let axis = axis.try_normalize().unwrap_or(Vec3::Y);
                Pose::new(
                    self.base.position,
                    self.base.rotation * Quat::from_axis_angle(axis, offset),
                )
            }
        }
    }
}

/// Drives every registered kinematic obstacle
#[derive(Debug, Default)]
pub struct Choreographer {
    obstacles: Vec<KinematicObstacle>,
}

impl Choreographer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, obstacle: KinematicObstacle) {
        self.obstacles.push(obstacle);
    }

    pub fn obstacles(&self) -> &[KinematicObstacle] {
        &self.obstacles
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    pub fn clear(&mut self) {
        self.obstacles.clear();
    }

    /// Pose every obstacle for session time `t`; returns how many were updated.
    /// Obstacles whose body or mesh is gone are skipped.
    pub fn advance(&self, engine: &mut Engine<'_>, t: f32) -> usize {
        let mut updated = 0;
        for obstacle in &self.obstacles {
            if !engine.world.contains_body(obstacle.body) || !engine.scene.contains(obstacle.mesh) {
                continue;
            }
            let pose = obstacle.pose_at(t);
            engine.world.set_next_kinematic_pose(obstacle.body, pose);
            engine.scene.set_transform(obstacle.mesh, pose);
            updated += 1;
        }
        updated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{BodyDesc, HeadlessScene, RapierWorld, PhysicsWorld, SceneGraph};
    use crate::mesh::{Material, MeshData, colors};
    use proptest::prelude::*;
    use std::f32::consts::{FRAC_PI_2, PI, TAU};

    fn obstacle(motion: Motion) -> KinematicObstacle {
        KinematicObstacle {
            body: BodyHandle(1),
            mesh: MeshHandle(1),
            motion,
            base: Pose::from_position(Vec3::new(1.0, 2.0, 3.0)),
            amplitude: 2.0,
            frequency: 3.0,
            phase: 0.5,
        }
    }

    #[test]
    fn test_piston_moves_vertically() {
        let piston = obstacle(Motion::Piston);
        // Peak when t·freq + phase = π/2
        let t = (FRAC_PI_2 - 0.5) / 3.0;
        let pose = piston.pose_at(t);
        assert!((pose.position - Vec3::new(1.0, 4.0, 3.0)).length() < 1e-5);
        assert_eq!(pose.rotation, Quat::IDENTITY);
    }

    #[test]
    fn test_oscillator_uses_normalized_axis() {
        let osc = obstacle(Motion::Oscillator {
            axis: Vec3::new(0.0, 0.0, 5.0),
        });
        let t = (FRAC_PI_2 - 0.5) / 3.0;
        let pose = osc.pose_at(t);
        assert!((pose.position - Vec3::new(1.0, 2.0, 5.0)).length() < 1e-5);
    }

    #[test]
    fn test_rotating_oscillator_keeps_position() {
        let rot = obstacle(Motion::RotatingOscillator { axis: Vec3::Y });
        let t = (FRAC_PI_2 - 0.5) / 3.0;
        let pose = rot.pose_at(t);
        assert_eq!(pose.position, rot.base.position);
        let expected = Quat::from_rotation_y(2.0);
        assert!(pose.rotation.angle_between(expected) < 1e-4);
    }

    #[test]
    fn test_period() {
        assert!((obstacle(Motion::Piston).period().unwrap() - TAU / 3.0).abs() < 1e-6);
        let still = KinematicObstacle {
            frequency: 0.0,
            ..obstacle(Motion::Piston)
        };
        assert!(still.period().is_none());
    }

    #[test]
    fn test_advance_skips_missing_pairs() {
        let mut world = RapierWorld::default();
        let mut scene = HeadlessScene::new();
        let body = world.create_body(&BodyDesc::kinematic(Pose::IDENTITY));
        let mesh = scene.create_mesh("crusher", MeshData::default(), Material::solid(colors::CRUSHER));

        let mut choreographer = Choreographer::new();
        choreographer.register(KinematicObstacle {
            body,
            mesh,
            motion: Motion::Piston,
            base: Pose::IDENTITY,
            amplitude: 1.0,
            frequency: 1.0,
            phase: FRAC_PI_2,
        });
        // Dangling entries
        let live = choreographer.obstacles()[0].clone();
        choreographer.register(KinematicObstacle {
            body: BodyHandle(999),
            ..live.clone()
        });
        choreographer.register(KinematicObstacle {
            mesh: MeshHandle(999),
            ..live
        });

        let mut engine = Engine::new(&mut world, &mut scene);
        assert_eq!(choreographer.advance(&mut engine, 0.0), 1);
        engine.world.step(1.0 / 60.0);
        let pose = engine.world.pose(body).unwrap();
        assert!((pose.position.y - 1.0).abs() < 1e-5);
        assert!((scene.node(mesh).unwrap().transform.position - pose.position).length() < 1e-5);
    }

    proptest! {
        #[test]
        fn prop_piston_is_periodic(
            t in 0.0f32..50.0,
            freq in 0.2f32..10.0,
            phase in -PI..PI,
            amplitude in 0.1f32..5.0,
        ) {
            let piston = KinematicObstacle {
                amplitude,
                frequency: freq,
                phase,
                ..obstacle(Motion::Piston)
            };
            let period = piston.period().unwrap();
            let a = piston.offset(t);
            let b = piston.offset(t + period);
            prop_assert!((a - b).abs() < 2e-3 * amplitude.max(1.0));
            let pa = piston.pose_at(t).position;
            let pb = piston.pose_at(t + period).position;
            prop_assert!((pa - pb).length() < 2e-3 * amplitude.max(1.0));
        }
    }
}
