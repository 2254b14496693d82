//! Ball entities and their ownership mode

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::registry::{Registry, Spawned};
use crate::engine::{
    BodyDesc, BodyHandle, BodyType, ChromaColor, ColliderDesc, ColliderHandle, CollisionGroups,
    Engine, MeshHandle, PhysicsWorld, Pose, Shape,
};
use crate::mesh::{Material, colors, shapes};
use crate::tuning::Tuning;

/// Identifies a feeder holding a ball
pub type FeederId = u32;

/// Who moves the ball. A captured ball's body is kinematic, a free one dynamic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BallMode {
    Free,
    Captured { by: FeederId },
}

#[derive(Debug, Clone)]
pub struct Ball {
    pub id: u32,
    pub body: BodyHandle,
    pub collider: ColliderHandle,
    pub mesh: MeshHandle,
    pub mode: BallMode,
    pub chroma: Option<ChromaColor>,
    /// Where the ball respawns after falling off the track
    pub spawn: Vec3,
}

impl Ball {
    /// Create a dynamic ball at `position`
    pub fn spawn(
        engine: &mut Engine<'_>,
        registry: &mut Registry,
        tuning: &Tuning,
        id: u32,
        position: Vec3,
    ) -> Option<Self> {
        let Spawned {
            body,
            collider,
            mesh,
        } = registry.spawn(
            engine,
            &format!("ball_{id}"),
            &BodyDesc::dynamic(Pose::from_position(position), tuning.ball_mass),
            &ColliderDesc::solid(Shape::Ball {
                radius: tuning.ball_radius,
            })
            .with_friction(tuning.ball_friction)
            .with_restitution(tuning.ball_restitution)
            .with_groups(CollisionGroups::NEUTRAL_BALL),
            shapes::sphere(tuning.ball_radius, 12, 16, colors::BALL),
            Material::glowing(colors::BALL, 0.2),
        )?;
        Some(Self {
            id,
            body,
            collider,
            mesh,
            mode: BallMode::Free,
            chroma: None,
            spawn: position,
        })
    }

    #[inline]
    pub fn is_free(&self) -> bool {
        self.mode == BallMode::Free
    }

    pub fn position(&self, world: &dyn PhysicsWorld) -> Option<Vec3> {
        world.pose(self.body).map(|p| p.position)
    }

    /// Hand the ball to a feeder: switch to kinematic. Fails if already captured
    /// or the body is gone.
    pub fn capture(&mut self, world: &mut dyn PhysicsWorld, by: FeederId) -> bool {
        if !self.is_free() || !world.contains_body(self.body) {
            return false;
        }
        world.set_body_type(self.body, BodyType::Kinematic);
        self.mode = BallMode::Captured { by };
        true
    }

    /// Give the ball back to the simulation: switch to dynamic
    pub fn release(&mut self, world: &mut dyn PhysicsWorld) {
        if self.is_free() {
            return;
        }
        world.set_body_type(self.body, BodyType::Dynamic);
        self.mode = BallMode::Free;
    }

    /// Retag the ball's collision filter and color
    pub fn set_chroma(&mut self, engine: &mut Engine<'_>, color: Option<ChromaColor>) {
        if self.chroma == color {
            return;
        }
        let (groups, rgba) = match color {
            Some(c) => (c.ball_groups(), c.rgba()),
            None => (CollisionGroups::NEUTRAL_BALL, colors::BALL),
        };
        engine.world.set_collision_groups(self.collider, groups);
        engine.scene.set_color(self.mesh, rgba);
        self.chroma = color;
    }

    /// Put the ball back at its spawn point, free and untagged
    pub fn respawn(&mut self, engine: &mut Engine<'_>) {
        self.release(engine.world);
        engine.world.set_pose(self.body, Pose::from_position(self.spawn));
        engine.world.set_linear_velocity(self.body, Vec3::ZERO);
        self.set_chroma(engine, None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{HeadlessScene, RapierWorld, SceneGraph};

    #[test]
    fn test_capture_release_switches_body_type() {
        let mut world = RapierWorld::default();
        let mut scene = HeadlessScene::new();
        let mut engine = Engine::new(&mut world, &mut scene);
        let mut registry = Registry::new();
        let tuning = Tuning::default();

        let mut ball = Ball::spawn(&mut engine, &mut registry, &tuning, 1, Vec3::Y).unwrap();
        assert!(ball.is_free());
        assert_eq!(engine.world.body_type(ball.body), Some(BodyType::Dynamic));

        assert!(ball.capture(engine.world, 7));
        assert_eq!(ball.mode, BallMode::Captured { by: 7 });
        assert_eq!(engine.world.body_type(ball.body), Some(BodyType::Kinematic));
        // Exactly one owner at a time
        assert!(!ball.capture(engine.world, 8));

        ball.release(engine.world);
        assert!(ball.is_free());
        assert_eq!(engine.world.body_type(ball.body), Some(BodyType::Dynamic));
    }

    #[test]
    fn test_chroma_and_respawn() {
        let mut world = RapierWorld::default();
        let mut scene = HeadlessScene::new();
        let mut engine = Engine::new(&mut world, &mut scene);
        let mut registry = Registry::new();
        let tuning = Tuning::default();

        let mut ball = Ball::spawn(&mut engine, &mut registry, &tuning, 1, Vec3::Y).unwrap();
        ball.set_chroma(&mut engine, Some(ChromaColor::Green));
        assert_eq!(
            engine.world.collision_groups(ball.collider),
            Some(ChromaColor::Green.ball_groups())
        );

        engine.world.set_pose(ball.body, Pose::from_position(Vec3::new(0.0, -50.0, 0.0)));
        ball.capture(engine.world, 1);
        ball.respawn(&mut engine);
        assert!(ball.is_free());
        assert_eq!(ball.position(engine.world), Some(Vec3::Y));
        assert_eq!(ball.chroma, None);
        assert_eq!(
            engine.world.collision_groups(ball.collider),
            Some(CollisionGroups::NEUTRAL_BALL)
        );
        assert!(engine.scene.contains(ball.mesh));
    }
}
