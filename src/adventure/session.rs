//! Adventure session lifecycle
//!
//! `start` builds a level into the engine, `tick` advances it in a fixed
//! order, `end` tears everything down. The session owns every body and mesh
//! it creates and must leave the engine exactly as it found it.

use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;

use super::ball::Ball;
use super::feeders::{FeederBank, FeederEvent};
use super::frame::Cursor;
use super::kinematics::Choreographer;
use super::levels::{BUILTIN_LEVELS, LevelSpec, TrackPiece, builtin, builtin_index};
use super::obstacles::ObstacleField;
use super::registry::Registry;
use super::track::TrackGenerator;
use super::zones::ZoneField;
use crate::consts::{BALL_SPAWN_AHEAD, BALL_SPAWN_HEIGHT, MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};
use crate::engine::{CollisionEvent, Engine};
use crate::tuning::Tuning;

/// Balls per spawn row
const SPAWN_ROW: u32 = 4;

/// Fixed timestep accumulator
#[derive(Debug, Clone)]
pub struct FrameStepper {
    accumulator: f32,
    dt: f32,
}

impl Default for FrameStepper {
    fn default() -> Self {
        Self::new(SIM_DT)
    }
}

impl FrameStepper {
    pub fn new(dt: f32) -> Self {
        Self {
            accumulator: 0.0,
            dt,
        }
    }

    pub fn dt(&self) -> f32 {
        self.dt
    }

    /// Feed one frame's delta; returns how many fixed steps to run
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        if !frame_dt.is_finite() || frame_dt <= 0.0 {
            return 0;
        }
        self.accumulator += frame_dt.min(MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator >= self.dt && substeps < MAX_SUBSTEPS {
            self.accumulator -= self.dt;
            substeps += 1;
        }
        substeps
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SessionStats {
    pub ticks: u64,
    pub elapsed: f32,
    pub contacts: u64,
    pub sensor_events: u64,
    pub recycled: u32,
    pub captures: u32,
    pub releases: u32,
    pub lost: u32,
}

#[derive(Debug)]
pub struct AdventureSession {
    tuning: Tuning,
    active: bool,
    level: Option<String>,
    /// Built-in played by the next `next_level`
    rotation: usize,
    registry: Registry,
    track: TrackGenerator,
    obstacles: ObstacleField,
    choreographer: Choreographer,
    zones: ZoneField,
    feeders: FeederBank,
    balls: Vec<Ball>,
    stepper: FrameStepper,
    time: f32,
    kill_plane: f32,
    stats: SessionStats,
}

impl AdventureSession {
    pub fn new(tuning: Tuning) -> Self {
        Self {
            tuning,
            active: false,
            level: None,
            rotation: 0,
            registry: Registry::new(),
            track: TrackGenerator::new(),
            obstacles: ObstacleField::new(),
            choreographer: Choreographer::new(),
            zones: ZoneField::new(),
            feeders: FeederBank::new(),
            balls: Vec::new(),
            stepper: FrameStepper::default(),
            time: 0.0,
            kill_plane: f32::NEG_INFINITY,
            stats: SessionStats::default(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn level_name(&self) -> Option<&str> {
        self.level.as_deref()
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn kill_plane(&self) -> f32 {
        self.kill_plane
    }

    pub fn balls(&self) -> &[Ball] {
        &self.balls
    }

    pub fn track(&self) -> &TrackGenerator {
        &self.track
    }

    pub fn obstacles(&self) -> &ObstacleField {
        &self.obstacles
    }

    pub fn choreographer(&self) -> &Choreographer {
        &self.choreographer
    }

    pub fn zones(&self) -> &ZoneField {
        &self.zones
    }

    pub fn feeders(&self) -> &FeederBank {
        &self.feeders
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Build `level` into the engine. Returns false (and changes nothing) when
    /// a session is already running or the level is invalid.
    pub fn start(&mut self, engine: &mut Engine<'_>, level: &LevelSpec) -> bool {
        if self.active {
            log::warn!(
                "Adventure already running ({:?}); ignoring start of '{}'",
                self.level,
                level.name
            );
            return false;
        }
        if let Err(err) = level.validate() {
            log::warn!("Refusing to start: {}", err);
            return false;
        }

        let mut rng = Pcg32::seed_from_u64(level.seed);
        let mut cursor = level.start;
        for piece in &level.pieces {
            cursor = self.build_piece(engine, piece, cursor, &mut rng);
        }

        self.spawn_balls(engine, level);
        self.kill_plane = self.track.min_height().unwrap_or(level.start.position.y)
            - self.tuning.kill_plane_margin;
        self.time = 0.0;
        self.stats = SessionStats::default();
        self.stepper.reset();
        self.level = Some(level.name.clone());
        self.active = true;
        if let Some(index) = builtin_index(&level.name) {
            self.rotation = (index + 1) % BUILTIN_LEVELS.len();
        }

        log::info!(
            "Adventure '{}' started: {} segments, {} obstacles, {} zones, {} feeders, {} balls",
            level.name,
            self.track.segments().len(),
            self.obstacles.len(),
            self.zones.len(),
            self.feeders.len(),
            self.balls.len()
        );
        true
    }

    fn build_piece(
        &mut self,
        engine: &mut Engine<'_>,
        piece: &TrackPiece,
        cursor: Cursor,
        rng: &mut Pcg32,
    ) -> Cursor {
        match piece {
            TrackPiece::Straight { ramp, obstacles } => {
                let before = self.track.segments().len();
                let next =
                    self.track
                        .add_straight_ramp(engine, &mut self.registry, &self.tuning, cursor, ramp);
                if self.track.segments().len() > before {
                    if let Some(segment) = self.track.last() {
                        for spec in obstacles {
                            self.obstacles.place(
                                engine,
                                &mut self.registry,
                                segment,
                                spec,
                                rng,
                                &mut self.choreographer,
                            );
                        }
                    }
                }
                next
            }
            TrackPiece::Curve { ramp } => {
                self.track
                    .add_curved_ramp(engine, &mut self.registry, &self.tuning, cursor, ramp)
            }
            TrackPiece::Gap { length, drop } => TrackGenerator::skip_gap(cursor, *length, *drop),
            TrackPiece::Zone(spec) => {
                match self.track.last().map(|s| s.frame) {
                    Some(frame) => {
                        self.zones
                            .place(engine, &mut self.registry, &self.tuning, &frame, spec);
                    }
                    None => log::warn!("Zone has no segment to attach to"),
                }
                cursor
            }
            TrackPiece::Feeder(spec) => {
                match self.track.last().map(|s| s.frame) {
                    Some(frame) => {
                        self.feeders.place(engine, &mut self.registry, &frame, spec);
                    }
                    None => log::warn!("Feeder has no segment to attach to"),
                }
                cursor
            }
        }
    }

    /// End the current run and start the next built-in track, wrapping after
    /// the last. Returns the name of the track now running.
    pub fn next_level(&mut self, engine: &mut Engine<'_>) -> Option<&'static str> {
        self.end(engine);
        let name = BUILTIN_LEVELS[self.rotation % BUILTIN_LEVELS.len()];
        let level = match builtin(name) {
            Ok(level) => level,
            Err(err) => {
                log::error!("Rotation failed: {}", err);
                return None;
            }
        };
        self.start(engine, &level).then_some(name)
    }

    /// Drop balls in rows just past the start of the track
    fn spawn_balls(&mut self, engine: &mut Engine<'_>, level: &LevelSpec) {
        let forward = level.start.forward();
        let lateral = Vec3::new(forward.z, 0.0, -forward.x);
        let spacing = self.tuning.ball_radius * 2.0 + 0.2;
        let base = level.start.position
            + forward * BALL_SPAWN_AHEAD
            + Vec3::Y * (BALL_SPAWN_HEIGHT + self.tuning.ball_radius);

        for id in 0..level.ball_count {
            let row = id / SPAWN_ROW;
            let col = id % SPAWN_ROW;
            let in_row = (level.ball_count - row * SPAWN_ROW).min(SPAWN_ROW);
            let across = (col as f32 - (in_row - 1) as f32 / 2.0) * spacing;
            let position = base + lateral * across + forward * (row as f32 * spacing);
            match Ball::spawn(engine, &mut self.registry, &self.tuning, id, position) {
                Some(ball) => self.balls.push(ball),
                None => log::warn!("Failed to spawn ball {}", id),
            }
        }
    }

    /// One fixed step: physics, events, choreography, zones, feeders,
    /// recycling, mesh mirroring
    pub fn tick(&mut self, engine: &mut Engine<'_>, dt: f32) {
        if !self.active || !dt.is_finite() || dt <= 0.0 {
            return;
        }

        engine.world.step(dt);
        for event in engine.world.drain_collision_events() {
            match event {
                CollisionEvent::Started { sensor: true, .. } => self.stats.sensor_events += 1,
                CollisionEvent::Started { sensor: false, .. } => self.stats.contacts += 1,
                CollisionEvent::Stopped { .. } => {}
            }
        }
        self.time += dt;

        self.choreographer.advance(engine, self.time);
        self.zones.apply(engine, &mut self.balls, dt);

        let scale = self.tuning.feeder_impulse_scale;
        for event in self.feeders.tick(engine, &mut self.balls, dt, scale) {
            match event {
                FeederEvent::Captured { .. } => self.stats.captures += 1,
                FeederEvent::Released { .. } => self.stats.releases += 1,
                FeederEvent::Lost { .. } => self.stats.lost += 1,
            }
        }

        self.recycle_fallen(engine);

        for ball in &self.balls {
            if let Some(pose) = engine.world.pose(ball.body) {
                engine.scene.set_transform(ball.mesh, pose);
            }
        }

        self.stats.ticks += 1;
        self.stats.elapsed = self.time;
    }

    /// Run as many fixed steps as `frame_dt` allows; returns the step count
    pub fn frame(&mut self, engine: &mut Engine<'_>, frame_dt: f32) -> u32 {
        if !self.active {
            return 0;
        }
        let steps = self.stepper.advance(frame_dt);
        let dt = self.stepper.dt();
        for _ in 0..steps {
            self.tick(engine, dt);
        }
        steps
    }

    fn recycle_fallen(&mut self, engine: &mut Engine<'_>) {
        for ball in &mut self.balls {
            if !ball.is_free() {
                continue;
            }
            let Some(position) = ball.position(engine.world) else {
                continue;
            };
            if position.y < self.kill_plane {
                log::debug!("Ball {} fell below {:.1}; respawning", ball.id, self.kill_plane);
                ball.respawn(engine);
                self.stats.recycled += 1;
            }
        }
    }

    /// Release every body and mesh. Safe to call repeatedly or without `start`.
    pub fn end(&mut self, engine: &mut Engine<'_>) {
        let (bodies, meshes) = self.registry.release(engine);
        self.balls.clear();
        self.track.clear();
        self.obstacles.clear();
        self.choreographer.clear();
        self.zones.clear();
        self.feeders.clear();
        self.stepper.reset();
        self.kill_plane = f32::NEG_INFINITY;

        if self.active {
            log::info!(
                "Adventure '{}' ended after {:.1}s: released {} bodies, {} meshes",
                self.level.as_deref().unwrap_or("?"),
                self.time,
                bodies,
                meshes
            );
        }
        self.active = false;
        self.level = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adventure::levels::builtin_names;
    use crate::adventure::zones::{ZoneEffectSpec, ZoneSpec};
    use crate::engine::{ChromaColor, HeadlessScene, PhysicsWorld, Pose, RapierWorld};

    fn tiny_level() -> LevelSpec {
        LevelSpec::from_json(
            r#"{
                "name": "tiny",
                "seed": 3,
                "ball_count": 2,
                "pieces": [
                    { "piece": "straight", "ramp": { "length": 10.0, "incline": 0.1 },
                      "obstacles": [ { "type": "crusher", "at": 0.5, "size": [2.0, 1.0, 2.0],
                                       "amplitude": 1.0, "frequency": 2.0 } ] },
                    { "piece": "zone", "at": 0.5, "half_extents": [3.0, 1.0, 2.0],
                      "effect": { "type": "damping", "coefficient": 1.0 } },
                    { "piece": "feeder", "kind": "prism_core", "at": 0.9 }
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_end_without_start() {
        let mut world = RapierWorld::default();
        let mut scene = HeadlessScene::new();
        let mut engine = Engine::new(&mut world, &mut scene);
        let mut session = AdventureSession::new(Tuning::default());
        session.end(&mut engine);
        session.end(&mut engine);
        assert!(!session.is_active());
        assert!(session.obstacles().is_empty());
        assert!(session.registry().is_empty());
        assert_eq!(engine.world.body_count(), 0);
    }

    #[test]
    fn test_end_twice_leaves_engine_empty() {
        let mut world = RapierWorld::default();
        let mut scene = HeadlessScene::new();
        let mut engine = Engine::new(&mut world, &mut scene);
        let mut session = AdventureSession::new(Tuning::default());

        assert!(session.start(&mut engine, &tiny_level()));
        assert!(engine.world.body_count() > 0);
        assert_eq!(session.obstacles().len(), 1);
        assert_eq!(session.balls().len(), 2);
        for _ in 0..30 {
            session.tick(&mut engine, SIM_DT);
        }

        session.end(&mut engine);
        session.end(&mut engine);
        assert!(!session.is_active());
        assert!(session.obstacles().is_empty());
        assert!(session.choreographer().is_empty());
        assert!(session.balls().is_empty());
        assert!(session.registry().is_empty());
        assert_eq!(engine.world.body_count(), 0);
        assert_eq!(engine.scene.mesh_count(), 0);
    }

    #[test]
    fn test_repeated_cycles_do_not_leak() {
        let mut world = RapierWorld::default();
        let mut scene = HeadlessScene::new();
        let mut engine = Engine::new(&mut world, &mut scene);
        let mut session = AdventureSession::new(Tuning::default());
        let level = tiny_level();

        session.start(&mut engine, &level);
        let bodies = engine.world.body_count();
        let meshes = engine.scene.mesh_count();
        session.end(&mut engine);

        for _ in 0..3 {
            assert!(session.start(&mut engine, &level));
            assert_eq!(engine.world.body_count(), bodies);
            assert_eq!(engine.scene.mesh_count(), meshes);
            session.frame(&mut engine, 1.0 / 60.0);
            session.end(&mut engine);
            assert_eq!(engine.world.body_count(), 0);
            assert_eq!(engine.scene.mesh_count(), 0);
        }
    }

    #[test]
    fn test_double_start_is_ignored() {
        let mut world = RapierWorld::default();
        let mut scene = HeadlessScene::new();
        let mut engine = Engine::new(&mut world, &mut scene);
        let mut session = AdventureSession::new(Tuning::default());

        assert!(session.start(&mut engine, &tiny_level()));
        let bodies = engine.world.body_count();
        let other = builtin("neon_helix").unwrap();
        assert!(!session.start(&mut engine, &other));
        assert_eq!(engine.world.body_count(), bodies);
        assert_eq!(session.level_name(), Some("tiny"));
    }

    #[test]
    fn test_invalid_level_does_not_start() {
        let mut world = RapierWorld::default();
        let mut scene = HeadlessScene::new();
        let mut engine = Engine::new(&mut world, &mut scene);
        let mut session = AdventureSession::new(Tuning::default());
        let level = LevelSpec {
            ball_count: 0,
            ..tiny_level()
        };
        assert!(!session.start(&mut engine, &level));
        assert!(!session.is_active());
        assert_eq!(engine.world.body_count(), 0);
    }

    #[test]
    fn test_builtin_levels_build_and_run() {
        for name in builtin_names() {
            let mut world = RapierWorld::default();
            let mut scene = HeadlessScene::new();
            let mut engine = Engine::new(&mut world, &mut scene);
            let mut session = AdventureSession::new(Tuning::default());
            let level = builtin(name).unwrap();

            assert!(session.start(&mut engine, &level), "{name} failed to start");
            assert!(session.track().segments().len() >= level.segment_pieces());
            assert_eq!(session.balls().len(), level.ball_count as usize);
            assert!(!session.feeders().is_empty());
            assert!(!session.zones().is_empty());

            for _ in 0..240 {
                session.frame(&mut engine, 1.0 / 60.0);
            }
            assert!(session.stats().ticks >= 470);
            assert!(session.time() > 3.9);
            session.end(&mut engine);
            assert_eq!(engine.world.body_count(), 0);
        }
    }

    #[test]
    fn test_builtin_layout_is_reproducible() {
        let layout = || {
            let mut world = RapierWorld::default();
            let mut scene = HeadlessScene::new();
            let mut engine = Engine::new(&mut world, &mut scene);
            let mut session = AdventureSession::new(Tuning::default());
            session.start(&mut engine, &builtin("neon_helix").unwrap());
            session
                .obstacles()
                .obstacles()
                .iter()
                .map(|o| o.pose)
                .collect::<Vec<_>>()
        };
        assert_eq!(layout(), layout());
    }

    #[test]
    fn test_fallen_balls_are_recycled() {
        let mut world = RapierWorld::default();
        let mut scene = HeadlessScene::new();
        let mut engine = Engine::new(&mut world, &mut scene);
        let mut session = AdventureSession::new(Tuning::default());
        session.start(&mut engine, &tiny_level());
        let spawn = session.balls()[0].spawn;
        let body = session.balls()[0].body;

        let below = Vec3::new(spawn.x, session.kill_plane() - 5.0, spawn.z);
        engine.world.set_pose(body, Pose::from_position(below));
        session.tick(&mut engine, SIM_DT);

        assert_eq!(session.stats().recycled, 1);
        let position = session.balls()[0].position(engine.world).unwrap();
        assert!(position.distance(spawn) < 1e-4, "{position} vs {spawn}");
    }

    #[test]
    fn test_balls_ride_every_builtin_track() {
        for name in builtin_names() {
            let mut world = RapierWorld::default();
            let mut scene = HeadlessScene::new();
            let mut engine = Engine::new(&mut world, &mut scene);
            let mut session = AdventureSession::new(Tuning::default());
            let level = builtin(name).unwrap();
            session.start(&mut engine, &level);

            for _ in 0..60 {
                session.frame(&mut engine, 1.0 / 60.0);
            }
            assert_eq!(session.stats().recycled, 0, "{name}");
            for ball in session.balls() {
                let y = ball.position(engine.world).unwrap().y;
                assert!(y > level.start.position.y - 1.5, "{name}: ball {} at {y}", ball.id);
            }
            assert!(session.stats().contacts > 0, "{name}");
        }
    }

    /// Run `level` with one ball and report whether it was seen past the
    /// barrier on the second segment, and with which tag
    fn run_past_barrier(level: &LevelSpec, frames: u32) -> (AdventureSession, Option<Option<ChromaColor>>) {
        let mut world = RapierWorld::default();
        let mut scene = HeadlessScene::new();
        let mut engine = Engine::new(&mut world, &mut scene);
        let mut session = AdventureSession::new(Tuning::default());
        assert!(session.start(&mut engine, level));

        let frame = session.track().segments()[1].frame;
        // barrier at 0.3 of a 12 long segment, plus its half thickness and a ball
        let beyond = 0.3 * frame.length + 1.0;
        let mut seen = None;
        for _ in 0..frames {
            session.frame(&mut engine, 1.0 / 60.0);
            let ball = &session.balls()[0];
            let Some(p) = ball.position(engine.world) else {
                continue;
            };
            let local = p - frame.origin;
            let along = local.dot(frame.forward);
            let across = local.dot(frame.lateral).abs();
            let height = local.dot(frame.normal);
            if seen.is_none()
                && along > beyond
                && along < frame.length
                && across < frame.width / 2.0
                && (0.0..3.0).contains(&height)
            {
                seen = Some(ball.chroma);
            }
        }
        session.end(&mut engine);
        (session, seen)
    }

    fn one_ball(name: &str) -> LevelSpec {
        LevelSpec {
            ball_count: 1,
            ..builtin(name).unwrap()
        }
    }

    #[test]
    fn test_gated_ball_crosses_other_colour_barrier() {
        let level = one_ball("quantum_grid");
        let (session, seen) = run_past_barrier(&level, 900);

        assert_eq!(seen, Some(Some(ChromaColor::Red)));
        assert!(session.stats().sensor_events > 0);
        assert!(session.stats().captures > 0);
        assert!(session.stats().contacts > 0);
    }

    #[test]
    fn test_untagged_ball_is_held_by_barrier() {
        let mut level = one_ball("quantum_grid");
        level.pieces.retain(|p| {
            !matches!(
                p,
                TrackPiece::Zone(ZoneSpec {
                    effect: ZoneEffectSpec::ChromaGate {
                        color: ChromaColor::Red
                    },
                    ..
                })
            )
        });
        let (session, seen) = run_past_barrier(&level, 600);

        assert_eq!(seen, None);
        assert_eq!(session.stats().captures, 0);
    }

    #[test]
    fn test_next_level_cycles_the_catalogue() {
        let mut world = RapierWorld::default();
        let mut scene = HeadlessScene::new();
        let mut engine = Engine::new(&mut world, &mut scene);
        let mut session = AdventureSession::new(Tuning::default());

        let mut played = Vec::new();
        for _ in 0..BUILTIN_LEVELS.len() + 1 {
            let name = session.next_level(&mut engine).unwrap();
            assert_eq!(session.level_name(), Some(name));
            assert!(session.is_active());
            session.frame(&mut engine, 1.0 / 60.0);
            played.push(name);
        }
        assert_eq!(&played[..BUILTIN_LEVELS.len()], &BUILTIN_LEVELS[..]);
        assert_eq!(played[BUILTIN_LEVELS.len()], BUILTIN_LEVELS[0]);

        session.end(&mut engine);
        assert_eq!(engine.world.body_count(), 0);
        assert_eq!(engine.scene.mesh_count(), 0);
    }

    #[test]
    fn test_rotation_continues_after_a_named_start() {
        let mut world = RapierWorld::default();
        let mut scene = HeadlessScene::new();
        let mut engine = Engine::new(&mut world, &mut scene);
        let mut session = AdventureSession::new(Tuning::default());

        session.start(&mut engine, &builtin("firewall_breach").unwrap());
        assert_eq!(session.next_level(&mut engine), Some("neon_helix"));
        assert_eq!(session.next_level(&mut engine), Some("cyber_core"));

        // custom levels leave the rotation where it was
        session.end(&mut engine);
        session.start(&mut engine, &tiny_level());
        assert_eq!(session.next_level(&mut engine), Some("quantum_grid"));
    }

    #[test]
    fn test_ball_meshes_follow_bodies() {
        let mut world = RapierWorld::default();
        let mut scene = HeadlessScene::new();
        let mut session = AdventureSession::new(Tuning::default());
        {
            let mut engine = Engine::new(&mut world, &mut scene);
            session.start(&mut engine, &tiny_level());
            for _ in 0..10 {
                session.tick(&mut engine, SIM_DT);
            }
        }
        for ball in session.balls() {
            let pose = world.pose(ball.body).unwrap();
            assert_eq!(scene.node(ball.mesh).unwrap().transform, pose);
        }
    }

    #[test]
    fn test_tick_is_noop_when_inactive() {
        let mut world = RapierWorld::default();
        let mut scene = HeadlessScene::new();
        let mut engine = Engine::new(&mut world, &mut scene);
        let mut session = AdventureSession::new(Tuning::default());
        session.tick(&mut engine, SIM_DT);
        assert_eq!(session.frame(&mut engine, 0.1), 0);
        assert_eq!(session.stats().ticks, 0);
    }

    #[test]
    fn test_frame_stepper() {
        let mut stepper = FrameStepper::default();
        assert_eq!(stepper.advance(f32::NAN), 0);
        assert_eq!(stepper.advance(-1.0), 0);
        assert_eq!(stepper.advance(SIM_DT * 0.5), 0);
        assert_eq!(stepper.advance(SIM_DT * 0.5), 1);

        // Long frames are clamped and capped
        let mut stepper = FrameStepper::default();
        assert_eq!(stepper.advance(5.0), MAX_SUBSTEPS);

        let mut stepper = FrameStepper::default();
        let total: u32 = (0..60).map(|_| stepper.advance(1.0 / 60.0)).sum();
        assert!((119..=121).contains(&total), "{total}");
    }
}
