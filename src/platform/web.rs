//! Browser bindings
//!
//! Runs a session on the rapier backend so a page can drive the simulation
//! and read ball positions; the page owns rendering.

use wasm_bindgen::prelude::*;

use crate::Tuning;
use crate::adventure::{AdventureSession, LevelSpec, builtin, display_name};
use crate::engine::{Engine, HeadlessScene, PhysicsWorld, RapierWorld};

#[wasm_bindgen]
pub struct WebAdventure {
    world: RapierWorld,
    scene: HeadlessScene,
    session: AdventureSession,
}

#[wasm_bindgen]
impl WebAdventure {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        let tuning = Tuning::default();
        Self {
            world: RapierWorld::new(tuning.gravity_vector()),
            scene: HeadlessScene::new(),
            session: AdventureSession::new(tuning),
        }
    }

    /// Start a built-in level by name
    pub fn start_builtin(&mut self, name: &str) -> Result<bool, JsValue> {
        let level = builtin(name).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(self.start(&level))
    }

    /// Start a level from its JSON description
    pub fn start_json(&mut self, json: &str) -> Result<bool, JsValue> {
        let level = LevelSpec::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(self.start(&level))
    }

    /// Advance by one rendered frame (seconds); returns fixed steps run
    pub fn frame(&mut self, dt: f32) -> u32 {
        let mut engine = Engine::new(&mut self.world, &mut self.scene);
        self.session.frame(&mut engine, dt)
    }

    /// End the current track and start the next built-in; returns its HUD name
    pub fn next_level(&mut self) -> Option<String> {
        let mut engine = Engine::new(&mut self.world, &mut self.scene);
        self.session.next_level(&mut engine).map(display_name)
    }

    pub fn level_name(&self) -> Option<String> {
        self.session.level_name().map(display_name)
    }

    pub fn end(&mut self) {
        let mut engine = Engine::new(&mut self.world, &mut self.scene);
        self.session.end(&mut engine);
    }

    /// Flat `[x, y, z, x, y, z, ...]` ball positions
    pub fn ball_positions(&self) -> Vec<f32> {
        self.session
            .balls()
            .iter()
            .filter_map(|b| self.world.pose(b.body))
            .flat_map(|p| p.position.to_array())
            .collect()
    }

    pub fn stats_json(&self) -> String {
        serde_json::to_string(self.session.stats()).unwrap_or_default()
    }
}

impl WebAdventure {
    fn start(&mut self, level: &LevelSpec) -> bool {
        let mut engine = Engine::new(&mut self.world, &mut self.scene);
        self.session.start(&mut engine, level)
    }
}

impl Default for WebAdventure {
    fn default() -> Self {
        Self::new()
    }
}
