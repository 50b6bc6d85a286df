//! Browser host adapter
//!
//! The page owns the render loop and input handling; it drives the core
//! through [`SurvivalGame`] and reads JSON snapshots back.

use glam::Vec2;
use wasm_bindgen::prelude::*;

use crate::consts::SIM_DT_MS;
use crate::sim::{GamePhase, Simulation, TickInput, WeaponKind};
use crate::tuning::Tuning;

/// Max fixed steps per animation frame
const MAX_SUBSTEPS: u32 = 6;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::warn_1(&format!("Logger already set: {e}").into());
    }
    log::info!("Iron Paw Survival core loaded");
}

#[wasm_bindgen]
pub struct SurvivalGame {
    sim: Simulation,
    input: TickInput,
    accumulator: f32,
}

#[wasm_bindgen]
impl SurvivalGame {
    /// New game seeded from the clock, with stored tuning overrides
    #[wasm_bindgen(constructor)]
    pub fn new() -> SurvivalGame {
        let seed = js_sys::Date::now() as u64;
        Self {
            sim: Simulation::new(seed, Tuning::load()),
            input: TickInput::default(),
            accumulator: 0.0,
        }
    }

    pub fn start(&mut self) {
        let seed = js_sys::Date::now() as u64;
        self.sim.restart(seed);
        self.input = TickInput::default();
        self.accumulator = 0.0;
    }

    /// One simulation step
    pub fn tick(&mut self, dt_ms: f32) {
        self.sim.set_input(self.input.clone());
        self.sim.tick(dt_ms);
    }

    /// Run as many fixed steps as `elapsed_ms` covers
    pub fn frame(&mut self, elapsed_ms: f32) {
        self.accumulator += elapsed_ms.min(100.0);
        let mut substeps = 0;
        while self.accumulator >= SIM_DT_MS && substeps < MAX_SUBSTEPS {
            self.tick(SIM_DT_MS);
            self.accumulator -= SIM_DT_MS;
            substeps += 1;
        }
        // Drop the backlog rather than spiral
        if substeps == MAX_SUBSTEPS {
            self.accumulator = 0.0;
        }
    }

    pub fn pause(&mut self) {
        self.sim.pause();
    }

    pub fn resume(&mut self) {
        self.sim.resume();
    }

    pub fn set_direction(&mut self, x: f32, y: f32) {
        self.input.direction = Vec2::new(x, y);
    }

    pub fn set_idle_mode(&mut self, idle: bool) {
        self.input.idle_mode = idle;
    }

    /// Pick an offered upgrade by its snake_case name
    pub fn choose_upgrade(&mut self, name: &str) -> bool {
        match WeaponKind::from_name(name) {
            Some(kind) => self.sim.choose_upgrade(kind),
            None => {
                log::warn!("Unknown upgrade: {}", name);
                false
            }
        }
    }

    /// World snapshot as JSON (empty string on failure)
    pub fn snapshot_json(&self) -> String {
        serde_json::to_string(self.sim.world()).unwrap_or_else(|e| {
            log::error!("Snapshot failed: {}", e);
            String::new()
        })
    }

    /// Pending events as a JSON array
    pub fn drain_events_json(&mut self) -> String {
        let events = self.sim.drain_events();
        serde_json::to_string(&events).unwrap_or_else(|e| {
            log::error!("Event serialization failed: {}", e);
            "[]".to_string()
        })
    }

    /// Phase name for the page's UI state
    pub fn phase(&self) -> String {
        match self.sim.phase() {
            GamePhase::Idle => "idle",
            GamePhase::Running => "running",
            GamePhase::Paused => "paused",
            GamePhase::LevelUpPaused { .. } => "level_up",
            GamePhase::Ended { won: true } => "won",
            GamePhase::Ended { won: false } => "lost",
        }
        .to_string()
    }
}

impl Default for SurvivalGame {
    fn default() -> Self {
        Self::new()
    }
}
