//! Data-driven game balance
//!
//! Every number a designer might want to tweak between builds lives here.
//! Persisted separately from runs: a JSON file for the native runner, and
//! LocalStorage on the web.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::EnemyKind;

/// Errors raised while loading or validating a [`Tuning`]
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("invalid tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read tuning file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("tuning value `{field}` out of range: {value}")]
    OutOfRange { field: &'static str, value: f32 },
}

/// Base stats for one enemy archetype (before the difficulty ramp)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnemyStats {
    pub hp: f32,
    /// Contact damage dealt to the player per tick of contact
    pub strength: f32,
    /// Movement speed (units/s)
    pub speed: f32,
    /// Collision radius
    pub radius: f32,
    /// Experience carried by the gem it drops
    pub gem_value: u32,
}

/// Game balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Player ===
    pub player_max_hp: f32,
    /// Base movement speed (units/s)
    pub player_speed: f32,
    /// Experience needed for the first level-up
    pub first_level_exp: u32,
    /// `exp_to_next` multiplier applied at every level-up
    pub exp_growth: f32,

    // === Passives ===
    pub vitality_hp_per_level: f32,
    /// Fractional speed bonus per Swiftness level
    pub swiftness_per_level: f32,
    pub magnet_base_radius: f32,
    pub magnet_radius_per_level: f32,

    // === Spawner ===
    /// Distance from the player where enemies appear (off the visible field)
    pub spawn_radius: f32,
    pub population_base: usize,
    pub population_per_level: usize,
    pub population_max: usize,
    /// Spawn roll is 1 in `max(floor, start - minutes * step)`
    pub spawn_odds_start: u32,
    pub spawn_odds_step: u32,
    pub spawn_odds_floor: u32,
    /// hp/strength multiplier growth per elapsed minute
    pub difficulty_per_minute: f32,

    pub rat: EnemyStats,
    pub cat: EnemyStats,
    pub hound: EnemyStats,

    // === Run ===
    /// Surviving this long wins the run
    pub victory_ms: f64,
    pub victory_bonus: u64,
    pub score_per_kill: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player_max_hp: 100.0,
            player_speed: 180.0,
            first_level_exp: 5,
            exp_growth: 1.5,

            vitality_hp_per_level: 20.0,
            swiftness_per_level: 0.1,
            magnet_base_radius: 200.0,
            magnet_radius_per_level: 40.0,

            spawn_radius: 620.0,
            population_base: 50,
            population_per_level: 5,
            population_max: 200,
            spawn_odds_start: 30,
            spawn_odds_step: 2,
            spawn_odds_floor: 5,
            difficulty_per_minute: 0.15,

            rat: EnemyStats {
                hp: 10.0,
                strength: 1.0,
                speed: 70.0,
                radius: 14.0,
                gem_value: 1,
            },
            cat: EnemyStats {
                hp: 24.0,
                strength: 2.0,
                speed: 95.0,
                radius: 16.0,
                gem_value: 2,
            },
            hound: EnemyStats {
                hp: 60.0,
                strength: 4.0,
                speed: 55.0,
                radius: 22.0,
                gem_value: 5,
            },

            victory_ms: 10.0 * 60_000.0,
            victory_bonus: 10_000,
            score_per_kill: 1,
        }
    }
}

impl Tuning {
    /// Base stats for an archetype
    pub fn enemy(&self, kind: EnemyKind) -> &EnemyStats {
        match kind {
            EnemyKind::Rat => &self.rat,
            EnemyKind::Cat => &self.cat,
            EnemyKind::Hound => &self.hound,
        }
    }

    /// Parse and validate a tuning document. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Read a tuning document from disk (native runner)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_file(path: &str) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path).map_err(|source| TuningError::Io {
            path: path.to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Reject values that would stall or break the simulation
    pub fn validate(&self) -> Result<(), TuningError> {
        let positive = [
            ("player_max_hp", self.player_max_hp),
            ("player_speed", self.player_speed),
            ("spawn_radius", self.spawn_radius),
            ("victory_ms", self.victory_ms as f32),
        ];
        for (field, value) in positive {
            if !(value > 0.0) {
                return Err(TuningError::OutOfRange { field, value });
            }
        }
        if self.exp_growth < 1.0 {
            return Err(TuningError::OutOfRange {
                field: "exp_growth",
                value: self.exp_growth,
            });
        }
        if self.first_level_exp == 0 {
            return Err(TuningError::OutOfRange {
                field: "first_level_exp",
                value: 0.0,
            });
        }
        if self.spawn_odds_floor == 0 {
            return Err(TuningError::OutOfRange {
                field: "spawn_odds_floor",
                value: 0.0,
            });
        }
        for (field, stats) in [("rat", &self.rat), ("cat", &self.cat), ("hound", &self.hound)] {
            if !(stats.hp > 0.0) || stats.radius < 0.0 {
                return Err(TuningError::OutOfRange {
                    field,
                    value: stats.hp,
                });
            }
        }
        Ok(())
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "iron_paw_tuning";

    /// Load tuning overrides from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(tuning) => {
                        log::info!("Loaded tuning overrides from LocalStorage");
                        return tuning;
                    }
                    Err(e) => log::warn!("Ignoring stored tuning: {}", e),
                }
            }
        }

        log::info!("Using default tuning");
        Self::default()
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}
