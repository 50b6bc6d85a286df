//! World state and core simulation types
//!
//! Everything the rendering collaborator reads after a tick lives in [`World`].
//! The RNG and tuning are owned by the simulation, not the world, so a
//! snapshot is plain data.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::weapon::{Orbital, Weapon, WeaponKind};
use crate::consts::*;
use crate::tuning::Tuning;

/// Current phase of a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Created but not started
    Idle,
    /// Active gameplay
    Running,
    /// Paused by the host
    Paused,
    /// Waiting for the player to pick one of the offered upgrades
    LevelUpPaused { choices: Vec<WeaponKind> },
    /// Run ended (terminal)
    Ended { won: bool },
}

impl GamePhase {
    pub fn is_running(&self) -> bool {
        matches!(self, GamePhase::Running)
    }

    pub fn is_ended(&self) -> bool {
        matches!(self, GamePhase::Ended { .. })
    }
}

/// Outbound notifications for the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    /// Player gained a level and must pick one of `choices` (never empty).
    /// Level-ups with nothing left to offer are silent.
    LevelUp {
        level: u32,
        weapons: Vec<Weapon>,
        choices: Vec<WeaponKind>,
    },
    /// Run ended; the host submits the score to its persistence collaborator
    GameOver {
        won: bool,
        score: u64,
        kills: u32,
        elapsed_ms: f64,
    },
}

/// Enemy archetypes, weakest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    Rat,
    Cat,
    Hound,
}

/// The player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub hp: f32,
    pub max_hp: f32,
    pub level: u32,
    pub exp: u32,
    pub exp_to_next: u32,
    /// Derived from the Swiftness passive
    pub move_speed: f32,
    /// Derived from the Magnetism passive
    pub magnet_radius: f32,
    /// Heading of the last movement (radians)
    pub facing: f32,
    /// Walk cycle phase (radians, advances only while moving)
    pub anim_phase: f32,
    /// Owned weapons and passives; the only state upgrades mutate
    pub weapons: Vec<Weapon>,
}

impl Player {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            pos: Vec2::ZERO,
            hp: tuning.player_max_hp,
            max_hp: tuning.player_max_hp,
            level: 1,
            exp: 0,
            exp_to_next: tuning.first_level_exp,
            move_speed: tuning.player_speed,
            magnet_radius: tuning.magnet_base_radius,
            facing: 0.0,
            anim_phase: 0.0,
            weapons: vec![Weapon::new(WeaponKind::PawBolt, 0.0)],
        }
    }

    /// Level of an owned weapon, 0 if not owned
    pub fn weapon_level(&self, kind: WeaponKind) -> u32 {
        self.weapons
            .iter()
            .find(|w| w.kind == kind)
            .map(|w| w.level)
            .unwrap_or(0)
    }
}

/// An enemy entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    pub pos: Vec2,
    pub hp: f32,
    pub max_hp: f32,
    /// Contact damage per tick
    pub strength: f32,
    pub speed: f32,
    pub radius: f32,
    /// Experience in the gem dropped on death
    pub gem_value: u32,
    pub facing: f32,
    pub anim_phase: f32,
}

/// A projectile entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub kind: WeaponKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub damage: f32,
    /// Hits left before removal
    pub piercing: u32,
    /// Ticks until expiry (None = lives until culled)
    pub lifetime: Option<u32>,
    /// Enemy this strike is locked onto. Targeted projectiles only hit that
    /// enemy and vanish once it is gone.
    #[serde(default)]
    pub target: Option<u32>,
}

/// Experience gem
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Gem {
    pub id: u32,
    pub pos: Vec2,
    pub value: u32,
}

/// Area-denial puddle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AreaEffect {
    pub id: u32,
    pub pos: Vec2,
    /// Ticks remaining
    pub duration: u32,
    /// Damage per tick to every enemy inside
    pub damage: f32,
    pub radius: f32,
}

/// Floating damage feedback (no gameplay effect)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DamageNumber {
    pub pos: Vec2,
    pub value: f32,
    pub ticks_left: u32,
}

/// Complete run state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    /// Elapsed run time (ms)
    pub time_ms: f64,
    /// Executed ticks
    pub tick_count: u64,
    pub phase: GamePhase,
    pub score: u64,
    pub kills: u32,
    pub player: Player,
    /// Active entities (sorted by id)
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    pub gems: Vec<Gem>,
    pub puddles: Vec<AreaEffect>,
    /// Derived from `player.weapons` every tick
    pub orbitals: Vec<Orbital>,
    pub damage_numbers: Vec<DamageNumber>,
    /// Next entity ID
    next_id: u32,
}

impl World {
    /// Fresh world with the player at the origin
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            time_ms: 0.0,
            tick_count: 0,
            phase: GamePhase::Idle,
            score: 0,
            kills: 0,
            player: Player::new(tuning),
            enemies: Vec::new(),
            projectiles: Vec::new(),
            gems: Vec::new(),
            puddles: Vec::new(),
            orbitals: Vec::new(),
            damage_numbers: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Elapsed run time in minutes
    pub fn elapsed_minutes(&self) -> f32 {
        (self.time_ms / 60_000.0) as f32
    }

    /// Spawn a gem
    pub fn drop_gem(&mut self, pos: Vec2, value: u32) {
        let id = self.next_entity_id();
        self.gems.push(Gem { id, pos, value });
        if self.gems.len() > MAX_GEMS {
            self.gems.remove(0);
        }
    }

    /// Emit a damage number, dropping the oldest when full
    pub fn push_damage_number(&mut self, pos: Vec2, value: f32) {
        if self.damage_numbers.len() >= MAX_DAMAGE_NUMBERS {
            self.damage_numbers.remove(0);
        }
        self.damage_numbers.push(DamageNumber {
            pos,
            value,
            ticks_left: DAMAGE_NUMBER_TICKS,
        });
    }
}
