//! Iron Paw Survival - survival-combat simulation core
//!
//! Core modules:
//! - `sim`: Tick-driven simulation (spawning, weapons, collisions, progression)
//! - `camera`: World-to-screen mapping for the rendering collaborator
//! - `tuning`: Data-driven game balance
//! - `web`: Browser host adapter (wasm32 only)

pub mod camera;
pub mod sim;
pub mod tuning;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use camera::Camera;
pub use tuning::{Tuning, TuningError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Nominal simulation timestep in milliseconds (60 Hz)
    pub const SIM_DT_MS: f32 = 1000.0 / 60.0;
    /// Largest delta a single tick will integrate (host hitches are clamped)
    pub const MAX_DT_MS: f32 = 100.0;

    /// Collision radii (circle overlap only, not hitbox-accurate)
    pub const PLAYER_RADIUS: f32 = 18.0;
    pub const PROJECTILE_RADIUS: f32 = 6.0;
    /// Gems closer than this to the player are consumed
    pub const GEM_PICKUP_RADIUS: f32 = 24.0;

    /// Gem pull speed inside the magnet radius (units/s)
    pub const GEM_PULL_SPEED: f32 = 320.0;
    /// Gems left this far behind the player despawn
    pub const GEM_DESPAWN_DISTANCE: f32 = 1600.0;
    pub const MAX_GEMS: usize = 400;

    /// Projectiles farther than this from the player are off-field
    pub const PROJECTILE_CULL_DISTANCE: f32 = 900.0;

    /// Damage number feedback
    pub const DAMAGE_NUMBER_TICKS: u32 = 40;
    pub const DAMAGE_NUMBER_RISE: f32 = 0.6;
    pub const MAX_DAMAGE_NUMBERS: usize = 96;

    /// Walk-cycle speed (radians per second of movement)
    pub const ANIM_RATE: f32 = 10.0;

    /// Visible play field (the camera collaborator's default viewport)
    pub const VIEWPORT_WIDTH: f32 = 960.0;
    pub const VIEWPORT_HEIGHT: f32 = 640.0;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Heading of a vector in radians (0 for the zero vector)
#[inline]
pub fn angle_of(v: Vec2) -> f32 {
    if v == Vec2::ZERO { 0.0 } else { v.y.atan2(v.x) }
}

/// Unit vector from `from` toward `to`, or zero when the points coincide
#[inline]
pub fn direction_to(from: Vec2, to: Vec2) -> Vec2 {
    (to - from).normalize_or_zero()
}

/// Circle-overlap test
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    let r = ra + rb;
    a.distance_squared(b) < r * r
}
