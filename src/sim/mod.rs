//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only, owned by [`Simulation`]
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod progression;
pub mod spawner;
pub mod state;
pub mod tick;
pub mod weapon;

pub use collision::ContactResult;
pub use state::{
    AreaEffect, DamageNumber, Enemy, EnemyKind, GamePhase, Gem, Player, Projectile, SimEvent,
    World,
};
pub use tick::{Simulation, TickInput, tick};
pub use weapon::{Orbital, Weapon, WeaponClass, WeaponKind, derive_orbitals};
