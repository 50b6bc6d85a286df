//! Weapon archetypes, upgrades, and firing
//!
//! Weapons fire independently once their cooldown has elapsed. Passives share
//! the same level/choice mechanism but never fire; their effect is applied to
//! the player's derived stats by the progression controller.

use glam::Vec2;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

use super::state::{AreaEffect, Enemy, Projectile, World};
use crate::{direction_to, normalize_angle, polar_to_cartesian};

/// Level cap for weapons that act in the world
pub const MAX_ACTIVE_LEVEL: u32 = 10;
/// Level cap for stat passives
pub const MAX_PASSIVE_LEVEL: u32 = 5;
/// Upgrade options offered per level-up
pub const CHOICES_PER_LEVEL: usize = 3;

/// Seeking bolt tuning
pub const MAX_BOLTS: u32 = 8;
pub const BOLT_SPEED: f32 = 420.0;
pub const BOLT_LIFETIME_TICKS: u32 = 150;

/// Burst strike tuning
pub const MAX_BURST_TARGETS: u32 = 6;
pub const BURST_LIFETIME_TICKS: u32 = 8;

/// Puddle tuning
pub const PUDDLE_DURATION_TICKS: u32 = 240;

/// Weapon and passive archetypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponKind {
    /// Seeking bolt
    PawBolt,
    /// Burst strike on the nearest enemies
    ThunderClaw,
    /// Area denial puddle
    HotPuddle,
    /// Melee orbital
    ClawRing,
    /// Elemental orbital
    EmberOrb,
    /// Max HP passive
    Vitality,
    /// Move speed passive
    Swiftness,
    /// Pickup radius passive
    Magnetism,
}

/// How an archetype acts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeaponClass {
    Seeking,
    Burst,
    Area,
    Orbital,
    Passive,
}

impl WeaponKind {
    pub const ALL: [WeaponKind; 8] = [
        WeaponKind::PawBolt,
        WeaponKind::ThunderClaw,
        WeaponKind::HotPuddle,
        WeaponKind::ClawRing,
        WeaponKind::EmberOrb,
        WeaponKind::Vitality,
        WeaponKind::Swiftness,
        WeaponKind::Magnetism,
    ];

    pub fn class(self) -> WeaponClass {
        match self {
            WeaponKind::PawBolt => WeaponClass::Seeking,
            WeaponKind::ThunderClaw => WeaponClass::Burst,
            WeaponKind::HotPuddle => WeaponClass::Area,
            WeaponKind::ClawRing | WeaponKind::EmberOrb => WeaponClass::Orbital,
            WeaponKind::Vitality | WeaponKind::Swiftness | WeaponKind::Magnetism => {
                WeaponClass::Passive
            }
        }
    }

    pub fn is_passive(self) -> bool {
        self.class() == WeaponClass::Passive
    }

    pub fn is_orbital(self) -> bool {
        self.class() == WeaponClass::Orbital
    }

    pub fn max_level(self) -> u32 {
        if self.is_passive() {
            MAX_PASSIVE_LEVEL
        } else {
            MAX_ACTIVE_LEVEL
        }
    }

    /// Stable identifier used by hosts
    pub fn name(self) -> &'static str {
        match self {
            WeaponKind::PawBolt => "paw_bolt",
            WeaponKind::ThunderClaw => "thunder_claw",
            WeaponKind::HotPuddle => "hot_puddle",
            WeaponKind::ClawRing => "claw_ring",
            WeaponKind::EmberOrb => "ember_orb",
            WeaponKind::Vitality => "vitality",
            WeaponKind::Swiftness => "swiftness",
            WeaponKind::Magnetism => "magnetism",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }

    /// Cooldown at level 1 (0 for archetypes that never fire)
    pub fn base_cooldown_ms(self) -> f64 {
        match self {
            WeaponKind::PawBolt => 1000.0,
            WeaponKind::ThunderClaw => 1800.0,
            WeaponKind::HotPuddle => 3000.0,
            _ => 0.0,
        }
    }

    fn cooldown_step_ms(self) -> f64 {
        match self {
            WeaponKind::PawBolt => 80.0,
            WeaponKind::ThunderClaw => 120.0,
            WeaponKind::HotPuddle => 200.0,
            _ => 0.0,
        }
    }

    fn min_cooldown_ms(self) -> f64 {
        match self {
            WeaponKind::PawBolt => 250.0,
            WeaponKind::ThunderClaw => 600.0,
            WeaponKind::HotPuddle => 1200.0,
            _ => 0.0,
        }
    }

    /// Damage per hit (projectiles) or per tick (puddles, orbitals)
    pub fn damage(self, level: u32) -> f32 {
        let l = level.saturating_sub(1) as f32;
        match self {
            WeaponKind::PawBolt => 10.0 + 2.0 * l,
            WeaponKind::ThunderClaw => 14.0 + 3.0 * l,
            WeaponKind::HotPuddle => 0.5 + 0.25 * l,
            WeaponKind::ClawRing => 4.0 + 1.5 * l,
            WeaponKind::EmberOrb => 0.4 + 0.15 * l,
            _ => 0.0,
        }
    }

    /// Orbit distance from the player
    pub fn orbit_radius(self) -> f32 {
        match self {
            WeaponKind::ClawRing => 80.0,
            WeaponKind::EmberOrb => 115.0,
            _ => 0.0,
        }
    }

    /// Angular speed in radians per tick
    pub fn orbit_speed(self) -> f32 {
        match self {
            WeaponKind::ClawRing => 0.09,
            WeaponKind::EmberOrb => 0.035,
            _ => 0.0,
        }
    }

    /// Contact radius around the orbital's position
    pub fn orbit_hit_radius(self) -> f32 {
        match self {
            WeaponKind::ClawRing => 26.0,
            WeaponKind::EmberOrb => 40.0,
            _ => 0.0,
        }
    }

    fn orbit_start_angle(self) -> f32 {
        match self {
            WeaponKind::EmberOrb => PI,
            _ => 0.0,
        }
    }
}

/// An owned weapon or passive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weapon {
    pub kind: WeaponKind,
    pub level: u32,
    pub cooldown_ms: f64,
    pub last_fired_ms: f64,
}

impl Weapon {
    pub fn new(kind: WeaponKind, now_ms: f64) -> Self {
        Self {
            kind,
            level: 1,
            cooldown_ms: kind.base_cooldown_ms(),
            last_fired_ms: now_ms,
        }
    }

    pub fn is_maxed(&self) -> bool {
        self.level >= self.kind.max_level()
    }

    /// Whether this weapon fires at `now_ms`
    pub fn is_ready(&self, now_ms: f64) -> bool {
        match self.kind.class() {
            WeaponClass::Orbital | WeaponClass::Passive => false,
            _ => now_ms - self.last_fired_ms >= self.cooldown_ms,
        }
    }

    fn level_up(&mut self) -> bool {
        if self.is_maxed() {
            return false;
        }
        self.level += 1;
        if self.kind.cooldown_step_ms() > 0.0 {
            self.cooldown_ms =
                (self.cooldown_ms - self.kind.cooldown_step_ms()).max(self.kind.min_cooldown_ms());
        }
        true
    }
}

/// A weapon-derived entity circling the player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Orbital {
    pub kind: WeaponKind,
    pub angle: f32,
    pub radius: f32,
    /// Damage per tick to every enemy in contact
    pub damage: f32,
}

impl Orbital {
    /// World position around `center`
    pub fn position(&self, center: Vec2) -> Vec2 {
        center + polar_to_cartesian(self.radius, self.angle)
    }
}

/// Level `kind` up, inserting it at level 1 when not owned.
///
/// Returns false (and changes nothing) when the weapon is already maxed.
pub fn upgrade_weapon(weapons: &mut Vec<Weapon>, kind: WeaponKind, now_ms: f64) -> bool {
    match weapons.iter_mut().find(|w| w.kind == kind) {
        Some(weapon) => weapon.level_up(),
        None => {
            log::debug!("New weapon: {}", kind.name());
            weapons.push(Weapon::new(kind, now_ms));
            true
        }
    }
}

/// Pick up to three distinct archetypes that can still level
pub fn upgrade_choices<R: Rng + ?Sized>(weapons: &[Weapon], rng: &mut R) -> Vec<WeaponKind> {
    let mut pool: Vec<WeaponKind> = WeaponKind::ALL
        .into_iter()
        .filter(|kind| {
            weapons
                .iter()
                .find(|w| w.kind == *kind)
                .is_none_or(|w| !w.is_maxed())
        })
        .collect();
    pool.shuffle(rng);
    pool.truncate(CHOICES_PER_LEVEL);
    pool
}

/// One orbital per owned orbital-class weapon.
///
/// Angles carry over from `previous` by archetype; new orbitals start at the
/// archetype's start angle. Radius and damage always follow the weapon level.
pub fn derive_orbitals(weapons: &[Weapon], previous: &[Orbital]) -> Vec<Orbital> {
    weapons
        .iter()
        .filter(|w| w.kind.is_orbital())
        .map(|w| {
            let angle = previous
                .iter()
                .find(|o| o.kind == w.kind)
                .map(|o| o.angle)
                .unwrap_or_else(|| w.kind.orbit_start_angle());
            Orbital {
                kind: w.kind,
                angle,
                radius: w.kind.orbit_radius(),
                damage: w.kind.damage(w.level),
            }
        })
        .collect()
}

/// Spin every orbital by its archetype's angular speed
pub fn advance_orbitals(orbitals: &mut [Orbital]) {
    for orbital in orbitals {
        orbital.angle = normalize_angle(orbital.angle + orbital.kind.orbit_speed());
    }
}

/// Enemy indices ordered nearest-first (ties broken by id)
pub fn nearest_enemies(enemies: &[Enemy], from: Vec2) -> Vec<usize> {
    let mut ranked: Vec<(f32, u32, usize)> = enemies
        .iter()
        .enumerate()
        .map(|(i, e)| (e.pos.distance_squared(from), e.id, i))
        .collect();
    ranked.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
    ranked.into_iter().map(|(_, _, i)| i).collect()
}

/// Run the weapon system for one tick
pub fn fire_weapons(world: &mut World) {
    world.orbitals = derive_orbitals(&world.player.weapons, &world.orbitals);
    advance_orbitals(&mut world.orbitals);

    let now = world.time_ms;
    let origin = world.player.pos;
    let fallback_dir = polar_to_cartesian(1.0, world.player.facing);
    let ranked = nearest_enemies(&world.enemies, origin);

    let mut projectiles: Vec<Projectile> = Vec::new();
    let mut puddles: Vec<AreaEffect> = Vec::new();

    for weapon in world.player.weapons.iter_mut() {
        if !weapon.is_ready(now) {
            continue;
        }
        // A miss still consumes the cooldown
        weapon.last_fired_ms = now;
        let damage = weapon.kind.damage(weapon.level);

        match weapon.kind.class() {
            WeaponClass::Seeking => {
                if ranked.is_empty() {
                    continue;
                }
                let bolts = weapon.level.min(MAX_BOLTS) as usize;
                let piercing = 1 + (weapon.level - 1) / 3;
                for i in 0..bolts {
                    let target = &world.enemies[ranked[i % ranked.len()]];
                    let mut dir = direction_to(origin, target.pos);
                    if dir == Vec2::ZERO {
                        dir = fallback_dir;
                    }
                    projectiles.push(Projectile {
                        id: 0,
                        kind: weapon.kind,
                        pos: origin,
                        vel: dir * BOLT_SPEED,
                        damage,
                        piercing,
                        lifetime: Some(BOLT_LIFETIME_TICKS),
                        target: None,
                    });
                }
            }
            WeaponClass::Burst => {
                let targets = (weapon.level + 1).min(MAX_BURST_TARGETS) as usize;
                for &idx in ranked.iter().take(targets) {
                    let target = &world.enemies[idx];
                    projectiles.push(Projectile {
                        id: 0,
                        kind: weapon.kind,
                        pos: target.pos,
                        vel: Vec2::ZERO,
                        damage,
                        piercing: 1,
                        lifetime: Some(BURST_LIFETIME_TICKS),
                        target: Some(target.id),
                    });
                }
            }
            WeaponClass::Area => {
                puddles.push(AreaEffect {
                    id: 0,
                    pos: origin,
                    duration: PUDDLE_DURATION_TICKS,
                    damage,
                    radius: 55.0 + 5.0 * (weapon.level - 1) as f32,
                });
            }
            WeaponClass::Orbital | WeaponClass::Passive => {}
        }
    }

    for mut projectile in projectiles {
        projectile.id = world.next_entity_id();
        world.projectiles.push(projectile);
    }
    for mut puddle in puddles {
        puddle.id = world.next_entity_id();
        world.puddles.push(puddle);
    }
}
