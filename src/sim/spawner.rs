//! Enemy spawning
//!
//! Spawn odds rise with elapsed time, the archetype mix widens with player
//! level, and enemy stats ramp with elapsed minutes.

use rand::Rng;
use std::f32::consts::TAU;

use super::state::{Enemy, EnemyKind, World};
use crate::polar_to_cartesian;
use crate::tuning::Tuning;

/// Maximum concurrent enemies for a player level
pub fn population_cap(level: u32, tuning: &Tuning) -> usize {
    (tuning.population_base + level as usize * tuning.population_per_level)
        .min(tuning.population_max)
}

/// Spawn chance per tick is `1 / spawn_odds`
pub fn spawn_odds(elapsed_ms: f64, tuning: &Tuning) -> u32 {
    let minutes = (elapsed_ms / 60_000.0).floor() as u32;
    tuning
        .spawn_odds_start
        .saturating_sub(minutes.saturating_mul(tuning.spawn_odds_step))
        .max(tuning.spawn_odds_floor)
}

/// hp/strength multiplier for enemies spawned at `elapsed_ms`
pub fn difficulty_multiplier(elapsed_ms: f64, tuning: &Tuning) -> f32 {
    1.0 + (elapsed_ms / 60_000.0) as f32 * tuning.difficulty_per_minute
}

/// Archetype mix by player level
pub fn pick_kind<R: Rng + ?Sized>(level: u32, rng: &mut R) -> EnemyKind {
    if level < 5 {
        EnemyKind::Rat
    } else if level <= 10 {
        if rng.random_bool(0.5) {
            EnemyKind::Rat
        } else {
            EnemyKind::Cat
        }
    } else {
        match rng.random_range(0..3) {
            0 => EnemyKind::Rat,
            1 => EnemyKind::Cat,
            _ => EnemyKind::Hound,
        }
    }
}

/// Build an enemy of `kind` on the spawn ring around the player
pub fn make_enemy<R: Rng + ?Sized>(
    world: &mut World,
    kind: EnemyKind,
    tuning: &Tuning,
    rng: &mut R,
) -> Enemy {
    let stats = tuning.enemy(kind);
    let scale = difficulty_multiplier(world.time_ms, tuning);
    let angle = rng.random_range(0.0..TAU);
    let pos = world.player.pos + polar_to_cartesian(tuning.spawn_radius, angle);
    let hp = stats.hp * scale;

    Enemy {
        id: world.next_entity_id(),
        kind,
        pos,
        hp,
        max_hp: hp,
        strength: stats.strength * scale,
        speed: stats.speed,
        radius: stats.radius,
        gem_value: stats.gem_value,
        // Face the player
        facing: crate::normalize_angle(angle + std::f32::consts::PI),
        anim_phase: rng.random_range(0.0..TAU),
    }
}

/// Maybe add one enemy this tick. Returns the new enemy's id.
///
/// Attempts at the population cap are dropped, never queued.
pub fn spawn_tick<R: Rng + ?Sized>(world: &mut World, tuning: &Tuning, rng: &mut R) -> Option<u32> {
    if world.enemies.len() >= population_cap(world.player.level, tuning) {
        return None;
    }
    if rng.random_range(0..spawn_odds(world.time_ms, tuning)) != 0 {
        return None;
    }

    let kind = pick_kind(world.player.level, rng);
    let enemy = make_enemy(world, kind, tuning, rng);
    let id = enemy.id;
    log::debug!("Spawned {:?} #{} at {:?}", kind, id, enemy.pos);
    world.enemies.push(enemy);
    Some(id)
}
