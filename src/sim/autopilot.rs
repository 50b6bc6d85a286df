//! Idle/demo mode steering
//!
//! Kites away from nearby enemies and drifts toward the nearest gem when the
//! coast is clear. Good enough for attract mode and the headless runner.

use glam::Vec2;

use super::state::World;

/// Enemies inside this radius push the autopilot away
const THREAT_RADIUS: f32 = 220.0;
/// Below this the autopilot ignores gems and just runs
const PANIC_RADIUS: f32 = 90.0;

/// Movement intent for this tick (unit length or zero)
pub fn steer(world: &World) -> Vec2 {
    let me = world.player.pos;

    let mut flee = Vec2::ZERO;
    let mut closest = f32::MAX;
    for enemy in &world.enemies {
        let away = me - enemy.pos;
        let dist = away.length();
        closest = closest.min(dist);
        if dist < THREAT_RADIUS {
            // Closer enemies weigh more; coincident ones push along +x
            let dir = if dist > 0.001 { away / dist } else { Vec2::X };
            flee += dir * (1.0 - dist / THREAT_RADIUS);
        }
    }

    if closest < PANIC_RADIUS {
        return flee.normalize_or_zero();
    }

    let gem = world
        .gems
        .iter()
        .min_by(|a, b| a.pos.distance_squared(me).total_cmp(&b.pos.distance_squared(me)));

    let seek = gem.map_or(Vec2::ZERO, |g| (g.pos - me).normalize_or_zero());
    (flee * 2.0 + seek).normalize_or_zero()
}
