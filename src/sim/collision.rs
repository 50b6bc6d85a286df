//! Collision detection and damage resolution
//!
//! Everything is circle overlap. Passes run in a fixed order each tick:
//! projectiles, orbitals, puddles, player contact, gems. Enemies killed by a
//! pass are reaped before the next pass runs, so nothing at 0 hp survives the
//! tick it was reduced in.

use glam::Vec2;

use super::state::World;
use crate::circles_overlap;
use crate::consts::*;
use crate::tuning::Tuning;

/// Outcome of the player-contact pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactResult {
    /// Damage applied this tick (0 when nothing touched the player)
    pub damage: f32,
    /// Player hp reached 0
    pub fatal: bool,
}

/// Run every collision pass. Returns true when the player died.
pub fn resolve(world: &mut World, tuning: &Tuning, dt: f32) -> bool {
    projectile_hits(world, tuning);
    orbital_hits(world, tuning);
    area_hits(world, tuning);
    if player_contact(world).fatal {
        return true;
    }
    collect_gems(world, dt);
    false
}

/// Remove dead enemies, crediting the kill and dropping a gem for each
pub fn reap_dead(world: &mut World, tuning: &Tuning) -> u32 {
    let mut reaped = 0;
    let enemies = std::mem::take(&mut world.enemies);
    let mut survivors = Vec::with_capacity(enemies.len());
    for enemy in enemies {
        if enemy.hp > 0.0 {
            survivors.push(enemy);
            continue;
        }
        reaped += 1;
        world.kills += 1;
        world.score += tuning.score_per_kill;
        world.drop_gem(enemy.pos, enemy.gem_value);
    }
    world.enemies = survivors;
    reaped
}

/// Projectiles vs enemies: damage, piercing, removal
pub fn projectile_hits(world: &mut World, tuning: &Tuning) {
    let projectiles = std::mem::take(&mut world.projectiles);
    let mut live = Vec::with_capacity(projectiles.len());
    let mut hits: Vec<(Vec2, f32)> = Vec::new();

    for mut projectile in projectiles {
        if let Some(target) = projectile.target {
            let enemy = world
                .enemies
                .iter_mut()
                .find(|e| e.id == target && e.hp > 0.0);
            // Target already gone: the strike fizzles
            let Some(enemy) = enemy else {
                continue;
            };
            enemy.hp = (enemy.hp - projectile.damage).max(0.0);
            hits.push((enemy.pos, projectile.damage));
            projectile.piercing = projectile.piercing.saturating_sub(1);
            if projectile.piercing > 0 {
                live.push(projectile);
            }
            continue;
        }

        let mut spent = false;
        for enemy in world.enemies.iter_mut() {
            if enemy.hp <= 0.0 {
                continue;
            }
            if !circles_overlap(projectile.pos, PROJECTILE_RADIUS, enemy.pos, enemy.radius) {
                continue;
            }
            enemy.hp = (enemy.hp - projectile.damage).max(0.0);
            hits.push((enemy.pos, projectile.damage));
            projectile.piercing = projectile.piercing.saturating_sub(1);
            if projectile.piercing == 0 {
                spent = true;
                break;
            }
        }
        if !spent {
            live.push(projectile);
        }
    }
    world.projectiles = live;

    for (pos, value) in hits {
        world.push_damage_number(pos, value);
    }
    reap_dead(world, tuning);
}

/// Orbitals vs enemies: continuous damage every tick in range
pub fn orbital_hits(world: &mut World, tuning: &Tuning) {
    let center = world.player.pos;
    for orbital in &world.orbitals {
        let pos = orbital.position(center);
        let reach = orbital.kind.orbit_hit_radius();
        for enemy in world.enemies.iter_mut() {
            if circles_overlap(pos, reach, enemy.pos, enemy.radius) {
                enemy.hp = (enemy.hp - orbital.damage).max(0.0);
            }
        }
    }
    reap_dead(world, tuning);
}

/// Puddles vs enemies, then puddle decay
pub fn area_hits(world: &mut World, tuning: &Tuning) {
    for puddle in &world.puddles {
        for enemy in world.enemies.iter_mut() {
            if circles_overlap(puddle.pos, puddle.radius, enemy.pos, enemy.radius) {
                enemy.hp = (enemy.hp - puddle.damage).max(0.0);
            }
        }
    }
    for puddle in world.puddles.iter_mut() {
        puddle.duration = puddle.duration.saturating_sub(1);
    }
    world.puddles.retain(|p| p.duration > 0);
    reap_dead(world, tuning);
}

/// Player vs enemies. One aggregate hit per tick: the strongest enemy in
/// contact deals its strength once, however many are touching.
pub fn player_contact(world: &mut World) -> ContactResult {
    let player = &mut world.player;
    let strongest = world
        .enemies
        .iter()
        .filter(|e| circles_overlap(player.pos, PLAYER_RADIUS, e.pos, e.radius))
        .map(|e| e.strength)
        .fold(None, |acc: Option<f32>, s| Some(acc.map_or(s, |a| a.max(s))));

    let Some(damage) = strongest else {
        return ContactResult {
            damage: 0.0,
            fatal: false,
        };
    };

    player.hp = (player.hp - damage).max(0.0);
    ContactResult {
        damage,
        fatal: player.hp <= 0.0,
    }
}

/// Magnet pull, pickup, despawn.
///
/// Pickup stops as soon as a level-up threshold is crossed; remaining gems
/// wait for the next tick.
pub fn collect_gems(world: &mut World, dt: f32) {
    let player_pos = world.player.pos;
    let magnet = world.player.magnet_radius;
    let pull = GEM_PULL_SPEED * dt;

    for gem in world.gems.iter_mut() {
        let dist = gem.pos.distance(player_pos);
        if dist < magnet {
            let step = pull.min(dist);
            gem.pos += crate::direction_to(gem.pos, player_pos) * step;
        }
    }

    let gems = std::mem::take(&mut world.gems);
    let mut kept = Vec::with_capacity(gems.len());
    for gem in gems {
        let leveled = world.player.exp >= world.player.exp_to_next;
        let dist = gem.pos.distance(player_pos);
        if !leveled && dist < GEM_PICKUP_RADIUS {
            world.player.exp += gem.value;
            continue;
        }
        if dist > GEM_DESPAWN_DISTANCE {
            continue;
        }
        kept.push(gem);
    }
    world.gems = kept;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{AreaEffect, Enemy, EnemyKind, Projectile};
    use crate::sim::weapon::{Orbital, Weapon, WeaponKind, fire_weapons};

    fn spawn(world: &mut World, pos: Vec2, hp: f32, strength: f32) -> u32 {
        let id = world.next_entity_id();
        world.enemies.push(Enemy {
            id,
            kind: EnemyKind::Rat,
            pos,
            hp,
            max_hp: hp,
            strength,
            speed: 0.0,
            radius: 14.0,
            gem_value: 3,
            facing: 0.0,
            anim_phase: 0.0,
        });
        id
    }

    fn shoot(world: &mut World, pos: Vec2, damage: f32, piercing: u32) {
        let id = world.next_entity_id();
        world.projectiles.push(Projectile {
            id,
            kind: WeaponKind::PawBolt,
            pos,
            vel: Vec2::ZERO,
            damage,
            piercing,
            lifetime: None,
            target: None,
        });
    }

    #[test]
    fn test_projectile_kill_drops_gem() {
        let tuning = Tuning::default();
        let mut world = World::new(&tuning);
        let at = Vec2::new(200.0, 0.0);
        spawn(&mut world, at, 10.0, 1.0);
        shoot(&mut world, at, 10.0, 0);

        projectile_hits(&mut world, &tuning);

        assert!(world.enemies.is_empty());
        assert!(world.projectiles.is_empty());
        assert_eq!(world.gems.len(), 1);
        assert_eq!(world.gems[0].pos, at);
        assert_eq!(world.gems[0].value, 3);
        assert_eq!(world.kills, 1);
        assert_eq!(world.score, 1);
        assert_eq!(world.damage_numbers.len(), 1);
    }

    #[test]
    fn test_piercing_projectile_survives_first_hit() {
        let tuning = Tuning::default();
        let mut world = World::new(&tuning);
        let at = Vec2::new(200.0, 0.0);
        spawn(&mut world, at, 50.0, 1.0);
        spawn(&mut world, at + Vec2::new(60.0, 0.0), 50.0, 1.0);
        shoot(&mut world, at, 10.0, 2);

        projectile_hits(&mut world, &tuning);
        assert_eq!(world.projectiles.len(), 1);
        assert_eq!(world.projectiles[0].piercing, 1);
        assert_eq!(world.enemies[0].hp, 40.0);
        assert_eq!(world.enemies[1].hp, 50.0);

        // Second hit exhausts it
        world.projectiles[0].pos = at + Vec2::new(60.0, 0.0);
        projectile_hits(&mut world, &tuning);
        assert!(world.projectiles.is_empty());
        assert_eq!(world.enemies[1].hp, 40.0);
    }

    #[test]
    fn test_overkill_clamps_to_zero_and_reaps() {
        let tuning = Tuning::default();
        let mut world = World::new(&tuning);
        let at = Vec2::new(200.0, 0.0);
        spawn(&mut world, at, 5.0, 1.0);
        shoot(&mut world, at, 100.0, 1);
        shoot(&mut world, at, 100.0, 1);

        projectile_hits(&mut world, &tuning);
        assert!(world.enemies.is_empty());
        // Second projectile found nothing alive to hit
        assert_eq!(world.projectiles.len(), 1);
        assert_eq!(world.kills, 1);
    }

    #[test]
    fn test_orbital_damage_is_continuous() {
        let tuning = Tuning::default();
        let mut world = World::new(&tuning);
        world.orbitals.push(Orbital {
            kind: WeaponKind::ClawRing,
            angle: 0.0,
            radius: 80.0,
            damage: 4.0,
        });
        spawn(&mut world, Vec2::new(80.0, 0.0), 20.0, 1.0);

        orbital_hits(&mut world, &tuning);
        assert_eq!(world.enemies[0].hp, 16.0);
        orbital_hits(&mut world, &tuning);
        assert_eq!(world.enemies[0].hp, 12.0);
    }

    #[test]
    fn test_puddle_damages_and_decays() {
        let tuning = Tuning::default();
        let mut world = World::new(&tuning);
        world.puddles.push(AreaEffect {
            id: 99,
            pos: Vec2::new(0.0, 300.0),
            duration: 2,
            damage: 1.0,
            radius: 50.0,
        });
        spawn(&mut world, Vec2::new(0.0, 320.0), 10.0, 1.0);
        spawn(&mut world, Vec2::new(0.0, 500.0), 10.0, 1.0);

        area_hits(&mut world, &tuning);
        assert_eq!(world.enemies[0].hp, 9.0);
        assert_eq!(world.enemies[1].hp, 10.0);
        assert_eq!(world.puddles[0].duration, 1);

        area_hits(&mut world, &tuning);
        assert!(world.puddles.is_empty());
        assert_eq!(world.enemies[0].hp, 8.0);
    }

    #[test]
    fn test_burst_hits_each_target_in_a_cluster() {
        let tuning = Tuning::default();
        let mut world = World::new(&tuning);
        world.player.weapons = vec![Weapon::new(WeaponKind::ThunderClaw, 0.0)];
        world.time_ms = 2000.0;
        let far = spawn(&mut world, Vec2::new(300.0, 0.0), 100.0, 1.0);
        let nearest = spawn(&mut world, Vec2::new(200.0, 0.0), 100.0, 1.0);
        let second = spawn(&mut world, Vec2::new(210.0, 0.0), 100.0, 1.0);

        fire_weapons(&mut world);
        assert_eq!(world.projectiles.len(), 2);
        projectile_hits(&mut world, &tuning);

        let hp = |id: u32| world.enemies.iter().find(|e| e.id == id).map(|e| e.hp);
        let damage = WeaponKind::ThunderClaw.damage(1);
        assert_eq!(hp(nearest), Some(100.0 - damage));
        assert_eq!(hp(second), Some(100.0 - damage));
        assert_eq!(hp(far), Some(100.0));
        assert!(world.projectiles.is_empty());
    }

    #[test]
    fn test_strike_fizzles_when_target_is_gone() {
        let tuning = Tuning::default();
        let mut world = World::new(&tuning);
        let at = Vec2::new(200.0, 0.0);
        let bystander = spawn(&mut world, at, 50.0, 1.0);
        let id = world.next_entity_id();
        world.projectiles.push(Projectile {
            id,
            kind: WeaponKind::ThunderClaw,
            pos: at,
            vel: Vec2::ZERO,
            damage: 14.0,
            piercing: 1,
            lifetime: Some(8),
            target: Some(bystander + 100),
        });

        projectile_hits(&mut world, &tuning);
        assert!(world.projectiles.is_empty());
        assert_eq!(world.enemies[0].hp, 50.0);
    }

    #[test]
    fn test_orbital_kill_credits_run() {
        let tuning = Tuning::default();
        let mut world = World::new(&tuning);
        world.orbitals.push(Orbital {
            kind: WeaponKind::ClawRing,
            angle: 0.0,
            radius: 80.0,
            damage: 4.0,
        });
        let at = Vec2::new(80.0, 0.0);
        spawn(&mut world, at, 3.0, 1.0);

        orbital_hits(&mut world, &tuning);
        assert!(world.enemies.is_empty());
        assert_eq!(world.kills, 1);
        assert_eq!(world.score, tuning.score_per_kill);
        assert_eq!(world.gems.len(), 1);
        assert_eq!(world.gems[0].pos, at);
        assert_eq!(world.gems[0].value, 3);
    }

    #[test]
    fn test_puddle_kill_credits_run() {
        let tuning = Tuning::default();
        let mut world = World::new(&tuning);
        world.puddles.push(AreaEffect {
            id: 99,
            pos: Vec2::new(0.0, 300.0),
            duration: 10,
            damage: 1.0,
            radius: 50.0,
        });
        let at = Vec2::new(0.0, 310.0);
        spawn(&mut world, at, 1.0, 1.0);
        spawn(&mut world, Vec2::new(0.0, 500.0), 1.0, 1.0);

        area_hits(&mut world, &tuning);
        assert_eq!(world.enemies.len(), 1);
        assert_eq!(world.kills, 1);
        assert_eq!(world.score, tuning.score_per_kill);
        assert_eq!(world.gems.len(), 1);
        assert_eq!(world.gems[0].pos, at);
    }

    #[test]
    fn test_contact_damage_once_per_tick() {
        let tuning = Tuning::default();
        let mut world = World::new(&tuning);
        for _ in 0..5 {
            spawn(&mut world, Vec2::new(5.0, 0.0), 10.0, 2.0);
        }
        spawn(&mut world, Vec2::new(-5.0, 0.0), 10.0, 3.0);

        let result = player_contact(&mut world);
        assert_eq!(result.damage, 3.0);
        assert!(!result.fatal);
        assert_eq!(world.player.hp, tuning.player_max_hp - 3.0);
    }

    #[test]
    fn test_contact_clamps_hp_and_is_fatal() {
        let tuning = Tuning::default();
        let mut world = World::new(&tuning);
        world.player.hp = 1.5;
        spawn(&mut world, Vec2::ZERO, 10.0, 4.0);
        let result = player_contact(&mut world);
        assert!(result.fatal);
        assert_eq!(world.player.hp, 0.0);
    }

    #[test]
    fn test_no_contact_out_of_range() {
        let tuning = Tuning::default();
        let mut world = World::new(&tuning);
        spawn(&mut world, Vec2::new(100.0, 0.0), 10.0, 4.0);
        assert_eq!(player_contact(&mut world).damage, 0.0);
        assert_eq!(world.player.hp, tuning.player_max_hp);
    }

    #[test]
    fn test_gems_pulled_then_collected() {
        let tuning = Tuning::default();
        let mut world = World::new(&tuning);
        world.player.exp_to_next = 100;
        world.drop_gem(Vec2::new(150.0, 0.0), 2);
        world.drop_gem(Vec2::new(500.0, 0.0), 2);

        collect_gems(&mut world, 0.1);
        // Inside the magnet: pulled 32 units closer
        assert!((world.gems[0].pos.x - 118.0).abs() < 1e-3);
        // Outside the magnet: untouched
        assert_eq!(world.gems[1].pos.x, 500.0);

        for _ in 0..10 {
            collect_gems(&mut world, 0.1);
        }
        assert_eq!(world.player.exp, 2);
        assert_eq!(world.gems.len(), 1);
    }

    #[test]
    fn test_pickup_stops_at_level_threshold() {
        let tuning = Tuning::default();
        let mut world = World::new(&tuning);
        world.player.exp = world.player.exp_to_next - 1;
        world.drop_gem(Vec2::ZERO, 1);
        world.drop_gem(Vec2::ZERO, 1);

        collect_gems(&mut world, 0.016);
        assert_eq!(world.player.exp, world.player.exp_to_next);
        assert_eq!(world.gems.len(), 1);
    }

    #[test]
    fn test_far_gems_despawn() {
        let tuning = Tuning::default();
        let mut world = World::new(&tuning);
        world.drop_gem(Vec2::new(GEM_DESPAWN_DISTANCE + 10.0, 0.0), 1);
        collect_gems(&mut world, 0.016);
        assert!(world.gems.is_empty());
    }
}
