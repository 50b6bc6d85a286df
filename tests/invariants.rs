//! Property tests over whole-run invariants

use glam::Vec2;
use iron_paw_survival::Tuning;
use iron_paw_survival::consts::SIM_DT_MS;
use iron_paw_survival::sim::collision::projectile_hits;
use iron_paw_survival::sim::spawner::{population_cap, spawn_tick};
use iron_paw_survival::sim::weapon::upgrade_weapon;
use iron_paw_survival::sim::{
    Enemy, EnemyKind, GamePhase, Projectile, Simulation, TickInput, WeaponKind, World,
    derive_orbitals,
};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_pcg::Pcg32;

fn weapon_kind() -> impl Strategy<Value = WeaponKind> {
    prop::sample::select(WeaponKind::ALL.to_vec())
}

/// Play `ticks` steps on the autopilot, taking the first offered upgrade
fn autoplay(seed: u64, ticks: usize, mut check: impl FnMut(&Simulation)) -> Simulation {
    let mut sim = Simulation::new(seed, Tuning::default());
    sim.start();
    sim.set_input(TickInput {
        idle_mode: true,
        ..Default::default()
    });
    for _ in 0..ticks {
        sim.tick(SIM_DT_MS);
        if let GamePhase::LevelUpPaused { choices } = sim.phase().clone() {
            sim.choose_upgrade(choices[0]);
        }
        check(&sim);
    }
    sim
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn population_and_hp_bounds_hold(seed in any::<u64>()) {
        let tuning = Tuning::default();
        autoplay(seed, 2400, |sim| {
            let world = sim.world();
            let cap = population_cap(world.player.level, &tuning);
            assert!(world.enemies.len() <= cap);
            assert!(world.player.hp >= 0.0);
            assert!(world.player.hp <= world.player.max_hp);
            assert!(world.enemies.iter().all(|e| e.hp > 0.0));
        });
    }

    #[test]
    fn orbitals_match_weapons(seed in any::<u64>()) {
        autoplay(seed, 2400, |sim| {
            let world = sim.world();
            let owned = world.player.weapons.iter().filter(|w| w.kind.is_orbital()).count();
            assert_eq!(world.orbitals.len(), owned);
            for orbital in &world.orbitals {
                assert!(world.player.weapon_level(orbital.kind) > 0);
            }
        });
    }

    #[test]
    fn runs_are_deterministic(seed in any::<u64>()) {
        let a = autoplay(seed, 900, |_| {});
        let b = autoplay(seed, 900, |_| {});
        let (a, b) = (a.world(), b.world());
        prop_assert_eq!(a.tick_count, b.tick_count);
        prop_assert_eq!(a.player.pos, b.player.pos);
        prop_assert_eq!(a.player.hp, b.player.hp);
        prop_assert_eq!(a.score, b.score);
        prop_assert_eq!(a.kills, b.kills);
        prop_assert_eq!(a.enemies.len(), b.enemies.len());
    }

    #[test]
    fn upgrades_never_exceed_cap(kinds in prop::collection::vec(weapon_kind(), 0..80)) {
        let mut weapons = Vec::new();
        for kind in kinds {
            upgrade_weapon(&mut weapons, kind, 0.0);
        }
        for weapon in &weapons {
            prop_assert!(weapon.level >= 1);
            prop_assert!(weapon.level <= weapon.kind.max_level());
        }
        // One entry per kind
        for kind in WeaponKind::ALL {
            prop_assert!(weapons.iter().filter(|w| w.kind == kind).count() <= 1);
        }
        let orbitals = derive_orbitals(&weapons, &[]);
        let owned = weapons.iter().filter(|w| w.kind.is_orbital()).count();
        prop_assert_eq!(orbitals.len(), owned);
    }

    #[test]
    fn piercing_only_decreases(
        piercing in 0u32..6,
        enemy_count in 0usize..8,
        damage in 1.0f32..50.0,
    ) {
        let tuning = Tuning::default();
        let mut world = World::new(&tuning);
        for i in 0..enemy_count {
            let id = world.next_entity_id();
            world.enemies.push(Enemy {
                id,
                kind: EnemyKind::Rat,
                pos: Vec2::new(300.0 + i as f32, 0.0),
                hp: 20.0,
                max_hp: 20.0,
                strength: 1.0,
                speed: 0.0,
                radius: 14.0,
                gem_value: 1,
                facing: 0.0,
                anim_phase: 0.0,
            });
        }
        let id = world.next_entity_id();
        world.projectiles.push(Projectile {
            id,
            kind: WeaponKind::PawBolt,
            pos: Vec2::new(300.0, 0.0),
            vel: Vec2::ZERO,
            damage,
            piercing,
            lifetime: None,
            target: None,
        });

        projectile_hits(&mut world, &tuning);

        match world.projectiles.iter().find(|p| p.id == id) {
            Some(p) => {
                prop_assert!(p.piercing <= piercing);
                prop_assert!(enemy_count == 0 || p.piercing > 0);
                prop_assert_eq!(piercing - p.piercing, enemy_count as u32);
            }
            None => prop_assert!(enemy_count > 0),
        }
    }

    #[test]
    fn spawner_respects_cap(seed in any::<u64>(), level in 1u32..40) {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut world = World::new(&tuning);
        world.player.level = level;
        for _ in 0..20_000 {
            spawn_tick(&mut world, &tuning, &mut rng);
        }
        prop_assert!(world.enemies.len() <= population_cap(level, &tuning));
        for enemy in &world.enemies {
            let dist = enemy.pos.distance(world.player.pos);
            prop_assert!((dist - tuning.spawn_radius).abs() < 0.1);
        }
    }
}
