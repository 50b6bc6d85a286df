//! Experience, level-ups, and upgrade application

use rand::Rng;

use super::state::{GamePhase, Player, SimEvent, World};
use super::weapon::{WeaponKind, derive_orbitals, upgrade_choices, upgrade_weapon};
use crate::tuning::Tuning;

/// Level up when the threshold is reached.
///
/// Offers choices and pauses the run for them. When every archetype is maxed
/// the level and exp reset still happen, but no event is emitted and the run
/// keeps going.
pub fn check_level_up<R: Rng + ?Sized>(
    world: &mut World,
    tuning: &Tuning,
    rng: &mut R,
) -> Option<SimEvent> {
    let player = &mut world.player;
    if player.exp < player.exp_to_next {
        return None;
    }

    player.level += 1;
    player.exp = 0;
    player.exp_to_next = ((player.exp_to_next as f32 * tuning.exp_growth).floor() as u32)
        .max(player.exp_to_next + 1);

    let choices = upgrade_choices(&player.weapons, rng);
    log::info!(
        "Level {} reached at {:.1}s, choices: {:?}",
        player.level,
        world.time_ms / 1000.0,
        choices
    );
    if choices.is_empty() {
        return None;
    }
    world.phase = GamePhase::LevelUpPaused {
        choices: choices.clone(),
    };

    Some(SimEvent::LevelUp {
        level: player.level,
        weapons: player.weapons.clone(),
        choices,
    })
}

/// Apply the chosen upgrade and resume.
///
/// Returns false (no-op) unless the run is waiting on a choice and `kind` was
/// one of the offered options.
pub fn apply_choice(world: &mut World, tuning: &Tuning, kind: WeaponKind) -> bool {
    let GamePhase::LevelUpPaused { choices } = &world.phase else {
        return false;
    };
    if !choices.contains(&kind) {
        log::warn!("Ignoring unavailable upgrade {}", kind.name());
        return false;
    }
    if !upgrade_weapon(&mut world.player.weapons, kind, world.time_ms) {
        return false;
    }

    log::info!(
        "Upgraded {} to level {}",
        kind.name(),
        world.player.weapon_level(kind)
    );
    refresh_player_stats(&mut world.player, tuning);
    world.orbitals = derive_orbitals(&world.player.weapons, &world.orbitals);
    world.phase = GamePhase::Running;
    true
}

/// Recompute passive-derived stats from the weapon list.
///
/// Raising max HP heals by the same amount; hp stays within `0..=max_hp`.
pub fn refresh_player_stats(player: &mut Player, tuning: &Tuning) {
    let vitality = player.weapon_level(WeaponKind::Vitality) as f32;
    let swiftness = player.weapon_level(WeaponKind::Swiftness) as f32;
    let magnetism = player.weapon_level(WeaponKind::Magnetism) as f32;

    let max_hp = tuning.player_max_hp + vitality * tuning.vitality_hp_per_level;
    let gained = (max_hp - player.max_hp).max(0.0);
    player.max_hp = max_hp;
    player.hp = (player.hp + gained).clamp(0.0, max_hp);

    player.move_speed = tuning.player_speed * (1.0 + swiftness * tuning.swiftness_per_level);
    player.magnet_radius =
        tuning.magnet_base_radius + magnetism * tuning.magnet_radius_per_level;
}
