//! Simulation clock
//!
//! Drives one tick through every component in a fixed order and owns the
//! run's phase machine. Hosts talk to [`Simulation`]; [`tick`] is the pure
//! step it wraps.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use std::f32::consts::TAU;

use super::state::{GamePhase, SimEvent, World};
use super::weapon::{WeaponKind, derive_orbitals};
use super::{autopilot, collision, progression, spawner, weapon};
use crate::consts::*;
use crate::tuning::Tuning;
use crate::{angle_of, direction_to};

/// Input pushed by the host for the next tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Movement intent; lengths above 1 are clamped
    pub direction: Vec2,
    /// Idle/demo mode - autopilot steers
    pub idle_mode: bool,
}

/// Advance the world by one step. Does nothing unless the run is `Running`.
pub fn tick(
    world: &mut World,
    input: &TickInput,
    dt_ms: f32,
    tuning: &Tuning,
    rng: &mut Pcg32,
    events: &mut Vec<SimEvent>,
) {
    if !world.phase.is_running() {
        return;
    }

    let dt_ms = dt_ms.clamp(0.0, MAX_DT_MS);
    let dt = dt_ms / 1000.0;
    world.time_ms += dt_ms as f64;
    world.tick_count += 1;

    // Victory timer
    if world.time_ms >= tuning.victory_ms && world.player.hp > 0.0 {
        world.score += tuning.victory_bonus;
        end_run(world, true, events);
        return;
    }

    let direction = if input.idle_mode {
        autopilot::steer(world)
    } else {
        input.direction.clamp_length_max(1.0)
    };
    move_player(world, direction, dt);
    animate(world, dt);

    spawner::spawn_tick(world, tuning, rng);
    move_enemies(world, dt);

    weapon::fire_weapons(world);
    move_projectiles(world, dt);

    if collision::resolve(world, tuning, dt) {
        end_run(world, false, events);
        return;
    }

    if let Some(event) = progression::check_level_up(world, tuning, rng) {
        events.push(event);
    }
}

fn end_run(world: &mut World, won: bool, events: &mut Vec<SimEvent>) {
    world.phase = GamePhase::Ended { won };
    log::info!(
        "Run ended ({}) at {:.1}s: score {}, kills {}",
        if won { "victory" } else { "defeat" },
        world.time_ms / 1000.0,
        world.score,
        world.kills
    );
    events.push(SimEvent::GameOver {
        won,
        score: world.score,
        kills: world.kills,
        elapsed_ms: world.time_ms,
    });
}

fn move_player(world: &mut World, direction: Vec2, dt: f32) {
    let player = &mut world.player;
    if direction == Vec2::ZERO {
        return;
    }
    player.pos += direction * player.move_speed * dt;
    player.facing = angle_of(direction);
    player.anim_phase = (player.anim_phase + ANIM_RATE * dt) % TAU;
}

/// Walk cycles and feedback decay
fn animate(world: &mut World, dt: f32) {
    for enemy in world.enemies.iter_mut() {
        enemy.anim_phase = (enemy.anim_phase + ANIM_RATE * dt) % TAU;
    }
    for number in world.damage_numbers.iter_mut() {
        number.ticks_left = number.ticks_left.saturating_sub(1);
        number.pos.y -= DAMAGE_NUMBER_RISE;
    }
    world.damage_numbers.retain(|n| n.ticks_left > 0);
}

fn move_enemies(world: &mut World, dt: f32) {
    let target = world.player.pos;
    for enemy in world.enemies.iter_mut() {
        let dir = direction_to(enemy.pos, target);
        if dir == Vec2::ZERO {
            continue;
        }
        // Don't overshoot onto the exact player position
        let step = (enemy.speed * dt).min(enemy.pos.distance(target));
        enemy.pos += dir * step;
        enemy.facing = angle_of(dir);
    }
}

fn move_projectiles(world: &mut World, dt: f32) {
    let center = world.player.pos;
    for projectile in world.projectiles.iter_mut() {
        projectile.pos += projectile.vel * dt;
        if let Some(ticks) = projectile.lifetime.as_mut() {
            *ticks = ticks.saturating_sub(1);
        }
    }
    world.projectiles.retain(|p| {
        p.lifetime != Some(0) && p.pos.distance(center) <= PROJECTILE_CULL_DISTANCE
    });
}

/// A run plus everything needed to drive it
#[derive(Debug, Clone)]
pub struct Simulation {
    world: World,
    tuning: Tuning,
    seed: u64,
    rng: Pcg32,
    input: TickInput,
    events: Vec<SimEvent>,
}

impl Simulation {
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        Self {
            world: World::new(&tuning),
            tuning,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            input: TickInput::default(),
            events: Vec::new(),
        }
    }

    /// Reset every collection and the player, then start ticking.
    ///
    /// The RNG is reseeded, so restarting with the same seed and inputs
    /// replays the same run.
    pub fn start(&mut self) {
        self.world = World::new(&self.tuning);
        self.world.orbitals = derive_orbitals(&self.world.player.weapons, &[]);
        self.world.phase = GamePhase::Running;
        self.rng = Pcg32::seed_from_u64(self.seed);
        self.input = TickInput::default();
        self.events.clear();
        log::info!("Started new run with seed: {}", self.seed);
    }

    /// Start over with a different seed
    pub fn restart(&mut self, seed: u64) {
        self.seed = seed;
        self.start();
    }

    /// Advance one step
    pub fn tick(&mut self, dt_ms: f32) {
        tick(
            &mut self.world,
            &self.input,
            dt_ms,
            &self.tuning,
            &mut self.rng,
            &mut self.events,
        );
    }

    pub fn pause(&mut self) {
        if self.world.phase.is_running() {
            self.world.phase = GamePhase::Paused;
            log::info!("Paused");
        }
    }

    pub fn resume(&mut self) {
        if self.world.phase == GamePhase::Paused {
            self.world.phase = GamePhase::Running;
            log::info!("Resumed");
        }
    }

    /// Pick one of the offered upgrades. Invalid choices are a no-op.
    pub fn choose_upgrade(&mut self, kind: WeaponKind) -> bool {
        progression::apply_choice(&mut self.world, &self.tuning, kind)
    }

    pub fn set_input(&mut self, input: TickInput) {
        self.input = input;
    }

    /// Read-only view for the rendering collaborator
    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn phase(&self) -> &GamePhase {
        &self.world.phase
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Take pending notifications
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    #[cfg(test)]
    pub(crate) fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }
}
