//! Iron Paw Survival headless runner
//!
//! Plays a full run on the autopilot and logs how it went.
//! Usage: `iron-paw-survival [seed] [tuning.json]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use iron_paw_survival::Tuning;
    use iron_paw_survival::consts::SIM_DT_MS;
    use iron_paw_survival::sim::{GamePhase, SimEvent, Simulation, TickInput};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Iron Paw Survival (headless) starting...");

    let mut args = std::env::args().skip(1);
    let seed = match args.next().map(|s| s.parse::<u64>()) {
        Some(Ok(seed)) => seed,
        Some(Err(e)) => {
            log::warn!("Bad seed ({}), using 12345", e);
            12345
        }
        None => 12345,
    };
    let tuning = match args.next() {
        Some(path) => Tuning::load_file(&path).unwrap_or_else(|e| {
            log::error!("Failed to load tuning: {}", e);
            Tuning::default()
        }),
        None => Tuning::default(),
    };

    // Enough ticks to reach the victory timer with room to spare
    let max_ticks = (tuning.victory_ms / SIM_DT_MS as f64).ceil() as u64 + 60;

    let mut sim = Simulation::new(seed, tuning);
    sim.start();
    sim.set_input(TickInput {
        idle_mode: true,
        ..Default::default()
    });

    for _ in 0..max_ticks {
        sim.tick(SIM_DT_MS);

        if let GamePhase::LevelUpPaused { choices } = sim.phase().clone() {
            if let Some(&first) = choices.first() {
                sim.choose_upgrade(first);
            }
        }

        for event in sim.drain_events() {
            if let SimEvent::GameOver {
                won,
                score,
                kills,
                elapsed_ms,
            } = event
            {
                println!(
                    "{} after {:.1}s: score {}, kills {}, level {}",
                    if won { "Victory" } else { "Defeat" },
                    elapsed_ms / 1000.0,
                    score,
                    kills,
                    sim.world().player.level
                );
            }
        }

        if sim.phase().is_ended() {
            break;
        }
    }

    for weapon in &sim.world().player.weapons {
        log::info!("  {} lv{}", weapon.kind.name(), weapon.level);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is web::wasm_start, this is just to satisfy the compiler
}
