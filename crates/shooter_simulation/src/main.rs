//! Headless shooter simulation
//!
//! Usage: `shooter_simulation [config.toml]`
//!
//! Spawns the configured player loadout and plays a scripted input sequence
//! (equip, empty the magazine, reload, switch weapons), logging the outcome.

use std::process::ExitCode;

use bevy::prelude::*;
use shooter_simulation::*;

const TOTAL_TICKS: u64 = 600;

/// (tick, input) pairs, sorted by tick.
fn script() -> Vec<(u64, PlayerInputEvent)> {
    let mut script = vec![(5, PlayerInputEvent::key("NumPadOne"))];

    // Hold the trigger: the 7th shot finds an empty magazine and reloads
    for shot in 0..7 {
        script.push((80 + shot * 4, PlayerInputEvent::key("LeftMouseButton")));
    }

    script.extend([
        (120, PlayerInputEvent::MouseMotion { delta: Vec2::new(12.0, -4.0) }),
        (400, PlayerInputEvent::key("NumPadTwo")),
        (470, PlayerInputEvent::key("R")),
        (480, PlayerInputEvent::key("LeftMouseButton")),
        (500, PlayerInputEvent::key("O")),
        // Ignored: the overlay owns the pointer
        (510, PlayerInputEvent::MouseMotion { delta: Vec2::new(50.0, 0.0) }),
        (540, PlayerInputEvent::CloseOverlay),
    ]);
    script
}

fn main() -> ExitCode {
    init_logger();

    let config = match std::env::args().nth(1) {
        Some(path) => match SimulationConfig::load(&path) {
            Ok(config) => config,
            Err(error) => {
                log_error(&format!("{}", error));
                return ExitCode::FAILURE;
            }
        },
        None => SimulationConfig::default(),
    };

    log_info(&format!(
        "Starting headless simulation ({} Hz, {} ticks)",
        config.tick_hz, TOTAL_TICKS
    ));

    let loadout = config.loadout.clone();
    let mut app = create_headless_app(config);
    app.add_plugins(SimulationPlugin);
    let player = spawn_player(app.world_mut(), loadout);

    let script = script();
    let mut shots = 0;
    let mut rejected = 0;

    for tick in 0..TOTAL_TICKS {
        for (_, input) in script.iter().filter(|(at, _)| *at == tick) {
            app.world_mut().send_event(input.clone());
        }

        advance_ticks(&mut app, 1);

        let world = app.world_mut();
        shots += drain_events::<WeaponFired>(world).len();
        rejected += drain_events::<ActionRejected>(world).len();
        for reload in drain_events::<ReloadFinished>(world) {
            log_info(&format!("Tick {}: reloaded {} rounds", tick, reload.transferred));
        }
        for swap in drain_events::<WeaponSwapped>(world) {
            log_info(&format!("Tick {}: weapon {:?} → {:?}", tick, swap.previous, swap.current));
        }
        for overlay in drain_events::<OverlayRequested>(world) {
            log_info(&format!("Tick {}: host should open {:?}", tick, overlay.overlay));
        }
    }

    let world = app.world();
    if let Some(state) = world.get::<CombatState>(player) {
        let ammo = state
            .current_weapon
            .and_then(|weapon| world.get::<WeaponState>(weapon))
            .map(|weapon| (weapon.current_ammo_in_mag, weapon.current_ammo_in_backpack));
        log_info(&format!(
            "Simulation complete: {} shots, {} rejected actions, current weapon {:?}, ammo {:?}",
            shots, rejected, state.current_weapon, ammo
        ));
    }
    if let Some(view) = world.get::<ViewRotation>(player) {
        log_info(&format!("Final view: yaw {:.1}, pitch {:.1}", view.yaw, view.pitch));
    }

    ExitCode::SUCCESS
}
