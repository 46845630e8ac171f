//! Shooter simulation core
//!
//! Headless ECS gameplay on Bevy 0.16: weapons with ammo/reload state, a
//! character backpack with three equip slots, the equip/reload sequencer and
//! player input dispatch.
//!
//! HOST BOUNDARY:
//! - ECS = game state and rules (ammo, sequencing, aim)
//! - Host = rendering, animation, sound, device polling
//!
//! The host sends `PlayerInputEvent`s and intents in, and reads
//! `CombatState`, `WeaponState`, `WeaponVisibility`, `Attachment`,
//! `ViewRotation` and the output events back.

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;

pub mod combat;
pub mod components;
pub mod config;
pub mod equipment;
pub mod error;
pub mod input;
pub mod item_system;
pub mod logger;

pub use combat::{
    ActionRejected, CombatPlugin, CombatState, EquipWeaponIntent, FireWeaponIntent, HandlingConfig,
    ReloadFinished, ReloadWeaponIntent, WeaponFired, WeaponState, WeaponSwapped, WeaponType,
};
pub use components::*;
pub use config::{ConfigError, SimulationConfig};
pub use equipment::{EquipmentPlugin, SelectBackpackItemIntent, SpawnLoadoutIntent};
pub use error::{GameplayError, GameplayResult};
pub use input::{
    ControllerInput, ControllingDevice, InputConfig, InputPlugin, KeyBindings, Overlay, OverlayRequested,
    PlayerInputEvent, TouchPhase, ViewRotation,
};
pub use item_system::{PrototypeId, WeaponPrototype, WeaponPrototypes};
pub use logger::*;

/// Processing order inside one fixed tick.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    /// PlayerInputEvent → intents, aim
    Input,
    /// Backpack selection, loadout spawn
    Inventory,
    /// Equip/reload/fire intents, sequencer tick
    Combat,
    /// Drop references to despawned weapons
    Cleanup,
}

/// Fixed ticks run so far.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SimulationTick(pub u64);

fn count_ticks(mut tick: ResMut<SimulationTick>) {
    tick.0 += 1;
}

/// Main simulation plugin (all subsystems)
///
/// Reads `SimulationConfig` if it was inserted before the plugin, otherwise
/// runs on defaults.
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        let config = app
            .world()
            .get_resource::<SimulationConfig>()
            .cloned()
            .unwrap_or_default();

        set_log_level(config.log_level);

        app.insert_resource(Time::<Fixed>::from_hz(config.tick_hz))
            .insert_resource(config.handling.clone())
            .insert_resource(config.input.clone())
            .insert_resource(KeyBindings::with_overrides(&config.key_bindings))
            .insert_resource(config.prototypes())
            .insert_resource(config)
            .init_resource::<SimulationTick>()
            .configure_sets(
                FixedUpdate,
                (
                    SimulationSet::Input,
                    SimulationSet::Inventory,
                    SimulationSet::Combat,
                    SimulationSet::Cleanup,
                )
                    .chain(),
            )
            .add_systems(FixedFirst, count_ticks)
            .add_plugins((InputPlugin, EquipmentPlugin, CombatPlugin));
    }
}

/// Minimal headless App: every `update()` advances virtual time by exactly
/// one fixed step of `config.tick_hz`.
///
/// The very first `update()` has a zero delta (Bevy starts the clock there),
/// so use `advance_ticks` when a test needs an exact number of ticks.
pub fn create_headless_app(config: SimulationConfig) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
            1.0 / config.tick_hz,
        )))
        .insert_resource(config);

    app
}

/// Run `app.update()` until `ticks` more fixed ticks happened.
pub fn advance_ticks(app: &mut App, ticks: u64) {
    let target = current_tick(app) + ticks;
    // A frame never runs less than one tick after the first, so this bound is generous
    let max_frames = ticks * 4 + 4;

    for _ in 0..max_frames {
        if current_tick(app) >= target {
            return;
        }
        app.update();
    }

    log_error(&format!(
        "advance_ticks: stopped at tick {} (wanted {})",
        current_tick(app),
        target
    ));
}

fn current_tick(app: &App) -> u64 {
    app.world()
        .get_resource::<SimulationTick>()
        .map(|tick| tick.0)
        .unwrap_or_default()
}

/// Components of a player character.
pub fn player_bundle(
    backpack: Backpack,
    input: &InputConfig,
) -> (Player, Name, Backpack, EquipSlots, CombatState, ControllerInput, ViewRotation) {
    (
        Player,
        Name::new("Player"),
        backpack,
        EquipSlots::default(),
        CombatState::default(),
        ControllerInput::from_config(input),
        ViewRotation::default(),
    )
}

/// Spawn a player with `loadout` (selection capacity from `SimulationConfig`)
/// and queue its weapon spawn.
pub fn spawn_player(world: &mut World, loadout: Vec<BackpackSlotItem>) -> Entity {
    let (input, capacity) = match world.get_resource::<SimulationConfig>() {
        Some(config) => (config.input.clone(), config.selection_capacity),
        None => (InputConfig::default(), DEFAULT_SELECTION_CAPACITY),
    };

    let player = world
        .spawn(player_bundle(Backpack::with_capacity(loadout, capacity), &input))
        .id();
    world.send_event(SpawnLoadoutIntent { character: player });

    log(&format!("Spawned player {:?}", player));
    player
}

/// Take every pending event of type `E` (oldest first).
pub fn drain_events<E: Event>(world: &mut World) -> Vec<E> {
    world
        .get_resource_mut::<Events<E>>()
        .map(|mut events| events.drain().collect())
        .unwrap_or_default()
}

/// Snapshot of every `T` for determinism comparison.
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Entity order = spawn order
    entities.sort_by_key(|(entity, _)| entity.index());

    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
