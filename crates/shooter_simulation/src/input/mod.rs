//! Input module: player input → intents and aim
//!
//! Flow:
//! - Host emits `PlayerInputEvent` (keys, mouse, touch, gyro, settings)
//! - `dispatch_player_input` maps keys through `KeyBindings` to combat intents
//!   or overlay requests, and turns aim input into `ViewRotation` changes

use bevy::prelude::*;

pub mod components;
pub mod events;
pub mod systems;


pub use components::*;
pub use events::*;
pub use systems::*;

use crate::combat::{ActionRejected, EquipWeaponIntent, FireWeaponIntent, ReloadWeaponIntent};
use crate::SimulationSet;

pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<InputConfig>()
            .init_resource::<KeyBindings>()
            .register_type::<ControllerInput>()
            .register_type::<ViewRotation>()
            .add_event::<PlayerInputEvent>()
            .add_event::<OverlayRequested>()
            .add_event::<EquipWeaponIntent>()
            .add_event::<ReloadWeaponIntent>()
            .add_event::<FireWeaponIntent>()
            .add_event::<ActionRejected>()
            .add_systems(FixedUpdate, dispatch_player_input.in_set(SimulationSet::Input));
    }
}
