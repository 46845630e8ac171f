//! Equipment module: weapon inventory lifecycle
//!
//! # Architecture
//!
//! **Events → Systems flow:**
//! - Host UI / scripts emit intent events
//! - Systems process intents (modify `Backpack` / `EquipSlots`)
//! - Spawned weapons become children of the character
//!
//! **Weapon lifecycle:**
//! - Spawn → `WeaponState` + `Attachment` + hidden `WeaponVisibility`
//! - Replace → old slot weapon is despawned, combat prunes its references
//! - Equip/holster → combat sequencer (see `combat::handling`)

use bevy::prelude::*;

pub mod events;
pub mod systems;

pub use events::*;
pub use systems::*;

use crate::combat::ActionRejected;
use crate::item_system::WeaponPrototypes;
use crate::SimulationSet;

pub struct EquipmentPlugin;

impl Plugin for EquipmentPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WeaponPrototypes>()
            .add_event::<SpawnLoadoutIntent>()
            .add_event::<SelectBackpackItemIntent>()
            .add_event::<ActionRejected>()
            .add_systems(
                FixedUpdate,
                (process_select_backpack_item, spawn_and_assign_to_slots)
                    .chain()
                    .in_set(SimulationSet::Inventory),
            );
    }
}
