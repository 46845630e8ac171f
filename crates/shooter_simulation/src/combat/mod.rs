//! Combat module: weapon state and the equip/reload/fire sequencer
//!
//! ECS responsibility:
//! - Weapon state: ammo in magazine and backpack (`WeaponState`)
//! - Character state: current weapon, fire/reload/equip flags (`CombatState`)
//! - Timing: equip and reload sequences advanced once per fixed tick
//! - Events: WeaponFired, WeaponSwapped, ReloadFinished, ActionRejected
//!
//! Host responsibility:
//! - Playing animations from `weapon_pull_down_percent`
//! - Showing/hiding weapon models from `WeaponVisibility`
//! - Muzzle flash, projectiles and sound on `WeaponFired`

use bevy::prelude::*;

pub mod curve;
pub mod events;
pub mod handling;
pub mod systems;
pub mod weapon;

#[cfg(test)]
mod handling_tests;

pub use curve::{CurveKey, FloatCurve};
pub use events::*;
pub use handling::{CombatState, FireOutcome, HandlingConfig, HandlingEvent, ReloadPhase};
pub use systems::*;
pub use weapon::{WeaponState, WeaponType};

use crate::SimulationSet;

/// Combat plugin
///
/// Registers the combat systems in FixedUpdate.
///
/// Order:
/// 1. process_equip_intents
/// 2. process_reload_intents
/// 3. process_fire_intents
/// 4. advance_weapon_handling (sequencer tick + checkpoint outputs)
/// 5. prune_despawned_weapons (cleanup set)
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<HandlingConfig>()
            .register_type::<WeaponState>()
            .register_type::<CombatState>()
            .add_event::<EquipWeaponIntent>()
            .add_event::<ReloadWeaponIntent>()
            .add_event::<FireWeaponIntent>()
            .add_event::<WeaponFired>()
            .add_event::<WeaponSwapped>()
            .add_event::<ReloadFinished>()
            .add_event::<ActionRejected>();

        app.add_systems(
            FixedUpdate,
            (
                process_equip_intents,
                process_reload_intents,
                process_fire_intents,
                advance_weapon_handling,
            )
                .chain()
                .in_set(SimulationSet::Combat),
        )
        .add_systems(FixedUpdate, prune_despawned_weapons.in_set(SimulationSet::Cleanup));
    }
}
