//! Player input dispatch (ECS)
//!
//! # Architecture
//! - Reads: PlayerInputEvent (from the host device layer)
//! - Writes: Equip/Reload/FireWeaponIntent, OverlayRequested, ActionRejected
//! - Mutates: ControllerInput (device, sensitivity, UI mode), ViewRotation
//! - Query: With<Player>
//!
//! # Key actions
//! - select slot N → EquipWeaponIntent with the slot's weapon (empty slot holsters)
//! - reload → only when not reloading/switching and the magazine isn't full
//! - fire → FireWeaponIntent
//! - menus → OverlayRequested + UI mode (aim ignored until CloseOverlay)

use bevy::prelude::*;

use crate::combat::{
    ActionRejected, CombatState, EquipWeaponIntent, FireWeaponIntent, ReloadWeaponIntent, WeaponState,
};
use crate::components::{EquipSlot, EquipSlots, Player};
use crate::error::{GameplayError, GameplayResult};
use crate::input::components::*;
use crate::input::events::*;
use crate::logger::{log, log_warning};

/// Intent writers bundled to keep the dispatcher signature readable.
#[derive(bevy::ecs::system::SystemParam)]
pub struct ActionWriters<'w> {
    equip: EventWriter<'w, EquipWeaponIntent>,
    reload: EventWriter<'w, ReloadWeaponIntent>,
    fire: EventWriter<'w, FireWeaponIntent>,
    overlay: EventWriter<'w, OverlayRequested>,
    rejected: EventWriter<'w, ActionRejected>,
}

pub fn dispatch_player_input(
    mut input_events: EventReader<PlayerInputEvent>,
    mut players: Query<
        (
            Entity,
            &mut ControllerInput,
            &mut ViewRotation,
            Option<&CombatState>,
            Option<&EquipSlots>,
        ),
        With<Player>,
    >,
    weapons: Query<&WeaponState>,
    bindings: Res<KeyBindings>,
    config: Res<InputConfig>,
    mut writers: ActionWriters,
) {
    for input in input_events.read() {
        for (player, mut controller, mut view, state, slots) in players.iter_mut() {
            match input {
                PlayerInputEvent::KeyPressed { key } => {
                    let Some(action) = bindings.action_for(key) else {
                        continue;
                    };
                    dispatch_action(player, action, &mut *controller, state, slots, &weapons, &mut writers);
                }
                PlayerInputEvent::MouseMotion { delta } => {
                    if let Some(aim) = controller.mouse_look(*delta) {
                        view.apply(aim, config.pitch_limit);
                    }
                }
                PlayerInputEvent::Touch { finger, phase, location } => {
                    match controller.touch(*finger, *phase, *location) {
                        Some(aim) => view.apply(aim, config.pitch_limit),
                        None => log(&format!("Touch {:?} on pad {} not handled", phase, finger)),
                    }
                }
                PlayerInputEvent::Motion { tilt } => {
                    if let Some(aim) = controller.gyro_motion(*tilt) {
                        view.apply(aim, config.pitch_limit);
                    }
                }
                PlayerInputEvent::SelectDevice(device) => {
                    if let Err(error) = controller.set_controlling_device(*device) {
                        reject(&mut writers, player, error);
                    } else {
                        log(&format!("Player {:?}: controlling device → {:?}", player, device));
                    }
                }
                PlayerInputEvent::SetSensitivity { device, value } => {
                    let applied = controller.set_sensitivity(*device, *value);
                    log(&format!("Player {:?}: {:?} sensitivity = {}", player, device, applied));
                }
                PlayerInputEvent::CloseOverlay => {
                    if controller.ui_only {
                        controller.leave_ui_mode();
                        log(&format!("Player {:?}: overlay closed", player));
                    }
                }
            }
        }
    }
}

fn dispatch_action(
    player: Entity,
    action: PlayerAction,
    controller: &mut ControllerInput,
    state: Option<&CombatState>,
    slots: Option<&EquipSlots>,
    weapons: &Query<&WeaponState>,
    writers: &mut ActionWriters,
) {
    match action {
        PlayerAction::SelectSlot1 | PlayerAction::SelectSlot2 | PlayerAction::SelectSlot3 => {
            let weapon = action
                .slot_index()
                .and_then(EquipSlot::from_index)
                .and_then(|slot| slots.and_then(|slots| slots.get(slot)));
            writers.equip.write(EquipWeaponIntent {
                character: player,
                weapon,
            });
        }
        PlayerAction::Reload => match check_reload_allowed(state, weapons) {
            Ok(()) => {
                writers.reload.write(ReloadWeaponIntent { character: player });
            }
            Err(error) => reject(writers, player, error),
        },
        PlayerAction::Fire => {
            writers.fire.write(FireWeaponIntent { character: player });
        }
        PlayerAction::SensitivityMenu => open_overlay(player, Overlay::Sensitivity, controller, writers),
        PlayerAction::WeaponSelectionMenu => open_overlay(player, Overlay::WeaponSelection, controller, writers),
    }
}

/// Reload key guard: idle hands and a magazine with room.
fn check_reload_allowed(state: Option<&CombatState>, weapons: &Query<&WeaponState>) -> GameplayResult<()> {
    let Some(state) = state else {
        return Err(GameplayError::NoWeaponEquipped);
    };

    if state.is_reloading || state.is_changing_weapon {
        return Err(GameplayError::ReloadBlocked);
    }

    let mag_is_full = state
        .current_weapon
        .and_then(|weapon| weapons.get(weapon).ok())
        .is_some_and(|weapon| weapon.has_ammo_in_mag().1);
    if mag_is_full {
        return Err(GameplayError::MagazineFull);
    }

    Ok(())
}

fn open_overlay(player: Entity, overlay: Overlay, controller: &mut ControllerInput, writers: &mut ActionWriters) {
    controller.enter_ui_mode();
    log(&format!("Player {:?}: opening {:?} overlay", player, overlay));
    writers.overlay.write(OverlayRequested { player, overlay });
}

fn reject(writers: &mut ActionWriters, player: Entity, error: GameplayError) {
    log_warning(&format!("Player {:?}: {}", player, error));
    writers.rejected.write(ActionRejected {
        character: player,
        error,
    });
}
