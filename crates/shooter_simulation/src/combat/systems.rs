//! Combat systems
//!
//! # Systems (FixedUpdate, chained)
//!
//! - `process_equip_intents` — start/restart equip sequences
//! - `process_reload_intents` — start reloads
//! - `process_fire_intents` — fire or auto-reload
//! - `advance_weapon_handling` — tick sequencers, apply checkpoints to weapons
//! - `prune_despawned_weapons` — drop references to despawned weapons

use bevy::prelude::*;

use crate::combat::events::*;
use crate::combat::handling::{CombatState, FireOutcome, HandlingConfig, HandlingEvent};
use crate::combat::WeaponState;
use crate::components::{EquipSlots, WeaponVisibility};
use crate::error::GameplayError;
use crate::logger::{log, log_error, log_info, log_warning};

fn reject(rejected: &mut EventWriter<ActionRejected>, character: Entity, error: GameplayError) {
    log_warning(&format!("Character {:?}: {}", character, error));
    rejected.write(ActionRejected { character, error });
}

// ============================================================================
// Intents
// ============================================================================

pub fn process_equip_intents(
    mut intents: EventReader<EquipWeaponIntent>,
    mut characters: Query<&mut CombatState>,
    weapons: Query<(), With<WeaponState>>,
    mut rejected: EventWriter<ActionRejected>,
) {
    for intent in intents.read() {
        let Ok(mut state) = characters.get_mut(intent.character) else {
            log_error(&format!("Entity {:?} missing CombatState", intent.character));
            continue;
        };

        if let Some(weapon) = intent.weapon {
            if !weapons.contains(weapon) {
                reject(&mut rejected, intent.character, GameplayError::WeaponNotFound(weapon));
                continue;
            }
        }

        match state.equip_weapon(intent.weapon) {
            Ok(()) => log(&format!(
                "Character {:?}: equipping {:?} (current {:?})",
                intent.character, intent.weapon, state.current_weapon
            )),
            Err(error) => reject(&mut rejected, intent.character, error),
        }
    }
}

pub fn process_reload_intents(
    mut intents: EventReader<ReloadWeaponIntent>,
    mut characters: Query<&mut CombatState>,
    weapons: Query<&WeaponState>,
    mut rejected: EventWriter<ActionRejected>,
) {
    for intent in intents.read() {
        let Ok(mut state) = characters.get_mut(intent.character) else {
            log_error(&format!("Entity {:?} missing CombatState", intent.character));
            continue;
        };

        let result = match state.current_weapon {
            Some(weapon) => match weapons.get(weapon) {
                Ok(weapon_state) => state.reload_weapon(weapon_state.reload_time),
                Err(_) => Err(GameplayError::WeaponNotFound(weapon)),
            },
            None if state.is_reloading => Err(GameplayError::AlreadyReloading),
            None => Err(GameplayError::NoWeaponEquipped),
        };

        match result {
            Ok(()) => log(&format!("Character {:?}: reload started", intent.character)),
            Err(error) => reject(&mut rejected, intent.character, error),
        }
    }
}

pub fn process_fire_intents(
    mut intents: EventReader<FireWeaponIntent>,
    mut characters: Query<&mut CombatState>,
    mut weapons: Query<&mut WeaponState>,
    mut fired: EventWriter<WeaponFired>,
    mut rejected: EventWriter<ActionRejected>,
) {
    for intent in intents.read() {
        let Ok(mut state) = characters.get_mut(intent.character) else {
            log_error(&format!("Entity {:?} missing CombatState", intent.character));
            continue;
        };

        let result = match state.current_weapon {
            Some(weapon) => match weapons.get_mut(weapon) {
                Ok(mut weapon_state) => state.fire_weapon(&mut weapon_state).map(|outcome| (weapon, outcome)),
                Err(_) => Err(GameplayError::WeaponNotFound(weapon)),
            },
            None if !state.can_fire => Err(GameplayError::CannotFire),
            None => Err(GameplayError::NoWeaponEquipped),
        };

        match result {
            Ok((weapon, FireOutcome::Fired(weapon_type))) => {
                fired.write(WeaponFired {
                    character: intent.character,
                    weapon,
                    weapon_type,
                });
            }
            Ok((weapon, FireOutcome::ReloadStarted)) => {
                log_info(&format!(
                    "Character {:?}: magazine of {:?} empty, reloading",
                    intent.character, weapon
                ));
            }
            Err(error) => reject(&mut rejected, intent.character, error),
        }
    }
}

// ============================================================================
// Sequencer
// ============================================================================

/// Advance every character's equip/reload tracks by the fixed delta and
/// apply the checkpoints to weapon entities.
pub fn advance_weapon_handling(
    time: Res<Time>,
    config: Res<HandlingConfig>,
    mut characters: Query<(Entity, &mut CombatState, Option<&EquipSlots>)>,
    mut weapons: Query<&mut WeaponState>,
    mut visibility: Query<&mut WeaponVisibility>,
    mut swapped: EventWriter<WeaponSwapped>,
    mut reloaded: EventWriter<ReloadFinished>,
) {
    let delta = time.delta_secs();

    for (character, mut state, slots) in characters.iter_mut() {
        if state.equip.is_none() && state.reload.is_none() {
            continue;
        }

        for event in state.advance(delta, &config) {
            match event {
                HandlingEvent::WeaponSwapped { previous, current } => {
                    let others = slots.into_iter().flat_map(|slots| slots.weapons()).chain(previous);
                    for weapon in others {
                        if let Ok(mut shown) = visibility.get_mut(weapon) {
                            shown.visible = false;
                        }
                    }
                    if let Some(weapon) = current {
                        if let Ok(mut shown) = visibility.get_mut(weapon) {
                            shown.visible = true;
                        }
                    }

                    log(&format!("Character {:?}: swapped {:?} → {:?}", character, previous, current));
                    swapped.write(WeaponSwapped {
                        character,
                        previous,
                        current,
                    });
                }
                HandlingEvent::EquipFinished { weapon } => {
                    log(&format!("Character {:?}: equip of {:?} finished", character, weapon));
                }
                HandlingEvent::ReloadFinished { weapon } => {
                    let Ok(mut weapon_state) = weapons.get_mut(weapon) else {
                        log_error(&format!("Reload finished for missing weapon {:?}", weapon));
                        continue;
                    };

                    let transferred = weapon_state.reload();
                    log_info(&format!(
                        "Character {:?}: reloaded {} rounds ({} left in backpack)",
                        character, transferred, weapon_state.current_ammo_in_backpack
                    ));
                    reloaded.write(ReloadFinished {
                        character,
                        weapon,
                        transferred,
                    });
                }
                HandlingEvent::ReloadAborted { weapon } => {
                    log_warning(&format!("Character {:?}: reload of {:?} aborted", character, weapon));
                }
            }
        }
    }
}

// ============================================================================
// Weapon lifecycle
// ============================================================================

/// Clear slot and sequencer references to weapons that no longer exist.
///
/// Checked against live weapons every tick: removal events only survive two
/// frames and the host may run several frames per fixed tick.
pub fn prune_despawned_weapons(
    weapons: Query<(), With<WeaponState>>,
    mut characters: Query<(Entity, Option<&mut CombatState>, Option<&mut EquipSlots>)>,
) {
    for (character, state, slots) in characters.iter_mut() {
        if let Some(mut slots) = slots {
            let dangling: Vec<Entity> = slots.weapons().filter(|weapon| !weapons.contains(*weapon)).collect();
            for weapon in dangling {
                let slot = slots.slot_of(weapon);
                slots.forget(weapon);
                log(&format!(
                    "Character {:?}: dropped despawned weapon {:?} from slot {:?}",
                    character, weapon, slot
                ));
            }
        }

        if let Some(mut state) = state {
            let dangling: Vec<Entity> = state
                .referenced_weapons()
                .filter(|weapon| !weapons.contains(*weapon))
                .collect();
            for weapon in dangling {
                if state.forget_weapon(weapon) {
                    log(&format!("Character {:?}: dropped despawned weapon {:?}", character, weapon));
                }
            }
        }
    }
}
