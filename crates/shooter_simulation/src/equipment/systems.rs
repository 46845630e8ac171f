//! Equipment system implementations
//!
//! - `process_select_backpack_item` — selection menu changes
//! - `spawn_and_assign_to_slots` — spawn slotted weapons

use bevy::prelude::*;

use crate::combat::{ActionRejected, WeaponState};
use crate::components::{Attachment, Backpack, BackpackIndex, EquipSlot, EquipSlots, WeaponVisibility};
use crate::equipment::events::*;
use crate::error::GameplayError;
use crate::item_system::WeaponPrototypes;
use crate::logger::{log, log_warning};

fn reject(rejected: &mut EventWriter<ActionRejected>, character: Entity, error: GameplayError) {
    log_warning(&format!("Character {:?}: {}", character, error));
    rejected.write(ActionRejected { character, error });
}

// ============================================================================
// Selection
// ============================================================================

pub fn process_select_backpack_item(
    mut intents: EventReader<SelectBackpackItemIntent>,
    mut backpacks: Query<&mut Backpack>,
    mut rejected: EventWriter<ActionRejected>,
) {
    for intent in intents.read() {
        let Ok(mut backpack) = backpacks.get_mut(intent.character) else {
            reject(&mut rejected, intent.character, GameplayError::MissingInventory(intent.character));
            continue;
        };

        let newly_selected = intent.selected
            && backpack
                .get(intent.index)
                .is_some_and(|item| !item.is_selected);

        let result = backpack.can_add_to_selection().and_then(|status| {
            if newly_selected && !status.can_add {
                return Err(GameplayError::SelectionFull {
                    selected: status.selected,
                    capacity: backpack.selection_capacity,
                });
            }
            Ok(())
        });

        match result.and_then(|()| backpack.set_item_selected(intent.index, intent.selected, intent.slot)) {
            Ok(()) => log(&format!(
                "Character {:?}: backpack item {} selected={} slot={}",
                intent.character, intent.index, intent.selected, intent.slot
            )),
            Err(error) => reject(&mut rejected, intent.character, error),
        }
    }
}

// ============================================================================
// Spawn
// ============================================================================

pub fn spawn_and_assign_to_slots(
    mut commands: Commands,
    mut intents: EventReader<SpawnLoadoutIntent>,
    mut characters: Query<(&Backpack, &mut EquipSlots)>,
    prototypes: Res<WeaponPrototypes>,
    mut rejected: EventWriter<ActionRejected>,
) {
    for intent in intents.read() {
        let Ok((backpack, mut slots)) = characters.get_mut(intent.character) else {
            reject(&mut rejected, intent.character, GameplayError::MissingInventory(intent.character));
            continue;
        };

        for (index, item) in backpack.items.iter().enumerate() {
            let Some(slot) = EquipSlot::from_index(item.slot) else {
                continue;
            };

            let Some(prototype) = prototypes.get(&item.prototype) else {
                let error = GameplayError::UnknownPrototype(item.prototype.to_string());
                reject(&mut rejected, intent.character, error);
                continue;
            };

            let weapon = commands
                .spawn((
                    Name::new(prototype.name.clone()),
                    WeaponState::from_prototype(prototype),
                    BackpackIndex(index),
                    Attachment::weapon(prototype),
                    WeaponVisibility::hidden(),
                ))
                .id();
            commands.entity(intent.character).add_child(weapon);

            if let Some(old) = slots.set(slot, Some(weapon)) {
                commands.entity(old).despawn();
                log(&format!("Slot {:?}: replaced weapon {:?}", slot, old));
            }

            log(&format!(
                "✅ Spawned {} ({:?}) into slot {:?} at {}",
                prototype.name, weapon, slot, prototype.attach_socket
            ));
        }
    }
}
