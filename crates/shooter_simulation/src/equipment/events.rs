//! Equipment events
//!
//! - `SpawnLoadoutIntent` → spawn the backpack's slotted weapons into equip slots
//! - `SelectBackpackItemIntent` → mark a backpack item as selected (weapon selection menu)

use bevy::prelude::*;

/// Spawn weapons for every backpack item assigned to slot 1..=3.
///
/// # Flow
/// 1. Look up the item's prototype (unknown ids are logged and skipped)
/// 2. Despawn the weapon already occupying the slot, if any
/// 3. Spawn the weapon hidden, as a child of the character
/// 4. Store it in `EquipSlots`
#[derive(Event, Clone, Debug)]
pub struct SpawnLoadoutIntent {
    pub character: Entity,
}

/// Change selection flag and equip slot of one backpack item.
///
/// Selecting an item that isn't selected yet is refused once the selection
/// is full.
#[derive(Event, Clone, Debug)]
pub struct SelectBackpackItemIntent {
    pub character: Entity,
    pub index: usize,
    pub selected: bool,
    pub slot: u8,
}
