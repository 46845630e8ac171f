//! Weapon inventory components
//!
//! # Architecture
//!
//! **Backpack**: every weapon the character owns, as prototype references.
//! - Insertion order is load-bearing: the item index is the spawn key and is
//!   stored on the spawned weapon as `BackpackIndex`
//! - `is_selected` marks weapons picked in the selection menu (up to
//!   `selection_capacity`)
//! - `slot` 1..=3 puts the weapon into an equip slot on spawn; any other
//!   value keeps it in the backpack only
//!
//! **EquipSlots**: the three spawned weapons reachable through hotkeys.
//! Weapons are child entities of the character; slots only reference them.

use bevy::prelude::*;
use serde::Deserialize;

use crate::error::{GameplayError, GameplayResult};
use crate::item_system::PrototypeId;
use crate::logger::log_error;

pub const DEFAULT_SELECTION_CAPACITY: usize = 3;

// ============================================================================
// Backpack
// ============================================================================

#[derive(Clone, Debug, PartialEq, Reflect, Deserialize)]
pub struct BackpackSlotItem {
    pub prototype: PrototypeId,
    #[serde(default)]
    pub is_selected: bool,
    /// Equip slot (1..=3); 0 = not slotted
    #[serde(default)]
    pub slot: u8,
}

impl BackpackSlotItem {
    pub fn new(prototype: impl Into<PrototypeId>, is_selected: bool, slot: u8) -> Self {
        Self {
            prototype: prototype.into(),
            is_selected,
            slot,
        }
    }
}

/// Result of `Backpack::can_add_to_selection`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SelectionStatus {
    /// Items currently selected
    pub selected: usize,
    /// One more item fits into the selection
    pub can_add: bool,
}

#[derive(Component, Clone, Debug, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Backpack {
    pub items: Vec<BackpackSlotItem>,
    pub selection_capacity: usize,
}

impl Default for Backpack {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl Backpack {
    pub fn new(items: Vec<BackpackSlotItem>) -> Self {
        Self::with_capacity(items, DEFAULT_SELECTION_CAPACITY)
    }

    pub fn with_capacity(items: Vec<BackpackSlotItem>, selection_capacity: usize) -> Self {
        Self {
            items,
            selection_capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&BackpackSlotItem> {
        self.items.get(index)
    }

    /// Counts selected items and whether one more may be selected.
    ///
    /// An empty backpack means the character was set up without weapons.
    pub fn can_add_to_selection(&self) -> GameplayResult<SelectionStatus> {
        if self.items.is_empty() {
            log_error("Backpack is empty: character has no weapons configured");
            return Err(GameplayError::EmptyBackpack);
        }

        let selected = self.items.iter().filter(|item| item.is_selected).count();
        Ok(SelectionStatus {
            selected,
            can_add: selected < self.selection_capacity,
        })
    }

    /// Overwrite selection flag and slot of one item.
    pub fn set_item_selected(&mut self, index: usize, selected: bool, slot: u8) -> GameplayResult<()> {
        if self.items.is_empty() {
            return Err(GameplayError::EmptyBackpack);
        }

        let len = self.items.len();
        let Some(item) = self.items.get_mut(index) else {
            return Err(GameplayError::BackpackIndexOutOfRange { index, len });
        };

        item.is_selected = selected;
        item.slot = slot;
        Ok(())
    }
}

// ============================================================================
// EquipSlots (hotkeys 1-3)
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Reflect)]
pub enum EquipSlot {
    One,   // [1]
    Two,   // [2]
    Three, // [3]
}

impl EquipSlot {
    pub const ALL: [EquipSlot; 3] = [EquipSlot::One, EquipSlot::Two, EquipSlot::Three];

    /// Convert 1-based slot number → slot
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            1 => Some(EquipSlot::One),
            2 => Some(EquipSlot::Two),
            3 => Some(EquipSlot::Three),
            _ => None,
        }
    }

    /// Convert slot → 1-based slot number
    pub fn to_index(self) -> u8 {
        match self {
            EquipSlot::One => 1,
            EquipSlot::Two => 2,
            EquipSlot::Three => 3,
        }
    }

    fn position(self) -> usize {
        self.to_index() as usize - 1
    }
}

#[derive(Component, Clone, Debug, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct EquipSlots {
    slots: [Option<Entity>; 3],
}

impl EquipSlots {
    pub fn get(&self, slot: EquipSlot) -> Option<Entity> {
        self.slots[slot.position()]
    }

    /// Store `weapon` in `slot`, returning the previous occupant.
    pub fn set(&mut self, slot: EquipSlot, weapon: Option<Entity>) -> Option<Entity> {
        std::mem::replace(&mut self.slots[slot.position()], weapon)
    }

    pub fn weapons(&self) -> impl Iterator<Item = Entity> + '_ {
        self.slots.iter().flatten().copied()
    }

    pub fn slot_of(&self, weapon: Entity) -> Option<EquipSlot> {
        EquipSlot::ALL
            .into_iter()
            .find(|slot| self.get(*slot) == Some(weapon))
    }

    /// Clear every slot holding `weapon`.
    pub fn forget(&mut self, weapon: Entity) -> bool {
        let mut changed = false;
        for slot in self.slots.iter_mut() {
            if *slot == Some(weapon) {
                *slot = None;
                changed = true;
            }
        }
        changed
    }
}

// ============================================================================
// Tests
// ============================================================================
