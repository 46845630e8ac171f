//! Combat events
//!
//! # Architecture
//!
//! **Intents (in):** emitted by input dispatch, AI or a host UI.
//! - `EquipWeaponIntent` → `CombatState::equip_weapon`
//! - `ReloadWeaponIntent` → `CombatState::reload_weapon`
//! - `FireWeaponIntent` → `CombatState::fire_weapon`
//!
//! **Outputs (out):** published once, any number of readers.
//! - `WeaponFired`, `WeaponSwapped`, `ReloadFinished`
//! - `ActionRejected` for every refused intent

use bevy::prelude::*;

use crate::combat::WeaponType;
use crate::error::GameplayError;

// ============================================================================
// Intents
// ============================================================================

/// Switch to `weapon` (`None` holsters the current one).
#[derive(Event, Clone, Debug)]
pub struct EquipWeaponIntent {
    pub character: Entity,
    pub weapon: Option<Entity>,
}

#[derive(Event, Clone, Debug)]
pub struct ReloadWeaponIntent {
    pub character: Entity,
}

#[derive(Event, Clone, Debug)]
pub struct FireWeaponIntent {
    pub character: Entity,
}

// ============================================================================
// Outputs
// ============================================================================

/// A round left the magazine.
#[derive(Event, Clone, Debug, PartialEq)]
pub struct WeaponFired {
    pub character: Entity,
    pub weapon: Entity,
    pub weapon_type: WeaponType,
}

/// Equip checkpoint: `current` is now the visible weapon.
#[derive(Event, Clone, Debug, PartialEq)]
pub struct WeaponSwapped {
    pub character: Entity,
    pub previous: Option<Entity>,
    pub current: Option<Entity>,
}

/// Magazine refilled at the end of a reload.
#[derive(Event, Clone, Debug, PartialEq)]
pub struct ReloadFinished {
    pub character: Entity,
    pub weapon: Entity,
    /// Rounds moved from the backpack into the magazine
    pub transferred: u32,
}

/// An intent was refused; state is unchanged.
#[derive(Event, Clone, Debug, PartialEq)]
pub struct ActionRejected {
    pub character: Entity,
    pub error: GameplayError,
}
