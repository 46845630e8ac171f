//! Gameplay error types.
//!
//! Every rejected action leaves state untouched and reports one of these.
//! ECS systems log them and forward them as `ActionRejected` events.

use bevy::prelude::Entity;
use thiserror::Error;

use crate::input::ControllingDevice;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GameplayError {
    // === Weapon ===
    #[error("magazine is empty")]
    MagazineEmpty,

    // === Inventory ===
    #[error("backpack is empty")]
    EmptyBackpack,

    #[error("backpack index {index} out of range (len {len})")]
    BackpackIndexOutOfRange { index: usize, len: usize },

    #[error("selection is full ({selected}/{capacity})")]
    SelectionFull { selected: usize, capacity: usize },

    #[error("unknown weapon prototype {0:?}")]
    UnknownPrototype(String),

    #[error("entity {0:?} has no Backpack/EquipSlots")]
    MissingInventory(Entity),

    // === Equip ===
    #[error("weapon {0:?} is already equipped")]
    AlreadyEquipped(Entity),

    #[error("weapon {0:?} is already being equipped")]
    AlreadyEquipping(Entity),

    #[error("nothing to equip and nothing equipped")]
    NothingToEquip,

    #[error("cannot change weapon while reloading")]
    ReloadInProgress,

    // === Reload ===
    #[error("already reloading")]
    AlreadyReloading,

    #[error("weapon is down (swap already happened)")]
    WeaponIsDown,

    #[error("reload blocked: reloading or changing weapon")]
    ReloadBlocked,

    #[error("magazine is full")]
    MagazineFull,

    // === Fire ===
    #[error("character can't fire")]
    CannotFire,

    #[error("no weapon equipped")]
    NoWeaponEquipped,

    #[error("no ammo for current weapon")]
    OutOfAmmo,

    #[error("weapon entity {0:?} not found")]
    WeaponNotFound(Entity),

    // === Input ===
    #[error("device {0:?} is already the controlling device")]
    DeviceAlreadyActive(ControllingDevice),
}

pub type GameplayResult<T> = Result<T, GameplayError>;
