//! Weapon state component (ammo + reload data)
//!
//! Lives on every spawned weapon entity. Only `fire` and `reload` mutate the
//! counters; the character's sequencer decides when they may run.
//!
//! Invariants:
//! - `current_ammo_in_mag <= max_ammo_in_mag`
//! - `current_ammo_in_backpack <= max_ammo_in_backpack`

use bevy::prelude::*;
use serde::Deserialize;

use crate::error::{GameplayError, GameplayResult};
use crate::item_system::WeaponPrototype;

/// Weapon archetype, published with every shot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeaponType {
    Pistol,
    Rifle,
    Shotgun,
}

#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
pub struct WeaponState {
    pub weapon_type: WeaponType,

    /// Rounds loaded and immediately fireable
    pub current_ammo_in_mag: u32,
    pub max_ammo_in_mag: u32,

    /// Reserve used to refill the magazine
    pub current_ammo_in_backpack: u32,
    pub max_ammo_in_backpack: u32,

    /// Delay between pull-down and pull-up of a reload (seconds)
    pub reload_time: f32,
}

impl WeaponState {
    /// Fresh weapon: full magazine, full backpack.
    pub fn new(weapon_type: WeaponType, max_ammo_in_mag: u32, max_ammo_in_backpack: u32, reload_time: f32) -> Self {
        Self {
            weapon_type,
            current_ammo_in_mag: max_ammo_in_mag,
            max_ammo_in_mag,
            current_ammo_in_backpack: max_ammo_in_backpack,
            max_ammo_in_backpack,
            reload_time,
        }
    }

    pub fn from_prototype(prototype: &WeaponPrototype) -> Self {
        Self::new(
            prototype.weapon_type,
            prototype.max_ammo_in_mag,
            prototype.max_ammo_in_backpack,
            prototype.reload_time,
        )
    }

    /// Consume one round from the magazine.
    ///
    /// Callers check `has_ammo_in_mag` first; an empty magazine is reported
    /// instead of underflowing.
    pub fn fire(&mut self) -> GameplayResult<()> {
        if self.current_ammo_in_mag == 0 {
            return Err(GameplayError::MagazineEmpty);
        }
        self.current_ammo_in_mag -= 1;
        Ok(())
    }

    /// Refill the magazine from the backpack.
    ///
    /// Overwrites the magazine (rounds still loaded are discarded), so the
    /// result is `min(backpack, max_mag)` regardless of what was loaded.
    /// Returns the number of rounds moved out of the backpack.
    pub fn reload(&mut self) -> u32 {
        let transferred = self.current_ammo_in_backpack.min(self.max_ammo_in_mag);
        self.current_ammo_in_mag = transferred;
        self.current_ammo_in_backpack -= transferred;
        transferred
    }

    /// `(has_ammo, mag_is_full)`
    pub fn has_ammo_in_mag(&self) -> (bool, bool) {
        (
            self.current_ammo_in_mag > 0,
            self.current_ammo_in_mag == self.max_ammo_in_mag,
        )
    }

    pub fn has_ammo_in_backpack(&self) -> bool {
        self.current_ammo_in_backpack > 0
    }
}
