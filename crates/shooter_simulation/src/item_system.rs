//! Weapon prototypes: static weapon definitions
//!
//! # Architecture
//!
//! **WeaponPrototype**: immutable blueprint (type, ammo capacities, reload time,
//! socket). Stored in the `WeaponPrototypes` resource, keyed by `PrototypeId`.
//!
//! **Runtime weapon**: a spawned entity carrying `WeaponState` built from the
//! prototype. Backpack items only reference the prototype id.
//!
//! Prototypes are hardcoded in `WeaponPrototypes::default()`; a config file can
//! add new ones or override presets by id.
//!
//! ```ignore
//! let prototype = prototypes.get(&"pistol_basic".into())?;
//! let state = WeaponState::from_prototype(prototype);
//! ```

use bevy::prelude::*;
use serde::Deserialize;
use std::collections::HashMap;

use crate::combat::WeaponType;

// ============================================================================
// PrototypeId
// ============================================================================

/// Prototype identifier, e.g. "pistol_basic", "rifle_basic".
#[derive(Clone, Debug, PartialEq, Eq, Hash, Reflect, Deserialize)]
#[serde(transparent)]
pub struct PrototypeId(pub String);

impl From<&str> for PrototypeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl std::fmt::Display for PrototypeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// WeaponPrototype
// ============================================================================

pub const DEFAULT_ATTACH_SOCKET: &str = "WeaponPoint";

/// Static weapon definition.
#[derive(Clone, Debug, PartialEq, Reflect, Deserialize)]
pub struct WeaponPrototype {
    pub id: PrototypeId,
    pub name: String,
    pub weapon_type: WeaponType,
    #[serde(default = "default_max_ammo_in_mag")]
    pub max_ammo_in_mag: u32,
    #[serde(default = "default_max_ammo_in_backpack")]
    pub max_ammo_in_backpack: u32,
    /// Seconds between reload pull-down and pull-up
    #[serde(default = "default_reload_time")]
    pub reload_time: f32,
    /// Socket on the first-person mesh the weapon attaches to
    #[serde(default = "default_attach_socket")]
    pub attach_socket: String,
}

fn default_max_ammo_in_mag() -> u32 {
    6
}

fn default_max_ammo_in_backpack() -> u32 {
    30
}

fn default_reload_time() -> f32 {
    2.0
}

fn default_attach_socket() -> String {
    DEFAULT_ATTACH_SOCKET.to_string()
}

impl WeaponPrototype {
    /// Six-shooter with the stock ammo setup (6 in mag, 30 in backpack, 2s reload).
    pub fn pistol() -> Self {
        Self {
            id: "pistol_basic".into(),
            name: "Basic Pistol".to_string(),
            weapon_type: WeaponType::Pistol,
            max_ammo_in_mag: default_max_ammo_in_mag(),
            max_ammo_in_backpack: default_max_ammo_in_backpack(),
            reload_time: default_reload_time(),
            attach_socket: default_attach_socket(),
        }
    }

    pub fn rifle() -> Self {
        Self {
            id: "rifle_basic".into(),
            name: "Basic Rifle".to_string(),
            weapon_type: WeaponType::Rifle,
            max_ammo_in_mag: 30,
            max_ammo_in_backpack: 90,
            reload_time: 2.5,
            attach_socket: default_attach_socket(),
        }
    }

    pub fn shotgun() -> Self {
        Self {
            id: "shotgun_basic".into(),
            name: "Pump Shotgun".to_string(),
            weapon_type: WeaponType::Shotgun,
            max_ammo_in_mag: 8,
            max_ammo_in_backpack: 32,
            reload_time: 3.0,
            attach_socket: default_attach_socket(),
        }
    }

    /// Values a spawned weapon can't work with.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_ammo_in_mag == 0 {
            return Err(format!("prototype {}: max_ammo_in_mag must be > 0", self.id));
        }
        if !(self.reload_time > 0.0) {
            return Err(format!("prototype {}: reload_time must be > 0", self.id));
        }
        Ok(())
    }
}

// ============================================================================
// WeaponPrototypes (Resource)
// ============================================================================

/// Prototype lookup table.
#[derive(Resource, Clone, Debug)]
pub struct WeaponPrototypes {
    prototypes: HashMap<PrototypeId, WeaponPrototype>,
}

impl WeaponPrototypes {
    pub fn new() -> Self {
        Self {
            prototypes: HashMap::new(),
        }
    }

    pub fn get(&self, id: &PrototypeId) -> Option<&WeaponPrototype> {
        self.prototypes.get(id)
    }

    /// Insert or replace (by id).
    pub fn add(&mut self, prototype: WeaponPrototype) {
        self.prototypes.insert(prototype.id.clone(), prototype);
    }

    pub fn len(&self) -> usize {
        self.prototypes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prototypes.is_empty()
    }

    /// Presets plus `extra` (later entries win on duplicate ids).
    pub fn with_overrides(extra: &[WeaponPrototype]) -> Self {
        let mut prototypes = Self::default();
        for prototype in extra {
            prototypes.add(prototype.clone());
        }
        prototypes
    }
}

impl Default for WeaponPrototypes {
    fn default() -> Self {
        let mut prototypes = Self::new();
        prototypes.add(WeaponPrototype::pistol());
        prototypes.add(WeaponPrototype::rifle());
        prototypes.add(WeaponPrototype::shotgun());
        prototypes
    }
}

// ============================================================================
// Tests
// ============================================================================
