//! Simulation configuration (TOML)
//!
//! Every field has a default, so an empty file is a valid config:
//!
//! ```toml
//! tick_hz = 60.0
//! log_level = "info"
//! selection_capacity = 3
//!
//! [handling]
//! equip_duration = 1.0
//! swap_checkpoint = 0.25
//!
//! [input]
//! controlling_device = "mouse"
//! pitch_limit = 89.0
//! mouse = { min = 0.1, max = 2.0, current = 1.0 }
//!
//! [key_bindings]
//! F = "fire"
//!
//! [[weapons]]
//! id = "revolver"
//! name = "Revolver"
//! weapon_type = "pistol"
//!
//! [[loadout]]
//! prototype = "revolver"
//! is_selected = true
//! slot = 1
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use bevy::prelude::*;
use serde::Deserialize;
use thiserror::Error;

use crate::combat::HandlingConfig;
use crate::components::{BackpackSlotItem, DEFAULT_SELECTION_CAPACITY};
use crate::input::{InputConfig, PlayerAction};
use crate::item_system::{WeaponPrototype, WeaponPrototypes};
use crate::logger::LogLevel;

pub const DEFAULT_TICK_HZ: f64 = 60.0;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Resource, Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// FixedUpdate rate
    pub tick_hz: f64,
    pub log_level: LogLevel,
    /// Max selected backpack items
    pub selection_capacity: usize,
    pub handling: HandlingConfig,
    pub input: InputConfig,
    /// Merged over the default key bindings
    pub key_bindings: HashMap<String, PlayerAction>,
    /// Added to (or replacing, by id) the weapon presets
    pub weapons: Vec<WeaponPrototype>,
    /// Player backpack at spawn
    pub loadout: Vec<BackpackSlotItem>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_hz: DEFAULT_TICK_HZ,
            log_level: LogLevel::Info,
            selection_capacity: DEFAULT_SELECTION_CAPACITY,
            handling: HandlingConfig::default(),
            input: InputConfig::default(),
            key_bindings: HashMap::new(),
            weapons: Vec::new(),
            loadout: default_loadout(),
        }
    }
}

/// Pistol in slot 1, rifle in slot 2, shotgun in slot 3.
pub fn default_loadout() -> Vec<BackpackSlotItem> {
    vec![
        BackpackSlotItem::new("pistol_basic", true, 1),
        BackpackSlotItem::new("rifle_basic", true, 2),
        BackpackSlotItem::new("shotgun_basic", true, 3),
    ]
}

impl SimulationConfig {
    /// Parse and validate.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Presets merged with the configured weapons.
    pub fn prototypes(&self) -> WeaponPrototypes {
        WeaponPrototypes::with_overrides(&self.weapons)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.tick_hz > 0.0) {
            return Err(ConfigError::Invalid(format!("tick_hz must be > 0 (got {})", self.tick_hz)));
        }
        if self.selection_capacity == 0 {
            return Err(ConfigError::Invalid("selection_capacity must be > 0".to_string()));
        }

        self.handling.validate().map_err(ConfigError::Invalid)?;
        self.input.validate().map_err(ConfigError::Invalid)?;
        for prototype in &self.weapons {
            prototype.validate().map_err(ConfigError::Invalid)?;
        }

        let prototypes = self.prototypes();
        for item in &self.loadout {
            if prototypes.get(&item.prototype).is_none() {
                return Err(ConfigError::Invalid(format!(
                    "loadout references unknown weapon {}",
                    item.prototype
                )));
            }
        }

        let selected = self.loadout.iter().filter(|item| item.is_selected).count();
        if selected > self.selection_capacity {
            return Err(ConfigError::Invalid(format!(
                "loadout selects {} weapons, capacity is {}",
                selected, self.selection_capacity
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::WeaponType;
    use crate::input::ControllingDevice;

    #[test]
    fn test_empty_file_is_default() {
        let config = SimulationConfig::from_toml_str("").unwrap();
        assert_eq!(config, SimulationConfig::default());
        assert_eq!(config.loadout.len(), 3);
    }

    #[test]
    fn test_full_config_parses() {
        let source = r#"
            tick_hz = 30.0
            log_level = "warning"
            selection_capacity = 2

            [handling]
            equip_duration = 0.8
            swap_checkpoint = 0.5
            equip_curve = [
                { time = 0.0, value = 0.0 },
                { time = 0.5, value = 1.0 },
                { time = 1.0, value = 0.0 },
            ]

            [input]
            controlling_device = "gyro"
            pitch_limit = 60.0

            [key_bindings]
            F = "fire"
            Space = "reload"

            [[weapons]]
            id = "revolver"
            name = "Revolver"
            weapon_type = "pistol"

            [[loadout]]
            prototype = "revolver"
            is_selected = true
            slot = 1

            [[loadout]]
            prototype = "shotgun_basic"
            slot = 5
        "#;

        let config = SimulationConfig::from_toml_str(source).unwrap();

        assert_eq!(config.tick_hz, 30.0);
        assert_eq!(config.log_level, LogLevel::Warning);
        assert_eq!(config.handling.equip_duration, 0.8);
        assert_eq!(config.handling.sample_equip_curve(0.5), 1.0);
        // Unset handling fields keep their defaults
        assert_eq!(config.handling.reload_down_duration, 0.5);
        assert_eq!(config.input.controlling_device, ControllingDevice::Gyro);
        assert_eq!(config.input.mouse, InputConfig::default().mouse);
        assert_eq!(config.key_bindings.get("F"), Some(&PlayerAction::Fire));

        let revolver = config.prototypes().get(&"revolver".into()).cloned().unwrap();
        assert_eq!(revolver.weapon_type, WeaponType::Pistol);
        assert_eq!(revolver.max_ammo_in_mag, 6);
        assert_eq!(revolver.attach_socket, "WeaponPoint");

        assert_eq!(config.loadout[1], BackpackSlotItem::new("shotgun_basic", false, 5));
    }

    #[test]
    fn test_unknown_loadout_weapon_is_invalid() {
        let source = r#"
            [[loadout]]
            prototype = "railgun"
            slot = 1
        "#;
        assert!(matches!(
            SimulationConfig::from_toml_str(source),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_bad_values_are_invalid() {
        assert!(matches!(
            SimulationConfig::from_toml_str("tick_hz = 0.0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            SimulationConfig::from_toml_str("[handling]\nswap_checkpoint = 2.0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            SimulationConfig::from_toml_str("selection_capacity = 1"),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_syntax_error_is_parse_error() {
        assert!(matches!(
            SimulationConfig::from_toml_str("tick_hz = = 60"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        assert!(matches!(
            SimulationConfig::load("/nonexistent/shooter.toml"),
            Err(ConfigError::Io { .. })
        ));
    }
}
