//! Player controller components and input configuration
//!
//! # Aim input
//!
//! Three devices feed aim, only the `controlling_device` is handled:
//! - **Mouse**: delta × sensitivity
//! - **Touch**: finger delta / sensitivity (higher value = slower aim)
//! - **Gyro**: difference between consecutive scaled tilt readings
//!
//! Handlers return the aim delta as `Vec2(yaw, pitch)` in degrees, or `None`
//! when the input wasn't handled (wrong device, pad, or touch phase).

use std::collections::HashMap;

use bevy::prelude::*;
use serde::Deserialize;

use crate::error::{GameplayError, GameplayResult};

// ============================================================================
// Devices & sensitivity
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControllingDevice {
    #[default]
    Mouse,
    Touch,
    Gyro,
}

/// Sensitivity of one device.
///
/// `min`/`max` are the slider ends as configured and may be given in either
/// order (touch runs 15 → 5 because touch divides by sensitivity).
#[derive(Debug, Clone, Copy, PartialEq, Reflect, Deserialize)]
pub struct Sensitivity {
    pub min: f32,
    pub max: f32,
    pub current: f32,
}

impl Sensitivity {
    pub const fn new(min: f32, max: f32, current: f32) -> Self {
        Self { min, max, current }
    }

    /// Clamp into the configured range, whatever the bound order.
    pub fn clamp(&self, value: f32) -> f32 {
        let (low, high) = if self.min <= self.max {
            (self.min, self.max)
        } else {
            (self.max, self.min)
        };
        value.clamp(low, high)
    }
}

// ============================================================================
// InputConfig (Resource)
// ============================================================================

#[derive(Resource, Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub controlling_device: ControllingDevice,
    pub mouse: Sensitivity,
    pub touch: Sensitivity,
    pub gyro: Sensitivity,
    /// Pitch is clamped to ±pitch_limit degrees
    pub pitch_limit: f32,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            controlling_device: ControllingDevice::Mouse,
            mouse: Sensitivity::new(0.1, 2.0, 1.0),
            touch: Sensitivity::new(15.0, 5.0, 10.0),
            gyro: Sensitivity::new(20.0, 60.0, 40.0),
            pitch_limit: 89.0,
        }
    }
}

impl InputConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !(self.pitch_limit > 0.0 && self.pitch_limit <= 90.0) {
            return Err(format!("input.pitch_limit must be within (0, 90] (got {})", self.pitch_limit));
        }
        for (name, sensitivity) in [("mouse", self.mouse), ("touch", self.touch), ("gyro", self.gyro)] {
            if sensitivity.clamp(sensitivity.current) != sensitivity.current {
                return Err(format!(
                    "input.{name}.current {} is outside [{}, {}]",
                    sensitivity.current, sensitivity.min, sensitivity.max
                ));
            }
        }
        // Touch divides by sensitivity
        if self.touch.clamp(0.0) == 0.0 {
            return Err("input.touch range must not include 0".to_string());
        }
        Ok(())
    }
}

// ============================================================================
// ControllerInput (Component)
// ============================================================================

#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
pub struct ControllerInput {
    pub controlling_device: ControllingDevice,
    pub mouse: Sensitivity,
    pub touch: Sensitivity,
    pub gyro: Sensitivity,

    /// Last scaled gyro reading
    pub last_tilt: Vec3,
    /// Last location of touch pad 0
    pub last_touch: Vec2,

    /// A menu overlay owns the pointer: aim input is dropped, key actions
    /// still dispatch
    pub ui_only: bool,
    pub cursor_visible: bool,
}

impl Default for ControllerInput {
    fn default() -> Self {
        Self::from_config(&InputConfig::default())
    }
}

impl ControllerInput {
    pub fn from_config(config: &InputConfig) -> Self {
        Self {
            controlling_device: config.controlling_device,
            mouse: config.mouse,
            touch: config.touch,
            gyro: config.gyro,
            last_tilt: Vec3::ZERO,
            last_touch: Vec2::ZERO,
            ui_only: false,
            cursor_visible: false,
        }
    }

    pub fn set_controlling_device(&mut self, device: ControllingDevice) -> GameplayResult<()> {
        if self.controlling_device == device {
            return Err(GameplayError::DeviceAlreadyActive(device));
        }
        self.controlling_device = device;
        Ok(())
    }

    fn range(&self, device: ControllingDevice) -> &Sensitivity {
        match device {
            ControllingDevice::Mouse => &self.mouse,
            ControllingDevice::Touch => &self.touch,
            ControllingDevice::Gyro => &self.gyro,
        }
    }

    fn range_mut(&mut self, device: ControllingDevice) -> &mut Sensitivity {
        match device {
            ControllingDevice::Mouse => &mut self.mouse,
            ControllingDevice::Touch => &mut self.touch,
            ControllingDevice::Gyro => &mut self.gyro,
        }
    }

    pub fn sensitivity(&self, device: ControllingDevice) -> f32 {
        self.range(device).current
    }

    pub fn current_sensitivity(&self) -> f32 {
        self.sensitivity(self.controlling_device)
    }

    /// Returns the value actually stored after clamping.
    pub fn set_sensitivity(&mut self, device: ControllingDevice, value: f32) -> f32 {
        let range = self.range_mut(device);
        range.current = range.clamp(value);
        range.current
    }

    /// Show cursor and route input to a menu overlay.
    pub fn enter_ui_mode(&mut self) {
        self.ui_only = true;
        self.cursor_visible = true;
    }

    pub fn leave_ui_mode(&mut self) {
        self.ui_only = false;
        self.cursor_visible = false;
    }

    pub fn mouse_look(&self, delta: Vec2) -> Option<Vec2> {
        if self.ui_only || self.controlling_device != ControllingDevice::Mouse {
            return None;
        }
        Some(delta * self.mouse.current)
    }

    /// Only pad 0 with Began/Moved is handled.
    pub fn touch(&mut self, finger: u32, phase: TouchPhase, location: Vec2) -> Option<Vec2> {
        if self.ui_only || self.controlling_device != ControllingDevice::Touch || finger != 0 {
            return None;
        }

        match phase {
            TouchPhase::Began => {
                self.last_touch = location;
                Some(Vec2::ZERO)
            }
            TouchPhase::Moved => {
                let delta = (location - self.last_touch) / self.touch.current;
                self.last_touch = location;
                Some(delta)
            }
            TouchPhase::Ended | TouchPhase::Cancelled => None,
        }
    }

    pub fn gyro_motion(&mut self, tilt: Vec3) -> Option<Vec2> {
        if self.ui_only || self.controlling_device != ControllingDevice::Gyro {
            return None;
        }

        let scaled = tilt * self.gyro.current;
        let delta = self.last_tilt - scaled;
        self.last_tilt = scaled;
        Some(Vec2::new(-delta.x, delta.z))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum TouchPhase {
    Began,
    Moved,
    Ended,
    Cancelled,
}

// ============================================================================
// ViewRotation (Component)
// ============================================================================

/// Accumulated aim, degrees.
#[derive(Component, Debug, Clone, Copy, PartialEq, Default, Reflect)]
#[reflect(Component)]
pub struct ViewRotation {
    pub yaw: f32,
    pub pitch: f32,
}

impl ViewRotation {
    /// `delta` = (yaw, pitch); pitch stays within ±pitch_limit.
    pub fn apply(&mut self, delta: Vec2, pitch_limit: f32) {
        self.yaw += delta.x;
        self.pitch = (self.pitch + delta.y).clamp(-pitch_limit, pitch_limit);
    }
}

// ============================================================================
// Key bindings (Resource)
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerAction {
    SelectSlot1,
    SelectSlot2,
    SelectSlot3,
    Reload,
    Fire,
    SensitivityMenu,
    WeaponSelectionMenu,
}

impl PlayerAction {
    /// 1-based equip slot for slot actions.
    pub fn slot_index(self) -> Option<u8> {
        match self {
            PlayerAction::SelectSlot1 => Some(1),
            PlayerAction::SelectSlot2 => Some(2),
            PlayerAction::SelectSlot3 => Some(3),
            _ => None,
        }
    }
}

/// Key name → action. Unbound keys are ignored.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct KeyBindings {
    bindings: HashMap<String, PlayerAction>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        let bindings = [
            ("NumPadOne", PlayerAction::SelectSlot1),
            ("NumPadTwo", PlayerAction::SelectSlot2),
            ("NumPadThree", PlayerAction::SelectSlot3),
            ("R", PlayerAction::Reload),
            ("LeftMouseButton", PlayerAction::Fire),
            ("O", PlayerAction::SensitivityMenu),
            ("I", PlayerAction::WeaponSelectionMenu),
        ]
        .into_iter()
        .map(|(key, action)| (key.to_string(), action))
        .collect();

        Self { bindings }
    }
}

impl KeyBindings {
    pub fn action_for(&self, key: &str) -> Option<PlayerAction> {
        self.bindings.get(key).copied()
    }

    pub fn bind(&mut self, key: impl Into<String>, action: PlayerAction) {
        self.bindings.insert(key.into(), action);
    }

    /// Defaults plus `extra` (extra wins on the same key).
    pub fn with_overrides(extra: &HashMap<String, PlayerAction>) -> Self {
        let mut bindings = Self::default();
        for (key, action) in extra {
            bindings.bind(key.clone(), *action);
        }
        bindings
    }
}
