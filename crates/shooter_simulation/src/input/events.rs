//! Player input events
//!
//! Emitted by the host's device layer, consumed by `dispatch_player_input`.
//! Events carry no entity: they apply to every `With<Player>` character.

use bevy::prelude::*;

use crate::input::components::{ControllingDevice, TouchPhase};

#[derive(Event, Debug, Clone, PartialEq)]
pub enum PlayerInputEvent {
    /// Discrete key/button press, resolved through `KeyBindings`
    KeyPressed { key: String },

    /// Mouse look delta (x → yaw, y → pitch)
    MouseMotion { delta: Vec2 },

    Touch {
        finger: u32,
        phase: TouchPhase,
        location: Vec2,
    },

    /// Device tilt reading
    Motion { tilt: Vec3 },

    SelectDevice(ControllingDevice),

    SetSensitivity { device: ControllingDevice, value: f32 },

    /// Host closed the open menu overlay
    CloseOverlay,
}

impl PlayerInputEvent {
    pub fn key(key: impl Into<String>) -> Self {
        Self::KeyPressed { key: key.into() }
    }
}

/// Menu overlays the host can open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Overlay {
    Sensitivity,
    WeaponSelection,
}

/// Host should open `overlay`; the controller is already in UI mode.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct OverlayRequested {
    pub player: Entity,
    pub overlay: Overlay,
}
