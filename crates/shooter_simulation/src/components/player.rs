//! Player control marker

use bevy::prelude::Component;

/// Marker for the entity driven by `PlayerInputEvent`.
///
/// Input dispatch uses a `With<Player>` filter; characters without the marker
/// only react to intents sent directly (AI, host scripts, tests).
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Player;
