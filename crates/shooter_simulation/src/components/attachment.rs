//! Weapon attachment components
//!
//! The simulation never touches meshes; these components describe where a
//! weapon hangs and whether it is shown, and the host realizes them.

use bevy::prelude::*;

use crate::item_system::{PrototypeId, WeaponPrototype};

/// Mesh on the character that weapons are attached to.
pub const FIRST_PERSON_MESH: &str = "FirstPersonMesh";

/// Binding of a weapon entity to a socket on its owner's mesh.
#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Attachment {
    /// Prototype the host loads the weapon model from
    pub prototype: PrototypeId,

    /// Owner mesh carrying the socket
    pub mesh: String,

    /// Socket name on `mesh` (e.g. "WeaponPoint")
    pub attachment_point: String,
}

impl Attachment {
    /// First-person attachment at the prototype's socket.
    pub fn weapon(prototype: &WeaponPrototype) -> Self {
        Self {
            prototype: prototype.id.clone(),
            mesh: FIRST_PERSON_MESH.to_string(),
            attachment_point: prototype.attach_socket.clone(),
        }
    }
}

/// Shown/hidden flag of a weapon. Only the character's current weapon is visible.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
#[reflect(Component)]
pub struct WeaponVisibility {
    pub visible: bool,
}

impl WeaponVisibility {
    pub fn hidden() -> Self {
        Self { visible: false }
    }

    pub fn shown() -> Self {
        Self { visible: true }
    }
}

/// Index of the backpack item a weapon was spawned from.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
#[reflect(Component)]
pub struct BackpackIndex(pub usize);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weapon_attachment_uses_prototype_socket() {
        let mut prototype = WeaponPrototype::rifle();
        prototype.attach_socket = "RifleGrip".to_string();

        let attachment = Attachment::weapon(&prototype);
        assert_eq!(attachment.prototype, "rifle_basic".into());
        assert_eq!(attachment.mesh, FIRST_PERSON_MESH);
        assert_eq!(attachment.attachment_point, "RifleGrip");
    }

    #[test]
    fn test_visibility_defaults_to_hidden() {
        assert_eq!(WeaponVisibility::default(), WeaponVisibility::hidden());
        assert!(WeaponVisibility::shown().visible);
    }
}
