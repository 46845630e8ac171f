//! ECS components for characters and weapons
//!
//! - attachment: how a weapon hangs on the character (Attachment, WeaponVisibility, BackpackIndex)
//! - equipment: weapon inventory (Backpack, EquipSlots)
//! - player: player control marker (Player)

pub mod attachment;
pub mod equipment;
pub mod player;

pub use attachment::*;
pub use equipment::*;
pub use player::*;
