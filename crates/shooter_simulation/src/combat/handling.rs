//! Weapon handling: equip and reload sequencing for a character.
//!
//! Two timed tracks share the character's `CombatState`:
//!
//! - **Equip**: pull-down → swap (at `swap_checkpoint`) → pull-up.
//!   The swap is where `current_weapon` changes and slot visibility flips.
//! - **Reload**: PullingDown → Waiting (weapon reload time) → PullingUp,
//!   after which the weapon's magazine is refilled.
//!
//! Both tracks drive `weapon_pull_down_percent` through their curves and are
//! advanced once per tick by `CombatState::advance`. Checkpoints come back as
//! `HandlingEvent` values; the ECS layer applies them to weapon entities.
//!
//! Overlap rules:
//! - Reload may pre-empt an equip until its swap has happened; after the
//!   swap the weapon is down and reload is refused.
//! - Equip is refused while a reload runs.

use bevy::prelude::*;
use serde::Deserialize;

use crate::combat::curve::FloatCurve;
use crate::combat::{WeaponState, WeaponType};
use crate::error::{GameplayError, GameplayResult};
use crate::logger::{log, log_error, log_info};

// ============================================================================
// Config
// ============================================================================

/// Sequencer timing. Curves are sampled over normalized time.
#[derive(Resource, Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct HandlingConfig {
    /// Full equip sequence (seconds)
    pub equip_duration: f32,
    /// Fraction of `equip_duration` at which the weapons swap
    pub swap_checkpoint: f32,
    pub reload_down_duration: f32,
    pub reload_up_duration: f32,
    /// Unset: straight down to `swap_checkpoint`, straight back up
    pub equip_curve: Option<FloatCurve>,
    pub reload_down_curve: FloatCurve,
    pub reload_up_curve: FloatCurve,
}

impl Default for HandlingConfig {
    fn default() -> Self {
        Self {
            equip_duration: 1.0,
            swap_checkpoint: 0.25,
            reload_down_duration: 0.5,
            reload_up_duration: 0.5,
            equip_curve: None,
            reload_down_curve: FloatCurve::pull_down(),
            reload_up_curve: FloatCurve::pull_up(),
        }
    }
}

impl HandlingConfig {
    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in [
            ("equip_duration", self.equip_duration),
            ("reload_down_duration", self.reload_down_duration),
            ("reload_up_duration", self.reload_up_duration),
        ] {
            if !(value > 0.0) {
                return Err(format!("handling.{name} must be > 0 (got {value})"));
            }
        }
        if !(0.0..=1.0).contains(&self.swap_checkpoint) {
            return Err(format!(
                "handling.swap_checkpoint must be within [0, 1] (got {})",
                self.swap_checkpoint
            ));
        }
        if let Some(curve) = &self.equip_curve {
            let peak = curve
                .keys()
                .iter()
                .map(|key| key.value)
                .fold(f32::NEG_INFINITY, f32::max);
            if curve.is_empty() || (curve.sample(self.swap_checkpoint) - peak).abs() > 1e-3 {
                return Err(format!(
                    "handling.equip_curve must peak at swap_checkpoint ({})",
                    self.swap_checkpoint
                ));
            }
        }
        Ok(())
    }

    /// Pull-down percent of the equip track at normalized time `t`.
    pub fn sample_equip_curve(&self, t: f32) -> f32 {
        match &self.equip_curve {
            Some(curve) => curve.sample(t),
            None => FloatCurve::down_then_up(self.swap_checkpoint).sample(t),
        }
    }
}

// ============================================================================
// Sequences
// ============================================================================

/// In-flight equip.
#[derive(Debug, Clone, PartialEq, Reflect)]
pub struct EquipSequence {
    /// Weapon that becomes current at the swap (`None` = holster)
    pub pending: Option<Entity>,
    /// Seconds since the sequence started
    pub elapsed: f32,
    /// Swap checkpoint already passed
    pub swapped: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub enum ReloadPhase {
    PullingDown { elapsed: f32 },
    Waiting { remaining: f32 },
    PullingUp { elapsed: f32 },
}

/// In-flight reload.
#[derive(Debug, Clone, PartialEq, Reflect)]
pub struct ReloadSequence {
    pub weapon: Entity,
    pub reload_time: f32,
    pub phase: ReloadPhase,
}

/// Checkpoint outputs of `CombatState::advance`, in the order they happened.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HandlingEvent {
    /// `current_weapon` changed; slot visibility must follow.
    WeaponSwapped {
        previous: Option<Entity>,
        current: Option<Entity>,
    },
    /// Equip sequence completed.
    EquipFinished { weapon: Option<Entity> },
    /// Weapon is back up; its magazine must be refilled now.
    ReloadFinished { weapon: Entity },
    /// `is_reloading` was cleared from outside mid-sequence.
    ReloadAborted { weapon: Entity },
}

/// Result of a successful `fire_weapon` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireOutcome {
    /// A round left the magazine.
    Fired(WeaponType),
    /// Magazine was empty; a reload started instead.
    ReloadStarted,
}

// ============================================================================
// CombatState
// ============================================================================

/// Character combat flags + sequencer tracks.
///
/// `current_weapon` borrows a weapon owned through `EquipSlots`.
#[derive(Component, Debug, Clone, PartialEq, Default, Reflect)]
#[reflect(Component)]
pub struct CombatState {
    pub current_weapon: Option<Entity>,
    pub can_fire: bool,
    pub is_reloading: bool,
    pub is_changing_weapon: bool,
    /// 0.0 = weapon up, 1.0 = weapon fully down
    pub weapon_pull_down_percent: f32,

    pub equip: Option<EquipSequence>,
    pub reload: Option<ReloadSequence>,
}

impl CombatState {
    /// Pending weapon of an in-flight equip that hasn't swapped yet.
    pub fn pending_weapon(&self) -> Option<Entity> {
        self.equip
            .as_ref()
            .filter(|sequence| !sequence.swapped)
            .and_then(|sequence| sequence.pending)
    }

    /// Swap already happened in the running equip (weapon is down).
    pub fn is_weapon_down(&self) -> bool {
        self.equip.as_ref().is_some_and(|sequence| sequence.swapped)
    }

    /// Start an equip sequence towards `weapon` (`None` holsters).
    pub fn equip_weapon(&mut self, weapon: Option<Entity>) -> GameplayResult<()> {
        match (self.current_weapon, weapon) {
            (None, None) => return Err(GameplayError::NothingToEquip),
            (Some(current), Some(requested)) if current == requested => {
                return Err(GameplayError::AlreadyEquipped(requested));
            }
            _ => {}
        }

        if let Some(requested) = weapon {
            if self.pending_weapon() == Some(requested) {
                return Err(GameplayError::AlreadyEquipping(requested));
            }
        }

        if self.is_reloading {
            return Err(GameplayError::ReloadInProgress);
        }

        if self.equip.is_some() {
            log(&format!("Equip restarted towards {:?}", weapon));
        }

        self.equip = Some(EquipSequence {
            pending: weapon,
            elapsed: 0.0,
            swapped: false,
        });
        self.is_changing_weapon = true;
        self.can_fire = false;
        Ok(())
    }

    /// Start a reload of the current weapon.
    ///
    /// `reload_time` comes from the current weapon's `WeaponState`.
    pub fn reload_weapon(&mut self, reload_time: f32) -> GameplayResult<()> {
        if self.is_reloading {
            return Err(GameplayError::AlreadyReloading);
        }

        let Some(weapon) = self.current_weapon else {
            return Err(GameplayError::NoWeaponEquipped);
        };

        if let Some(sequence) = &self.equip {
            if sequence.swapped {
                return Err(GameplayError::WeaponIsDown);
            }
            log_info(&format!(
                "Reload pre-empts equip of {:?}; keeping {:?}",
                sequence.pending, weapon
            ));
            self.equip = None;
            self.is_changing_weapon = false;
        }

        self.is_reloading = true;
        self.can_fire = false;
        self.reload = Some(ReloadSequence {
            weapon,
            reload_time,
            phase: ReloadPhase::PullingDown { elapsed: 0.0 },
        });
        Ok(())
    }

    /// Fire the current weapon, or start a reload when the magazine is dry.
    ///
    /// `weapon` must be the `WeaponState` of `current_weapon`.
    pub fn fire_weapon(&mut self, weapon: &mut WeaponState) -> GameplayResult<FireOutcome> {
        if !self.can_fire {
            return Err(GameplayError::CannotFire);
        }
        if self.current_weapon.is_none() {
            return Err(GameplayError::NoWeaponEquipped);
        }

        let (has_ammo, _) = weapon.has_ammo_in_mag();
        if has_ammo {
            weapon.fire()?;
            return Ok(FireOutcome::Fired(weapon.weapon_type));
        }

        if !weapon.has_ammo_in_backpack() {
            return Err(GameplayError::OutOfAmmo);
        }

        self.reload_weapon(weapon.reload_time)?;
        Ok(FireOutcome::ReloadStarted)
    }

    /// Advance both tracks by `delta` seconds.
    pub fn advance(&mut self, delta: f32, config: &HandlingConfig) -> Vec<HandlingEvent> {
        let mut events = Vec::new();
        self.advance_equip(delta, config, &mut events);
        self.advance_reload(delta, config, &mut events);
        events
    }

    fn advance_equip(&mut self, delta: f32, config: &HandlingConfig, events: &mut Vec<HandlingEvent>) {
        let Some(sequence) = self.equip.as_mut() else {
            return;
        };

        sequence.elapsed += delta;
        let t = normalized(sequence.elapsed, config.equip_duration);
        self.weapon_pull_down_percent = config.sample_equip_curve(t).clamp(0.0, 1.0);

        if !sequence.swapped && t >= config.swap_checkpoint {
            sequence.swapped = true;
            let previous = self.current_weapon;
            self.current_weapon = sequence.pending;
            events.push(HandlingEvent::WeaponSwapped {
                previous,
                current: self.current_weapon,
            });
        }

        if t >= 1.0 {
            self.equip = None;
            self.is_changing_weapon = false;
            self.can_fire = self.current_weapon.is_some() && !self.is_reloading;
            events.push(HandlingEvent::EquipFinished {
                weapon: self.current_weapon,
            });
        }
    }

    fn advance_reload(&mut self, delta: f32, config: &HandlingConfig, events: &mut Vec<HandlingEvent>) {
        // Leftover time flows into the next phase so a long tick can finish
        // several phases at once.
        let mut budget = delta;

        loop {
            let Some(sequence) = self.reload.as_mut() else {
                return;
            };

            if !self.is_reloading {
                let weapon = sequence.weapon;
                log_error(&format!("Reload of {:?} aborted: character is not reloading", weapon));
                self.reload = None;
                events.push(HandlingEvent::ReloadAborted { weapon });
                return;
            }

            match &mut sequence.phase {
                ReloadPhase::PullingDown { elapsed } => {
                    *elapsed += budget;
                    let t = normalized(*elapsed, config.reload_down_duration);
                    self.weapon_pull_down_percent = config.reload_down_curve.sample(t).clamp(0.0, 1.0);
                    if t < 1.0 {
                        return;
                    }
                    budget = *elapsed - config.reload_down_duration;
                    sequence.phase = ReloadPhase::Waiting {
                        remaining: sequence.reload_time,
                    };
                }
                ReloadPhase::Waiting { remaining } => {
                    *remaining -= budget;
                    if *remaining > 0.0 {
                        return;
                    }
                    budget = -*remaining;
                    sequence.phase = ReloadPhase::PullingUp { elapsed: 0.0 };
                }
                ReloadPhase::PullingUp { elapsed } => {
                    *elapsed += budget;
                    let t = normalized(*elapsed, config.reload_up_duration);
                    self.weapon_pull_down_percent = config.reload_up_curve.sample(t).clamp(0.0, 1.0);
                    if t < 1.0 {
                        return;
                    }
                    let weapon = sequence.weapon;
                    self.reload = None;
                    self.is_reloading = false;
                    self.can_fire = true;
                    events.push(HandlingEvent::ReloadFinished { weapon });
                    return;
                }
            }
        }
    }

    /// Every weapon entity the sequencer currently points at.
    pub fn referenced_weapons(&self) -> impl Iterator<Item = Entity> + '_ {
        self.current_weapon
            .into_iter()
            .chain(self.pending_weapon())
            .chain(self.reload.as_ref().map(|sequence| sequence.weapon))
    }

    /// Drop every reference to a weapon that no longer exists.
    ///
    /// Returns `true` if anything changed.
    pub fn forget_weapon(&mut self, weapon: Entity) -> bool {
        let mut changed = false;

        if self.current_weapon == Some(weapon) {
            self.current_weapon = None;
            self.can_fire = false;
            changed = true;
        }

        if self.pending_weapon() == Some(weapon) {
            self.equip = None;
            self.is_changing_weapon = false;
            self.can_fire = self.current_weapon.is_some() && !self.is_reloading;
            changed = true;
        }

        if self.reload.as_ref().is_some_and(|sequence| sequence.weapon == weapon) {
            self.reload = None;
            self.is_reloading = false;
            self.can_fire = false;
            changed = true;
        }

        changed
    }
}

/// Elapsed / duration, clamped to 1. Zero-length sequences finish at once.
fn normalized(elapsed: f32, duration: f32) -> f32 {
    if duration <= 0.0 {
        return 1.0;
    }
    (elapsed / duration).clamp(0.0, 1.0)
}
