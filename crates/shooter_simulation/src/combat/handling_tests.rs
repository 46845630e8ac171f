//! Tests for the equip/reload sequencer.

#[cfg(test)]
mod tests {
    use bevy::prelude::*;

    use crate::combat::curve::FloatCurve;
    use crate::combat::handling::*;
    use crate::combat::{WeaponState, WeaponType};
    use crate::error::GameplayError;
    use crate::logger::{set_logger, LogLevel, MemoryLogger};

    const DT: f32 = 1.0 / 60.0;

    fn config() -> HandlingConfig {
        HandlingConfig::default()
    }

    fn pistol() -> WeaponState {
        WeaponState::new(WeaponType::Pistol, 6, 30, 2.0)
    }

    fn weapon(index: u32) -> Entity {
        Entity::from_raw(index)
    }

    /// State holding `weapon` with the sequencer idle.
    fn armed(weapon: Entity) -> CombatState {
        CombatState {
            current_weapon: Some(weapon),
            can_fire: true,
            ..default()
        }
    }

    fn run(state: &mut CombatState, seconds: f32, config: &HandlingConfig) -> Vec<HandlingEvent> {
        let mut events = Vec::new();
        let ticks = (seconds / DT).ceil() as usize;
        for _ in 0..ticks {
            events.extend(state.advance(DT, config));
        }
        events
    }

    // === Equip ===

    #[test]
    fn test_equip_rejects_same_weapon() {
        let mut state = armed(weapon(1));
        assert_eq!(state.equip_weapon(Some(weapon(1))), Err(GameplayError::AlreadyEquipped(weapon(1))));
        assert!(state.equip.is_none());
        assert!(state.can_fire);
    }

    #[test]
    fn test_equip_rejects_nothing_to_nothing() {
        let mut state = CombatState::default();
        assert_eq!(state.equip_weapon(None), Err(GameplayError::NothingToEquip));
        assert!(!state.is_changing_weapon);
    }

    #[test]
    fn test_equip_swaps_at_checkpoint_and_finishes() {
        let config = config();
        let mut state = armed(weapon(1));

        state.equip_weapon(Some(weapon(2))).unwrap();
        assert!(state.is_changing_weapon);
        assert!(!state.can_fire);

        // Just before the checkpoint: still holding the old weapon
        state.advance(0.2, &config);
        assert_eq!(state.current_weapon, Some(weapon(1)));
        assert_eq!(state.pending_weapon(), Some(weapon(2)));

        let events = state.advance(0.1, &config);
        assert_eq!(
            events,
            vec![HandlingEvent::WeaponSwapped {
                previous: Some(weapon(1)),
                current: Some(weapon(2)),
            }]
        );
        assert_eq!(state.current_weapon, Some(weapon(2)));
        assert!(state.is_weapon_down());
        assert!(state.is_changing_weapon);

        let events = state.advance(0.75, &config);
        assert_eq!(events, vec![HandlingEvent::EquipFinished { weapon: Some(weapon(2)) }]);
        assert!(!state.is_changing_weapon);
        assert!(state.can_fire);
        assert!(state.equip.is_none());
        assert!(state.weapon_pull_down_percent.abs() < 1e-4);
    }

    #[test]
    fn test_long_tick_emits_swap_then_finish() {
        let mut state = CombatState::default();
        state.equip_weapon(Some(weapon(3))).unwrap();

        let events = state.advance(5.0, &config());
        assert_eq!(
            events,
            vec![
                HandlingEvent::WeaponSwapped { previous: None, current: Some(weapon(3)) },
                HandlingEvent::EquipFinished { weapon: Some(weapon(3)) },
            ]
        );
    }

    #[test]
    fn test_pull_down_percent_follows_equip_curve() {
        let config = config();
        let mut state = armed(weapon(1));
        state.equip_weapon(Some(weapon(2))).unwrap();

        state.advance(0.125, &config);
        assert!((state.weapon_pull_down_percent - 0.5).abs() < 1e-4);

        state.advance(0.125, &config);
        assert!((state.weapon_pull_down_percent - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_equip_same_pending_is_rejected() {
        let mut state = armed(weapon(1));
        state.equip_weapon(Some(weapon(2))).unwrap();
        assert_eq!(state.equip_weapon(Some(weapon(2))), Err(GameplayError::AlreadyEquipping(weapon(2))));
    }

    #[test]
    fn test_equip_retarget_restarts_sequence() {
        let config = config();
        let mut state = armed(weapon(1));
        state.equip_weapon(Some(weapon(2))).unwrap();
        state.advance(0.1, &config);

        state.equip_weapon(Some(weapon(3))).unwrap();
        assert_eq!(state.equip.as_ref().unwrap().elapsed, 0.0);

        let events = run(&mut state, 1.1, &config);
        assert!(events.contains(&HandlingEvent::WeaponSwapped {
            previous: Some(weapon(1)),
            current: Some(weapon(3)),
        }));
        assert_eq!(state.current_weapon, Some(weapon(3)));
    }

    #[test]
    fn test_equip_nothing_holsters() {
        let mut state = armed(weapon(1));
        state.equip_weapon(None).unwrap();

        let events = run(&mut state, 1.1, &config());
        assert!(events.contains(&HandlingEvent::WeaponSwapped { previous: Some(weapon(1)), current: None }));
        assert_eq!(state.current_weapon, None);
        assert!(!state.can_fire);
    }

    #[test]
    fn test_equip_refused_while_reloading() {
        let mut state = armed(weapon(1));
        state.reload_weapon(2.0).unwrap();
        assert_eq!(state.equip_weapon(Some(weapon(2))), Err(GameplayError::ReloadInProgress));
        assert!(state.equip.is_none());
    }

    // === Reload ===

    #[test]
    fn test_reload_runs_all_phases() {
        let config = config();
        let mut state = armed(weapon(1));

        state.reload_weapon(2.0).unwrap();
        assert!(state.is_reloading);
        assert!(!state.can_fire);

        state.advance(0.5, &config);
        assert!(matches!(state.reload.as_ref().unwrap().phase, ReloadPhase::Waiting { .. }));
        assert!((state.weapon_pull_down_percent - 1.0).abs() < 1e-4);

        // Weapon stays down for the reload time
        assert!(state.advance(1.9, &config).is_empty());
        assert!(matches!(state.reload.as_ref().unwrap().phase, ReloadPhase::Waiting { .. }));

        state.advance(0.2, &config);
        assert!(matches!(state.reload.as_ref().unwrap().phase, ReloadPhase::PullingUp { .. }));

        let events = state.advance(0.5, &config);
        assert_eq!(events, vec![HandlingEvent::ReloadFinished { weapon: weapon(1) }]);
        assert!(!state.is_reloading);
        assert!(state.can_fire);
        assert!(state.weapon_pull_down_percent.abs() < 1e-4);
    }

    #[test]
    fn test_reload_twice_is_rejected() {
        let mut state = armed(weapon(1));
        state.reload_weapon(2.0).unwrap();
        let before = state.clone();

        assert_eq!(state.reload_weapon(2.0), Err(GameplayError::AlreadyReloading));
        assert_eq!(state, before);
    }

    #[test]
    fn test_reload_without_weapon() {
        let mut state = CombatState::default();
        assert_eq!(state.reload_weapon(2.0), Err(GameplayError::NoWeaponEquipped));
        assert!(!state.is_reloading);
    }

    #[test]
    fn test_reload_pre_empts_equip_before_swap() {
        let config = config();
        let mut state = armed(weapon(1));
        state.equip_weapon(Some(weapon(2))).unwrap();
        state.advance(0.1, &config);

        state.reload_weapon(2.0).unwrap();
        assert!(state.equip.is_none());
        assert!(!state.is_changing_weapon);
        assert_eq!(state.current_weapon, Some(weapon(1)));

        let events = run(&mut state, 4.0, &config);
        assert_eq!(events, vec![HandlingEvent::ReloadFinished { weapon: weapon(1) }]);
        assert_eq!(state.current_weapon, Some(weapon(1)));
    }

    #[test]
    fn test_reload_blocked_once_weapon_is_down() {
        let config = config();
        let mut state = armed(weapon(1));
        state.equip_weapon(Some(weapon(2))).unwrap();
        state.advance(0.3, &config);
        assert!(state.is_weapon_down());

        assert_eq!(state.reload_weapon(2.0), Err(GameplayError::WeaponIsDown));
        assert!(!state.is_reloading);
        assert!(state.equip.is_some());
    }

    #[test]
    fn test_external_reset_aborts_reload() {
        let logs = MemoryLogger::new();
        set_logger(Box::new(logs.clone()));

        let config = config();
        let mut state = armed(weapon(41));
        state.reload_weapon(2.0).unwrap();
        state.advance(0.2, &config);

        state.is_reloading = false;
        let events = state.advance(DT, &config);

        assert_eq!(events, vec![HandlingEvent::ReloadAborted { weapon: weapon(41) }]);
        assert!(state.reload.is_none());
        assert!(run(&mut state, 5.0, &config).is_empty());
        assert!(logs.contains(LogLevel::Error, &format!("Reload of {:?} aborted", weapon(41))));
    }

    // === Fire ===

    #[test]
    fn test_fire_consumes_round() {
        let mut state = armed(weapon(1));
        let mut gun = pistol();

        assert_eq!(state.fire_weapon(&mut gun), Ok(FireOutcome::Fired(WeaponType::Pistol)));
        assert_eq!(gun.current_ammo_in_mag, 5);
    }

    #[test]
    fn test_fire_refused_when_cannot_fire() {
        let mut state = armed(weapon(1));
        state.can_fire = false;
        let mut gun = pistol();

        assert_eq!(state.fire_weapon(&mut gun), Err(GameplayError::CannotFire));
        assert_eq!(gun.current_ammo_in_mag, 6);
    }

    #[test]
    fn test_fire_on_empty_mag_starts_reload() {
        let mut state = armed(weapon(1));
        let mut gun = pistol();
        gun.current_ammo_in_mag = 0;

        assert_eq!(state.fire_weapon(&mut gun), Ok(FireOutcome::ReloadStarted));
        assert!(state.is_reloading);
        assert_eq!(state.reload.as_ref().unwrap().reload_time, 2.0);
    }

    #[test]
    fn test_fire_out_of_ammo_does_nothing() {
        let mut state = armed(weapon(1));
        let mut gun = pistol();
        gun.current_ammo_in_mag = 0;
        gun.current_ammo_in_backpack = 0;

        assert_eq!(state.fire_weapon(&mut gun), Err(GameplayError::OutOfAmmo));
        assert!(!state.is_reloading);
        assert!(state.can_fire);
        assert_eq!(gun.current_ammo_in_mag, 0);
    }

    #[test]
    fn test_fire_blocked_during_equip() {
        let mut state = armed(weapon(1));
        state.equip_weapon(Some(weapon(2))).unwrap();
        let mut gun = pistol();

        assert_eq!(state.fire_weapon(&mut gun), Err(GameplayError::CannotFire));
    }

    // === Weapon lifecycle ===

    #[test]
    fn test_forget_current_weapon() {
        let mut state = armed(weapon(1));
        assert!(state.forget_weapon(weapon(1)));
        assert_eq!(state.current_weapon, None);
        assert!(!state.can_fire);
        assert!(!state.forget_weapon(weapon(1)));
    }

    #[test]
    fn test_forget_pending_weapon_cancels_equip() {
        let mut state = armed(weapon(1));
        state.equip_weapon(Some(weapon(2))).unwrap();

        assert!(state.forget_weapon(weapon(2)));
        assert!(state.equip.is_none());
        assert!(!state.is_changing_weapon);
        assert!(state.can_fire);
    }

    #[test]
    fn test_forget_reloading_weapon_drops_reload() {
        let mut state = armed(weapon(1));
        state.reload_weapon(2.0).unwrap();

        assert!(state.forget_weapon(weapon(1)));
        assert!(state.reload.is_none());
        assert!(!state.is_reloading);
    }

    // === Config ===

    #[test]
    fn test_handling_config_validation() {
        assert!(HandlingConfig::default().validate().is_ok());

        let mut bad = HandlingConfig::default();
        bad.swap_checkpoint = 1.5;
        assert!(bad.validate().is_err());

        let mut bad = HandlingConfig::default();
        bad.reload_up_duration = 0.0;
        assert!(bad.validate().is_err());

        let mut bad = HandlingConfig::default();
        bad.swap_checkpoint = 0.5;
        bad.equip_curve = Some(FloatCurve::down_then_up(0.25));
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_default_equip_curve_follows_swap_checkpoint() {
        let config = HandlingConfig {
            swap_checkpoint: 0.5,
            ..HandlingConfig::default()
        };
        assert!(config.validate().is_ok());

        let mut state = armed(weapon(1));
        state.equip_weapon(Some(weapon(2))).unwrap();

        state.advance(0.25, &config);
        assert!((state.weapon_pull_down_percent - 0.5).abs() < 1e-4);
        assert_eq!(state.current_weapon, Some(weapon(1)));

        let events = state.advance(0.25, &config);
        assert!((state.weapon_pull_down_percent - 1.0).abs() < 1e-4);
        assert_eq!(
            events,
            vec![HandlingEvent::WeaponSwapped { previous: Some(weapon(1)), current: Some(weapon(2)) }]
        );
    }
}
