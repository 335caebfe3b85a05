//! Tests for reload systems.

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use bevy::prelude::*;

    use crate::combat::systems::{process_reload_requests, tick_reload_timers};
    use crate::combat::{RangedWeapon, ReloadFinished, ReloadRequest, ReloadStarted, ReloadTimer, WeaponStats};

    fn reload_app() -> App {
        let mut app = App::new();
        app.init_resource::<Time>()
            .add_event::<ReloadRequest>()
            .add_event::<ReloadStarted>()
            .add_event::<ReloadFinished>()
            .add_systems(Update, (process_reload_requests, tick_reload_timers).chain());
        app
    }

    fn step(app: &mut App, seconds: f32) {
        app.world_mut()
            .resource_mut::<Time>()
            .advance_by(Duration::from_secs_f32(seconds));
        app.update();
    }

    fn finished(app: &App) -> Vec<ReloadFinished> {
        app.world()
            .resource::<Events<ReloadFinished>>()
            .iter_current_update_events()
            .cloned()
            .collect()
    }

    fn spawn_partial(app: &mut App, ammo: u32, reserve: u32) -> Entity {
        let mut weapon = RangedWeapon::new(WeaponStats {
            magazine_size: 12,
            reserve_ammo: reserve,
            reload_duration: 1.0,
            ..Default::default()
        });
        weapon.ammo_in_magazine = ammo;
        app.world_mut().spawn(weapon).id()
    }

    #[test]
    fn test_manual_reload_completes_after_duration() {
        let mut app = reload_app();
        let shooter = spawn_partial(&mut app, 4, 60);

        app.world_mut().send_event(ReloadRequest { shooter });
        step(&mut app, 0.0);
        assert!(app.world().get::<RangedWeapon>(shooter).unwrap().is_reloading);
        assert!(app.world().get::<ReloadTimer>(shooter).is_some());

        step(&mut app, 0.5);
        assert!(finished(&app).is_empty());
        assert_eq!(app.world().get::<RangedWeapon>(shooter).unwrap().ammo_in_magazine, 4);

        step(&mut app, 0.6);
        let events = finished(&app);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].shooter, shooter);
        assert_eq!(events[0].loaded, 8);

        let weapon = app.world().get::<RangedWeapon>(shooter).unwrap();
        assert_eq!(weapon.ammo_in_magazine, 12);
        assert_eq!(weapon.reserve_ammo, 52);
        assert!(!weapon.is_reloading);
        assert!(app.world().get::<ReloadTimer>(shooter).is_none());
    }

    #[test]
    fn test_reload_request_ignored_when_full() {
        let mut app = reload_app();
        let shooter = spawn_partial(&mut app, 12, 60);

        app.world_mut().send_event(ReloadRequest { shooter });
        step(&mut app, 0.0);

        assert!(!app.world().get::<RangedWeapon>(shooter).unwrap().is_reloading);
        assert!(app.world().get::<ReloadTimer>(shooter).is_none());
    }

    #[test]
    fn test_reload_request_ignored_without_reserve() {
        let mut app = reload_app();
        let shooter = spawn_partial(&mut app, 3, 0);

        app.world_mut().send_event(ReloadRequest { shooter });
        step(&mut app, 0.0);

        assert!(!app.world().get::<RangedWeapon>(shooter).unwrap().is_reloading);
    }

    #[test]
    fn test_despawn_cancels_pending_reload() {
        let mut app = reload_app();
        let shooter = spawn_partial(&mut app, 0, 60);

        app.world_mut().send_event(ReloadRequest { shooter });
        step(&mut app, 0.0);
        app.world_mut().despawn(shooter);

        step(&mut app, 2.0);
        assert!(finished(&app).is_empty());
    }
}
