//! Tests for weapon systems.

#[cfg(test)]
mod tests {
    use bevy::prelude::*;

    use crate::combat::systems::process_fire_requests;
    use crate::combat::{
        FireRequest, ImpactCandidate, PointDamage, RangedWeapon, ReloadStarted, ReloadTimer, ShapeKind,
        ShapeRef, WeaponFired, WeaponStats,
    };
    use crate::scene::{SceneQueryService, ScriptedScene, Sockets};

    fn weapon_app() -> App {
        let mut app = App::new();
        app.init_resource::<Time>()
            .add_event::<FireRequest>()
            .add_event::<PointDamage>()
            .add_event::<WeaponFired>()
            .add_event::<ReloadStarted>()
            .add_systems(Update, process_fire_requests);
        app
    }

    fn collect<E: Event + Clone>(app: &App) -> Vec<E> {
        app.world()
            .resource::<Events<E>>()
            .iter_current_update_events()
            .cloned()
            .collect()
    }

    fn fire(app: &mut App, shooter: Entity) {
        app.world_mut().send_event(FireRequest {
            shooter,
            origin: Vec3::ZERO,
            aim_direction: Vec3::Z * 3.0,
        });
        app.update();
    }

    #[test]
    fn test_hit_emits_exactly_one_point_damage() {
        let mut app = weapon_app();
        let target = app.world_mut().spawn(Transform::default()).id();
        app.insert_resource(SceneQueryService::new(
            ScriptedScene::new(1.0)
                .with(ImpactCandidate::blocking(
                    Some(target),
                    ShapeRef::new(target, ShapeKind::CoarseProxy),
                    Vec3::Z * 500.0,
                ))
                .with(
                    ImpactCandidate::blocking(
                        Some(target),
                        ShapeRef::new(target, ShapeKind::FineMesh),
                        Vec3::Z * 505.0,
                    )
                    .with_region("Thigh_L"),
                ),
        ));
        let shooter = app.world_mut().spawn(RangedWeapon::default()).id();

        fire(&mut app, shooter);

        let damage = collect::<PointDamage>(&app);
        assert_eq!(damage.len(), 1);
        assert_eq!(damage[0].target, target);
        assert_eq!(damage[0].instigator, shooter);
        assert_eq!(damage[0].amount, 18.75);
        assert_eq!(damage[0].region.as_deref(), Some("Thigh_L"));
        assert_eq!(damage[0].direction, Vec3::Z);

        let fired = collect::<WeaponFired>(&app);
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].hit_actor, Some(target));
        assert_eq!(fired[0].terminus, Vec3::Z * 505.0);
        assert_eq!(fired[0].ammo_in_magazine, 11);
    }

    #[test]
    fn test_proximity_head_from_sockets() {
        let mut app = weapon_app();
        let target = app
            .world_mut()
            .spawn((
                Transform::from_translation(Vec3::Z * 500.0),
                Sockets::default().with("head", Vec3::new(0.0, 170.0, 0.0)),
            ))
            .id();
        // Только capsule, без mesh → region придёт из proximity
        app.insert_resource(SceneQueryService::new(ScriptedScene::new(1.0).with(
            ImpactCandidate::blocking(
                Some(target),
                ShapeRef::new(target, ShapeKind::CoarseProxy),
                Vec3::new(0.0, 165.0, 490.0),
            ),
        )));
        let shooter = app.world_mut().spawn(RangedWeapon::default()).id();

        app.world_mut().send_event(FireRequest {
            shooter,
            origin: Vec3::new(0.0, 165.0, 0.0),
            aim_direction: Vec3::Z,
        });
        app.update();

        let damage = collect::<PointDamage>(&app);
        assert_eq!(damage.len(), 1);
        assert_eq!(damage[0].region.as_deref(), Some("head"));
        assert_eq!(damage[0].amount, 50.0);
    }

    #[test]
    fn test_miss_emits_no_damage() {
        let mut app = weapon_app();
        app.insert_resource(SceneQueryService::new(ScriptedScene::new(1.0)));
        let shooter = app.world_mut().spawn(RangedWeapon::default()).id();

        fire(&mut app, shooter);

        assert!(collect::<PointDamage>(&app).is_empty());
        let fired = collect::<WeaponFired>(&app);
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].hit_actor, None);
    }

    #[test]
    fn test_missing_scene_service_degrades_to_miss() {
        let mut app = weapon_app();
        let shooter = app.world_mut().spawn(RangedWeapon::default()).id();

        fire(&mut app, shooter);

        assert!(collect::<PointDamage>(&app).is_empty());
        assert_eq!(collect::<WeaponFired>(&app).len(), 1);
        assert_eq!(
            app.world().get::<RangedWeapon>(shooter).unwrap().ammo_in_magazine,
            11
        );
    }

    #[test]
    fn test_request_without_weapon_is_ignored() {
        let mut app = weapon_app();
        let not_armed = app.world_mut().spawn(Transform::default()).id();

        fire(&mut app, not_armed);

        assert!(collect::<WeaponFired>(&app).is_empty());
    }

    #[test]
    fn test_empty_magazine_schedules_reload_timer() {
        let mut app = weapon_app();
        let shooter = app
            .world_mut()
            .spawn(RangedWeapon::new(WeaponStats {
                magazine_size: 1,
                reserve_ammo: 10,
                ..Default::default()
            }))
            .id();

        fire(&mut app, shooter);

        let weapon = app.world().get::<RangedWeapon>(shooter).unwrap();
        assert_eq!(weapon.ammo_in_magazine, 0);
        assert!(weapon.is_reloading);
        assert!(app.world().get::<ReloadTimer>(shooter).is_some());

        let started = collect::<ReloadStarted>(&app);
        assert_eq!(started.len(), 1);
        assert_eq!(started[0].duration, 1.6);
    }

    #[test]
    fn test_rate_limited_request_is_rejected() {
        let mut app = weapon_app();
        let shooter = app.world_mut().spawn(RangedWeapon::default()).id();

        // Два запроса в одном шаге: время не двигается → второй упирается в rate of fire
        app.world_mut().send_event(FireRequest {
            shooter,
            origin: Vec3::ZERO,
            aim_direction: Vec3::Z,
        });
        fire(&mut app, shooter);

        assert_eq!(collect::<WeaponFired>(&app).len(), 1);
        assert_eq!(
            app.world().get::<RangedWeapon>(shooter).unwrap().ammo_in_magazine,
            11
        );
    }
}
