//! Weapon systems: fire requests → trace → damage instruction

use bevy::prelude::*;

use crate::combat::{
    FireOutcome, FireRequest, PointDamage, RangedWeapon, ReloadStarted, ReloadTimer, WeaponFired,
};
use crate::scene::{SceneQueryService, SocketLookup, SocketQuery};

/// System: обработка FireRequest
///
/// 1. `RangedWeapon::fire` (canFire guard, trace, resolve, ammo)
/// 2. Попадание в актора → ровно один `PointDamage`
/// 3. Магазин опустел → `ReloadTimer` на стрелка
///
/// Нет scene service → выстрелы уходят в молоко (без паники).
pub fn process_fire_requests(
    mut commands: Commands,
    mut requests: EventReader<FireRequest>,
    mut weapons: Query<&mut RangedWeapon>,
    sockets: SocketQuery,
    scene: Option<Res<SceneQueryService>>,
    time: Res<Time>,
    mut damage_events: EventWriter<PointDamage>,
    mut fired_events: EventWriter<WeaponFired>,
    mut reload_events: EventWriter<ReloadStarted>,
) {
    let now = time.elapsed_secs_f64();
    let reference_points = SocketLookup::new(&sockets);
    let scene = scene.as_deref().map(|service| service.0.as_ref());

    for request in requests.read() {
        let Ok(mut weapon) = weapons.get_mut(request.shooter) else {
            crate::logger::log_warning(&format!(
                "FireRequest: shooter {:?} has no RangedWeapon",
                request.shooter
            ));
            continue;
        };

        let outcome = weapon.fire(
            now,
            request.origin,
            request.aim_direction,
            Some(request.shooter),
            scene,
            &reference_points,
        );

        let FireOutcome::Fired {
            hit,
            terminus,
            reload_started,
        } = outcome
        else {
            continue;
        };

        let hit_actor = hit.as_ref().and_then(|shot| shot.hit.actor);

        if let Some(shot) = hit.as_ref() {
            if let Some(target) = shot.hit.actor {
                damage_events.write(PointDamage {
                    instigator: request.shooter,
                    target,
                    amount: shot.damage,
                    region: shot.hit.region.clone(),
                    impact_point: shot.hit.impact_point,
                    direction: request.aim_direction.normalize_or_zero(),
                });

                crate::logger::log(&format!(
                    "🎯 {:?} hit {:?} region={} dist={:.0} dmg={:.2}",
                    request.shooter,
                    target,
                    shot.hit.region_name(),
                    shot.hit.distance,
                    shot.damage
                ));
            }
        }

        fired_events.write(WeaponFired {
            shooter: request.shooter,
            origin: request.origin,
            terminus,
            hit_actor,
            region: hit.and_then(|shot| shot.hit.region),
            ammo_in_magazine: weapon.ammo_in_magazine,
        });

        crate::logger::log(&format!(
            "🔫 {:?} fired (ammo: {}/{}, reserve: {})",
            request.shooter, weapon.ammo_in_magazine, weapon.stats.magazine_size, weapon.reserve_ammo
        ));

        if reload_started {
            start_reload_timer(&mut commands, &mut reload_events, request.shooter, &weapon);
        }
    }
}

/// Ставит one-shot таймер перезарядки на владельца оружия
pub(crate) fn start_reload_timer(
    commands: &mut Commands,
    reload_events: &mut EventWriter<ReloadStarted>,
    shooter: Entity,
    weapon: &RangedWeapon,
) {
    let duration = weapon.stats.reload_duration;
    commands.entity(shooter).insert(ReloadTimer::new(duration));
    reload_events.write(ReloadStarted { shooter, duration });

    crate::logger::log_info(&format!(
        "🔄 {:?} reloading ({:.1}s, reserve: {})",
        shooter, duration, weapon.reserve_ammo
    ));
}
