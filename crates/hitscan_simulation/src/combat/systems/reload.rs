//! Reload systems: ручной запрос + тик one-shot таймера

use bevy::prelude::*;

use super::weapon::start_reload_timer;
use crate::combat::{RangedWeapon, ReloadFinished, ReloadRequest, ReloadStarted, ReloadTimer};

/// System: ручная перезарядка (ReloadRequest → begin_reload → ReloadTimer)
pub fn process_reload_requests(
    mut commands: Commands,
    mut requests: EventReader<ReloadRequest>,
    mut weapons: Query<&mut RangedWeapon>,
    mut reload_events: EventWriter<ReloadStarted>,
) {
    for request in requests.read() {
        let Ok(mut weapon) = weapons.get_mut(request.shooter) else {
            crate::logger::log_warning(&format!(
                "ReloadRequest: shooter {:?} has no RangedWeapon",
                request.shooter
            ));
            continue;
        };

        if weapon.begin_reload() {
            start_reload_timer(&mut commands, &mut reload_events, request.shooter, &weapon);
        }
    }
}

/// System: тик таймеров перезарядки
///
/// Таймер истёк → патроны из запаса в магазин, таймер снимается.
/// Таймер живёт на владельце: despawn владельца отменяет перезарядку.
pub fn tick_reload_timers(
    mut commands: Commands,
    mut reloading: Query<(Entity, &mut ReloadTimer, &mut RangedWeapon)>,
    time: Res<Time>,
    mut finished_events: EventWriter<ReloadFinished>,
) {
    for (entity, mut timer, mut weapon) in reloading.iter_mut() {
        timer.0.tick(time.delta());
        if !timer.0.finished() {
            continue;
        }

        let loaded = weapon.finish_reload();
        commands.entity(entity).remove::<ReloadTimer>();
        finished_events.write(ReloadFinished {
            shooter: entity,
            loaded,
        });

        crate::logger::log_info(&format!(
            "✅ {:?} reloaded +{} (ammo: {}/{}, reserve: {})",
            entity, loaded, weapon.ammo_in_magazine, weapon.stats.magazine_size, weapon.reserve_ammo
        ));
    }
}
