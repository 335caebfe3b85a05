//! Damage delivery и death systems.

use bevy::prelude::*;

use crate::combat::{
    DamageDealt, Dead, EntityDied, GenericDamage, HeadContact, HealRequest, KillRequest, PointDamage,
    RagdollRequested,
};
use crate::components::{Health, HealthChange};
use crate::scene::{SocketLookup, SocketQuery};

/// System: PointDamage → Health (оба канала)
///
/// Host engine на point damage дергает два callback'а: сначала localized
/// (region + impact point), затем generic ("any damage"). Повторяем это
/// в том же порядке и в том же шаге: dedup флаг Health на этом держится.
pub fn deliver_point_damage(
    mut point_events: EventReader<PointDamage>,
    mut targets: Query<&mut Health>,
    sockets: SocketQuery,
    mut damage_dealt_events: EventWriter<DamageDealt>,
    mut entity_died_events: EventWriter<EntityDied>,
) {
    let reference_points = SocketLookup::new(&sockets);

    for event in point_events.read() {
        let Ok(mut health) = targets.get_mut(event.target) else {
            crate::logger::log_warning(&format!(
                "PointDamage: target {:?} has no Health component",
                event.target
            ));
            continue;
        };

        let localized = health.notify_localized_damage_at(
            event.amount,
            event.region.as_deref(),
            Some(HeadContact {
                owner: event.target,
                impact_point: event.impact_point,
                reference_points: &reference_points,
            }),
        );
        report_change(
            &localized,
            Some(event.instigator),
            event.target,
            event.region.as_deref(),
            &mut damage_dealt_events,
            &mut entity_died_events,
        );

        let generic = health.notify_generic_damage(event.amount);
        if generic == HealthChange::EchoSuppressed {
            crate::logger::log(&format!(
                "AnyDamage echo suppressed for {:?} (HP: {:.1}/{:.1})",
                event.target, health.current, health.max
            ));
        }
        report_change(
            &generic,
            Some(event.instigator),
            event.target,
            None,
            &mut damage_dealt_events,
            &mut entity_died_events,
        );
    }
}

/// System: GenericDamage → Health (только generic канал)
pub fn deliver_generic_damage(
    mut generic_events: EventReader<GenericDamage>,
    mut targets: Query<&mut Health>,
    mut damage_dealt_events: EventWriter<DamageDealt>,
    mut entity_died_events: EventWriter<EntityDied>,
) {
    for event in generic_events.read() {
        let Ok(mut health) = targets.get_mut(event.target) else {
            crate::logger::log_warning(&format!(
                "GenericDamage: target {:?} has no Health component",
                event.target
            ));
            continue;
        };

        let change = health.notify_generic_damage(event.amount);
        report_change(
            &change,
            event.instigator,
            event.target,
            None,
            &mut damage_dealt_events,
            &mut entity_died_events,
        );
    }
}

/// System: HealRequest / KillRequest → Health
pub fn process_health_requests(
    mut heal_events: EventReader<HealRequest>,
    mut kill_events: EventReader<KillRequest>,
    mut targets: Query<&mut Health>,
    mut damage_dealt_events: EventWriter<DamageDealt>,
    mut entity_died_events: EventWriter<EntityDied>,
) {
    for event in heal_events.read() {
        let Ok(mut health) = targets.get_mut(event.target) else {
            continue;
        };

        if let HealthChange::Healed { amount } = health.heal(event.amount) {
            crate::logger::log(&format!(
                "💚 {:?} healed +{:.1} (HP: {:.1}/{:.1})",
                event.target, amount, health.current, health.max
            ));
        }
    }

    for event in kill_events.read() {
        let Ok(mut health) = targets.get_mut(event.target) else {
            continue;
        };

        let change = health.kill();
        report_change(
            &change,
            event.killer,
            event.target,
            None,
            &mut damage_dealt_events,
            &mut entity_died_events,
        );
    }
}

/// HealthChange → DamageDealt / EntityDied
///
/// `Killed` приходит из Health один раз за жизнь, поэтому EntityDied тоже один.
pub fn report_change(
    change: &HealthChange,
    attacker: Option<Entity>,
    target: Entity,
    region: Option<&str>,
    damage_dealt_events: &mut EventWriter<DamageDealt>,
    entity_died_events: &mut EventWriter<EntityDied>,
) {
    match *change {
        HealthChange::Damaged { amount, headshot } => {
            damage_dealt_events.write(DamageDealt {
                attacker,
                target,
                amount,
                region: region.map(str::to_string),
                headshot,
                target_died: false,
            });

            crate::logger::log(&format!(
                "💥 {:?} took {:.2} damage (region: {}, headshot: {})",
                target,
                amount,
                region.unwrap_or("None"),
                headshot
            ));
        }
        HealthChange::Killed { amount, headshot } => {
            damage_dealt_events.write(DamageDealt {
                attacker,
                target,
                amount,
                region: region.map(str::to_string),
                headshot,
                target_died: true,
            });
            entity_died_events.write(EntityDied {
                entity: target,
                killer: attacker,
                headshot,
            });

            crate::logger::log_info(&format!(
                "☠️ {:?} killed by {:?} (headshot: {})",
                target, attacker, headshot
            ));
        }
        HealthChange::Unchanged | HealthChange::EchoSuppressed | HealthChange::Healed { .. } => {}
    }
}

/// System: death transition
///
/// Маркер Dead + (если включено) ragdoll request для presentation layer.
pub fn apply_death_effects(
    mut commands: Commands,
    mut death_events: EventReader<EntityDied>,
    targets: Query<&Health>,
    mut ragdoll_events: EventWriter<RagdollRequested>,
) {
    for event in death_events.read() {
        let Ok(mut entity_commands) = commands.get_entity(event.entity) else {
            continue;
        };
        entity_commands.insert(Dead);

        let ragdoll = targets
            .get(event.entity)
            .map(|health| health.auto_ragdoll_on_death)
            .unwrap_or(false);
        if ragdoll {
            ragdoll_events.write(RagdollRequested {
                entity: event.entity,
            });
        }

        crate::logger::log_info(&format!("Entity {:?} DIED (ragdoll: {})", event.entity, ragdoll));
    }
}
