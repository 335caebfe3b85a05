//! Combat system module (hitscan weapon → health)
//!
//! ECS ответственность:
//! - Game state: RangedWeapon (ammo, reload), Health (dual-channel damage)
//! - Combat rules: hit selection, region multipliers, headshot policy
//! - Events: FireRequest → PointDamage → DamageDealt / EntityDied
//!
//! Host engine ответственность (через порты в `scene`):
//! - SceneQuery: ray trace с multi-hit результатами
//! - ReferencePoints: именованные точки скелета ("head")

use bevy::prelude::*;

pub mod damage;
pub mod headshot;
pub mod hit;
pub mod hit_resolver;
pub mod region;
pub mod systems;
pub mod weapon;
pub mod weapon_stats;

// Re-export основных типов
pub use damage::{
    DamageDealt, Dead, EntityDied, GenericDamage, HealRequest, KillRequest, PointDamage,
    RagdollRequested,
};
pub use headshot::{HeadContact, HeadshotPolicy};
pub use hit::{ImpactCandidate, ResolvedHit, ShapeKind, ShapeRef, HEAD_REGION};
pub use hit_resolver::{select_hit, ResolveParams};
pub use region::{final_damage, region_multiplier};
pub use weapon::{
    FireOutcome, FireRequest, RangedWeapon, ReloadFinished, ReloadRequest, ReloadStarted,
    ReloadTimer, ShotHit, WeaponFired,
};
pub use weapon_stats::WeaponStats;

/// Combat Plugin
///
/// Регистрирует combat системы в FixedUpdate (60Hz).
///
/// Порядок выполнения:
/// 1. process_reload_requests: ручная перезарядка
/// 2. tick_reload_timers: завершение перезарядки
/// 3. process_fire_requests: trace + resolve → PointDamage
/// 4. deliver_point_damage: localized, затем generic канал Health
/// 5. deliver_generic_damage / process_health_requests: прочие источники
/// 6. apply_death_effects: Dead маркер + ragdoll request
///
/// Выстрел и его урон применяются в одном шаге.
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        // Регистрация событий
        app.add_event::<FireRequest>()
            .add_event::<ReloadRequest>()
            .add_event::<WeaponFired>()
            .add_event::<ReloadStarted>()
            .add_event::<ReloadFinished>()
            .add_event::<PointDamage>()
            .add_event::<GenericDamage>()
            .add_event::<HealRequest>()
            .add_event::<KillRequest>()
            .add_event::<DamageDealt>()
            .add_event::<EntityDied>()
            .add_event::<RagdollRequested>();

        // Регистрация систем в FixedUpdate
        app.add_systems(
            FixedUpdate,
            (
                // Фаза 1: Reload (до выстрела: fire видит актуальный магазин)
                systems::process_reload_requests,
                systems::tick_reload_timers,

                // Фаза 2: Fire
                systems::process_fire_requests,

                // Фаза 3: Damage application
                systems::deliver_point_damage,
                systems::deliver_generic_damage,
                systems::process_health_requests,

                // Фаза 4: Death handling
                systems::apply_death_effects,
            )
                .chain(), // Последовательное выполнение
        );
    }
}
