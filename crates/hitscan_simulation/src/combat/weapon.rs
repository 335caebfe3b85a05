//! Ranged weapon state + weapon events
//!
//! Architecture:
//! - `RangedWeapon` (component на владельце): магазин, запас, reload flag, last fire time
//! - Fire: scene trace → `select_hit` → damage × region multiplier → один `PointDamage`
//! - Reload: `ReloadTimer` на том же entity (one-shot, тикает в FixedUpdate).
//!   Despawn владельца = таймер умирает вместе с ним
//!
//! State machine: Idle ⇄ Reloading. Пока Reloading: fire отклоняется.

use bevy::prelude::*;

use crate::combat::{
    region::final_damage, select_hit, ImpactCandidate, ResolveParams, ResolvedHit, WeaponStats,
};
use crate::scene::{ReferencePoints, SceneQuery};

/// Event: запрос на выстрел (input / AI → ECS)
#[derive(Event, Debug, Clone)]
pub struct FireRequest {
    /// Владелец `RangedWeapon`
    pub shooter: Entity,
    /// Muzzle (world space)
    pub origin: Vec3,
    /// Направление прицела (нормализуется внутри)
    pub aim_direction: Vec3,
}

/// Event: запрос на ручную перезарядку
#[derive(Event, Debug, Clone)]
pub struct ReloadRequest {
    pub shooter: Entity,
}

/// Event: выстрел состоялся (для VFX/звука/debug линии)
#[derive(Event, Debug, Clone)]
pub struct WeaponFired {
    pub shooter: Entity,
    pub origin: Vec3,
    /// Impact point, либо конец trace если ничего не заблокировало
    pub terminus: Vec3,
    /// Актор, получивший damage instruction
    pub hit_actor: Option<Entity>,
    pub region: Option<String>,
    pub ammo_in_magazine: u32,
}

/// Event: перезарядка началась
#[derive(Event, Debug, Clone)]
pub struct ReloadStarted {
    pub shooter: Entity,
    pub duration: f32,
}

/// Event: перезарядка завершилась
#[derive(Event, Debug, Clone)]
pub struct ReloadFinished {
    pub shooter: Entity,
    /// Сколько патронов перешло из запаса в магазин
    pub loaded: u32,
}

/// One-shot таймер перезарядки (keyed by owner entity)
#[derive(Component, Debug)]
pub struct ReloadTimer(pub Timer);

impl ReloadTimer {
    pub fn new(duration: f32) -> Self {
        Self(Timer::from_seconds(duration.max(0.0), TimerMode::Once))
    }
}

/// Попадание, которое превращается в damage instruction
#[derive(Debug, Clone, PartialEq)]
pub struct ShotHit {
    pub hit: ResolvedHit,
    /// base_damage × region multiplier
    pub damage: f32,
}

/// Результат `RangedWeapon::fire`
#[derive(Debug, Clone, PartialEq)]
pub enum FireOutcome {
    /// canFire == false или нет shooter: ничего не изменилось
    Rejected,
    Fired {
        /// None = промах (или попали в мир без владельца)
        hit: Option<ShotHit>,
        /// Impact point или конец луча
        terminus: Vec3,
        /// Магазин опустел и запустилась авто-перезарядка
        reload_started: bool,
    },
}

impl FireOutcome {
    pub fn fired(&self) -> bool {
        matches!(self, FireOutcome::Fired { .. })
    }

    pub fn hit(&self) -> Option<&ShotHit> {
        match self {
            FireOutcome::Fired { hit, .. } => hit.as_ref(),
            FireOutcome::Rejected => None,
        }
    }
}

/// Состояние hitscan оружия
///
/// Инварианты: `ammo_in_magazine ≤ stats.magazine_size`; запас не уходит в минус (u32).
#[derive(Component, Debug, Clone)]
pub struct RangedWeapon {
    pub stats: WeaponStats,
    pub ammo_in_magazine: u32,
    pub reserve_ammo: u32,
    pub is_reloading: bool,
    /// Время последнего успешного выстрела (секунды симуляции)
    pub last_fire_time: Option<f64>,
}

impl Default for RangedWeapon {
    fn default() -> Self {
        Self::new(WeaponStats::default())
    }
}

impl RangedWeapon {
    /// Магазин заполнен, запас из stats
    pub fn new(stats: WeaponStats) -> Self {
        Self {
            ammo_in_magazine: stats.magazine_size,
            reserve_ammo: stats.reserve_ammo,
            is_reloading: false,
            last_fire_time: None,
            stats,
        }
    }

    /// Можно ли стрелять прямо сейчас
    pub fn can_fire(&self, now: f64) -> bool {
        if self.is_reloading || self.ammo_in_magazine == 0 {
            return false;
        }

        match (self.stats.fire_interval(), self.last_fire_time) {
            (Some(interval), Some(last)) => now - last >= interval,
            _ => true,
        }
    }

    /// Выстрел: trace → resolve → damage
    ///
    /// `shooter = None` (владелец уже уничтожен) → Rejected.
    /// `scene = None` (нет scene service) → выстрел тратит патрон, но промахивается.
    /// Кандидаты самого стрелка выкидываются до resolve.
    pub fn fire(
        &mut self,
        now: f64,
        origin: Vec3,
        aim_direction: Vec3,
        shooter: Option<Entity>,
        scene: Option<&dyn SceneQuery>,
        reference_points: &dyn ReferencePoints,
    ) -> FireOutcome {
        let Some(shooter) = shooter else {
            return FireOutcome::Rejected;
        };
        if !self.can_fire(now) {
            return FireOutcome::Rejected;
        }

        let direction = aim_direction.normalize_or_zero();
        let end = origin + direction * self.stats.trace_range;

        let candidates: Vec<ImpactCandidate> = scene
            .map(|scene| scene.trace_ray(origin, end))
            .unwrap_or_default()
            .into_iter()
            .filter(|c| c.actor != Some(shooter))
            .collect();

        if self.stats.debug_trace {
            log_trace(origin, &candidates);
        }

        let resolved = select_hit(
            &candidates,
            ResolveParams {
                origin,
                head_proximity_radius: self.stats.head_proximity_radius,
                head_reference: &self.stats.head_reference,
            },
            reference_points,
        );

        let terminus = resolved.as_ref().map(|h| h.impact_point).unwrap_or(end);

        if self.stats.debug_trace {
            crate::logger::log(&format!(
                "🔫 Trace terminus {:?} (blocking: {}, region: {})",
                terminus,
                resolved.is_some(),
                resolved.as_ref().map(|h| h.region_name()).unwrap_or("None"),
            ));
        }

        // Попадание в мир без владельца: damage instruction некому отправлять
        let hit = resolved.filter(|h| h.actor.is_some()).map(|hit| ShotHit {
            damage: final_damage(self.stats.base_damage, hit.region.as_deref()),
            hit,
        });

        self.ammo_in_magazine = self.ammo_in_magazine.saturating_sub(1);
        self.last_fire_time = Some(now);

        let reload_started = self.ammo_in_magazine == 0 && self.begin_reload();

        FireOutcome::Fired {
            hit,
            terminus,
            reload_started,
        }
    }

    /// Начать перезарядку (ставит флаг; таймер ставит вызывающий)
    ///
    /// No-op если уже перезаряжаемся, магазин полон или запас пуст.
    pub fn begin_reload(&mut self) -> bool {
        if self.is_reloading
            || self.ammo_in_magazine >= self.stats.magazine_size
            || self.reserve_ammo == 0
        {
            return false;
        }

        self.is_reloading = true;
        true
    }

    /// Завершить перезарядку: min(need, reserve) из запаса в магазин
    ///
    /// Возвращает сколько патронов перенесено. Без активной перезарядки: 0.
    pub fn finish_reload(&mut self) -> u32 {
        if !self.is_reloading {
            return 0;
        }
        self.is_reloading = false;

        let need = self.stats.magazine_size.saturating_sub(self.ammo_in_magazine);
        let taken = need.min(self.reserve_ammo);
        self.ammo_in_magazine += taken;
        self.reserve_ammo -= taken;
        taken
    }
}

fn log_trace(origin: Vec3, candidates: &[ImpactCandidate]) {
    for (index, c) in candidates.iter().enumerate() {
        crate::logger::log(&format!(
            "[{}] Hit={} Act={:?} Shape={:?} Region={} Dist={:.0}",
            index,
            c.blocking as u8,
            c.actor,
            c.shape.kind,
            c.region.as_deref().unwrap_or("None"),
            origin.distance(c.impact_point),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::{ShapeKind, ShapeRef};
    use crate::scene::{NoReferencePoints, ScriptedScene};

    fn target() -> Entity {
        Entity::from_raw(7)
    }

    fn shooter() -> Option<Entity> {
        Some(Entity::from_raw(1))
    }

    fn head_scene() -> ScriptedScene {
        ScriptedScene::new(5.0)
            .with(ImpactCandidate::blocking(
                Some(target()),
                ShapeRef::new(target(), ShapeKind::CoarseProxy),
                Vec3::new(0.0, 0.0, 990.0),
            ))
            .with(
                ImpactCandidate::blocking(
                    Some(target()),
                    ShapeRef::new(target(), ShapeKind::FineMesh),
                    Vec3::new(0.0, 0.0, 1000.0),
                )
                .with_region("head"),
            )
    }

    fn weapon(magazine: u32, reserve: u32) -> RangedWeapon {
        RangedWeapon::new(WeaponStats {
            magazine_size: magazine,
            reserve_ammo: reserve,
            ..Default::default()
        })
    }

    #[test]
    fn test_new_weapon_has_full_magazine() {
        let weapon = RangedWeapon::default();
        assert_eq!(weapon.ammo_in_magazine, 12);
        assert_eq!(weapon.reserve_ammo, 60);
        assert!(!weapon.is_reloading);
        assert!(weapon.can_fire(0.0));
    }

    #[test]
    fn test_fire_headshot_doubles_damage() {
        let mut weapon = RangedWeapon::default();
        let scene = head_scene();

        let outcome = weapon.fire(0.0, Vec3::ZERO, Vec3::Z, shooter(), Some(&scene), &NoReferencePoints);

        let hit = outcome.hit().expect("head hit");
        assert_eq!(hit.hit.actor, Some(target()));
        assert_eq!(hit.hit.region.as_deref(), Some("head"));
        assert_eq!(hit.damage, 50.0);
        assert_eq!(weapon.ammo_in_magazine, 11);
        assert_eq!(weapon.last_fire_time, Some(0.0));
    }

    #[test]
    fn test_rate_of_fire_limits_shots() {
        let mut weapon = RangedWeapon::default(); // 6 rps → 0.1666s
        let scene = head_scene();

        assert!(weapon.fire(1.0, Vec3::ZERO, Vec3::Z, shooter(), Some(&scene), &NoReferencePoints).fired());
        assert!(!weapon.can_fire(1.1));
        assert_eq!(
            weapon.fire(1.1, Vec3::ZERO, Vec3::Z, shooter(), Some(&scene), &NoReferencePoints),
            FireOutcome::Rejected
        );
        assert_eq!(weapon.ammo_in_magazine, 11);
        assert!(weapon.can_fire(1.2));
    }

    #[test]
    fn test_zero_rate_of_fire_is_unlimited() {
        let mut weapon = RangedWeapon::new(WeaponStats {
            rate_of_fire: 0.0,
            ..Default::default()
        });

        for _ in 0..3 {
            assert!(weapon.fire(5.0, Vec3::ZERO, Vec3::Z, shooter(), None, &NoReferencePoints).fired());
        }
        assert_eq!(weapon.ammo_in_magazine, 9);
    }

    #[test]
    fn test_fire_without_shooter_is_rejected() {
        let mut weapon = RangedWeapon::default();
        let scene = head_scene();

        let outcome = weapon.fire(0.0, Vec3::ZERO, Vec3::Z, None, Some(&scene), &NoReferencePoints);

        assert_eq!(outcome, FireOutcome::Rejected);
        assert_eq!(weapon.ammo_in_magazine, 12);
        assert_eq!(weapon.last_fire_time, None);
    }

    #[test]
    fn test_miss_still_consumes_round() {
        let mut weapon = RangedWeapon::default();
        let scene = ScriptedScene::new(1.0);

        let outcome = weapon.fire(0.0, Vec3::ZERO, Vec3::X, shooter(), Some(&scene), &NoReferencePoints);

        assert!(outcome.fired());
        assert!(outcome.hit().is_none());
        let FireOutcome::Fired { terminus, .. } = outcome else {
            panic!("expected fired");
        };
        assert_eq!(terminus, Vec3::X * 1_000_000.0);
        assert_eq!(weapon.ammo_in_magazine, 11);
    }

    #[test]
    fn test_world_hit_has_no_damage_instruction() {
        let mut weapon = RangedWeapon::default();
        let wall = Entity::from_raw(50);
        let scene = ScriptedScene::new(1.0).with(ImpactCandidate::blocking(
            None,
            ShapeRef::new(wall, ShapeKind::Static),
            Vec3::Z * 100.0,
        ));

        let outcome = weapon.fire(0.0, Vec3::ZERO, Vec3::Z, shooter(), Some(&scene), &NoReferencePoints);

        assert!(outcome.hit().is_none());
        let FireOutcome::Fired { terminus, .. } = outcome else {
            panic!("expected fired");
        };
        assert_eq!(terminus, Vec3::Z * 100.0);
    }

    #[test]
    fn test_shooter_candidates_are_ignored() {
        let mut weapon = RangedWeapon::default();
        let me = Entity::from_raw(1);
        let scene = ScriptedScene::new(1.0)
            .with(ImpactCandidate::blocking(
                Some(me),
                ShapeRef::new(me, ShapeKind::CoarseProxy),
                Vec3::Z * 0.5,
            ))
            .with(
                ImpactCandidate::blocking(Some(target()), ShapeRef::new(target(), ShapeKind::FineMesh), Vec3::Z * 10.0)
                    .with_region("spine_02"),
            );

        let outcome = weapon.fire(0.0, Vec3::ZERO, Vec3::Z, Some(me), Some(&scene), &NoReferencePoints);

        let hit = outcome.hit().expect("target hit");
        assert_eq!(hit.hit.actor, Some(target()));
        assert_eq!(hit.damage, 25.0);
    }

    #[test]
    fn test_last_round_starts_reload() {
        let mut weapon = weapon(1, 10);
        let scene = head_scene();

        let outcome = weapon.fire(0.0, Vec3::ZERO, Vec3::Z, shooter(), Some(&scene), &NoReferencePoints);
        assert!(matches!(outcome, FireOutcome::Fired { reload_started: true, .. }));
        assert_eq!(weapon.ammo_in_magazine, 0);
        assert!(weapon.is_reloading);

        // Во время перезарядки fire отклоняется, патроны не трогаются
        let rejected = weapon.fire(10.0, Vec3::ZERO, Vec3::Z, shooter(), Some(&scene), &NoReferencePoints);
        assert_eq!(rejected, FireOutcome::Rejected);
        assert_eq!(weapon.ammo_in_magazine, 0);
        assert_eq!(weapon.reserve_ammo, 10);

        assert_eq!(weapon.finish_reload(), 1);
        assert_eq!(weapon.ammo_in_magazine, 1);
        assert_eq!(weapon.reserve_ammo, 9);
        assert!(!weapon.is_reloading);
    }

    #[test]
    fn test_last_round_without_reserve_does_not_reload() {
        let mut weapon = weapon(1, 0);

        let outcome = weapon.fire(0.0, Vec3::ZERO, Vec3::Z, shooter(), None, &NoReferencePoints);

        assert!(matches!(outcome, FireOutcome::Fired { reload_started: false, .. }));
        assert!(!weapon.is_reloading);
        assert!(!weapon.can_fire(100.0));
    }

    #[test]
    fn test_reload_guards() {
        let mut full = weapon(12, 60);
        assert!(!full.begin_reload());

        let mut empty_reserve = weapon(12, 0);
        empty_reserve.ammo_in_magazine = 3;
        assert!(!empty_reserve.begin_reload());

        let mut partial = weapon(12, 60);
        partial.ammo_in_magazine = 3;
        assert!(partial.begin_reload());
        assert!(!partial.begin_reload());
    }

    #[test]
    fn test_reload_takes_only_what_reserve_has() {
        let mut weapon = weapon(12, 4);
        weapon.ammo_in_magazine = 2;

        assert!(weapon.begin_reload());
        assert_eq!(weapon.finish_reload(), 4);
        assert_eq!(weapon.ammo_in_magazine, 6);
        assert_eq!(weapon.reserve_ammo, 0);
    }

    #[test]
    fn test_finish_without_reload_is_noop() {
        let mut weapon = weapon(12, 60);
        weapon.ammo_in_magazine = 5;

        assert_eq!(weapon.finish_reload(), 0);
        assert_eq!(weapon.ammo_in_magazine, 5);
        assert_eq!(weapon.reserve_ammo, 60);
    }
}
