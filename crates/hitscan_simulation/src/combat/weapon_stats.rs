//! Hitscan weapon config
//!
//! Static per-instance values: задаются при спавне (или из loadout JSON),
//! в runtime не меняются. Mutable state (патроны, reload): в `RangedWeapon`.

use serde::{Deserialize, Serialize};

use crate::combat::HEAD_REGION;

/// Weapon config (hitscan)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaponStats {
    /// Базовый урон до region multiplier
    pub base_damage: f32,

    /// Выстрелов в секунду (6 = 360 RPM). 0 = без ограничения
    pub rate_of_fire: f32,

    /// Длина trace луча (world units)
    pub trace_range: f32,

    /// Ёмкость магазина
    pub magazine_size: u32,

    /// Запас патронов при спавне
    pub reserve_ammo: u32,

    /// Длительность перезарядки (секунды)
    pub reload_duration: f32,

    /// Радиус proximity fallback вокруг head reference point (world units)
    pub head_proximity_radius: f32,

    /// Имя reference point головы у цели (Sockets)
    pub head_reference: String,

    /// Логировать каждый trace (все кандидаты + terminus)
    pub debug_trace: bool,
}

impl Default for WeaponStats {
    fn default() -> Self {
        Self {
            base_damage: 25.0,
            rate_of_fire: 6.0,
            trace_range: 1_000_000.0,
            magazine_size: 12,
            reserve_ammo: 60,
            reload_duration: 1.6,
            head_proximity_radius: 30.0,
            head_reference: HEAD_REGION.to_string(),
            debug_trace: false,
        }
    }
}

impl WeaponStats {
    /// Минимальный интервал между выстрелами (секунды); None = без ограничения
    pub fn fire_interval(&self) -> Option<f64> {
        (self.rate_of_fire > 0.0).then(|| 1.0 / self.rate_of_fire as f64)
    }

}
