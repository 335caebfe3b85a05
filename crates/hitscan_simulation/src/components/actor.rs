//! Базовые компоненты акторов: Actor, Health

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::combat::{HeadContact, HeadshotPolicy, HEAD_REGION};

/// Актор (NPC, игрок, training dummy): базовый компонент для живых существ
///
/// Маркер. Автоматически добавляет Health и Transform через Required Components.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
#[require(Health, Transform)]
pub struct Actor;

/// Health config (static per instance)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthConfig {
    pub max_health: f32,
    /// При смерти просить presentation layer включить ragdoll
    pub auto_ragdoll_on_death: bool,
    pub headshot: HeadshotPolicy,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            max_health: 100.0,
            auto_ragdoll_on_death: true,
            headshot: HeadshotPolicy::default(),
        }
    }
}

/// Что произошло с health после операции
#[derive(Debug, Clone, PartialEq)]
pub enum HealthChange {
    /// Ничего (dead, amount ≤ 0)
    Unchanged,
    /// Generic уведомление подавлено как эхо уже обработанного localized
    EchoSuppressed,
    Damaged { amount: f32, headshot: bool },
    Healed { amount: f32 },
    /// Переход в dead: возвращается ровно один раз за жизнь.
    /// `amount` = сколько health было снято этим ударом
    Killed { amount: f32, headshot: bool },
}

impl HealthChange {
    pub fn is_kill(&self) -> bool {
        matches!(self, HealthChange::Killed { .. })
    }
}

/// Здоровье актора
///
/// Инвариант: 0 ≤ current ≤ max. current == 0 → dead, состояние терминальное:
/// любые damage/heal/kill после этого: no-op.
///
/// Урон приходит двумя каналами на один выстрел (localized, затем generic).
/// Dedup флаг гасит generic эхо. Известная ловушка: localized ВСЕГДА ставит флаг,
/// поэтому если интеграция вызовет только localized канал, следующий
/// НЕзависимый generic урон будет проглочен.
#[derive(Component, Debug, Clone)]
pub struct Health {
    pub current: f32,
    pub max: f32,
    pub auto_ragdoll_on_death: bool,
    pub headshot: HeadshotPolicy,
    suppress_next_generic: bool,
}

impl Default for Health {
    fn default() -> Self {
        Self::from_config(&HealthConfig::default())
    }
}

impl Health {
    pub fn new(max: f32) -> Self {
        Self::from_config(&HealthConfig {
            max_health: max,
            ..Default::default()
        })
    }

    /// Невалидный max (≤ 0 или NaN) заменяется default; дробный max остаётся как есть
    pub fn from_config(config: &HealthConfig) -> Self {
        let max = if config.max_health.is_nan() || config.max_health <= 0.0 {
            HealthConfig::default().max_health
        } else {
            config.max_health
        };
        Self {
            current: max,
            max,
            auto_ragdoll_on_death: config.auto_ragdoll_on_death,
            headshot: config.headshot.clone(),
            suppress_next_generic: false,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0.0
    }

    pub fn is_dead(&self) -> bool {
        !self.is_alive()
    }

    /// Ждём generic эхо последнего localized уведомления
    pub fn is_echo_pending(&self) -> bool {
        self.suppress_next_generic
    }

    pub fn heal(&mut self, amount: f32) -> HealthChange {
        if self.is_dead() || amount.is_nan() || amount <= 0.0 {
            return HealthChange::Unchanged;
        }

        let before = self.current;
        self.current = (self.current + amount).clamp(0.0, self.max);
        HealthChange::Healed {
            amount: self.current - before,
        }
    }

    /// Мгновенная смерть (cheats, тесты, headshot instant kill)
    pub fn kill(&mut self) -> HealthChange {
        if self.is_dead() {
            return HealthChange::Unchanged;
        }

        let amount = self.current;
        self.current = 0.0;
        HealthChange::Killed {
            amount,
            headshot: false,
        }
    }

    /// Localized канал: урон с region (без impact context)
    pub fn notify_localized_damage(&mut self, amount: f32, region: Option<&str>) -> HealthChange {
        self.notify_localized_damage_at(amount, region, None)
    }

    /// Localized канал с impact context для proximity headshot
    ///
    /// Headshot + instant kill → kill. Иначе обычный урон.
    /// В обоих случаях dedup флаг ставится: ждём generic эхо этого выстрела.
    pub fn notify_localized_damage_at(
        &mut self,
        amount: f32,
        region: Option<&str>,
        contact: Option<HeadContact>,
    ) -> HealthChange {
        if self.is_dead() {
            return HealthChange::Unchanged;
        }

        let mut headshot = self.headshot.region_is_head(region);
        let mut region_name = region.unwrap_or("None");
        if !headshot {
            if let Some(contact) = contact.as_ref() {
                if self.headshot.contact_is_head(contact) {
                    headshot = true;
                    region_name = HEAD_REGION;
                }
            }
        }

        if self.headshot.debug_damage {
            crate::logger::log(&format!(
                "[Health] PointDamage: Dmg={:.1} Region={} IsHeadshot={} IK={} Curr={:.1}/{:.1}",
                amount, region_name, headshot, self.headshot.instant_kill, self.current, self.max
            ));
        }

        self.suppress_next_generic = true;

        if headshot && self.headshot.instant_kill {
            let amount = self.current;
            self.current = 0.0;
            return HealthChange::Killed {
                amount,
                headshot: true,
            };
        }

        self.apply_damage(amount, headshot)
    }

    /// Generic канал: "какой-то урон", без location
    ///
    /// Если ждём эхо localized: гасим флаг и ничего не применяем.
    pub fn notify_generic_damage(&mut self, amount: f32) -> HealthChange {
        if self.is_dead() {
            return HealthChange::Unchanged;
        }

        if self.suppress_next_generic {
            self.suppress_next_generic = false;
            return HealthChange::EchoSuppressed;
        }

        if self.headshot.debug_damage {
            crate::logger::log(&format!(
                "[Health] AnyDamage: Dmg={:.1} Curr={:.1}/{:.1}",
                amount, self.current, self.max
            ));
        }

        self.apply_damage(amount, false)
    }

    fn apply_damage(&mut self, amount: f32, headshot: bool) -> HealthChange {
        if amount.is_nan() || amount <= 0.0 {
            return HealthChange::Unchanged;
        }

        let before = self.current;
        self.current = (self.current - amount).clamp(0.0, self.max);

        let amount = before - self.current;
        if self.current <= 0.0 {
            return HealthChange::Killed { amount, headshot };
        }

        HealthChange::Damaged { amount, headshot }
    }
}
