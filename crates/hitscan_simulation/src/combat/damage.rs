//! Damage events и death маркеры
//!
//! Поток одного выстрела:
//! - weapon пишет ОДИН `PointDamage` (damage instruction)
//! - delivery система отдаёт его в Health двумя каналами: localized, затем generic
//!   (так host engine репортит point damage)
//! - каждое принятое изменение → `DamageDealt`; переход в dead → `EntityDied`

use bevy::prelude::*;

/// Event: damage instruction от оружия (weapon → health)
#[derive(Event, Debug, Clone)]
pub struct PointDamage {
    /// Кто стрелял
    pub instigator: Entity,
    /// Актор с `Health`
    pub target: Entity,
    /// Итоговый урон (уже с region multiplier)
    pub amount: f32,
    pub region: Option<String>,
    pub impact_point: Vec3,
    /// Направление выстрела (нормализованное)
    pub direction: Vec3,
}

/// Event: урон без location (окружение, cheats): только generic канал
#[derive(Event, Debug, Clone)]
pub struct GenericDamage {
    pub instigator: Option<Entity>,
    pub target: Entity,
    pub amount: f32,
}

/// Event: лечение (аптечки, regen, cheats)
#[derive(Event, Debug, Clone)]
pub struct HealRequest {
    pub target: Entity,
    pub amount: f32,
}

/// Event: мгновенная смерть (cheats, тесты, kill volumes)
#[derive(Event, Debug, Clone)]
pub struct KillRequest {
    pub target: Entity,
    pub killer: Option<Entity>,
}

/// Event: урон применён к Health
///
/// Используется для UI, звуков, эффектов.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct DamageDealt {
    pub attacker: Option<Entity>,
    pub target: Entity,
    /// Сколько health реально снято
    pub amount: f32,
    pub region: Option<String>,
    pub headshot: bool,
    pub target_died: bool,
}

/// Event: entity умер (health дошёл до 0). Пишется ровно один раз на entity
#[derive(Event, Debug, Clone)]
pub struct EntityDied {
    pub entity: Entity,
    pub killer: Option<Entity>,
    pub headshot: bool,
}

/// Event: presentation layer: включить ragdoll / выключить движение
#[derive(Event, Debug, Clone)]
pub struct RagdollRequested {
    pub entity: Entity,
}

/// Компонент-маркер: entity мертв
///
/// Деспавн не автоматический: трупы остаются на месте.
#[derive(Component, Debug)]
pub struct Dead;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_damage_dealt_event() {
        let event = DamageDealt {
            attacker: Some(Entity::PLACEHOLDER),
            target: Entity::PLACEHOLDER,
            amount: 18.75,
            region: Some("Thigh_L".to_string()),
            headshot: false,
            target_died: false,
        };

        assert_eq!(event.amount, 18.75);
        assert!(!event.target_died);
    }
}
