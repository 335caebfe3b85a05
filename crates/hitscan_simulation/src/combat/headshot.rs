//! Headshot policy (health layer)
//!
//! Два независимых сигнала headshot:
//! 1. Имя region: exact match по списку голов (case-insensitive);
//!    если список пуст: substring "head"
//! 2. Proximity: impact point рядом с "head" reference point владельца
//!
//! Это отдельная проверка от weapon multiplier'а: оружие считает урон по своей
//! таблице, health решает про instant kill по своей.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::combat::{hit_resolver::within_head_radius, HEAD_REGION};
use crate::scene::ReferencePoints;

/// Как health компонент распознаёт headshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadshotPolicy {
    /// Headshot убивает сразу
    pub instant_kill: bool,

    /// Имена region, которые считаются головой (case-insensitive).
    /// Пустой список → substring "head"
    pub head_regions: Vec<String>,

    /// Радиус proximity fallback (world units); 0 = выключен
    pub proximity_radius: f32,

    /// Логировать каждое damage уведомление
    pub debug_damage: bool,
}

impl Default for HeadshotPolicy {
    fn default() -> Self {
        Self {
            instant_kill: false,
            head_regions: vec![HEAD_REGION.to_string()],
            proximity_radius: 30.0,
            debug_damage: false,
        }
    }
}

/// Impact context для proximity сигнала
pub struct HeadContact<'a> {
    /// Владелец health (чей "head" reference point ищем)
    pub owner: Entity,
    pub impact_point: Vec3,
    pub reference_points: &'a dyn ReferencePoints,
}

impl HeadshotPolicy {
    /// Сигнал 1: имя region
    pub fn region_is_head(&self, region: Option<&str>) -> bool {
        let Some(region) = region.filter(|r| !r.is_empty()) else {
            return false;
        };

        if self.head_regions.is_empty() {
            return region.to_lowercase().contains(HEAD_REGION);
        }

        let region = region.to_lowercase();
        self.head_regions
            .iter()
            .any(|head| head.to_lowercase() == region)
    }

    /// Сигнал 2: proximity к "head" reference point
    pub fn contact_is_head(&self, contact: &HeadContact) -> bool {
        self.proximity_radius > 0.0
            && within_head_radius(
                contact.owner,
                contact.impact_point,
                self.proximity_radius,
                HEAD_REGION,
                contact.reference_points,
            )
    }
}
