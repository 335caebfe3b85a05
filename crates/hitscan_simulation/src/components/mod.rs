//! ECS Components для игровых entity
//!
//! Организация по доменам:
//! - actor: маркер актора, health, headshot policy
//!
//! Оружие живёт в `combat` (RangedWeapon), sockets: в `scene`.

pub mod actor;

// Re-exports для удобного импорта
pub use actor::*;
