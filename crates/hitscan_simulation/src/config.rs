//! Loadout: конфиг оружия и цели для headless runner'а
//!
//! JSON файл, все поля опциональны (отсутствующие → defaults):
//!
//! ```json
//! {
//!   "weapon": { "base_damage": 40.0, "magazine_size": 6 },
//!   "target_health": { "max_health": 150.0, "headshot": { "instant_kill": true } }
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::combat::WeaponStats;
use crate::components::HealthConfig;

/// Оружие стрелка + health config цели
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Loadout {
    pub weapon: WeaponStats,
    pub target_health: HealthConfig,
}

/// Ошибка загрузки loadout
#[derive(Debug, Error)]
pub enum LoadoutError {
    #[error("failed to read loadout: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid loadout JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

impl Loadout {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadoutError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, LoadoutError> {
        Ok(serde_json::from_str(text)?)
    }
}
