//! Body region → damage multiplier
//!
//! Region tag = имя кости скелета ("head", "Thigh_L", "spine_02"...).
//! Match: case-insensitive substring, первое совпадение в таблице выигрывает.

/// Таблица множителей (порядок важен: "head" раньше "neck")
pub const REGION_MULTIPLIERS: &[(&[&str], f32)] = &[
    (&["head"], 2.0),
    (&["neck"], 1.5),
    (&["torso", "spine", "pelvis", "chest"], 1.0),
    (&["upperarm", "lowerarm", "hand"], 0.75),
    (&["thigh", "calf", "foot"], 0.75),
];

/// Множитель для неизвестного / отсутствующего region
pub const DEFAULT_REGION_MULTIPLIER: f32 = 1.0;

/// Множитель урона для region tag
pub fn region_multiplier(region: Option<&str>) -> f32 {
    let Some(region) = region else {
        return DEFAULT_REGION_MULTIPLIER;
    };
    let name = region.to_lowercase();

    REGION_MULTIPLIERS
        .iter()
        .find(|(needles, _)| needles.iter().any(|needle| name.contains(needle)))
        .map(|(_, multiplier)| *multiplier)
        .unwrap_or(DEFAULT_REGION_MULTIPLIER)
}

/// Итоговый урон выстрела: base × multiplier(region)
pub fn final_damage(base_damage: f32, region: Option<&str>) -> f32 {
    base_damage * region_multiplier(region)
}
