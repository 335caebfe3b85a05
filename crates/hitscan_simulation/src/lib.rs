//! Hitscan Simulation Core
//!
//! ECS-симуляция на Bevy 0.16: hitscan оружие, выбор попадания, урон по регионам
//! тела, headshot политика и dual-channel health.
//!
//! HYBRID ARCHITECTURE:
//! - ECS = game state + combat rules (этот crate)
//! - Host engine = physics/skeleton, подключается через порты `scene::SceneQuery`
//!   и `scene::ReferencePoints`

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod combat;
pub mod components;
pub mod config;
pub mod logger;
pub mod scene;

// Re-export базовых типов для удобства
pub use combat::{
    final_damage, select_hit, CombatPlugin, DamageDealt, Dead, EntityDied, FireOutcome, FireRequest,
    GenericDamage, HeadshotPolicy, ImpactCandidate, PointDamage, RagdollRequested, RangedWeapon,
    ReloadFinished, ReloadRequest, ReloadStarted, ResolvedHit, ShapeKind, ShapeRef, WeaponFired,
    WeaponStats,
};
pub use components::*;
pub use config::{Loadout, LoadoutError};
pub use scene::{ReferencePoints, SceneQuery, SceneQueryService, ScriptedScene, Sockets};

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app
            // Fixed timestep 60Hz для simulation tick
            .insert_resource(Time::<Fixed>::from_hz(60.0))
            // Детерминистичный RNG (seed по умолчанию)
            .init_resource::<DeterministicRng>()
            .add_plugins(CombatPlugin);
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

impl Default for DeterministicRng {
    fn default() -> Self {
        Self::new(42)
    }
}

/// Создаёт minimal Bevy App для headless симуляции
///
/// `SimulationPlugin` уже добавлен; scene service ставит вызывающий.
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    logger::init_logger();
    app.add_plugins((MinimalPlugins, SimulationPlugin))
        .insert_resource(DeterministicRng::new(seed));

    app
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
