//! Per-shot hit data: trace candidates и resolved hit
//!
//! Architecture:
//! - Scene query (physics engine / host engine / test double) отдаёт `ImpactCandidate` список
//!   в порядке ray parameter (ближайший первый)
//! - `select_hit` сводит его к одному `ResolvedHit`
//! - Ничего из этого не живёт дольше одного fire call

use bevy::prelude::*;

/// Имя body region / reference point головы
pub const HEAD_REGION: &str = "head";

/// Тип collision shape, по которому прошёл луч
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum ShapeKind {
    /// Грубый proxy (capsule актора): регистрируется первым, region не несёт
    CoarseProxy,
    /// Точный proxy (skeletal mesh / per-bone hitboxes): несёт region tag
    FineMesh,
    /// Всё остальное (стены, пропсы)
    Static,
}

/// Ссылка на конкретный shape внутри сцены
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub struct ShapeRef {
    /// Entity collider'а (может совпадать с actor)
    pub entity: Entity,
    pub kind: ShapeKind,
}

impl ShapeRef {
    pub fn new(entity: Entity, kind: ShapeKind) -> Self {
        Self { entity, kind }
    }

    pub fn is_coarse_proxy(&self) -> bool {
        self.kind == ShapeKind::CoarseProxy
    }

    pub fn is_fine_mesh(&self) -> bool {
        self.kind == ShapeKind::FineMesh
    }
}

/// Одно пересечение луча со shape
#[derive(Debug, Clone, PartialEq, Reflect)]
pub struct ImpactCandidate {
    /// Актор-владелец shape (None = геометрия мира без владельца)
    pub actor: Option<Entity>,
    pub shape: ShapeRef,
    /// Body region (имя кости), None если shape его не знает
    pub region: Option<String>,
    pub impact_point: Vec3,
    /// Останавливает ли луч (vs pass-through overlap)
    pub blocking: bool,
}

impl ImpactCandidate {
    pub fn blocking(actor: Option<Entity>, shape: ShapeRef, impact_point: Vec3) -> Self {
        Self {
            actor,
            shape,
            region: None,
            impact_point,
            blocking: true,
        }
    }

    pub fn overlap(actor: Option<Entity>, shape: ShapeRef, impact_point: Vec3) -> Self {
        Self {
            blocking: false,
            ..Self::blocking(actor, shape, impact_point)
        }
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }
}

/// Итог resolve: единственная authoritative точка попадания
#[derive(Debug, Clone, PartialEq, Reflect)]
pub struct ResolvedHit {
    /// Актор, которому уйдёт damage instruction (None = попали в мир)
    pub actor: Option<Entity>,
    pub shape: ShapeRef,
    /// Region tag; None трактуется как generic body (multiplier 1.0)
    pub region: Option<String>,
    pub impact_point: Vec3,
    /// Расстояние от начала луча
    pub distance: f32,
    /// Region был синтезирован proximity fallback'ом (а не пришёл из shape)
    pub region_from_proximity: bool,
}

impl ResolvedHit {
    pub(crate) fn from_candidate(candidate: &ImpactCandidate, origin: Vec3) -> Self {
        Self {
            actor: candidate.actor,
            shape: candidate.shape,
            region: candidate.region.clone(),
            impact_point: candidate.impact_point,
            distance: origin.distance(candidate.impact_point),
            region_from_proximity: false,
        }
    }

    pub fn region_name(&self) -> &str {
        self.region.as_deref().unwrap_or("None")
    }
}
