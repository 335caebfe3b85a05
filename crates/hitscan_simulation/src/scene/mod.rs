//! Scene ports: ray trace + named reference points
//!
//! ECS не владеет физикой: trace делает внешний scene service
//! (physics engine, host engine, test double). Здесь только контракты.

use std::collections::HashMap;

use bevy::prelude::*;

use crate::combat::ImpactCandidate;

/// Multi-hit ray trace
///
/// Контракт: кандидаты отсортированы по расстоянию от `origin` (ray parameter),
/// включая non-blocking overlaps.
pub trait SceneQuery: Send + Sync {
    fn trace_ray(&self, origin: Vec3, end: Vec3) -> Vec<ImpactCandidate>;
}

/// Установленный scene service
///
/// Без этого resource каждый выстрел резолвится в "no hit".
#[derive(Resource)]
pub struct SceneQueryService(pub Box<dyn SceneQuery>);

impl SceneQueryService {
    pub fn new(query: impl SceneQuery + 'static) -> Self {
        Self(Box::new(query))
    }

    pub fn trace_ray(&self, origin: Vec3, end: Vec3) -> Vec<ImpactCandidate> {
        self.0.trace_ray(origin, end)
    }
}

/// Named reference points актора (sockets скелета)
pub trait ReferencePoints {
    fn has_named_reference_point(&self, actor: Entity, name: &str) -> bool;

    /// World-space позиция; None если точки нет
    fn reference_point_location(&self, actor: Entity, name: &str) -> Option<Vec3>;
}

/// Null lookup: ни у кого нет reference points
pub struct NoReferencePoints;

impl ReferencePoints for NoReferencePoints {
    fn has_named_reference_point(&self, _actor: Entity, _name: &str) -> bool {
        false
    }

    fn reference_point_location(&self, _actor: Entity, _name: &str) -> Option<Vec3> {
        None
    }
}

/// Sockets актора: имя → local offset от Transform
///
/// Имена case-sensitive, как у костей скелета.
#[derive(Component, Debug, Clone, Default)]
pub struct Sockets {
    pub points: HashMap<String, Vec3>,
}

impl Sockets {
    pub fn with(mut self, name: impl Into<String>, local_offset: Vec3) -> Self {
        self.points.insert(name.into(), local_offset);
        self
    }

    pub fn world_location(&self, transform: &Transform, name: &str) -> Option<Vec3> {
        self.points
            .get(name)
            .map(|offset| transform.transform_point(*offset))
    }
}

/// Query, из которой систему строят `SocketLookup`
pub type SocketQuery<'w, 's> = Query<'w, 's, (&'static Transform, &'static Sockets)>;

/// ECS-backed `ReferencePoints` поверх query (Transform + Sockets)
pub struct SocketLookup<'a, 'w, 's> {
    query: &'a SocketQuery<'w, 's>,
}

impl<'a, 'w, 's> SocketLookup<'a, 'w, 's> {
    pub fn new(query: &'a SocketQuery<'w, 's>) -> Self {
        Self { query }
    }
}

impl ReferencePoints for SocketLookup<'_, '_, '_> {
    fn has_named_reference_point(&self, actor: Entity, name: &str) -> bool {
        self.query
            .get(actor)
            .map(|(_, sockets)| sockets.points.contains_key(name))
            .unwrap_or(false)
    }

    fn reference_point_location(&self, actor: Entity, name: &str) -> Option<Vec3> {
        let (transform, sockets) = self.query.get(actor).ok()?;
        sockets.world_location(transform, name)
    }
}

/// Scripted scene: заранее заданные пересечения вдоль луча
///
/// Замена physics engine для headless демо и тестов. Каждое "тело":
/// набор кандидатов; trace возвращает те, что лежат на отрезке [origin, end]
/// (с допуском `tolerance` от линии), отсортированные по расстоянию.
#[derive(Debug, Clone, Default)]
pub struct ScriptedScene {
    pub bodies: Vec<ImpactCandidate>,
    /// Максимальное расстояние точки от линии луча, чтобы считаться пересечением
    pub tolerance: f32,
}

impl ScriptedScene {
    pub fn new(tolerance: f32) -> Self {
        Self {
            bodies: Vec::new(),
            tolerance,
        }
    }

    pub fn with(mut self, candidate: ImpactCandidate) -> Self {
        self.bodies.push(candidate);
        self
    }
}

impl SceneQuery for ScriptedScene {
    fn trace_ray(&self, origin: Vec3, end: Vec3) -> Vec<ImpactCandidate> {
        let segment = end - origin;
        let length = segment.length();
        if length <= f32::EPSILON {
            return Vec::new();
        }
        let direction = segment / length;

        let mut hits: Vec<(f32, ImpactCandidate)> = self
            .bodies
            .iter()
            .filter_map(|candidate| {
                let to_point = candidate.impact_point - origin;
                let along = to_point.dot(direction);
                if along < 0.0 || along > length {
                    return None;
                }
                let off_line = (to_point - direction * along).length();
                (off_line <= self.tolerance).then(|| (along, candidate.clone()))
            })
            .collect();

        // Стабильная сортировка: при равной дистанции сохраняем порядок регистрации
        hits.sort_by(|a, b| a.0.total_cmp(&b.0));
        hits.into_iter().map(|(_, candidate)| candidate).collect()
    }
}
