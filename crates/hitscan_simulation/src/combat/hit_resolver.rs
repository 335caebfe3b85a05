//! HitResolver: ordered trace candidates → одна authoritative точка попадания
//!
//! Алгоритм:
//! 1. Первый blocking кандидат = provisional hit
//! 2. Pierce-through: provisional на coarse proxy актора → ищем дальше первый
//!    blocking fine mesh того же актора (только он несёт region)
//! 3. Region fallback: region нет (или пустой) → distance до head reference point ≤ radius → "head"
//!
//! Tie-break только по позиции в списке (ray parameter), никаких приоритетов актора.
//! Stateless: безопасно вызывать откуда угодно.

use bevy::prelude::*;

use crate::combat::{ImpactCandidate, ResolvedHit, HEAD_REGION};
use crate::scene::ReferencePoints;

/// Параметры resolve одного выстрела
#[derive(Debug, Clone, Copy)]
pub struct ResolveParams<'a> {
    /// Начало луча (для `ResolvedHit::distance`)
    pub origin: Vec3,
    /// Радиус proximity fallback вокруг head reference point
    pub head_proximity_radius: f32,
    /// Имя reference point головы (обычно "head"); region всё равно синтезируется как "head"
    pub head_reference: &'a str,
}

/// Выбрать authoritative hit
///
/// Возвращает `None` для пустого списка и для списка без blocking кандидатов.
pub fn select_hit(
    candidates: &[ImpactCandidate],
    params: ResolveParams<'_>,
    reference_points: &dyn ReferencePoints,
) -> Option<ResolvedHit> {
    let provisional_index = candidates.iter().position(|c| c.blocking)?;
    let provisional = &candidates[provisional_index];

    let selected = pierce_coarse_proxy(candidates, provisional_index).unwrap_or(provisional);
    let mut hit = ResolvedHit::from_candidate(selected, params.origin);

    if hit.region.as_deref().map_or(true, str::is_empty) {
        apply_head_proximity(
            &mut hit,
            params.head_proximity_radius,
            params.head_reference,
            reference_points,
        );
    }

    Some(hit)
}

/// Provisional hit на capsule → первый более дальний blocking fine mesh того же актора
fn pierce_coarse_proxy(
    candidates: &[ImpactCandidate],
    provisional_index: usize,
) -> Option<&ImpactCandidate> {
    let provisional = &candidates[provisional_index];
    let actor = provisional.actor?;

    if !provisional.shape.is_coarse_proxy() {
        return None;
    }

    candidates[provisional_index + 1..]
        .iter()
        .find(|c| c.blocking && c.actor == Some(actor) && c.shape.is_fine_mesh())
}

/// Синтезирует region "head", если impact point рядом с head reference point
///
/// Возвращает true если region был проставлен.
pub fn apply_head_proximity(
    hit: &mut ResolvedHit,
    radius: f32,
    head_reference: &str,
    reference_points: &dyn ReferencePoints,
) -> bool {
    let Some(actor) = hit.actor else {
        return false;
    };

    if !within_head_radius(actor, hit.impact_point, radius, head_reference, reference_points) {
        return false;
    }

    hit.region = Some(HEAD_REGION.to_string());
    hit.region_from_proximity = true;
    true
}

/// Distance от reference point `head_reference` актора до точки ≤ radius
///
/// Нет reference point → false (fallback просто не срабатывает).
pub fn within_head_radius(
    actor: Entity,
    point: Vec3,
    radius: f32,
    head_reference: &str,
    reference_points: &dyn ReferencePoints,
) -> bool {
    if radius < 0.0 || !reference_points.has_named_reference_point(actor, head_reference) {
        return false;
    }

    reference_points
        .reference_point_location(actor, head_reference)
        .map(|head| head.distance(point) <= radius)
        .unwrap_or(false)
}
