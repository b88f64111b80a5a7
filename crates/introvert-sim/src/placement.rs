//! Placement validation and defender purchase.
//!
//! A site is legal when it is at least `PATH_CORRIDOR_HALF_WIDTH` from every
//! path segment of the active map and at least `DEFENDER_MIN_SEPARATION` from
//! every other defender.

use glam::DVec2;
use tracing::debug;

use introvert_core::catalog::{Catalog, DefenderTypeId, MapDef};
use introvert_core::components::Defender;
use introvert_core::constants::{DEFENDER_MIN_SEPARATION, PATH_CORRIDOR_HALF_WIDTH};
use introvert_core::errors::PlacementError;
use introvert_core::events::SimEvent;
use introvert_core::types::{DefenderId, Position};

use crate::world_setup;
use crate::world_state::WorldState;

/// Distance from `point` to the segment `a`-`b`. A zero-length segment is
/// treated as a point.
pub fn distance_to_segment(point: DVec2, a: DVec2, b: DVec2) -> f64 {
    let ab = b - a;
    let length_sq = ab.length_squared();
    if length_sq == 0.0 {
        return point.distance(a);
    }
    let t = ((point - a).dot(ab) / length_sq).clamp(0.0, 1.0);
    point.distance(a + ab * t)
}

/// Whether `position` lies inside any path corridor of `map`.
pub fn on_path(map: &MapDef, position: &Position) -> bool {
    let point = position.as_dvec2();
    map.paths.iter().any(|path| {
        path.windows(2).any(|segment| {
            distance_to_segment(point, segment[0].as_dvec2(), segment[1].as_dvec2())
                < PATH_CORRIDOR_HALF_WIDTH
        })
    })
}

/// Whether `position` is too close to a defender other than `ignore`.
pub fn near_defender(state: &WorldState, position: &Position, ignore: Option<DefenderId>) -> bool {
    state
        .entities
        .query::<(&Defender, &Position)>()
        .iter()
        .any(|(_, (defender, other))| {
            Some(defender.id) != ignore && position.distance_to(other) < DEFENDER_MIN_SEPARATION
        })
}

/// Geometry-only site check, shared by placement and reposition.
pub fn check_site(
    state: &WorldState,
    map: &MapDef,
    position: &Position,
    ignore: Option<DefenderId>,
) -> Result<(), PlacementError> {
    if on_path(map, position) {
        return Err(PlacementError::BlockedByPath);
    }
    if near_defender(state, position, ignore) {
        return Err(PlacementError::BlockedByDefender);
    }
    Ok(())
}

/// Validate a placement without committing it.
pub fn validate(
    state: &WorldState,
    catalog: &Catalog,
    archetype: Option<&DefenderTypeId>,
    position: &Position,
) -> Result<f64, PlacementError> {
    if state.game_over {
        return Err(PlacementError::GameOver);
    }
    let map = state
        .map
        .and_then(|index| catalog.map(index))
        .ok_or(PlacementError::NoMapSelected)?;
    let template = archetype
        .and_then(|id| catalog.defender(id))
        .ok_or(PlacementError::NoArchetypeSelected)?;
    check_site(state, map, position, None)?;
    if state.resources < template.cost {
        return Err(PlacementError::InsufficientFunds);
    }
    Ok(template.cost)
}

/// Place a defender, deducting its cost.
pub fn place_defender(
    state: &mut WorldState,
    catalog: &Catalog,
    archetype: &DefenderTypeId,
    position: Position,
) -> Result<DefenderId, PlacementError> {
    let cost = validate(state, catalog, Some(archetype), &position)?;
    let template = catalog
        .defender(archetype)
        .ok_or(PlacementError::NoArchetypeSelected)?;

    state.resources -= cost;
    let id = world_setup::spawn_defender(state, archetype, template, position);
    state.events.push(SimEvent::DefenderPlaced {
        defender: id,
        archetype: archetype.clone(),
        position,
    });
    debug!(defender = id.0, archetype = %archetype, x = position.x, y = position.y, "defender placed");
    Ok(id)
}
