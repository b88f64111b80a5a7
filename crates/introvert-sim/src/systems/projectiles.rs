//! Projectile flight and impact.
//!
//! Projectiles home on a unit by id. If the unit is gone, dead, or converted
//! the projectile fizzles. Hits are resolved after all projectiles moved, in
//! projectile order.

use std::collections::HashMap;

use rand_chacha::ChaCha8Rng;

use introvert_core::catalog::{Catalog, DefenderTypeId};
use introvert_core::components::{Projectile, Unit, UnitStatus};
use introvert_core::constants::{PROJECTILE_HIT_RADIUS, PROJECTILE_SPEED};
use introvert_core::types::{Position, UnitId};

use crate::systems::{combat, status};
use crate::world_state::WorldState;

/// Outcome of one flight step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flight {
    Fizzled,
    InFlight,
    Hit,
}

/// Move one projectile toward `target` (if still valid).
pub fn step(
    projectile: &mut Projectile,
    position: &mut Position,
    target: Option<&Position>,
    scaled_delta: f64,
) -> Flight {
    let Some(target) = target else {
        projectile.alive = false;
        return Flight::Fizzled;
    };
    let offset = target.as_dvec2() - position.as_dvec2();
    let distance = offset.length();
    if distance < PROJECTILE_HIT_RADIUS {
        projectile.alive = false;
        return Flight::Hit;
    }
    let travel = (PROJECTILE_SPEED * scaled_delta).min(distance);
    *position = (position.as_dvec2() + offset / distance * travel).into();
    Flight::InFlight
}

pub fn run(state: &mut WorldState, catalog: &Catalog, rng: &mut ChaCha8Rng, scaled_delta: f64) {
    let targets: HashMap<UnitId, Position> = state
        .entities
        .query::<(&Unit, &UnitStatus, &Position)>()
        .iter()
        .filter(|(_, (unit, unit_status, _))| status::is_hostile(unit, unit_status))
        .map(|(_, (unit, _, position))| (unit.id, *position))
        .collect();

    let mut hits: Vec<(UnitId, f64, DefenderTypeId)> = Vec::new();
    for (_entity, (projectile, position)) in state
        .entities
        .query_mut::<(&mut Projectile, &mut Position)>()
    {
        if !projectile.alive {
            continue;
        }
        let target = targets.get(&projectile.target);
        if step(projectile, position, target, scaled_delta) == Flight::Hit {
            hits.push((
                projectile.target,
                projectile.damage,
                projectile.source.clone(),
            ));
        }
    }

    for (target, damage, source) in hits {
        combat::apply_damage(state, catalog, rng, target, damage, &source);
    }
}
