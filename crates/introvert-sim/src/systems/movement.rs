//! Path-following movement.
//!
//! Each unit steers toward the next waypoint of its path (the previous one
//! once converted). A unit counts as arrived within `WAYPOINT_PROXIMITY`.
//! Forward units past the last waypoint drain the base; reversed units past
//! the first waypoint leave the field.

use introvert_core::catalog::{Catalog, MapDef};
use introvert_core::components::{Unit, UnitStatus};
use introvert_core::constants::{SLOW_SPEED_FACTOR, WAYPOINT_PROXIMITY};
use introvert_core::enums::Direction;
use introvert_core::types::{Position, UnitId};

use crate::world_setup;
use crate::world_state::WorldState;

/// Outcome of one movement step for one unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Dead or otherwise not moving.
    Idle,
    Stunned,
    Moved,
    /// Reached the target waypoint; the index moved on.
    Arrived,
    /// Forward unit ran off the end of its path.
    ReachedTerminus,
    /// Converted unit walked back out through the first waypoint.
    ReturnedHome,
}

/// Per-tick speed after slow and time scale.
pub fn effective_speed(unit: &Unit, status: &UnitStatus, scaled_delta: f64) -> f64 {
    let slow = if status.slow_remaining > 0.0 {
        SLOW_SPEED_FACTOR
    } else {
        1.0
    };
    unit.base_speed * slow * scaled_delta
}

/// Advance a single unit along `path`.
pub fn advance(
    unit: &mut Unit,
    status: &UnitStatus,
    position: &mut Position,
    path: &[Position],
    scaled_delta: f64,
) -> Step {
    if !unit.alive {
        return Step::Idle;
    }
    if status.stun_remaining > 0.0 {
        return Step::Stunned;
    }

    let target_index = match unit.direction {
        Direction::Forward => unit.waypoint + 1,
        Direction::Reversed => unit.waypoint.saturating_sub(1),
    };
    let Some(target) = path.get(target_index) else {
        unit.alive = false;
        if unit.reached_terminus {
            return Step::Idle;
        }
        unit.reached_terminus = true;
        return Step::ReachedTerminus;
    };

    let offset = target.as_dvec2() - position.as_dvec2();
    let distance = offset.length();
    if distance < WAYPOINT_PROXIMITY {
        match unit.direction {
            Direction::Forward => unit.waypoint = target_index,
            Direction::Reversed => {
                if unit.waypoint == 0 {
                    unit.alive = false;
                    return Step::ReturnedHome;
                }
                unit.waypoint = target_index;
            }
        }
        return Step::Arrived;
    }

    // Never step past the waypoint, even at high speed.
    let step = effective_speed(unit, status, scaled_delta).min(distance);
    *position = (position.as_dvec2() + offset / distance * step).into();
    Step::Moved
}

/// Move every unit. Terminus arrivals are charged to the base in spawn
/// order; once the match is over later arrivals are only removed.
pub fn run(state: &mut WorldState, catalog: &Catalog, map: &MapDef, scaled_delta: f64) {
    let mut arrivals: Vec<(UnitId, f64, Position, String)> = Vec::new();

    for (_entity, (unit, status, position)) in state
        .entities
        .query_mut::<(&mut Unit, &UnitStatus, &mut Position)>()
    {
        let Some(path) = map.paths.get(unit.path) else {
            panic!("unit {} follows missing path {} of map '{}'", unit.id.0, unit.path, map.name);
        };
        if advance(unit, status, position, path, scaled_delta) == Step::ReachedTerminus {
            arrivals.push((
                unit.id,
                unit.base_damage,
                *position,
                catalog.unit(&unit.archetype).name.clone(),
            ));
        }
    }

    arrivals.sort_by_key(|(id, ..)| *id);
    for (id, amount, position, name) in arrivals {
        if state.game_over {
            break;
        }
        state.apply_base_damage(id, amount);
        world_setup::spawn_message(
            &mut state.entities,
            position,
            format!("{name} drained {amount} social energy!"),
        );
    }
}
