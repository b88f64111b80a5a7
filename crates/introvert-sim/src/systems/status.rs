//! Status effects on units: slow, stun, and conversion.

use hecs::World;

use introvert_core::components::{Unit, UnitStatus};
use introvert_core::enums::Direction;

/// Refresh a slow. Durations never stack; the longer one wins.
pub fn apply_slow(status: &mut UnitStatus, duration: f64) {
    status.slow_remaining = status.slow_remaining.max(duration);
}

/// Refresh a stun. Same rule as slows.
pub fn apply_stun(status: &mut UnitStatus, duration: f64) {
    status.stun_remaining = status.stun_remaining.max(duration);
}

/// Turn a unit around for good. Returns `false` if it was already converted.
pub fn convert(unit: &mut Unit, status: &mut UnitStatus) -> bool {
    if status.converted {
        return false;
    }
    status.converted = true;
    unit.direction = Direction::Reversed;
    true
}

/// Whether a unit can be targeted, damaged, or hit by area effects.
pub fn is_hostile(unit: &Unit, status: &UnitStatus) -> bool {
    unit.alive && !status.converted
}

/// Count down timed effects.
pub fn run(world: &mut World, scaled_delta: f64) {
    for (_entity, status) in world.query_mut::<&mut UnitStatus>() {
        status.stun_remaining = (status.stun_remaining - scaled_delta).max(0.0);
        status.slow_remaining = (status.slow_remaining - scaled_delta).max(0.0);
    }
}
