//! Combat system: target selection, firing, and damage resolution.
//!
//! Defenders pick the nearest hostile unit strictly inside their range and
//! fire once their (time-scaled) interval has elapsed. Area-shot defenders
//! fire one projectile at every hostile within range + bonus instead.

use rand_chacha::ChaCha8Rng;
use tracing::debug;

use introvert_core::catalog::{Catalog, DefenderTypeId, UnitTypeId};
use introvert_core::components::{Defender, Unit, UnitStatus};
use introvert_core::constants::*;
use introvert_core::types::{Position, UnitId};

use crate::systems::status;
use crate::world_setup;
use crate::world_state::WorldState;

/// A unit that may be shot at this tick.
#[derive(Debug, Clone, Copy)]
pub struct Candidate {
    pub id: UnitId,
    pub position: Position,
}

/// Hostile units in spawn order.
pub fn hostile_candidates(state: &WorldState) -> Vec<Candidate> {
    let mut candidates: Vec<Candidate> = state
        .entities
        .query::<(&Unit, &UnitStatus, &Position)>()
        .iter()
        .filter(|(_, (unit, status, _))| status::is_hostile(unit, status))
        .map(|(_, (unit, _, position))| Candidate {
            id: unit.id,
            position: *position,
        })
        .collect();
    candidates.sort_by_key(|c| c.id);
    candidates
}

/// Nearest candidate strictly within `range`. Ties go to the earliest
/// spawned unit.
pub fn select_target(origin: &Position, range: f64, candidates: &[Candidate]) -> Option<UnitId> {
    let mut best: Option<(f64, UnitId)> = None;
    for candidate in candidates {
        let distance = origin.distance_to(&candidate.position);
        if distance >= range {
            continue;
        }
        if best.map_or(true, |(d, _)| distance < d) {
            best = Some((distance, candidate.id));
        }
    }
    best.map(|(_, id)| id)
}

/// Whether the defender's fire interval (divided by the time scale) has
/// elapsed. A defender that never fired is always ready.
pub fn ready_to_fire(defender: &Defender, now_ms: f64, time_scale: f64) -> bool {
    match defender.last_fire_ms {
        None => true,
        Some(last) => now_ms - last > defender.stats.fire_interval_ms / time_scale,
    }
}

/// Damage multiplier of `source` against `unit`. Strong wins over weak.
pub fn matchup_multiplier(catalog: &Catalog, source: &DefenderTypeId, unit: &UnitTypeId) -> f64 {
    let Some(archetype) = catalog.defender(source) else {
        return NEUTRAL_MULTIPLIER;
    };
    if archetype.strong.contains(unit) {
        STRONG_MULTIPLIER
    } else if archetype.weak.contains(unit) {
        WEAK_MULTIPLIER
    } else {
        NEUTRAL_MULTIPLIER
    }
}

struct Shot {
    origin: Position,
    target: UnitId,
    damage: f64,
    source: DefenderTypeId,
}

/// Retarget every defender and fire those that are ready.
pub fn run(state: &mut WorldState, now_ms: f64) {
    let candidates = hostile_candidates(state);
    let time_scale = state.time_scale;
    let mut shots: Vec<Shot> = Vec::new();

    for (_entity, (defender, position)) in
        state.entities.query_mut::<(&mut Defender, &Position)>()
    {
        defender.target = select_target(position, defender.stats.range, &candidates);
        let Some(target) = defender.target else {
            continue;
        };
        if !ready_to_fire(defender, now_ms, time_scale) {
            continue;
        }
        // The clock resets even when a utility defender holds fire.
        defender.last_fire_ms = Some(now_ms);
        if defender.utility_only && !defender.stats.damage_upgraded {
            continue;
        }

        match defender.stats.area_bonus {
            Some(bonus) => {
                let reach = defender.stats.range + bonus;
                for candidate in &candidates {
                    if position.distance_to(&candidate.position) <= reach {
                        shots.push(Shot {
                            origin: *position,
                            target: candidate.id,
                            damage: defender.stats.damage,
                            source: defender.archetype.clone(),
                        });
                    }
                }
            }
            None => shots.push(Shot {
                origin: *position,
                target,
                damage: defender.stats.damage,
                source: defender.archetype.clone(),
            }),
        }
    }

    for shot in shots {
        world_setup::spawn_projectile(
            &mut state.entities,
            shot.origin,
            shot.target,
            shot.damage,
            shot.source,
        );
    }
}

/// Apply a hit to a unit. Returns `true` if this hit defeated it.
///
/// Hits on units that are gone, dead, or converted are ignored. The reward is
/// credited exactly once because the unit is marked dead here.
pub fn apply_damage(
    state: &mut WorldState,
    catalog: &Catalog,
    rng: &mut ChaCha8Rng,
    target: UnitId,
    damage: f64,
    source: &DefenderTypeId,
) -> bool {
    let Some(entity) = state.unit_entity(target) else {
        return false;
    };
    let Ok((unit, unit_status, position)) = state
        .entities
        .query_one_mut::<(&mut Unit, &UnitStatus, &Position)>(entity)
    else {
        return false;
    };
    if !status::is_hostile(unit, unit_status) {
        return false;
    }

    let dealt = damage * matchup_multiplier(catalog, source, &unit.archetype);
    unit.vitality = (unit.vitality - dealt).max(0.0);
    if unit.vitality > 0.0 {
        return false;
    }

    unit.alive = false;
    let reward = unit.reward;
    let position = *position;
    debug!(unit = target.0, reward, source = %source, "unit defeated");

    state.credit_defeat(target, reward);
    world_setup::spawn_defeat_burst(&mut state.entities, rng, position);
    true
}
