//! Special abilities.
//!
//! Automatic abilities (support, area slow, conversion, area stun) tick on a
//! per-defender cooldown measured in scaled ticks. Manual abilities (global
//! pause, reposition) are triggered by the player and limited to once per
//! wave.

use hecs::Entity;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use introvert_core::catalog::Catalog;
use introvert_core::components::{Ability, Defender, Unit, UnitStatus};
use introvert_core::errors::SpecialError;
use introvert_core::events::SimEvent;
use introvert_core::types::{DefenderId, Position, UnitId};

use crate::placement;
use crate::systems::status;
use crate::world_setup;
use crate::world_state::WorldState;

/// Where the global-pause message is shown.
const GLOBAL_PAUSE_MESSAGE_AT: Position = Position { x: 400.0, y: 200.0 };

/// Vertical offset of messages shown above an entity.
const MESSAGE_RISE: f64 = 30.0;

/// Count down cooldowns and run every automatic ability that is ready.
pub fn run(state: &mut WorldState, rng: &mut ChaCha8Rng, scaled_delta: f64) {
    let defenders = state.defenders.clone();
    for entity in defenders {
        let Some((ability, origin, range)) = tick_cooldown(state, entity, scaled_delta) else {
            continue;
        };
        let cooldown = match ability {
            Ability::Support {
                radius,
                boost_ms,
                cooldown_ticks,
            } => {
                boost_neighbors(state, entity, &origin, radius, boost_ms);
                cooldown_ticks
            }
            Ability::AreaSlow {
                slow_ticks,
                cooldown_ticks,
            } => {
                for_each_hostile_in_range(state, &origin, range, |unit_status| {
                    status::apply_slow(unit_status, slow_ticks)
                });
                cooldown_ticks
            }
            Ability::AreaStun {
                stun_ticks,
                cooldown_ticks,
            } => {
                for_each_hostile_in_range(state, &origin, range, |unit_status| {
                    status::apply_stun(unit_status, stun_ticks)
                });
                cooldown_ticks
            }
            Ability::AreaConvert {
                probability,
                cooldown_ticks,
            } => {
                convert_in_range(state, rng, &origin, range, probability);
                cooldown_ticks
            }
            Ability::None | Ability::GlobalPause { .. } | Ability::Reposition => continue,
        };
        if let Ok(mut defender) = state.entities.get::<&mut Defender>(entity) {
            defender.special_cooldown = cooldown;
        }
    }
}

/// Decrement the cooldown; return the ability and its geometry if it is ready.
fn tick_cooldown(
    state: &mut WorldState,
    entity: Entity,
    scaled_delta: f64,
) -> Option<(Ability, Position, f64)> {
    let (defender, position) = state
        .entities
        .query_one_mut::<(&mut Defender, &Position)>(entity)
        .ok()?;
    if defender.special_cooldown > 0.0 {
        defender.special_cooldown -= scaled_delta;
    }
    if defender.special_cooldown > 0.0 {
        return None;
    }
    Some((defender.ability, *position, defender.stats.range))
}

/// Let every other defender within `radius` fire sooner.
fn boost_neighbors(
    state: &mut WorldState,
    source: Entity,
    origin: &Position,
    radius: f64,
    boost_ms: f64,
) {
    for (entity, (defender, position)) in
        state.entities.query_mut::<(&mut Defender, &Position)>()
    {
        if entity == source || origin.distance_to(position) >= radius {
            continue;
        }
        if let Some(last) = defender.last_fire_ms {
            defender.last_fire_ms = Some((last - boost_ms).max(0.0));
        }
    }
}

fn for_each_hostile_in_range(
    state: &mut WorldState,
    origin: &Position,
    range: f64,
    mut apply: impl FnMut(&mut UnitStatus),
) {
    for (_entity, (unit, unit_status, position)) in state
        .entities
        .query_mut::<(&Unit, &mut UnitStatus, &Position)>()
    {
        if status::is_hostile(unit, unit_status) && origin.distance_to(position) < range {
            apply(unit_status);
        }
    }
}

/// Roll conversion for each hostile in range, in spawn order.
fn convert_in_range(
    state: &mut WorldState,
    rng: &mut ChaCha8Rng,
    origin: &Position,
    range: f64,
    probability: f64,
) {
    let mut eligible: Vec<(UnitId, Entity)> = state
        .entities
        .query::<(&Unit, &UnitStatus, &Position)>()
        .iter()
        .filter(|(_, (unit, unit_status, position))| {
            status::is_hostile(unit, unit_status) && origin.distance_to(position) < range
        })
        .map(|(entity, (unit, _, _))| (unit.id, entity))
        .collect();
    eligible.sort_by_key(|(id, _)| *id);

    for (id, entity) in eligible {
        if !rng.gen_bool(probability) {
            continue;
        }
        let Ok((unit, unit_status, position)) = state
            .entities
            .query_one_mut::<(&mut Unit, &mut UnitStatus, &Position)>(entity)
        else {
            continue;
        };
        if !status::convert(unit, unit_status) {
            continue;
        }
        let at = Position::new(position.x, position.y - MESSAGE_RISE);
        debug!(unit = id.0, "unit converted");
        state.events.push(SimEvent::UnitConverted { unit: id });
        world_setup::spawn_message(&mut state.entities, at, "Converted them!");
    }
}

/// Manual global pause: stun every hostile unit on the field.
pub fn trigger_special(state: &mut WorldState, defender: DefenderId) -> Result<(), SpecialError> {
    if state.game_over {
        return Err(SpecialError::GameOver);
    }
    let entity = state
        .defender_entity(defender)
        .ok_or(SpecialError::InvalidTarget)?;
    let ability = state
        .entities
        .get::<&Defender>(entity)
        .map_err(|_| SpecialError::InvalidTarget)?
        .ability;

    let Ability::GlobalPause { stun_ticks } = ability else {
        return Err(SpecialError::NotApplicableToArchetype);
    };
    if state.once_per_wave.defenders.contains(&defender) {
        return Err(SpecialError::AlreadyUsedThisWave);
    }

    for (_entity, (unit, unit_status)) in state
        .entities
        .query_mut::<(&Unit, &mut UnitStatus)>()
    {
        if status::is_hostile(unit, unit_status) {
            status::apply_stun(unit_status, stun_ticks);
        }
    }
    state.once_per_wave.defenders.insert(defender);
    state.events.push(SimEvent::GlobalPause { defender });
    world_setup::spawn_message(
        &mut state.entities,
        GLOBAL_PAUSE_MESSAGE_AT,
        "Family photo time! Everyone smile!",
    );
    info!(defender = defender.0, stun_ticks, "global pause");
    Ok(())
}

/// Manual reposition: move the defender to a legal spot.
pub fn reposition(
    state: &mut WorldState,
    catalog: &Catalog,
    defender: DefenderId,
    target: Position,
) -> Result<(), SpecialError> {
    if state.game_over {
        return Err(SpecialError::GameOver);
    }
    let entity = state
        .defender_entity(defender)
        .ok_or(SpecialError::InvalidTarget)?;
    let (ability, archetype) = {
        let current = state
            .entities
            .get::<&Defender>(entity)
            .map_err(|_| SpecialError::InvalidTarget)?;
        (current.ability, current.archetype.clone())
    };

    if ability != Ability::Reposition {
        return Err(SpecialError::NotApplicableToArchetype);
    }
    if state.once_per_wave.archetypes.contains(&archetype) {
        return Err(SpecialError::AlreadyUsedThisWave);
    }
    let map = state
        .map
        .and_then(|index| catalog.map(index))
        .ok_or(SpecialError::InvalidTarget)?;
    placement::check_site(state, map, &target, Some(defender))
        .map_err(|_| SpecialError::InvalidTarget)?;

    if let Ok(mut position) = state.entities.get::<&mut Position>(entity) {
        *position = target;
    }
    state.once_per_wave.archetypes.insert(archetype);
    state.events.push(SimEvent::DefenderRepositioned {
        defender,
        position: target,
    });
    world_setup::spawn_message(
        &mut state.entities,
        Position::new(target.x, target.y - MESSAGE_RISE),
        "Relocated!",
    );
    info!(defender = defender.0, x = target.x, y = target.y, "defender repositioned");
    Ok(())
}
