//! Cleanup system: removes dead units, spent projectiles, and expired effects.

use hecs::{Entity, World};

use introvert_core::components::{Effect, Projectile, Unit};
use introvert_core::types::UnitId;

use crate::world_state::WorldState;

/// Despawn everything flagged for removal this tick.
/// Uses a pre-allocated buffer to avoid per-tick allocation.
pub fn run(state: &mut WorldState, despawn_buffer: &mut Vec<Entity>) {
    despawn_buffer.clear();

    let mut removed_units: Vec<UnitId> = Vec::new();
    for (entity, unit) in state.entities.query_mut::<&Unit>() {
        if !unit.alive {
            removed_units.push(unit.id);
            despawn_buffer.push(entity);
        }
    }
    for id in removed_units {
        state.unit_index.remove(&id);
    }

    collect_expired(&mut state.entities, despawn_buffer);

    for entity in despawn_buffer.drain(..) {
        let _ = state.entities.despawn(entity);
    }
}

fn collect_expired(world: &mut World, despawn_buffer: &mut Vec<Entity>) {
    for (entity, projectile) in world.query_mut::<&Projectile>() {
        if !projectile.alive {
            despawn_buffer.push(entity);
        }
    }
    for (entity, effect) in world.query_mut::<&Effect>() {
        if effect.life <= 0.0 {
            despawn_buffer.push(entity);
        }
    }
}
