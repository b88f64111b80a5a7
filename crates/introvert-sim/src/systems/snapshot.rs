//! Snapshot system: builds a complete GameStateSnapshot from the world.
//!
//! This system is read-only; it never modifies the world.

use introvert_core::components::*;
use introvert_core::enums::GamePhase;
use introvert_core::events::SimEvent;
use introvert_core::state::*;
use introvert_core::types::{Position, SimTime};

use crate::systems::wave_scheduler::WaveScheduler;
use crate::world_state::WorldState;

/// Build a complete GameStateSnapshot from the current world state.
pub fn build_snapshot(
    state: &WorldState,
    scheduler: &WaveScheduler,
    time: &SimTime,
    phase: GamePhase,
    events: Vec<SimEvent>,
) -> GameStateSnapshot {
    GameStateSnapshot {
        time: *time,
        phase,
        wave_phase: scheduler.phase,
        map: state.map,
        time_scale: state.time_scale,
        units: build_units(state),
        defenders: build_defenders(state),
        projectiles: build_projectiles(state),
        effects: build_effects(state),
        score: ScoreView {
            resources: state.resources,
            score: state.score,
            wave: state.wave,
            vitality: state.vitality,
            units_defeated: state.units_defeated,
            units_pending: scheduler.pending(),
        },
        events,
    }
}

/// Live units in spawn order.
fn build_units(state: &WorldState) -> Vec<UnitView> {
    let mut units: Vec<UnitView> = state
        .entities
        .query::<(&Unit, &UnitStatus, &Position)>()
        .iter()
        .filter(|(_, (unit, _, _))| unit.alive)
        .map(|(_, (unit, status, position))| UnitView {
            id: unit.id,
            archetype: unit.archetype.clone(),
            position: *position,
            vitality: unit.vitality,
            max_vitality: unit.max_vitality,
            direction: unit.direction,
            slowed: status.slow_remaining > 0.0,
            stunned: status.stun_remaining > 0.0,
            converted: status.converted,
        })
        .collect();
    units.sort_by_key(|u| u.id);
    units
}

fn build_defenders(state: &WorldState) -> Vec<DefenderView> {
    state
        .defenders
        .iter()
        .filter_map(|&entity| {
            let mut query = state
                .entities
                .query_one::<(&Defender, &Position)>(entity)
                .ok()?;
            let (defender, position) = query.get()?;
            let manual_ready = match defender.ability {
                Ability::GlobalPause { .. } => {
                    !state.once_per_wave.defenders.contains(&defender.id)
                }
                Ability::Reposition => !state
                    .once_per_wave
                    .archetypes
                    .contains(&defender.archetype),
                _ => false,
            };
            Some(DefenderView {
                id: defender.id,
                archetype: defender.archetype.clone(),
                position: *position,
                stats: defender.stats,
                upgrades: defender.upgrades.clone(),
                target: defender.target,
                special_cooldown: defender.special_cooldown.max(0.0),
                manual_ready,
            })
        })
        .collect()
}

fn build_projectiles(state: &WorldState) -> Vec<ProjectileView> {
    state
        .entities
        .query::<(&Projectile, &Position)>()
        .iter()
        .filter(|(_, (projectile, _))| projectile.alive)
        .map(|(_, (projectile, position))| ProjectileView {
            position: *position,
            origin: projectile.origin,
            target: projectile.target,
            source: projectile.source.clone(),
        })
        .collect()
}

fn build_effects(state: &WorldState) -> Vec<EffectView> {
    state
        .entities
        .query::<(&Effect, &Position)>()
        .iter()
        .filter(|(_, (effect, _))| effect.life > 0.0)
        .map(|(_, (effect, position))| EffectView {
            position: *position,
            kind: effect.kind.clone(),
            alpha: (effect.life / effect.max_life).clamp(0.0, 1.0),
        })
        .collect()
}
