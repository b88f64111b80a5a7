//! Entity spawn factories.
//!
//! Creates units, defenders, and transient effects with the component
//! bundles the systems expect.

use hecs::{Entity, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use introvert_core::catalog::{Catalog, DefenderArchetype, DefenderTypeId, MapDef, UnitTypeId};
use introvert_core::components::*;
use introvert_core::constants::*;
use introvert_core::enums::Direction;
use introvert_core::events::SimEvent;
use introvert_core::types::{DefenderId, Position, UnitId};

use crate::systems::wave_scheduler;
use crate::upgrades;
use crate::world_state::WorldState;

/// Spawn one unit of `archetype`, scaled for `wave`, at a random spawn point
/// of `map`.
pub fn spawn_unit(
    state: &mut WorldState,
    catalog: &Catalog,
    map: &MapDef,
    rng: &mut ChaCha8Rng,
    archetype: &UnitTypeId,
    wave: u32,
) -> UnitId {
    let template = catalog.unit(archetype);
    let spawn = &map.spawns[rng.gen_range(0..map.spawns.len())];
    let health = wave_scheduler::scaled_health(template.health, wave);

    let id = state.allocate_unit_id();
    let unit = Unit {
        id,
        archetype: archetype.clone(),
        vitality: health,
        max_vitality: health,
        base_speed: wave_scheduler::scaled_speed(template.speed, wave),
        reward: wave_scheduler::scaled_reward(template.reward, wave),
        base_damage: template.base_damage,
        path: spawn.path,
        waypoint: 0,
        direction: Direction::Forward,
        alive: true,
        reached_terminus: false,
    };
    let position = Position::new(spawn.x - SPAWN_OFFSET_X, spawn.y);

    let entity = state
        .entities
        .spawn((unit, UnitStatus::default(), position));
    state.unit_index.insert(id, entity);
    state.events.push(SimEvent::UnitSpawned {
        unit: id,
        archetype: archetype.clone(),
    });
    debug!(unit = id.0, archetype = %archetype, wave, "unit spawned");
    id
}

/// Base stats of a freshly placed defender.
pub fn base_stats(template: &DefenderArchetype) -> DefenderStats {
    DefenderStats {
        damage: template.damage,
        range: template.range,
        fire_interval_ms: template.fire_interval_ms,
        area_bonus: None,
        damage_upgraded: false,
    }
}

/// Spawn a defender and register it in the defender table.
pub fn spawn_defender(
    state: &mut WorldState,
    archetype: &DefenderTypeId,
    template: &DefenderArchetype,
    position: Position,
) -> DefenderId {
    let id = DefenderId(state.defenders.len() as u32);
    let defender = Defender {
        id,
        archetype: archetype.clone(),
        stats: base_stats(template),
        utility_only: template.utility_only,
        upgrades: Vec::new(),
        ability: upgrades::resolve_ability(&template.special, &[]),
        last_fire_ms: None,
        target: None,
        special_cooldown: 0.0,
    };
    let entity = state.entities.spawn((defender, position));
    state.defenders.push(entity);
    id
}

/// Spawn a projectile at `origin` homing on `target`.
pub fn spawn_projectile(
    world: &mut World,
    origin: Position,
    target: UnitId,
    damage: f64,
    source: DefenderTypeId,
) -> Entity {
    world.spawn((
        Projectile {
            target,
            damage,
            source,
            origin,
            alive: true,
        },
        origin,
    ))
}

/// Spawn a floating text message.
pub fn spawn_message(world: &mut World, position: Position, text: impl Into<String>) -> Entity {
    world.spawn((
        Effect {
            kind: EffectKind::Message { text: text.into() },
            life: MESSAGE_LIFETIME_TICKS,
            max_life: MESSAGE_LIFETIME_TICKS,
        },
        position,
    ))
}

/// Spawn the particle burst shown when a unit is defeated.
pub fn spawn_defeat_burst(world: &mut World, rng: &mut ChaCha8Rng, position: Position) {
    for _ in 0..DEFEAT_PARTICLE_COUNT {
        let vx = rng.gen_range(-PARTICLE_SPREAD..PARTICLE_SPREAD);
        let vy = rng.gen_range(-PARTICLE_SPREAD..PARTICLE_SPREAD) - PARTICLE_LIFT;
        world.spawn((
            Effect {
                kind: EffectKind::Particle { vx, vy },
                life: PARTICLE_LIFETIME_TICKS,
                max_life: PARTICLE_LIFETIME_TICKS,
            },
            position,
        ));
    }
}
