//! The mutable match aggregate shared by every system.
//!
//! `WorldState` owns the hecs world (units, defenders, projectiles, effects)
//! plus the global counters. Systems receive it by `&mut`; nothing lives in
//! globals. Shared counters (resources, score, vitality) are only mutated
//! through the helpers here so the terminal transition happens exactly once.

use std::collections::{HashMap, HashSet};

use hecs::{Entity, World};
use tracing::info;

use introvert_core::catalog::DefenderTypeId;
use introvert_core::components::Projectile;
use introvert_core::events::SimEvent;
use introvert_core::types::{DefenderId, UnitId};

/// Manual abilities already spent in the current wave.
#[derive(Debug, Clone, Default)]
pub struct OncePerWave {
    /// Defenders whose per-defender ability (global pause) is spent.
    pub defenders: HashSet<DefenderId>,
    /// Archetypes whose per-archetype ability (reposition) is spent.
    pub archetypes: HashSet<DefenderTypeId>,
}

impl OncePerWave {
    pub fn clear(&mut self) {
        self.defenders.clear();
        self.archetypes.clear();
    }
}

pub struct WorldState {
    pub entities: World,
    /// Index of the active map in the catalog.
    pub map: Option<usize>,
    pub resources: f64,
    pub score: f64,
    /// 1-based index of the current (or next) wave.
    pub wave: u32,
    /// Base vitality. Clamped at zero.
    pub vitality: f64,
    pub game_over: bool,
    pub time_scale: f64,
    pub units_defeated: u32,
    /// Live unit lookup; doubles as the weak-reference table for projectiles
    /// and defender targets.
    pub unit_index: HashMap<UnitId, Entity>,
    /// Defender entities, indexed by `DefenderId`.
    pub defenders: Vec<Entity>,
    pub next_unit_id: u64,
    pub once_per_wave: OncePerWave,
    /// Events accumulated since the last snapshot.
    pub events: Vec<SimEvent>,
}

impl WorldState {
    pub fn new(resources: f64, vitality: f64, time_scale: f64) -> Self {
        Self {
            entities: World::new(),
            map: None,
            resources,
            score: 0.0,
            wave: 1,
            vitality,
            game_over: false,
            time_scale,
            units_defeated: 0,
            unit_index: HashMap::new(),
            defenders: Vec::new(),
            next_unit_id: 0,
            once_per_wave: OncePerWave::default(),
            events: Vec::new(),
        }
    }

    pub fn unit_entity(&self, id: UnitId) -> Option<Entity> {
        self.unit_index.get(&id).copied()
    }

    pub fn defender_entity(&self, id: DefenderId) -> Option<Entity> {
        self.defenders.get(id.0 as usize).copied()
    }

    pub fn allocate_unit_id(&mut self) -> UnitId {
        let id = UnitId(self.next_unit_id);
        self.next_unit_id += 1;
        id
    }

    /// Drain the base. A no-op once the match is over.
    pub fn apply_base_damage(&mut self, unit: UnitId, amount: f64) {
        if self.game_over {
            return;
        }
        self.vitality = (self.vitality - amount).max(0.0);
        self.events.push(SimEvent::BaseDamaged {
            unit,
            amount,
            vitality: self.vitality,
        });
        if self.vitality <= 0.0 {
            self.enter_game_over();
        }
    }

    /// Enter the terminal state. Returns `false` if already there.
    /// Projectiles still in flight are dropped.
    pub fn enter_game_over(&mut self) -> bool {
        if self.game_over {
            return false;
        }
        self.game_over = true;
        for (_entity, projectile) in self.entities.query_mut::<&mut Projectile>() {
            projectile.alive = false;
        }
        info!(wave = self.wave, score = self.score, "base vitality depleted, game over");
        self.events.push(SimEvent::GameOver {
            wave: self.wave,
            score: self.score,
        });
        true
    }

    /// Credit a defeated unit's reward. Suppressed after game over.
    pub fn credit_defeat(&mut self, unit: UnitId, reward: f64) {
        if self.game_over {
            return;
        }
        self.resources += reward;
        self.score += reward;
        self.units_defeated += 1;
        self.events.push(SimEvent::UnitDefeated { unit, reward });
    }

    /// Number of units still in the world (alive or awaiting cleanup).
    pub fn live_unit_count(&self) -> usize {
        use introvert_core::components::Unit;
        self.entities
            .query::<&Unit>()
            .iter()
            .filter(|(_, unit)| unit.alive)
            .count()
    }
}
