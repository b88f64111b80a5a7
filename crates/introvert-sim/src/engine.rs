//! Simulation engine — the core of the game.
//!
//! `SimulationEngine` owns the `WorldState`, processes player commands,
//! runs all systems, and produces `GameStateSnapshot`s. Completely headless,
//! enabling deterministic testing.

use std::collections::VecDeque;

use hecs::Entity;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{info, warn};

use introvert_core::catalog::{Catalog, DefenderTypeId, UpgradeId};
use introvert_core::commands::PlayerCommand;
use introvert_core::constants::*;
use introvert_core::enums::{GamePhase, WavePhase};
use introvert_core::errors::*;
use introvert_core::events::SimEvent;
use introvert_core::state::GameStateSnapshot;
use introvert_core::types::{DefenderId, Position, SimTime};

use crate::placement;
use crate::systems;
use crate::systems::wave_scheduler::WaveScheduler;
use crate::upgrades;
use crate::world_state::WorldState;

/// Configuration for starting a new simulation.
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    /// Initial time scale (1.0 = normal).
    pub time_scale: f64,
    pub starting_resources: f64,
    pub starting_vitality: f64,
    pub catalog: Catalog,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            time_scale: 1.0,
            starting_resources: STARTING_RESOURCES,
            starting_vitality: STARTING_VITALITY,
            catalog: Catalog::builtin(),
        }
    }
}

/// The simulation engine. Owns the world state and all sim bookkeeping.
pub struct SimulationEngine {
    state: WorldState,
    catalog: Catalog,
    time: SimTime,
    phase: GamePhase,
    rng: ChaCha8Rng,
    waves: WaveScheduler,
    command_queue: VecDeque<PlayerCommand>,
    despawn_buffer: Vec<Entity>,
    starting_resources: f64,
    starting_vitality: f64,
}

fn clamp_time_scale(scale: f64) -> f64 {
    scale.clamp(MIN_TIME_SCALE, MAX_TIME_SCALE)
}

impl SimulationEngine {
    /// Create a new simulation engine with the given config.
    pub fn new(config: SimConfig) -> Self {
        let time_scale = if config.time_scale.is_finite() {
            clamp_time_scale(config.time_scale)
        } else {
            MIN_TIME_SCALE
        };
        Self {
            state: WorldState::new(
                config.starting_resources,
                config.starting_vitality,
                time_scale,
            ),
            catalog: config.catalog,
            time: SimTime::default(),
            phase: GamePhase::default(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            waves: WaveScheduler::default(),
            command_queue: VecDeque::new(),
            despawn_buffer: Vec::new(),
            starting_resources: config.starting_resources,
            starting_vitality: config.starting_vitality,
        }
    }

    /// Queue a player command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance the simulation by `delta_ticks` nominal frames and return the
    /// resulting snapshot. Paused or unstarted matches only process commands.
    pub fn tick(&mut self, delta_ticks: f64) -> GameStateSnapshot {
        self.process_commands();

        if self.phase == GamePhase::Active {
            let delta_ticks = if delta_ticks.is_finite() {
                delta_ticks.max(0.0)
            } else {
                0.0
            };
            self.run_systems(delta_ticks);
            self.time.advance(delta_ticks);
        }

        let events = std::mem::take(&mut self.state.events);
        systems::snapshot::build_snapshot(&self.state, &self.waves, &self.time, self.phase(), events)
    }

    /// Current snapshot without advancing time. Pending events stay queued
    /// for the next `tick`.
    pub fn snapshot(&self) -> GameStateSnapshot {
        systems::snapshot::build_snapshot(
            &self.state,
            &self.waves,
            &self.time,
            self.phase(),
            self.state.events.clone(),
        )
    }

    // --- Direct operations ---

    /// Choose a map and reset the world for a fresh match.
    pub fn select_map(&mut self, map: usize) -> Result<(), CommandError> {
        if self.catalog.map(map).is_none() {
            return Err(CommandError::UnknownMap(map));
        }
        let time_scale = self.state.time_scale;
        self.state = WorldState::new(self.starting_resources, self.starting_vitality, time_scale);
        self.state.map = Some(map);
        self.waves = WaveScheduler::default();
        self.phase = GamePhase::Active;
        self.state.events.push(SimEvent::MapSelected { map });
        info!(map, name = %self.catalog.maps[map].name, "map selected");
        Ok(())
    }

    /// Start the next wave. Returns the number of units it will release.
    pub fn start_wave(&mut self) -> Result<u32, WaveError> {
        self.waves.start(&mut self.state, &self.catalog)
    }

    pub fn place_defender(
        &mut self,
        archetype: &DefenderTypeId,
        x: f64,
        y: f64,
    ) -> Result<DefenderId, PlacementError> {
        placement::place_defender(&mut self.state, &self.catalog, archetype, Position::new(x, y))
    }

    pub fn request_upgrade(
        &mut self,
        defender: DefenderId,
        upgrade: &UpgradeId,
    ) -> Result<(), UpgradeError> {
        upgrades::request_upgrade(&mut self.state, &self.catalog, defender, upgrade)
    }

    /// Fire a defender's manual global pause.
    pub fn trigger_special(&mut self, defender: DefenderId) -> Result<(), SpecialError> {
        systems::abilities::trigger_special(&mut self.state, defender)
    }

    pub fn reposition_defender(
        &mut self,
        defender: DefenderId,
        x: f64,
        y: f64,
    ) -> Result<(), SpecialError> {
        systems::abilities::reposition(&mut self.state, &self.catalog, defender, Position::new(x, y))
    }

    /// Set the time scale, clamped to the supported range. Non-finite values
    /// are ignored.
    pub fn set_time_scale(&mut self, scale: f64) {
        if scale.is_finite() {
            self.state.time_scale = clamp_time_scale(scale);
        }
    }

    pub fn pause(&mut self) {
        if self.phase == GamePhase::Active {
            self.phase = GamePhase::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.phase == GamePhase::Paused {
            self.phase = GamePhase::Active;
        }
    }

    /// Placement preview: whether the site itself is free (ignores funds and
    /// archetype).
    pub fn can_place(&self, x: f64, y: f64) -> bool {
        if self.state.game_over {
            return false;
        }
        let Some(map) = self.state.map.and_then(|index| self.catalog.map(index)) else {
            return false;
        };
        placement::check_site(&self.state, map, &Position::new(x, y), None).is_ok()
    }

    // --- Accessors ---

    /// Get the current game phase.
    pub fn phase(&self) -> GamePhase {
        if self.state.game_over {
            GamePhase::GameOver
        } else {
            self.phase
        }
    }

    pub fn wave_phase(&self) -> WavePhase {
        self.waves.phase
    }

    /// Get the current simulation time.
    pub fn time(&self) -> SimTime {
        self.time
    }

    /// Get the current time scale.
    pub fn time_scale(&self) -> f64 {
        self.state.time_scale
    }

    /// Get a read-only reference to the world state.
    pub fn state(&self) -> &WorldState {
        &self.state
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Mutable world access for tests that stage exact positions.
    #[cfg(test)]
    pub fn state_mut(&mut self) -> &mut WorldState {
        &mut self.state
    }

    /// Spawn a unit of the given archetype directly (for tests).
    #[cfg(test)]
    pub fn spawn_test_unit(
        &mut self,
        archetype: &str,
        wave: u32,
    ) -> introvert_core::types::UnitId {
        let map_index = self.state.map.unwrap_or(0);
        let map = &self.catalog.maps[map_index];
        crate::world_setup::spawn_unit(
            &mut self.state,
            &self.catalog,
            map,
            &mut self.rng,
            &introvert_core::catalog::UnitTypeId::from(archetype),
            wave,
        )
    }

    /// Resolve one hit directly (for tests).
    #[cfg(test)]
    pub fn apply_test_damage(
        &mut self,
        unit: introvert_core::types::UnitId,
        damage: f64,
        source: &str,
    ) -> bool {
        systems::combat::apply_damage(
            &mut self.state,
            &self.catalog,
            &mut self.rng,
            unit,
            damage,
            &DefenderTypeId::from(source),
        )
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            if let Err(err) = self.handle_command(command) {
                warn!(%err, "queued command rejected");
                self.state.events.push(SimEvent::CommandRejected {
                    reason: err.to_string(),
                });
            }
        }
    }

    /// Handle a single player command.
    fn handle_command(&mut self, command: PlayerCommand) -> Result<(), CommandError> {
        match command {
            PlayerCommand::SelectMap { map } => self.select_map(map)?,
            PlayerCommand::StartWave => {
                self.start_wave()?;
            }
            PlayerCommand::PlaceDefender {
                archetype,
                position,
            } => {
                self.place_defender(&archetype, position.x, position.y)?;
            }
            PlayerCommand::RequestUpgrade { defender, upgrade } => {
                self.request_upgrade(defender, &upgrade)?
            }
            PlayerCommand::TriggerSpecial { defender } => self.trigger_special(defender)?,
            PlayerCommand::Reposition { defender, position } => {
                self.reposition_defender(defender, position.x, position.y)?
            }
            PlayerCommand::SetTimeScale { scale } => self.set_time_scale(scale),
            PlayerCommand::Pause => self.pause(),
            PlayerCommand::Resume => self.resume(),
        }
        Ok(())
    }

    /// Run all systems in order.
    fn run_systems(&mut self, delta_ticks: f64) {
        let scaled_delta = delta_ticks * self.state.time_scale;
        let delta_ms = delta_ticks * MS_PER_TICK;
        let now_ms = self.time.elapsed_ms;

        if let Some(map) = self.state.map.and_then(|index| self.catalog.map(index)) {
            // 1. Movement (terminus damage, reversed returns)
            if !self.state.game_over {
                systems::movement::run(&mut self.state, &self.catalog, map, scaled_delta);
            }
            // 2. Combat: targeting and firing, automatic specials, projectiles
            if !self.state.game_over {
                systems::combat::run(&mut self.state, now_ms);
                systems::abilities::run(&mut self.state, &mut self.rng, scaled_delta);
                systems::projectiles::run(
                    &mut self.state,
                    &self.catalog,
                    &mut self.rng,
                    scaled_delta,
                );
            }
            // 3. Status decrement
            if !self.state.game_over {
                systems::status::run(&mut self.state.entities, scaled_delta);
            }
            // 4. Wave bookkeeping
            if !self.state.game_over {
                systems::wave_scheduler::run(
                    &mut self.waves,
                    &mut self.state,
                    &self.catalog,
                    &mut self.rng,
                    delta_ms,
                );
            }
        }
        // 5. Transient effects (keep decaying after game over)
        systems::effects::run(&mut self.state.entities, scaled_delta);
        // 6. Cleanup
        systems::cleanup::run(&mut self.state, &mut self.despawn_buffer);
    }
}
