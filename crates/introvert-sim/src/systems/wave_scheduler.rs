//! Wave scheduler: releases the units of the current wave over time and
//! detects when the wave has been cleared.
//!
//! Lifecycle: `Idle -> Spawning -> Draining -> Complete -> Idle`. The spawn
//! countdown runs on the unscaled engine clock; the interval itself is
//! divided by the time scale when the wave starts.

use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use introvert_core::catalog::{Catalog, UnitTypeId};
use introvert_core::constants::*;
use introvert_core::enums::WavePhase;
use introvert_core::errors::WaveError;
use introvert_core::events::SimEvent;

use crate::world_setup;
use crate::world_state::WorldState;

/// Progress of the wave in flight.
#[derive(Debug, Clone, Default)]
pub struct WaveScheduler {
    pub phase: WavePhase,
    /// Units this wave releases in total (after scaling).
    pub total: u32,
    pub spawned: u32,
    pub interval_ms: f64,
    /// Time until the next release. Starts at one full interval.
    pub countdown_ms: f64,
    /// Composition of the wave in flight, cycled by spawn index.
    pub composition: Vec<UnitTypeId>,
}

impl WaveScheduler {
    /// Begin the current wave. Only legal from `Idle`.
    pub fn start(&mut self, state: &mut WorldState, catalog: &Catalog) -> Result<u32, WaveError> {
        if state.game_over {
            return Err(WaveError::GameOver);
        }
        if state.map.is_none() {
            return Err(WaveError::NoMapSelected);
        }
        if self.phase != WavePhase::Idle {
            return Err(WaveError::WaveActive);
        }

        let config = catalog.wave_config(state.wave);
        self.phase = WavePhase::Spawning;
        self.total = scaled_count(config.count, state.wave);
        self.spawned = 0;
        self.interval_ms = spawn_interval_ms(state.wave, state.time_scale);
        self.countdown_ms = self.interval_ms;
        self.composition = config.units.clone();

        info!(
            wave = state.wave,
            name = %config.name,
            units = self.total,
            interval_ms = self.interval_ms,
            "wave started"
        );
        state.events.push(SimEvent::WaveStarted {
            wave: state.wave,
            unit_count: self.total,
        });
        Ok(self.total)
    }

    /// Units of the current wave not yet released.
    pub fn pending(&self) -> u32 {
        match self.phase {
            WavePhase::Spawning => self.total - self.spawned,
            _ => 0,
        }
    }
}

/// floor(base * 1.1^(wave-1))
pub fn scaled_count(base: u32, wave: u32) -> u32 {
    (base as f64 * WAVE_COUNT_GROWTH.powi(wave as i32 - 1)).floor() as u32
}

/// floor(health * 1.15^(wave-1))
pub fn scaled_health(health: f64, wave: u32) -> f64 {
    (health * WAVE_HEALTH_GROWTH.powi(wave as i32 - 1)).floor()
}

pub fn scaled_speed(speed: f64, wave: u32) -> f64 {
    speed * (1.0 + (wave as f64 - 1.0) * WAVE_SPEED_STEP)
}

pub fn scaled_reward(reward: f64, wave: u32) -> f64 {
    (reward * (1.0 + (wave as f64 - 1.0) * WAVE_REWARD_STEP)).floor()
}

/// max(800, 1800 - wave*50) / time_scale
pub fn spawn_interval_ms(wave: u32, time_scale: f64) -> f64 {
    (SPAWN_INTERVAL_BASE_MS - wave as f64 * SPAWN_INTERVAL_STEP_MS).max(SPAWN_INTERVAL_MIN_MS)
        / time_scale
}

pub fn wave_clear_reward(wave: u32) -> f64 {
    WAVE_CLEAR_BASE_REWARD + wave as f64 * WAVE_CLEAR_REWARD_PER_WAVE
}

/// Advance the scheduler by `delta_ms` of engine time.
pub fn run(
    scheduler: &mut WaveScheduler,
    state: &mut WorldState,
    catalog: &Catalog,
    rng: &mut ChaCha8Rng,
    delta_ms: f64,
) {
    match scheduler.phase {
        WavePhase::Idle => {}
        WavePhase::Spawning => {
            let Some(map) = state.map.and_then(|index| catalog.map(index)) else {
                return;
            };
            scheduler.countdown_ms -= delta_ms;
            while scheduler.countdown_ms <= 0.0 && scheduler.spawned < scheduler.total {
                let archetype = scheduler.composition
                    [scheduler.spawned as usize % scheduler.composition.len()]
                .clone();
                let wave = state.wave;
                world_setup::spawn_unit(state, catalog, map, rng, &archetype, wave);
                scheduler.spawned += 1;
                scheduler.countdown_ms += scheduler.interval_ms;
            }
            if scheduler.spawned >= scheduler.total {
                debug!(wave = state.wave, "all units released");
                scheduler.phase = WavePhase::Draining;
            }
        }
        WavePhase::Draining => {
            if state.live_unit_count() == 0 {
                scheduler.phase = WavePhase::Complete;
            }
        }
        WavePhase::Complete => {
            let reward = wave_clear_reward(state.wave);
            state.resources += reward;
            state.events.push(SimEvent::WaveCleared {
                wave: state.wave,
                reward,
            });
            info!(wave = state.wave, reward, "wave cleared");
            state.wave += 1;
            state.once_per_wave.clear();
            scheduler.phase = WavePhase::Idle;
        }
    }
}
