//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Top-level match phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// No map chosen yet; nothing simulates.
    #[default]
    MapSelect,
    /// Map chosen, match running.
    Active,
    /// Ticks are ignored until resumed.
    Paused,
    /// Base vitality reached zero. Terminal.
    GameOver,
}

/// Wave scheduler state machine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WavePhase {
    /// Waiting for a start command.
    #[default]
    Idle,
    /// Units are being released on the spawn interval.
    Spawning,
    /// Everything spawned; waiting for the field to empty.
    Draining,
    /// Field empty; rewards granted on the way back to idle.
    Complete,
}

/// Which way a unit walks its path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Toward the terminus (the defended base).
    #[default]
    Forward,
    /// Back toward the spawn point, after conversion.
    Reversed,
}
