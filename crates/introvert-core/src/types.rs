//! Fundamental geometric, identity, and simulation-time types.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// 2D position in playfield space (pixels of the nominal 800×600 board).
/// x = right, y = down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Stable identity of a spawned unit. Allocated in spawn order, so it doubles
/// as the deterministic scan order for targeting tie-breaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UnitId(pub u64);

/// Identity of a placed defender. Dense index: defenders are never removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DefenderId(pub u32);

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SimTime {
    /// Number of ticks processed.
    pub tick: u64,
    /// Unscaled wall-clock milliseconds since the engine was created.
    pub elapsed_ms: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another position.
    pub fn distance_to(&self, other: &Position) -> f64 {
        self.as_dvec2().distance(other.as_dvec2())
    }

    pub fn as_dvec2(&self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }
}

impl From<DVec2> for Position {
    fn from(v: DVec2) -> Self {
        Self { x: v.x, y: v.y }
    }
}

impl SimTime {
    /// Advance the clock by `delta_ticks` nominal frames.
    pub fn advance(&mut self, delta_ticks: f64) {
        self.tick += 1;
        self.elapsed_ms += delta_ticks * crate::constants::MS_PER_TICK;
    }
}
