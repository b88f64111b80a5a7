//! Game state snapshot — the complete visible state handed to the
//! presentation layer after each tick.

use serde::{Deserialize, Serialize};

use crate::catalog::{DefenderTypeId, UnitTypeId, UpgradeId};
use crate::components::{DefenderStats, EffectKind};
use crate::enums::*;
use crate::events::SimEvent;
use crate::types::{DefenderId, Position, SimTime, UnitId};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameStateSnapshot {
    pub time: SimTime,
    pub phase: GamePhase,
    pub wave_phase: WavePhase,
    pub map: Option<usize>,
    pub time_scale: f64,
    pub units: Vec<UnitView>,
    pub defenders: Vec<DefenderView>,
    pub projectiles: Vec<ProjectileView>,
    pub effects: Vec<EffectView>,
    pub score: ScoreView,
    /// Events since the previous snapshot.
    pub events: Vec<SimEvent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitView {
    pub id: UnitId,
    pub archetype: UnitTypeId,
    pub position: Position,
    pub vitality: f64,
    pub max_vitality: f64,
    pub direction: Direction,
    pub slowed: bool,
    pub stunned: bool,
    pub converted: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefenderView {
    pub id: DefenderId,
    pub archetype: DefenderTypeId,
    pub position: Position,
    pub stats: DefenderStats,
    pub upgrades: Vec<UpgradeId>,
    pub target: Option<UnitId>,
    pub special_cooldown: f64,
    /// A manual ability is ready to use this wave.
    pub manual_ready: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectileView {
    pub position: Position,
    pub origin: Position,
    pub target: UnitId,
    pub source: DefenderTypeId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectView {
    pub position: Position,
    pub kind: EffectKind,
    /// Remaining life as a fraction of the initial life (for fading).
    pub alpha: f64,
}

/// Running counters for display.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreView {
    pub resources: f64,
    pub score: f64,
    pub wave: u32,
    pub vitality: f64,
    pub units_defeated: u32,
    /// Units of the current wave not yet released.
    pub units_pending: u32,
}
