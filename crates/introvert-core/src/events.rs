//! Events emitted by the simulation for UI and audio feedback.

use serde::{Deserialize, Serialize};

use crate::catalog::{DefenderTypeId, UnitTypeId, UpgradeId};
use crate::types::{DefenderId, Position, UnitId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SimEvent {
    MapSelected { map: usize },
    WaveStarted { wave: u32, unit_count: u32 },
    UnitSpawned { unit: UnitId, archetype: UnitTypeId },
    UnitDefeated { unit: UnitId, reward: f64 },
    UnitConverted { unit: UnitId },
    /// A unit reached the terminus and drained the base.
    BaseDamaged { unit: UnitId, amount: f64, vitality: f64 },
    WaveCleared { wave: u32, reward: f64 },
    GameOver { wave: u32, score: f64 },
    DefenderPlaced {
        defender: DefenderId,
        archetype: DefenderTypeId,
        position: Position,
    },
    UpgradeApplied { defender: DefenderId, upgrade: UpgradeId },
    GlobalPause { defender: DefenderId },
    DefenderRepositioned { defender: DefenderId, position: Position },
    /// A queued command failed validation.
    CommandRejected { reason: String },
}
