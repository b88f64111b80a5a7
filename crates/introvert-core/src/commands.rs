//! Player commands sent from the presentation layer to the simulation.
//!
//! The engine also exposes each command as a direct method returning a
//! `Result`; the queued form is processed at the next tick boundary and
//! reports rejections as events.

use serde::{Deserialize, Serialize};

use crate::catalog::{DefenderTypeId, UpgradeId};
use crate::types::{DefenderId, Position};

/// All possible player actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    // --- Match setup ---
    /// Choose a map and reset the world for a fresh match.
    SelectMap { map: usize },

    // --- Waves ---
    /// Start the next wave.
    StartWave,

    // --- Defenders ---
    PlaceDefender {
        archetype: DefenderTypeId,
        position: Position,
    },
    RequestUpgrade {
        defender: DefenderId,
        upgrade: UpgradeId,
    },
    /// Fire a defender's manual ability (global pause).
    TriggerSpecial { defender: DefenderId },
    /// Relocate a defender with the reposition ability.
    Reposition {
        defender: DefenderId,
        position: Position,
    },

    // --- Simulation control ---
    /// Set time scale (1.0 = normal, 2.0 = fast).
    SetTimeScale { scale: f64 },
    Pause,
    Resume,
}
