//! ECS components for hecs entities.
//!
//! Components are plain data structs with no methods.
//! Game logic lives in systems, not components.

use serde::{Deserialize, Serialize};

use crate::catalog::{DefenderTypeId, UnitTypeId, UpgradeId};
use crate::enums::Direction;
use crate::types::{DefenderId, Position, UnitId};

/// A hostile unit walking a path. Stats are already wave-scaled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,
    pub archetype: UnitTypeId,
    pub vitality: f64,
    pub max_vitality: f64,
    /// Distance per tick before slow and time scale.
    pub base_speed: f64,
    pub reward: f64,
    /// Vitality removed from the base on arrival at the terminus.
    pub base_damage: f64,
    /// Index into the active map's paths.
    pub path: usize,
    /// Last waypoint reached (or started from).
    pub waypoint: usize,
    pub direction: Direction,
    pub alive: bool,
    /// Set when base damage has been dealt; guards against dealing it twice.
    pub reached_terminus: bool,
}

/// Timed and permanent status effects on a unit.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct UnitStatus {
    /// Ticks of stun left. A stunned unit does not move.
    pub stun_remaining: f64,
    /// Ticks of slow left.
    pub slow_remaining: f64,
    /// One-way: converted units walk home and are ignored by all combat.
    pub converted: bool,
}

/// Per-instance combat stats, copied from the archetype at placement and
/// mutated only by upgrades.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DefenderStats {
    pub damage: f64,
    pub range: f64,
    pub fire_interval_ms: f64,
    /// Extra reach for area shots; `None` means single-target fire.
    pub area_bonus: Option<f64>,
    /// Set once a damage upgrade lands; utility archetypes need it to fire.
    pub damage_upgraded: bool,
}

/// Live special-ability behavior, resolved from the archetype's spec and the
/// defender's upgrades.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Ability {
    None,
    GlobalPause { stun_ticks: f64 },
    Reposition,
    Support {
        radius: f64,
        boost_ms: f64,
        cooldown_ticks: f64,
    },
    AreaSlow { slow_ticks: f64, cooldown_ticks: f64 },
    AreaConvert { probability: f64, cooldown_ticks: f64 },
    AreaStun { stun_ticks: f64, cooldown_ticks: f64 },
}

/// A placed defender.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Defender {
    pub id: DefenderId,
    pub archetype: DefenderTypeId,
    pub stats: DefenderStats,
    /// Pure-utility archetypes only fire after a damage upgrade.
    pub utility_only: bool,
    pub upgrades: Vec<UpgradeId>,
    pub ability: Ability,
    /// Wall-clock ms of the last shot; `None` until the first one.
    pub last_fire_ms: Option<f64>,
    /// Unit selected on the last targeting pass (lookup only).
    pub target: Option<UnitId>,
    /// Ticks until the automatic ability can run again.
    pub special_cooldown: f64,
}

/// A shot in flight toward a unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    /// Weak reference: the projectile fizzles if this unit is gone.
    pub target: UnitId,
    pub damage: f64,
    /// Firing archetype, for matchup lookup and render color.
    pub source: DefenderTypeId,
    /// Where the projectile was fired from.
    pub origin: Position,
    pub alive: bool,
}

/// Visual-feedback payload. Never read by gameplay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EffectKind {
    Message { text: String },
    Particle { vx: f64, vy: f64 },
}

/// Transient effect that decays each tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Effect {
    pub kind: EffectKind,
    pub life: f64,
    pub max_life: f64,
}
