//! Recoverable error types returned by engine commands and catalog loading.

use thiserror::Error;

use crate::catalog::{DefenderTypeId, UnitTypeId, UpgradeId};

/// Why a defender could not be placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PlacementError {
    #[error("not enough resources for this defender")]
    InsufficientFunds,
    #[error("position overlaps a path corridor")]
    BlockedByPath,
    #[error("position is too close to another defender")]
    BlockedByDefender,
    #[error("no valid defender archetype selected")]
    NoArchetypeSelected,
    #[error("no map selected")]
    NoMapSelected,
    #[error("the match is over")]
    GameOver,
}

/// Why an upgrade request was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum UpgradeError {
    #[error("defender already has the maximum number of upgrades")]
    MaxUpgradesReached,
    #[error("upgrade already applied to this defender")]
    AlreadyApplied,
    #[error("not enough resources for this upgrade")]
    InsufficientFunds,
    #[error("upgrade is not offered for this defender")]
    UnknownUpgrade,
    #[error("no such defender")]
    UnknownDefender,
    #[error("the match is over")]
    GameOver,
}

/// Why a manual special ability could not be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SpecialError {
    #[error("ability already used this wave")]
    AlreadyUsedThisWave,
    #[error("this defender has no such manual ability")]
    NotApplicableToArchetype,
    #[error("invalid target for this ability")]
    InvalidTarget,
    #[error("the match is over")]
    GameOver,
}

/// Why a wave could not be started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WaveError {
    #[error("a wave is already in progress")]
    WaveActive,
    #[error("no map selected")]
    NoMapSelected,
    #[error("the match is over")]
    GameOver,
}

/// Failure of any queued player command.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CommandError {
    #[error("placement rejected: {0}")]
    Placement(#[from] PlacementError),
    #[error("upgrade rejected: {0}")]
    Upgrade(#[from] UpgradeError),
    #[error("special rejected: {0}")]
    Special(#[from] SpecialError),
    #[error("wave start rejected: {0}")]
    Wave(#[from] WaveError),
    #[error("no map with index {0}")]
    UnknownMap(usize),
}

/// Problems found while loading a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("catalog defines no maps")]
    NoMaps,
    #[error("catalog defines no waves")]
    NoWaves,
    #[error("map {map} has no paths")]
    MapWithoutPaths { map: usize },
    #[error("map {map} has no spawn points")]
    MapWithoutSpawns { map: usize },
    #[error("path {path} of map {map} needs at least two waypoints")]
    ShortPath { map: usize, path: usize },
    #[error("a spawn point of map {map} feeds missing path {path}")]
    SpawnPathMissing { map: usize, path: usize },
    #[error("wave {wave} has an empty composition")]
    EmptyWave { wave: usize },
    #[error("{context} references unknown unit '{unit}'")]
    UnknownUnit { context: String, unit: UnitTypeId },
    #[error("defender '{defender}' offers unknown upgrade '{upgrade}'")]
    UnknownUpgrade {
        defender: DefenderTypeId,
        upgrade: UpgradeId,
    },
    #[error("invalid stat values in {context}")]
    InvalidStat { context: String },
}
