//! Simulation engine for Introvert Defense.
//!
//! Owns the match `WorldState` (a hecs world plus counters), runs systems in
//! a fixed order each tick, and produces `GameStateSnapshot`s for the
//! frontend.

pub mod engine;
pub mod placement;
pub mod systems;
pub mod upgrades;
pub mod world_setup;
pub mod world_state;

pub use engine::{SimConfig, SimulationEngine};
pub use introvert_core as core;
