//! ECS systems that operate on the simulation world each tick.
//!
//! Systems are pure functions over `&mut WorldState` (or `&World`).
//! They do not own state; all state lives in components and `WorldState`.

pub mod abilities;
pub mod cleanup;
pub mod combat;
pub mod effects;
pub mod movement;
pub mod projectiles;
pub mod snapshot;
pub mod status;
pub mod wave_scheduler;
