//! Introvert Defense driver.
//!
//! Wires the simulation crates to a host: a fixed-rate game loop thread with
//! shared snapshot state, and a headless autopilot used by the demo binary.

pub mod demo;
pub mod game_loop;
pub mod state;

pub use introvert_core as core;
