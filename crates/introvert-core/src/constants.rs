//! Simulation constants and tuning parameters.

/// Nominal frame rate the per-tick quantities are tuned for (Hz).
pub const TICK_RATE: u32 = 60;

/// Wall-clock milliseconds covered by one nominal tick.
pub const MS_PER_TICK: f64 = 1000.0 / TICK_RATE as f64;

// --- Match defaults ---

/// Resources the player starts a match with.
pub const STARTING_RESOURCES: f64 = 100.0;

/// Base vitality ("social battery") at match start.
pub const STARTING_VITALITY: f64 = 20.0;

/// Allowed time-scale range (1× normal, 2× fast).
pub const MIN_TIME_SCALE: f64 = 1.0;
pub const MAX_TIME_SCALE: f64 = 2.0;

// --- Movement ---

/// Distance below which a unit counts as having arrived at its target waypoint.
pub const WAYPOINT_PROXIMITY: f64 = 5.0;

/// Speed multiplier while a slow effect is active (70% reduction).
pub const SLOW_SPEED_FACTOR: f64 = 0.3;

/// Units appear this far before their spawn point (along −x).
pub const SPAWN_OFFSET_X: f64 = 30.0;

// --- Combat ---

/// Projectile speed per tick at 1× time scale.
pub const PROJECTILE_SPEED: f64 = 7.0;

/// Distance at which a projectile hits its target.
pub const PROJECTILE_HIT_RADIUS: f64 = 10.0;

pub const STRONG_MULTIPLIER: f64 = 2.0;
pub const WEAK_MULTIPLIER: f64 = 0.5;
pub const NEUTRAL_MULTIPLIER: f64 = 1.0;

/// Particles emitted when a unit is defeated.
pub const DEFEAT_PARTICLE_COUNT: usize = 8;

// --- Transient effects ---

/// Lifetime of a floating message (ticks).
pub const MESSAGE_LIFETIME_TICKS: f64 = 180.0;

/// Lifetime of a particle (ticks).
pub const PARTICLE_LIFETIME_TICKS: f64 = 60.0;

/// Downward acceleration applied to particles per tick.
pub const PARTICLE_GRAVITY: f64 = 0.3;

/// Half-extent of the random initial particle velocity.
pub const PARTICLE_SPREAD: f64 = 4.0;

/// Upward bias applied to the initial particle velocity.
pub const PARTICLE_LIFT: f64 = 2.0;

// --- Upgrades ---

/// Distinct upgrades a single defender may hold.
pub const MAX_UPGRADES_PER_DEFENDER: usize = 2;

// --- Placement ---

/// Half-width of the no-build corridor around every path segment.
pub const PATH_CORRIDOR_HALF_WIDTH: f64 = 40.0;

/// Minimum distance between two defenders.
pub const DEFENDER_MIN_SEPARATION: f64 = 35.0;

// --- Waves ---

/// Per-wave growth factor of the unit count.
pub const WAVE_COUNT_GROWTH: f64 = 1.1;

/// Per-wave growth factor of unit health.
pub const WAVE_HEALTH_GROWTH: f64 = 1.15;

/// Linear per-wave speed increase.
pub const WAVE_SPEED_STEP: f64 = 0.03;

/// Linear per-wave reward increase.
pub const WAVE_REWARD_STEP: f64 = 0.05;

/// Spawn interval at wave 0 before the per-wave reduction (ms).
pub const SPAWN_INTERVAL_BASE_MS: f64 = 1800.0;

/// Spawn interval reduction per wave (ms).
pub const SPAWN_INTERVAL_STEP_MS: f64 = 50.0;

/// Spawn interval floor (ms).
pub const SPAWN_INTERVAL_MIN_MS: f64 = 800.0;

/// Flat part of the wave-clear reward.
pub const WAVE_CLEAR_BASE_REWARD: f64 = 25.0;

/// Per-wave part of the wave-clear reward.
pub const WAVE_CLEAR_REWARD_PER_WAVE: f64 = 3.0;
