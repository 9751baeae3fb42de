//! Time utilities for game simulation

use std::time::Duration;

/// Tick rate configuration
pub const SIMULATION_TPS: u32 = 60; // 60 steps per second
pub const TICK_DURATION_MICROS: u64 = 1_000_000 / SIMULATION_TPS as u64;

/// Wall-clock length of one simulation step
pub fn tick_duration() -> Duration {
    Duration::from_micros(TICK_DURATION_MICROS)
}
