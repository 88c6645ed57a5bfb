//! Twang - a one-dimensional LED strip dungeon game
//!
//! Core modules:
//! - `sim`: Tick-driven simulation (particles, spawners, frame loop)
//! - `motion`: Sensor smoothing and attack gesture detection
//! - `platform`: Monotonic wrap-aware time
//! - `settings`: Versioned settings record and command shape
//! - `persistence`: Settings storage with version check
//! - `config`: Configuration injected into the core

pub mod config;
pub mod motion;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;

pub use config::SimConfig;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Lowest track coordinate
    pub const TRACK_MIN: i32 = 0;
    /// Highest track coordinate (the track is normalized, independent of LED count)
    pub const TRACK_MAX: i32 = 1000;

    /// Samples held by each smoothing window (must be odd)
    pub const SAMPLE_COUNT: usize = 5;

    /// Particles emitted by a single explosion
    pub const EXPLOSION_PARTICLES: usize = 40;

    /// Default frame period of the game loop
    pub const TICK_MS: u32 = 16;
}

/// Clamp a coordinate onto the track
#[inline]
pub fn clamp_to_track(position: i32) -> i32 {
    position.clamp(consts::TRACK_MIN, consts::TRACK_MAX)
}
