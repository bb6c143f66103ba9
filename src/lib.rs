//! Color Lanes - A lane-crossing arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (lanes, spawning, player, collisions, clock)
//! - `session`: Host-facing driver (frame hook, pointer input, persistence)
//! - `highscores`: Persisted best score behind an injected store
//! - `settings`: Data-driven game tuning
//! - `hud`: Score/time display values pushed to observers
//! - `audio`: Sound cues the simulation requests
//! - `autopilot`: Demo policy used by the headless binary

pub mod audio;
pub mod autopilot;
pub mod highscores;
pub mod hud;
pub mod session;
pub mod settings;
pub mod sim;

pub use highscores::{HighScores, JsonFileStore, MemoryStore, ScoreStore, StoreError};
pub use session::{Session, SessionObserver};
pub use settings::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Simulation rate
    pub const SIM_HZ: u32 = 120;
    /// Fixed simulation timestep
    pub const SIM_DT: f32 = 1.0 / SIM_HZ as f32;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Visible play area
    pub const WORLD_WIDTH: f32 = 1280.0;
    pub const WORLD_HEIGHT: f32 = 720.0;

    /// Lane layout (lanes are vertical tracks spread along x)
    pub const LANE_COUNT: usize = 9;
    pub const LAST_LANE: usize = LANE_COUNT - 1;
    pub const LANE_START_X: f32 = 160.0;
    pub const LANE_SPACING: f32 = 120.0;

    /// Hazards are rounded bars anchored at their bottom edge
    pub const HAZARD_WIDTH: f32 = 20.0;
    pub const HAZARD_CORNER: f32 = 8.0;

    pub const PLAYER_RADIUS: f32 = 20.0;
    pub const POWER_UP_RADIUS: f32 = 16.0;
    pub const TARGET_RADIUS: f32 = 30.0;
}

/// Convert a duration in seconds to whole simulation ticks
#[inline]
pub fn secs_to_ticks(secs: f32) -> u64 {
    (secs * consts::SIM_HZ as f32).round().max(0.0) as u64
}

/// x coordinate of a lane's centerline
#[inline]
pub fn lane_x(index: usize) -> f32 {
    consts::LANE_START_X + index as f32 * consts::LANE_SPACING
}
