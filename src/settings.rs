//! Game tuning
//!
//! Every gameplay number lives here so a session can be rebalanced from a
//! JSON file without a rebuild. Missing fields fall back to the defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Errors reading a tuning file
#[derive(Debug, thiserror::Error)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse tuning file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning: {0}")]
    Invalid(&'static str),
}

/// Gameplay tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Clock ===
    /// Session length in seconds
    pub session_seconds: u32,
    /// Seconds added per power-up pickup
    pub power_up_bonus: u32,
    /// Remaining time at or below which the display turns urgent
    pub urgent_threshold: u32,

    // === Spawning ===
    /// Seconds between spawn cycles
    pub spawn_interval: f32,
    /// Lane speed tiers (units/s)
    pub speed_tiers: [f32; 3],
    /// Chance per cycle of spawning a power-up
    pub power_up_chance: f64,
    /// How far outside the visible area entities appear
    pub spawn_offset: f32,
    /// How far past a visible edge an entity may drift before it is culled
    pub cull_margin: f32,

    // === Player ===
    /// Speed of held up/down movement (units/s)
    pub hold_speed: f32,
    /// Duration of the lane advance animation
    pub advance_duration: f32,
    /// Delay between touching the target and returning to the start lane
    pub crossing_delay: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            session_seconds: 60,
            power_up_bonus: 5,
            urgent_threshold: 5,

            spawn_interval: 2.0,
            speed_tiers: [180.0, 200.0, 250.0],
            power_up_chance: 0.5,
            spawn_offset: 130.0,
            cull_margin: 150.0,

            hold_speed: 300.0,
            advance_duration: 0.2,
            crossing_delay: 0.5,
        }
    }
}

impl Tuning {
    /// Env var naming a JSON tuning file
    pub const CONFIG_ENV: &'static str = "COLOR_LANES_CONFIG";

    /// Parse tuning from JSON
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load from `COLOR_LANES_CONFIG` if set, else defaults
    pub fn load_or_default() -> Self {
        let Ok(path) = std::env::var(Self::CONFIG_ENV) else {
            return Self::default();
        };

        match Self::load(&path) {
            Ok(tuning) => {
                log::info!("Loaded tuning from {}", path);
                tuning
            }
            Err(e) => {
                log::warn!("Ignoring tuning file {}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Reject values that would stall or break the simulation
    pub fn validate(&self) -> Result<(), TuningError> {
        if self.session_seconds == 0 {
            return Err(TuningError::Invalid("session_seconds must be > 0"));
        }
        if self.spawn_interval <= 0.0 {
            return Err(TuningError::Invalid("spawn_interval must be > 0"));
        }
        if self.advance_duration <= 0.0 {
            return Err(TuningError::Invalid("advance_duration must be > 0"));
        }
        if !(0.0..=1.0).contains(&self.power_up_chance) {
            return Err(TuningError::Invalid("power_up_chance must be within 0..=1"));
        }
        if self.speed_tiers.iter().any(|s| *s <= 0.0) {
            return Err(TuningError::Invalid("speed_tiers must be positive"));
        }
        if self.cull_margin <= self.spawn_offset {
            // Fresh spawns would be culled on the same cycle
            return Err(TuningError::Invalid("cull_margin must exceed spawn_offset"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let tuning = Tuning::from_json(r#"{ "session_seconds": 90 }"#).unwrap();
        assert_eq!(tuning.session_seconds, 90);
        assert_eq!(tuning.power_up_bonus, 5);
        assert_eq!(tuning.speed_tiers, [180.0, 200.0, 250.0]);
    }

    #[test]
    fn test_invalid_json_rejected() {
        assert!(matches!(
            Tuning::from_json("{ not json"),
            Err(TuningError::Parse(_))
        ));
        assert!(matches!(
            Tuning::from_json(r#"{ "spawn_interval": 0.0 }"#),
            Err(TuningError::Invalid(_))
        ));
        assert!(matches!(
            Tuning::from_json(r#"{ "cull_margin": 100.0 }"#),
            Err(TuningError::Invalid(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            Tuning::load("/nonexistent/color-lanes/tuning.json"),
            Err(TuningError::Io(_))
        ));
    }
}
