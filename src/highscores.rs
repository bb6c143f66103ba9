//! High score persistence
//!
//! A single best score, read when a session starts and written when it ends.
//! Storage is behind `ScoreStore` so the session never touches a global.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Errors reading or writing the high score
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("high score I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("high score file is corrupt: {0}")]
    Parse(#[from] serde_json::Error),
}

/// The persisted record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScores {
    #[serde(rename = "highScore", default)]
    pub high_score: u32,
}

impl HighScores {
    pub fn new(high_score: u32) -> Self {
        Self { high_score }
    }

    /// Fold a finished run in. Returns true if it set a new best.
    pub fn record(&mut self, score: u32) -> bool {
        let improved = score > self.high_score;
        self.high_score = self.high_score.max(score);
        improved
    }
}

/// Somewhere to keep the high score between runs
pub trait ScoreStore {
    fn load(&mut self) -> Result<HighScores, StoreError>;
    fn save(&mut self, scores: &HighScores) -> Result<(), StoreError>;
}

/// JSON file on disk
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Env var overriding the save location
    pub const PATH_ENV: &'static str = "COLOR_LANES_SAVE";
    const DEFAULT_FILE: &'static str = "highscore.json";

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `COLOR_LANES_SAVE` if set, else `highscore.json` in the working directory
    pub fn from_env() -> Self {
        let path =
            std::env::var(Self::PATH_ENV).unwrap_or_else(|_| Self::DEFAULT_FILE.to_string());
        Self::new(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScoreStore for JsonFileStore {
    fn load(&mut self) -> Result<HighScores, StoreError> {
        let json = match std::fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No high score at {:?}, starting fresh", self.path);
                return Ok(HighScores::default());
            }
            Err(e) => return Err(e.into()),
        };
        let scores: HighScores = serde_json::from_str(&json)?;
        log::info!("Loaded high score {}", scores.high_score);
        Ok(scores)
    }

    fn save(&mut self, scores: &HighScores) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        // Write then rename so a crash never leaves a half-written file
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, serde_json::to_string_pretty(scores)?)?;
        std::fs::rename(&tmp, &self.path)?;
        log::info!("High score saved ({})", scores.high_score);
        Ok(())
    }
}

/// In-process store (tests, hosts with their own persistence)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub scores: HighScores,
    /// Number of successful saves
    pub saves: usize,
}

impl MemoryStore {
    pub fn with_high_score(high_score: u32) -> Self {
        Self {
            scores: HighScores::new(high_score),
            saves: 0,
        }
    }
}

impl ScoreStore for MemoryStore {
    fn load(&mut self) -> Result<HighScores, StoreError> {
        Ok(self.scores)
    }

    fn save(&mut self, scores: &HighScores) -> Result<(), StoreError> {
        self.scores = *scores;
        self.saves += 1;
        Ok(())
    }
}
