//! Sound cues
//!
//! The simulation only asks for sounds; playback belongs to the host. Each
//! cue maps to the asset file the host should play.

use serde::{Deserialize, Serialize};

use crate::session::SessionObserver;
use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundEffect {
    /// Lane advance started
    Move,
    /// Player hit a hazard
    Fail,
    /// Player reached the target
    LevelUp,
    /// Power-up collected
    PowerUp,
    /// Clock ran out
    LevelCompleted,
    /// Background music, started once when the scene loads
    Background,
}

impl SoundEffect {
    /// Asset file for this cue
    pub fn asset(self) -> &'static str {
        match self {
            SoundEffect::Move => "move.wav",
            SoundEffect::Fail => "fail.wav",
            SoundEffect::LevelUp => "levelUp.wav",
            SoundEffect::PowerUp => "powerUp.wav",
            SoundEffect::LevelCompleted => "levelCompleted.wav",
            SoundEffect::Background => "background.wav",
        }
    }

    /// Repeat until the scene goes away
    pub fn looping(self) -> bool {
        matches!(self, SoundEffect::Background)
    }

    /// Whether the cue should block the next cue on the same channel until done
    pub fn wait_for_completion(self) -> bool {
        !matches!(self, SoundEffect::Move | SoundEffect::Background)
    }
}

/// Observer that logs every cue instead of playing it (headless hosts)
#[derive(Debug, Default)]
pub struct SoundLog {
    pub played: usize,
}

impl SessionObserver for SoundLog {
    fn on_event(&mut self, event: &GameEvent) {
        if let GameEvent::Sound(effect) = event {
            self.played += 1;
            log::debug!(
                "Sound {}{}",
                effect.asset(),
                if effect.looping() { " (loop)" } else { "" }
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assets_are_distinct() {
        let all = [
            SoundEffect::Move,
            SoundEffect::Fail,
            SoundEffect::LevelUp,
            SoundEffect::PowerUp,
            SoundEffect::LevelCompleted,
            SoundEffect::Background,
        ];
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert_ne!(a.asset(), b.asset());
            }
        }
    }

    #[test]
    fn test_sound_log_counts_only_sounds() {
        let mut sounds = SoundLog::default();
        sounds.on_event(&GameEvent::Sound(SoundEffect::Move));
        sounds.on_event(&GameEvent::ScoreChanged(1));
        sounds.on_event(&GameEvent::Sound(SoundEffect::Fail));
        assert_eq!(sounds.played, 2);
    }

    #[test]
    fn test_only_background_loops() {
        assert!(SoundEffect::Background.looping());
        assert!(!SoundEffect::Background.wait_for_completion());
        assert!(!SoundEffect::LevelUp.looping());
    }
}
