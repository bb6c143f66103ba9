//! HUD values
//!
//! The simulation emits score and time changes at the point it mutates them;
//! `Hud` is the observer that keeps the displayed text in sync.

use serde::{Deserialize, Serialize};

use crate::session::SessionObserver;
use crate::sim::GameEvent;

/// Remaining time as shown on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeDisplay {
    /// Whole seconds, rounded down
    pub seconds: u32,
    /// Low on time; hosts typically switch to a warning color
    pub urgent: bool,
}

impl TimeDisplay {
    pub fn label(&self) -> String {
        format!("TIME: {}", self.seconds)
    }
}

pub fn score_label(score: u32) -> String {
    format!("SCORE: {}", score)
}

/// Latest HUD text
#[derive(Debug, Clone, Default)]
pub struct Hud {
    pub score: String,
    pub time: String,
    pub urgent: bool,
    pub paused: bool,
}

impl SessionObserver for Hud {
    fn on_event(&mut self, event: &GameEvent) {
        match event {
            GameEvent::ScoreChanged(score) => {
                self.score = score_label(*score);
                log::debug!("{}", self.score);
            }
            GameEvent::TimeChanged(display) => {
                if display.urgent && !self.urgent {
                    log::debug!("Clock urgent at {}s", display.seconds);
                }
                self.time = display.label();
                self.urgent = display.urgent;
            }
            GameEvent::PauseChanged { paused } => self.paused = *paused,
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hud_tracks_events() {
        let mut hud = Hud::default();
        hud.on_event(&GameEvent::ScoreChanged(3));
        hud.on_event(&GameEvent::TimeChanged(TimeDisplay {
            seconds: 4,
            urgent: true,
        }));
        assert_eq!(hud.score, "SCORE: 3");
        assert_eq!(hud.time, "TIME: 4");
        assert!(hud.urgent);

        hud.on_event(&GameEvent::TimeChanged(TimeDisplay {
            seconds: 9,
            urgent: false,
        }));
        assert!(!hud.urgent);
    }
}
