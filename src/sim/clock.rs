//! Countdown clock
//!
//! Whole seconds, decremented once per scheduled clock tick. Reaching zero is
//! the terminal condition; the tick driver polls it once per frame.

use serde::{Deserialize, Serialize};

use crate::hud::TimeDisplay;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameClock {
    remaining: u32,
    urgent_threshold: u32,
}

impl GameClock {
    pub fn new(start_seconds: u32, urgent_threshold: u32) -> Self {
        Self {
            remaining: start_seconds,
            urgent_threshold,
        }
    }

    /// Take one second off. Never goes below zero.
    pub fn tick(&mut self) -> TimeDisplay {
        self.remaining = self.remaining.saturating_sub(1);
        self.display()
    }

    /// Add bonus seconds (power-up pickup)
    pub fn extend(&mut self, seconds: u32) -> TimeDisplay {
        self.remaining = self.remaining.saturating_add(seconds);
        self.display()
    }

    #[inline]
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    #[inline]
    pub fn is_urgent(&self) -> bool {
        self.remaining <= self.urgent_threshold
    }

    #[inline]
    pub fn is_expired(&self) -> bool {
        self.remaining == 0
    }

    pub fn display(&self) -> TimeDisplay {
        TimeDisplay {
            seconds: self.remaining,
            urgent: self.is_urgent(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_countdown_to_urgent() {
        let mut clock = GameClock::new(60, 5);
        for _ in 0..54 {
            clock.tick();
        }
        assert_eq!(clock.remaining(), 6);
        assert!(!clock.is_urgent());

        let display = clock.tick();
        assert_eq!(display.seconds, 5);
        assert!(display.urgent);
        assert!(!clock.is_expired());
    }

    #[test]
    fn test_never_negative() {
        let mut clock = GameClock::new(2, 5);
        clock.tick();
        clock.tick();
        assert!(clock.is_expired());
        clock.tick();
        assert_eq!(clock.remaining(), 0);
    }

    #[test]
    fn test_extend_clears_urgency() {
        let mut clock = GameClock::new(3, 5);
        assert!(clock.is_urgent());
        let display = clock.extend(5);
        assert_eq!(display.seconds, 8);
        assert!(!display.urgent);
    }
}
