//! Player controller
//!
//! Two independent behaviors: held up/down movement along the lane axis, and
//! discrete lane advances animated over a short duration. Failure replaces the
//! player with a fresh one on lane 0.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::lane::LaneRegistry;
use super::state::{EntityId, GameEvent, GameState, ResetCause};
use crate::audio::SoundEffect;
use crate::consts::*;
use crate::{lane_x, secs_to_ticks};

/// Held movement direction along the lane axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerticalDir {
    /// Toward increasing y
    Up,
    /// Toward decreasing y
    Down,
}

impl VerticalDir {
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            VerticalDir::Up => 1.0,
            VerticalDir::Down => -1.0,
        }
    }
}

/// An in-flight move to the next lane
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaneAdvance {
    pub from_x: f32,
    pub to_x: f32,
    /// Cross-axis coordinate held for the whole animation
    pub y: f32,
    pub elapsed_ticks: u64,
    pub duration_ticks: u64,
}

impl LaneAdvance {
    /// Animation progress in [0, 1]
    pub fn progress(&self) -> f32 {
        (self.elapsed_ticks as f32 / self.duration_ticks.max(1) as f32).min(1.0)
    }
}

/// The player sprite
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: EntityId,
    /// Always within 0..=LAST_LANE
    pub lane: usize,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub hold: Option<VerticalDir>,
    pub advance: Option<LaneAdvance>,
}

impl Player {
    /// A fresh player on the start lane at mid-height
    pub fn spawn(id: EntityId) -> Self {
        Self {
            id,
            lane: 0,
            pos: Vec2::new(lane_x(0), WORLD_HEIGHT / 2.0),
            vel: Vec2::ZERO,
            radius: PLAYER_RADIUS,
            hold: None,
            advance: None,
        }
    }

    #[inline]
    pub fn is_advancing(&self) -> bool {
        self.advance.is_some()
    }

    /// Start holding a direction. Ignored mid-advance.
    pub fn hold(&mut self, dir: VerticalDir) {
        if !self.is_advancing() {
            self.hold = Some(dir);
        }
    }

    /// Stop held movement
    pub fn release(&mut self) {
        self.hold = None;
    }

    /// Begin moving to the next lane.
    ///
    /// Returns false (and does nothing) when an advance is already running or
    /// the player is on the last lane. The lane index is bumped immediately.
    pub fn begin_advance(&mut self, lanes: &LaneRegistry, duration_ticks: u64) -> bool {
        if self.is_advancing() || self.lane >= LAST_LANE {
            return false;
        }
        let Some(next) = lanes.get(self.lane + 1) else {
            return false;
        };

        self.hold = None;
        self.advance = Some(LaneAdvance {
            from_x: self.pos.x,
            to_x: next.x,
            y: self.pos.y,
            elapsed_ticks: 0,
            duration_ticks: duration_ticks.max(1),
        });
        self.lane += 1;
        true
    }

    /// Advance one tick. Returns the lane whose advance just completed, if any.
    pub fn step(&mut self, lanes: &LaneRegistry, hold_speed: f32, dt: f32) -> Option<usize> {
        if let Some(adv) = &mut self.advance {
            adv.elapsed_ticks += 1;
            let t = adv.progress();
            self.pos = Vec2::new(adv.from_x + (adv.to_x - adv.from_x) * t, adv.y);

            if t < 1.0 {
                return None;
            }

            self.advance = None;
            self.vel = match lanes.get(self.lane) {
                Some(lane) if self.lane != LAST_LANE => Vec2::new(0.0, lane.signed_speed()),
                _ => Vec2::ZERO,
            };
            return Some(self.lane);
        }

        let held = self.hold.map_or(0.0, |d| d.sign() * hold_speed);
        self.pos += (self.vel + Vec2::new(0.0, held)) * dt;
        None
    }

    /// Left the visible vertical range
    pub fn out_of_bounds(&self) -> bool {
        self.pos.y < 0.0 || self.pos.y > WORLD_HEIGHT
    }
}

/// Handle a lane-advance press. Returns true if an advance started.
pub fn advance(state: &mut GameState) -> bool {
    let duration = secs_to_ticks(state.tuning.advance_duration);
    if !state.player.begin_advance(&state.lanes, duration) {
        log::debug!("Advance ignored on lane {}", state.player.lane);
        return false;
    }
    let lane = state.player.lane;
    state.emit(GameEvent::Sound(SoundEffect::Move));
    state.emit(GameEvent::LaneAdvanced { lane });
    true
}

/// Replace the player with a fresh one on lane 0
pub fn reset_player(state: &mut GameState, cause: ResetCause) {
    let old = state.player.id;
    let id = state.next_entity_id();
    state.player = Player::spawn(id);
    state.touching.retain(|&(player, _)| player != old);
    log::debug!("Player reset ({:?}) from id {} -> {}", cause, old, id);
    state.emit(GameEvent::PlayerReset { cause });
}
