//! Demo autopilot
//!
//! Plays the game through the same pointer controls a person would use. It
//! advances when the next lane is clear for the length of the move, steers
//! away from the screen edges, and homes in on the target from the last lane.

use crate::consts::*;
use crate::sim::{Control, GamePhase, GameState, ObstacleKind, VerticalDir};

/// Extra time the next lane must stay clear after the move finishes
const SAFETY_WINDOW: f32 = 0.35;
/// Clearance kept around the player when judging a lane
const CLEARANCE: f32 = 12.0;
/// Distance from the top/bottom edge at which the autopilot steers back
const EDGE_GUARD: f32 = 90.0;
/// Close enough to the target's y to stop steering
const TARGET_TOLERANCE: f32 = 8.0;

/// What the autopilot wants to do this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Press(Control),
    Release,
    Idle,
}

/// Pick the next pointer action for `state`
pub fn intent(state: &GameState) -> Intent {
    if state.phase != GamePhase::Playing || state.player.is_advancing() {
        return Intent::Idle;
    }
    let player = &state.player;

    let wanted = if player.lane == LAST_LANE {
        let dy = state.target.pos.y - player.pos.y;
        if dy.abs() <= TARGET_TOLERANCE {
            None
        } else if dy > 0.0 {
            Some(VerticalDir::Up)
        } else {
            Some(VerticalDir::Down)
        }
    } else if player.pos.y < EDGE_GUARD {
        Some(VerticalDir::Up)
    } else if player.pos.y > WORLD_HEIGHT - EDGE_GUARD {
        Some(VerticalDir::Down)
    } else if lane_is_clear(state, player.lane + 1) {
        return Intent::Press(Control::Advance);
    } else {
        None
    };

    match (wanted, player.hold) {
        (Some(dir), Some(held)) if dir == held => Intent::Idle,
        (Some(VerticalDir::Up), _) => Intent::Press(Control::Up),
        (Some(VerticalDir::Down), _) => Intent::Press(Control::Down),
        (None, Some(_)) => Intent::Release,
        (None, None) => Intent::Idle,
    }
}

/// No hazard on `lane` will overlap the player's row during the move and a
/// short window after it
fn lane_is_clear(state: &GameState, lane: usize) -> bool {
    let y = state.player.pos.y;
    let reach = state.player.radius + CLEARANCE;
    let horizon = state.tuning.advance_duration + SAFETY_WINDOW;

    state
        .obstacles
        .iter()
        .filter(|o| o.lane == lane)
        .all(|o| {
            let ObstacleKind::Hazard(size) = o.kind else {
                return true;
            };
            // Span swept by the bar over the horizon
            let end = o.pos.y + o.vel.y * horizon;
            let low = o.pos.y.min(end);
            let high = o.pos.y.max(end) + size.length();
            y + reach < low || y - reach > high
        })
}
