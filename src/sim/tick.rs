//! Fixed timestep simulation tick
//!
//! Frame order: input, due timers, movement, bounds, contact detection,
//! contact resolution, terminal check.

use super::collision::{ContactSource, detect_contacts, finish_crossing, resolve_contact};
use super::player::{self, VerticalDir, reset_player};
use super::schedule::Job;
use super::spawner::spawn_cycle;
use super::state::{GameEvent, GamePhase, GameState, ResetCause};
use crate::audio::SoundEffect;
use crate::consts::SIM_DT;

/// On-screen controls a pointer can land on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Advance,
    Up,
    Down,
    Pause,
}

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Control hit by a pointer-down this frame
    pub pressed: Option<Control>,
    /// Pointer lifted
    pub released: bool,
    /// Pointer cancelled by the system
    pub cancelled: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) {
    if input.pressed == Some(Control::Pause) {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                state.emit(GameEvent::PauseChanged { paused: true });
                return;
            }
            GamePhase::Paused => {
                state.phase = GamePhase::Playing;
                state.emit(GameEvent::PauseChanged { paused: false });
            }
            GamePhase::GameOver => {}
        }
    }

    // Don't tick if paused or game over
    if state.phase != GamePhase::Playing {
        return;
    }

    state.time_ticks += 1;

    apply_input(state, input);

    for job in state.scheduler.take_due(state.time_ticks) {
        run_job(state, job);
    }

    // Movement
    let completed = state
        .player
        .step(&state.lanes, state.tuning.hold_speed, SIM_DT);
    if let Some(lane) = completed {
        log::trace!("Arrived on lane {}", lane);
    }
    for obstacle in &mut state.obstacles {
        obstacle.pos += obstacle.vel * SIM_DT;
    }

    if state.player.out_of_bounds() {
        reset_player(state, ResetCause::OutOfBounds);
    }

    // Contacts are all found before any of them mutates state
    let contacts = match state.contact_source {
        ContactSource::Builtin => {
            state.pending_contacts.clear();
            detect_contacts(state)
        }
        ContactSource::External => std::mem::take(&mut state.pending_contacts),
    };
    for contact in contacts {
        resolve_contact(state, contact);
    }

    check_terminal(state);

    state.normalize_order();
}

fn apply_input(state: &mut GameState, input: &TickInput) {
    match input.pressed {
        Some(Control::Advance) => {
            player::advance(state);
        }
        Some(Control::Up) => state.player.hold(VerticalDir::Up),
        Some(Control::Down) => state.player.hold(VerticalDir::Down),
        Some(Control::Pause) | None => {}
    }
    if input.released || input.cancelled {
        state.player.release();
    }
}

fn run_job(state: &mut GameState, job: Job) {
    match job {
        Job::SpawnCycle => {
            spawn_cycle(state);
        }
        Job::ClockTick => {
            let display = state.clock.tick();
            state.emit(GameEvent::TimeChanged(display));
        }
        Job::FinishCrossing => finish_crossing(state),
    }
}

/// End the session the first frame the clock reads zero
fn check_terminal(state: &mut GameState) {
    if !state.clock.is_expired() || state.phase == GamePhase::GameOver {
        return;
    }
    state.phase = GamePhase::GameOver;
    state.scheduler.cancel(Job::SpawnCycle);
    state.scheduler.cancel(Job::ClockTick);
    state.scheduler.cancel(Job::FinishCrossing);
    state.player.release();

    log::info!("Time up after {} ticks, score {}", state.time_ticks, state.score);
    state.emit(GameEvent::Sound(SoundEffect::LevelCompleted));
    state.emit(GameEvent::SessionEnded { score: state.score });
}
