//! Session driver
//!
//! The surface a host engine talks to: it starts the scene, forwards pointer
//! and contact events, calls `update` once per rendered frame and listens for
//! `GameEvent`s. The session owns the injected score store and writes the
//! high score when the clock runs out.

use crate::consts::{MAX_SUBSTEPS, SIM_DT};
use crate::highscores::{HighScores, ScoreStore};
use crate::settings::Tuning;
use crate::sim::{Body, Contact, ContactSource, Control, GameEvent, GameState, TickInput, tick};

/// Receives every event the simulation emits, in order
pub trait SessionObserver {
    fn on_event(&mut self, event: &GameEvent);
}

impl<F: FnMut(&GameEvent)> SessionObserver for F {
    fn on_event(&mut self, event: &GameEvent) {
        self(event)
    }
}

/// One play-through
pub struct Session<S: ScoreStore> {
    state: GameState,
    store: S,
    high_scores: HighScores,
    observers: Vec<Box<dyn SessionObserver>>,
    /// Input gathered since the last tick
    input: TickInput,
    accumulator: f32,
    ended: bool,
}

impl<S: ScoreStore> Session<S> {
    /// Scene-loaded hook: read the high score, build the scene, start the schedules
    pub fn start(tuning: Tuning, seed: u64, mut store: S) -> Self {
        let high_scores = store.load().unwrap_or_else(|e| {
            log::warn!("Could not read high score, using 0: {}", e);
            HighScores::default()
        });
        log::info!("Session start (best {})", high_scores.high_score);

        Self {
            state: GameState::new(seed, tuning),
            store,
            high_scores,
            observers: Vec::new(),
            input: TickInput::default(),
            accumulator: 0.0,
            ended: false,
        }
    }

    pub fn subscribe(&mut self, observer: impl SessionObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Let the host engine report contacts instead of the built-in shape tests
    pub fn use_external_contacts(&mut self) {
        self.state.contact_source = ContactSource::External;
    }

    /// Pointer went down on `control` (None: nothing hit)
    pub fn pointer_down(&mut self, control: Option<Control>) {
        if control.is_some() {
            self.input.pressed = control;
        }
    }

    pub fn pointer_up(&mut self) {
        self.input.released = true;
    }

    pub fn pointer_cancel(&mut self) {
        self.input.cancelled = true;
    }

    /// Host-reported overlap between two bodies, resolved on the next tick.
    /// Dropped unless `use_external_contacts` was called.
    pub fn report_contact(&mut self, a: Body, b: Body) {
        if self.state.contact_source != ContactSource::External {
            log::warn!("Ignoring reported contact {:?}/{:?}: built-in detection is active", a, b);
            return;
        }
        self.state.pending_contacts.push(Contact::new(a, b));
    }

    /// Per-frame hook. Runs as many fixed ticks as `elapsed` covers.
    pub fn update(&mut self, elapsed: f32) {
        let dt = elapsed.clamp(0.0, 0.1);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.step();
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
    }

    /// Run exactly one tick and dispatch its events
    pub fn step(&mut self) {
        let input = std::mem::take(&mut self.input);
        tick(&mut self.state, &input);
        self.dispatch();
    }

    fn dispatch(&mut self) {
        for event in self.state.drain_events() {
            if let GameEvent::SessionEnded { score } = event {
                self.finish(score);
            }
            for observer in &mut self.observers {
                observer.on_event(&event);
            }
        }
    }

    /// Persist max(run, stored) once the clock has run out
    fn finish(&mut self, score: u32) {
        if self.ended {
            return;
        }
        self.ended = true;
        if self.high_scores.record(score) {
            log::info!("New high score: {}", score);
        }
        if let Err(e) = self.store.save(&self.high_scores) {
            log::warn!("Failed to save high score: {}", e);
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_scores.high_score
    }

    pub fn is_over(&self) -> bool {
        self.ended
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
