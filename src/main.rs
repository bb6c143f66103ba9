//! Color Lanes entry point
//!
//! Native builds run a headless session driven by the autopilot: useful for
//! balancing tuning files and smoke-testing the simulation without a renderer.

use std::time::{SystemTime, UNIX_EPOCH};

use color_lanes::audio::SoundLog;
use color_lanes::autopilot::{self, Intent};
use color_lanes::hud::Hud;
use color_lanes::{JsonFileStore, Session, Tuning};

/// Host frame rate for the headless run
const FRAME_DT: f32 = 1.0 / 60.0;
/// Hard stop in case a tuning file makes the clock effectively endless
const MAX_FRAMES: u64 = 60 * 60 * 30;

const SEED_ENV: &str = "COLOR_LANES_SEED";

fn seed_from_env() -> u64 {
    if let Ok(raw) = std::env::var(SEED_ENV) {
        match raw.parse() {
            Ok(seed) => return seed,
            Err(_) => log::warn!("Invalid {} '{}', using clock seed", SEED_ENV, raw),
        }
    }
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

fn main() {
    env_logger::init();
    log::info!("Color Lanes (headless) starting...");

    let tuning = Tuning::load_or_default();
    let seed = seed_from_env();
    let store = JsonFileStore::from_env();
    log::info!("Seed {}, high score file {:?}", seed, store.path());

    let mut session = Session::start(tuning, seed, store);
    session.subscribe(Hud::default());
    session.subscribe(SoundLog::default());

    let mut frames = 0;
    while !session.is_over() && frames < MAX_FRAMES {
        match autopilot::intent(session.state()) {
            Intent::Press(control) => session.pointer_down(Some(control)),
            Intent::Release => session.pointer_up(),
            Intent::Idle => {}
        }
        session.update(FRAME_DT);
        frames += 1;
    }

    if !session.is_over() {
        log::warn!("Stopped after {} frames without the clock running out", frames);
    }
    println!(
        "Final score: {} (high score: {})",
        session.score(),
        session.high_score()
    );
}
