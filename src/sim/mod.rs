//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod clock;
pub mod collision;
pub mod lane;
pub mod player;
pub mod schedule;
pub mod sdf;
pub mod spawner;
pub mod state;
pub mod tick;

pub use clock::GameClock;
pub use collision::{
    Body, Category, Contact, ContactSource, Resolution, detect_contacts, resolve_contact,
};
pub use lane::{Lane, LaneRegistry, TravelDirection};
pub use player::{LaneAdvance, Player, VerticalDir};
pub use schedule::{Job, Scheduler};
pub use spawner::{SpawnReport, spawn_cycle};
pub use state::{
    EntityId, GameEvent, GamePhase, GameState, HazardSize, Obstacle, ObstacleKind, ResetCause,
    Target,
};
pub use tick::{Control, TickInput, tick};
