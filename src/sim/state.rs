//! Game state and core simulation types

use std::collections::BTreeSet;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::clock::GameClock;
use super::collision::{Category, Contact, ContactSource};
use super::lane::{Lane, LaneRegistry};
use super::player::Player;
use super::schedule::{Job, Scheduler};
use crate::audio::SoundEffect;
use crate::consts::*;
use crate::hud::TimeDisplay;
use crate::settings::Tuning;
use crate::{lane_x, secs_to_ticks};

pub type EntityId = u32;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Clock running, traffic moving
    Playing,
    /// Everything frozen until pause is pressed again
    Paused,
    /// Clock hit zero
    GameOver,
}

/// Hazard sizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HazardSize {
    Small,
    Medium,
    Large,
}

impl HazardSize {
    pub const ALL: [HazardSize; 3] = [HazardSize::Small, HazardSize::Medium, HazardSize::Large];

    /// Bar length along the lane
    pub fn length(self) -> f32 {
        match self {
            HazardSize::Small => 70.0,
            HazardSize::Medium => 100.0,
            HazardSize::Large => 130.0,
        }
    }
}

/// What a lane entity is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    Hazard(HazardSize),
    PowerUp,
}

/// Anything riding a lane: hazards and power-ups
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: EntityId,
    pub kind: ObstacleKind,
    pub lane: usize,
    /// Hazards: bottom-center of the bar. Power-ups: circle center.
    pub pos: Vec2,
    pub vel: Vec2,
}

impl Obstacle {
    /// Place a new entity just outside the visible area, moving with its lane
    pub fn enter(id: EntityId, kind: ObstacleKind, lane: &Lane, offset: f32) -> Self {
        Self {
            id,
            kind,
            lane: lane.index,
            pos: Vec2::new(lane.x, lane.entry_y(offset)),
            vel: Vec2::new(0.0, lane.signed_speed()),
        }
    }

    pub fn category(&self) -> Category {
        match self.kind {
            ObstacleKind::Hazard(_) => Category::Obstacle,
            ObstacleKind::PowerUp => Category::PowerUp,
        }
    }

    #[inline]
    pub fn is_power_up(&self) -> bool {
        self.kind == ObstacleKind::PowerUp
    }

    /// Drifted more than `margin` past the top or bottom edge
    pub fn is_offscreen(&self, margin: f32) -> bool {
        self.pos.y < -margin || self.pos.y > WORLD_HEIGHT + margin
    }
}

/// The goal the player must touch to finish a crossing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Target {
    pub id: EntityId,
    pub pos: Vec2,
    pub radius: f32,
}

/// Why the player was sent back to the start lane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResetCause {
    Hazard,
    OutOfBounds,
    Crossing,
}

/// Notifications for the host (sound, HUD, effects, session end)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Sound(SoundEffect),
    ScoreChanged(u32),
    TimeChanged(TimeDisplay),
    LaneAdvanced { lane: usize },
    PlayerReset { cause: ResetCause },
    PowerUpCollected { id: EntityId },
    /// Crossing celebration attached to the player
    EffectAttached { player: EntityId },
    EffectDetached,
    PauseChanged { paused: bool },
    /// Clock reached zero. Emitted exactly once.
    SessionEnded { score: u32 },
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub tuning: Tuning,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub phase: GamePhase,
    pub lanes: LaneRegistry,
    pub player: Player,
    pub target: Target,
    /// Hazards and power-ups (sorted by id for determinism)
    pub obstacles: Vec<Obstacle>,
    pub clock: GameClock,
    /// Run score
    pub score: u32,
    pub scheduler: Scheduler,
    /// Where contacts come from
    pub contact_source: ContactSource,
    /// (player, other) pairs overlapping as of the last detection pass
    pub touching: BTreeSet<(EntityId, EntityId)>,
    /// Host-reported contacts waiting for the next tick
    pub pending_contacts: Vec<Contact>,
    /// Player the crossing celebration is attached to
    pub crossing_effect: Option<EntityId>,
    /// Events produced since the last drain
    pub events: Vec<GameEvent>,
    next_id: EntityId,
}

impl GameState {
    /// Build the scene: lanes with traffic, player, target, HUD values and
    /// the recurring spawn and clock schedules.
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut lanes = LaneRegistry::new();
        lanes.assign_traffic(&mut rng, &tuning.speed_tiers);

        let clock = GameClock::new(tuning.session_seconds, tuning.urgent_threshold);

        let mut state = Self {
            seed,
            rng,
            time_ticks: 0,
            phase: GamePhase::Playing,
            lanes,
            player: Player::spawn(0),
            target: Target {
                id: 0,
                pos: Vec2::new(lane_x(LAST_LANE), WORLD_HEIGHT / 2.0),
                radius: TARGET_RADIUS,
            },
            obstacles: Vec::new(),
            clock,
            score: 0,
            scheduler: Scheduler::new(),
            contact_source: ContactSource::Builtin,
            touching: BTreeSet::new(),
            pending_contacts: Vec::new(),
            crossing_effect: None,
            events: Vec::new(),
            next_id: 1,
            tuning,
        };

        state.player = Player::spawn(state.next_entity_id());
        state.target.id = state.next_entity_id();

        let spawn_period = secs_to_ticks(state.tuning.spawn_interval);
        let second = secs_to_ticks(1.0);
        state
            .scheduler
            .schedule_repeating(Job::SpawnCycle, 0, 0, spawn_period);
        state
            .scheduler
            .schedule_repeating(Job::ClockTick, 0, second, second);

        state.emit(GameEvent::ScoreChanged(state.score));
        state.emit(GameEvent::TimeChanged(state.clock.display()));
        state.emit(GameEvent::Sound(SoundEffect::Background));

        log::info!(
            "Scene ready: seed={} lanes={} clock={}s",
            seed,
            state.lanes.len(),
            state.clock.remaining()
        );
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take every event produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn obstacle(&self, id: EntityId) -> Option<&Obstacle> {
        self.obstacles.iter().find(|o| o.id == id)
    }

    /// Remove an obstacle and forget any contact with it
    pub fn remove_obstacle(&mut self, id: EntityId) -> Option<Obstacle> {
        let idx = self.obstacles.iter().position(|o| o.id == id)?;
        self.touching.retain(|&(_, other)| other != id);
        Some(self.obstacles.remove(idx))
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Ensure obstacles are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.obstacles.sort_by_key(|o| o.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_scene() {
        let state = GameState::new(42, Tuning::default());
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.lanes.len(), LANE_COUNT);
        assert_eq!(state.player.lane, 0);
        assert_ne!(state.player.id, state.target.id);
        assert_eq!(state.clock.remaining(), 60);
        assert_eq!(state.score, 0);
        assert!(state.obstacles.is_empty());
        assert!(state.scheduler.is_pending(Job::SpawnCycle));
        assert!(state.scheduler.is_pending(Job::ClockTick));
        assert_eq!(
            state.events,
            vec![
                GameEvent::ScoreChanged(0),
                GameEvent::TimeChanged(TimeDisplay {
                    seconds: 60,
                    urgent: false
                }),
                GameEvent::Sound(SoundEffect::Background),
            ]
        );
    }

    #[test]
    fn test_same_seed_same_lanes() {
        let a = GameState::new(99, Tuning::default());
        let b = GameState::new(99, Tuning::default());
        for (la, lb) in a.lanes.iter().zip(b.lanes.iter()) {
            assert_eq!(la, lb);
        }
    }

    #[test]
    fn test_obstacle_entry() {
        let mut lane = Lane::new(2);
        lane.speed = 250.0;
        let o = Obstacle::enter(5, ObstacleKind::Hazard(HazardSize::Large), &lane, 130.0);
        assert_eq!(o.pos, Vec2::new(lane.x, -130.0));
        assert_eq!(o.vel, Vec2::new(0.0, 250.0));
        assert_eq!(o.category(), Category::Obstacle);
        assert!(!o.is_offscreen(150.0));
    }

    #[test]
    fn test_remove_obstacle_forgets_contact() {
        let mut state = GameState::new(1, Tuning::default());
        let lane = state.lanes.get(1).unwrap().clone();
        let id = state.next_entity_id();
        state
            .obstacles
            .push(Obstacle::enter(id, ObstacleKind::PowerUp, &lane, 130.0));
        state.touching.insert((state.player.id, id));

        assert!(state.remove_obstacle(id).is_some());
        assert!(state.obstacle(id).is_none());
        assert!(state.touching.is_empty());
        assert!(state.remove_obstacle(id).is_none());
    }
}
