//! Contact detection and resolution
//!
//! Detection reports overlap *begin* events only: a pair that keeps touching
//! across frames fires once. Resolution looks at the two category
//! identifiers; the smaller one is the reference body.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::player::reset_player;
use super::schedule::Job;
use super::sdf::{circle_overlaps, sd_circle, sd_rounded_box};
use super::state::{EntityId, GameEvent, GameState, ObstacleKind, ResetCause};
use crate::audio::SoundEffect;
use crate::consts::*;
use crate::secs_to_ticks;
use glam::Vec2;

/// Collision categories (bit flags)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u32)]
pub enum Category {
    Player = 1 << 0,
    Obstacle = 1 << 1,
    Target = 1 << 2,
    PowerUp = 1 << 3,
}

impl Category {
    #[inline]
    pub fn bits(self) -> u32 {
        self as u32
    }
}

/// One side of a contact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Body {
    pub category: Category,
    pub id: EntityId,
}

impl Body {
    pub fn new(category: Category, id: EntityId) -> Self {
        Self { category, id }
    }
}

/// Two bodies that started overlapping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub a: Body,
    pub b: Body,
}

impl Contact {
    pub fn new(a: Body, b: Body) -> Self {
        Self { a, b }
    }

    /// (reference, other): the body with the smaller category id comes first
    pub fn ordered(&self) -> (Body, Body) {
        if self.a.category.bits() < self.b.category.bits() {
            (self.a, self.b)
        } else {
            (self.b, self.a)
        }
    }
}

/// Who finds contacts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ContactSource {
    /// Built-in shape tests every tick
    #[default]
    Builtin,
    /// The host engine reports contacts through the session
    External,
}

/// Outcome of resolving one contact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    HitHazard,
    Crossing,
    PickedUp,
    /// Not a player contact, stale ids, or the power-up is already gone
    Ignored,
}

/// Signed distance from the player center to an obstacle's surface
fn obstacle_distance(player_pos: Vec2, kind: ObstacleKind, pos: Vec2) -> f32 {
    match kind {
        ObstacleKind::Hazard(size) => {
            let half = Vec2::new(HAZARD_WIDTH / 2.0, size.length() / 2.0);
            sd_rounded_box(player_pos, pos + Vec2::new(0.0, half.y), half, HAZARD_CORNER)
        }
        ObstacleKind::PowerUp => sd_circle(player_pos, pos, POWER_UP_RADIUS),
    }
}

/// Find pairs that started overlapping this tick and remember the current set
pub fn detect_contacts(state: &mut GameState) -> Vec<Contact> {
    let player = &state.player;
    let player_body = Body::new(Category::Player, player.id);
    let mut current = BTreeSet::new();
    let mut began = Vec::new();

    for obstacle in &state.obstacles {
        let d = obstacle_distance(player.pos, obstacle.kind, obstacle.pos);
        if circle_overlaps(d, player.radius) {
            current.insert((player.id, obstacle.id));
            if !state.touching.contains(&(player.id, obstacle.id)) {
                began.push(Contact::new(
                    player_body,
                    Body::new(obstacle.category(), obstacle.id),
                ));
            }
        }
    }

    let target = &state.target;
    if circle_overlaps(sd_circle(player.pos, target.pos, target.radius), player.radius) {
        current.insert((player.id, target.id));
        if !state.touching.contains(&(player.id, target.id)) {
            // Engine order is arbitrary; resolution must not care
            began.push(Contact::new(
                Body::new(Category::Target, target.id),
                player_body,
            ));
        }
    }

    state.touching = current;
    began
}

/// Apply the gameplay effect of one contact
pub fn resolve_contact(state: &mut GameState, contact: Contact) -> Resolution {
    let (reference, other) = contact.ordered();
    if reference.category != Category::Player || reference.id != state.player.id {
        return Resolution::Ignored;
    }

    match other.category {
        Category::Obstacle => {
            match state.obstacle(other.id) {
                Some(o) if !o.is_power_up() => {}
                _ => return Resolution::Ignored,
            }
            log::debug!("Hazard {} hit on lane {}", other.id, state.player.lane);
            state.emit(GameEvent::Sound(SoundEffect::Fail));
            reset_player(state, ResetCause::Hazard);
            Resolution::HitHazard
        }
        Category::Target => {
            if other.id != state.target.id {
                return Resolution::Ignored;
            }
            begin_crossing(state);
            Resolution::Crossing
        }
        Category::PowerUp => {
            match state.obstacle(other.id) {
                Some(o) if o.is_power_up() => {}
                _ => return Resolution::Ignored,
            }
            state.remove_obstacle(other.id);
            state.emit(GameEvent::Sound(SoundEffect::PowerUp));
            state.emit(GameEvent::PowerUpCollected { id: other.id });
            let display = state.clock.extend(state.tuning.power_up_bonus);
            state.emit(GameEvent::TimeChanged(display));
            log::debug!("Power-up {} collected, {}s left", other.id, display.seconds);
            Resolution::PickedUp
        }
        Category::Player => Resolution::Ignored,
    }
}

/// Score the crossing, attach the celebration and schedule the return to start
fn begin_crossing(state: &mut GameState) {
    state.score += 1;
    state.emit(GameEvent::ScoreChanged(state.score));
    state.emit(GameEvent::Sound(SoundEffect::LevelUp));

    let player = state.player.id;
    state.crossing_effect = Some(player);
    state.emit(GameEvent::EffectAttached { player });

    let delay = secs_to_ticks(state.tuning.crossing_delay);
    state
        .scheduler
        .schedule_once(Job::FinishCrossing, state.time_ticks, delay);
    log::info!("Crossing complete, score {}", state.score);
}

/// Scheduled follow-up of a crossing
pub fn finish_crossing(state: &mut GameState) {
    if state.crossing_effect.take().is_some() {
        state.emit(GameEvent::EffectDetached);
    }
    reset_player(state, ResetCause::Crossing);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Tuning;
    use crate::sim::state::{HazardSize, Obstacle};

    fn state() -> GameState {
        let mut state = GameState::new(11, Tuning::default());
        state.drain_events();
        state
    }

    /// Put an obstacle right on top of the player
    fn place(state: &mut GameState, kind: ObstacleKind) -> EntityId {
        let id = state.next_entity_id();
        let lane = state.lanes.get(1).unwrap().clone();
        let mut o = Obstacle::enter(id, kind, &lane, 0.0);
        o.pos = match kind {
            ObstacleKind::Hazard(size) => state.player.pos - Vec2::new(0.0, size.length() / 2.0),
            ObstacleKind::PowerUp => state.player.pos,
        };
        state.obstacles.push(o);
        id
    }

    fn player_body(state: &GameState) -> Body {
        Body::new(Category::Player, state.player.id)
    }

    #[test]
    fn test_ordered_picks_smaller_category() {
        let p = Body::new(Category::Player, 1);
        let t = Body::new(Category::Target, 2);
        assert_eq!(Contact::new(t, p).ordered(), (p, t));
        assert_eq!(Contact::new(p, t).ordered(), (p, t));
    }

    #[test]
    fn test_hazard_resets_from_any_lane() {
        let mut state = state();
        state.player.lane = 6;
        let hazard = place(&mut state, ObstacleKind::Hazard(HazardSize::Medium));
        let old = state.player.id;

        let contact = Contact::new(Body::new(Category::Obstacle, hazard), player_body(&state));
        assert_eq!(resolve_contact(&mut state, contact), Resolution::HitHazard);

        assert_eq!(state.player.lane, 0);
        assert_ne!(state.player.id, old);
        let events = state.drain_events();
        assert_eq!(events[0], GameEvent::Sound(SoundEffect::Fail));
        assert!(events.contains(&GameEvent::PlayerReset {
            cause: ResetCause::Hazard
        }));
    }

    #[test]
    fn test_power_up_adds_time_and_disappears() {
        let mut state = state();
        let id = place(&mut state, ObstacleKind::PowerUp);
        let before = state.clock.remaining();

        let contacts = detect_contacts(&mut state);
        assert_eq!(contacts.len(), 1);
        assert_eq!(resolve_contact(&mut state, contacts[0]), Resolution::PickedUp);

        assert_eq!(state.clock.remaining(), before + 5);
        assert!(state.obstacle(id).is_none());
        assert!(detect_contacts(&mut state).is_empty());
        assert!(!state.touching.iter().any(|&(_, o)| o == id));

        // A duplicate report of the same pickup does nothing
        assert_eq!(resolve_contact(&mut state, contacts[0]), Resolution::Ignored);
        assert_eq!(state.clock.remaining(), before + 5);
    }

    #[test]
    fn test_target_scores_once_and_schedules_reset() {
        let mut state = state();
        state.player.pos = state.target.pos;
        state.player.lane = LAST_LANE;

        let contacts = detect_contacts(&mut state);
        assert_eq!(contacts.len(), 1);
        assert_eq!(resolve_contact(&mut state, contacts[0]), Resolution::Crossing);
        assert_eq!(state.score, 1);
        assert_eq!(state.crossing_effect, Some(state.player.id));
        assert!(state.scheduler.is_pending(Job::FinishCrossing));
        // Still on the target: no new contact
        assert!(detect_contacts(&mut state).is_empty());

        finish_crossing(&mut state);
        assert_eq!(state.player.lane, 0);
        assert!(state.crossing_effect.is_none());
        assert!(state.drain_events().contains(&GameEvent::EffectDetached));
    }

    #[test]
    fn test_overlap_begins_once() {
        let mut state = state();
        place(&mut state, ObstacleKind::Hazard(HazardSize::Small));
        assert_eq!(detect_contacts(&mut state).len(), 1);
        assert!(detect_contacts(&mut state).is_empty());
    }

    #[test]
    fn test_no_contact_when_apart() {
        let mut state = state();
        let id = place(&mut state, ObstacleKind::Hazard(HazardSize::Large));
        let idx = state.obstacles.iter().position(|o| o.id == id).unwrap();
        state.obstacles[idx].pos.x += HAZARD_WIDTH / 2.0 + PLAYER_RADIUS + 1.0;
        assert!(detect_contacts(&mut state).is_empty());
    }

    #[test]
    fn test_stale_and_foreign_pairs_ignored() {
        let mut state = state();
        let hazard = place(&mut state, ObstacleKind::Hazard(HazardSize::Small));

        let stale = Contact::new(
            Body::new(Category::Player, state.player.id + 100),
            Body::new(Category::Obstacle, hazard),
        );
        assert_eq!(resolve_contact(&mut state, stale), Resolution::Ignored);

        let foreign = Contact::new(
            Body::new(Category::Obstacle, hazard),
            Body::new(Category::PowerUp, 77),
        );
        assert_eq!(resolve_contact(&mut state, foreign), Resolution::Ignored);
        assert_eq!(state.player.lane, 0);
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_power_up_reported_as_hazard_is_ignored() {
        let mut state = state();
        let power_up = place(&mut state, ObstacleKind::PowerUp);
        state.player.lane = 4;
        let player = state.player.id;

        let mislabelled = Contact::new(
            Body::new(Category::Player, player),
            Body::new(Category::Obstacle, power_up),
        );
        assert_eq!(resolve_contact(&mut state, mislabelled), Resolution::Ignored);
        assert_eq!(state.player.id, player);
        assert_eq!(state.player.lane, 4);
        assert!(state.obstacle(power_up).is_some());
        assert!(state.events.is_empty());
    }
}
