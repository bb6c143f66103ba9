//! Obstacle spawner
//!
//! Each cycle fills the traffic lanes with hazards, sometimes swapping one
//! lane's hazard for a power-up, then clears out whatever has drifted away.

use std::ops::RangeInclusive;

use rand::Rng;

use super::state::{GameState, HazardSize, Obstacle, ObstacleKind};

/// Lanes that carry traffic (0 is the start, 8 the goal)
pub const TRAFFIC_LANES: RangeInclusive<usize> = 1..=7;
/// Lanes a power-up may appear on
pub const POWER_UP_LANES: RangeInclusive<usize> = 1..=6;

/// What one spawn cycle produced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpawnReport {
    pub power_up_lane: Option<usize>,
    pub hazard_lanes: Vec<usize>,
    pub culled: usize,
}

/// Run one spawn cycle
pub fn spawn_cycle(state: &mut GameState) -> SpawnReport {
    let mut report = SpawnReport::default();
    let offset = state.tuning.spawn_offset;

    if state.rng.random_bool(state.tuning.power_up_chance) {
        let lane_idx = state.rng.random_range(POWER_UP_LANES);
        if let Some(lane) = state.lanes.get(lane_idx).cloned() {
            let id = state.next_entity_id();
            state
                .obstacles
                .push(Obstacle::enter(id, ObstacleKind::PowerUp, &lane, offset));
            report.power_up_lane = Some(lane_idx);
        }
    }

    for lane_idx in TRAFFIC_LANES {
        if report.power_up_lane == Some(lane_idx) {
            continue;
        }
        let size = HazardSize::ALL[state.rng.random_range(0..HazardSize::ALL.len())];
        let Some(lane) = state.lanes.get(lane_idx).cloned() else {
            continue;
        };
        let id = state.next_entity_id();
        state
            .obstacles
            .push(Obstacle::enter(id, ObstacleKind::Hazard(size), &lane, offset));
        report.hazard_lanes.push(lane_idx);
    }

    report.culled = cull_offscreen(state);

    log::debug!(
        "Spawn cycle: power-up={:?} hazards={} culled={} live={}",
        report.power_up_lane,
        report.hazard_lanes.len(),
        report.culled,
        state.obstacles.len()
    );
    report
}

/// Remove obstacles more than the cull margin past either visible edge.
/// Returns how many were removed.
pub fn cull_offscreen(state: &mut GameState) -> usize {
    let margin = state.tuning.cull_margin;
    let before = state.obstacles.len();
    let gone: Vec<_> = state
        .obstacles
        .iter()
        .filter(|o| o.is_offscreen(margin))
        .map(|o| o.id)
        .collect();
    for id in gone {
        state.remove_obstacle(id);
    }
    before - state.obstacles.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::WORLD_HEIGHT;
    use crate::settings::Tuning;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn power_up_lane_never_gets_a_hazard(seed in any::<u64>()) {
            let mut state = GameState::new(seed, Tuning::default());
            for _ in 0..8 {
                let report = spawn_cycle(&mut state);
                if let Some(lane) = report.power_up_lane {
                    prop_assert!(POWER_UP_LANES.contains(&lane));
                    prop_assert!(!report.hazard_lanes.contains(&lane));
                    prop_assert_eq!(report.hazard_lanes.len(), 6);
                } else {
                    prop_assert_eq!(report.hazard_lanes.len(), 7);
                }
                for lane in &report.hazard_lanes {
                    prop_assert!(TRAFFIC_LANES.contains(lane));
                }
            }
        }
    }

    #[test]
    fn test_at_most_one_power_up_per_cycle() {
        let mut state = GameState::new(3, Tuning::default());
        for _ in 0..50 {
            let before = state.obstacles.iter().filter(|o| o.is_power_up()).count();
            spawn_cycle(&mut state);
            let after = state.obstacles.iter().filter(|o| o.is_power_up()).count();
            assert!(after <= before + 1);
        }
    }

    #[test]
    fn test_power_up_always_or_never() {
        let mut always = GameState::new(
            8,
            Tuning {
                power_up_chance: 1.0,
                ..Tuning::default()
            },
        );
        assert!(spawn_cycle(&mut always).power_up_lane.is_some());

        let mut never = GameState::new(
            8,
            Tuning {
                power_up_chance: 0.0,
                ..Tuning::default()
            },
        );
        let report = spawn_cycle(&mut never);
        assert_eq!(report.power_up_lane, None);
        assert_eq!(report.hazard_lanes, (1..=7).collect::<Vec<_>>());
    }

    #[test]
    fn test_spawned_entities_ride_their_lane() {
        let mut state = GameState::new(21, Tuning::default());
        spawn_cycle(&mut state);
        for o in &state.obstacles {
            let lane = state.lanes.get(o.lane).unwrap();
            assert_eq!(o.pos.x, lane.x);
            assert_eq!(o.pos.y, lane.entry_y(130.0));
            assert_eq!(o.vel.y, lane.signed_speed());
        }
    }

    #[test]
    fn test_cull_margin() {
        let mut state = GameState::new(21, Tuning::default());
        spawn_cycle(&mut state);
        let live = state.obstacles.len();
        assert_eq!(cull_offscreen(&mut state), 0);

        state.obstacles[0].pos.y = -151.0;
        state.obstacles[1].pos.y = WORLD_HEIGHT + 151.0;
        state.obstacles[2].pos.y = -149.0;
        assert_eq!(cull_offscreen(&mut state), 2);
        assert_eq!(state.obstacles.len(), live - 2);
    }
}
