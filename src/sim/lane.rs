//! Lane registry
//!
//! Nine vertical tracks spread along x. Lane 0 is the start, lane 8 is the
//! goal lane; traffic runs on the lanes in between.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::{LANE_COUNT, WORLD_HEIGHT};
use crate::lane_x;

/// Which way traffic flows along a lane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TravelDirection {
    /// Toward increasing y (entities enter below the visible area)
    #[default]
    TowardEnd,
    /// Toward decreasing y (entities enter above the visible area)
    TowardStart,
}

impl TravelDirection {
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            TravelDirection::TowardEnd => 1.0,
            TravelDirection::TowardStart => -1.0,
        }
    }
}

/// A single track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lane {
    pub index: usize,
    /// Centerline x
    pub x: f32,
    pub direction: TravelDirection,
    /// Unsigned speed (units/s)
    pub speed: f32,
}

impl Lane {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            x: lane_x(index),
            direction: TravelDirection::default(),
            speed: 0.0,
        }
    }

    /// Velocity along y for anything riding this lane
    #[inline]
    pub fn signed_speed(&self) -> f32 {
        self.direction.sign() * self.speed
    }

    /// y where a new entity appears, just outside the side traffic comes from
    pub fn entry_y(&self, offset: f32) -> f32 {
        match self.direction {
            TravelDirection::TowardEnd => -offset,
            TravelDirection::TowardStart => WORLD_HEIGHT + offset,
        }
    }
}

/// Ordered set of lanes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaneRegistry {
    lanes: Vec<Lane>,
}

impl LaneRegistry {
    /// Lay out all lanes with no traffic assigned yet
    pub fn new() -> Self {
        Self {
            lanes: (0..LANE_COUNT).map(Lane::new).collect(),
        }
    }

    /// Give every lane a random direction and speed tier. Called once at game start.
    pub fn assign_traffic<R: Rng>(&mut self, rng: &mut R, tiers: &[f32; 3]) {
        for lane in &mut self.lanes {
            lane.speed = tiers[rng.random_range(0..tiers.len())];
            lane.direction = if rng.random_bool(0.5) {
                TravelDirection::TowardEnd
            } else {
                TravelDirection::TowardStart
            };
        }
        log::debug!(
            "Lane traffic: {:?}",
            self.lanes
                .iter()
                .map(|l| l.signed_speed())
                .collect::<Vec<_>>()
        );
    }

    pub fn get(&self, index: usize) -> Option<&Lane> {
        self.lanes.get(index)
    }

    pub fn len(&self) -> usize {
        self.lanes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lanes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Lane> {
        self.lanes.iter()
    }
}

impl Default for LaneRegistry {
    fn default() -> Self {
        Self::new()
    }
}
