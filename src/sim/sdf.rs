//! Signed distance functions for overlap tests
//!
//! Negative inside, zero on the surface, positive outside.

use glam::Vec2;

/// Signed distance to a circle
#[inline]
pub fn sd_circle(p: Vec2, center: Vec2, radius: f32) -> f32 {
    (p - center).length() - radius
}

/// Signed distance to an axis-aligned box with rounded corners
///
/// `half_extents` is the half size of the full box including the rounding.
pub fn sd_rounded_box(p: Vec2, center: Vec2, half_extents: Vec2, corner: f32) -> f32 {
    let corner = corner.min(half_extents.x).min(half_extents.y).max(0.0);
    let q = (p - center).abs() - half_extents + Vec2::splat(corner);
    q.max(Vec2::ZERO).length() + q.x.max(q.y).min(0.0) - corner
}

/// Whether a circle overlaps a shape given the shape's SDF at the circle center
#[inline]
pub fn circle_overlaps(sdf_at_center: f32, radius: f32) -> bool {
    sdf_at_center < radius
}
