//! Overhead view geometry: map edges, the facing line and a few debug rays.
use crate::core::fov::SampledRay;
use crate::core::player::Pose;
use crate::math::{Segment, Vec2};

#[derive(Debug, Clone, PartialEq)]
pub struct TopDownFrame {
    pub edges: Vec<Segment>,
    pub facing: Segment,
    pub rays: Vec<Segment>,
    pub player: Vec2,
}

/// Facing line of `length` from the player.
pub fn facing_line(pose: &Pose, length: f64) -> Segment {
    Segment::new(pose.position, pose.position + Vec2::from_angle(pose.angle) * length)
}

/// Segment from the player to where each ray stopped.
pub fn ray_segments(pose: &Pose, rays: &[SampledRay]) -> Vec<Segment> {
    rays.iter()
        .map(|r| {
            let end = r
                .result
                .hit_point
                .unwrap_or_else(|| pose.position + r.direction.get() * r.result.distance);
            Segment::new(pose.position, end)
        })
        .collect()
}
