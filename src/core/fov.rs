//! Field-of-view sampling: one fan of rays per frame.
use crate::core::caster::{RayCastResult, RayCaster};
use crate::core::grid_map::GridMap;
use crate::core::player::Pose;
use crate::math::{UnitVec2, normalize_angle};

/// One cast ray, in left-to-right order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampledRay {
    pub index: usize,
    /// Offset from the facing angle, in `[-fov/2, fov/2]`.
    pub offset: f64,
    /// Absolute ray angle, normalized to `(-π, π]`.
    pub angle: f64,
    pub direction: UnitVec2,
    pub result: RayCastResult,
}

/// How many rays a frame casts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RayCount {
    Fixed(usize),
    /// One ray per screen column.
    PerColumn,
}

impl RayCount {
    pub fn resolve(self, columns: usize) -> usize {
        match self {
            RayCount::Fixed(n) => n,
            RayCount::PerColumn => columns,
        }
    }
}

/// Offset of ray `i` out of `n`, spanning the fov inclusively.
#[inline]
pub fn ray_offset(i: usize, n: usize, fov: f64) -> f64 {
    if n <= 1 {
        0.0
    } else {
        -fov * 0.5 + fov * (i as f64 / (n - 1) as f64)
    }
}

/// Casts `ray_count` rays from the pose across `fov` radians. Returns an empty
/// fan for zero rays or a non-positive fov.
pub fn sample(
    pose: &Pose,
    fov: f64,
    ray_count: usize,
    map: &GridMap,
    max_distance: f64,
    caster: &RayCaster,
) -> Vec<SampledRay> {
    if ray_count == 0 || !(fov > 0.0) || !fov.is_finite() {
        return Vec::new();
    }

    (0..ray_count)
        .map(|index| {
            let offset = ray_offset(index, ray_count, fov);
            let angle = normalize_angle(pose.angle + offset);
            let direction = UnitVec2::from_angle(pose.angle + offset);
            let result = caster.cast(pose.position, direction, map, max_distance);
            SampledRay {
                index,
                offset,
                angle,
                direction,
                result,
            }
        })
        .collect()
}
