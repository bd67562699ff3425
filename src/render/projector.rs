//! Turns sampled rays into screen-space wall slices.
//!
//! The raw distance is corrected to a perpendicular one (`d * cos δ`) before
//! projecting, which removes the fish-eye bulge. Shade uses the raw distance.
use crate::core::fov::SampledRay;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionSettings {
    /// World height of a wall; one cell by default.
    pub wall_height: f64,
    /// Multiplier on the viewport half-height.
    pub projection_scale: f64,
    /// Perpendicular distances are clamped up to this.
    pub min_perpendicular: f64,
    pub min_shade: f64,
    pub max_shade: f64,
    /// Raw distance at which shade would reach 0 before clamping.
    pub shade_distance: f64,
}

impl Default for ProjectionSettings {
    fn default() -> Self {
        Self {
            wall_height: 64.0,
            projection_scale: 1.0,
            min_perpendicular: 1.0,
            min_shade: 0.1,
            max_shade: 1.0,
            shade_distance: 510.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallSlice {
    pub screen_x: f64,
    pub width: f64,
    pub top: f64,
    pub bottom: f64,
    /// 1 is brightest, 0 darkest.
    pub shade: f64,
    pub distance: f64,
    /// False when the ray reached max range without a wall.
    pub hit: bool,
}

/// `d * cos δ`, clamped below by `min`.
#[inline]
pub fn perpendicular_distance(distance: f64, offset: f64, min: f64) -> f64 {
    let perp = distance * offset.cos();
    if perp.is_finite() { perp.max(min) } else { min }
}

pub fn shade_for(distance: f64, settings: &ProjectionSettings) -> f64 {
    let falloff = if settings.shade_distance > 0.0 {
        1.0 - distance / settings.shade_distance
    } else {
        0.0
    };
    let (lo, hi) = if settings.min_shade <= settings.max_shade {
        (settings.min_shade, settings.max_shade)
    } else {
        (settings.max_shade, settings.min_shade)
    };
    if falloff.is_nan() {
        return lo;
    }
    // f64::clamp panics on NaN bounds
    falloff.max(lo).min(hi)
}

/// One slice per ray, in the same left-to-right order.
pub fn project(rays: &[SampledRay], fov: f64, viewport: Viewport, settings: &ProjectionSettings) -> Vec<WallSlice> {
    if rays.is_empty() {
        return Vec::new();
    }

    let column_width = viewport.width / rays.len() as f64;
    let mid = viewport.height * 0.5;
    let projection = mid * settings.projection_scale;
    let span = (viewport.width - column_width).max(0.0);
    let min_perp = settings.min_perpendicular.max(f64::MIN_POSITIVE);

    rays.iter()
        .map(|ray| {
            let perp = perpendicular_distance(ray.result.distance, ray.offset, min_perp);
            let height = settings.wall_height / perp * projection;

            let t = if fov > 0.0 {
                ((ray.offset + fov * 0.5) / fov).clamp(0.0, 1.0)
            } else {
                0.5
            };

            WallSlice {
                screen_x: t * span,
                width: column_width,
                top: mid - height * 0.5,
                bottom: mid + height * 0.5,
                shade: shade_for(ray.result.distance, settings),
                distance: ray.result.distance,
                hit: ray.result.hit,
            }
        })
        .collect()
}
