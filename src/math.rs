//! Small 2D vector helpers shared by the core and the renderer.
//!
//! World space uses screen orientation: x grows right, y grows down, so an
//! angle of `+π/2` points down the screen.
use std::f64::consts::PI;

pub use glam::DVec2 as Vec2;

use crate::error::{Error, Result};

/// Tolerance used when checking that a direction is normalized.
pub const UNIT_TOLERANCE: f64 = 1e-6;

/// A direction known to have length 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitVec2(Vec2);

impl UnitVec2 {
    /// Accepts `v` only if it is already normalized. Callers normalize first.
    pub fn new(v: Vec2) -> Result<Self> {
        let length = v.length();
        if (length - 1.0).abs() <= UNIT_TOLERANCE {
            Ok(Self(v))
        } else {
            Err(Error::NonUnitDirection { length })
        }
    }

    #[inline]
    pub fn from_angle(a: f64) -> Self {
        Self(Vec2::from_angle(a))
    }

    #[inline]
    pub fn get(self) -> Vec2 {
        self.0
    }
}

/// A world-space line segment (map edge, facing line, debug ray).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Vec2,
    pub end: Vec2,
}

impl Segment {
    #[inline]
    pub const fn new(start: Vec2, end: Vec2) -> Self {
        Self { start, end }
    }
}

/// Folds an angle into `(-π, π]`.
pub fn normalize_angle(a: f64) -> f64 {
    if !a.is_finite() {
        return 0.0;
    }
    let mut r = a % (2.0 * PI);
    if r > PI {
        r -= 2.0 * PI;
    }
    if r <= -PI {
        r += 2.0 * PI;
    }
    r
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_vec_rejects_zero_and_long_vectors() {
        assert!(matches!(
            UnitVec2::new(Vec2::ZERO),
            Err(Error::NonUnitDirection { .. })
        ));
        assert!(UnitVec2::new(Vec2::new(3.0, 4.0)).is_err());
        assert!(UnitVec2::new(Vec2::new(0.6, 0.8)).is_ok());
    }

    #[test]
    fn try_normalize_handles_zero() {
        assert_eq!(Vec2::ZERO.try_normalize(), None);
        let n = Vec2::new(3.0, 4.0).try_normalize().unwrap();
        assert!((n.length() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn normalize_angle_range() {
        assert!((normalize_angle(2.5 * PI) - 0.5 * PI).abs() < 1e-12);
        assert!((normalize_angle(-PI) - PI).abs() < 1e-12);
        assert!((normalize_angle(0.5) - 0.5).abs() < 1e-12);
        assert!((normalize_angle(-2.5 * PI) + 0.5 * PI).abs() < 1e-12);
    }
}
