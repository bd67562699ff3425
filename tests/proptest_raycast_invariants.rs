//! Property-based invariant tests for the ray caster, the field-of-view
//! sampler and the wall projector.
//!
//! 1. Distance never exceeds the requested range
//! 2. A hit point lies on the ray, inside a solid cell
//! 3. Marching samples before the hit are all in open cells
//! 4. Rays starting inside a wall hit at distance 0
//! 5. The sampler returns exactly n rays, ordered, spanning the fov
//! 6. Projected slices are always finite

use std::f64::consts::PI;

use gridcast::core::caster::{CastStrategy, RayCaster};
use gridcast::core::fov::sample;
use gridcast::core::grid_map::GridMap;
use gridcast::core::player::Pose;
use gridcast::math::{UnitVec2, Vec2};
use gridcast::render::projector::{ProjectionSettings, Viewport, project};
use proptest::prelude::*;

// ── Strategies ──────────────────────────────────────────────────────────

const CELL: f64 = 64.0;

fn map_strategy() -> impl Strategy<Value = GridMap> {
    (3usize..10, 3usize..10)
        .prop_flat_map(|(w, h)| prop::collection::vec(prop::bool::weighted(0.3), w * h).prop_map(move |bits| (w, bits)))
        .prop_map(|(w, bits)| {
            let rows = bits
                .chunks(w)
                .map(|r| r.iter().map(|&b| u8::from(b)).collect())
                .collect();
            GridMap::from_rows(CELL, rows).unwrap()
        })
}

fn strategy_strategy() -> impl Strategy<Value = CastStrategy> {
    prop_oneof![Just(CastStrategy::Marching), Just(CastStrategy::Dda)]
}

fn origin_in(width: usize, height: usize) -> impl Strategy<Value = Vec2> {
    let w = width as f64 * CELL;
    let h = height as f64 * CELL;
    (0.0..w, 0.0..h).prop_map(|(x, y)| Vec2::new(x, y))
}

// ── Properties ──────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn distance_is_bounded_and_hits_are_valid(
        (map, origin) in map_strategy().prop_flat_map(|m| { let o = origin_in(m.width(), m.height()); (Just(m), o) }),
        angle in -PI..PI,
        max_distance in 0.0f64..1500.0,
        strategy in strategy_strategy(),
    ) {
        let caster = RayCaster::new(strategy, 0.1);
        let dir = UnitVec2::from_angle(angle);
        let r = caster.cast(origin, dir, &map, max_distance);

        prop_assert!(r.distance >= 0.0);
        prop_assert!(r.distance <= max_distance);
        prop_assert_eq!(r.hit, r.hit_point.is_some());
        prop_assert_eq!(r.hit, r.cell.is_some());

        if let (Some(p), Some((cx, cy))) = (r.hit_point, r.cell) {
            prop_assert!(map.is_solid(cx, cy));
            prop_assert!(map.is_solid_at(p), "{:?} hit point {:?} is not in a wall", strategy, p);
            prop_assert_eq!(map.cell_of(p), (cx, cy));
            let on_ray = origin + dir.get() * r.distance;
            prop_assert!(on_ray.distance(p) < 1e-6);
        } else {
            prop_assert_eq!(r.distance, max_distance);
        }
    }

    #[test]
    fn marching_samples_before_hit_are_open(
        (map, origin) in map_strategy().prop_flat_map(|m| { let o = origin_in(m.width(), m.height()); (Just(m), o) }),
        angle in -PI..PI,
    ) {
        let caster = RayCaster::marching(0.1);
        let dir = UnitVec2::from_angle(angle);
        let r = caster.cast(origin, dir, &map, 1200.0);
        if r.hit && r.distance > 0.0 {
            let p = r.hit_point.unwrap();
            prop_assert!(map.is_solid_at(p));
            let step = CELL * 0.1;
            let mut k = 1u64;
            while (k as f64) * step < r.distance - 1e-9 {
                let q = origin + dir.get() * (k as f64 * step);
                prop_assert!(!map.is_solid_at(q), "sample {} at {:?} is solid", k, q);
                k += 1;
            }
        }
    }

    #[test]
    fn origin_in_wall_hits_at_zero(
        cx in 0i64..3, cy in 0i64..3,
        fx in 0.01f64..0.99, fy in 0.01f64..0.99,
        angle in -PI..PI,
        strategy in strategy_strategy(),
    ) {
        let map = GridMap::from_rows(CELL, vec![vec![1; 3]; 3]).unwrap();
        let origin = Vec2::new((cx as f64 + fx) * CELL, (cy as f64 + fy) * CELL);
        let r = RayCaster::new(strategy, 0.1).cast(origin, UnitVec2::from_angle(angle), &map, 512.0);
        prop_assert!(r.hit);
        prop_assert_eq!(r.distance, 0.0);
    }

    #[test]
    fn sampler_count_and_order(
        angle in -PI..PI,
        fov in 0.01f64..3.0,
        n in 0usize..200,
    ) {
        let map = GridMap::parse(CELL, "#####\n#...#\n#...#\n#####").unwrap();
        let pose = Pose::new(Vec2::new(150.0, 100.0), angle);
        let rays = sample(&pose, fov, n, &map, 800.0, &RayCaster::dda());
        prop_assert_eq!(rays.len(), n);
        prop_assert!(rays.windows(2).all(|w| w[0].offset < w[1].offset));
        if n >= 2 {
            prop_assert!((rays[0].offset + fov / 2.0).abs() < 1e-9);
            prop_assert!((rays[n - 1].offset - fov / 2.0).abs() < 1e-9);
        }
        prop_assert!(rays.iter().all(|r| r.offset.abs() <= fov / 2.0 + 1e-9));
    }

    #[test]
    fn projected_slices_are_finite(
        (map, origin) in map_strategy().prop_flat_map(|m| { let o = origin_in(m.width(), m.height()); (Just(m), o) }),
        angle in -PI..PI,
        fov in 0.1f64..3.0,
        n in 1usize..64,
    ) {
        let pose = Pose::new(origin, angle);
        let rays = sample(&pose, fov, n, &map, 1000.0, &RayCaster::dda());
        let vp = Viewport::new(800.0, 600.0);
        let settings = ProjectionSettings::default();
        let slices = project(&rays, fov, vp, &settings);
        prop_assert_eq!(slices.len(), n);
        for s in &slices {
            prop_assert!(s.top.is_finite() && s.bottom.is_finite());
            prop_assert!(s.top <= s.bottom);
            prop_assert!(s.screen_x >= 0.0 && s.screen_x < vp.width);
            prop_assert!(s.shade >= settings.min_shade && s.shade <= settings.max_shade);
        }
        prop_assert!(slices.windows(2).all(|w| w[0].screen_x <= w[1].screen_x));
    }
}
