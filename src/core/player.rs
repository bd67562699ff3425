//! Player pose and movement integration.
//!
//! Velocity is in world units per frame. Facing is driven by the pointer,
//! never by velocity.
use tracing::debug;

use crate::config::ViewMode;
use crate::math::{Segment, Vec2, normalize_angle};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Vec2,
    /// Facing in `(-π, π]`.
    pub angle: f64,
    pub velocity: Vec2,
}

impl Pose {
    pub fn new(position: Vec2, angle: f64) -> Self {
        Self {
            position,
            angle: normalize_angle(angle),
            velocity: Vec2::ZERO,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KinematicsSettings {
    /// Acceleration added per frame for each held direction.
    pub acceleration: f64,
    pub run_multiplier: f64,
    /// Must stay below `2 * radius`: collision is only tested where a frame's
    /// move ends, so a faster body can pass through a wall.
    pub max_velocity: f64,
    /// Multiplier in (0,1) applied on each deceleration.
    pub deceleration: f64,
    /// Speeds below this snap to zero.
    pub stop_epsilon: f64,
    pub radius: f64,
}

impl Default for KinematicsSettings {
    fn default() -> Self {
        Self {
            acceleration: 0.6,
            run_multiplier: 1.8,
            max_velocity: 4.0,
            deceleration: 0.88,
            stop_epsilon: 0.01,
            radius: 12.0,
        }
    }
}

/// Directional intents for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MoveIntent {
    pub forward: bool,
    pub backward: bool,
    pub strafe_left: bool,
    pub strafe_right: bool,
    pub running: bool,
}

impl MoveIntent {
    pub fn any_direction(&self) -> bool {
        self.forward || self.backward || self.strafe_left || self.strafe_right
    }

    /// Acceleration relative to `facing`. Screen coordinates: y grows down, so
    /// the left-hand side of `(cos θ, sin θ)` is `(sin θ, -cos θ)`.
    pub fn acceleration(&self, facing: f64, settings: &KinematicsSettings) -> Vec2 {
        let mut magnitude = settings.acceleration;
        if self.running {
            magnitude *= settings.run_multiplier;
        }
        let (sin, cos) = facing.sin_cos();
        let ahead = Vec2::new(cos, sin);
        let left = Vec2::new(sin, -cos);

        let mut accel = Vec2::ZERO;
        if self.forward {
            accel += ahead * magnitude;
        }
        if self.backward {
            accel += -ahead * magnitude;
        }
        if self.strafe_left {
            accel += left * magnitude;
        }
        if self.strafe_right {
            accel += -left * magnitude;
        }
        accel
    }
}

/// Facing from the pointer. First-person view flips the y axis.
pub fn facing_from_pointer(position: Vec2, pointer: Vec2, mode: ViewMode) -> f64 {
    let d = pointer - position;
    let dy = match mode {
        ViewMode::TopDown => d.y,
        ViewMode::FirstPerson => -d.y,
    };
    dy.atan2(d.x)
}

/// Does a circle of `radius` at `point` touch `seg`?
pub fn circle_hits_segment(point: Vec2, radius: f64, seg: &Segment) -> bool {
    let line = seg.end - seg.start;
    let rel = point - seg.start;
    let len_sq = line.dot(line);
    let t = if len_sq > 0.0 {
        (rel.dot(line) / len_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let closest = seg.start + line * t;
    point.distance(closest) <= radius
}

pub fn collides(point: Vec2, radius: f64, edges: &[Segment]) -> bool {
    edges.iter().any(|e| circle_hits_segment(point, radius, e))
}

/// Direction of `v` even when its length overflows.
fn overflow_direction(v: Vec2) -> Option<Vec2> {
    let m = v.x.abs().max(v.y.abs());
    let scaled = if m.is_infinite() {
        let unit = |c: f64| if c.is_infinite() { c.signum() } else { 0.0 };
        Vec2::new(unit(v.x), unit(v.y))
    } else {
        v * (1.0 / m)
    };
    scaled.try_normalize()
}

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub pose: Pose,
    pub previous_position: Vec2,
    pub settings: KinematicsSettings,
    pub running: bool,
}

impl Player {
    pub fn new(position: Vec2, angle: f64, settings: KinematicsSettings) -> Self {
        Self {
            pose: Pose::new(position, angle),
            previous_position: position,
            settings,
            running: false,
        }
    }

    /// Adds `accel` and caps the speed at `max_velocity`, keeping direction.
    pub fn apply_acceleration(&mut self, accel: Vec2) {
        let v = self.pose.velocity + accel;
        let max = self.settings.max_velocity;
        let speed = v.length();
        self.pose.velocity = if !speed.is_finite() {
            overflow_direction(v).map(|dir| dir * max).unwrap_or(Vec2::ZERO)
        } else if speed > max {
            Vec2::new(v.x / speed * max, v.y / speed * max)
        } else {
            v
        };
    }

    pub fn apply_deceleration(&mut self) {
        let v = self.pose.velocity * self.settings.deceleration;
        self.pose.velocity = if v.length() < self.settings.stop_epsilon {
            Vec2::ZERO
        } else {
            v
        };
    }

    /// One frame of movement. Order: intents, idle decel, accel, decel,
    /// remember position, integrate, roll back on wall contact, face pointer.
    pub fn step(&mut self, intent: &MoveIntent, pointer: Vec2, mode: ViewMode, edges: &[Segment]) {
        let accel = intent.acceleration(self.pose.angle, &self.settings);
        self.running = intent.running;

        if !intent.any_direction() {
            self.apply_deceleration();
        }
        self.apply_acceleration(accel);
        self.apply_deceleration();

        self.previous_position = self.pose.position;
        if self.pose.velocity.length() > 0.0 {
            self.pose.position += self.pose.velocity;
            if collides(self.pose.position, self.settings.radius, edges) {
                debug!(
                    x = self.pose.position.x,
                    y = self.pose.position.y,
                    "wall contact, rolling back"
                );
                self.pose.position = self.previous_position;
            }
        }

        self.pose.angle = facing_from_pointer(self.pose.position, pointer, mode);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    fn player() -> Player {
        Player::new(Vec2::new(96.0, 96.0), 0.0, KinematicsSettings::default())
    }

    #[test]
    fn acceleration_rescales_to_max_velocity() {
        let mut p = player();
        p.settings.max_velocity = 3.0;
        p.pose.velocity = Vec2::new(10.0, 0.0);
        p.apply_acceleration(Vec2::ZERO);
        assert_eq!(p.pose.velocity, Vec2::new(3.0, 0.0));
    }

    #[test]
    fn huge_acceleration_is_capped() {
        let mut p = player();
        p.apply_acceleration(Vec2::new(f64::MAX, f64::MAX));
        let speed = p.pose.velocity.length();
        assert!(speed <= p.settings.max_velocity + 1e-9);
        assert!(speed > 0.0);
    }

    #[test]
    fn deceleration_snaps_to_zero() {
        let mut p = player();
        p.pose.velocity = Vec2::new(0.01, 0.0);
        p.apply_deceleration();
        assert_eq!(p.pose.velocity, Vec2::ZERO);
        p.apply_deceleration();
        assert_eq!(p.pose.velocity, Vec2::ZERO);
    }

    #[test]
    fn forward_intent_moves_along_facing() {
        let mut p = player();
        let intent = MoveIntent {
            forward: true,
            ..MoveIntent::default()
        };
        // pointer straight ahead keeps facing at 0
        p.step(&intent, Vec2::new(500.0, 96.0), ViewMode::TopDown, &[]);
        assert!(p.pose.position.x > 96.0);
        assert_eq!(p.pose.position.y, 96.0);
        assert_eq!(p.previous_position, Vec2::new(96.0, 96.0));
    }

    #[test]
    fn running_moves_faster() {
        let intent = MoveIntent {
            forward: true,
            ..MoveIntent::default()
        };
        let mut walk = player();
        walk.step(&intent, Vec2::new(500.0, 96.0), ViewMode::TopDown, &[]);
        let mut run = player();
        run.step(
            &MoveIntent {
                running: true,
                ..intent
            },
            Vec2::new(500.0, 96.0),
            ViewMode::TopDown,
            &[],
        );
        assert!(run.pose.velocity.length() > walk.pose.velocity.length());
        assert!(run.running);
    }

    #[test]
    fn strafe_left_is_up_the_screen_when_facing_east() {
        let a = MoveIntent {
            strafe_left: true,
            ..MoveIntent::default()
        }
        .acceleration(0.0, &KinematicsSettings::default());
        assert!(a.y < 0.0);
        assert!(a.x.abs() < 1e-12);
    }

    #[test]
    fn wall_contact_rolls_back_and_keeps_velocity() {
        let mut p = player();
        p.pose.velocity = Vec2::new(3.0, 0.0);
        let wall = [Segment::new(Vec2::new(100.0, 0.0), Vec2::new(100.0, 200.0))];
        let intent = MoveIntent {
            forward: true,
            ..MoveIntent::default()
        };
        p.step(&intent, Vec2::new(500.0, 96.0), ViewMode::TopDown, &wall);
        assert_eq!(p.pose.position, Vec2::new(96.0, 96.0));
        assert!(p.pose.velocity.x > 0.0);
    }

    #[test]
    fn facing_flips_y_in_first_person() {
        let pos = Vec2::new(0.0, 0.0);
        let pointer = Vec2::new(0.0, 10.0);
        assert!((facing_from_pointer(pos, pointer, ViewMode::TopDown) - FRAC_PI_2).abs() < 1e-12);
        assert!((facing_from_pointer(pos, pointer, ViewMode::FirstPerson) + FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn circle_segment_contact() {
        let seg = Segment::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0));
        assert!(circle_hits_segment(Vec2::new(5.0, 2.0), 2.0, &seg));
        assert!(!circle_hits_segment(Vec2::new(5.0, 2.1), 2.0, &seg));
        // beyond the end, measured to the endpoint
        assert!(!circle_hits_segment(Vec2::new(12.0, 1.0), 2.0, &seg));
        assert!(circle_hits_segment(Vec2::new(11.0, 1.0), 2.0, &seg));
    }
}
