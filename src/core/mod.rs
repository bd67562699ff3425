//! Core game types and logic (map, rays, movement).
//!
//! Re-exports:
//! - `grid_map`: Occupancy grid loading and solidity queries
//! - `caster`: Single-ray casting (fixed-step and DDA)
//! - `fov`: Field-of-view ray fans
//! - `player`: Pose, kinematics and wall collision

pub mod caster;
pub mod fov;
pub mod grid_map;
pub mod player;
