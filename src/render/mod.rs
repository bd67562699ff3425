//! Rendering geometry, independent of any drawing backend.
//!
//! Re-exports:
//! - `projector`: Wall slice projection for the first-person view
//! - `top_down`: Line geometry for the overhead view

pub mod projector;
pub mod top_down;
