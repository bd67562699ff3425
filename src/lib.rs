//! Grid raycaster: a player moving on a tile map, viewed either from above or
//! as a projected first-person scene.
//!
//! Per frame the host feeds an [`InputState`] to [`Game::tick`], then asks
//! [`Game::frame`] for something to draw. The library itself never touches a
//! window; the raylib adapter lives in `host` behind the `host` feature.

pub mod config;
pub mod core;
pub mod error;
pub mod game;
pub mod math;
pub mod render;

#[cfg(feature = "host")]
pub mod host;

pub use config::{GameConfig, ViewMode};
pub use error::{Error, Result};
pub use game::{Frame, Game, InputState};
