//! Game configuration, read from a TOML file. Every field has a default so a
//! missing file or a partial file both work.
use std::f64::consts::TAU;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::caster::{CastStrategy, RayCaster};
use crate::core::fov::RayCount;
use crate::core::player::KinematicsSettings;
use crate::error::{Error, Result};
use crate::render::projector::ProjectionSettings;

/// Which rendering path runs each frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViewMode {
    #[default]
    TopDown,
    FirstPerson,
}

impl ViewMode {
    pub fn toggle(self) -> Self {
        match self {
            ViewMode::TopDown => ViewMode::FirstPerson,
            ViewMode::FirstPerson => ViewMode::TopDown,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ViewMode::TopDown => "top-down",
            ViewMode::FirstPerson => "first-person",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub window: WindowConfig,
    pub map: MapConfig,
    pub view: ViewConfig,
    pub projection: ProjectionConfig,
    pub player: PlayerConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub target_fps: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1300,
            height: 900,
            title: "gridcast".to_string(),
            target_fps: 60,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub cell_size: f64,
    /// Text maze to load. Without one a random map is generated.
    pub path: Option<PathBuf>,
    pub random_width: usize,
    pub random_height: usize,
    pub density: f64,
    pub seed: Option<u64>,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            cell_size: 64.0,
            path: None,
            random_width: 16,
            random_height: 12,
            density: 0.18,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub mode: ViewMode,
    pub fov_degrees: f64,
    /// Rays per frame; unset means one per screen column.
    pub ray_count: Option<usize>,
    pub caster: CastStrategy,
    pub step_fraction: f64,
    pub max_distance: f64,
    /// Debug rays drawn in the top-down view.
    pub top_down_rays: usize,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            mode: ViewMode::TopDown,
            fov_degrees: 60.0,
            ray_count: None,
            caster: CastStrategy::Dda,
            step_fraction: 0.1,
            max_distance: 1000.0,
            top_down_rays: 25,
        }
    }
}

impl ViewConfig {
    pub fn fov(&self) -> f64 {
        self.fov_degrees.to_radians()
    }

    pub fn ray_count(&self) -> RayCount {
        match self.ray_count {
            Some(n) => RayCount::Fixed(n),
            None => RayCount::PerColumn,
        }
    }

    pub fn caster(&self) -> RayCaster {
        RayCaster::new(self.caster, self.step_fraction)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    pub wall_height: f64,
    pub projection_scale: f64,
    pub min_perpendicular: f64,
    pub min_shade: f64,
    pub max_shade: f64,
    pub shade_distance: f64,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        let p = ProjectionSettings::default();
        Self {
            wall_height: p.wall_height,
            projection_scale: p.projection_scale,
            min_perpendicular: p.min_perpendicular,
            min_shade: p.min_shade,
            max_shade: p.max_shade,
            shade_distance: p.shade_distance,
        }
    }
}

impl From<&ProjectionConfig> for ProjectionSettings {
    fn from(c: &ProjectionConfig) -> Self {
        ProjectionSettings {
            wall_height: c.wall_height,
            projection_scale: c.projection_scale,
            min_perpendicular: c.min_perpendicular,
            min_shade: c.min_shade,
            max_shade: c.max_shade,
            shade_distance: c.shade_distance,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub acceleration: f64,
    pub run_multiplier: f64,
    pub max_velocity: f64,
    pub deceleration: f64,
    pub stop_epsilon: f64,
    pub radius: f64,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        let k = KinematicsSettings::default();
        Self {
            acceleration: k.acceleration,
            run_multiplier: k.run_multiplier,
            max_velocity: k.max_velocity,
            deceleration: k.deceleration,
            stop_epsilon: k.stop_epsilon,
            radius: k.radius,
        }
    }
}

impl From<&PlayerConfig> for KinematicsSettings {
    fn from(c: &PlayerConfig) -> Self {
        KinematicsSettings {
            acceleration: c.acceleration,
            run_multiplier: c.run_multiplier,
            max_velocity: c.max_velocity,
            deceleration: c.deceleration,
            stop_epsilon: c.stop_epsilon,
            radius: c.radius,
        }
    }
}

fn positive(name: &str, v: f64) -> Result<()> {
    if v > 0.0 && v.is_finite() {
        Ok(())
    } else {
        Err(Error::InvalidConfig(format!("{name} must be positive, got {v}")))
    }
}

fn non_negative(name: &str, v: f64) -> Result<()> {
    if v >= 0.0 && v.is_finite() {
        Ok(())
    } else {
        Err(Error::InvalidConfig(format!("{name} must not be negative, got {v}")))
    }
}

impl GameConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let cfg: GameConfig = toml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let cfg = Self::from_toml_str(&text)?;
        info!(path = %path.display(), "config loaded");
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        positive("map.cell_size", self.map.cell_size)?;
        if !(0.0..=1.0).contains(&self.map.density) {
            return Err(Error::InvalidConfig(format!(
                "map.density must be within [0, 1], got {}",
                self.map.density
            )));
        }

        let fov = self.view.fov();
        if !(0.0..TAU).contains(&fov) {
            return Err(Error::InvalidConfig(format!(
                "view.fov_degrees must be within [0, 360), got {}",
                self.view.fov_degrees
            )));
        }
        positive("view.step_fraction", self.view.step_fraction)?;
        non_negative("view.max_distance", self.view.max_distance)?;

        let p = &self.projection;
        positive("projection.wall_height", p.wall_height)?;
        positive("projection.projection_scale", p.projection_scale)?;
        positive("projection.min_perpendicular", p.min_perpendicular)?;
        positive("projection.shade_distance", p.shade_distance)?;
        if !(0.0 <= p.min_shade && p.min_shade <= p.max_shade && p.max_shade <= 1.0) {
            return Err(Error::InvalidConfig(format!(
                "projection shade range [{}, {}] must sit inside [0, 1]",
                p.min_shade, p.max_shade
            )));
        }

        let k = &self.player;
        non_negative("player.acceleration", k.acceleration)?;
        positive("player.run_multiplier", k.run_multiplier)?;
        positive("player.max_velocity", k.max_velocity)?;
        non_negative("player.stop_epsilon", k.stop_epsilon)?;
        positive("player.radius", k.radius)?;
        // collision only tests the end of each frame's move
        if k.max_velocity >= 2.0 * k.radius {
            return Err(Error::InvalidConfig(format!(
                "player.max_velocity ({}) must stay below twice player.radius ({})",
                k.max_velocity, k.radius
            )));
        }
        if !(k.deceleration > 0.0 && k.deceleration < 1.0) {
            return Err(Error::InvalidConfig(format!(
                "player.deceleration must be within (0, 1), got {}",
                k.deceleration
            )));
        }
        Ok(())
    }
}
