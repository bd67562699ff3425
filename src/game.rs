//! Owned per-run game state and the per-frame entry points the host calls.
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;

use crate::config::{GameConfig, ViewMode};
use crate::core::caster::RayCaster;
use crate::core::fov::{RayCount, sample};
use crate::core::grid_map::GridMap;
use crate::core::player::{KinematicsSettings, MoveIntent, Player};
use crate::error::Result;
use crate::math::{Segment, Vec2};
use crate::render::projector::{ProjectionSettings, Viewport, WallSlice, project};
use crate::render::top_down::{TopDownFrame, facing_line, ray_segments};

/// Snapshot of the input collaborator for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InputState {
    pub forward: bool,
    pub backward: bool,
    pub strafe_left: bool,
    pub strafe_right: bool,
    pub run: bool,
    pub toggle_view: bool,
    /// Pointer in world coordinates.
    pub pointer: Vec2,
}

impl InputState {
    pub fn intent(&self) -> MoveIntent {
        MoveIntent {
            forward: self.forward,
            backward: self.backward,
            strafe_left: self.strafe_left,
            strafe_right: self.strafe_right,
            running: self.run,
        }
    }
}

/// What the renderer should draw this frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    TopDown(TopDownFrame),
    FirstPerson(Vec<WallSlice>),
}

pub struct Game {
    pub map: GridMap,
    /// Boundary edges of `map`, computed once since the map never changes.
    pub edges: Vec<Segment>,
    pub player: Player,
    pub view_mode: ViewMode,
    fov: f64,
    ray_count: RayCount,
    max_distance: f64,
    top_down_rays: usize,
    caster: RayCaster,
    projection: ProjectionSettings,
}

impl Game {
    /// Builds the game from config: loads the configured map, or generates a
    /// random one when no path is set.
    pub fn from_config(config: &GameConfig) -> Result<Self> {
        config.validate()?;
        let m = &config.map;
        let map = match &m.path {
            Some(path) => GridMap::load(path, m.cell_size)?,
            None => {
                let mut rng = match m.seed {
                    Some(seed) => StdRng::seed_from_u64(seed),
                    None => StdRng::from_entropy(),
                };
                let map = GridMap::random(m.random_width, m.random_height, m.cell_size, m.density, &mut rng)?;
                info!(
                    width = map.width(),
                    height = map.height(),
                    seed = ?m.seed,
                    "generated random map"
                );
                map
            }
        };
        Ok(Self::new(map, config))
    }

    /// Player spawns at the centre of cell (1,1), facing right.
    pub fn new(map: GridMap, config: &GameConfig) -> Self {
        let edges = map.boundary_edges();
        let spawn = map.cell_center(1, 1);
        let player = Player::new(spawn, 0.0, KinematicsSettings::from(&config.player));
        Self {
            map,
            edges,
            player,
            view_mode: config.view.mode,
            fov: config.view.fov(),
            ray_count: config.view.ray_count(),
            max_distance: config.view.max_distance,
            top_down_rays: config.view.top_down_rays,
            caster: config.view.caster(),
            projection: ProjectionSettings::from(&config.projection),
        }
    }

    pub fn fov(&self) -> f64 {
        self.fov
    }

    pub fn toggle_view(&mut self) -> ViewMode {
        self.view_mode = self.view_mode.toggle();
        info!(mode = self.view_mode.label(), "view mode changed");
        self.view_mode
    }

    /// One frame of input handling and movement.
    pub fn tick(&mut self, input: &InputState) {
        if input.toggle_view {
            self.toggle_view();
        }
        self.player
            .step(&input.intent(), input.pointer, self.view_mode, &self.edges);
    }

    /// Casts this frame's rays and builds the drawable output for the current
    /// view mode.
    pub fn frame(&self, viewport: Viewport) -> Frame {
        let pose = &self.player.pose;
        match self.view_mode {
            ViewMode::TopDown => {
                let rays = sample(
                    pose,
                    self.fov,
                    self.top_down_rays,
                    &self.map,
                    self.max_distance,
                    &self.caster,
                );
                Frame::TopDown(TopDownFrame {
                    edges: self.edges.clone(),
                    facing: facing_line(pose, self.map.cell_size() * 0.5),
                    rays: ray_segments(pose, &rays),
                    player: pose.position,
                })
            }
            ViewMode::FirstPerson => {
                let columns = viewport.width.max(0.0) as usize;
                let rays = sample(
                    pose,
                    self.fov,
                    self.ray_count.resolve(columns),
                    &self.map,
                    self.max_distance,
                    &self.caster,
                );
                Frame::FirstPerson(project(&rays, self.fov, viewport, &self.projection))
            }
        }
    }
}
