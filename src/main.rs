use std::path::{Path, PathBuf};

use gridcast::{Game, GameConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG: &str = "gridcast.toml";

fn load_config() -> gridcast::Result<GameConfig> {
    match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => GameConfig::load(path),
        None if Path::new(DEFAULT_CONFIG).exists() => GameConfig::load(DEFAULT_CONFIG),
        None => {
            warn!("no {DEFAULT_CONFIG} found, using defaults");
            Ok(GameConfig::default())
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = load_config()?;
    let game = Game::from_config(&config)?;
    info!(
        mode = game.view_mode.label(),
        fov_degrees = config.view.fov_degrees,
        "starting"
    );

    gridcast::host::run(&config, game);
    Ok(())
}
