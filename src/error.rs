//! Crate-wide error type.
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("map row {row} has {found} cells, expected {expected}")]
    RaggedMap {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("map cell ({col}, {row}) holds {value}, expected 0 or 1")]
    InvalidCell { row: usize, col: usize, value: u8 },

    #[error("cell size must be positive and finite, got {0}")]
    InvalidCellSize(f64),

    #[error("ray direction must be a unit vector, got length {length}")]
    NonUnitDirection { length: f64 },
}
