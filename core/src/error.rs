use thiserror::Error;

use crate::Coord;

/// Caller configuration mistakes, fatal at round start.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid grid size {columns}x{rows}")]
    InvalidGridSize { columns: Coord, rows: Coord },
    #[error("Grid of {columns}x{rows} has an odd number of cells")]
    OddCellCount { columns: Coord, rows: Coord },
    #[error("No card identities available")]
    EmptyCardPool,
    #[error("Pair count must be positive")]
    InvalidPairCount,
    #[error("Duration `{0}` must be a finite, non-negative number of seconds")]
    InvalidDuration(&'static str),
}

#[derive(Error, Debug, Copy, Clone, PartialEq)]
pub enum GameError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Computed cell size {cell_size} does not fit the container")]
    Layout { cell_size: f32 },
    #[error("Snapshot does not describe a valid round for this configuration")]
    InvalidSnapshot,
    #[error("Level {0} does not exist")]
    UnknownLevel(u32),
    #[error("Level {0} is still locked")]
    LevelLocked(u32),
}

pub type Result<T> = core::result::Result<T, GameError>;
