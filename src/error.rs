use std::io;
use std::path::PathBuf;

use crossterm::event::KeyCode;
use thiserror::Error;

use crate::config::MIN_BOARD_SIDE;

/// Invalid board or run configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(
        "board {width}x{height} is too small, both sides must be at least {}",
        MIN_BOARD_SIDE
    )]
    BoardTooSmall { width: u16, height: u16 },

    #[error("failed to read config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Failures raised by the simulation itself.
#[derive(Debug, Error)]
pub enum GameError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Input(#[from] InputError),

    /// No interior cell is left for food.
    #[error("no free interior cell left to place food")]
    BoardFull,

    /// `update` was called on a game that is already over.
    #[error("game has already ended, start a new episode")]
    AlreadyEnded,

    /// A hand-placed snake or food does not fit the board.
    #[error("snake must lie inside the border without overlapping, food on a free interior cell")]
    InvalidLayout,
}

/// External input that has no mapping to a direction.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Error)]
pub enum InputError {
    #[error("unknown action id {0}, expected 0..=3")]
    UnknownAction(usize),

    #[error("key {0:?} has no direction mapping")]
    UnmappedKey(KeyCode),
}

impl From<GameError> for io::Error {
    fn from(error: GameError) -> Self {
        io::Error::other(error)
    }
}
