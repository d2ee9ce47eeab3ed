use std::io;

use chess_core::BoardError;
use chess_engine::ConfigError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Board(#[from] BoardError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("input closed before setup was complete")]
    InputClosed,

    #[error("engine playing {0} found no move in an unfinished game")]
    NoEngineMove(chess_core::Color),
}
