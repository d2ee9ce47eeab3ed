use thiserror::Error;

/// Errors raised by the rules engine when handed malformed or illegal input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error("invalid FEN: {0}")]
    InvalidFen(String),

    /// The text is not recognisable as UCI or SAN.
    #[error("invalid move text: {0}")]
    InvalidMove(String),

    #[error("illegal move in this position: {0}")]
    IllegalMove(String),

    #[error("ambiguous move: {0}")]
    AmbiguousMove(String),

    #[error("no moves to undo")]
    EmptyMoveStack,
}
