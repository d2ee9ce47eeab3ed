//! Chess rules: board state with make/unmake, legal move generation,
//! game termination and FEN/UCI/SAN notation.

pub mod board;
pub mod error;
pub mod movegen;
pub mod moves;
pub mod notation;
pub mod perft;
pub mod piece;
pub mod square;

pub use board::{Board, CastlingRights, Outcome, Termination};
pub use error::BoardError;
pub use moves::{Move, MoveType};
pub use notation::STARTING_FEN;
pub use perft::perft;
pub use piece::{Color, Piece, PieceType};
pub use square::Square;
