//! The slice of a rules engine that evaluation and search consume.

use std::fmt::Debug;

use chess_core::{Board, Color, Move, Outcome, PieceType, Square};

/// Position queries and make/unmake used by the evaluator and search.
///
/// `pop` must exactly reverse the most recent unreversed `push`. The search
/// only pushes moves it obtained from `legal_moves` on the same position.
pub trait RulesEngine {
    type Move: Copy + PartialEq + Debug;

    fn legal_moves(&self) -> Vec<Self::Move>;
    fn is_checkmate(&self) -> bool;
    fn is_game_over(&self) -> bool;
    fn outcome(&self) -> Option<Outcome>;
    fn piece_type_at(&self, sq: Square) -> Option<PieceType>;
    fn color_at(&self, sq: Square) -> Option<Color>;
    fn turn(&self) -> Color;
    fn fullmove_number(&self) -> u32;
    fn push(&mut self, mv: Self::Move);
    fn pop(&mut self) -> Option<Self::Move>;
    fn reset(&mut self);
}

impl RulesEngine for Board {
    type Move = Move;

    fn legal_moves(&self) -> Vec<Move> {
        Board::legal_moves(self)
    }

    fn is_checkmate(&self) -> bool {
        Board::is_checkmate(self)
    }

    fn is_game_over(&self) -> bool {
        Board::is_game_over(self)
    }

    fn outcome(&self) -> Option<Outcome> {
        Board::outcome(self)
    }

    fn piece_type_at(&self, sq: Square) -> Option<PieceType> {
        Board::piece_type_at(self, sq)
    }

    fn color_at(&self, sq: Square) -> Option<Color> {
        Board::color_at(self, sq)
    }

    fn turn(&self) -> Color {
        Board::turn(self)
    }

    fn fullmove_number(&self) -> u32 {
        Board::fullmove_number(self)
    }

    fn push(&mut self, mv: Move) {
        Board::push(self, mv)
    }

    fn pop(&mut self) -> Option<Move> {
        Board::pop(self)
    }

    fn reset(&mut self) {
        Board::reset(self)
    }
}
