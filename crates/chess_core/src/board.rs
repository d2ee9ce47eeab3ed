use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::movegen::{self, is_attacked};
use crate::{BoardError, Color, Move, MoveType, Piece, PieceType, Square};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CastlingRights {
    pub white_kingside: bool,
    pub white_queenside: bool,
    pub black_kingside: bool,
    pub black_queenside: bool,
}

impl Default for CastlingRights {
    fn default() -> Self {
        Self {
            white_kingside: true,
            white_queenside: true,
            black_kingside: true,
            black_queenside: true,
        }
    }
}

impl CastlingRights {
    pub fn none() -> Self {
        Self {
            white_kingside: false,
            white_queenside: false,
            black_kingside: false,
            black_queenside: false,
        }
    }

    pub fn kingside(&self, color: Color) -> bool {
        match color {
            Color::White => self.white_kingside,
            Color::Black => self.black_kingside,
        }
    }

    pub fn queenside(&self, color: Color) -> bool {
        match color {
            Color::White => self.white_queenside,
            Color::Black => self.black_queenside,
        }
    }

    fn revoke_color(&mut self, color: Color) {
        match color {
            Color::White => {
                self.white_kingside = false;
                self.white_queenside = false;
            }
            Color::Black => {
                self.black_kingside = false;
                self.black_queenside = false;
            }
        }
    }

    /// Drops the right tied to a rook corner once anything leaves or lands on it.
    fn revoke_square(&mut self, sq: Square) {
        match sq {
            Square::A1 => self.white_queenside = false,
            Square::H1 => self.white_kingside = false,
            Square::A8 => self.black_queenside = false,
            Square::H8 => self.black_kingside = false,
            _ => {}
        }
    }
}

/// Why a game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    Checkmate,
    Stalemate,
    InsufficientMaterial,
    SeventyFiveMoves,
    FivefoldRepetition,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    pub termination: Termination,
    /// `None` for a draw.
    pub winner: Option<Color>,
}

/// Everything needed to take back one move.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Undo {
    mv: Move,
    moved: Piece,
    captured: Option<Piece>,
    castling: CastlingRights,
    ep_square: Option<Square>,
    halfmove_clock: u32,
    key: u64,
}

/// Full game state: placement, side to move, castling and en passant
/// rights, clocks, and the stack of moves played so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    pub(crate) squares: [Option<Piece>; 64],
    pub(crate) turn: Color,
    pub(crate) castling: CastlingRights,
    pub(crate) ep_square: Option<Square>,
    pub(crate) halfmove_clock: u32,
    pub(crate) fullmove_number: u32,
    stack: Vec<Undo>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    pub fn new() -> Self {
        let mut board = Self::empty();
        board.setup_initial_position();
        board
    }

    /// A board with no pieces, white to move, no castling rights.
    pub fn empty() -> Self {
        Self {
            squares: [None; 64],
            turn: Color::White,
            castling: CastlingRights::none(),
            ep_square: None,
            halfmove_clock: 0,
            fullmove_number: 1,
            stack: Vec::new(),
        }
    }

    pub(crate) fn from_parts(
        squares: [Option<Piece>; 64],
        turn: Color,
        castling: CastlingRights,
        ep_square: Option<Square>,
        halfmove_clock: u32,
        fullmove_number: u32,
    ) -> Self {
        Self {
            squares,
            turn,
            castling,
            ep_square,
            halfmove_clock,
            fullmove_number,
            stack: Vec::new(),
        }
    }

    fn setup_initial_position(&mut self) {
        for file in 0..8 {
            self.squares[8 + file] = Some(Piece::new(PieceType::Pawn, Color::White));
            self.squares[48 + file] = Some(Piece::new(PieceType::Pawn, Color::Black));
        }

        let piece_order = [
            PieceType::Rook,
            PieceType::Knight,
            PieceType::Bishop,
            PieceType::Queen,
            PieceType::King,
            PieceType::Bishop,
            PieceType::Knight,
            PieceType::Rook,
        ];

        for (file, &piece_type) in piece_order.iter().enumerate() {
            self.squares[file] = Some(Piece::new(piece_type, Color::White));
            self.squares[56 + file] = Some(Piece::new(piece_type, Color::Black));
        }
        self.castling = CastlingRights::default();
    }

    /// Restores the standard starting position and clears the move stack.
    pub fn reset(&mut self) {
        log::debug!("resetting board after {} plies", self.stack.len());
        *self = Self::new();
    }

    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.squares[sq.index()]
    }

    pub fn piece_type_at(&self, sq: Square) -> Option<PieceType> {
        self.piece_at(sq).map(|p| p.piece_type)
    }

    pub fn color_at(&self, sq: Square) -> Option<Color> {
        self.piece_at(sq).map(|p| p.color)
    }

    pub fn set_piece_at(&mut self, sq: Square, piece: Option<Piece>) {
        self.squares[sq.index()] = piece;
    }

    pub fn turn(&self) -> Color {
        self.turn
    }

    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    pub fn castling_rights(&self) -> CastlingRights {
        self.castling
    }

    pub fn ep_square(&self) -> Option<Square> {
        self.ep_square
    }

    /// Moves played since the position was set up, oldest first.
    pub fn move_stack(&self) -> Vec<Move> {
        self.stack.iter().map(|u| u.mv).collect()
    }

    pub fn last_move(&self) -> Option<Move> {
        self.stack.last().map(|u| u.mv)
    }

    pub fn king_square(&self, color: Color) -> Option<Square> {
        movegen::king_square(&self.squares, color)
    }

    pub fn legal_moves(&self) -> Vec<Move> {
        movegen::legal_moves(self)
    }

    pub fn has_legal_moves(&self) -> bool {
        !self.legal_moves().is_empty()
    }

    pub fn is_legal(&self, mv: Move) -> bool {
        self.legal_moves().contains(&mv)
    }

    /// Plays `mv` without validation. The move must come from
    /// [`Board::legal_moves`] for this exact position.
    pub fn push(&mut self, mv: Move) {
        let moved = match self.squares[mv.from.index()] {
            Some(piece) => piece,
            None => panic!("push: no piece on {} for move {}", mv.from, mv),
        };
        debug_assert_eq!(moved.color, self.turn, "push: {mv} moves the wrong side");

        let key = self.repetition_key();
        let captured = apply_move(&mut self.squares, mv);

        self.stack.push(Undo {
            mv,
            moved,
            captured,
            castling: self.castling,
            ep_square: self.ep_square,
            halfmove_clock: self.halfmove_clock,
            key,
        });

        if moved.piece_type == PieceType::King {
            self.castling.revoke_color(moved.color);
        }
        self.castling.revoke_square(mv.from);
        self.castling.revoke_square(mv.to);

        self.ep_square = match mv.move_type {
            MoveType::DoublePush => mv.from.offset(0, moved.color.pawn_direction()),
            _ => None,
        };

        if moved.piece_type == PieceType::Pawn || captured.is_some() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }

        if moved.color == Color::Black {
            self.fullmove_number += 1;
        }
        self.turn = self.turn.opposite();
    }

    /// Validates `mv` against the legal moves before playing it. Only
    /// origin, destination and promotion are compared, so hand-built moves
    /// are accepted and replaced by the generated one.
    pub fn push_checked(&mut self, mv: Move) -> Result<Move, BoardError> {
        let legal = self
            .legal_moves()
            .into_iter()
            .find(|m| m.from == mv.from && m.to == mv.to && m.promotion == mv.promotion)
            .ok_or_else(|| BoardError::IllegalMove(mv.to_uci()))?;
        log::trace!("push {legal}");
        self.push(legal);
        Ok(legal)
    }

    /// Takes back the most recent move, returning it, or `None` if nothing
    /// has been played.
    pub fn pop(&mut self) -> Option<Move> {
        let undo = self.stack.pop()?;
        let mv = undo.mv;

        self.squares[mv.to.index()] = None;
        self.squares[mv.from.index()] = Some(undo.moved);
        match mv.move_type {
            MoveType::EnPassant => {
                if let Some(victim) = en_passant_victim(mv) {
                    self.squares[victim.index()] = undo.captured;
                }
            }
            MoveType::Castle => {
                if let Some((rook_from, rook_to)) = castle_rook_squares(mv.to) {
                    self.squares[rook_from.index()] = self.squares[rook_to.index()].take();
                }
            }
            _ => self.squares[mv.to.index()] = undo.captured,
        }

        self.turn = undo.moved.color;
        self.castling = undo.castling;
        self.ep_square = undo.ep_square;
        self.halfmove_clock = undo.halfmove_clock;
        if undo.moved.color == Color::Black {
            self.fullmove_number -= 1;
        }
        Some(mv)
    }

    /// Like [`Board::pop`] but reports an empty stack as an error.
    pub fn try_pop(&mut self) -> Result<Move, BoardError> {
        self.pop().ok_or(BoardError::EmptyMoveStack)
    }

    pub fn is_check(&self) -> bool {
        match self.king_square(self.turn) {
            Some(king) => is_attacked(&self.squares, king, self.turn.opposite()),
            None => false,
        }
    }

    pub fn is_checkmate(&self) -> bool {
        self.is_check() && !self.has_legal_moves()
    }

    pub fn is_stalemate(&self) -> bool {
        !self.is_check() && !self.has_legal_moves()
    }

    /// Neither side can possibly deliver mate: no pawns, rooks or queens,
    /// and at most one minor piece or only same-colored bishops.
    pub fn is_insufficient_material(&self) -> bool {
        let mut minors = Vec::new();
        for sq in Square::all() {
            match self.piece_type_at(sq) {
                None | Some(PieceType::King) => {}
                Some(kind @ (PieceType::Knight | PieceType::Bishop)) => minors.push((kind, sq)),
                Some(_) => return false,
            }
        }
        match minors.as_slice() {
            [] | [_] => true,
            [(_, first), ..] => minors
                .iter()
                .all(|&(kind, sq)| kind == PieceType::Bishop && sq.is_light() == first.is_light()),
        }
    }

    /// A draw may be claimed under the fifty-move rule.
    pub fn is_fifty_moves(&self) -> bool {
        self.halfmove_clock >= 100
    }

    pub fn is_seventyfive_moves(&self) -> bool {
        self.halfmove_clock >= 150
    }

    /// How many times the current position has occurred, including now.
    pub fn repetition_count(&self) -> usize {
        let key = self.repetition_key();
        1 + self.stack.iter().filter(|u| u.key == key).count()
    }

    pub fn is_threefold_repetition(&self) -> bool {
        self.repetition_count() >= 3
    }

    pub fn is_fivefold_repetition(&self) -> bool {
        self.repetition_count() >= 5
    }

    /// The result if the game has ended by a rule that needs no claim.
    pub fn outcome(&self) -> Option<Outcome> {
        let no_moves = !self.has_legal_moves();
        if no_moves && self.is_check() {
            return Some(Outcome {
                termination: Termination::Checkmate,
                winner: Some(self.turn.opposite()),
            });
        }
        let draw = |termination| {
            Some(Outcome {
                termination,
                winner: None,
            })
        };
        if self.is_insufficient_material() {
            return draw(Termination::InsufficientMaterial);
        }
        if no_moves {
            return draw(Termination::Stalemate);
        }
        if self.is_seventyfive_moves() {
            return draw(Termination::SeventyFiveMoves);
        }
        if self.is_fivefold_repetition() {
            return draw(Termination::FivefoldRepetition);
        }
        None
    }

    pub fn is_game_over(&self) -> bool {
        self.outcome().is_some()
    }

    fn repetition_key(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.squares.hash(&mut hasher);
        self.turn.hash(&mut hasher);
        self.castling.hash(&mut hasher);
        self.ep_square.hash(&mut hasher);
        hasher.finish()
    }
}

/// Moves pieces for `mv` on a bare placement and returns whatever was captured.
pub(crate) fn apply_move(squares: &mut [Option<Piece>; 64], mv: Move) -> Option<Piece> {
    let piece = squares[mv.from.index()].take();
    let mut captured = squares[mv.to.index()].take();

    match mv.move_type {
        MoveType::EnPassant => {
            if let Some(victim) = en_passant_victim(mv) {
                captured = squares[victim.index()].take();
            }
        }
        MoveType::Castle => {
            if let Some((rook_from, rook_to)) = castle_rook_squares(mv.to) {
                squares[rook_to.index()] = squares[rook_from.index()].take();
            }
        }
        _ => {}
    }

    squares[mv.to.index()] = match (piece, mv.promotion) {
        (Some(p), Some(kind)) => Some(Piece::new(kind, p.color)),
        (piece, _) => piece,
    };
    captured
}

/// The pawn removed by an en passant capture sits beside the origin square.
fn en_passant_victim(mv: Move) -> Option<Square> {
    Square::from_coords(mv.to.file(), mv.from.rank())
}

pub(crate) fn castle_rook_squares(king_to: Square) -> Option<(Square, Square)> {
    match king_to {
        Square::G1 => Some((Square::H1, Square::F1)),
        Square::C1 => Some((Square::A1, Square::D1)),
        Square::G8 => Some((Square::H8, Square::F8)),
        Square::C8 => Some((Square::A8, Square::D8)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uci(board: &Board, text: &str) -> Move {
        board.parse_uci(text).unwrap()
    }

    #[test]
    fn starting_position_basics() {
        let board = Board::new();
        assert_eq!(board.turn(), Color::White);
        assert_eq!(board.fullmove_number(), 1);
        assert_eq!(board.legal_moves().len(), 20);
        assert_eq!(
            board.piece_at(Square::E1),
            Some(Piece::new(PieceType::King, Color::White))
        );
        assert!(!board.is_check());
        assert!(!board.is_game_over());
    }

    #[test]
    fn push_pop_restores_every_field() {
        let mut board = Board::new();
        let before = board.clone();
        for text in ["e2e4", "d7d5", "e4d5", "g8f6"] {
            let mv = uci(&board, text);
            board.push(mv);
        }
        assert_eq!(board.fullmove_number(), 3);
        assert_eq!(board.halfmove_clock(), 1);
        while board.pop().is_some() {}
        assert_eq!(board, before);
    }

    #[test]
    fn pop_on_empty_stack_is_none() {
        let mut board = Board::new();
        assert_eq!(board.pop(), None);
        assert_eq!(board.try_pop(), Err(BoardError::EmptyMoveStack));
    }

    #[test]
    fn en_passant_capture_and_undo() {
        let mut board = Board::from_fen("4k3/8/8/8/3p4/8/4P3/4K3 w - - 0 1").unwrap();
        board.push(uci(&board, "e2e4"));
        assert_eq!(board.ep_square(), Square::from_algebraic("e3"));

        let before = board.clone();
        let ep = uci(&board, "d4e3");
        assert_eq!(ep.move_type, MoveType::EnPassant);
        board.push(ep);
        assert_eq!(board.piece_at(Square::from_algebraic("e4").unwrap()), None);
        board.pop();
        assert_eq!(board, before);
    }

    #[test]
    fn castling_moves_rook_and_revokes_rights() {
        let mut board = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let castle = uci(&board, "e1g1");
        assert_eq!(castle.move_type, MoveType::Castle);
        let before = board.clone();
        board.push(castle);
        assert_eq!(board.piece_type_at(Square::F1), Some(PieceType::Rook));
        assert_eq!(board.piece_at(Square::H1), None);
        assert!(!board.castling_rights().kingside(Color::White));
        assert!(!board.castling_rights().queenside(Color::White));
        assert!(board.castling_rights().kingside(Color::Black));
        board.pop();
        assert_eq!(board, before);
    }

    #[test]
    fn capturing_a_corner_rook_revokes_that_right() {
        let mut board = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        board.push(uci(&board, "a1a8"));
        assert!(!board.castling_rights().queenside(Color::White));
        assert!(!board.castling_rights().queenside(Color::Black));
        assert!(board.castling_rights().kingside(Color::Black));
    }

    #[test]
    fn promotion_and_undo() {
        let mut board = Board::from_fen("8/4P3/8/8/8/8/k7/4K3 w - - 0 1").unwrap();
        let before = board.clone();
        let promo = uci(&board, "e7e8n");
        board.push(promo);
        assert_eq!(board.piece_type_at(Square::E8), Some(PieceType::Knight));
        board.pop();
        assert_eq!(board, before);
    }

    #[test]
    fn fools_mate_is_checkmate() {
        let mut board = Board::new();
        for text in ["f2f3", "e7e5", "g2g4", "d8h4"] {
            board.push(uci(&board, text));
        }
        assert!(board.is_check());
        assert!(board.is_checkmate());
        assert_eq!(
            board.outcome(),
            Some(Outcome {
                termination: Termination::Checkmate,
                winner: Some(Color::Black),
            })
        );
    }

    #[test]
    fn stalemate_is_a_draw() {
        let board = Board::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        assert!(board.is_stalemate());
        assert!(!board.is_checkmate());
        let outcome = board.outcome().unwrap();
        assert_eq!(outcome.termination, Termination::Stalemate);
        assert_eq!(outcome.winner, None);
    }

    #[test]
    fn insufficient_material_cases() {
        let kk = Board::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        assert!(kk.is_insufficient_material());
        let kn = Board::from_fen("4k3/8/8/8/8/8/8/4KN2 w - - 0 1").unwrap();
        assert!(kn.is_insufficient_material());
        // c1 and f8 are both dark squares
        let same_bishops = Board::from_fen("5b1k/8/8/8/8/8/8/2B1K3 w - - 0 1").unwrap();
        assert!(same_bishops.is_insufficient_material());
        let opposite_bishops = Board::from_fen("4kb2/8/8/8/8/8/8/3BK3 w - - 0 1").unwrap();
        assert!(!opposite_bishops.is_insufficient_material());
        let rook = Board::from_fen("4k3/8/8/8/8/8/8/4KR2 w - - 0 1").unwrap();
        assert!(!rook.is_insufficient_material());
    }

    #[test]
    fn knight_shuffles_repeat_the_position() {
        let mut board = Board::new();
        for _ in 0..2 {
            for text in ["g1f3", "g8f6", "f3g1", "f6g8"] {
                board.push(uci(&board, text));
            }
        }
        assert_eq!(board.repetition_count(), 3);
        assert!(board.is_threefold_repetition());
        assert!(!board.is_fivefold_repetition());
        assert!(!board.is_game_over());

        for _ in 0..2 {
            for text in ["g1f3", "g8f6", "f3g1", "f6g8"] {
                board.push(uci(&board, text));
            }
        }
        assert_eq!(
            board.outcome().map(|o| o.termination),
            Some(Termination::FivefoldRepetition)
        );
    }

    #[test]
    fn seventyfive_move_rule_ends_the_game() {
        let board = Board::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 150 90").unwrap();
        assert!(board.is_fifty_moves());
        assert_eq!(
            board.outcome().map(|o| o.termination),
            Some(Termination::SeventyFiveMoves)
        );
    }

    #[test]
    fn push_checked_rejects_illegal_moves() {
        let mut board = Board::new();
        let bogus = Move::new(Square::E1, Square::E8);
        assert!(matches!(board.push_checked(bogus), Err(BoardError::IllegalMove(_))));

        let e4 = Move::new(
            Square::from_algebraic("e2").unwrap(),
            Square::from_algebraic("e4").unwrap(),
        );
        let played = board.push_checked(e4).unwrap();
        assert_eq!(played.move_type, MoveType::DoublePush);
        assert_eq!(board.turn(), Color::Black);
    }

    #[test]
    fn reset_restores_the_start() {
        let mut board = Board::new();
        board.push(uci(&board, "e2e4"));
        board.reset();
        assert_eq!(board, Board::new());
    }
}
