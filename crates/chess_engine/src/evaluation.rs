use chess_core::{Color, PieceType, Square};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::rules::RulesEngine;

// Piece values in pawns. The king is never captured so it carries no material.
const PAWN_VALUE: f64 = 1.00;
const KNIGHT_VALUE: f64 = 3.05;
const BISHOP_VALUE: f64 = 3.33;
const ROOK_VALUE: f64 = 5.63;
const QUEEN_VALUE: f64 = 9.50;
const KING_VALUE: f64 = 0.00;

/// Score for delivering mate; its negation for being mated.
pub const CHECKMATE_SCORE: f64 = 1000.0;

/// Bonus per legal move for the side to move while the game is young.
pub const EARLY_GAME_BONUS: f64 = 0.64;

/// The mobility bonus applies while the fullmove number is below this.
pub const EARLY_GAME_MOVES: u32 = 8;

pub fn piece_value(piece_type: PieceType) -> f64 {
    match piece_type {
        PieceType::Pawn => PAWN_VALUE,
        PieceType::Knight => KNIGHT_VALUE,
        PieceType::Bishop => BISHOP_VALUE,
        PieceType::Rook => ROOK_VALUE,
        PieceType::Queen => QUEEN_VALUE,
        PieceType::King => KING_VALUE,
    }
}

/// Scores positions from the point of view of one fixed side.
///
/// With entropy enabled every call to [`Evaluator::evaluate`] adds a
/// uniform draw from [-0.5, 0.5) taken from the evaluator's own seedable
/// generator, so identical leaves may score differently.
#[derive(Debug, Clone)]
pub struct Evaluator {
    side: Color,
    entropy: Option<StdRng>,
}

impl Evaluator {
    /// A deterministic evaluator.
    pub fn new(side: Color) -> Self {
        Self {
            side,
            entropy: None,
        }
    }

    pub fn with_entropy(side: Color, rng: StdRng) -> Self {
        Self {
            side,
            entropy: Some(rng),
        }
    }

    pub fn seeded(side: Color, seed: u64) -> Self {
        Self::with_entropy(side, StdRng::seed_from_u64(seed))
    }

    pub fn side(&self) -> Color {
        self.side
    }

    pub fn entropy_enabled(&self) -> bool {
        self.entropy.is_some()
    }

    /// An evaluator for the same side whose entropy stream is seeded from
    /// this one, so parallel workers stay reproducible under a fixed seed.
    pub fn fork(&mut self) -> Evaluator {
        Evaluator {
            side: self.side,
            entropy: self
                .entropy
                .as_mut()
                .map(|rng| StdRng::seed_from_u64(rng.gen())),
        }
    }

    /// Material on one square: positive for our pieces, negative for theirs.
    pub fn material_score<P: RulesEngine>(&self, position: &P, sq: Square) -> f64 {
        let Some(piece_type) = position.piece_type_at(sq) else {
            return 0.0;
        };
        let value = piece_value(piece_type);
        if position.color_at(sq) == Some(self.side) {
            value
        } else {
            -value
        }
    }

    pub fn material_balance<P: RulesEngine>(&self, position: &P) -> f64 {
        Square::all().map(|sq| self.material_score(position, sq)).sum()
    }

    /// Rewards the side to move for its number of legal moves before move 8.
    pub fn early_game_bonus<P: RulesEngine>(&self, position: &P) -> f64 {
        if position.fullmove_number() >= EARLY_GAME_MOVES {
            return 0.0;
        }
        let multiplier = if position.turn() == self.side { 1.0 } else { -1.0 };
        EARLY_GAME_BONUS * position.legal_moves().len() as f64 * multiplier
    }

    pub fn evaluate_checkmate<P: RulesEngine>(&self, position: &P) -> f64 {
        if !position.is_checkmate() {
            return 0.0;
        }
        // The side to move is the one that got mated.
        if position.turn() != self.side {
            CHECKMATE_SCORE
        } else {
            -CHECKMATE_SCORE
        }
    }

    pub fn evaluate<P: RulesEngine>(&mut self, position: &P) -> f64 {
        let mut score = self.material_balance(position);
        score += self.early_game_bonus(position);
        score += self.evaluate_checkmate(position);

        if let Some(rng) = self.entropy.as_mut() {
            score += rng.gen_range(-0.5..0.5);
        }
        score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::Board;

    const MIDGAME: &str = "r1bq1rk1/pp2bppp/2n1pn2/3p4/2PP4/2N2N2/PP2BPPP/R2QKB1R w KQ - 2 9";

    fn board_after(moves: &[&str]) -> Board {
        let mut board = Board::new();
        for text in moves {
            let mv = board.parse_san(text).unwrap();
            board.push(mv);
        }
        board
    }

    #[test]
    fn starting_position_is_pure_mobility() {
        let board = Board::new();
        let mut white = Evaluator::new(Color::White);
        assert!(white.material_balance(&board).abs() < 1e-9);
        assert!((white.early_game_bonus(&board) - 12.8).abs() < 1e-9);
        assert_eq!(white.evaluate_checkmate(&board), 0.0);
        assert!((white.evaluate(&board) - 12.8).abs() < 1e-9);

        let mut black = Evaluator::new(Color::Black);
        assert!((black.evaluate(&board) + 12.8).abs() < 1e-9);
    }

    #[test]
    fn material_counts_by_owner() {
        // White is up a knight.
        let board = Board::from_fen("4k3/8/8/8/8/8/8/4KN2 w - - 0 40").unwrap();
        let mut white = Evaluator::new(Color::White);
        let mut black = Evaluator::new(Color::Black);
        assert_eq!(white.evaluate(&board), KNIGHT_VALUE);
        assert_eq!(black.evaluate(&board), -KNIGHT_VALUE);
    }

    #[test]
    fn material_score_flips_sign_with_the_side() {
        let board = Board::from_fen(MIDGAME).unwrap();
        let white = Evaluator::new(Color::White);
        let black = Evaluator::new(Color::Black);
        for sq in Square::all() {
            assert_eq!(
                white.material_score(&board, sq),
                -black.material_score(&board, sq),
                "square {sq}"
            );
        }
        let d1 = Square::from_algebraic("d1").unwrap();
        assert_eq!(white.material_score(&board, d1), QUEEN_VALUE);
        assert_eq!(white.material_score(&board, Square::from_algebraic("e4").unwrap()), 0.0);
    }

    #[test]
    fn mobility_bonus_stops_at_move_eight() {
        let early = Board::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 0 7").unwrap();
        let late = Board::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 0 8").unwrap();
        let white = Evaluator::new(Color::White);
        let moves = early.legal_moves().len() as f64;
        assert!((white.early_game_bonus(&early) - EARLY_GAME_BONUS * moves).abs() < 1e-9);
        assert_eq!(white.early_game_bonus(&late), 0.0);
    }

    #[test]
    fn mobility_bonus_counts_against_us_on_their_turn() {
        let board = board_after(&["e4"]);
        let white = Evaluator::new(Color::White);
        let black_moves = board.legal_moves().len() as f64;
        assert!((white.early_game_bonus(&board) + EARLY_GAME_BONUS * black_moves).abs() < 1e-9);
    }

    #[test]
    fn checkmate_term_rewards_the_mating_side() {
        let mated = board_after(&["f3", "e5", "g4", "Qh4#"]);
        assert!(mated.is_checkmate());
        assert_eq!(Evaluator::new(Color::Black).evaluate_checkmate(&mated), CHECKMATE_SCORE);
        assert_eq!(Evaluator::new(Color::White).evaluate_checkmate(&mated), -CHECKMATE_SCORE);

        let total = Evaluator::new(Color::Black).evaluate(&mated);
        assert!(total > CHECKMATE_SCORE - 1.0);
    }

    #[test]
    fn stalemate_scores_no_terminal_bonus() {
        let board = Board::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 50").unwrap();
        let white = Evaluator::new(Color::White);
        assert_eq!(white.evaluate_checkmate(&board), 0.0);
    }

    #[test]
    fn deterministic_evaluation_repeats() {
        let board = Board::from_fen(MIDGAME).unwrap();
        let mut eval = Evaluator::new(Color::White);
        let first = eval.evaluate(&board);
        for _ in 0..10 {
            assert_eq!(eval.evaluate(&board), first);
        }
    }

    #[test]
    fn entropy_stays_within_half_a_pawn() {
        let board = Board::new();
        let base = Evaluator::new(Color::White).evaluate(&board);
        let mut noisy = Evaluator::seeded(Color::White, 42);
        let mut distinct = false;
        for _ in 0..200 {
            let score = noisy.evaluate(&board);
            let noise = score - base;
            assert!((-0.5..0.5).contains(&noise), "noise {noise}");
            distinct |= noise != 0.0;
        }
        assert!(distinct);
    }

    #[test]
    fn same_seed_gives_the_same_stream() {
        let board = Board::new();
        let mut a = Evaluator::seeded(Color::White, 9);
        let mut b = Evaluator::seeded(Color::White, 9);
        for _ in 0..20 {
            assert_eq!(a.evaluate(&board), b.evaluate(&board));
        }
    }

    #[test]
    fn forks_are_reproducible() {
        let mut a = Evaluator::seeded(Color::White, 3);
        let mut b = Evaluator::seeded(Color::White, 3);
        let board = Board::new();
        assert_eq!(a.fork().evaluate(&board), b.fork().evaluate(&board));
        assert!(!Evaluator::new(Color::White).fork().entropy_enabled());
    }
}
