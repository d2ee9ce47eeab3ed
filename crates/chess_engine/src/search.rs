//! Fixed-depth minimax with alpha-beta pruning.
//!
//! One routine covers both roles: `maximizing` plies keep the highest
//! child score and raise alpha, minimizing plies keep the lowest and lower
//! beta. Moves are tried in the order the rules engine yields them.
//!
//! When the evaluator has entropy enabled, cutoffs are decided on noisy
//! leaf scores, so the result can differ from an unpruned search of the
//! same tree. With entropy off both return the same move and score.

use std::ops::{Deref, DerefMut};
use std::time::Instant;

use rayon::prelude::*;

use crate::evaluation::Evaluator;
use crate::rules::RulesEngine;

/// What the root of a search produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SearchOutcome<M> {
    /// The best root move and the score it leads to.
    BestMove { mv: M, score: f64 },
    /// The root was terminal (no legal moves, or a zero depth limit);
    /// `score` is its static evaluation.
    NoMove { score: f64 },
}

impl<M: Copy> SearchOutcome<M> {
    pub fn best_move(&self) -> Option<M> {
        match *self {
            SearchOutcome::BestMove { mv, .. } => Some(mv),
            SearchOutcome::NoMove { .. } => None,
        }
    }

    pub fn score(&self) -> f64 {
        match *self {
            SearchOutcome::BestMove { score, .. } | SearchOutcome::NoMove { score } => score,
        }
    }
}

/// Counters for a single search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Every node visited, root included.
    pub nodes: u64,
    /// Nodes scored by the evaluator.
    pub leaves: u64,
    /// Move loops abandoned because alpha met beta.
    pub cutoffs: u64,
}

impl SearchStats {
    fn absorb(&mut self, other: SearchStats) {
        self.nodes += other.nodes;
        self.leaves += other.leaves;
        self.cutoffs += other.cutoffs;
    }
}

/// A move pushed onto a position for the lifetime of the guard.
/// Dropping the guard pops it, on every exit path.
struct Applied<'p, P: RulesEngine> {
    position: &'p mut P,
}

impl<'p, P: RulesEngine> Applied<'p, P> {
    fn new(position: &'p mut P, mv: P::Move) -> Self {
        position.push(mv);
        Self { position }
    }
}

impl<P: RulesEngine> Deref for Applied<'_, P> {
    type Target = P;

    fn deref(&self) -> &P {
        self.position
    }
}

impl<P: RulesEngine> DerefMut for Applied<'_, P> {
    fn deref_mut(&mut self) -> &mut P {
        self.position
    }
}

impl<P: RulesEngine> Drop for Applied<'_, P> {
    fn drop(&mut self) {
        self.position.pop();
    }
}

struct Node<M> {
    score: f64,
    best_move: Option<M>,
}

/// Runs searches to a fixed depth using a borrowed evaluator.
pub struct Searcher<'e> {
    evaluator: &'e mut Evaluator,
    depth_limit: u8,
    stats: SearchStats,
}

impl<'e> Searcher<'e> {
    pub fn new(evaluator: &'e mut Evaluator, depth_limit: u8) -> Self {
        Self {
            evaluator,
            depth_limit,
            stats: SearchStats::default(),
        }
    }

    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Searches from `position` with the evaluator's side maximizing at
    /// the root. The position is left exactly as it was found.
    pub fn search<P: RulesEngine>(&mut self, position: &mut P) -> SearchOutcome<P::Move> {
        self.stats = SearchStats::default();
        let started = Instant::now();

        let root = self.alpha_beta(position, 0, f64::NEG_INFINITY, f64::INFINITY, true);

        log::debug!(
            "depth {} search: {} nodes, {} leaves, {} cutoffs in {:?}",
            self.depth_limit,
            self.stats.nodes,
            self.stats.leaves,
            self.stats.cutoffs,
            started.elapsed()
        );

        match root.best_move {
            Some(mv) => SearchOutcome::BestMove {
                mv,
                score: root.score,
            },
            None => SearchOutcome::NoMove { score: root.score },
        }
    }

    fn leaf<P: RulesEngine>(&mut self, position: &P) -> Node<P::Move> {
        self.stats.leaves += 1;
        Node {
            score: self.evaluator.evaluate(position),
            best_move: None,
        }
    }

    fn alpha_beta<P: RulesEngine>(
        &mut self,
        position: &mut P,
        depth: u8,
        mut alpha: f64,
        mut beta: f64,
        maximizing: bool,
    ) -> Node<P::Move> {
        self.stats.nodes += 1;

        if depth >= self.depth_limit {
            return self.leaf(position);
        }
        let moves = position.legal_moves();
        if moves.is_empty() {
            return self.leaf(position);
        }

        let mut best = Node {
            score: if maximizing {
                f64::NEG_INFINITY
            } else {
                f64::INFINITY
            },
            best_move: None,
        };

        for mv in moves {
            let score = {
                let mut child = Applied::new(position, mv);
                self.alpha_beta(&mut *child, depth + 1, alpha, beta, !maximizing)
                    .score
            };

            if depth == 0 {
                log::trace!("root move {mv:?} scored {score:.2}");
            }

            if maximizing {
                if score > best.score {
                    best.score = score;
                    if depth == 0 {
                        best.best_move = Some(mv);
                    }
                }
                alpha = alpha.max(best.score);
            } else {
                if score < best.score {
                    best.score = score;
                }
                beta = beta.min(best.score);
            }

            if alpha >= beta {
                self.stats.cutoffs += 1;
                break;
            }
        }

        best
    }
}

/// Searches each root move on its own copy of `position` across the rayon
/// pool. Every subtree gets a full window and a forked evaluator; the
/// first move (in generation order) with the highest score wins, matching
/// the sequential search when entropy is off.
pub fn search_parallel<P>(
    evaluator: &mut Evaluator,
    depth_limit: u8,
    position: &P,
) -> (SearchOutcome<P::Move>, SearchStats)
where
    P: RulesEngine + Clone + Send + Sync,
    P::Move: Send + Sync,
{
    let moves = if depth_limit == 0 {
        Vec::new()
    } else {
        position.legal_moves()
    };
    if moves.is_empty() {
        let stats = SearchStats {
            nodes: 1,
            leaves: 1,
            cutoffs: 0,
        };
        let score = evaluator.evaluate(position);
        return (SearchOutcome::NoMove { score }, stats);
    }

    let workers: Vec<Evaluator> = moves.iter().map(|_| evaluator.fork()).collect();
    let started = Instant::now();

    let results: Vec<(f64, SearchStats)> = moves
        .par_iter()
        .zip(workers.into_par_iter())
        .map(|(&mv, mut worker)| {
            let mut local = position.clone();
            let mut searcher = Searcher::new(&mut worker, depth_limit);
            let score = {
                let mut child = Applied::new(&mut local, mv);
                searcher
                    .alpha_beta(&mut *child, 1, f64::NEG_INFINITY, f64::INFINITY, false)
                    .score
            };
            (score, searcher.stats)
        })
        .collect();

    let mut stats = SearchStats {
        nodes: 1,
        ..SearchStats::default()
    };
    let mut best: Option<(P::Move, f64)> = None;
    for (&mv, &(score, branch)) in moves.iter().zip(&results) {
        stats.absorb(branch);
        if best.map_or(true, |(_, best_score)| score > best_score) {
            best = Some((mv, score));
        }
    }

    log::debug!(
        "parallel depth {depth_limit} search over {} root moves: {} nodes in {:?}",
        moves.len(),
        stats.nodes,
        started.elapsed()
    );

    let outcome = match best {
        Some((mv, score)) => SearchOutcome::BestMove { mv, score },
        None => SearchOutcome::NoMove {
            score: f64::NEG_INFINITY,
        },
    };
    (outcome, stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::{Board, Color, Move, Outcome, PieceType, Square};

    /// Plain minimax without pruning, used as the reference result.
    fn minimax(board: &mut Board, eval: &mut Evaluator, depth: u8, limit: u8, maximizing: bool) -> f64 {
        let moves = board.legal_moves();
        if depth == limit || moves.is_empty() {
            return eval.evaluate(board);
        }
        let mut best = if maximizing {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
        for mv in moves {
            board.push(mv);
            let score = minimax(board, eval, depth + 1, limit, !maximizing);
            board.pop();
            best = if maximizing { best.max(score) } else { best.min(score) };
        }
        best
    }

    fn reference_root(board: &mut Board, side: Color, limit: u8) -> Option<(Move, f64)> {
        let mut eval = Evaluator::new(side);
        let mut best: Option<(Move, f64)> = None;
        if limit == 0 {
            return None;
        }
        for mv in board.legal_moves() {
            board.push(mv);
            let score = minimax(board, &mut eval, 1, limit, false);
            board.pop();
            if best.map_or(true, |(_, b)| score > b) {
                best = Some((mv, score));
            }
        }
        best
    }

    /// Wraps a board and counts make/unmake calls.
    #[derive(Clone)]
    struct Counting {
        board: Board,
        pushes: usize,
        pops: usize,
        deepest: usize,
        stack: usize,
    }

    impl Counting {
        fn new(board: Board) -> Self {
            Self {
                board,
                pushes: 0,
                pops: 0,
                deepest: 0,
                stack: 0,
            }
        }
    }

    impl RulesEngine for Counting {
        type Move = Move;

        fn legal_moves(&self) -> Vec<Move> {
            self.board.legal_moves()
        }
        fn is_checkmate(&self) -> bool {
            self.board.is_checkmate()
        }
        fn is_game_over(&self) -> bool {
            self.board.is_game_over()
        }
        fn outcome(&self) -> Option<Outcome> {
            self.board.outcome()
        }
        fn piece_type_at(&self, sq: Square) -> Option<PieceType> {
            self.board.piece_type_at(sq)
        }
        fn color_at(&self, sq: Square) -> Option<Color> {
            self.board.color_at(sq)
        }
        fn turn(&self) -> Color {
            self.board.turn()
        }
        fn fullmove_number(&self) -> u32 {
            self.board.fullmove_number()
        }
        fn push(&mut self, mv: Move) {
            self.pushes += 1;
            self.stack += 1;
            self.deepest = self.deepest.max(self.stack);
            self.board.push(mv);
        }
        fn pop(&mut self) -> Option<Move> {
            self.pops += 1;
            self.stack -= 1;
            self.board.pop()
        }
        fn reset(&mut self) {
            self.board.reset();
        }
    }

    const POSITIONS: [&str; 4] = [
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        "r1bq1rk1/pp2bppp/2n1pn2/3p4/2PP4/2N2N2/PP2BPPP/R2QKB1R w KQ - 2 9",
        "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 b - - 0 30",
    ];

    #[test]
    fn pruned_search_matches_plain_minimax() {
        for fen in POSITIONS {
            let depth = if fen.starts_with("r3k2r") { 2 } else { 3 };
            let mut board = Board::from_fen(fen).unwrap();
            let side = board.turn();

            let expected = reference_root(&mut board, side, depth).unwrap();

            let mut eval = Evaluator::new(side);
            let outcome = Searcher::new(&mut eval, depth).search(&mut board);
            assert_eq!(outcome.best_move(), Some(expected.0), "best move for {fen}");
            assert_eq!(outcome.score(), expected.1, "score for {fen}");
        }
    }

    #[test]
    fn pruning_visits_fewer_nodes() {
        let board = Board::from_fen(POSITIONS[2]).unwrap();
        let mut counting = Counting::new(board.clone());
        let mut eval = Evaluator::new(Color::White);
        let mut searcher = Searcher::new(&mut eval, 3);
        searcher.search(&mut counting);
        let stats = searcher.stats();

        let mut full = board.clone();
        let all_leaves = chess_core::perft(&mut full, 3);
        assert!(stats.cutoffs > 0);
        assert!(stats.leaves < all_leaves, "{} >= {}", stats.leaves, all_leaves);
    }

    #[test]
    fn every_push_is_popped() {
        for fen in POSITIONS {
            let board = Board::from_fen(fen).unwrap();
            let mut counting = Counting::new(board.clone());
            let mut eval = Evaluator::seeded(board.turn(), 11);
            Searcher::new(&mut eval, 3).search(&mut counting);

            assert_eq!(counting.pushes, counting.pops);
            assert_eq!(counting.stack, 0);
            assert_eq!(counting.deepest, 3);
            assert_eq!(counting.board, board, "position changed for {fen}");
        }
    }

    #[test]
    fn zero_depth_evaluates_the_root() {
        let mut board = Board::new();
        let mut counting = Counting::new(board.clone());
        let mut eval = Evaluator::new(Color::White);
        let outcome = Searcher::new(&mut eval, 0).search(&mut counting);

        let expected = Evaluator::new(Color::White).evaluate(&board);
        assert_eq!(outcome, SearchOutcome::NoMove { score: expected });
        assert_eq!(counting.pushes, 0);

        let mut eval = Evaluator::new(Color::White);
        let (parallel, stats) = search_parallel(&mut eval, 0, &board);
        assert_eq!(parallel, SearchOutcome::NoMove { score: expected });
        assert_eq!(stats.nodes, 1);
        assert!(board.pop().is_none());
    }

    #[test]
    fn terminal_root_yields_no_move() {
        let stalemate = "7k/5Q2/6K1/8/8/8/8/8 b - - 0 50";
        let mated = "rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3";
        for fen in [stalemate, mated] {
            let mut board = Board::from_fen(fen).unwrap();
            let side = board.turn();
            let mut eval = Evaluator::new(side);
            let outcome = Searcher::new(&mut eval, 4).search(&mut board);
            let expected = Evaluator::new(side).evaluate(&board);
            assert_eq!(outcome, SearchOutcome::NoMove { score: expected });
        }
    }

    #[test]
    fn parallel_root_agrees_with_sequential() {
        for fen in POSITIONS {
            let mut board = Board::from_fen(fen).unwrap();
            let side = board.turn();

            let mut eval = Evaluator::new(side);
            let sequential = Searcher::new(&mut eval, 2).search(&mut board);

            let mut eval = Evaluator::new(side);
            let (parallel, stats) = search_parallel(&mut eval, 2, &board);
            assert_eq!(parallel, sequential, "{fen}");
            assert!(stats.nodes > 1);
        }
    }

    #[test]
    fn outcome_accessors() {
        let mv = Move::new(Square::E1, Square::E8);
        let found = SearchOutcome::BestMove { mv, score: 2.5 };
        assert_eq!(found.best_move(), Some(mv));
        assert_eq!(found.score(), 2.5);
        let none: SearchOutcome<Move> = SearchOutcome::NoMove { score: -1.0 };
        assert_eq!(none.best_move(), None);
        assert_eq!(none.score(), -1.0);
    }
}
