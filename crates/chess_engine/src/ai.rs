use std::time::Instant;

use chess_core::Color;

use crate::config::{EngineConfig, MAX_DEPTH};
use crate::error::ConfigError;
use crate::evaluation::Evaluator;
use crate::rules::RulesEngine;
use crate::search::{search_parallel, SearchOutcome, SearchStats, Searcher};

/// Picks moves for one side by searching to a fixed depth.
#[derive(Debug, Clone)]
pub struct ChessAI {
    side: Color,
    config: EngineConfig,
    evaluator: Evaluator,
    last_stats: SearchStats,
}

impl ChessAI {
    /// An engine with default settings searching `depth` plies.
    /// Depths above [`MAX_DEPTH`] are clamped.
    pub fn new(side: Color, depth: u8) -> Self {
        let depth_limit = if depth > MAX_DEPTH {
            log::warn!("search depth {depth} clamped to {MAX_DEPTH}");
            MAX_DEPTH
        } else {
            depth
        };
        let config = EngineConfig {
            depth_limit,
            ..EngineConfig::default()
        };
        let evaluator = config.build_evaluator(side);
        ChessAI {
            side,
            config,
            evaluator,
            last_stats: SearchStats::default(),
        }
    }

    pub fn with_config(side: Color, config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let evaluator = config.build_evaluator(side);
        Ok(ChessAI {
            side,
            config,
            evaluator,
            last_stats: SearchStats::default(),
        })
    }

    pub fn side(&self) -> Color {
        self.side
    }

    pub fn depth_limit(&self) -> u8 {
        self.config.depth_limit
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }

    /// Counters from the most recent call to [`ChessAI::choose_move`].
    pub fn last_stats(&self) -> SearchStats {
        self.last_stats
    }

    /// Searches `position` and returns the best move for this engine's
    /// side, or the root's own score when it has no move to offer.
    /// The position is unchanged when this returns.
    pub fn choose_move<P>(&mut self, position: &mut P) -> SearchOutcome<P::Move>
    where
        P: RulesEngine + Clone + Send + Sync,
        P::Move: Send + Sync,
    {
        if position.turn() != self.side {
            log::warn!(
                "engine for {} asked to move with {} to play",
                self.side,
                position.turn()
            );
        }

        let started = Instant::now();
        let depth = self.config.depth_limit;
        let outcome = if self.config.parallel {
            let (outcome, stats) = search_parallel(&mut self.evaluator, depth, &*position);
            self.last_stats = stats;
            outcome
        } else {
            let mut searcher = Searcher::new(&mut self.evaluator, depth);
            let outcome = searcher.search(position);
            self.last_stats = searcher.stats();
            outcome
        };

        match &outcome {
            SearchOutcome::BestMove { mv, score } => log::info!(
                "{} chose {:?} (score {:.2}, {} nodes, {:?})",
                self.side,
                mv,
                score,
                self.last_stats.nodes,
                started.elapsed()
            ),
            SearchOutcome::NoMove { score } => {
                log::info!("{} has no move to make (score {:.2})", self.side, score)
            }
        }
        outcome
    }
}
