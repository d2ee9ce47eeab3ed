//! Fixed-depth minimax search with alpha-beta pruning for chess.
//!
//! The engine only sees positions through [`RulesEngine`]; `chess_core`
//! provides the implementation used by the driver.

pub mod ai;
pub mod config;
pub mod error;
pub mod evaluation;
pub mod rules;
pub mod search;

pub use ai::ChessAI;
pub use config::{Difficulty, EngineConfig, DEFAULT_DEPTH, MAX_DEPTH};
pub use error::ConfigError;
pub use evaluation::{piece_value, Evaluator, CHECKMATE_SCORE};
pub use rules::RulesEngine;
pub use search::{search_parallel, SearchOutcome, SearchStats, Searcher};
