use std::fmt;
use std::str::FromStr;

use chess_core::Color;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::error::ConfigError;
use crate::evaluation::Evaluator;

/// Deepest search the engine accepts. The tree grows roughly 30x per ply,
/// so anything past this is impractical without move ordering.
pub const MAX_DEPTH: u8 = 10;
pub const DEFAULT_DEPTH: u8 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    Auto,
    Easy,
    Medium,
    Difficult,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Auto,
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Difficult,
    ];

    /// Search depth in plies for this level.
    pub fn depth(self) -> u8 {
        match self {
            Difficulty::Easy => 3,
            Difficulty::Medium | Difficulty::Auto => 5,
            Difficulty::Difficult => 7,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Difficulty::Auto => "auto",
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Difficult => "difficult",
        };
        f.write_str(name)
    }
}

impl FromStr for Difficulty {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Difficulty::ALL
            .into_iter()
            .find(|d| d.to_string() == wanted)
            .ok_or_else(|| ConfigError::UnknownDifficulty(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Plies searched from the root.
    pub depth_limit: u8,
    /// Add a random term in [-0.5, 0.5) to every evaluation.
    pub entropy: bool,
    /// Seed for the entropy stream; `None` seeds from the OS.
    pub seed: Option<u64>,
    /// Search root moves on the rayon pool, one position copy per move.
    pub parallel: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            depth_limit: DEFAULT_DEPTH,
            entropy: true,
            seed: None,
            parallel: false,
        }
    }
}

impl EngineConfig {
    pub fn from_difficulty(difficulty: Difficulty) -> Self {
        Self {
            depth_limit: difficulty.depth(),
            ..Self::default()
        }
    }

    /// Entropy off: evaluation and search are pure functions of the position.
    pub fn deterministic(depth_limit: u8) -> Self {
        Self {
            depth_limit,
            entropy: false,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.depth_limit > MAX_DEPTH {
            return Err(ConfigError::DepthTooLarge {
                depth: self.depth_limit,
                max: MAX_DEPTH,
            });
        }
        Ok(())
    }

    pub fn build_evaluator(&self, side: Color) -> Evaluator {
        if !self.entropy {
            return Evaluator::new(side);
        }
        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Evaluator::with_entropy(side, rng)
    }
}
