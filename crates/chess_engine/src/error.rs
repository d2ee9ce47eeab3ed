use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("search depth {depth} exceeds the maximum of {max}")]
    DepthTooLarge { depth: u8, max: u8 },

    #[error("unknown difficulty '{0}' (expected auto, easy, medium or difficult)")]
    UnknownDifficulty(String),
}
