//! Terminal driver: setup prompts, the turn loop and board persistence.

pub mod error;
pub mod game;
pub mod input;
pub mod prompt;
pub mod render;

pub use error::GameError;
pub use game::{Game, GameConfig, GameEnd, PlayMode};
pub use input::{Command, LineSource, ScriptedSource, StdinSource};
pub use prompt::{complete_setup, PartialSetup};
pub use render::{render_ascii, BoardSink, NullSink, TextFileSink, DEFAULT_BOARD_FILE};
