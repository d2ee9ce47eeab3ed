//! Interactive setup for whatever the command line left unspecified.

use chess_core::Color;
use chess_engine::{Difficulty, EngineConfig};

use crate::error::GameError;
use crate::game::{GameConfig, PlayMode};
use crate::input::LineSource;

/// Setup choices known before prompting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialSetup {
    pub color: Option<Color>,
    pub depth: Option<u8>,
    pub mode: Option<PlayMode>,
}

pub fn parse_color(text: &str) -> Option<Color> {
    match text.trim().to_ascii_lowercase().as_str() {
        "w" | "white" => Some(Color::White),
        "b" | "black" => Some(Color::Black),
        _ => None,
    }
}

pub fn parse_yes_no(text: &str) -> Option<bool> {
    match text.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}

/// Repeats `question` until `parse` accepts the answer.
fn ask<T, L: LineSource>(
    input: &mut L,
    question: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<T, GameError> {
    loop {
        let line = input.read_line(question)?.ok_or(GameError::InputClosed)?;
        match parse(&line) {
            Some(value) => return Ok(value),
            None => log::debug!("unrecognised answer {line:?} to {question:?}"),
        }
    }
}

/// Asks for each missing choice and builds the game configuration.
/// Crazy mode is only offered when bot mode was declined.
pub fn complete_setup<L: LineSource>(
    partial: PartialSetup,
    engine: EngineConfig,
    input: &mut L,
) -> Result<GameConfig, GameError> {
    let human_color = match partial.color {
        Some(color) => color,
        None => ask(input, "choose your color (B/W): ", parse_color)?,
    };

    let depth_limit = match partial.depth {
        Some(depth) => depth,
        None => {
            let level: Difficulty = ask(
                input,
                "choose difficulty level (AUTO/EASY/MEDIUM/DIFFICULT): ",
                |text| text.parse().ok(),
            )?;
            level.depth()
        }
    };

    let mode = match partial.mode {
        Some(mode) => mode,
        None => {
            let bot = ask(input, "bot level? (yes/no): ", parse_yes_no)?;
            let crazy = !bot && ask(input, "crazy level? (yes/no): ", parse_yes_no)?;
            PlayMode::from_flags(bot, crazy)
        }
    };

    let config = GameConfig {
        human_color,
        mode,
        engine: EngineConfig {
            depth_limit,
            ..engine
        },
    };
    config.engine.validate()?;
    Ok(config)
}
