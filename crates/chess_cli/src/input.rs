use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

use crate::error::GameError;

/// What a human typed at the move prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Take back the last two plies.
    Undo,
    /// Abandon the game.
    End,
    /// Anything else, to be parsed as SAN or UCI.
    Move(String),
}

impl Command {
    pub fn parse(line: &str) -> Command {
        let text = line.trim();
        if text.eq_ignore_ascii_case("undo") {
            Command::Undo
        } else if text.eq_ignore_ascii_case("end") {
            Command::End
        } else {
            Command::Move(text.to_string())
        }
    }
}

/// A source of input lines. `Ok(None)` means the input is exhausted.
pub trait LineSource {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>, GameError>;
}

/// Prompts on stdout and reads from stdin.
#[derive(Debug, Default)]
pub struct StdinSource;

impl LineSource for StdinSource {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>, GameError> {
        let mut stdout = io::stdout();
        write!(stdout, "{prompt}")?;
        stdout.flush()?;

        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end().to_string()))
    }
}

/// Replays a fixed list of lines, then reports end of input.
#[derive(Debug, Default)]
pub struct ScriptedSource {
    lines: VecDeque<String>,
    prompts: Vec<String>,
}

impl ScriptedSource {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            prompts: Vec::new(),
        }
    }

    /// Prompts shown so far, in order.
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    pub fn remaining(&self) -> usize {
        self.lines.len()
    }
}

impl LineSource for ScriptedSource {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>, GameError> {
        self.prompts.push(prompt.to_string());
        Ok(self.lines.pop_front())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_are_case_insensitive() {
        assert_eq!(Command::parse("undo"), Command::Undo);
        assert_eq!(Command::parse("UnDo"), Command::Undo);
        assert_eq!(Command::parse(" END \n"), Command::End);
        assert_eq!(Command::parse("e2e4"), Command::Move("e2e4".into()));
        assert_eq!(Command::parse("Nf3"), Command::Move("Nf3".into()));
        assert_eq!(Command::parse("endgame"), Command::Move("endgame".into()));
    }

    #[test]
    fn scripted_source_runs_dry() {
        let mut source = ScriptedSource::new(["a", "b"]);
        assert_eq!(source.read_line("1? ").unwrap(), Some("a".into()));
        assert_eq!(source.read_line("2? ").unwrap(), Some("b".into()));
        assert_eq!(source.read_line("3? ").unwrap(), None);
        assert_eq!(source.prompts(), ["1? ", "2? ", "3? "]);
        assert_eq!(source.remaining(), 0);
    }
}
