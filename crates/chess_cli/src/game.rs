use std::io::Write;

use chess_core::{Board, Color, Move, Outcome};
use chess_engine::{ChessAI, EngineConfig, SearchOutcome};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::error::GameError;
use crate::input::{Command, LineSource};
use crate::render::BoardSink;

/// Who makes the moves for the human's colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayMode {
    /// Moves are typed at the prompt.
    Human,
    /// A uniformly random legal move is played.
    Crazy,
    /// The engine plays both sides.
    Bot,
}

impl PlayMode {
    /// Bot mode wins over crazy mode.
    pub fn from_flags(bot: bool, crazy: bool) -> PlayMode {
        if bot {
            PlayMode::Bot
        } else if crazy {
            PlayMode::Crazy
        } else {
            PlayMode::Human
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    pub human_color: Color,
    pub mode: PlayMode,
    pub engine: EngineConfig,
}

impl GameConfig {
    pub fn engine_plays(&self, color: Color) -> bool {
        self.mode == PlayMode::Bot || color != self.human_color
    }

    fn engine_config_for(&self, color: Color) -> EngineConfig {
        let mut config = self.engine.clone();
        if color == Color::Black {
            config.seed = config.seed.map(|seed| seed.wrapping_add(1));
        }
        config
    }
}

/// How a call to [`Game::play`] finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEnd {
    Finished(Outcome),
    /// The human typed END or the input ran out.
    Terminated,
}

enum Turn {
    Moved,
    Terminated,
}

/// One game between the human's side and the engine.
pub struct Game<L, S, W> {
    config: GameConfig,
    board: Board,
    white_engine: Option<ChessAI>,
    black_engine: Option<ChessAI>,
    rng: StdRng,
    input: L,
    sink: S,
    out: W,
}

impl<L: LineSource, S: BoardSink, W: Write> Game<L, S, W> {
    pub fn new(config: GameConfig, input: L, sink: S, out: W) -> Result<Self, GameError> {
        let engine_for = |color: Color| -> Result<Option<ChessAI>, GameError> {
            if !config.engine_plays(color) {
                return Ok(None);
            }
            Ok(Some(ChessAI::with_config(color, config.engine_config_for(color))?))
        };
        let white_engine = engine_for(Color::White)?;
        let black_engine = engine_for(Color::Black)?;
        let rng = match config.engine.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            config,
            board: Board::new(),
            white_engine,
            black_engine,
            rng,
            input,
            sink,
            out,
        })
    }

    /// Starts from `board` instead of the initial position.
    pub fn with_board(mut self, board: Board) -> Self {
        self.board = board;
        self
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn into_parts(self) -> (L, S, W) {
        (self.input, self.sink, self.out)
    }

    /// Plays until the game is decided or the human ends it. The board is
    /// reset and saved once more before returning.
    pub fn play(&mut self) -> Result<GameEnd, GameError> {
        log::info!(
            "new game: human plays {}, mode {:?}, depth {}",
            self.config.human_color,
            self.config.mode,
            self.config.engine.depth_limit
        );
        self.sink.save(&self.board)?;

        let outcome = loop {
            if let Some(outcome) = self.board.outcome() {
                break outcome;
            }
            let color = self.board.turn();
            let turn = if self.config.engine_plays(color) {
                self.engine_turn(color)?
            } else if self.config.mode == PlayMode::Crazy {
                self.crazy_turn()?
            } else {
                self.human_turn()?
            };
            if let Turn::Terminated = turn {
                return Ok(GameEnd::Terminated);
            }
        };

        self.sink.save(&self.board)?;
        log::info!("game over: {:?}", outcome);
        let verdict = match outcome.winner {
            None => "GAME OVER - Draw",
            Some(winner) if winner == self.config.human_color => "YOU WIN",
            Some(_) => "YOU LOSE",
        };
        writeln!(self.out, "{verdict}")?;

        self.board.reset();
        self.sink.save(&self.board)?;
        Ok(GameEnd::Finished(outcome))
    }

    fn engine_turn(&mut self, color: Color) -> Result<Turn, GameError> {
        let engine = match color {
            Color::White => self.white_engine.as_mut(),
            Color::Black => self.black_engine.as_mut(),
        };
        let Some(engine) = engine else {
            return Err(GameError::NoEngineMove(color));
        };

        writeln!(self.out, "the engine is thinking...")?;
        match engine.choose_move(&mut self.board) {
            SearchOutcome::BestMove { mv, .. } => {
                self.apply(mv)?;
                Ok(Turn::Moved)
            }
            SearchOutcome::NoMove { .. } => Err(GameError::NoEngineMove(color)),
        }
    }

    fn crazy_turn(&mut self) -> Result<Turn, GameError> {
        let moves = self.board.legal_moves();
        self.show_legal_moves(&moves)?;
        let Some(&mv) = moves.choose(&mut self.rng) else {
            return Ok(Turn::Moved);
        };
        log::info!("random move {}", mv.to_uci());
        writeln!(self.out, "random move: {}", mv.to_uci())?;
        self.apply(mv)?;
        Ok(Turn::Moved)
    }

    fn human_turn(&mut self) -> Result<Turn, GameError> {
        loop {
            let moves = self.board.legal_moves();
            if moves.is_empty() {
                return Ok(Turn::Moved);
            }
            self.show_legal_moves(&moves)?;

            let command = match self.input.read_line("enter your move: ")? {
                Some(line) => Command::parse(&line),
                None => Command::End,
            };

            match command {
                Command::Undo => {
                    if self.board.move_stack().len() < 2 {
                        writeln!(self.out, "no more moves to undo...")?;
                        continue;
                    }
                    self.board.pop();
                    self.board.pop();
                    log::info!("took back two plies");
                    self.sink.save(&self.board)?;
                }
                Command::End => {
                    self.board.reset();
                    self.sink.save(&self.board)?;
                    writeln!(self.out, "the game is now terminated...")?;
                    log::info!("game terminated by the player");
                    return Ok(Turn::Terminated);
                }
                Command::Move(text) => match self.board.parse_move(&text) {
                    Ok(mv) => {
                        self.apply(mv)?;
                        return Ok(Turn::Moved);
                    }
                    Err(err) => {
                        log::warn!("rejected move {text:?}: {err}");
                        writeln!(self.out, "invalid move! please try again...")?;
                    }
                },
            }
        }
    }

    fn show_legal_moves(&mut self, moves: &[Move]) -> Result<(), GameError> {
        let listing: Vec<String> = moves.iter().map(Move::to_uci).collect();
        writeln!(self.out, "enter UNDO/END to interrupt the game...")?;
        writeln!(self.out, "legal moves: {}", listing.join(" "))?;
        Ok(())
    }

    fn apply(&mut self, mv: Move) -> Result<(), GameError> {
        let san = self.board.san(mv);
        self.board.push_checked(mv)?;
        log::info!("{} played {}", self.board.turn().opposite(), san);
        self.sink.save(&self.board)
    }
}
