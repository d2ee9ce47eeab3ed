use std::fs;
use std::path::{Path, PathBuf};

use chess_core::{Board, Square};

use crate::error::GameError;

pub const DEFAULT_BOARD_FILE: &str = "chess_board.txt";

/// Draws the board from White's side, rank 8 at the top.
pub fn render_ascii(board: &Board) -> String {
    let mut out = String::from("  +-----------------+\n");
    for rank in (0..8u8).rev() {
        out.push((b'1' + rank) as char);
        out.push_str(" |");
        for file in 0..8u8 {
            let symbol = Square::from_coords(file, rank)
                .and_then(|sq| board.piece_at(sq))
                .map_or('.', |piece| piece.symbol());
            out.push(' ');
            out.push(symbol);
        }
        out.push_str(" |\n");
    }
    out.push_str("  +-----------------+\n");
    out.push_str("    a b c d e f g h\n");
    out
}

/// Somewhere to persist the board after every change.
pub trait BoardSink {
    fn save(&mut self, board: &Board) -> Result<(), GameError>;
}

impl<S: BoardSink + ?Sized> BoardSink for Box<S> {
    fn save(&mut self, board: &Board) -> Result<(), GameError> {
        (**self).save(board)
    }
}

/// Overwrites a text file with the diagram and FEN on every save.
#[derive(Debug, Clone)]
pub struct TextFileSink {
    path: PathBuf,
}

impl TextFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for TextFileSink {
    fn default() -> Self {
        Self::new(DEFAULT_BOARD_FILE)
    }
}

impl BoardSink for TextFileSink {
    fn save(&mut self, board: &Board) -> Result<(), GameError> {
        let contents = format!("{}\nFEN: {}\n", render_ascii(board), board.to_fen());
        fs::write(&self.path, contents)?;
        log::trace!("board saved to {}", self.path.display());
        Ok(())
    }
}

/// Discards every save.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl BoardSink for NullSink {
    fn save(&mut self, _board: &Board) -> Result<(), GameError> {
        Ok(())
    }
}
