//! Text formats: FEN for positions, UCI and SAN for moves.

use crate::board::CastlingRights;
use crate::{Board, BoardError, Color, Move, MoveType, Piece, PieceType, Square};

pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Characters that may appear in a SAN move after suffixes are stripped.
const SAN_CHARS: &str = "KQRBNabcdefgh12345678xO-=";

impl Board {
    pub fn from_fen(fen: &str) -> Result<Self, BoardError> {
        let invalid = |why: &str| BoardError::InvalidFen(format!("{why} in '{fen}'"));

        let parts: Vec<&str> = fen.split_whitespace().collect();
        if parts.len() < 4 {
            return Err(invalid("expected at least 4 fields"));
        }

        let mut squares = [None; 64];
        let ranks: Vec<&str> = parts[0].split('/').collect();
        if ranks.len() != 8 {
            return Err(invalid("expected 8 ranks"));
        }
        for (i, rank_str) in ranks.iter().enumerate() {
            let rank = 7 - i as u8;
            let mut file = 0u8;
            for ch in rank_str.chars() {
                if let Some(skip) = ch.to_digit(10) {
                    if skip == 0 || skip > 8 {
                        return Err(invalid("bad empty-square count"));
                    }
                    file += skip as u8;
                } else {
                    let piece = Piece::from_symbol(ch).ok_or_else(|| invalid("bad piece letter"))?;
                    let sq = Square::from_coords(file, rank).ok_or_else(|| invalid("rank too long"))?;
                    squares[sq.index()] = Some(piece);
                    file += 1;
                }
                if file > 8 {
                    return Err(invalid("rank too long"));
                }
            }
            if file != 8 {
                return Err(invalid("rank too short"));
            }
        }

        let turn = match parts[1] {
            "w" => Color::White,
            "b" => Color::Black,
            _ => return Err(invalid("bad side to move")),
        };

        let mut castling = CastlingRights::none();
        if parts[2] != "-" {
            for c in parts[2].chars() {
                match c {
                    'K' => castling.white_kingside = true,
                    'Q' => castling.white_queenside = true,
                    'k' => castling.black_kingside = true,
                    'q' => castling.black_queenside = true,
                    _ => return Err(invalid("bad castling field")),
                }
            }
        }

        let ep_square = match parts[3] {
            "-" => None,
            s => Some(Square::from_algebraic(s).ok_or_else(|| invalid("bad en passant square"))?),
        };

        let halfmove_clock = match parts.get(4) {
            Some(s) => s.parse().map_err(|_| invalid("bad halfmove clock"))?,
            None => 0,
        };
        let fullmove_number = match parts.get(5) {
            Some(s) => s.parse().map_err(|_| invalid("bad fullmove number"))?,
            None => 1,
        };

        Ok(Board::from_parts(
            squares,
            turn,
            castling,
            ep_square,
            halfmove_clock,
            fullmove_number,
        ))
    }

    pub fn to_fen(&self) -> String {
        let mut fen = String::with_capacity(90);
        for rank in (0..8).rev() {
            let mut empty = 0;
            for file in 0..8 {
                let piece = Square::from_coords(file, rank).and_then(|sq| self.piece_at(sq));
                match piece {
                    Some(p) => {
                        if empty > 0 {
                            fen.push_str(&empty.to_string());
                            empty = 0;
                        }
                        fen.push(p.symbol());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                fen.push_str(&empty.to_string());
            }
            if rank > 0 {
                fen.push('/');
            }
        }

        fen.push(' ');
        fen.push(match self.turn() {
            Color::White => 'w',
            Color::Black => 'b',
        });

        let rights = self.castling_rights();
        let mut castling = String::new();
        for (flag, c) in [
            (rights.white_kingside, 'K'),
            (rights.white_queenside, 'Q'),
            (rights.black_kingside, 'k'),
            (rights.black_queenside, 'q'),
        ] {
            if flag {
                castling.push(c);
            }
        }
        if castling.is_empty() {
            castling.push('-');
        }

        let ep = self
            .ep_square()
            .map_or_else(|| "-".to_string(), |sq| sq.to_string());

        format!(
            "{fen} {castling} {ep} {} {}",
            self.halfmove_clock(),
            self.fullmove_number()
        )
    }

    /// Resolves long algebraic text (`e2e4`, `e7e8q`) to a legal move.
    pub fn parse_uci(&self, text: &str) -> Result<Move, BoardError> {
        let text = text.trim();
        let invalid = || BoardError::InvalidMove(text.to_string());
        if !text.is_ascii() || !(4..=5).contains(&text.len()) {
            return Err(invalid());
        }

        let from = Square::from_algebraic(&text[0..2]).ok_or_else(invalid)?;
        let to = Square::from_algebraic(&text[2..4]).ok_or_else(invalid)?;
        let promotion = match text[4..].chars().next() {
            None => None,
            Some(c) => Some(
                PieceType::from_symbol(c)
                    .filter(|kind| PieceType::PROMOTIONS.contains(kind))
                    .ok_or_else(invalid)?,
            ),
        };

        self.legal_moves()
            .into_iter()
            .find(|m| m.from == from && m.to == to && m.promotion == promotion)
            .ok_or_else(|| BoardError::IllegalMove(text.to_string()))
    }

    /// Standard algebraic notation for a legal move, with `+`/`#` suffix.
    pub fn san(&self, mv: Move) -> String {
        let mut san = self.san_body(mv);
        let mut after = self.clone();
        after.push(mv);
        if after.is_checkmate() {
            san.push('#');
        } else if after.is_check() {
            san.push('+');
        }
        san
    }

    fn san_body(&self, mv: Move) -> String {
        if mv.move_type == MoveType::Castle {
            let castle = if mv.to.file() == 6 { "O-O" } else { "O-O-O" };
            return castle.to_string();
        }

        let piece_type = self.piece_type_at(mv.from).unwrap_or(PieceType::Pawn);
        let mut san = String::new();

        if piece_type == PieceType::Pawn {
            if mv.is_capture() {
                san.push(mv.from.file_char());
            }
        } else {
            san.push(piece_type.symbol().to_ascii_uppercase());

            let rivals: Vec<Square> = self
                .legal_moves()
                .into_iter()
                .filter(|m| {
                    m.to == mv.to
                        && m.from != mv.from
                        && self.piece_type_at(m.from) == Some(piece_type)
                })
                .map(|m| m.from)
                .collect();
            if !rivals.is_empty() {
                let shares_file = rivals.iter().any(|sq| sq.file() == mv.from.file());
                let shares_rank = rivals.iter().any(|sq| sq.rank() == mv.from.rank());
                if !shares_file {
                    san.push(mv.from.file_char());
                } else if !shares_rank {
                    san.push(mv.from.rank_char());
                } else {
                    san.push(mv.from.file_char());
                    san.push(mv.from.rank_char());
                }
            }
        }

        if mv.is_capture() {
            san.push('x');
        }
        san.push_str(&mv.to.to_string());
        if let Some(promotion) = mv.promotion {
            san.push('=');
            san.push(promotion.symbol().to_ascii_uppercase());
        }
        san
    }

    /// Resolves SAN text (`Nf3`, `exd5`, `O-O`, `e8=Q+`) to a legal move.
    /// Check and annotation suffixes are ignored; `0-0` is read as `O-O`.
    pub fn parse_san(&self, text: &str) -> Result<Move, BoardError> {
        let wanted = text
            .trim()
            .trim_end_matches(['+', '#', '!', '?'])
            .replace('0', "O");
        if wanted.is_empty() || !wanted.chars().all(|c| SAN_CHARS.contains(c)) {
            return Err(BoardError::InvalidMove(text.to_string()));
        }

        let mut matches = self
            .legal_moves()
            .into_iter()
            .filter(|&m| self.san_body(m) == wanted);
        match (matches.next(), matches.next()) {
            (Some(mv), None) => Ok(mv),
            (Some(_), Some(_)) => Err(BoardError::AmbiguousMove(text.to_string())),
            (None, _) => Err(BoardError::IllegalMove(text.to_string())),
        }
    }

    /// Accepts either UCI or SAN text.
    pub fn parse_move(&self, text: &str) -> Result<Move, BoardError> {
        let trimmed = text.trim();
        let looks_like_uci = trimmed.is_ascii()
            && (4..=5).contains(&trimmed.len())
            && Square::from_algebraic(&trimmed[0..2]).is_some()
            && Square::from_algebraic(&trimmed[2..4]).is_some();
        if looks_like_uci {
            self.parse_uci(trimmed)
        } else {
            self.parse_san(trimmed)
        }
    }
}
