use std::fmt;

use crate::{PieceType, Square};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveType {
    Normal,
    /// Pawn advancing two squares from its starting rank.
    DoublePush,
    Capture,
    EnPassant,
    Castle,
}

/// A move as produced by the move generator. Moves are only meaningful
/// for the board that generated them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub move_type: MoveType,
    pub promotion: Option<PieceType>,
}

impl Move {
    pub fn new(from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            move_type: MoveType::Normal,
            promotion: None,
        }
    }

    pub fn with_type(from: Square, to: Square, move_type: MoveType) -> Self {
        Self {
            from,
            to,
            move_type,
            promotion: None,
        }
    }

    pub fn with_promotion(from: Square, to: Square, move_type: MoveType, promotion: PieceType) -> Self {
        Self {
            from,
            to,
            move_type,
            promotion: Some(promotion),
        }
    }

    pub fn castle(from: Square, to: Square) -> Self {
        Self::with_type(from, to, MoveType::Castle)
    }

    pub fn is_capture(&self) -> bool {
        matches!(self.move_type, MoveType::Capture | MoveType::EnPassant)
    }

    /// Long algebraic form, e.g. `e2e4` or `e7e8q`.
    pub fn to_uci(&self) -> String {
        let mut s = format!("{}{}", self.from, self.to);
        if let Some(promotion) = self.promotion {
            s.push(promotion.symbol());
        }
        s
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_uci())
    }
}
