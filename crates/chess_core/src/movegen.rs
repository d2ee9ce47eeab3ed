//! Legal move generation on the 64-square mailbox.
//!
//! Pseudo-legal moves are generated per piece, then filtered by playing
//! each one on a scratch copy of the placement and checking that the
//! mover's king is not left attacked.

use once_cell::sync::Lazy;

use crate::board::apply_move;
use crate::{Board, Color, Move, MoveType, Piece, PieceType, Square};

const KNIGHT_DELTAS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (-1, 2),
    (-2, 1),
    (1, -2),
    (2, -1),
    (-1, -2),
    (-2, -1),
];

const KING_DELTAS: [(i8, i8); 8] = [
    (1, 1),
    (1, 0),
    (1, -1),
    (0, 1),
    (0, -1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
];

const ROOK_DIRECTIONS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

static KNIGHT_TARGETS: Lazy<[Vec<Square>; 64]> = Lazy::new(|| step_targets(&KNIGHT_DELTAS));
static KING_TARGETS: Lazy<[Vec<Square>; 64]> = Lazy::new(|| step_targets(&KING_DELTAS));

fn step_targets(deltas: &[(i8, i8)]) -> [Vec<Square>; 64] {
    std::array::from_fn(|i| {
        let from = Square::new(i as u8).unwrap_or(Square::A1);
        deltas
            .iter()
            .filter_map(|&(df, dr)| from.offset(df, dr))
            .collect()
    })
}

pub(crate) fn king_square(squares: &[Option<Piece>; 64], color: Color) -> Option<Square> {
    let king = Some(Piece::new(PieceType::King, color));
    Square::all().find(|sq| squares[sq.index()] == king)
}

/// True if any piece of `by` attacks `target` on this placement.
pub(crate) fn is_attacked(squares: &[Option<Piece>; 64], target: Square, by: Color) -> bool {
    let holds = |sq: Square, kind: PieceType| squares[sq.index()] == Some(Piece::new(kind, by));

    // A pawn of `by` attacks diagonally forward, so look one rank behind the target.
    let behind = -by.pawn_direction();
    for df in [-1, 1] {
        if let Some(sq) = target.offset(df, behind) {
            if holds(sq, PieceType::Pawn) {
                return true;
            }
        }
    }

    if KNIGHT_TARGETS[target.index()]
        .iter()
        .any(|&sq| holds(sq, PieceType::Knight))
    {
        return true;
    }
    if KING_TARGETS[target.index()]
        .iter()
        .any(|&sq| holds(sq, PieceType::King))
    {
        return true;
    }

    let slider_hits = |directions: &[(i8, i8)], kind: PieceType| {
        directions.iter().any(|&(df, dr)| {
            let mut cur = target.offset(df, dr);
            while let Some(sq) = cur {
                if let Some(piece) = squares[sq.index()] {
                    return piece.color == by
                        && (piece.piece_type == kind || piece.piece_type == PieceType::Queen);
                }
                cur = sq.offset(df, dr);
            }
            false
        })
    };

    slider_hits(&ROOK_DIRECTIONS, PieceType::Rook) || slider_hits(&BISHOP_DIRECTIONS, PieceType::Bishop)
}

pub(crate) fn legal_moves(board: &Board) -> Vec<Move> {
    let mut moves = Vec::with_capacity(64);
    pseudo_legal_moves(board, &mut moves);

    let mover = board.turn;
    moves.retain(|&mv| {
        let mut scratch = board.squares;
        apply_move(&mut scratch, mv);
        match king_square(&scratch, mover) {
            Some(king) => !is_attacked(&scratch, king, mover.opposite()),
            None => true,
        }
    });
    moves
}

fn pseudo_legal_moves(board: &Board, out: &mut Vec<Move>) {
    for from in Square::all() {
        let piece = match board.squares[from.index()] {
            Some(p) if p.color == board.turn => p,
            _ => continue,
        };
        match piece.piece_type {
            PieceType::Pawn => gen_pawn(board, from, piece.color, out),
            PieceType::Knight => gen_steps(board, from, piece.color, &KNIGHT_TARGETS[from.index()], out),
            PieceType::Bishop => gen_slider(board, from, piece.color, &BISHOP_DIRECTIONS, out),
            PieceType::Rook => gen_slider(board, from, piece.color, &ROOK_DIRECTIONS, out),
            PieceType::Queen => {
                gen_slider(board, from, piece.color, &ROOK_DIRECTIONS, out);
                gen_slider(board, from, piece.color, &BISHOP_DIRECTIONS, out);
            }
            PieceType::King => {
                gen_steps(board, from, piece.color, &KING_TARGETS[from.index()], out);
                gen_castles(board, from, piece.color, out);
            }
        }
    }
}

fn push_pawn_move(from: Square, to: Square, move_type: MoveType, out: &mut Vec<Move>) {
    if to.rank() == 0 || to.rank() == 7 {
        for kind in PieceType::PROMOTIONS {
            out.push(Move::with_promotion(from, to, move_type, kind));
        }
    } else {
        out.push(Move::with_type(from, to, move_type));
    }
}

fn gen_pawn(board: &Board, from: Square, color: Color, out: &mut Vec<Move>) {
    let dir = color.pawn_direction();
    let start_rank = match color {
        Color::White => 1,
        Color::Black => 6,
    };

    if let Some(one) = from.offset(0, dir) {
        if board.piece_at(one).is_none() {
            push_pawn_move(from, one, MoveType::Normal, out);
            if from.rank() == start_rank {
                if let Some(two) = from.offset(0, 2 * dir) {
                    if board.piece_at(two).is_none() {
                        out.push(Move::with_type(from, two, MoveType::DoublePush));
                    }
                }
            }
        }
    }

    for df in [-1, 1] {
        let Some(to) = from.offset(df, dir) else {
            continue;
        };
        match board.piece_at(to) {
            Some(target) if target.color != color => {
                push_pawn_move(from, to, MoveType::Capture, out)
            }
            None if board.ep_square == Some(to) => {
                out.push(Move::with_type(from, to, MoveType::EnPassant))
            }
            _ => {}
        }
    }
}

fn gen_steps(board: &Board, from: Square, color: Color, targets: &[Square], out: &mut Vec<Move>) {
    for &to in targets {
        match board.piece_at(to) {
            None => out.push(Move::new(from, to)),
            Some(p) if p.color != color => out.push(Move::with_type(from, to, MoveType::Capture)),
            _ => {}
        }
    }
}

fn gen_slider(board: &Board, from: Square, color: Color, directions: &[(i8, i8)], out: &mut Vec<Move>) {
    for &(df, dr) in directions {
        let mut cur = from.offset(df, dr);
        while let Some(to) = cur {
            match board.piece_at(to) {
                None => out.push(Move::new(from, to)),
                Some(p) => {
                    if p.color != color {
                        out.push(Move::with_type(from, to, MoveType::Capture));
                    }
                    break;
                }
            }
            cur = to.offset(df, dr);
        }
    }
}

fn gen_castles(board: &Board, from: Square, color: Color, out: &mut Vec<Move>) {
    let rank = color.back_rank();
    let square = |file: u8| Square::from_coords(file, rank);
    if Some(from) != square(4) {
        return;
    }

    let enemy = color.opposite();
    if is_attacked(&board.squares, from, enemy) {
        return;
    }

    let rook = Some(Piece::new(PieceType::Rook, color));
    let empty = |files: &[u8]| {
        files
            .iter()
            .all(|&f| square(f).map_or(false, |sq| board.piece_at(sq).is_none()))
    };
    let safe = |files: &[u8]| {
        files
            .iter()
            .all(|&f| square(f).map_or(false, |sq| !is_attacked(&board.squares, sq, enemy)))
    };

    if board.castling.kingside(color)
        && square(7).and_then(|sq| board.piece_at(sq)) == rook
        && empty(&[5, 6])
        && safe(&[5, 6])
    {
        if let Some(to) = square(6) {
            out.push(Move::castle(from, to));
        }
    }
    if board.castling.queenside(color)
        && square(0).and_then(|sq| board.piece_at(sq)) == rook
        && empty(&[1, 2, 3])
        && safe(&[2, 3])
    {
        if let Some(to) = square(2) {
            out.push(Move::castle(from, to));
        }
    }
}
