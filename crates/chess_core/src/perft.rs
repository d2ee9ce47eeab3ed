use crate::Board;

/// Counts leaf nodes of the legal move tree to `depth` plies.
pub fn perft(board: &mut Board, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }
    let moves = board.legal_moves();
    if depth == 1 {
        return moves.len() as u64;
    }

    let mut nodes = 0;
    for mv in moves {
        board.push(mv);
        nodes += perft(board, depth - 1);
        board.pop();
    }
    nodes
}
