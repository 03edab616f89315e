//! Reducing pseudo-legal moves to legal ones.

use tracing::trace;

use crate::apply::apply_move;
use crate::board::Board;
use crate::movegen::generate_raw_moves;
use crate::types::{Color, Move, Square};

/// Legal moves of the piece on `from`: the pseudo-legal ones that do not
/// leave its own king attacked.
///
/// Each candidate is played on a private copy of the board in probe mode and
/// kept if the mover's king is safe there. The board passed in is never
/// modified.
pub fn generate_legal_moves(board: &Board, from: Square) -> Vec<Move> {
    let Some(piece) = board.piece_at(from) else {
        return vec![];
    };
    let opponent = piece.color.other_color();

    let moves: Vec<Move> = generate_raw_moves(board, from, false)
        .into_iter()
        .filter(|m| {
            let mut probe = board.clone();
            if apply_move(&mut probe, m, false).is_err() {
                return false;
            }
            probe
                .find_king(piece.color)
                .is_some_and(|king| !probe.is_attacked(king, opponent))
        })
        .collect();

    trace!(square = %from, count = moves.len(), "legal moves");
    moves
}

/// Legal moves of every piece of `color`.
pub fn all_legal_moves(board: &Board, color: Color) -> Vec<Move> {
    board
        .pieces(color)
        .flat_map(|(sq, _)| generate_legal_moves(board, sq))
        .collect()
}

/// Whether `color` has at least one legal move. Stops at the first one found.
pub fn has_legal_move(board: &Board, color: Color) -> bool {
    board
        .pieces(color)
        .any(|(sq, _)| !generate_legal_moves(board, sq).is_empty())
}
