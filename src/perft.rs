//! Move-path enumeration, used to check the move generator against
//! published node counts.

use rayon::prelude::*;

use crate::apply::apply_move;
use crate::board::Board;
use crate::legality::all_legal_moves;
use crate::types::{Color, Move, PieceType, PIECES_CAN_PROMOTE_TO};

/// Legal moves of `color` with every pawn move onto the last rank expanded
/// into one move per promotion piece, as the published tables count them.
fn expanded_moves(board: &Board, color: Color) -> Vec<Move> {
    let mut moves = Vec::new();
    for m in all_legal_moves(board, color) {
        let is_promotion = board
            .piece_at(m.from)
            .is_some_and(|p| p.piece_type == PieceType::Pawn && m.to.rank == color.promotion_rank());
        if is_promotion {
            moves.extend(PIECES_CAN_PROMOTE_TO.iter().map(|&pt| m.with_promotion(pt)));
        } else {
            moves.push(m);
        }
    }
    moves
}

fn child(board: &Board, m: &Move) -> Option<Board> {
    let mut next = board.clone();
    apply_move(&mut next, m, true).ok()?;
    Some(next)
}

/// Number of leaf nodes `depth` half-moves below `board`, `color` to move.
pub fn perft(board: &Board, color: Color, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = expanded_moves(board, color);
    if depth == 1 {
        return moves.len() as u64;
    }
    moves
        .iter()
        .filter_map(|m| child(board, m))
        .map(|next| perft(&next, color.other_color(), depth - 1))
        .sum()
}

/// Per-root-move node counts. Root moves are searched in parallel, each on
/// its own copy of the board.
pub fn divide(board: &Board, color: Color, depth: u8) -> Vec<(Move, u64)> {
    let moves = expanded_moves(board, color);
    moves
        .par_iter()
        .filter_map(|m| {
            let next = child(board, m)?;
            Some((*m, perft(&next, color.other_color(), depth.saturating_sub(1))))
        })
        .collect()
}
