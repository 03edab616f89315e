//! Check, checkmate and stalemate detection.

use tracing::debug;

use crate::board::Board;
use crate::legality::has_legal_move;
use crate::types::{Color, Status};

/// Classify the position for `side_to_move`.
///
/// | king attacked | any legal move | status    |
/// | ------------- | -------------- | --------- |
/// | yes           | no             | checkmate |
/// | no            | no             | stalemate |
/// | yes           | yes            | check     |
/// | no            | yes            | none      |
pub fn evaluate_status(board: &Board, side_to_move: Color) -> Status {
    let in_check = is_in_check(board, side_to_move);
    let any_legal = has_legal_move(board, side_to_move);

    let status = match (in_check, any_legal) {
        (true, false) => Status::Checkmate,
        (false, false) => Status::Stalemate,
        (true, true) => Status::Check,
        (false, true) => Status::None,
    };
    if status != Status::None {
        debug!(side = side_to_move.to_human(), %status, "position status");
    }
    status
}

/// Whether `color`'s king is attacked. A board without that king is never in check.
pub fn is_in_check(board: &Board, color: Color) -> bool {
    board
        .find_king(color)
        .is_some_and(|king| board.is_attacked(king, color.other_color()))
}
