//! Applying a move to a board in place.

use tracing::debug;

use crate::board::{Board, KINGSIDE_ROOK_FILE, QUEENSIDE_ROOK_FILE};
use crate::types::{ChessError, Color, Move, Piece, PieceType, SpecialMove, Square};

/// Play `mv` on `board`.
///
/// The source square is always cleared and the destination receives the
/// mover, or the promoted piece when a pawn reaches its last rank with
/// `mv.promotion` set. En passant also removes the captured pawn, castling
/// also relocates the rook.
///
/// `update_flags` distinguishes the live game from a legality probe. When
/// set, the mover is marked as moved, the en-passant target is refreshed and
/// the halfmove/fullmove counters advance. When unset none of that
/// bookkeeping is touched.
///
/// The move must come from the legal moves of this board; anything else is
/// applied as given. An empty source square is rejected without changing
/// the board.
pub fn apply_move(board: &mut Board, mv: &Move, update_flags: bool) -> Result<(), ChessError> {
    let piece = board
        .piece_at(mv.from)
        .ok_or(ChessError::EmptySquare(mv.from))?;
    let is_capture = board.piece_at(mv.to).is_some() || mv.special == SpecialMove::EnPassant;

    let mut moving = match mv.promotion {
        Some(promotion)
            if piece.piece_type == PieceType::Pawn
                && mv.to.rank == piece.color.promotion_rank() =>
        {
            Piece::promoted(promotion, piece.color)
        }
        _ => piece,
    };

    match mv.special {
        SpecialMove::EnPassant => {
            // the captured pawn sits beside the mover, one rank behind `to`
            board.set(Square::new(mv.from.rank, mv.to.file), None);
        }
        SpecialMove::CastleKingside => {
            move_castling_rook(board, mv.to.rank, KINGSIDE_ROOK_FILE, mv.to.file - 1);
        }
        SpecialMove::CastleQueenside => {
            move_castling_rook(board, mv.to.rank, QUEENSIDE_ROOK_FILE, mv.to.file + 1);
        }
        SpecialMove::None | SpecialMove::DoublePush => {}
    }

    board.set(mv.from, None);
    if update_flags {
        moving.has_moved = true;
    }
    board.set(mv.to, Some(moving));

    if update_flags {
        let is_pawn = piece.piece_type == PieceType::Pawn;
        board.en_passant_target = if is_pawn && mv.from.rank.abs_diff(mv.to.rank) == 2 {
            Some(Square::new((mv.from.rank + mv.to.rank) / 2, mv.from.file))
        } else {
            None
        };
        if is_pawn || is_capture {
            board.halfmove_clock = 0;
        } else {
            board.halfmove_clock += 1;
        }
        if piece.color == Color::Black {
            board.fullmove_number += 1;
        }
        debug!(
            mv = %mv,
            color = piece.color.to_human(),
            piece = moving.piece_type.to_human(),
            capture = is_capture,
            "applied move"
        );
    }
    Ok(())
}

fn move_castling_rook(board: &mut Board, rank: u8, from_file: u8, to_file: u8) {
    if let Some(mut rook) = board.take(Square::new(rank, from_file)) {
        rook.has_moved = true;
        board.set(Square::new(rank, to_file), Some(rook));
    }
}
