//! Turn-keeping game facade over the rules functions.

use tracing::{debug, info};

use crate::apply::apply_move;
use crate::board::Board;
use crate::legality::generate_legal_moves;
use crate::status::evaluate_status;
use crate::types::{
    ChessError, Color, Move, Piece, PieceType, Square, Status, PIECES_CAN_PROMOTE_TO,
};

/// A live game: the authoritative board, whose turn it is, and the moves
/// played so far. This is the surface a front-end talks to; it holds no
/// rules of its own beyond turn order.
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    side_to_move: Color,
    moves: Vec<Move>,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            side_to_move: Color::White,
            moves: Vec::new(),
        }
    }

    pub fn new_from_fen(fen: &str) -> Result<Self, ChessError> {
        let (board, side_to_move) = Board::from_fen(fen)?;
        Ok(Self {
            board,
            side_to_move,
            moves: Vec::new(),
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    /// Moves played since the start position, oldest first.
    pub fn history(&self) -> &[Move] {
        &self.moves
    }

    pub fn fen(&self) -> String {
        self.board.to_fen(self.side_to_move)
    }

    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.board.piece_at(sq)
    }

    /// Legal moves of the piece on `from`, whichever side it belongs to.
    pub fn legal_moves(&self, from: Square) -> Vec<Move> {
        generate_legal_moves(&self.board, from)
    }

    pub fn status(&self) -> Status {
        evaluate_status(&self.board, self.side_to_move)
    }

    /// Whether moving the piece on `from` to `to` is a pawn reaching its
    /// last rank, i.e. whether the front-end should ask for a promotion piece.
    pub fn is_promotion(&self, from: Square, to: Square) -> bool {
        self.board
            .piece_at(from)
            .is_some_and(|p| p.piece_type == PieceType::Pawn && to.rank == p.color.promotion_rank())
    }

    /// Play the side to move's piece from `from` to `to` and hand the turn over.
    ///
    /// The move has to be one of [`Game::legal_moves`]. A pawn reaching its
    /// last rank becomes `promotion`, or a queen when none is given or the
    /// choice is a king or pawn.
    /// Returns the status of the position for the new side to move.
    pub fn play_move(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<PieceType>,
    ) -> Result<Status, ChessError> {
        let own_piece = self
            .board
            .piece_at(from)
            .is_some_and(|p| p.color == self.side_to_move);
        let found = if own_piece {
            self.legal_moves(from).into_iter().find(|m| m.to == to)
        } else {
            None
        };

        let Some(mut mv) = found else {
            let status = self.status();
            if status.is_game_over() {
                return Err(ChessError::GameOver(status));
            }
            return Err(ChessError::IllegalMove { from, to });
        };

        if self.is_promotion(from, to) {
            let promotion = promotion
                .filter(|pt| PIECES_CAN_PROMOTE_TO.contains(pt))
                .unwrap_or(PieceType::Queen);
            mv = mv.with_promotion(promotion);
        }

        apply_move(&mut self.board, &mv, true)?;
        self.moves.push(mv);
        self.side_to_move = self.side_to_move.other_color();

        let status = self.status();
        match status {
            Status::Checkmate => info!(
                winner = self.side_to_move.other_color().to_human(),
                moves = self.moves.len(),
                "checkmate"
            ),
            Status::Stalemate => info!(moves = self.moves.len(), "stalemate"),
            Status::Check | Status::None => {
                debug!(side = self.side_to_move.to_human(), %status, "turn passed")
            }
        }
        Ok(status)
    }

    /// Moves in coordinate notation, numbered by full move.
    pub fn move_list(&self) -> String {
        let mut list = String::new();
        for (i, m) in self.moves.iter().enumerate() {
            if i % 2 == 0 {
                if i > 0 {
                    list.push(' ');
                }
                list.push_str(&format!("{}. ", (i + 2) / 2));
            } else {
                list.push(' ');
            }
            list.push_str(&m.to_algebraic());
        }
        list
    }
}
