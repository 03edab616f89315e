pub mod types;
pub mod board;
pub mod movegen;
pub mod apply;
pub mod legality;
pub mod status;
pub mod game;
pub mod perft;

pub use apply::apply_move;
pub use board::Board;
pub use game::Game;
pub use legality::{all_legal_moves, generate_legal_moves};
pub use movegen::generate_raw_moves;
pub use status::evaluate_status;
pub use types::{ChessError, Color, Move, Piece, PieceType, SpecialMove, Square, Status};
