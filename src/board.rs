//! Mailbox board state: an 8x8 grid of optional pieces plus the
//! en-passant target and the move counters.

use itertools::{iproduct, Itertools};
use once_cell::sync::Lazy;

use crate::movegen::generate_raw_moves;
use crate::types::{ChessError, Color, Piece, PieceType, Square};

pub const STARTING_POSITION_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

static STARTING_BOARD: Lazy<Board> = Lazy::new(|| {
    Board::from_fen(STARTING_POSITION_FEN)
        .map(|(board, _)| board)
        .expect("starting FEN is always valid")
});

/// File the king starts on.
pub const KING_HOME_FILE: u8 = 4;
pub const KINGSIDE_ROOK_FILE: u8 = 7;
pub const QUEENSIDE_ROOK_FILE: u8 = 0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    /// Indexed as `grid[rank][file]`
    grid: [[Option<Piece>; 8]; 8],
    /// Square a pawn skipped over on the previous half-move, if it double pushed
    pub en_passant_target: Option<Square>,
    // number of half moves since last capture or pawn advance
    pub halfmove_clock: u32,
    // Starts at 1, and gets incremented after every black move
    pub fullmove_number: u32,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// The standard initial placement.
    pub fn new() -> Self {
        STARTING_BOARD.clone()
    }

    pub fn empty() -> Self {
        Board {
            grid: [[None; 8]; 8],
            en_passant_target: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    /// Build a board from a FEN string, returning it with the side to move.
    ///
    /// The castling field is translated into `has_moved` flags: a king or rook
    /// on its home square counts as unmoved only if a matching right is listed.
    pub fn from_fen(fen_string: &str) -> Result<(Board, Color), ChessError> {
        let invalid = || ChessError::InvalidFen(fen_string.to_string());

        let parts: Vec<&str> = fen_string.split_whitespace().collect();
        if parts.len() != 6 {
            return Err(invalid());
        }

        let mut board = Board::empty();
        let mut rank: i8 = 7;
        let mut file: i8 = 0;
        for piece_char in parts[0].chars() {
            if let Some(digit) = piece_char.to_digit(10) {
                if digit == 0 {
                    return Err(invalid());
                }
                file += digit as i8;
            } else if piece_char == '/' {
                if file != 8 {
                    return Err(invalid());
                }
                rank -= 1;
                file = 0;
            } else {
                let piece = Piece::from_fen_char(piece_char).ok_or_else(invalid)?;
                let sq = Square::try_new(rank, file).ok_or_else(invalid)?;
                board.set(sq, Some(piece));
                file += 1;
            }
            if file > 8 {
                return Err(invalid());
            }
        }
        if rank != 0 || file != 8 {
            return Err(invalid());
        }

        let active_color = parts[1]
            .chars()
            .next()
            .filter(|_| parts[1].len() == 1)
            .and_then(Color::from_char)
            .ok_or_else(invalid)?;

        let castling = parts[2];
        if castling != "-" && !castling.chars().all(|c| "KQkq".contains(c)) {
            return Err(invalid());
        }
        if castling.chars().duplicates().next().is_some() {
            return Err(invalid());
        }
        board.mark_moved_from_castling(castling);

        board.en_passant_target = match parts[3] {
            "-" => None,
            sq => Some(Square::from_algebraic(sq).map_err(|_| invalid())?),
        };
        board.halfmove_clock = parts[4].parse().map_err(|_| invalid())?;
        board.fullmove_number = parts[5].parse().map_err(|_| invalid())?;
        if board.fullmove_number == 0 {
            return Err(invalid());
        }

        Ok((board, active_color))
    }

    fn mark_moved_from_castling(&mut self, castling: &str) {
        for (sq, piece) in self.grid_mut() {
            let Some(piece) = piece else { continue };
            let home_rank = piece.color.back_rank();
            let (kingside, queenside) = match piece.color {
                Color::White => (castling.contains('K'), castling.contains('Q')),
                Color::Black => (castling.contains('k'), castling.contains('q')),
            };
            piece.has_moved = match piece.piece_type {
                PieceType::Pawn => sq.rank != piece.color.pawn_starting_rank(),
                PieceType::King => {
                    !(sq.rank == home_rank && sq.file == KING_HOME_FILE && (kingside || queenside))
                }
                PieceType::Rook => {
                    let unmoved_kingside = kingside && sq.file == KINGSIDE_ROOK_FILE;
                    let unmoved_queenside = queenside && sq.file == QUEENSIDE_ROOK_FILE;
                    !(sq.rank == home_rank && (unmoved_kingside || unmoved_queenside))
                }
                _ => false,
            };
        }
    }

    pub fn to_fen(&self, side_to_move: Color) -> String {
        let mut placement = String::new();
        for rank in (0..8).rev() {
            let mut empty = 0;
            for file in 0..8 {
                match self.grid[rank][file] {
                    Some(piece) => {
                        if empty > 0 {
                            placement.push_str(&empty.to_string());
                            empty = 0;
                        }
                        placement.push(piece.to_fen_char());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                placement.push_str(&empty.to_string());
            }
            if rank > 0 {
                placement.push('/');
            }
        }

        let mut castling = String::new();
        for color in [Color::White, Color::Black] {
            for (rook_file, letter) in [(KINGSIDE_ROOK_FILE, 'K'), (QUEENSIDE_ROOK_FILE, 'Q')] {
                if self.castling_pieces_unmoved(color, rook_file) {
                    castling.push(match color {
                        Color::White => letter,
                        Color::Black => letter.to_ascii_lowercase(),
                    });
                }
            }
        }
        if castling.is_empty() {
            castling.push('-');
        }

        let en_passant = self
            .en_passant_target
            .map(|sq| sq.to_algebraic())
            .unwrap_or_else(|| "-".to_string());
        let active = match side_to_move {
            Color::White => 'w',
            Color::Black => 'b',
        };

        format!(
            "{placement} {active} {castling} {en_passant} {} {}",
            self.halfmove_clock, self.fullmove_number
        )
    }

    /// King on its home square and the rook in the given corner, neither moved.
    pub(crate) fn castling_pieces_unmoved(&self, color: Color, rook_file: u8) -> bool {
        let rank = color.back_rank();
        let is_unmoved = |file: u8, piece_type: PieceType| {
            self.piece_at(Square::new(rank, file))
                .is_some_and(|p| p.color == color && p.piece_type == piece_type && !p.has_moved)
        };
        is_unmoved(KING_HOME_FILE, PieceType::King) && is_unmoved(rook_file, PieceType::Rook)
    }

    /// Piece at signed coordinates. Off-board coordinates read as empty.
    pub fn get(&self, rank: i8, file: i8) -> Option<Piece> {
        Square::try_new(rank, file).and_then(|sq| self.piece_at(sq))
    }

    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.grid[sq.rank as usize][sq.file as usize]
    }

    pub(crate) fn piece_at_mut(&mut self, sq: Square) -> Option<&mut Piece> {
        self.grid[sq.rank as usize][sq.file as usize].as_mut()
    }

    pub fn set(&mut self, sq: Square, piece: Option<Piece>) {
        self.grid[sq.rank as usize][sq.file as usize] = piece;
    }

    /// Remove and return the piece on `sq`.
    pub(crate) fn take(&mut self, sq: Square) -> Option<Piece> {
        self.grid[sq.rank as usize][sq.file as usize].take()
    }

    /// All 64 squares, rank by rank from a1.
    pub fn squares() -> impl Iterator<Item = Square> {
        iproduct!(0..8u8, 0..8u8).map(|(rank, file)| Square { rank, file })
    }

    /// Every occupied square holding a piece of `color`.
    pub fn pieces(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Board::squares().filter_map(move |sq| {
            self.piece_at(sq)
                .filter(|p| p.color == color)
                .map(|p| (sq, p))
        })
    }

    fn grid_mut(&mut self) -> impl Iterator<Item = (Square, &mut Option<Piece>)> + '_ {
        self.grid.iter_mut().enumerate().flat_map(|(rank, row)| {
            row.iter_mut()
                .enumerate()
                .map(move |(file, cell)| (Square::new(rank as u8, file as u8), cell))
        })
    }

    /// Location of `color`'s king. Reachable positions always have one.
    pub fn find_king(&self, color: Color) -> Option<Square> {
        self.pieces(color)
            .find(|(_, p)| p.piece_type == PieceType::King)
            .map(|(sq, _)| sq)
    }

    /// Whether any piece of `by_color` threatens `sq`.
    ///
    /// Brute force: generates the attack-mode moves of every piece of that
    /// color and looks for one landing on `sq`.
    pub fn is_attacked(&self, sq: Square, by_color: Color) -> bool {
        self.pieces(by_color).any(|(from, _)| {
            generate_raw_moves(self, from, true)
                .iter()
                .any(|m| m.to == sq)
        })
    }

    /// Text diagram with rank 8 on top.
    pub fn draw_board(&self, unicode: bool) -> String {
        let mut string = String::new();
        for rank in (0..8).rev() {
            string.push((b'1' + rank) as char);
            for file in 0..8 {
                string.push(' ');
                match self.piece_at(Square::new(rank, file)) {
                    Some(p) if unicode => string.push_str(p.to_symbol()),
                    Some(p) => string.push(p.to_fen_char()),
                    None => string.push('.'),
                }
            }
            string.push('\n');
        }
        string.push_str("  a b c d e f g h\n");
        string
    }
}
