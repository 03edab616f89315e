use std::fmt;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    /// Parse the FEN side-to-move field.
    pub fn from_char(c: char) -> Option<Color> {
        match c {
            'w' => Some(Color::White),
            'b' => Some(Color::Black),
            _ => None,
        }
    }

    pub fn from_case(c: char) -> Color {
        if c.is_uppercase() {
            Color::White
        } else {
            Color::Black
        }
    }

    pub fn other_color(&self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Direction pawns of this color advance in, in ranks.
    pub fn forward(&self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    /// Rank the king and rooks start on.
    pub fn back_rank(&self) -> u8 {
        match self {
            Color::White => 0,
            Color::Black => 7,
        }
    }

    pub fn pawn_starting_rank(&self) -> u8 {
        match self {
            Color::White => 1,
            Color::Black => 6,
        }
    }

    /// Rank a pawn of this color promotes on.
    pub fn promotion_rank(&self) -> u8 {
        match self {
            Color::White => 7,
            Color::Black => 0,
        }
    }

    pub fn to_human(&self) -> &str {
        match self {
            Self::White => "white",
            Self::Black => "black",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_human())
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum PieceType {
    Pawn,
    Rook,
    Knight,
    Bishop,
    Queen,
    King,
}

impl PieceType {
    pub fn from_char(c: char) -> Option<PieceType> {
        match c.to_ascii_lowercase() {
            'p' => Some(PieceType::Pawn),
            'r' => Some(PieceType::Rook),
            'n' => Some(PieceType::Knight),
            'b' => Some(PieceType::Bishop),
            'q' => Some(PieceType::Queen),
            'k' => Some(PieceType::King),
            _ => None,
        }
    }

    /// Resolve a user's promotion answer. Anything that does not name a
    /// queen, rook, bishop or knight falls back to a queen.
    pub fn from_promotion_choice(choice: &str) -> PieceType {
        let mut chars = choice.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => match PieceType::from_char(c) {
                Some(pt) if PIECES_CAN_PROMOTE_TO.contains(&pt) => pt,
                _ => PieceType::Queen,
            },
            _ => PieceType::Queen,
        }
    }

    pub fn to_human(&self) -> &str {
        match self {
            Self::Pawn => "pawn",
            Self::Rook => "rook",
            Self::Knight => "knight",
            Self::Bishop => "bishop",
            Self::Queen => "queen",
            Self::King => "king",
        }
    }

    pub fn to_char(&self) -> char {
        match self {
            Self::Pawn => 'P',
            Self::Rook => 'R',
            Self::Knight => 'N',
            Self::Bishop => 'B',
            Self::Queen => 'Q',
            Self::King => 'K',
        }
    }
}

pub const PIECES_CAN_PROMOTE_TO: [PieceType; 4] = [
    PieceType::Queen,
    PieceType::Rook,
    PieceType::Knight,
    PieceType::Bishop,
];

/// A board coordinate. Both fields are 0-based: rank 0 is White's back rank,
/// file 0 is the a-file.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Square {
    pub rank: u8,
    pub file: u8,
}

impl Square {
    pub fn new(rank: u8, file: u8) -> Self {
        debug_assert!(rank < 8 && file < 8, "square out of range: {rank},{file}");
        Square { rank, file }
    }

    /// Checked constructor for signed coordinates; `None` when off the board.
    pub fn try_new(rank: i8, file: i8) -> Option<Self> {
        if (0..8).contains(&rank) && (0..8).contains(&file) {
            Some(Square {
                rank: rank as u8,
                file: file as u8,
            })
        } else {
            None
        }
    }

    pub fn offset(&self, rank_delta: i8, file_delta: i8) -> Option<Self> {
        Square::try_new(self.rank as i8 + rank_delta, self.file as i8 + file_delta)
    }

    pub fn from_algebraic(s: &str) -> Result<Square, ChessError> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return Err(ChessError::InvalidSquare(s.to_string()));
        }
        let file = bytes[0].wrapping_sub(b'a');
        let rank = bytes[1].wrapping_sub(b'1');
        if file < 8 && rank < 8 {
            Ok(Square { rank, file })
        } else {
            Err(ChessError::InvalidSquare(s.to_string()))
        }
    }

    pub fn to_algebraic(&self) -> String {
        format!("{}{}", (b'a' + self.file) as char, (b'1' + self.rank) as char)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_algebraic())
    }
}

/// A piece as it sits on a square. Plain value: copying a board copies
/// every piece with it.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Piece {
    pub piece_type: PieceType,
    pub color: Color,
    /// Set once the piece has moved; used by castling.
    pub has_moved: bool,
}

impl Piece {
    pub fn new(piece_type: PieceType, color: Color) -> Self {
        Piece {
            piece_type,
            color,
            has_moved: false,
        }
    }

    /// The piece a pawn of `color` turns into on promotion.
    pub fn promoted(piece_type: PieceType, color: Color) -> Self {
        Piece {
            piece_type,
            color,
            has_moved: true,
        }
    }

    /// FEN letter: uppercase for white, lowercase for black.
    pub fn from_fen_char(c: char) -> Option<Piece> {
        PieceType::from_char(c).map(|pt| Piece::new(pt, Color::from_case(c)))
    }

    pub fn to_fen_char(&self) -> char {
        let c = self.piece_type.to_char();
        match self.color {
            Color::White => c,
            Color::Black => c.to_ascii_lowercase(),
        }
    }

    pub fn to_symbol(&self) -> &str {
        match (self.color, self.piece_type) {
            (Color::White, PieceType::King) => "♔",
            (Color::White, PieceType::Queen) => "♕",
            (Color::White, PieceType::Rook) => "♖",
            (Color::White, PieceType::Bishop) => "♗",
            (Color::White, PieceType::Knight) => "♘",
            (Color::White, PieceType::Pawn) => "♙",
            (Color::Black, PieceType::King) => "♚",
            (Color::Black, PieceType::Queen) => "♛",
            (Color::Black, PieceType::Rook) => "♜",
            (Color::Black, PieceType::Bishop) => "♝",
            (Color::Black, PieceType::Knight) => "♞",
            (Color::Black, PieceType::Pawn) => "♟",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialMove {
    None,
    /// Pawn advancing two squares from its starting rank
    DoublePush,
    EnPassant,
    CastleKingside,
    CastleQueenside,
}

impl SpecialMove {
    pub fn is_castle(&self) -> bool {
        matches!(self, SpecialMove::CastleKingside | SpecialMove::CastleQueenside)
    }
}

/// A move between two squares. It carries coordinates only, so the same
/// move can be applied to any copy of the board it was generated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub special: SpecialMove,
    /// Piece a pawn reaching its last rank turns into. The generator leaves
    /// this empty; the caller fills it in.
    pub promotion: Option<PieceType>,
}

impl Move {
    pub fn new(from: Square, to: Square, special: SpecialMove) -> Self {
        Self {
            from,
            to,
            special,
            promotion: None,
        }
    }

    pub fn with_promotion(self, promotion: PieceType) -> Self {
        Self {
            promotion: Some(promotion),
            ..self
        }
    }

    /// Coordinate notation, e.g. `e2e4` or `a7a8q`.
    pub fn to_algebraic(&self) -> String {
        match self.promotion {
            Some(pt) => format!(
                "{}{}{}",
                self.from,
                self.to,
                pt.to_char().to_ascii_lowercase()
            ),
            None => format!("{}{}", self.from, self.to),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_algebraic())
    }
}

/// Outcome of the position for the side to move. Derived, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    None,
    Check,
    Checkmate,
    Stalemate,
}

impl Status {
    pub fn is_game_over(&self) -> bool {
        matches!(self, Status::Checkmate | Status::Stalemate)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::None => write!(f, "none"),
            Status::Check => write!(f, "check"),
            Status::Checkmate => write!(f, "checkmate"),
            Status::Stalemate => write!(f, "stalemate"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChessError {
    #[error("no piece on {0}")]
    EmptySquare(Square),

    #[error("invalid FEN string: {0}")]
    InvalidFen(String),

    #[error("invalid square notation: {0}")]
    InvalidSquare(String),

    #[error("illegal move: {from} -> {to}")]
    IllegalMove { from: Square, to: Square },

    #[error("game is already over: {0}")]
    GameOver(Status),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_from_char() {
        assert_eq!(Color::from_char('w'), Some(Color::White));
        assert_eq!(Color::from_char('b'), Some(Color::Black));
        assert_eq!(Color::from_char('g'), None);
    }

    #[test]
    fn test_other_color() {
        assert_eq!(Color::White, Color::Black.other_color());
        assert_eq!(Color::Black, Color::White.other_color());
    }

    #[test]
    fn test_piece_type_from_char() {
        assert_eq!(PieceType::from_char('p'), Some(PieceType::Pawn));
        assert_eq!(PieceType::from_char('R'), Some(PieceType::Rook));
        assert_eq!(PieceType::from_char('n'), Some(PieceType::Knight));
        assert_eq!(PieceType::from_char('B'), Some(PieceType::Bishop));
        assert_eq!(PieceType::from_char('Q'), Some(PieceType::Queen));
        assert_eq!(PieceType::from_char('k'), Some(PieceType::King));
        assert_eq!(PieceType::from_char('x'), None);
    }

    #[test]
    fn test_promotion_choice_defaults_to_queen() {
        assert_eq!(PieceType::from_promotion_choice("R"), PieceType::Rook);
        assert_eq!(PieceType::from_promotion_choice("n"), PieceType::Knight);
        assert_eq!(PieceType::from_promotion_choice(" b\n"), PieceType::Bishop);
        assert_eq!(PieceType::from_promotion_choice("Q"), PieceType::Queen);
        // a king or pawn is not a valid choice
        assert_eq!(PieceType::from_promotion_choice("K"), PieceType::Queen);
        assert_eq!(PieceType::from_promotion_choice("p"), PieceType::Queen);
        assert_eq!(PieceType::from_promotion_choice(""), PieceType::Queen);
        assert_eq!(PieceType::from_promotion_choice("rook"), PieceType::Queen);
    }

    #[test]
    fn test_square_from_algebraic() {
        assert_eq!(Square::from_algebraic("a1"), Ok(Square::new(0, 0)));
        assert_eq!(Square::from_algebraic("h4"), Ok(Square::new(3, 7)));
        assert_eq!(Square::from_algebraic("e8").map(|s| s.to_algebraic()), Ok("e8".to_string()));
        assert!(Square::from_algebraic("i1").is_err());
        assert!(Square::from_algebraic("a9").is_err());
        assert!(Square::from_algebraic("a10").is_err());
    }

    #[test]
    fn test_square_offset() {
        let a1 = Square::new(0, 0);
        assert_eq!(a1.offset(1, 2), Some(Square::new(1, 2)));
        assert_eq!(a1.offset(-1, 0), None);
        assert_eq!(Square::new(7, 7).offset(0, 1), None);
    }

    #[test]
    fn test_piece_fen_chars() {
        let p = Piece::from_fen_char('n').unwrap();
        assert_eq!(p, Piece::new(PieceType::Knight, Color::Black));
        assert_eq!(p.to_fen_char(), 'n');
        assert_eq!(Piece::new(PieceType::Queen, Color::White).to_fen_char(), 'Q');
        assert!(Piece::from_fen_char('7').is_none());
    }

    #[test]
    fn test_move_to_algebraic() {
        let m = Move::new(Square::new(6, 0), Square::new(7, 0), SpecialMove::None)
            .with_promotion(PieceType::Queen);
        assert_eq!(m.to_algebraic(), "a7a8q");
        let m = Move::new(Square::new(1, 4), Square::new(3, 4), SpecialMove::DoublePush);
        assert_eq!(m.to_string(), "e2e4");
    }
}
