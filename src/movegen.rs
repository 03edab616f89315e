//! Pseudo-legal move generation for a single square.
//!
//! We define a pseudo-legal move to be a move that obeys the piece move
//! directions, stays on the board, does not skip over pieces, etc, but does
//! not check whether the mover's own king is left attacked.

use crate::board::{Board, KINGSIDE_ROOK_FILE, KING_HOME_FILE, QUEENSIDE_ROOK_FILE};
use crate::types::{Color, Move, Piece, PieceType, SpecialMove, Square};

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

const KING_OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];
const ROOK_DIRECTIONS: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

// Files that must be empty, and files the king occupies on its way, per side.
const KINGSIDE_BETWEEN: [u8; 2] = [5, 6];
const KINGSIDE_PATH: [u8; 3] = [4, 5, 6];
const QUEENSIDE_BETWEEN: [u8; 3] = [1, 2, 3];
const QUEENSIDE_PATH: [u8; 3] = [2, 3, 4];

/// Outcome of looking at a target square: either the piece can land there
/// (possibly capturing), or it cannot.
enum PotentialMove {
    Valid(Option<Piece>),
    Invalid,
}

impl PotentialMove {
    fn continue_search_in_direction(&self) -> bool {
        match self {
            PotentialMove::Invalid => false,
            PotentialMove::Valid(Some(_)) => false,
            PotentialMove::Valid(None) => true,
        }
    }
}

fn check_move_target(board: &Board, piece: &Piece, candidate: Square) -> PotentialMove {
    match board.piece_at(candidate) {
        Some(other) if other.color == piece.color => PotentialMove::Invalid,
        other => PotentialMove::Valid(other),
    }
}

/// Pseudo-legal moves of the piece on `from`; empty if the square is empty.
///
/// With `for_attack` set only threats are produced: pawn pushes and castling
/// are left out, and pawns report both forward diagonals whether or not
/// anything stands there. This is the mode [`Board::is_attacked`] uses.
pub fn generate_raw_moves(board: &Board, from: Square, for_attack: bool) -> Vec<Move> {
    let Some(piece) = board.piece_at(from) else {
        return vec![];
    };

    match piece.piece_type {
        PieceType::Pawn => {
            if for_attack {
                pawn_observed_squares(from, &piece)
            } else {
                let mut pushes = pawn_pushes(board, from, &piece);
                pushes.append(&mut pawn_captures(board, from, &piece));
                pushes
            }
        }
        PieceType::Knight => step_moves(board, from, &piece, &KNIGHT_OFFSETS),
        PieceType::Bishop => sliding_moves(board, from, &piece, &BISHOP_DIRECTIONS),
        PieceType::Rook => sliding_moves(board, from, &piece, &ROOK_DIRECTIONS),
        PieceType::Queen => {
            let mut bishop = sliding_moves(board, from, &piece, &BISHOP_DIRECTIONS);
            bishop.append(&mut sliding_moves(board, from, &piece, &ROOK_DIRECTIONS));
            bishop
        }
        PieceType::King => {
            let mut moves = step_moves(board, from, &piece, &KING_OFFSETS);
            if !for_attack && !piece.has_moved {
                for special in [SpecialMove::CastleKingside, SpecialMove::CastleQueenside] {
                    if can_castle(board, from, piece.color, special) {
                        let file_delta = if special == SpecialMove::CastleKingside { 2 } else { -2 };
                        if let Some(to) = from.offset(0, file_delta) {
                            moves.push(Move::new(from, to, special));
                        }
                    }
                }
            }
            moves
        }
    }
}

/// Squares the pawn *could* capture on if there is a piece there
fn pawn_observed_squares(from: Square, piece: &Piece) -> Vec<Move> {
    [-1, 1]
        .into_iter()
        .filter_map(|file_delta| from.offset(piece.color.forward(), file_delta))
        .map(|to| Move::new(from, to, SpecialMove::None))
        .collect()
}

/// Diagonal captures, including en passant
fn pawn_captures(board: &Board, from: Square, piece: &Piece) -> Vec<Move> {
    let mut moves: Vec<Move> = vec![];
    for m in pawn_observed_squares(from, piece) {
        match board.piece_at(m.to) {
            Some(target) if target.color != piece.color => moves.push(m),
            Some(_) => {}
            None if is_en_passant_capture(board, from, m.to, piece) => {
                moves.push(Move::new(from, m.to, SpecialMove::EnPassant))
            }
            None => {}
        }
    }
    moves
}

/// `to` is the en-passant target and the pawn that skipped over it stands
/// beside the capturing pawn.
fn is_en_passant_capture(board: &Board, from: Square, to: Square, piece: &Piece) -> bool {
    if board.en_passant_target != Some(to) {
        return false;
    }
    board
        .piece_at(Square::new(from.rank, to.file))
        .is_some_and(|p| p.piece_type == PieceType::Pawn && p.color != piece.color)
}

fn pawn_pushes(board: &Board, from: Square, piece: &Piece) -> Vec<Move> {
    let mut moves: Vec<Move> = vec![];
    let forward = piece.color.forward();

    // move one square forward, requires no piece there
    let Some(one_step) = from.offset(forward, 0) else {
        return moves;
    };
    if board.piece_at(one_step).is_some() {
        return moves;
    }
    moves.push(Move::new(from, one_step, SpecialMove::None));

    // from the starting rank, with both squares in front free
    if from.rank == piece.color.pawn_starting_rank() {
        if let Some(two_step) = one_step.offset(forward, 0) {
            if board.piece_at(two_step).is_none() {
                moves.push(Move::new(from, two_step, SpecialMove::DoublePush));
            }
        }
    }
    moves
}

/// Knight and king steps: fixed offsets, landing on empty or enemy squares.
fn step_moves(board: &Board, from: Square, piece: &Piece, offsets: &[(i8, i8)]) -> Vec<Move> {
    offsets
        .iter()
        .filter_map(|&(rank_delta, file_delta)| from.offset(rank_delta, file_delta))
        .filter(|&to| matches!(check_move_target(board, piece, to), PotentialMove::Valid(_)))
        .map(|to| Move::new(from, to, SpecialMove::None))
        .collect()
}

/// Ray-cast along each direction until the edge, an own piece (excluded) or
/// an enemy piece (included).
fn sliding_moves(
    board: &Board,
    from: Square,
    piece: &Piece,
    directions: &[(i8, i8)],
) -> Vec<Move> {
    let mut moves: Vec<Move> = vec![];
    for &(rank_delta, file_delta) in directions {
        let mut candidate = from.offset(rank_delta, file_delta);
        while let Some(to) = candidate {
            let potential_move = check_move_target(board, piece, to);
            if let PotentialMove::Valid(_) = potential_move {
                moves.push(Move::new(from, to, SpecialMove::None));
            }
            if !potential_move.continue_search_in_direction() {
                break;
            }
            candidate = to.offset(rank_delta, file_delta);
        }
    }
    moves
}

/// Whether the king on `king_square` may castle towards `side`.
///
/// Requires the king on its home square and unmoved, the rook in that corner
/// unmoved, every square between them empty, and none of the squares the
/// king stands on, crosses or lands on attacked by the opponent.
pub fn can_castle(board: &Board, king_square: Square, color: Color, side: SpecialMove) -> bool {
    let rank = color.back_rank();
    if king_square != Square::new(rank, KING_HOME_FILE) {
        return false;
    }

    let (rook_file, between, king_path): (u8, &[u8], &[u8]) = match side {
        SpecialMove::CastleKingside => (KINGSIDE_ROOK_FILE, &KINGSIDE_BETWEEN[..], &KINGSIDE_PATH[..]),
        SpecialMove::CastleQueenside => {
            (QUEENSIDE_ROOK_FILE, &QUEENSIDE_BETWEEN[..], &QUEENSIDE_PATH[..])
        }
        _ => return false,
    };

    if !board.castling_pieces_unmoved(color, rook_file) {
        return false;
    }
    if between
        .iter()
        .any(|&file| board.piece_at(Square::new(rank, file)).is_some())
    {
        return false;
    }
    let opponent = color.other_color();
    !king_path
        .iter()
        .any(|&file| board.is_attacked(Square::new(rank, file), opponent))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    fn board(fen: &str) -> Board {
        Board::from_fen(fen).unwrap().0
    }

    fn destinations(moves: &[Move]) -> Vec<String> {
        let mut v: Vec<String> = moves.iter().map(|m| m.to.to_algebraic()).collect();
        v.sort();
        v
    }

    #[test]
    fn empty_square_has_no_moves() {
        assert!(generate_raw_moves(&Board::new(), sq("e4"), false).is_empty());
        assert!(generate_raw_moves(&Board::new(), sq("e4"), true).is_empty());
    }

    #[test]
    fn starting_pawn_and_knight() {
        let b = Board::new();
        let pawn = generate_raw_moves(&b, sq("e2"), false);
        assert_eq!(destinations(&pawn), vec!["e3", "e4"]);
        assert_eq!(pawn[1].special, SpecialMove::DoublePush);

        let knight = generate_raw_moves(&b, sq("g1"), false);
        assert_eq!(destinations(&knight), vec!["f3", "h3"]);

        // boxed in
        assert!(generate_raw_moves(&b, sq("a1"), false).is_empty());
        assert!(generate_raw_moves(&b, sq("d1"), false).is_empty());
        assert!(generate_raw_moves(&b, sq("e1"), false).is_empty());
    }

    #[test]
    fn pawn_attack_mode_reports_diagonals_only() {
        let b = Board::new();
        assert_eq!(destinations(&generate_raw_moves(&b, sq("e2"), true)), vec!["d3", "f3"]);
        assert_eq!(destinations(&generate_raw_moves(&b, sq("a7"), true)), vec!["b6"]);
    }

    #[test]
    fn pawn_blocked_and_captures() {
        // . . . . k . . .
        // . . . . . . . .
        // . . . . . . . .
        // . . . . . . . .
        // . . . . . . . .
        // . . . p n . . .
        // . . . . P . . .
        // . . . . K . . .
        let b = board("4k3/8/8/8/8/3pn3/4P3/4K3 w - - 0 1");
        let moves = generate_raw_moves(&b, sq("e2"), false);
        assert_eq!(destinations(&moves), vec!["d3"]);

        // double push blocked on the far square
        let b = board("4k3/8/8/8/4n3/8/4P3/4K3 w - - 0 1");
        assert_eq!(destinations(&generate_raw_moves(&b, sq("e2"), false)), vec!["e3"]);
    }

    #[test]
    fn black_pawn_moves_down() {
        let b = Board::new();
        assert_eq!(destinations(&generate_raw_moves(&b, sq("d7"), false)), vec!["d5", "d6"]);
    }

    #[test]
    fn no_double_push_off_start_rank() {
        let b = board("4k3/8/8/8/8/4P3/8/4K3 w - - 0 1");
        assert_eq!(destinations(&generate_raw_moves(&b, sq("e3"), false)), vec!["e4"]);
    }

    #[test]
    fn en_passant_needs_adjacent_target() {
        let b = board("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2");
        let moves = generate_raw_moves(&b, sq("e5"), false);
        assert_eq!(destinations(&moves), vec!["d6", "e6"]);
        let ep = moves.iter().find(|m| m.to == sq("d6")).unwrap();
        assert_eq!(ep.special, SpecialMove::EnPassant);

        // same pawns, no target
        let b = board("4k3/8/8/3pP3/8/8/8/4K3 w - - 0 2");
        assert_eq!(destinations(&generate_raw_moves(&b, sq("e5"), false)), vec!["e6"]);

        // target not diagonally adjacent to this pawn
        let b = board("4k3/8/8/1p2P3/8/8/8/4K3 w - b6 0 2");
        assert_eq!(destinations(&generate_raw_moves(&b, sq("e5"), false)), vec!["e6"]);
    }

    #[test]
    fn knight_in_corner_and_center() {
        let b = board("4k3/8/8/8/3N4/8/8/N3K3 w - - 0 1");
        assert_eq!(generate_raw_moves(&b, sq("d4"), false).len(), 8);
        assert_eq!(destinations(&generate_raw_moves(&b, sq("a1"), false)), vec!["b3", "c2"]);
    }

    #[test]
    fn sliders_on_open_board() {
        let b = board("4k3/8/8/8/3Q4/8/8/4K3 w - - 0 1");
        assert_eq!(generate_raw_moves(&b, sq("d4"), false).len(), 27);

        let b = board("4k3/8/8/8/3R4/8/8/4K3 w - - 0 1");
        assert_eq!(generate_raw_moves(&b, sq("d4"), false).len(), 14);

        let b = board("4k3/8/8/8/3B4/8/8/4K3 w - - 0 1");
        assert_eq!(generate_raw_moves(&b, sq("d4"), false).len(), 13);
    }

    #[test]
    fn rook_stops_at_blockers() {
        // own piece on d6 excluded, enemy on f4 included
        let b = board("4k3/8/3P4/8/3R1n2/8/8/4K3 w - - 0 1");
        let moves = generate_raw_moves(&b, sq("d4"), false);
        assert_eq!(
            destinations(&moves),
            vec!["a4", "b4", "c4", "d1", "d2", "d3", "d5", "e4", "f4"]
        );
    }

    #[test]
    fn king_steps() {
        let b = board("4k3/8/8/8/8/8/3p4/4K3 w - - 0 1");
        let moves = generate_raw_moves(&b, sq("e1"), false);
        assert_eq!(destinations(&moves), vec!["d1", "d2", "e2", "f1", "f2"]);
    }

    #[test]
    fn castling_both_sides() {
        let b = board("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        let moves = generate_raw_moves(&b, sq("e1"), false);
        let castles: Vec<&Move> = moves.iter().filter(|m| m.special.is_castle()).collect();
        assert_eq!(castles.len(), 2);
        assert!(moves
            .iter()
            .any(|m| m.to == sq("g1") && m.special == SpecialMove::CastleKingside));
        assert!(moves
            .iter()
            .any(|m| m.to == sq("c1") && m.special == SpecialMove::CastleQueenside));

        // never in attack mode
        let attacks = generate_raw_moves(&b, sq("e1"), true);
        assert!(attacks.iter().all(|m| !m.special.is_castle()));
    }

    #[test]
    fn castling_blocked_by_pieces_and_attacks() {
        // knight on b1 blocks queenside only
        let b = board("r3k2r/8/8/8/8/8/8/RN2K2R w KQkq - 0 1");
        assert!(can_castle(&b, sq("e1"), Color::White, SpecialMove::CastleKingside));
        assert!(!can_castle(&b, sq("e1"), Color::White, SpecialMove::CastleQueenside));

        // b1 attacked is fine for queenside, d1 attacked is not
        let b = board("1r2k3/8/8/8/8/8/8/R3K3 w Q - 0 1");
        assert!(can_castle(&b, sq("e1"), Color::White, SpecialMove::CastleQueenside));
        let b = board("3rk3/8/8/8/8/8/8/R3K3 w Q - 0 1");
        assert!(!can_castle(&b, sq("e1"), Color::White, SpecialMove::CastleQueenside));

        // a pawn covering f1 from e2 prevents kingside castling
        let b = board("4k3/8/8/8/8/8/4p3/4K2R w K - 0 1");
        assert!(!can_castle(&b, sq("e1"), Color::White, SpecialMove::CastleKingside));
    }

    #[test]
    fn castling_black() {
        let b = board("r3k2r/8/8/8/8/8/8/4K3 b kq - 0 1");
        let moves = generate_raw_moves(&b, sq("e8"), false);
        assert!(moves.contains(&Move::new(sq("e8"), sq("g8"), SpecialMove::CastleKingside)));
        assert!(moves.contains(&Move::new(sq("e8"), sq("c8"), SpecialMove::CastleQueenside)));
    }
}
