//! Pseudo-legal move and attack generation.
//!
//! For a piece on an origin square this produces three disjoint destination
//! sets: quiet moves (empty squares), attacks (enemy-occupied squares), and
//! specials (en-passant target, castling destinations). Generation is
//! deliberately permissive: it ignores whether a move would expose the
//! mover's own king — that is the legality filter's job
//! ([`crate::engine::movegen`]).
//!
//! Rays and steps are walked in file/row coordinates, so a step that would
//! wrap around a board edge simply leaves the 0–7 range and is rejected.

use crate::engine::board::{Board, Position};
use crate::engine::types::{Color, MoveSet, Piece, PieceType, Square};

// ---------------------------------------------------------------------------
// Geometry
// ---------------------------------------------------------------------------

/// Directions as (file delta, row delta). Row 0 is rank 8, so white pawns
/// advance with a row delta of -1.
const BISHOP_DIRS: [(i8, i8); 4] = [(-1, -1), (1, -1), (-1, 1), (1, 1)];
const ROOK_DIRS: [(i8, i8); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];
const KNIGHT_STEPS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];
const KING_STEPS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Apply a (file, row) offset, rejecting anything off the board.
#[inline]
fn offset(from: Square, df: i8, dr: i8) -> Option<Square> {
    let file = from.file() as i8 + df;
    let row = from.row() as i8 + dr;
    if (0..8).contains(&file) && (0..8).contains(&row) {
        Some(Square::from_file_row(file as u8, row as u8))
    } else {
        None
    }
}

/// The direction a pawn advances in, as a row delta.
#[inline]
fn pawn_dir(color: Color) -> i8 {
    match color {
        Color::White => -1,
        Color::Black => 1,
    }
}

// ---------------------------------------------------------------------------
// Pseudo-legal generation
// ---------------------------------------------------------------------------

/// Generate the pseudo-legal destination partition for the piece on `from`.
/// An empty origin square yields an empty set.
pub fn pseudo_legal_from(pos: &Position, from: Square) -> MoveSet {
    let Some(piece) = pos.board.get(from) else {
        return MoveSet::default();
    };

    match piece.kind {
        PieceType::Bishop => slider_moves(&pos.board, from, piece.color, &BISHOP_DIRS),
        PieceType::Rook => slider_moves(&pos.board, from, piece.color, &ROOK_DIRS),
        PieceType::Queen => {
            let mut set = slider_moves(&pos.board, from, piece.color, &BISHOP_DIRS);
            let rook = slider_moves(&pos.board, from, piece.color, &ROOK_DIRS);
            set.quiet.extend(rook.quiet);
            set.attacks.extend(rook.attacks);
            set
        }
        PieceType::Knight => step_moves(&pos.board, from, piece.color, &KNIGHT_STEPS),
        PieceType::King => {
            let mut set = step_moves(&pos.board, from, piece.color, &KING_STEPS);
            set.special = castling_destinations(pos, piece.color);
            set
        }
        PieceType::Pawn => pawn_moves(pos, from, piece.color),
    }
}

/// Ray-cast in each direction: empty squares are quiet destinations, the
/// first enemy piece ends the ray as an attack, a friendly piece ends it
/// with nothing.
fn slider_moves(board: &Board, from: Square, color: Color, dirs: &[(i8, i8)]) -> MoveSet {
    let mut set = MoveSet::default();
    for &(df, dr) in dirs {
        let mut sq = from;
        while let Some(next) = offset(sq, df, dr) {
            match board.get(next) {
                None => set.quiet.push(next),
                Some(p) => {
                    if p.color != color {
                        set.attacks.push(next);
                    }
                    break;
                }
            }
            sq = next;
        }
    }
    set
}

/// Fixed-offset movers (knight and king adjacency).
fn step_moves(board: &Board, from: Square, color: Color, steps: &[(i8, i8)]) -> MoveSet {
    let mut set = MoveSet::default();
    for &(df, dr) in steps {
        let Some(to) = offset(from, df, dr) else {
            continue;
        };
        match board.get(to) {
            None => set.quiet.push(to),
            Some(p) => {
                if p.color != color {
                    set.attacks.push(to);
                }
            }
        }
    }
    set
}

/// Pawn pushes, diagonal captures, and the en-passant special.
fn pawn_moves(pos: &Position, from: Square, color: Color) -> MoveSet {
    let mut set = MoveSet::default();
    let dir = pawn_dir(color);
    let start_row = match color {
        Color::White => 6,
        Color::Black => 1,
    };

    // Single step, and the double step from the starting rank — the double
    // step needs both the intermediate and the destination square empty.
    if let Some(one) = offset(from, 0, dir) {
        if !pos.board.is_occupied(one) {
            set.quiet.push(one);
            if from.row() == start_row {
                if let Some(two) = offset(from, 0, 2 * dir) {
                    if !pos.board.is_occupied(two) {
                        set.quiet.push(two);
                    }
                }
            }
        }
    }

    // Diagonal captures; the edge files lose their off-board diagonal via
    // the offset bounds check.
    for df in [-1, 1] {
        let Some(diag) = offset(from, df, dir) else {
            continue;
        };
        if let Some(p) = pos.board.get(diag) {
            if p.color != color {
                set.attacks.push(diag);
            }
        }
        // En passant: offered whenever the target matches the diagonal,
        // regardless of that square's occupancy.
        if pos.en_passant == Some(diag) {
            set.special.push(diag);
        }
    }

    set
}

// ---------------------------------------------------------------------------
// Castling
// ---------------------------------------------------------------------------

/// Castling destinations for `color`, as special moves.
///
/// Offered when the right is intact, every square strictly between king and
/// rook is empty, the rook stands on its home square, and the king is not
/// currently in check. The square the king crosses is not tested for
/// attack; landing in check is rejected later by the legality filter.
fn castling_destinations(pos: &Position, color: Color) -> Vec<Square> {
    let mut special = Vec::new();
    let board = &pos.board;

    let king = board.king_sq(color);
    if square_attacked(board, king, !color) {
        return special;
    }

    // Row base of the colour's back rank: black ranks first in scan order.
    let base = match color {
        Color::White => 56u8,
        Color::Black => 0u8,
    };
    let rook = Piece::new(color, PieceType::Rook);

    if pos.castling_rights.can_castle_kingside(color)
        && board.get(Square(base + 7)) == Some(rook)
        && !board.is_occupied(Square(base + 5))
        && !board.is_occupied(Square(base + 6))
    {
        special.push(Square(base + 6));
    }

    if pos.castling_rights.can_castle_queenside(color)
        && board.get(Square(base)) == Some(rook)
        && !board.is_occupied(Square(base + 1))
        && !board.is_occupied(Square(base + 2))
        && !board.is_occupied(Square(base + 3))
    {
        special.push(Square(base + 2));
    }

    special
}

// ---------------------------------------------------------------------------
// Attack detection
// ---------------------------------------------------------------------------

/// Is `target` attacked by any piece of colour `by`?
///
/// Walks every piece of `by` and tests membership of `target` in its attack
/// set. Castling and pawn pushes never attack, so they play no part here.
pub fn square_attacked(board: &Board, target: Square, by: Color) -> bool {
    board
        .pieces()
        .filter(|(_, p)| p.color == by)
        .any(|(from, p)| piece_attacks_square(board, from, p, target))
}

fn piece_attacks_square(board: &Board, from: Square, piece: Piece, target: Square) -> bool {
    match piece.kind {
        PieceType::Pawn => {
            let dir = pawn_dir(piece.color);
            [-1, 1].iter().any(|&df| offset(from, df, dir) == Some(target))
        }
        PieceType::Knight => KNIGHT_STEPS
            .iter()
            .any(|&(df, dr)| offset(from, df, dr) == Some(target)),
        PieceType::King => KING_STEPS
            .iter()
            .any(|&(df, dr)| offset(from, df, dr) == Some(target)),
        PieceType::Bishop => ray_reaches(board, from, &BISHOP_DIRS, target),
        PieceType::Rook => ray_reaches(board, from, &ROOK_DIRS, target),
        PieceType::Queen => {
            ray_reaches(board, from, &BISHOP_DIRS, target)
                || ray_reaches(board, from, &ROOK_DIRS, target)
        }
    }
}

/// Does any ray from `from` reach `target` before hitting a blocker?
fn ray_reaches(board: &Board, from: Square, dirs: &[(i8, i8)], target: Square) -> bool {
    for &(df, dr) in dirs {
        let mut sq = from;
        while let Some(next) = offset(sq, df, dr) {
            if next == target {
                return true;
            }
            if board.is_occupied(next) {
                break;
            }
            sq = next;
        }
    }
    false
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
