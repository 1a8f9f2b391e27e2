//! The move applier: a pure transition function `(Position, Move) -> Position`.
//!
//! Positions are never mutated in place. The applier clones the board,
//! performs the placement changes the move's tag demands, then recomputes
//! the bookkeeping fields (castling rights, en-passant target, clocks, side
//! to move).
//!
//! The caller is responsible for supplying a move whose destination came
//! out of generation for that origin; committing arbitrary moves is guarded
//! one level up by [`crate::engine::game::Game::make_move`].

use crate::engine::board::Position;
use crate::engine::types::{CastlingRights, Color, Move, MoveKind, Piece, PieceType, Square};

/// Result of applying a move: the successor position and the captured
/// piece, if any. For an en-passant capture the captured pawn does not
/// stand on the destination square, so the board alone cannot answer
/// "what was taken".
#[derive(Clone, Debug)]
pub struct MoveEffect {
    pub position: Position,
    pub captured: Option<Piece>,
}

/// Apply `mv` to `pos`, producing the successor position.
pub fn apply(pos: &Position, mv: Move) -> MoveEffect {
    let mover = pos
        .board
        .get(mv.from)
        .expect("move origin must hold a piece");
    let us = mover.color;

    let mut next = pos.clone();

    // ---- Capture (en-passant removes a pawn behind the destination) ----
    let captured = match mv.kind {
        MoveKind::EnPassant => {
            let victim_sq = Square::from_file_row(mv.to.file(), mv.from.row());
            let victim = next.board.get(victim_sq);
            next.board.set(victim_sq, None);
            victim
        }
        _ => next.board.get(mv.to),
    };

    // ---- Relocate the mover (promotion lands as the promoted piece) ----
    let landing = match mv.kind {
        MoveKind::Promotion(kind) => Piece::new(us, kind),
        _ => mover,
    };
    next.board.set(mv.from, None);
    next.board.set(mv.to, Some(landing));

    // ---- Castling: relocate the rook and drop both rights at once ----
    if mv.is_castle() {
        let (rook_from, rook_to) = castling_rook_squares(mv.to);
        let rook = next.board.get(rook_from);
        next.board.set(rook_from, None);
        next.board.set(rook_to, rook);
        next.castling_rights.clear_color(us);
    } else {
        // Rights expire by origin-square identity: any king move clears the
        // colour's pair, a rook leaving its home square clears that side.
        match mover.kind {
            PieceType::King => next.castling_rights.clear_color(us),
            PieceType::Rook => {
                if let Some(flag) = rook_home_flag(mv.from) {
                    next.castling_rights.remove(flag);
                }
            }
            _ => {}
        }
    }

    // ---- En-passant target: only a pawn double step leaves one ----
    let double_step =
        mover.kind == PieceType::Pawn && mv.from.row().abs_diff(mv.to.row()) == 2;
    next.en_passant = if double_step {
        // The passed-over square sits halfway between origin and target.
        Some(Square((mv.from.0 + mv.to.0) / 2))
    } else {
        None
    };

    // ---- Clocks ----
    if mover.kind == PieceType::Pawn || captured.is_some() {
        next.halfmove_clock = 0;
    } else {
        next.halfmove_clock += 1;
    }
    if us == Color::Black {
        next.fullmove_number += 1;
    }

    // ---- Side to move flips unconditionally ----
    next.side_to_move = !us;

    MoveEffect {
        position: next,
        captured,
    }
}

/// For a king destination square (after castling), the rook's relocation.
fn castling_rook_squares(king_to: Square) -> (Square, Square) {
    match king_to.0 {
        // Black kingside: king e8→g8, rook h8→f8.
        6 => (Square(7), Square(5)),
        // Black queenside: king e8→c8, rook a8→d8.
        2 => (Square(0), Square(3)),
        // White kingside: king e1→g1, rook h1→f1.
        62 => (Square(63), Square(61)),
        // White queenside: king e1→c1, rook a1→d1.
        58 => (Square(56), Square(59)),
        _ => panic!("invalid castling king destination: {king_to}"),
    }
}

/// The castling right that dies when a rook moves off this square, if it
/// is one of the four rook home squares.
fn rook_home_flag(sq: Square) -> Option<u8> {
    match sq.0 {
        0 => Some(CastlingRights::BLACK_QUEENSIDE),
        7 => Some(CastlingRights::BLACK_KINGSIDE),
        56 => Some(CastlingRights::WHITE_QUEENSIDE),
        63 => Some(CastlingRights::WHITE_KINGSIDE),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
