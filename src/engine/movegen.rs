//! Legal move filtering.
//!
//! Pipeline:
//!   1. Pseudo-legal destinations come from [`crate::engine::attacks`].
//!   2. Each candidate is simulated with the applier; a move that leaves the
//!      mover's own king attacked is discarded.
//!
//! This simulate-and-test pass is the only place self-check safety is
//! enforced; generation itself is deliberately permissive.

use crate::engine::apply;
use crate::engine::attacks;
use crate::engine::board::Position;
use crate::engine::types::{Color, Move, MoveKind, MoveSet, PieceType, Square};

// =========================================================================
// Public API
// =========================================================================

/// Legal destinations for the piece on `from`, keeping the quiet / attack /
/// special partition of the generator. An empty origin yields an empty set.
pub fn legal_moves_from(pos: &Position, from: Square) -> MoveSet {
    let Some(piece) = pos.board.get(from) else {
        return MoveSet::default();
    };

    let mut set = attacks::pseudo_legal_from(pos, from);
    set.retain(|to| !leaves_king_attacked(pos, classify(pos, from, to), piece.color));
    set
}

/// All legal moves for the side to move, tagged with their special-move
/// kind.
pub fn legal_moves(pos: &Position) -> Vec<Move> {
    let mut moves = Vec::new();
    let origins: Vec<Square> = pos
        .board
        .pieces()
        .filter(|(_, p)| p.color == pos.side_to_move)
        .map(|(sq, _)| sq)
        .collect();

    for from in origins {
        for to in legal_moves_from(pos, from).iter() {
            moves.push(classify(pos, from, to));
        }
    }
    moves
}

/// Attach the special-move tag a bare (origin, destination) pair implies in
/// this position: en-passant when a pawn lands on the en-passant target
/// diagonally, castling when the king travels two files from its home
/// square, promotion (always to a queen) when a pawn reaches the far rank.
pub fn classify(pos: &Position, from: Square, to: Square) -> Move {
    let kind = match pos.board.get(from) {
        Some(p) if p.kind == PieceType::Pawn => {
            let promotion_row = match p.color {
                Color::White => 0,
                Color::Black => 7,
            };
            if pos.en_passant == Some(to) && from.file() != to.file() {
                MoveKind::EnPassant
            } else if to.row() == promotion_row {
                MoveKind::Promotion(PieceType::Queen)
            } else {
                MoveKind::Normal
            }
        }
        Some(p) if p.kind == PieceType::King => {
            let home = match p.color {
                Color::White => Square(60), // e1
                Color::Black => Square(4),  // e8
            };
            if from == home && to == Square(home.0 + 2) {
                MoveKind::CastleKingside
            } else if from == home && to == Square(home.0 - 2) {
                MoveKind::CastleQueenside
            } else {
                MoveKind::Normal
            }
        }
        _ => MoveKind::Normal,
    };
    Move::with_kind(from, to, kind)
}

// =========================================================================
// Self-check test (internal)
// =========================================================================

/// Would playing `mv` leave `mover`'s king attacked?
fn leaves_king_attacked(pos: &Position, mv: Move, mover: Color) -> bool {
    let next = apply::apply(pos, mv).position;
    let king = next.board.king_sq(mover);
    next.is_square_attacked(king, !mover)
}

// =========================================================================
// Tests
// =========================================================================
