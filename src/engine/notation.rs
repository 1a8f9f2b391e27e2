//! Minimal move annotation for the move-list UI.
//!
//! Labels carry just enough to read a game back: piece letter (nothing for
//! pawns), `x` on captures with the pawn's departure file, the destination
//! square, `O-O` / `O-O-O` for castles, and `=Q` on promotion.
//!
//! Deliberately not full SAN: there is no disambiguation between two like
//! pieces reaching the same square. `+` and `#` are appended by the game
//! controller once the resulting status is known.

use crate::engine::board::Position;
use crate::engine::types::{Move, MoveKind, PieceType};

/// Build the label for `mv` in `pos`. Call before the move is applied.
pub fn move_label(pos: &Position, mv: Move) -> String {
    match mv.kind {
        MoveKind::CastleKingside => return "O-O".to_string(),
        MoveKind::CastleQueenside => return "O-O-O".to_string(),
        _ => {}
    }

    let piece = pos
        .board
        .get(mv.from)
        .expect("label requested for an empty origin square");

    let is_capture = pos.board.is_occupied(mv.to) || mv.kind == MoveKind::EnPassant;

    let mut label = String::with_capacity(8);
    if piece.kind == PieceType::Pawn {
        if is_capture {
            label.push((b'a' + mv.from.file()) as char);
            label.push('x');
        }
    } else {
        label.push(piece.kind.letter().to_ascii_uppercase());
        if is_capture {
            label.push('x');
        }
    }
    label.push_str(mv.to.name());

    if let MoveKind::Promotion(kind) = mv.kind {
        label.push('=');
        label.push(kind.letter().to_ascii_uppercase());
    }

    label
}
