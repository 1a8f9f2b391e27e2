//! Data-transfer types for the collaborator boundary.
//!
//! The rendering/interaction layer exchanges these with the engine: a
//! [`MoveRequest`] comes in, a [`MoveMenu`] answers a piece-selection
//! query, and a [`MoveReport`] (new position plus status flags plus any
//! captured piece) answers every committed move.

use serde::{Deserialize, Serialize};

use crate::engine::game::{Game, MoveRecord};
use crate::engine::types::{DrawReason, GameStatus, MoveSet, Piece};

// ---------------------------------------------------------------------------
// Request models
// ---------------------------------------------------------------------------

/// A move submitted by the collaborator: origin and destination square
/// names. Promotion carries no choice parameter; a queen is implicit.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveRequest {
    pub from: String,
    pub to: String,
}

// ---------------------------------------------------------------------------
// Response models
// ---------------------------------------------------------------------------

/// Destination menu for a selected piece, as square names.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveMenu {
    pub quiet: Vec<String>,
    pub attacks: Vec<String>,
    pub special: Vec<String>,
}

impl From<&MoveSet> for MoveMenu {
    fn from(set: &MoveSet) -> Self {
        MoveMenu {
            quiet: square_names(&set.quiet),
            attacks: square_names(&set.attacks),
            special: square_names(&set.special),
        }
    }
}

fn square_names(squares: &[crate::engine::types::Square]) -> Vec<String> {
    squares.iter().map(|sq| sq.name().to_string()).collect()
}

/// A piece descriptor for the wire.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PieceInfo {
    #[serde(rename = "type")]
    pub piece_type: String,
    pub color: String,
}

impl From<Piece> for PieceInfo {
    fn from(piece: Piece) -> Self {
        PieceInfo {
            piece_type: piece.kind.to_string(),
            color: piece.color.to_string(),
        }
    }
}

/// Outcome of a committed move: the new position in exchange format plus
/// the status flags the UI needs, and the captured piece if any.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveReport {
    pub fen: String,
    pub label: String,
    pub in_check: bool,
    pub is_checkmate: bool,
    pub is_stalemate: bool,
    pub is_draw_by_repetition: bool,
    pub is_draw_by_clock: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub captured: Option<PieceInfo>,
}

impl MoveReport {
    pub fn new(game: &Game, record: &MoveRecord) -> Self {
        let status = &record.status_after;
        MoveReport {
            fen: game.to_fen(),
            label: record.label.clone(),
            in_check: matches!(status, GameStatus::Check | GameStatus::Checkmate),
            is_checkmate: *status == GameStatus::Checkmate,
            is_stalemate: *status == GameStatus::Stalemate,
            is_draw_by_repetition: *status == GameStatus::Draw(DrawReason::ThreefoldRepetition),
            is_draw_by_clock: *status == GameStatus::Draw(DrawReason::FiftyMoveRule),
            captured: record.captured.map(PieceInfo::from),
        }
    }
}

/// A full snapshot of a game for first render or resync.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    pub id: String,
    pub fen: String,
    pub status: String,
    pub current_player: String,
    pub board: Vec<Vec<String>>,
    pub created_at: String,
}

impl GameSnapshot {
    pub fn from_game(game: &Game) -> Self {
        GameSnapshot {
            id: game.id.clone(),
            fen: game.to_fen(),
            status: game.status().as_str().to_string(),
            current_player: game.side_to_move().to_string(),
            board: game.board_array().iter().map(|row| row.to_vec()).collect(),
            created_at: game.created_at.to_rfc3339(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::types::Square;

    #[test]
    fn move_request_deserializes() {
        let req: MoveRequest = serde_json::from_str(r#"{"from":"e2","to":"e4"}"#).unwrap();
        assert_eq!(req.from, "e2");
        assert_eq!(req.to, "e4");
    }

    #[test]
    fn move_menu_uses_square_names() {
        let game = Game::new();
        let set = game.legal_destinations(Square::from_name("e2").unwrap());
        let menu = MoveMenu::from(&set);
        assert_eq!(menu.quiet.len(), 2);
        assert!(menu.quiet.contains(&"e3".to_string()));
        assert!(menu.quiet.contains(&"e4".to_string()));
        assert!(menu.attacks.is_empty());
        assert!(menu.special.is_empty());
    }

    #[test]
    fn piece_info_fields() {
        use crate::engine::types::{Color, PieceType};
        let info = PieceInfo::from(Piece::new(Color::Black, PieceType::Knight));
        assert_eq!(info.piece_type, "knight");
        assert_eq!(info.color, "black");
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["type"], "knight");
        assert_eq!(json["color"], "black");
    }

    #[test]
    fn move_report_flags_checkmate() {
        let mut game = Game::new();
        game.make_move_named("f2", "f3").unwrap();
        game.make_move_named("e7", "e5").unwrap();
        game.make_move_named("g2", "g4").unwrap();
        let record = game.make_move_named("d8", "h4").unwrap();

        let report = MoveReport::new(&game, &record);
        assert!(report.in_check);
        assert!(report.is_checkmate);
        assert!(!report.is_stalemate);
        assert!(!report.is_draw_by_repetition);
        assert!(!report.is_draw_by_clock);
        assert_eq!(report.captured, None);
        assert_eq!(report.label, "Qh4#");
    }

    #[test]
    fn move_report_serialization_shape() {
        let mut game = Game::new();
        let record = game.make_move_named("e2", "e4").unwrap();
        let report = MoveReport::new(&game, &record);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["fen"].as_str().unwrap(), game.to_fen());
        assert_eq!(json["inCheck"], false);
        assert_eq!(json["isCheckmate"], false);
        // No capture: the field is omitted entirely.
        assert!(json.get("captured").is_none());
    }

    #[test]
    fn move_report_includes_captured_piece() {
        let mut game = Game::new();
        game.make_move_named("e2", "e4").unwrap();
        game.make_move_named("d7", "d5").unwrap();
        let record = game.make_move_named("e4", "d5").unwrap();
        let report = MoveReport::new(&game, &record);
        let captured = report.captured.unwrap();
        assert_eq!(captured.piece_type, "pawn");
        assert_eq!(captured.color, "black");
    }

    #[test]
    fn game_snapshot_shape() {
        let game = Game::new();
        let snap = GameSnapshot::from_game(&game);
        assert_eq!(snap.status, "active");
        assert_eq!(snap.current_player, "white");
        assert_eq!(snap.board[0][0], "bR");
        assert_eq!(snap.board[7][4], "wK");
        let json = serde_json::to_value(&snap).unwrap();
        assert_eq!(json["currentPlayer"], "white");
        assert!(json["createdAt"].is_string());
    }
}
