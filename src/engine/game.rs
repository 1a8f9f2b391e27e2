//! Stateful game controller wrapping Position.
//!
//! `Game` owns the current position, the ordered history of every position
//! reached (repetition detection and undo both hang off it), the move
//! history, and the evaluated status. It is the type the UI collaborator
//! talks to.
//!
//! The engine core never mutates a position: each committed move swaps the
//! current `Position` value for the one the applier produced.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::config::GameConfig;
use crate::engine::apply;
use crate::engine::board::Position;
use crate::engine::movegen;
use crate::engine::notation;
use crate::engine::types::{
    ChessError, Color, DrawReason, GameStatus, Move, MoveSet, Piece, PieceType, Square,
};

// =========================================================================
// MoveRecord
// =========================================================================

/// A committed move in the game history.
#[derive(Clone, Debug)]
pub struct MoveRecord {
    /// The move that was played.
    pub mv: Move,
    /// Display label ("Nf3", "exd5", "O-O", "e8=Q"), with `+`/`#` suffix.
    pub label: String,
    /// Piece taken by this move, if any (including en-passant victims).
    pub captured: Option<Piece>,
    /// Status the move produced.
    pub status_after: GameStatus,
}

// =========================================================================
// Game
// =========================================================================

/// A complete chess game with history, undo, and status tracking.
#[derive(Clone, Debug)]
pub struct Game {
    position: Position,
    /// Every position reached, oldest first, current last.
    positions: Vec<Position>,
    move_history: Vec<MoveRecord>,
    status: GameStatus,
    config: GameConfig,

    // Metadata
    pub id: String,
    pub white_player: String,
    pub black_player: String,
    pub created_at: DateTime<Utc>,

    // FEN tracking
    started_from_fen: bool,
    starting_fen: String,
}

impl Game {
    // -----------------------------------------------------------------
    // Constructors
    // -----------------------------------------------------------------

    /// Create a new game from the standard starting position.
    pub fn new() -> Self {
        let pos = Position::starting();
        let fen = pos.to_fen();
        Self {
            position: pos.clone(),
            positions: vec![pos],
            move_history: Vec::new(),
            status: GameStatus::Active,
            config: GameConfig::default(),
            id: Uuid::new_v4().to_string(),
            white_player: "Player".into(),
            black_player: "Player".into(),
            created_at: Utc::now(),
            started_from_fen: false,
            starting_fen: fen,
        }
    }

    /// Create a game with an explicit configuration (custom starting FEN
    /// and/or draw threshold).
    pub fn with_config(config: GameConfig) -> Result<Self, ChessError> {
        let mut game = Self::from_fen(&config.start_fen)?;
        game.config = config;
        game.status = game.compute_status();
        Ok(game)
    }

    /// Create a game from a FEN string.
    pub fn from_fen(fen: &str) -> Result<Self, ChessError> {
        let pos = Position::from_fen(fen)?;
        let mut game = Self {
            position: pos.clone(),
            positions: vec![pos],
            move_history: Vec::new(),
            status: GameStatus::Active,
            config: GameConfig::default(),
            id: Uuid::new_v4().to_string(),
            white_player: "Player".into(),
            black_player: "Player".into(),
            created_at: Utc::now(),
            started_from_fen: true,
            starting_fen: fen.to_string(),
        };
        game.status = game.compute_status();
        Ok(game)
    }

    // -----------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------

    /// Current board position.
    pub fn position(&self) -> &Position {
        &self.position
    }

    /// Current game status.
    pub fn status(&self) -> &GameStatus {
        &self.status
    }

    /// Side to move.
    pub fn side_to_move(&self) -> Color {
        self.position.side_to_move
    }

    /// Completed move history.
    pub fn move_history(&self) -> &[MoveRecord] {
        &self.move_history
    }

    /// Whether the game is over. Terminal games stop offering moves until
    /// a new game is started.
    pub fn is_game_over(&self) -> bool {
        self.status.is_game_over()
    }

    /// Whether the side to move is currently in check.
    pub fn is_in_check(&self) -> bool {
        self.position.is_in_check()
    }

    /// Current position as FEN.
    pub fn to_fen(&self) -> String {
        self.position.to_fen()
    }

    /// Whether the game was started from a custom FEN.
    pub fn started_from_fen(&self) -> bool {
        self.started_from_fen
    }

    /// The starting FEN.
    pub fn starting_fen(&self) -> &str {
        &self.starting_fen
    }

    /// Fullmove number.
    pub fn fullmove_number(&self) -> u16 {
        self.position.fullmove_number
    }

    /// Halfmove clock.
    pub fn halfmove_clock(&self) -> u16 {
        self.position.halfmove_clock
    }

    // -----------------------------------------------------------------
    // Move menus
    // -----------------------------------------------------------------

    /// Legal destinations for the piece on `from`, partitioned into quiet /
    /// attack / special. Empty when the square holds no piece of the side
    /// to move, or when the game is over.
    pub fn legal_destinations(&self, from: Square) -> MoveSet {
        if self.status.is_game_over() {
            return MoveSet::default();
        }
        match self.position.board.get(from) {
            Some(piece) if piece.color == self.position.side_to_move => {
                movegen::legal_moves_from(&self.position, from)
            }
            _ => MoveSet::default(),
        }
    }

    /// All legal moves for the side to move; empty once the game is over.
    pub fn legal_moves(&self) -> Vec<Move> {
        if self.status.is_game_over() {
            return Vec::new();
        }
        movegen::legal_moves(&self.position)
    }

    // -----------------------------------------------------------------
    // Make move
    // -----------------------------------------------------------------

    /// Commit a move given origin and destination squares.
    ///
    /// The destination must be in the legal set for the origin; otherwise
    /// `ChessError::InvalidMove` is returned and the game is unchanged.
    pub fn make_move(&mut self, from: Square, to: Square) -> Result<MoveRecord, ChessError> {
        if self.status.is_game_over() {
            return Err(ChessError::GameOver(self.status.to_string()));
        }

        let piece = self
            .position
            .board
            .get(from)
            .ok_or_else(|| ChessError::InvalidMove {
                from: from.name().to_string(),
                to: to.name().to_string(),
                reason: "no piece on the origin square".into(),
            })?;
        if piece.color != self.position.side_to_move {
            return Err(ChessError::InvalidMove {
                from: from.name().to_string(),
                to: to.name().to_string(),
                reason: format!("it is {}'s turn", self.position.side_to_move),
            });
        }

        let legal = movegen::legal_moves_from(&self.position, from);
        if !legal.contains(to) {
            return Err(ChessError::InvalidMove {
                from: from.name().to_string(),
                to: to.name().to_string(),
                reason: "destination is not a legal move".into(),
            });
        }

        let mv = movegen::classify(&self.position, from, to);
        let label = notation::move_label(&self.position, mv);

        let effect = apply::apply(&self.position, mv);
        self.position = effect.position;
        self.positions.push(self.position.clone());

        let status = self.compute_status();
        self.status = status.clone();

        let label = match &status {
            GameStatus::Checkmate => format!("{label}#"),
            GameStatus::Check => format!("{label}+"),
            _ => label,
        };

        let record = MoveRecord {
            mv,
            label,
            captured: effect.captured,
            status_after: status,
        };
        self.move_history.push(record.clone());

        tracing::debug!(mv = %mv, status = %self.status, "move committed");
        if self.status.is_game_over() {
            tracing::info!(status = %self.status, "game over");
        }

        Ok(record)
    }

    /// Commit a move given square names ("e2", "e4").
    pub fn make_move_named(&mut self, from: &str, to: &str) -> Result<MoveRecord, ChessError> {
        let from_sq =
            Square::from_name(from).ok_or_else(|| ChessError::InvalidSquare(from.to_string()))?;
        let to_sq =
            Square::from_name(to).ok_or_else(|| ChessError::InvalidSquare(to.to_string()))?;
        self.make_move(from_sq, to_sq)
    }

    // -----------------------------------------------------------------
    // Undo move
    // -----------------------------------------------------------------

    /// Undo the last move. Returns the move that was undone.
    pub fn undo_move(&mut self) -> Result<Move, ChessError> {
        let record = self.move_history.pop().ok_or(ChessError::NothingToUndo)?;
        self.positions.pop();
        self.position = self
            .positions
            .last()
            .expect("history always holds the starting position")
            .clone();
        self.status = self.compute_status();
        Ok(record.mv)
    }

    // -----------------------------------------------------------------
    // Load a new FEN into an existing game (reset).
    // -----------------------------------------------------------------

    /// Load a FEN position, resetting all history.
    pub fn load_fen(&mut self, fen: &str) -> Result<(), ChessError> {
        let pos = Position::from_fen(fen)?;
        self.position = pos.clone();
        self.positions = vec![pos];
        self.move_history.clear();
        self.started_from_fen = true;
        self.starting_fen = fen.to_string();
        self.status = self.compute_status();
        Ok(())
    }

    // -----------------------------------------------------------------
    // Status detection
    // -----------------------------------------------------------------

    fn compute_status(&self) -> GameStatus {
        let legal = movegen::legal_moves(&self.position);
        let in_check = self.position.is_in_check();

        if legal.is_empty() {
            if in_check {
                return GameStatus::Checkmate;
            } else {
                return GameStatus::Stalemate;
            }
        }

        if self.position.halfmove_clock >= self.config.halfmove_draw_threshold {
            return GameStatus::Draw(DrawReason::FiftyMoveRule);
        }

        if self.repetition_count() >= 3 {
            return GameStatus::Draw(DrawReason::ThreefoldRepetition);
        }

        if in_check {
            GameStatus::Check
        } else {
            GameStatus::Active
        }
    }

    /// How often the current position (board + side + castling +
    /// en-passant, clocks ignored) has occurred in the game.
    fn repetition_count(&self) -> usize {
        let key = self.position.repetition_key();
        self.positions
            .iter()
            .filter(|p| p.repetition_key() == key)
            .count()
    }

    // -----------------------------------------------------------------
    // Board array (for the rendering collaborator)
    // -----------------------------------------------------------------

    /// Generate an 8×8 board array (row-major, rank 8 first → rank 1 last).
    /// Empty squares are empty strings. Pieces are like "wP", "bK", etc.
    pub fn board_array(&self) -> [[String; 8]; 8] {
        let mut board = std::array::from_fn(|_| std::array::from_fn(|_| String::new()));
        for row in 0..8u8 {
            for file in 0..8u8 {
                let sq = Square::from_file_row(file, row);
                if let Some(piece) = self.position.board.get(sq) {
                    let c = piece.color.to_char();
                    let p = match piece.kind {
                        PieceType::Pawn => 'P',
                        PieceType::Knight => 'N',
                        PieceType::Bishop => 'B',
                        PieceType::Rook => 'R',
                        PieceType::Queen => 'Q',
                        PieceType::King => 'K',
                    };
                    board[row as usize][file as usize] = format!("{c}{p}");
                }
            }
        }
        board
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn play(g: &mut Game, from: &str, to: &str) {
        g.make_move_named(from, to).unwrap();
    }

    // -----------------------------------------------------------------
    // Construction
    // -----------------------------------------------------------------

    #[test]
    fn new_game_is_active() {
        let g = Game::new();
        assert_eq!(*g.status(), GameStatus::Active);
        assert!(!g.is_game_over());
        assert_eq!(g.side_to_move(), Color::White);
        assert_eq!(g.fullmove_number(), 1);
    }

    #[test]
    fn game_from_fen() {
        let g =
            Game::from_fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1").unwrap();
        assert_eq!(g.side_to_move(), Color::Black);
        assert!(g.started_from_fen());
    }

    #[test]
    fn game_from_invalid_fen() {
        assert!(Game::from_fen("invalid").is_err());
    }

    #[test]
    fn game_with_custom_threshold() {
        let config = GameConfig {
            halfmove_draw_threshold: 4,
            ..GameConfig::default()
        };
        let mut g = Game::with_config(config).unwrap();
        // Four quiet knight half-moves reach the lowered threshold.
        play(&mut g, "g1", "f3");
        play(&mut g, "g8", "f6");
        play(&mut g, "b1", "c3");
        play(&mut g, "b8", "c6");
        assert_eq!(*g.status(), GameStatus::Draw(DrawReason::FiftyMoveRule));
    }

    // -----------------------------------------------------------------
    // Making moves
    // -----------------------------------------------------------------

    #[test]
    fn make_move_e2e4() {
        let mut g = Game::new();
        let record = g.make_move_named("e2", "e4").unwrap();
        assert_eq!(record.label, "e4");
        assert_eq!(record.captured, None);
        assert_eq!(g.side_to_move(), Color::Black);
        assert_eq!(g.move_history().len(), 1);
        assert_eq!(
            g.to_fen(),
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"
        );
    }

    #[test]
    fn make_illegal_move_errors_and_leaves_game_unchanged() {
        let mut g = Game::new();
        let before = g.to_fen();
        assert!(g.make_move_named("e2", "e5").is_err());
        assert_eq!(g.to_fen(), before);
        assert!(g.move_history().is_empty());
    }

    #[test]
    fn make_move_from_empty_square_errors() {
        let mut g = Game::new();
        assert!(g.make_move_named("e4", "e5").is_err());
    }

    #[test]
    fn make_move_out_of_turn_errors() {
        let mut g = Game::new();
        assert!(g.make_move_named("e7", "e5").is_err());
    }

    #[test]
    fn make_move_with_bad_square_name_errors() {
        let mut g = Game::new();
        assert!(matches!(
            g.make_move_named("e9", "e4"),
            Err(ChessError::InvalidSquare(_))
        ));
    }

    #[test]
    fn capture_is_reported() {
        let mut g = Game::new();
        play(&mut g, "e2", "e4");
        play(&mut g, "d7", "d5");
        let record = g.make_move_named("e4", "d5").unwrap();
        assert_eq!(record.label, "exd5");
        assert_eq!(
            record.captured,
            Some(Piece::new(Color::Black, PieceType::Pawn))
        );
    }

    #[test]
    fn en_passant_capture_is_reported() {
        let mut g = Game::new();
        play(&mut g, "e2", "e4");
        play(&mut g, "a7", "a6");
        play(&mut g, "e4", "e5");
        play(&mut g, "f7", "f5");
        let record = g.make_move_named("e5", "f6").unwrap();
        assert_eq!(record.mv.kind, crate::engine::types::MoveKind::EnPassant);
        assert_eq!(
            record.captured,
            Some(Piece::new(Color::Black, PieceType::Pawn))
        );
    }

    // -----------------------------------------------------------------
    // Undo
    // -----------------------------------------------------------------

    #[test]
    fn undo_single_move() {
        let mut g = Game::new();
        let original_fen = g.to_fen();
        play(&mut g, "e2", "e4");
        g.undo_move().unwrap();
        assert_eq!(g.to_fen(), original_fen);
        assert_eq!(g.move_history().len(), 0);
        assert_eq!(*g.status(), GameStatus::Active);
    }

    #[test]
    fn undo_nothing_errors() {
        let mut g = Game::new();
        assert!(matches!(g.undo_move(), Err(ChessError::NothingToUndo)));
    }

    #[test]
    fn undo_reopens_finished_game() {
        let mut g = Game::new();
        play(&mut g, "f2", "f3");
        play(&mut g, "e7", "e5");
        play(&mut g, "g2", "g4");
        play(&mut g, "d8", "h4");
        assert!(g.is_game_over());
        g.undo_move().unwrap();
        assert!(!g.is_game_over());
    }

    // -----------------------------------------------------------------
    // Status detection: checkmate
    // -----------------------------------------------------------------

    #[test]
    fn fools_mate() {
        let mut g = Game::new();
        play(&mut g, "f2", "f3");
        play(&mut g, "e7", "e5");
        play(&mut g, "g2", "g4");
        let record = g.make_move_named("d8", "h4").unwrap();
        assert_eq!(record.label, "Qh4#");
        assert_eq!(*g.status(), GameStatus::Checkmate);
        assert!(g.is_game_over());
        assert!(g.legal_moves().is_empty());
    }

    #[test]
    fn scholars_mate() {
        let mut g = Game::new();
        play(&mut g, "e2", "e4");
        play(&mut g, "e7", "e5");
        play(&mut g, "f1", "c4");
        play(&mut g, "b8", "c6");
        play(&mut g, "d1", "h5");
        play(&mut g, "g8", "f6");
        let record = g.make_move_named("h5", "f7").unwrap();
        assert_eq!(record.label, "Qxf7#");
        assert_eq!(*g.status(), GameStatus::Checkmate);
    }

    #[test]
    fn check_gets_plus_suffix() {
        let mut g = Game::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 0 1").unwrap();
        let record = g.make_move_named("a1", "a8").unwrap();
        assert_eq!(record.label, "Ra8+");
        assert_eq!(*g.status(), GameStatus::Check);
    }

    #[test]
    fn moves_rejected_after_game_over() {
        let mut g = Game::new();
        play(&mut g, "f2", "f3");
        play(&mut g, "e7", "e5");
        play(&mut g, "g2", "g4");
        play(&mut g, "d8", "h4");
        assert!(matches!(
            g.make_move_named("e2", "e4"),
            Err(ChessError::GameOver(_))
        ));
    }

    #[test]
    fn menus_empty_after_game_over() {
        let mut g = Game::new();
        play(&mut g, "f2", "f3");
        play(&mut g, "e7", "e5");
        play(&mut g, "g2", "g4");
        play(&mut g, "d8", "h4");
        // Even squares with pieces stop offering destinations.
        let e2 = Square::from_name("e2").unwrap();
        assert!(g.legal_destinations(e2).is_empty());
    }

    // -----------------------------------------------------------------
    // Status detection: stalemate
    // -----------------------------------------------------------------

    #[test]
    fn stalemate_detection() {
        // Black king on a8 has no moves but is not in check.
        let g = Game::from_fen("k7/2K5/1Q6/8/8/8/8/8 b - - 0 1").unwrap();
        assert_eq!(*g.status(), GameStatus::Stalemate);
    }

    // -----------------------------------------------------------------
    // Status detection: clock draw
    // -----------------------------------------------------------------

    #[test]
    fn clock_draw_at_fifty_halfmoves() {
        let g = Game::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 50 80").unwrap();
        assert_eq!(*g.status(), GameStatus::Draw(DrawReason::FiftyMoveRule));
    }

    #[test]
    fn clock_below_threshold_is_not_a_draw() {
        let g = Game::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 49 80").unwrap();
        assert_eq!(*g.status(), GameStatus::Active);
    }

    // -----------------------------------------------------------------
    // Threefold repetition
    // -----------------------------------------------------------------

    #[test]
    fn threefold_repetition_on_third_occurrence() {
        let mut g = Game::new();
        // Knight shuffles: the starting position recurs after every fourth
        // half-move.
        play(&mut g, "g1", "f3");
        play(&mut g, "g8", "f6");
        play(&mut g, "f3", "g1");
        play(&mut g, "f6", "g8"); // second occurrence
        assert_eq!(*g.status(), GameStatus::Active);
        play(&mut g, "g1", "f3");
        play(&mut g, "g8", "f6");
        play(&mut g, "f3", "g1");
        assert_eq!(*g.status(), GameStatus::Active);
        play(&mut g, "f6", "g8"); // third occurrence
        assert_eq!(
            *g.status(),
            GameStatus::Draw(DrawReason::ThreefoldRepetition)
        );
    }

    // -----------------------------------------------------------------
    // Menus
    // -----------------------------------------------------------------

    #[test]
    fn legal_destinations_respects_turn() {
        let g = Game::new();
        let e2 = Square::from_name("e2").unwrap();
        let e7 = Square::from_name("e7").unwrap();
        assert_eq!(g.legal_destinations(e2).len(), 2);
        assert!(g.legal_destinations(e7).is_empty());
    }

    #[test]
    fn legal_destinations_empty_square() {
        let g = Game::new();
        let e4 = Square::from_name("e4").unwrap();
        assert!(g.legal_destinations(e4).is_empty());
    }

    // -----------------------------------------------------------------
    // Board array
    // -----------------------------------------------------------------

    #[test]
    fn board_array_starting_position() {
        let g = Game::new();
        let board = g.board_array();
        assert_eq!(board[0][0], "bR");
        assert_eq!(board[7][4], "wK");
        assert_eq!(board[3][0], "");
    }

    // -----------------------------------------------------------------
    // Load FEN
    // -----------------------------------------------------------------

    #[test]
    fn load_fen_resets_game() {
        let mut g = Game::new();
        play(&mut g, "e2", "e4");
        g.load_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        assert_eq!(g.move_history().len(), 0);
        assert!(g.started_from_fen());
        assert_eq!(*g.status(), GameStatus::Active);
    }
}
