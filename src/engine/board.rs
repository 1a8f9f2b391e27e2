//! Mailbox chess position representation.
//!
//! `Board` is an ordered sequence of exactly 64 cells in FEN scan order
//! (a8 = cell 0 … h1 = cell 63), each empty or holding a piece. `Position`
//! wraps a board with side to move, castling rights, en-passant target, and
//! the move clocks. Positions are immutable once produced: every transition
//! goes through [`crate::engine::apply`] and yields a new value.

use crate::engine::attacks;
use crate::engine::types::{CastlingRights, ChessError, Color, Piece, PieceType, Square};

// ---------------------------------------------------------------------------
// Board
// ---------------------------------------------------------------------------

/// Piece placement only: 64 cells, each `Option<Piece>`.
///
/// All occupancy queries in the engine go through [`Board::get`]; no other
/// component keeps its own notion of what stands where.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    cells: [Option<Piece>; 64],
}

impl Board {
    /// An empty board with no pieces.
    pub fn empty() -> Self {
        Board { cells: [None; 64] }
    }

    /// What piece (if any) is on a given square?
    #[inline]
    pub fn get(&self, sq: Square) -> Option<Piece> {
        self.cells[sq.0 as usize]
    }

    /// Low-level cell write, used by the codec and the move applier.
    #[inline]
    pub fn set(&mut self, sq: Square, piece: Option<Piece>) {
        self.cells[sq.0 as usize] = piece;
    }

    #[inline]
    pub fn is_occupied(&self, sq: Square) -> bool {
        self.cells[sq.0 as usize].is_some()
    }

    /// Iterate over all occupied squares in scan order.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(i, cell)| cell.map(|p| (Square(i as u8), p)))
    }

    /// Find the king square for the given colour.
    ///
    /// A position with zero kings of a colour is a caller contract
    /// violation; the engine fails fast rather than guessing.
    pub fn king_sq(&self, color: Color) -> Square {
        self.pieces()
            .find(|(_, p)| p.color == color && p.kind == PieceType::King)
            .map(|(sq, _)| sq)
            .expect("king must exist")
    }
}

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// A complete chess position: placement plus the FEN bookkeeping fields.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Position {
    /// Piece placement.
    pub board: Board,

    /// Whose turn it is.
    pub side_to_move: Color,

    /// Castling availability (K/Q/k/q).
    pub castling_rights: CastlingRights,

    /// En-passant target square (the square *behind* the double-stepped
    /// pawn), valid for exactly one ply.
    pub en_passant: Option<Square>,

    /// Half-move clock (reset on pawn move or capture).
    pub halfmove_clock: u16,

    /// Full-move number (starts at 1, incremented after Black moves).
    pub fullmove_number: u16,
}

impl Position {
    /// An empty position with no pieces.
    pub fn empty() -> Self {
        Position {
            board: Board::empty(),
            side_to_move: Color::White,
            castling_rights: CastlingRights::NONE,
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    /// Standard starting position.
    pub fn starting() -> Self {
        Self::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1")
            .expect("starting FEN is always valid")
    }

    // -----------------------------------------------------------------------
    // Attack queries
    // -----------------------------------------------------------------------

    /// Is `sq` attacked by any piece of colour `by`?
    #[inline]
    pub fn is_square_attacked(&self, sq: Square, by: Color) -> bool {
        attacks::square_attacked(&self.board, sq, by)
    }

    /// Is the side-to-move's king currently in check?
    #[inline]
    pub fn is_in_check(&self) -> bool {
        let king = self.board.king_sq(self.side_to_move);
        self.is_square_attacked(king, !self.side_to_move)
    }

    // -----------------------------------------------------------------------
    // Board display (8×8 text grid)
    // -----------------------------------------------------------------------

    /// Render the board as an 8-line string (rank 8 at top), for debugging.
    pub fn board_string(&self) -> String {
        let mut s = String::with_capacity(200);
        for row in 0..8u8 {
            s.push((b'8' - row) as char);
            s.push(' ');
            for file in 0..8u8 {
                let sq = Square::from_file_row(file, row);
                let ch = match self.board.get(sq) {
                    Some(p) => p.to_char(),
                    None => '.',
                };
                s.push(ch);
                if file < 7 {
                    s.push(' ');
                }
            }
            s.push('\n');
        }
        s.push_str("  a b c d e f g h");
        s
    }
}

// ---------------------------------------------------------------------------
// FEN parsing & generation
// ---------------------------------------------------------------------------

impl Position {
    /// Parse a FEN string into a `Position`.
    ///
    /// Validates all 6 fields (piece placement, side to move, castling,
    /// en passant, halfmove clock, fullmove number), requires the placement
    /// to resolve to exactly 64 cells, and ensures exactly one king per
    /// side.
    pub fn from_fen(fen: &str) -> Result<Self, ChessError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.len() != 6 {
            return Err(ChessError::InvalidFen(format!(
                "expected 6 fields, got {}",
                fields.len()
            )));
        }

        let mut pos = Position::empty();

        // ----- Field 1: Piece placement -----
        let ranks: Vec<&str> = fields[0].split('/').collect();
        if ranks.len() != 8 {
            return Err(ChessError::InvalidFen(format!(
                "expected 8 ranks, got {}",
                ranks.len()
            )));
        }

        for (row, rank_str) in ranks.iter().enumerate() {
            let rank_label = 8 - row; // FEN starts from rank 8
            let mut file: u8 = 0;
            for ch in rank_str.chars() {
                if file > 7 {
                    return Err(ChessError::InvalidFen(format!(
                        "too many squares in rank {rank_label}"
                    )));
                }
                if let Some(digit) = ch.to_digit(10) {
                    if !(1..=8).contains(&digit) {
                        return Err(ChessError::InvalidFen(format!(
                            "invalid empty count '{ch}' in rank {rank_label}"
                        )));
                    }
                    file += digit as u8;
                } else if let Some(piece) = Piece::from_char(ch) {
                    let sq = Square::from_file_row(file, row as u8);
                    pos.board.set(sq, Some(piece));
                    file += 1;
                } else {
                    return Err(ChessError::InvalidFen(format!(
                        "invalid character '{ch}' in piece placement"
                    )));
                }
            }
            if file != 8 {
                return Err(ChessError::InvalidFen(format!(
                    "rank {rank_label} has {file} squares instead of 8"
                )));
            }
        }

        // Validate exactly one king per side.
        for color in [Color::White, Color::Black] {
            let king_count = pos
                .board
                .pieces()
                .filter(|(_, p)| p.color == color && p.kind == PieceType::King)
                .count();
            if king_count != 1 {
                return Err(ChessError::InvalidFen(format!(
                    "{color} has {king_count} kings (expected 1)"
                )));
            }
        }

        // ----- Field 2: Side to move -----
        pos.side_to_move = match fields[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => {
                return Err(ChessError::InvalidFen(format!(
                    "invalid side to move: '{other}'"
                )));
            }
        };

        // ----- Field 3: Castling availability -----
        pos.castling_rights = CastlingRights::from_fen(fields[2]).ok_or_else(|| {
            ChessError::InvalidFen(format!("invalid castling string: '{}'", fields[2]))
        })?;

        // ----- Field 4: En passant target square -----
        if fields[3] != "-" {
            let ep_sq = Square::from_name(fields[3]).ok_or_else(|| {
                ChessError::InvalidFen(format!("invalid en passant square: '{}'", fields[3]))
            })?;
            // The passed-over square is always on rank 3 or rank 6.
            let row = ep_sq.row();
            if row != 2 && row != 5 {
                return Err(ChessError::InvalidFen(format!(
                    "en passant square {} is not on rank 3 or 6",
                    fields[3]
                )));
            }
            pos.en_passant = Some(ep_sq);
        }

        // ----- Field 5: Halfmove clock -----
        pos.halfmove_clock = fields[4].parse::<u16>().map_err(|_| {
            ChessError::InvalidFen(format!("invalid halfmove clock: '{}'", fields[4]))
        })?;

        // ----- Field 6: Fullmove number -----
        pos.fullmove_number = fields[5].parse::<u16>().map_err(|_| {
            ChessError::InvalidFen(format!("invalid fullmove number: '{}'", fields[5]))
        })?;
        if pos.fullmove_number == 0 {
            return Err(ChessError::InvalidFen(
                "fullmove number must be >= 1".to_string(),
            ));
        }

        Ok(pos)
    }

    /// The piece-placement field with canonical digit-run compression.
    fn placement_field(&self) -> String {
        let mut field = String::with_capacity(72);
        for row in 0..8u8 {
            let mut empty_count = 0u8;
            for file in 0..8u8 {
                let sq = Square::from_file_row(file, row);
                match self.board.get(sq) {
                    Some(piece) => {
                        if empty_count > 0 {
                            field.push((b'0' + empty_count) as char);
                            empty_count = 0;
                        }
                        field.push(piece.to_char());
                    }
                    None => {
                        empty_count += 1;
                    }
                }
            }
            if empty_count > 0 {
                field.push((b'0' + empty_count) as char);
            }
            if row < 7 {
                field.push('/');
            }
        }
        field
    }

    /// The position without its clocks: board, side, castling, en-passant.
    /// Two positions with equal keys repeat for the threefold rule.
    pub fn repetition_key(&self) -> String {
        let mut key = self.placement_field();
        key.push(' ');
        key.push(self.side_to_move.to_char());
        key.push(' ');
        key.push_str(&self.castling_rights.to_fen());
        key.push(' ');
        match self.en_passant {
            Some(sq) => key.push_str(sq.name()),
            None => key.push('-'),
        }
        key
    }

    /// Export the position as a FEN string.
    pub fn to_fen(&self) -> String {
        let mut fen = self.repetition_key();
        fen.push(' ');
        fen.push_str(&self.halfmove_clock.to_string());
        fen.push(' ');
        fen.push_str(&self.fullmove_number.to_string());
        fen
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.board_string())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
