use std::fmt;

use crate::engine::squares;

// ---------------------------------------------------------------------------
// Color
// ---------------------------------------------------------------------------

/// The two sides in a chess game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    /// FEN active-colour letter: 'w' or 'b'.
    pub const fn to_char(self) -> char {
        match self {
            Color::White => 'w',
            Color::Black => 'b',
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'w' => Some(Color::White),
            'b' => Some(Color::Black),
            _ => None,
        }
    }
}

impl std::ops::Not for Color {
    type Output = Self;
    fn not(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "white"),
            Color::Black => write!(f, "black"),
        }
    }
}

// ---------------------------------------------------------------------------
// PieceType
// ---------------------------------------------------------------------------

/// The six piece kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PieceType {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceType {
    /// All piece types in order.
    pub const ALL: [PieceType; 6] = [
        PieceType::Pawn,
        PieceType::Knight,
        PieceType::Bishop,
        PieceType::Rook,
        PieceType::Queen,
        PieceType::King,
    ];

    /// Single lowercase FEN letter for the type.
    pub fn letter(self) -> char {
        match self {
            PieceType::Pawn => 'p',
            PieceType::Knight => 'n',
            PieceType::Bishop => 'b',
            PieceType::Rook => 'r',
            PieceType::Queen => 'q',
            PieceType::King => 'k',
        }
    }
}

impl fmt::Display for PieceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PieceType::Pawn => write!(f, "pawn"),
            PieceType::Knight => write!(f, "knight"),
            PieceType::Bishop => write!(f, "bishop"),
            PieceType::Rook => write!(f, "rook"),
            PieceType::Queen => write!(f, "queen"),
            PieceType::King => write!(f, "king"),
        }
    }
}

// ---------------------------------------------------------------------------
// Piece
// ---------------------------------------------------------------------------

/// A piece descriptor: colour × type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceType,
}

impl Piece {
    pub const fn new(color: Color, kind: PieceType) -> Self {
        Piece { color, kind }
    }

    /// FEN letter: uppercase for white, lowercase for black.
    pub fn to_char(self) -> char {
        match self.color {
            Color::White => self.kind.letter().to_ascii_uppercase(),
            Color::Black => self.kind.letter(),
        }
    }

    /// Parse a FEN piece letter (case decides colour).
    pub fn from_char(c: char) -> Option<Self> {
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        let kind = match c.to_ascii_lowercase() {
            'p' => PieceType::Pawn,
            'n' => PieceType::Knight,
            'b' => PieceType::Bishop,
            'r' => PieceType::Rook,
            'q' => PieceType::Queen,
            'k' => PieceType::King,
            _ => return None,
        };
        Some(Piece { color, kind })
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.color, self.kind)
    }
}

// ---------------------------------------------------------------------------
// Square
// ---------------------------------------------------------------------------

/// A square on the board as a linear index in FEN scan order:
/// a8 = 0, b8 = 1, … h8 = 7, a7 = 8, … h1 = 63.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square(pub u8);

impl Square {
    pub const NUM: usize = 64;

    #[inline]
    pub fn new(index: u8) -> Self {
        debug_assert!(index < 64, "square index out of range: {index}");
        Square(index)
    }

    /// File index, 0 = a-file … 7 = h-file.
    #[inline]
    pub fn file(self) -> u8 {
        self.0 % 8
    }

    /// Row index from the top of the board, 0 = rank 8 … 7 = rank 1.
    #[inline]
    pub fn row(self) -> u8 {
        self.0 / 8
    }

    #[inline]
    pub fn from_file_row(file: u8, row: u8) -> Self {
        debug_assert!(file < 8 && row < 8);
        Square(row * 8 + file)
    }

    /// Look up a square by name, e.g. "e4".
    pub fn from_name(name: &str) -> Option<Self> {
        squares::table().index_of(name)
    }

    /// The square's name, e.g. "e4".
    pub fn name(self) -> &'static str {
        squares::table().name_of(self)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ---------------------------------------------------------------------------
// MoveKind & Move
// ---------------------------------------------------------------------------

/// Special-move tag attached to a move by classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveKind {
    Normal,
    CastleKingside,
    CastleQueenside,
    EnPassant,
    Promotion(PieceType),
}

/// A move: origin square, destination square, and special-move tag.
///
/// Transient: produced by generation/classification, consumed by the
/// applier, never stored beyond the history record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub kind: MoveKind,
}

impl Move {
    pub fn new(from: Square, to: Square) -> Self {
        Move {
            from,
            to,
            kind: MoveKind::Normal,
        }
    }

    pub fn with_kind(from: Square, to: Square, kind: MoveKind) -> Self {
        Move { from, to, kind }
    }

    pub fn is_castle(&self) -> bool {
        matches!(
            self.kind,
            MoveKind::CastleKingside | MoveKind::CastleQueenside
        )
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let MoveKind::Promotion(kind) = self.kind {
            write!(f, "={}", kind.letter())?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// MoveSet — the three-way destination partition
// ---------------------------------------------------------------------------

/// Destinations for one piece, partitioned the way the UI consumes them:
/// quiet moves onto empty squares, captures of enemy pieces, and special
/// destinations (en-passant target, castling squares).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MoveSet {
    pub quiet: Vec<Square>,
    pub attacks: Vec<Square>,
    pub special: Vec<Square>,
}

impl MoveSet {
    pub fn is_empty(&self) -> bool {
        self.quiet.is_empty() && self.attacks.is_empty() && self.special.is_empty()
    }

    pub fn len(&self) -> usize {
        self.quiet.len() + self.attacks.len() + self.special.len()
    }

    pub fn contains(&self, sq: Square) -> bool {
        self.quiet.contains(&sq) || self.attacks.contains(&sq) || self.special.contains(&sq)
    }

    /// All destinations across the three partitions.
    pub fn iter(&self) -> impl Iterator<Item = Square> + '_ {
        self.quiet
            .iter()
            .chain(self.attacks.iter())
            .chain(self.special.iter())
            .copied()
    }

    /// Keep only destinations satisfying `keep`, preserving the partition.
    pub fn retain(&mut self, mut keep: impl FnMut(Square) -> bool) {
        self.quiet.retain(|&sq| keep(sq));
        self.attacks.retain(|&sq| keep(sq));
        self.special.retain(|&sq| keep(sq));
    }
}

// ---------------------------------------------------------------------------
// CastlingRights
// ---------------------------------------------------------------------------

/// Castling availability bitfield: bits 0-3 = WK, WQ, BK, BQ.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CastlingRights(pub u8);

impl CastlingRights {
    pub const NONE: CastlingRights = CastlingRights(0);
    pub const WHITE_KINGSIDE: u8 = 1;
    pub const WHITE_QUEENSIDE: u8 = 2;
    pub const BLACK_KINGSIDE: u8 = 4;
    pub const BLACK_QUEENSIDE: u8 = 8;
    pub const ALL: CastlingRights = CastlingRights(0b1111);

    #[inline]
    pub fn has(self, flag: u8) -> bool {
        self.0 & flag != 0
    }

    #[inline]
    pub fn remove(&mut self, flag: u8) {
        self.0 &= !flag;
    }

    #[inline]
    pub fn kingside_flag(color: Color) -> u8 {
        match color {
            Color::White => Self::WHITE_KINGSIDE,
            Color::Black => Self::BLACK_KINGSIDE,
        }
    }

    #[inline]
    pub fn queenside_flag(color: Color) -> u8 {
        match color {
            Color::White => Self::WHITE_QUEENSIDE,
            Color::Black => Self::BLACK_QUEENSIDE,
        }
    }

    #[inline]
    pub fn can_castle_kingside(self, color: Color) -> bool {
        self.has(Self::kingside_flag(color))
    }

    #[inline]
    pub fn can_castle_queenside(self, color: Color) -> bool {
        self.has(Self::queenside_flag(color))
    }

    /// Remove both rights for one colour.
    pub fn clear_color(&mut self, color: Color) {
        self.remove(Self::kingside_flag(color));
        self.remove(Self::queenside_flag(color));
    }

    /// Parse FEN castling string (e.g. "KQkq", "-", "Kq").
    pub fn from_fen(s: &str) -> Option<Self> {
        if s == "-" {
            return Some(CastlingRights::NONE);
        }
        let mut rights = 0u8;
        for c in s.chars() {
            match c {
                'K' => rights |= Self::WHITE_KINGSIDE,
                'Q' => rights |= Self::WHITE_QUEENSIDE,
                'k' => rights |= Self::BLACK_KINGSIDE,
                'q' => rights |= Self::BLACK_QUEENSIDE,
                _ => return None,
            }
        }
        Some(CastlingRights(rights))
    }

    /// Convert to FEN castling string.
    pub fn to_fen(self) -> String {
        if self.0 == 0 {
            return "-".to_string();
        }
        let mut s = String::with_capacity(4);
        if self.has(Self::WHITE_KINGSIDE) {
            s.push('K');
        }
        if self.has(Self::WHITE_QUEENSIDE) {
            s.push('Q');
        }
        if self.has(Self::BLACK_KINGSIDE) {
            s.push('k');
        }
        if self.has(Self::BLACK_QUEENSIDE) {
            s.push('q');
        }
        s
    }
}

impl fmt::Display for CastlingRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_fen())
    }
}

// ---------------------------------------------------------------------------
// GameStatus
// ---------------------------------------------------------------------------

/// Current status of a game.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Active,
    Check,
    Checkmate,
    Stalemate,
    Draw(DrawReason),
}

impl GameStatus {
    pub fn as_str(&self) -> &str {
        match self {
            GameStatus::Active => "active",
            GameStatus::Check => "check",
            GameStatus::Checkmate => "checkmate",
            GameStatus::Stalemate => "stalemate",
            GameStatus::Draw(reason) => reason.as_str(),
        }
    }

    pub fn is_game_over(&self) -> bool {
        matches!(
            self,
            GameStatus::Checkmate | GameStatus::Stalemate | GameStatus::Draw(_)
        )
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Reason for a draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrawReason {
    /// Halfmove clock reached the configured threshold.
    FiftyMoveRule,
    /// Same position (board + side + castling + en-passant) three times.
    ThreefoldRepetition,
}

impl DrawReason {
    pub fn as_str(&self) -> &str {
        match self {
            DrawReason::FiftyMoveRule => "fifty_move_rule",
            DrawReason::ThreefoldRepetition => "threefold_repetition",
        }
    }
}

// ---------------------------------------------------------------------------
// ChessError
// ---------------------------------------------------------------------------

/// Domain errors for the chess engine.
#[derive(Debug, thiserror::Error)]
pub enum ChessError {
    #[error("invalid move: {from} -> {to}: {reason}")]
    InvalidMove {
        from: String,
        to: String,
        reason: String,
    },

    #[error("invalid FEN string: {0}")]
    InvalidFen(String),

    #[error("invalid square notation: {0}")]
    InvalidSquare(String),

    #[error("game is already over: {0}")]
    GameOver(String),

    #[error("no moves to undo")]
    NothingToUndo,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
