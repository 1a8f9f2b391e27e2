//! Bidirectional square-name lookup.
//!
//! Every square has a name (file letter + rank digit) and a linear index in
//! FEN scan order (a8 = 0 … h1 = 63). The table is built once (via
//! `OnceLock`) from the fixed 8×8 layout and never mutated afterwards.

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::engine::types::Square;

/// The files and ranks in encoding order: rank 8 is scanned first.
pub const FILES: [char; 8] = ['a', 'b', 'c', 'd', 'e', 'f', 'g', 'h'];
pub const RANKS: [char; 8] = ['8', '7', '6', '5', '4', '3', '2', '1'];

/// Get a reference to the global square-name table.
pub fn table() -> &'static SquareNames {
    static TABLE: OnceLock<SquareNames> = OnceLock::new();
    TABLE.get_or_init(SquareNames::build)
}

/// Immutable name↔index mapping for the 64 squares.
pub struct SquareNames {
    names: [String; 64],
    indices: HashMap<String, Square>,
}

impl SquareNames {
    fn build() -> Self {
        let mut names: [String; 64] = std::array::from_fn(|_| String::new());
        let mut indices = HashMap::with_capacity(64);
        let mut index = 0u8;
        for rank in RANKS {
            for file in FILES {
                let name = format!("{file}{rank}");
                names[index as usize] = name.clone();
                indices.insert(name, Square(index));
                index += 1;
            }
        }
        SquareNames { names, indices }
    }

    /// Index for a square name ("e4" → 36), or `None` for anything that is
    /// not a name of one of the 64 squares.
    pub fn index_of(&self, name: &str) -> Option<Square> {
        self.indices.get(name).copied()
    }

    /// Name for a square index (36 → "e4").
    pub fn name_of(&self, sq: Square) -> &str {
        &self.names[sq.0 as usize]
    }
}
