pub mod apply;
pub mod attacks;
pub mod board;
pub mod game;
pub mod movegen;
pub mod notation;
pub mod squares;
pub mod types;

pub use board::{Board, Position};
pub use game::{Game, MoveRecord};
pub use movegen::{legal_moves, legal_moves_from};
pub use types::*;
