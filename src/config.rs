/// FEN of the standard starting position.
pub const STANDARD_START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Engine configuration parsed from environment variables.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// FEN a new game starts from.
    pub start_fen: String,
    /// Halfmove-clock value at which the game is drawn. Counted in
    /// half-moves, so the default of 50 is stricter than the standard
    /// hundred-half-move formulation of the fifty-move rule.
    pub halfmove_draw_threshold: u16,
}

impl GameConfig {
    /// Load configuration from environment variables with defaults.
    pub fn from_env() -> Self {
        GameConfig {
            start_fen: std::env::var("SHATRANJ_START_FEN")
                .unwrap_or_else(|_| STANDARD_START_FEN.to_string()),
            halfmove_draw_threshold: std::env::var("SHATRANJ_HALFMOVE_DRAW")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(50),
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            start_fen: STANDARD_START_FEN.to_string(),
            halfmove_draw_threshold: 50,
        }
    }
}
