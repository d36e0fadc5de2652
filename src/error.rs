use std::path::PathBuf;

use crate::game::Player;

/// Errors from dropping a piece into a column.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("column is full")]
    ColumnFull,

    #[error("column index out of range")]
    InvalidColumn,

    #[error("game is over")]
    GameOver,
}

/// Errors raised when a board snapshot breaks the game's structural rules.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("expected {expected_rows} rows of {expected_cols} cells, got {rows} rows")]
    Shape {
        expected_rows: usize,
        expected_cols: usize,
        rows: usize,
    },

    #[error("row {row} has {len} cells, expected {expected}")]
    RowLength {
        row: usize,
        len: usize,
        expected: usize,
    },

    #[error("unknown cell character {0:?}")]
    InvalidChar(char),

    #[error("piece at row {row}, column {col} is floating above an empty cell")]
    FloatingPiece { row: usize, col: usize },

    #[error("piece counts are unbalanced (red: {red}, yellow: {yellow})")]
    PieceImbalance { red: usize, yellow: usize },

    #[error("both players have four in a row")]
    MultipleWinners,
}

/// Errors returned by the move selection entry point.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("invalid board: {0}")]
    InvalidBoard(#[from] BoardError),

    #[error("game is already won by {}", .0.name())]
    GameOver(Player),

    #[error("it is not {}'s turn on this board", .0.name())]
    OutOfTurn(Player),

    #[error("board is full, no legal moves")]
    NoLegalMoves,
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),

    #[error("unknown tier {0:?} (expected beginner, easy, medium, hard or expert)")]
    UnknownTier(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_error_display() {
        let err = BoardError::PieceImbalance { red: 4, yellow: 1 };
        assert_eq!(
            err.to_string(),
            "piece counts are unbalanced (red: 4, yellow: 1)"
        );
    }

    #[test]
    fn test_engine_error_display() {
        let err = EngineError::GameOver(Player::Yellow);
        assert_eq!(err.to_string(), "game is already won by Yellow");

        let err = EngineError::from(BoardError::InvalidChar('x'));
        assert_eq!(err.to_string(), "invalid board: unknown cell character 'x'");
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::Validation("cache_capacity must be > 0".to_string());
        assert_eq!(
            err.to_string(),
            "config validation error: cache_capacity must be > 0"
        );
    }
}
