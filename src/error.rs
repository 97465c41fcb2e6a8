//! Error types for move validation and game operations.

use thiserror::Error;

use crate::board::Player;
use crate::service::GameId;

/// Why a move was rejected by [`crate::validator::validate`].
///
/// Variants are listed in the order the validator checks them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("the game has already ended")]
    GameAlreadyOver,

    #[error("it is not {got}'s turn (waiting for {expected})")]
    NotYourTurn { expected: Player, got: Player },

    #[error("({row}, {col}) is outside the {size}x{size} board")]
    OutOfBounds { row: usize, col: usize, size: usize },

    #[error("({row}, {col}) is already occupied")]
    CellOccupied { row: usize, col: usize },

    #[error("({row}, {col}) is enclosed territory")]
    CellEnclosed { row: usize, col: usize },
}

/// Errors surfaced by the game service and the AI strategies.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("game {0} not found")]
    GameNotFound(GameId),

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("no legal moves available for {0}")]
    NoLegalMoves(Player),

    #[error(transparent)]
    Move(#[from] MoveError),
}

/// Flat classification of every [`GameError`], for callers that map
/// failures onto another layer (status codes, protocol replies).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    GameNotFound,
    InvalidConfiguration,
    GameAlreadyOver,
    NotYourTurn,
    OutOfBounds,
    CellOccupied,
    CellEnclosed,
    NoLegalMoves,
}

impl MoveError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            MoveError::GameAlreadyOver => ErrorKind::GameAlreadyOver,
            MoveError::NotYourTurn { .. } => ErrorKind::NotYourTurn,
            MoveError::OutOfBounds { .. } => ErrorKind::OutOfBounds,
            MoveError::CellOccupied { .. } => ErrorKind::CellOccupied,
            MoveError::CellEnclosed { .. } => ErrorKind::CellEnclosed,
        }
    }
}

impl GameError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GameError::GameNotFound(_) => ErrorKind::GameNotFound,
            GameError::InvalidConfiguration(_) => ErrorKind::InvalidConfiguration,
            GameError::NoLegalMoves(_) => ErrorKind::NoLegalMoves,
            GameError::Move(e) => e.kind(),
        }
    }
}

/// Result type alias for game operations.
pub type GameResult<T> = Result<T, GameError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_error_kind_passes_through() {
        let err: GameError = MoveError::CellOccupied { row: 1, col: 2 }.into();
        assert_eq!(err.kind(), ErrorKind::CellOccupied);
        assert_eq!(err.to_string(), "(1, 2) is already occupied");
    }

    #[test]
    fn test_not_your_turn_message() {
        let err = MoveError::NotYourTurn {
            expected: Player::Ai,
            got: Player::Human,
        };
        assert_eq!(err.to_string(), "it is not Human's turn (waiting for AI)");
    }
}
