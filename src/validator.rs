//! Move legality checks.
//!
//! The engine never re-checks its input, so every externally supplied move
//! goes through [`validate`] first.

use crate::board::Player;
use crate::error::MoveError;
use crate::state::{GameState, Move};

/// Check `mv` against `state` without modifying anything.
///
/// Checks run in a fixed order and stop at the first failure: game over,
/// wrong side, out of bounds, occupied cell, enclosed cell.
pub fn validate(state: &GameState, mv: &Move) -> Result<(), MoveError> {
    if state.is_game_over {
        return Err(MoveError::GameAlreadyOver);
    }
    if mv.player != state.current_player {
        return Err(MoveError::NotYourTurn {
            expected: state.current_player,
            got: mv.player,
        });
    }
    let Some(field) = state.board.get(mv.point()) else {
        return Err(MoveError::OutOfBounds {
            row: mv.row,
            col: mv.col,
            size: state.size(),
        });
    };
    if field.owner != Player::None {
        return Err(MoveError::CellOccupied {
            row: mv.row,
            col: mv.col,
        });
    }
    if field.is_enclosed() {
        return Err(MoveError::CellEnclosed {
            row: mv.row,
            col: mv.col,
        });
    }
    Ok(())
}

/// Convenience wrapper for callers that only need a yes/no answer.
pub fn is_legal(state: &GameState, mv: &Move) -> bool {
    validate(state, mv).is_ok()
}
