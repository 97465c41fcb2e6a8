//! Move-choosing strategies for the machine player.

use crate::error::{GameError, GameResult, MoveError};
use crate::movegen::generate_exhaustive;
use crate::state::{GameState, Move};

/// Picks a move for `state.current_player`.
///
/// Implementations never return an illegal move: they fail with
/// `GameAlreadyOver` on a finished game and `NoLegalMoves` if nothing is
/// playable.
pub trait AiStrategy: Send {
    fn next_move(&mut self, state: &GameState) -> GameResult<Move>;

    fn name(&self) -> &'static str;
}

/// Uniformly random playable cell.
pub struct RandomStrategy {
    rng: fastrand::Rng,
}

impl Default for RandomStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomStrategy {
    pub fn new() -> Self {
        Self {
            rng: fastrand::Rng::new(),
        }
    }

    /// Reproducible sequence of choices.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
        }
    }
}

impl AiStrategy for RandomStrategy {
    fn next_move(&mut self, state: &GameState) -> GameResult<Move> {
        if state.is_game_over {
            return Err(MoveError::GameAlreadyOver.into());
        }
        let moves = generate_exhaustive(state);
        if moves.is_empty() {
            return Err(GameError::NoLegalMoves(state.current_player));
        }
        Ok(moves[self.rng.usize(..moves.len())])
    }

    fn name(&self) -> &'static str {
        "random"
    }
}
