//! Candidate move generation for the side to move.
//!
//! Exhaustive generation lists every playable cell. Frontier generation
//! keeps only playable cells next to (including diagonally) a live enemy
//! stone, which shrinks the search tree a lot but yields nothing on an
//! empty or sparse board. [`generate`] therefore falls back to exhaustive
//! generation whenever the frontier is empty, so it returns at least one
//! move whenever the game is not over.

use crate::board::Player;
use crate::constants::ALL_DIRECTIONS;
use crate::state::{GameState, Move};

/// Which candidate set the search explores.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum MoveGeneration {
    Exhaustive,
    /// Frontier cells, or every playable cell if there is no frontier.
    #[default]
    Frontier,
}

/// Candidate moves for `state.current_player` in row-major order.
pub fn generate(state: &GameState, mode: MoveGeneration) -> Vec<Move> {
    match mode {
        MoveGeneration::Exhaustive => generate_exhaustive(state),
        MoveGeneration::Frontier => {
            let moves = generate_frontier(state);
            if moves.is_empty() {
                generate_exhaustive(state)
            } else {
                moves
            }
        }
    }
}

/// Every playable cell.
pub fn generate_exhaustive(state: &GameState) -> Vec<Move> {
    let player = state.current_player;
    if state.is_game_over || player == Player::None {
        return Vec::new();
    }
    state
        .board
        .iter()
        .filter(|(_, f)| f.is_playable())
        .map(|((r, c), _)| Move::new(player, r, c))
        .collect()
}

/// Playable cells 8-adjacent to at least one live enemy stone. May be empty.
pub fn generate_frontier(state: &GameState) -> Vec<Move> {
    let player = state.current_player;
    if state.is_game_over || player == Player::None {
        return Vec::new();
    }
    let enemy = player.opponent();
    let board = &state.board;
    board
        .iter()
        .filter(|(_, f)| f.is_playable())
        .filter(|&(pt, _)| {
            ALL_DIRECTIONS.iter().any(|&d| {
                board.offset(pt, d).is_some_and(|n| {
                    let nf = board.field(n);
                    nf.owner == enemy && !nf.is_enclosed()
                })
            })
        })
        .map(|((r, c), _)| Move::new(player, r, c))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;

    fn state(rows: &[&str], to_move: Player) -> GameState {
        GameState::with_board(Board::from_rows(rows).unwrap(), to_move)
    }

    fn points(moves: &[Move]) -> Vec<(usize, usize)> {
        moves.iter().map(Move::point).collect()
    }

    #[test]
    fn test_exhaustive_lists_playable_cells() {
        let mut s = state(&["H .", ". ."], Player::Ai);
        s.board.field_mut((1, 1)).enclosed_by = Player::Human;
        let moves = generate_exhaustive(&s);
        assert_eq!(points(&moves), vec![(0, 1), (1, 0)]);
        assert!(moves.iter().all(|m| m.player == Player::Ai));
    }

    #[test]
    fn test_frontier_only_near_enemy() {
        let s = state(&[". . . .", ". H . .", ". . . .", ". . . A"], Player::Ai);
        let moves = generate_frontier(&s);
        // The 8 cells around H; the AI stone does not count for the AI.
        assert_eq!(moves.len(), 8);
        assert!(!points(&moves).contains(&(2, 3)));
    }

    #[test]
    fn test_frontier_ignores_enclosed_enemies() {
        let mut s = state(&[". . .", ". H .", ". . ."], Player::Ai);
        s.board.field_mut((1, 1)).enclosed_by = Player::Ai;
        assert!(generate_frontier(&s).is_empty());
    }

    #[test]
    fn test_frontier_falls_back_on_empty_board() {
        let s = GameState::new(3, Player::Ai).unwrap();
        assert!(generate_frontier(&s).is_empty());
        assert_eq!(generate(&s, MoveGeneration::Frontier).len(), 9);
    }

    #[test]
    fn test_nothing_when_game_over() {
        let s = state(&["H A", "A H"], Player::Human);
        assert!(generate(&s, MoveGeneration::Frontier).is_empty());
        assert!(generate(&s, MoveGeneration::Exhaustive).is_empty());
    }
}
