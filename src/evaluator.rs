//! Static evaluation of positions for the search.
//!
//! Scores are always from the AI's point of view: positive favours the AI,
//! negative favours the Human. A [`StateEvaluator`] is an ordered list of
//! [`Heuristic`]s whose outputs are summed; it knows nothing about the
//! individual heuristics, so they can be added or removed freely.

use crate::board::Player;
use crate::constants::{
    ATTACK_WEIGHT, DEFENSE_WEIGHT, SCORE_WEIGHT, TERMINAL_WEIGHT, TERRITORY_WEIGHT,
};
use crate::state::GameState;

/// One term of the evaluation sum.
pub trait Heuristic: Send + Sync {
    fn evaluate(&self, state: &GameState) -> i32;

    /// Short label for logs.
    fn name(&self) -> &'static str;
}

/// Dominates everything else once the game is decided.
#[derive(Debug, Clone, Copy)]
pub struct TerminalHeuristic {
    pub weight: i32,
}

impl Default for TerminalHeuristic {
    fn default() -> Self {
        Self {
            weight: TERMINAL_WEIGHT,
        }
    }
}

impl Heuristic for TerminalHeuristic {
    fn evaluate(&self, state: &GameState) -> i32 {
        match state.winner {
            Player::Ai => self.weight,
            Player::Human => -self.weight,
            Player::None => 0,
        }
    }

    fn name(&self) -> &'static str {
        "terminal"
    }
}

/// Difference in points scored so far.
#[derive(Debug, Clone, Copy)]
pub struct ScoreHeuristic {
    pub weight: i32,
}

impl Default for ScoreHeuristic {
    fn default() -> Self {
        Self {
            weight: SCORE_WEIGHT,
        }
    }
}

impl Heuristic for ScoreHeuristic {
    fn evaluate(&self, state: &GameState) -> i32 {
        let diff = state.scores.ai as i32 - state.scores.human as i32;
        self.weight * diff
    }

    fn name(&self) -> &'static str {
        "score"
    }
}

/// Difference in enclosed cells, including empty territory that scores no points.
#[derive(Debug, Clone, Copy)]
pub struct TerritoryHeuristic {
    pub weight: i32,
}

impl Default for TerritoryHeuristic {
    fn default() -> Self {
        Self {
            weight: TERRITORY_WEIGHT,
        }
    }
}

impl Heuristic for TerritoryHeuristic {
    fn evaluate(&self, state: &GameState) -> i32 {
        let mut ai = 0i32;
        let mut human = 0i32;
        for (_, field) in state.board.iter() {
            match field.enclosed_by {
                Player::Ai => ai += 1,
                Player::Human => human += 1,
                Player::None => {}
            }
        }
        self.weight * (ai - human)
    }

    fn name(&self) -> &'static str {
        "territory"
    }
}

/// One-ply proxy for capture threats.
///
/// For every live (not enclosed) stone, counts orthogonally adjacent enemy
/// stones. Enemies pressing on Human stones count for the AI at
/// `attack_weight`; enemies pressing on AI stones count against it at
/// `defense_weight`.
#[derive(Debug, Clone, Copy)]
pub struct LocalTacticsHeuristic {
    pub attack_weight: i32,
    pub defense_weight: i32,
}

impl Default for LocalTacticsHeuristic {
    fn default() -> Self {
        Self {
            attack_weight: ATTACK_WEIGHT,
            defense_weight: DEFENSE_WEIGHT,
        }
    }
}

impl Heuristic for LocalTacticsHeuristic {
    fn evaluate(&self, state: &GameState) -> i32 {
        let board = &state.board;
        let mut human_pressed = 0i32;
        let mut ai_pressed = 0i32;
        for (pt, field) in board.iter() {
            if field.owner == Player::None || field.is_enclosed() {
                continue;
            }
            let enemy = field.owner.opponent();
            let touching = board
                .neighbors(pt)
                .filter(|&n| board.field(n).owner == enemy)
                .count() as i32;
            match field.owner {
                Player::Human => human_pressed += touching,
                _ => ai_pressed += touching,
            }
        }
        human_pressed * self.attack_weight - ai_pressed * self.defense_weight
    }

    fn name(&self) -> &'static str {
        "local-tactics"
    }
}

/// Sum of an ordered list of heuristics.
pub struct StateEvaluator {
    heuristics: Vec<Box<dyn Heuristic>>,
}

impl Default for StateEvaluator {
    /// Terminal, score, territory, local tactics, with the standard weights.
    fn default() -> Self {
        Self::new(vec![
            Box::new(TerminalHeuristic::default()),
            Box::new(ScoreHeuristic::default()),
            Box::new(TerritoryHeuristic::default()),
            Box::new(LocalTacticsHeuristic::default()),
        ])
    }
}

impl StateEvaluator {
    pub fn new(heuristics: Vec<Box<dyn Heuristic>>) -> Self {
        Self { heuristics }
    }

    /// Append a heuristic after the existing ones.
    pub fn with(mut self, heuristic: impl Heuristic + 'static) -> Self {
        self.heuristics.push(Box::new(heuristic));
        self
    }

    pub fn evaluate(&self, state: &GameState) -> i32 {
        self.heuristics.iter().map(|h| h.evaluate(state)).sum()
    }

    /// Heuristic names in evaluation order.
    pub fn names(&self) -> Vec<&'static str> {
        self.heuristics.iter().map(|h| h.name()).collect()
    }
}

impl std::fmt::Debug for StateEvaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateEvaluator")
            .field("heuristics", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;

    fn state(rows: &[&str]) -> GameState {
        GameState::with_board(Board::from_rows(rows).unwrap(), Player::Human)
    }

    #[test]
    fn test_terminal() {
        let mut s = state(&["H A", "A H"]);
        let h = TerminalHeuristic::default();
        assert_eq!(h.evaluate(&s), 0);
        s.winner = Player::Ai;
        assert_eq!(h.evaluate(&s), TERMINAL_WEIGHT);
        s.winner = Player::Human;
        assert_eq!(h.evaluate(&s), -TERMINAL_WEIGHT);
    }

    #[test]
    fn test_score() {
        let mut s = state(&[". .", ". ."]);
        s.scores.ai = 1;
        s.scores.human = 3;
        assert_eq!(ScoreHeuristic::default().evaluate(&s), -2 * SCORE_WEIGHT);
    }

    #[test]
    fn test_territory_counts_empty_cells() {
        let mut s = state(&["H H H", "H . H", "H A H"]);
        s.board.field_mut((1, 1)).enclosed_by = Player::Human;
        s.board.field_mut((2, 1)).enclosed_by = Player::Ai;
        s.board.field_mut((0, 0)).enclosed_by = Player::Ai;
        assert_eq!(TerritoryHeuristic::default().evaluate(&s), TERRITORY_WEIGHT);
    }

    #[test]
    fn test_local_tactics_is_asymmetric() {
        // One H–A contact seen from both sides: 1*attack - 1*defense.
        let s = state(&["H A", ". ."]);
        assert_eq!(
            LocalTacticsHeuristic::default().evaluate(&s),
            ATTACK_WEIGHT - DEFENSE_WEIGHT
        );
    }

    #[test]
    fn test_local_tactics_skips_enclosed_stones() {
        let mut s = state(&["H A", ". ."]);
        s.board.field_mut((0, 0)).enclosed_by = Player::Ai;
        // Only the live AI stone counts its Human neighbor.
        assert_eq!(LocalTacticsHeuristic::default().evaluate(&s), -DEFENSE_WEIGHT);
    }

    #[test]
    fn test_evaluator_sums_in_order() {
        let mut s = state(&["H A", ". ."]);
        s.scores.ai = 2;
        let evaluator = StateEvaluator::default();
        assert_eq!(
            evaluator.names(),
            vec!["terminal", "score", "territory", "local-tactics"]
        );
        assert_eq!(
            evaluator.evaluate(&s),
            2 * SCORE_WEIGHT + ATTACK_WEIGHT - DEFENSE_WEIGHT
        );
    }

    #[test]
    fn test_evaluator_is_open_for_extension() {
        struct Constant;
        impl Heuristic for Constant {
            fn evaluate(&self, _: &GameState) -> i32 {
                7
            }
            fn name(&self) -> &'static str {
                "constant"
            }
        }
        let s = state(&[". .", ". ."]);
        let evaluator = StateEvaluator::new(Vec::new()).with(Constant).with(Constant);
        assert_eq!(evaluator.evaluate(&s), 14);
        assert_eq!(evaluator.names(), vec!["constant", "constant"]);
    }
}
