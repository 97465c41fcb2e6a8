//! Minimax search with alpha-beta pruning.
//!
//! The search mutates a single [`GameState`] and takes every move back with
//! [`engine::with_move`], so no board is cloned below the root. Values come
//! from a [`StateEvaluator`] and are always from the AI's point of view: the
//! AI maximizes and the Human minimizes.
//!
//! With `parallel` enabled the root moves are spread over the rayon pool.
//! Each root branch works on its own copy of the position and searches with
//! a full window; the results are folded in generation order, so ties
//! resolve exactly as in the sequential search.
//!
//! A search can be cut short by a time limit or a [`CancelToken`]. Nodes
//! reached after that are scored statically and the root keeps the best
//! move found so far.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use rayon::prelude::*;
use tracing::debug;

use crate::board::Player;
use crate::constants::{DEFAULT_SEARCH_DEPTH, MAX_SEARCH_DEPTH};
use crate::engine;
use crate::error::{GameError, GameResult, MoveError};
use crate::evaluator::StateEvaluator;
use crate::movegen::{MoveGeneration, generate};
use crate::state::{GameState, Move};
use crate::strategy::AiStrategy;

/// Search parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    /// Plies searched, counting the root move. Must be at least 1.
    pub depth: u32,
    /// Spread root moves across threads.
    pub parallel: bool,
    pub move_generation: MoveGeneration,
    /// Stop deepening after this long and answer with the best move so far.
    pub time_limit: Option<Duration>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            depth: DEFAULT_SEARCH_DEPTH,
            parallel: false,
            move_generation: MoveGeneration::default(),
            time_limit: None,
        }
    }
}

impl SearchConfig {
    pub fn with_depth(depth: u32) -> Self {
        Self {
            depth,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> GameResult<()> {
        if self.depth == 0 || self.depth > MAX_SEARCH_DEPTH {
            return Err(GameError::InvalidConfiguration(format!(
                "search depth must be between 1 and {MAX_SEARCH_DEPTH}, got {}",
                self.depth
            )));
        }
        Ok(())
    }
}

/// Shared flag that stops a running search from another thread.
///
/// A token is handed to a single [`MinimaxStrategy::search_with_cancel`]
/// call; once cancelled it stays cancelled, so each search gets a fresh one.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Outcome of one root search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchReport {
    pub best_move: Move,
    /// Minimax value of `best_move` (AI-positive).
    pub score: i32,
    /// Positions visited below the root.
    pub nodes: u64,
    /// False if the time limit or a cancellation cut the search short.
    pub completed: bool,
}

pub struct MinimaxStrategy {
    config: SearchConfig,
    evaluator: StateEvaluator,
}

impl MinimaxStrategy {
    /// Strategy with the default evaluator.
    pub fn new(config: SearchConfig) -> GameResult<Self> {
        Self::with_evaluator(config, StateEvaluator::default())
    }

    pub fn with_evaluator(config: SearchConfig, evaluator: StateEvaluator) -> GameResult<Self> {
        config.validate()?;
        Ok(Self { config, evaluator })
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn evaluator(&self) -> &StateEvaluator {
        &self.evaluator
    }

    /// Best move for the side to move.
    ///
    /// # Errors
    /// `GameAlreadyOver` on a finished game, `NoLegalMoves` if the side to
    /// move has nothing to play.
    pub fn get_next_move(&self, state: &GameState) -> GameResult<Move> {
        self.search(state).map(|report| report.best_move)
    }

    /// Run a root search and report the chosen move with its value.
    pub fn search(&self, state: &GameState) -> GameResult<SearchReport> {
        self.search_with_cancel(state, &CancelToken::new())
    }

    /// Like [`search`](Self::search), stopping early once `cancel` fires.
    ///
    /// Only root moves whose subtrees were searched to the end compete for
    /// the answer. A cut-short move is played only when nothing finished
    /// before it, which can only be the first candidate.
    pub fn search_with_cancel(
        &self,
        state: &GameState,
        cancel: &CancelToken,
    ) -> GameResult<SearchReport> {
        if state.is_game_over {
            return Err(MoveError::GameAlreadyOver.into());
        }
        let root = state.current_player;
        let moves = generate(state, self.config.move_generation);
        if moves.is_empty() {
            return Err(GameError::NoLegalMoves(root));
        }

        let deadline = self.config.time_limit.map(|limit| Instant::now() + limit);
        let report = if self.config.parallel && moves.len() > 1 {
            self.search_parallel(state, &moves, cancel, deadline)
        } else {
            self.search_sequential(state, &moves, cancel, deadline)
        };

        debug!(
            player = %root,
            row = report.best_move.row,
            col = report.best_move.col,
            score = report.score,
            nodes = report.nodes,
            candidates = moves.len(),
            completed = report.completed,
            "search finished"
        );
        Ok(report)
    }

    /// Alpha-beta value of `state` searched `depth` plies deep.
    ///
    /// `state` is mutated during the search and restored before returning.
    pub fn minimax(&self, state: &mut GameState, depth: u32, alpha: i32, beta: i32) -> i32 {
        let cancel = CancelToken::new();
        Searcher::new(self, &cancel, None).minimax(state, depth, alpha, beta)
    }

    fn search_sequential(
        &self,
        state: &GameState,
        moves: &[Move],
        cancel: &CancelToken,
        deadline: Option<Instant>,
    ) -> SearchReport {
        let maximizing = state.current_player == Player::Ai;
        let child_depth = self.config.depth.saturating_sub(1);
        let mut searcher = Searcher::new(self, cancel, deadline);
        let mut work = state.clone();
        let mut alpha = i32::MIN;
        let mut beta = i32::MAX;
        let mut best: Option<(usize, i32)> = None;

        for (i, mv) in moves.iter().enumerate() {
            if best.is_some() && searcher.expired() {
                break;
            }
            let value = engine::with_move(&mut work, mv, |s| {
                searcher.minimax(s, child_depth, alpha, beta)
            });
            // Stopping is sticky: this subtree and every later one are partial.
            if searcher.stopped && best.is_some() {
                break;
            }
            if improves(best, value, maximizing) {
                best = Some((i, value));
                if maximizing {
                    alpha = value;
                } else {
                    beta = value;
                }
            }
        }

        let (index, score) = best.unwrap_or((0, i32::MIN));
        SearchReport {
            best_move: moves[index],
            score,
            nodes: searcher.nodes,
            completed: !searcher.stopped,
        }
    }

    fn search_parallel(
        &self,
        state: &GameState,
        moves: &[Move],
        cancel: &CancelToken,
        deadline: Option<Instant>,
    ) -> SearchReport {
        let maximizing = state.current_player == Player::Ai;
        let child_depth = self.config.depth.saturating_sub(1);

        let branches: Vec<(i32, u64, bool)> = moves
            .par_iter()
            .map(|mv| {
                let mut branch = engine::apply(state, mv);
                let mut searcher = Searcher::new(self, cancel, deadline);
                let value = searcher.minimax(&mut branch, child_depth, i32::MIN, i32::MAX);
                (value, searcher.nodes, searcher.stopped)
            })
            .collect();

        let nodes = branches.iter().map(|&(_, n, _)| n).sum();
        let stopped = branches.iter().any(|&(_, _, cut)| cut);

        let mut best: Option<(usize, i32)> = None;
        for (i, &(value, _, cut)) in branches.iter().enumerate() {
            if !cut && improves(best, value, maximizing) {
                best = Some((i, value));
            }
        }
        // No branch finished: fall back to the first move, as the sequential search does.
        let (index, score) = best.unwrap_or((0, branches[0].0));
        SearchReport {
            best_move: moves[index],
            score,
            nodes,
            completed: !stopped,
        }
    }
}

impl AiStrategy for MinimaxStrategy {
    fn next_move(&mut self, state: &GameState) -> GameResult<Move> {
        self.get_next_move(state)
    }

    fn name(&self) -> &'static str {
        "minimax"
    }
}

/// Strictly better than the current best, so the first of equal moves wins.
#[inline]
fn improves(best: Option<(usize, i32)>, value: i32, maximizing: bool) -> bool {
    match best {
        None => true,
        Some((_, b)) if maximizing => value > b,
        Some((_, b)) => value < b,
    }
}

/// Per-search bookkeeping: node count and stop condition.
struct Searcher<'a> {
    strategy: &'a MinimaxStrategy,
    cancel: &'a CancelToken,
    deadline: Option<Instant>,
    nodes: u64,
    /// Set once the search was cut short; every value after that is partial.
    stopped: bool,
}

impl<'a> Searcher<'a> {
    fn new(strategy: &'a MinimaxStrategy, cancel: &'a CancelToken, deadline: Option<Instant>) -> Self {
        Self {
            strategy,
            cancel,
            deadline,
            nodes: 0,
            stopped: false,
        }
    }

    fn expired(&mut self) -> bool {
        if !self.stopped
            && (self.cancel.is_cancelled() || self.deadline.is_some_and(|d| Instant::now() >= d))
        {
            self.stopped = true;
        }
        self.stopped
    }

    fn minimax(&mut self, state: &mut GameState, depth: u32, mut alpha: i32, mut beta: i32) -> i32 {
        self.nodes += 1;
        if depth == 0 || state.is_game_over || self.expired() {
            return self.strategy.evaluator.evaluate(state);
        }

        let moves = generate(state, self.strategy.config.move_generation);
        if moves.is_empty() {
            return self.strategy.evaluator.evaluate(state);
        }

        if state.current_player == Player::Ai {
            let mut best = i32::MIN;
            for mv in &moves {
                let value = engine::with_move(state, mv, |s| self.minimax(s, depth - 1, alpha, beta));
                best = best.max(value);
                alpha = alpha.max(value);
                if beta <= alpha {
                    break;
                }
            }
            best
        } else {
            let mut best = i32::MAX;
            for mv in &moves {
                let value = engine::with_move(state, mv, |s| self.minimax(s, depth - 1, alpha, beta));
                best = best.min(value);
                beta = beta.min(value);
                if beta <= alpha {
                    break;
                }
            }
            best
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use crate::evaluator::Heuristic;

    fn state(rows: &[&str], to_move: Player) -> GameState {
        GameState::with_board(Board::from_rows(rows).unwrap(), to_move)
    }

    fn strategy(depth: u32) -> MinimaxStrategy {
        MinimaxStrategy::new(SearchConfig::with_depth(depth)).unwrap()
    }

    #[test]
    fn test_config_rejects_zero_depth() {
        assert!(MinimaxStrategy::new(SearchConfig::with_depth(0)).is_err());
        assert!(MinimaxStrategy::new(SearchConfig::with_depth(MAX_SEARCH_DEPTH + 1)).is_err());
    }

    #[test]
    fn test_takes_immediate_capture() {
        // AI closes the ring around the Human stone at (1,1) by playing (2,1).
        let s = state(&["A A . .", "A H A .", ". . . .", ". . . ."], Player::Ai);
        let mv = strategy(1).get_next_move(&s).unwrap();
        assert_eq!(mv, Move::new(Player::Ai, 2, 1));
    }

    #[test]
    fn test_search_leaves_state_untouched() {
        let s = state(&["A A . .", "A H A .", ". . H .", ". . . ."], Player::Ai);
        let before = s.clone();
        let _ = strategy(3).search(&s).unwrap();
        assert_eq!(s, before);

        let mut work = s.clone();
        let _ = strategy(3).minimax(&mut work, 3, i32::MIN, i32::MAX);
        assert_eq!(work, before);
    }

    #[test]
    fn test_game_over_is_an_error() {
        let s = state(&["H A", "A H"], Player::Ai);
        assert_eq!(
            strategy(2).get_next_move(&s),
            Err(GameError::Move(MoveError::GameAlreadyOver))
        );
    }

    #[test]
    fn test_first_best_move_wins_ties() {
        // Nothing to gain anywhere at depth 1 on an empty board: all moves
        // score 0, so the first generated one is kept.
        let s = GameState::new(3, Player::Ai).unwrap();
        assert_eq!(strategy(1).get_next_move(&s).unwrap(), Move::new(Player::Ai, 0, 0));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let s = state(&["A A . . .", "A H A . .", ". . H . .", ". . . . .", ". . . . ."], Player::Ai);
        let sequential = strategy(3).search(&s).unwrap();
        let parallel = MinimaxStrategy::new(SearchConfig {
            parallel: true,
            ..SearchConfig::with_depth(3)
        })
        .unwrap()
        .search(&s)
        .unwrap();
        assert_eq!(parallel.best_move, sequential.best_move);
        assert_eq!(parallel.score, sequential.score);
    }

    #[test]
    fn test_cancelled_search_still_answers() {
        let s = GameState::new(6, Player::Ai).unwrap();
        let cancel = CancelToken::new();
        cancel.cancel();
        let report = strategy(4).search_with_cancel(&s, &cancel).unwrap();
        assert!(!report.completed);
        assert_eq!(report.best_move, Move::new(Player::Ai, 0, 0));
    }

    #[test]
    fn test_cancel_does_not_outlive_its_search() {
        let s = GameState::new(4, Player::Ai).unwrap();
        let strategy = strategy(2);
        let cancel = CancelToken::new();
        cancel.cancel();
        assert!(!strategy.search_with_cancel(&s, &cancel).unwrap().completed);
        assert!(strategy.search(&s).unwrap().completed);
    }

    /// Fires `cancel` the first time it sees an AI stone on (0,1) without
    /// one on (0,0), which on an empty 2x2 board only happens below the
    /// root move (0,1). Values make (0,1) look best while cut short even
    /// though it is really the worst root move.
    struct CancelUnderSecondMove {
        cancel: CancelToken,
    }

    impl Heuristic for CancelUnderSecondMove {
        fn evaluate(&self, state: &GameState) -> i32 {
            let owner = |pt| state.board.field(pt).owner;
            if owner((0, 1)) == Player::Ai && owner((0, 0)) != Player::Ai {
                self.cancel.cancel();
            }
            let stones = state.board.iter().filter(|(_, f)| f.owner != Player::None).count();
            if stones < 3 {
                5
            } else if owner((0, 0)) == Player::Human {
                1
            } else if owner((0, 1)) == Player::Ai {
                -99
            } else {
                0
            }
        }

        fn name(&self) -> &'static str {
            "cancel-under-second-move"
        }
    }

    fn scripted(parallel: bool, cancel: &CancelToken) -> MinimaxStrategy {
        let config = SearchConfig {
            parallel,
            move_generation: MoveGeneration::Exhaustive,
            ..SearchConfig::with_depth(3)
        };
        let evaluator = StateEvaluator::new(vec![Box::new(CancelUnderSecondMove {
            cancel: cancel.clone(),
        })]);
        MinimaxStrategy::with_evaluator(config, evaluator).unwrap()
    }

    #[test]
    fn test_cut_short_move_never_beats_finished_one() {
        let s = GameState::new(2, Player::Ai).unwrap();

        // Without cancellation (0,1) is worth -99 and (0,0) is worth 0.
        let unused = CancelToken::new();
        let full = scripted(false, &unused).search(&s).unwrap();
        assert!(full.completed);
        assert_eq!(full.best_move, Move::new(Player::Ai, 0, 0));
        assert_eq!(full.score, 0);

        let cancel = CancelToken::new();
        let report = scripted(false, &cancel).search_with_cancel(&s, &cancel).unwrap();
        assert!(!report.completed);
        assert_eq!(report.best_move, Move::new(Player::Ai, 0, 0));
        assert_eq!(report.score, 0);
    }

    #[test]
    fn test_parallel_skips_cut_short_branches() {
        let s = GameState::new(2, Player::Ai).unwrap();
        let cancel = CancelToken::new();
        let report = scripted(true, &cancel).search_with_cancel(&s, &cancel).unwrap();
        assert!(!report.completed);
        // Which other branches finish depends on scheduling; (0,1) never does.
        assert_ne!(report.best_move, Move::new(Player::Ai, 0, 1));
    }

    #[test]
    fn test_zero_time_limit_still_answers() {
        let s = GameState::new(6, Player::Ai).unwrap();
        let strategy = MinimaxStrategy::new(SearchConfig {
            time_limit: Some(Duration::ZERO),
            ..SearchConfig::with_depth(5)
        })
        .unwrap();
        let report = strategy.search(&s).unwrap();
        assert!(!report.completed);
        assert!(s.board.field(report.best_move.point()).is_playable());
    }

    #[test]
    fn test_human_root_minimizes() {
        // Human closes the ring around the AI stone at (1,1) by playing (2,1).
        let s = state(&["H H . .", "H A H .", ". . . .", ". . . ."], Player::Human);
        let mv = strategy(1).get_next_move(&s).unwrap();
        assert_eq!(mv, Move::new(Player::Human, 2, 1));
    }
}
