//! Game state, moves, and the undo log used by in-place search.
//!
//! A [`GameState`] is everything needed to continue a game: the board, who
//! moves next, scores, and the outcome once every cell is occupied or
//! enclosed. States are plain data; all rules live in
//! [`crate::validator`], [`crate::enclosure`] and [`crate::engine`].

use serde::{Deserialize, Serialize};

use crate::board::{Board, Field, Player, Point};
use crate::error::{GameError, GameResult};

/// A stone placement by `player` at `(row, col)`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub player: Player,
    pub row: usize,
    pub col: usize,
}

impl Move {
    pub fn new(player: Player, row: usize, col: usize) -> Self {
        Self { player, row, col }
    }

    #[inline]
    pub fn point(&self) -> Point {
        (self.row, self.col)
    }
}

/// What a move captured and how many points it earned.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveResult {
    pub player: Player,
    /// Points awarded: the number of previously owned cells in `captured`.
    pub score: u32,
    /// Newly enclosed cells in row-major discovery order, without duplicates.
    pub captured: Vec<Point>,
}

/// Points per side. Only Human and AI score; `None` always reads 0.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scores {
    #[serde(rename = "Human")]
    pub human: u32,
    #[serde(rename = "AI")]
    pub ai: u32,
}

impl Scores {
    pub fn get(&self, player: Player) -> u32 {
        match player {
            Player::Human => self.human,
            Player::Ai => self.ai,
            Player::None => 0,
        }
    }

    pub fn add(&mut self, player: Player, points: u32) {
        match player {
            Player::Human => self.human += points,
            Player::Ai => self.ai += points,
            Player::None => {}
        }
    }

    /// The side with the strictly higher score, or `None` on a tie.
    pub fn leader(&self) -> Player {
        match self.human.cmp(&self.ai) {
            std::cmp::Ordering::Greater => Player::Human,
            std::cmp::Ordering::Less => Player::Ai,
            std::cmp::Ordering::Equal => Player::None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub board: Board,
    /// Side to move; `None` once the game is over.
    pub current_player: Player,
    pub is_game_over: bool,
    /// Set only when the game is over; `None` there means a tie.
    pub winner: Player,
    pub scores: Scores,
    pub last_move: Option<Move>,
    pub last_move_result: Option<MoveResult>,
}

impl GameState {
    /// Fresh game on an empty `size`×`size` board.
    ///
    /// # Errors
    /// `InvalidConfiguration` if `size` is outside `1..=MAX_BOARD_SIZE` or
    /// `starting_player` is `None`.
    pub fn new(size: usize, starting_player: Player) -> GameResult<Self> {
        if starting_player == Player::None {
            return Err(GameError::InvalidConfiguration(
                "starting player must be Human or AI".into(),
            ));
        }
        Ok(Self::with_board(Board::new(size)?, starting_player))
    }

    /// Mid-game position on an existing board with zero scores.
    ///
    /// Game-over is recomputed from the board, so a full board yields a
    /// finished (tied) game with no side to move.
    pub fn with_board(board: Board, current_player: Player) -> Self {
        let mut state = Self {
            board,
            current_player,
            is_game_over: false,
            winner: Player::None,
            scores: Scores::default(),
            last_move: None,
            last_move_result: None,
        };
        state.refresh_outcome();
        state
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.board.size()
    }

    /// Recompute `is_game_over`, `winner` and (when over) `current_player`.
    pub(crate) fn refresh_outcome(&mut self) {
        self.is_game_over = self.board.is_full();
        if self.is_game_over {
            self.current_player = Player::None;
            self.winner = self.scores.leader();
        } else {
            self.winner = Player::None;
        }
    }
}

/// Delta needed to revert one [`crate::engine::apply_with_undo`] call.
///
/// Holds the prior contents of every touched cell plus the scalar fields,
/// not a full snapshot, so records must be undone in reverse order.
#[derive(Debug, Clone)]
#[must_use = "an undo record must be passed back to engine::undo"]
pub struct UndoRecord {
    pub(crate) changed: Vec<(Point, Field)>,
    pub(crate) current_player: Player,
    pub(crate) is_game_over: bool,
    pub(crate) winner: Player,
    pub(crate) scores: Scores,
    pub(crate) last_move: Option<Move>,
    pub(crate) last_move_result: Option<MoveResult>,
}

impl UndoRecord {
    /// Snapshot the scalar fields of `state` before a move mutates it.
    pub(crate) fn capture(state: &GameState) -> Self {
        Self {
            changed: Vec::new(),
            current_player: state.current_player,
            is_game_over: state.is_game_over,
            winner: state.winner,
            scores: state.scores,
            last_move: state.last_move,
            last_move_result: state.last_move_result.clone(),
        }
    }

    /// Cells this record will restore, in the order they were changed.
    pub fn changed_points(&self) -> impl Iterator<Item = Point> + '_ {
        self.changed.iter().map(|&(pt, _)| pt)
    }
}
