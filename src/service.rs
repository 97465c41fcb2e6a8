//! Game sessions: creation, lookup, and the human and machine move paths.
//!
//! [`GameService`] is the entry point for any outer layer (HTTP, protocol
//! driver, CLI). It keeps games in a [`GameStore`] keyed by an opaque
//! [`GameId`], validates every move before the engine sees it, and asks an
//! [`AiStrategy`] for the machine player's moves.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::board::Player;
use crate::engine;
use crate::error::{GameError, GameResult, MoveError};
use crate::search::{MinimaxStrategy, SearchConfig};
use crate::state::{GameState, Move};
use crate::strategy::AiStrategy;
use crate::validator::validate;

/// Opaque game identifier.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameId(Uuid);

impl GameId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for GameId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for GameId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Key-value storage for live games. Lives no longer than the process.
pub trait GameStore: Send {
    fn insert(&mut self, id: GameId, state: GameState);
    fn get(&self, id: &GameId) -> Option<&GameState>;
    fn get_mut(&mut self, id: &GameId) -> Option<&mut GameState>;
    fn remove(&mut self, id: &GameId) -> Option<GameState>;
}

#[derive(Debug, Default)]
pub struct InMemoryGameStore {
    games: HashMap<GameId, GameState>,
}

impl InMemoryGameStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }
}

impl GameStore for InMemoryGameStore {
    fn insert(&mut self, id: GameId, state: GameState) {
        self.games.insert(id, state);
    }

    fn get(&self, id: &GameId) -> Option<&GameState> {
        self.games.get(id)
    }

    fn get_mut(&mut self, id: &GameId) -> Option<&mut GameState> {
        self.games.get_mut(id)
    }

    fn remove(&mut self, id: &GameId) -> Option<GameState> {
        self.games.remove(id)
    }
}

/// Settings applied to every game a service creates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub starting_player: Player,
    pub search: SearchConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            starting_player: Player::Human,
            search: SearchConfig::default(),
        }
    }
}

pub struct GameService<S: GameStore = InMemoryGameStore> {
    store: S,
    strategy: Box<dyn AiStrategy>,
    starting_player: Player,
}

impl GameService<InMemoryGameStore> {
    /// In-memory service playing the AI with minimax search.
    pub fn new(config: ServiceConfig) -> GameResult<Self> {
        let strategy = MinimaxStrategy::new(config.search)?;
        Self::with_parts(InMemoryGameStore::new(), Box::new(strategy), config.starting_player)
    }
}

impl<S: GameStore> GameService<S> {
    pub fn with_parts(
        store: S,
        strategy: Box<dyn AiStrategy>,
        starting_player: Player,
    ) -> GameResult<Self> {
        if starting_player == Player::None {
            return Err(GameError::InvalidConfiguration(
                "starting player must be Human or AI".into(),
            ));
        }
        Ok(Self {
            store,
            strategy,
            starting_player,
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Start a game on an empty `board_size`×`board_size` board.
    ///
    /// # Errors
    /// `InvalidConfiguration` unless `board_size` is in `1..=MAX_BOARD_SIZE`.
    #[instrument(skip(self))]
    pub fn create_game(&mut self, board_size: usize) -> GameResult<GameId> {
        let state = GameState::new(board_size, self.starting_player)?;
        let id = GameId::new();
        self.store.insert(id, state);
        info!(%id, board_size, starting = %self.starting_player, "game created");
        Ok(id)
    }

    /// Register an existing position (e.g. a literal board) as a new game.
    #[instrument(skip(self, state))]
    pub fn load_game(&mut self, state: GameState) -> GameId {
        let id = GameId::new();
        info!(%id, board_size = state.size(), "game loaded");
        self.store.insert(id, state);
        id
    }

    pub fn get_state(&self, id: &GameId) -> GameResult<&GameState> {
        self.store.get(id).ok_or(GameError::GameNotFound(*id))
    }

    /// Forget a finished or abandoned game.
    pub fn end_game(&mut self, id: &GameId) -> GameResult<GameState> {
        self.store.remove(id).ok_or(GameError::GameNotFound(*id))
    }

    /// Play a Human stone at `(row, col)`.
    ///
    /// # Errors
    /// `GameNotFound`, or the validator's reason for rejecting the move.
    #[instrument(skip(self))]
    pub fn apply_human_move(&mut self, id: &GameId, row: usize, col: usize) -> GameResult<&GameState> {
        let state = self.store.get_mut(id).ok_or(GameError::GameNotFound(*id))?;
        let mv = Move::new(Player::Human, row, col);
        validate(state, &mv)?;
        *state = engine::apply(state, &mv);
        log_result(state);
        Ok(state)
    }

    /// Let the strategy choose and play the AI's move.
    ///
    /// # Errors
    /// `GameNotFound`, `GameAlreadyOver`, `NotYourTurn` when the Human is to
    /// move, or `NoLegalMoves` from the strategy.
    #[instrument(skip(self))]
    pub fn apply_ai_move(&mut self, id: &GameId) -> GameResult<&GameState> {
        let state = self.store.get_mut(id).ok_or(GameError::GameNotFound(*id))?;
        if state.is_game_over {
            return Err(MoveError::GameAlreadyOver.into());
        }
        if state.current_player != Player::Ai {
            return Err(MoveError::NotYourTurn {
                expected: state.current_player,
                got: Player::Ai,
            }
            .into());
        }
        let mv = self.strategy.next_move(state)?;
        validate(state, &mv)?;
        debug!(strategy = self.strategy.name(), row = mv.row, col = mv.col, "ai move chosen");
        *state = engine::apply(state, &mv);
        log_result(state);
        Ok(state)
    }
}

fn log_result(state: &GameState) {
    if let Some(result) = &state.last_move_result {
        debug!(
            player = %result.player,
            points = result.score,
            captured = result.captured.len(),
            human = state.scores.human,
            ai = state.scores.ai,
            "move applied"
        );
    }
    if state.is_game_over {
        info!(winner = %state.winner, human = state.scores.human, ai = state.scores.ai, "game over");
    }
}
