//! Dots-Rust: a territory-capture board game engine with a minimax AI.
//!
//! Two players take turns placing stones on an N×N grid. A placement that
//! surrounds a region of opponent or empty cells not touching the board
//! edge turns that region into the placing player's territory, scoring one
//! point per opponent stone inside. The game ends when every cell is
//! occupied or enclosed.
//!
//! ## Modules
//!
//! - [`constants`] - Board size bounds, search defaults, heuristic weights
//! - [`board`] - Players, fields and the square grid
//! - [`state`] - Game state, moves, and undo records
//! - [`validator`] - Move legality checks
//! - [`enclosure`] - Flood-fill capture detection
//! - [`engine`] - Move application, in place with undo or by copy
//! - [`evaluator`] - Heuristics and the summing evaluator
//! - [`movegen`] - Candidate move generation
//! - [`strategy`] - The machine-player interface and a random player
//! - [`search`] - Minimax with alpha-beta pruning
//! - [`service`] - Game sessions keyed by id
//! - [`protocol`] - Text protocol driver
//!
//! ## Example
//!
//! ```
//! use dots_rust::board::Player;
//! use dots_rust::search::{MinimaxStrategy, SearchConfig};
//! use dots_rust::service::{GameService, ServiceConfig};
//!
//! let mut service = GameService::new(ServiceConfig::default()).unwrap();
//! let id = service.create_game(6).unwrap();
//!
//! // Human plays, then the AI answers
//! service.apply_human_move(&id, 2, 2).unwrap();
//! let state = service.apply_ai_move(&id).unwrap();
//! assert_eq!(state.current_player, Player::Human);
//!
//! // Or ask the search directly
//! let ai = MinimaxStrategy::new(SearchConfig::with_depth(2)).unwrap();
//! let state = service.get_state(&id).unwrap();
//! assert!(state.current_player != Player::Ai || ai.get_next_move(state).is_ok());
//! ```

pub mod board;
pub mod constants;
pub mod enclosure;
pub mod engine;
pub mod error;
pub mod evaluator;
pub mod movegen;
pub mod protocol;
pub mod search;
pub mod service;
pub mod state;
pub mod strategy;
pub mod validator;
