//! Constants for board dimensions, search parameters, and heuristic weights.
//!
//! Board size is chosen per game at runtime, so only its bounds live here.
//! Everything else is a default that [`crate::search::SearchConfig`] or the
//! CLI can override.

// =============================================================================
// Board Geometry
// =============================================================================

/// Largest accepted board side length. Sizes must lie in `1..=MAX_BOARD_SIZE`.
pub const MAX_BOARD_SIZE: usize = 100;

/// Board side length used by the CLI when none is given.
pub const DEFAULT_BOARD_SIZE: usize = 10;

/// Orthogonal neighbor offsets as (row, col) deltas: North, South, West, East.
pub const ORTHOGONAL: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// All eight neighbor offsets (orthogonal first, then diagonals).
pub const ALL_DIRECTIONS: [(isize, isize); 8] = [
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
    (-1, -1),
    (-1, 1),
    (1, -1),
    (1, 1),
];

// =============================================================================
// Search Parameters
// =============================================================================

/// Default search depth in plies, counting the root move itself.
pub const DEFAULT_SEARCH_DEPTH: u32 = 3;

/// Deepest search the CLI accepts.
pub const MAX_SEARCH_DEPTH: u32 = 10;

// =============================================================================
// Heuristic Weights
// =============================================================================

/// Bonus (AI win) or penalty (Human win) once the game is decided.
pub const TERMINAL_WEIGHT: i32 = 1_000_000;

/// Weight per point of score difference.
pub const SCORE_WEIGHT: i32 = 1_000;

/// Weight per cell of enclosed territory difference.
pub const TERRITORY_WEIGHT: i32 = 100;

/// Weight per AI stone adjacent to a live Human stone (pressure the AI applies).
pub const ATTACK_WEIGHT: i32 = 10;

/// Weight per Human stone adjacent to a live AI stone (pressure the AI suffers).
pub const DEFENSE_WEIGHT: i32 = 8;
