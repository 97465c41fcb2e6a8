//! Move execution: placement, capture, scoring and game-over detection.
//!
//! Two entry points produce identical results:
//! - [`apply`] returns a new state and leaves the input untouched.
//! - [`apply_with_undo`] mutates the state in place and returns an
//!   [`UndoRecord`] that [`undo`] consumes to restore the exact prior state.
//!
//! The in-place pair exists for search, which would otherwise clone the
//! whole board at every node. Records store deltas only, so they must be
//! undone in strict reverse order; [`with_move`] enforces that by scoping
//! the apply/undo pair around a closure.
//!
//! Neither path validates its input. Callers run
//! [`crate::validator::validate`] first; debug builds assert it.

use crate::board::{Field, Player, Point};
use crate::enclosure::find_enclosed;
use crate::state::{GameState, Move, MoveResult, UndoRecord};
use crate::validator::validate;

/// Play a validated move and return the successor state.
pub fn apply(state: &GameState, mv: &Move) -> GameState {
    let mut next = state.clone();
    let mut scratch = Vec::new();
    play(&mut next, mv, &mut scratch);
    next
}

/// Play a validated move in place, returning what is needed to take it back.
pub fn apply_with_undo(state: &mut GameState, mv: &Move) -> UndoRecord {
    let mut record = UndoRecord::capture(state);
    play(state, mv, &mut record.changed);
    record
}

/// Revert the move that produced `record`.
///
/// `record` must come from the most recent [`apply_with_undo`] on this
/// state that has not yet been undone.
pub fn undo(state: &mut GameState, record: UndoRecord) {
    for (pt, field) in record.changed.into_iter().rev() {
        *state.board.field_mut(pt) = field;
    }
    state.current_player = record.current_player;
    state.is_game_over = record.is_game_over;
    state.winner = record.winner;
    state.scores = record.scores;
    state.last_move = record.last_move;
    state.last_move_result = record.last_move_result;
}

/// Play `mv`, run `f` on the resulting position, then undo the move.
pub fn with_move<R>(state: &mut GameState, mv: &Move, f: impl FnOnce(&mut GameState) -> R) -> R {
    let record = apply_with_undo(state, mv);
    let out = f(state);
    undo(state, record);
    out
}

/// Shared body of both apply paths. Every cell is logged to `changed`
/// before it is overwritten.
fn play(state: &mut GameState, mv: &Move, changed: &mut Vec<(Point, Field)>) {
    debug_assert!(
        validate(state, mv).is_ok(),
        "engine called with an unvalidated move {mv:?}: {:?}",
        validate(state, mv)
    );

    let pt = mv.point();
    changed.push((pt, *state.board.field(pt)));
    state.board.field_mut(pt).owner = mv.player;
    state.current_player = mv.player.opponent();
    state.last_move = Some(*mv);

    let captured = find_enclosed(&state.board, mv.player);
    let mut points = 0;
    for &c in &captured {
        let prev = *state.board.field(c);
        changed.push((c, prev));
        if prev.owner != Player::None {
            points += 1;
        }
        state.board.field_mut(c).enclosed_by = mv.player;
    }

    state.scores.add(mv.player, points);
    state.last_move_result = Some(MoveResult {
        player: mv.player,
        score: points,
        captured,
    });
    state.refresh_outcome();
}
