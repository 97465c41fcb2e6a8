//! Enclosure detection by flood fill.
//!
//! Every cell not owned by the capturing player is a node; orthogonally
//! adjacent nodes are connected. A connected component that reaches the
//! border can escape, so it stays open. A component that never reaches the
//! border is surrounded by the capturing player's stones and is captured.
//!
//! Cells that are already enclosed take part in the traversal (they do not
//! split a region in two) but are never reported again, so a cell's
//! `enclosed_by` is written at most once over a game.

use crate::board::{Board, Player, Point};

/// All not-yet-enclosed cells that `capturing` has surrounded, in row-major order.
///
/// Each cell is visited at most once, so a call costs O(size²).
pub fn find_enclosed(board: &Board, capturing: Player) -> Vec<Point> {
    let size = board.size();
    let mut visited = vec![false; size * size];
    let mut captured = Vec::new();
    let mut queue: Vec<Point> = Vec::with_capacity(size * size);

    for start in board.points() {
        let field = board.field(start);
        if visited[start.0 * size + start.1] || field.owner == capturing || field.is_enclosed() {
            continue;
        }

        queue.clear();
        queue.push(start);
        visited[start.0 * size + start.1] = true;
        let mut open = false;
        let mut head = 0;

        while head < queue.len() {
            let pt = queue[head];
            head += 1;

            if board.is_border(pt) {
                open = true;
            }
            for n in board.neighbors(pt) {
                let ni = n.0 * size + n.1;
                if !visited[ni] && board.field(n).owner != capturing {
                    visited[ni] = true;
                    queue.push(n);
                }
            }
        }

        if !open {
            captured.extend(queue.iter().copied().filter(|&pt| !board.field(pt).is_enclosed()));
        }
    }

    captured.sort_unstable();
    captured
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(rows: &[&str]) -> Board {
        Board::from_rows(rows).unwrap()
    }

    #[test]
    fn test_single_stone_enclosed() {
        let b = board(&["H H .", "H A H", ". H ."]);
        assert_eq!(find_enclosed(&b, Player::Human), vec![(1, 1)]);
        assert!(find_enclosed(&b, Player::Ai).is_empty());
    }

    #[test]
    fn test_component_touching_border_is_open() {
        // The AI pair {(1,1), (1,2)} reaches the right edge through (1,2).
        let b = board(&["H H .", "H A A", ". H ."]);
        assert!(find_enclosed(&b, Player::Human).is_empty());
        assert!(find_enclosed(&b, Player::Ai).is_empty());
    }

    #[test]
    fn test_multi_cell_component() {
        let b = board(&["H H H .", "H A H H", "H A A H", ". H H ."]);
        assert_eq!(find_enclosed(&b, Player::Human), vec![(1, 1), (2, 1), (2, 2)]);
        assert!(find_enclosed(&b, Player::Ai).is_empty());
    }

    #[test]
    fn test_empty_board() {
        let b = Board::new(4).unwrap();
        assert!(find_enclosed(&b, Player::Human).is_empty());
        assert!(find_enclosed(&b, Player::Ai).is_empty());
    }

    #[test]
    fn test_empty_cells_are_captured_too() {
        let b = board(&["H H H .", "H . H .", "H H H .", ". . . ."]);
        assert_eq!(find_enclosed(&b, Player::Human), vec![(1, 1)]);
    }

    #[test]
    fn test_lone_stone_captures_nothing() {
        let b = board(&[". . .", ". A .", ". . ."]);
        assert!(find_enclosed(&b, Player::Ai).is_empty());
    }

    #[test]
    fn test_enclosed_cells_not_reported_twice() {
        let mut b = board(&["H H .", "H A H", ". H ."]);
        b.field_mut((1, 1)).enclosed_by = Player::Human;
        assert!(find_enclosed(&b, Player::Human).is_empty());
    }
}
