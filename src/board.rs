//! Square grid of fields with per-cell ownership and enclosure.
//!
//! Cells are stored row-major in a flat `Vec`. Coordinates are `(row, col)`
//! with `(0, 0)` in the top-left corner; the border is every cell whose row
//! or column is `0` or `size - 1`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{MAX_BOARD_SIZE, ORTHOGONAL};
use crate::error::GameError;

/// A side in the game. `None` marks empty cells and undecided results.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    #[default]
    None,
    Human,
    #[serde(rename = "AI")]
    Ai,
}

impl Player {
    /// The other side. `None` has no opponent and maps to itself.
    pub fn opponent(self) -> Player {
        match self {
            Player::Human => Player::Ai,
            Player::Ai => Player::Human,
            Player::None => Player::None,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::None => write!(f, "None"),
            Player::Human => write!(f, "Human"),
            Player::Ai => write!(f, "AI"),
        }
    }
}

/// `(row, col)` coordinate on the board.
pub type Point = (usize, usize);

/// One cell: who placed a stone there and who, if anyone, enclosed it.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub owner: Player,
    pub enclosed_by: Player,
}

impl Field {
    /// A stone may be placed here.
    #[inline]
    pub fn is_playable(&self) -> bool {
        self.owner == Player::None && self.enclosed_by == Player::None
    }

    /// Territory cells are never played again, whatever their owner.
    #[inline]
    pub fn is_enclosed(&self) -> bool {
        self.enclosed_by != Player::None
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawBoard")]
pub struct Board {
    size: usize,
    cells: Vec<Field>,
}

/// Unchecked wire form of a [`Board`].
#[derive(Deserialize)]
struct RawBoard {
    size: usize,
    cells: Vec<Field>,
}

impl TryFrom<RawBoard> for Board {
    type Error = GameError;

    fn try_from(raw: RawBoard) -> Result<Self, Self::Error> {
        let mut board = Board::new(raw.size)?;
        if raw.cells.len() != board.cells.len() {
            return Err(GameError::InvalidConfiguration(format!(
                "board of size {} needs {} cells, got {}",
                raw.size,
                board.cells.len(),
                raw.cells.len()
            )));
        }
        board.cells = raw.cells;
        Ok(board)
    }
}

impl Board {
    /// Empty `size`×`size` board. Fails unless `size` is in `1..=MAX_BOARD_SIZE`.
    pub fn new(size: usize) -> Result<Self, GameError> {
        if size == 0 || size > MAX_BOARD_SIZE {
            return Err(GameError::InvalidConfiguration(format!(
                "board size must be between 1 and {MAX_BOARD_SIZE}, got {size}"
            )));
        }
        Ok(Self {
            size,
            cells: vec![Field::default(); size * size],
        })
    }

    /// Parse a literal board, one string per row.
    ///
    /// `H` is a Human stone, `A` an AI stone, and `.`, `N` or `E` an empty
    /// cell. Whitespace is ignored, so `"H A ."` and `"HA."` are the same row.
    pub fn from_rows(rows: &[&str]) -> Result<Self, GameError> {
        let mut board = Board::new(rows.len())?;
        for (r, row) in rows.iter().enumerate() {
            let symbols: Vec<char> = row.chars().filter(|c| !c.is_whitespace()).collect();
            if symbols.len() != board.size {
                return Err(GameError::InvalidConfiguration(format!(
                    "row {r} has {} cells, expected {}",
                    symbols.len(),
                    board.size
                )));
            }
            for (c, symbol) in symbols.into_iter().enumerate() {
                let owner = match symbol.to_ascii_uppercase() {
                    'H' => Player::Human,
                    'A' => Player::Ai,
                    '.' | 'N' | 'E' => Player::None,
                    other => {
                        return Err(GameError::InvalidConfiguration(format!(
                            "unknown cell symbol '{other}' at ({r}, {c})"
                        )));
                    }
                };
                board.field_mut((r, c)).owner = owner;
            }
        }
        Ok(board)
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    fn idx(&self, (row, col): Point) -> usize {
        row * self.size + col
    }

    #[inline]
    pub fn contains(&self, (row, col): Point) -> bool {
        row < self.size && col < self.size
    }

    #[inline]
    pub fn is_border(&self, (row, col): Point) -> bool {
        row == 0 || col == 0 || row + 1 == self.size || col + 1 == self.size
    }

    /// Field at `pt`. Panics if `pt` is off the board.
    #[inline]
    pub fn field(&self, pt: Point) -> &Field {
        &self.cells[self.idx(pt)]
    }

    #[inline]
    pub fn field_mut(&mut self, pt: Point) -> &mut Field {
        let i = self.idx(pt);
        &mut self.cells[i]
    }

    /// Field at `pt`, or `None` off the board.
    pub fn get(&self, pt: Point) -> Option<&Field> {
        if self.contains(pt) {
            Some(self.field(pt))
        } else {
            None
        }
    }

    /// Row-major iterator over every coordinate.
    pub fn points(&self) -> impl Iterator<Item = Point> + use<> {
        let size = self.size;
        (0..size).flat_map(move |r| (0..size).map(move |c| (r, c)))
    }

    /// Row-major iterator over `(point, field)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Point, &Field)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(|(i, f)| ((i / self.size, i % self.size), f))
    }

    /// Step from `pt` by `delta`, if the target is on the board.
    #[inline]
    pub fn offset(&self, (row, col): Point, (dr, dc): (isize, isize)) -> Option<Point> {
        let r = row.checked_add_signed(dr)?;
        let c = col.checked_add_signed(dc)?;
        if r < self.size && c < self.size {
            Some((r, c))
        } else {
            None
        }
    }

    /// On-board orthogonal neighbors of `pt`.
    pub fn neighbors(&self, pt: Point) -> impl Iterator<Item = Point> + '_ {
        ORTHOGONAL.iter().filter_map(move |&d| self.offset(pt, d))
    }

    /// True once no playable cell remains.
    pub fn is_full(&self) -> bool {
        !self.cells.iter().any(Field::is_playable)
    }

    /// Cells enclosed by `player`.
    pub fn territory(&self, player: Player) -> usize {
        self.cells.iter().filter(|f| f.enclosed_by == player).count()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..self.size {
            for c in 0..self.size {
                let field = self.field((r, c));
                let ch = match (field.owner, field.enclosed_by) {
                    (Player::Human, Player::None) => 'H',
                    (Player::Ai, Player::None) => 'A',
                    (Player::None, Player::None) => '.',
                    (Player::None, _) => '+',
                    (_, Player::Human) => 'h',
                    (_, _) => 'a',
                };
                write!(f, "{ch} ")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_bad_sizes() {
        assert!(Board::new(0).is_err());
        assert!(Board::new(MAX_BOARD_SIZE + 1).is_err());
        assert!(Board::new(1).is_ok());
        assert!(Board::new(MAX_BOARD_SIZE).is_ok());
    }

    #[test]
    fn test_from_rows() {
        let board = Board::from_rows(&["H A .", "N E H", "a h ."]).unwrap();
        assert_eq!(board.size(), 3);
        assert_eq!(board.field((0, 0)).owner, Player::Human);
        assert_eq!(board.field((0, 1)).owner, Player::Ai);
        assert_eq!(board.field((1, 0)).owner, Player::None);
        assert_eq!(board.field((1, 2)).owner, Player::Human);
        assert_eq!(board.field((2, 0)).owner, Player::Ai);
    }

    #[test]
    fn test_from_rows_rejects_ragged() {
        assert!(Board::from_rows(&["H A", "H"]).is_err());
        assert!(Board::from_rows(&["H X", "H A"]).is_err());
    }

    #[test]
    fn test_neighbors_at_corner_and_center() {
        let board = Board::new(3).unwrap();
        let corner: Vec<Point> = board.neighbors((0, 0)).collect();
        assert_eq!(corner, vec![(1, 0), (0, 1)]);
        assert_eq!(board.neighbors((1, 1)).count(), 4);
    }

    #[test]
    fn test_border() {
        let board = Board::new(4).unwrap();
        assert!(board.is_border((0, 2)));
        assert!(board.is_border((3, 1)));
        assert!(board.is_border((2, 3)));
        assert!(!board.is_border((1, 2)));
    }

    #[test]
    fn test_display_marks_territory() {
        let mut board = Board::from_rows(&["H .", ". A"]).unwrap();
        board.field_mut((0, 1)).enclosed_by = Player::Human;
        board.field_mut((1, 1)).enclosed_by = Player::Human;
        assert_eq!(board.to_string(), "H + \n. h \n");
    }

    #[test]
    fn test_deserialize_checks_cell_count() {
        let board = Board::from_rows(&["H .", ". A"]).unwrap();
        let json = serde_json::to_string(&board).unwrap();
        let parsed: Board = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, board);

        let short = r#"{"size":2,"cells":[{"owner":"Human","enclosedBy":"None"}]}"#;
        let err = serde_json::from_str::<Board>(short).unwrap_err();
        assert!(err.to_string().contains("needs 4 cells"), "got '{err}'");

        let empty = r#"{"size":0,"cells":[]}"#;
        assert!(serde_json::from_str::<Board>(empty).is_err());
    }

    #[test]
    fn test_is_full() {
        let mut board = Board::from_rows(&["H A", "A ."]).unwrap();
        assert!(!board.is_full());
        board.field_mut((1, 1)).enclosed_by = Player::Ai;
        assert!(board.is_full());
    }
}
