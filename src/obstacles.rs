// Occupied cells for the current turn, derived from every snake's body

use std::collections::HashSet;
use std::iter::FromIterator;

use crate::types::{Battlesnake, Board, Coord};

/// Set of coordinates occupied by any body segment, self included.
/// Rebuilt every turn since bodies move.
#[derive(Debug, Clone, Default)]
pub struct ObstacleSet {
    cells: HashSet<Coord>,
}

impl ObstacleSet {
    /// Unions `you`'s body with every snake on the board.
    /// `you` normally also appears in `board.snakes`; duplicates collapse.
    pub fn from_board(board: &Board, you: &Battlesnake) -> Self {
        let mut cells = HashSet::with_capacity(board.snakes.iter().map(|s| s.body.len()).sum());
        cells.extend(you.body.iter().copied());
        for snake in &board.snakes {
            cells.extend(snake.body.iter().copied());
        }
        ObstacleSet { cells }
    }

    pub fn contains(&self, coord: &Coord) -> bool {
        self.cells.contains(coord)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }
}

impl FromIterator<Coord> for ObstacleSet {
    fn from_iter<I: IntoIterator<Item = Coord>>(iter: I) -> Self {
        ObstacleSet {
            cells: iter.into_iter().collect(),
        }
    }
}
