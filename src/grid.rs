// Grid model: board bounds and 4-connected adjacency

use log::warn;

use crate::types::{Board, Coord, Direction};

/// Board dimensions. A coordinate is valid iff 0 <= x < width and 0 <= y < height.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub width: i32,
    pub height: i32,
}

impl Bounds {
    pub fn new(width: i32, height: i32) -> Self {
        Bounds { width, height }
    }

    pub fn of(board: &Board) -> Self {
        Bounds::new(board.width, board.height)
    }

    pub fn contains(&self, coord: &Coord) -> bool {
        coord.x >= 0 && coord.y >= 0 && coord.x < self.width && coord.y < self.height
    }

    /// Total number of cells on the board
    pub fn cell_count(&self) -> usize {
        (self.width.max(0) as usize) * (self.height.max(0) as usize)
    }

    /// In-bounds cardinal neighbours in up, right, down, left order
    pub fn neighbors(&self, coord: &Coord) -> impl Iterator<Item = Coord> + '_ {
        let coord = *coord;
        IntoIterator::into_iter(Direction::all())
            .map(move |dir| dir.apply(&coord))
            .filter(move |next| self.contains(next))
    }
}

/// Steps from `coord` by a direction symbol as received on the wire.
/// An unrecognised symbol is logged and treated as no displacement.
pub fn next_coord(coord: &Coord, step: &str) -> Coord {
    match Direction::parse(step) {
        Some(dir) => dir.apply(coord),
        None => {
            warn!("Invalid step '{}', staying at ({}, {})", step, coord.x, coord.y);
            *coord
        }
    }
}
