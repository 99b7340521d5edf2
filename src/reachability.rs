// Reachability analysis: flood fill over free cells
//
// The volume of the 4-connected component a cell belongs to is the signal the
// space ranking uses to detect moves into closed pockets.

use std::collections::{HashSet, VecDeque};

use crate::grid::Bounds;
use crate::obstacles::ObstacleSet;
use crate::types::Coord;

/// Counts cells reachable from `start` via cardinal steps without leaving the
/// board or entering an obstacle. `start` itself is counted.
///
/// Callers must pass an in-bounds, unoccupied start cell.
pub fn reachable_count(start: Coord, bounds: &Bounds, obstacles: &ObstacleSet) -> usize {
    debug_assert!(bounds.contains(&start), "reachability start out of bounds");
    debug_assert!(!obstacles.contains(&start), "reachability start on obstacle");

    let mut visited: HashSet<Coord> = HashSet::with_capacity(bounds.cell_count());
    let mut queue: VecDeque<Coord> = VecDeque::new();

    visited.insert(start);
    queue.push_back(start);

    while let Some(cell) = queue.pop_front() {
        for next in bounds.neighbors(&cell) {
            if obstacles.contains(&next) {
                continue;
            }
            if visited.insert(next) {
                queue.push_back(next);
            }
        }
    }

    visited.len()
}

/// Free cells on the board: total cells minus occupied cells
pub fn free_cell_count(bounds: &Bounds, obstacles: &ObstacleSet) -> usize {
    bounds.cell_count().saturating_sub(obstacles.len())
}
