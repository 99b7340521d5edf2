// Space ranking: steer away from moves that lead into closed regions

use log::debug;

use crate::grid::Bounds;
use crate::obstacles::ObstacleSet;
use crate::reachability::{free_cell_count, reachable_count};
use crate::safety::SafeMoves;
use crate::types::{Coord, Direction};

/// A safe move whose reachable region is smaller than the board's free space
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClosedSpaceMove {
    pub direction: Direction,
    pub volume: usize,
}

/// Collects safe moves leading into closed space, largest volume first.
/// Equal volumes keep direction order (up, right, down, left).
///
/// The free-cell baseline counts our current head as occupied even though it
/// will be vacated; ranking is tuned against this baseline.
pub fn closed_space_moves(
    moves: &SafeMoves,
    head: &Coord,
    bounds: &Bounds,
    obstacles: &ObstacleSet,
) -> Vec<ClosedSpaceMove> {
    let free = free_cell_count(bounds, obstacles);

    let mut closed: Vec<ClosedSpaceMove> = moves
        .directions()
        .into_iter()
        .filter_map(|direction| {
            let next = direction.apply(head);
            let volume = reachable_count(next, bounds, obstacles);
            debug!("{} reaches {} of {} free cells", direction.as_str(), volume, free);
            if volume < free {
                Some(ClosedSpaceMove { direction, volume })
            } else {
                None
            }
        })
        .collect();

    // sort_by is stable
    closed.sort_by(|a, b| b.volume.cmp(&a.volume));
    closed
}

/// Filters the safe set by its closed-space moves:
/// - nothing closed: unchanged
/// - some closed: drop every closed move
/// - all closed: keep only the most spacious one
///
/// `closed` must be ordered as returned by `closed_space_moves`.
pub fn apply_closed_space_policy(moves: SafeMoves, closed: &[ClosedSpaceMove]) -> SafeMoves {
    if closed.is_empty() {
        return moves;
    }

    let to_drop = if closed.len() < moves.count() {
        closed
    } else {
        &closed[1..]
    };

    to_drop
        .iter()
        .fold(moves, |acc, closed_move| acc.without(closed_move.direction))
}

/// Scores every safe move by reachable volume and applies the closed-space policy
pub fn rank_by_space(
    moves: SafeMoves,
    head: &Coord,
    bounds: &Bounds,
    obstacles: &ObstacleSet,
) -> SafeMoves {
    let closed = closed_space_moves(&moves, head, bounds, obstacles);
    apply_closed_space_policy(moves, &closed)
}
