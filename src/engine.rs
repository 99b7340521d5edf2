// Per-turn evaluation pipeline
//
// snapshot -> obstacles -> local safety -> head confrontations -> space ranking
//
// Everything here is synchronous and rebuilt from the snapshot on each call.

use log::debug;
use std::fmt;

use crate::grid::Bounds;
use crate::obstacles::ObstacleSet;
use crate::safety::{avoid_head_confrontations, filter_unsafe_moves, SafeMoves};
use crate::space::rank_by_space;
use crate::types::{Battlesnake, Board, Coord};

/// Snapshot problems rejected before evaluation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotError {
    InvalidDimensions { width: i32, height: i32 },
    EmptyBody { snake_id: String },
    HeadMismatch { snake_id: String },
    LengthMismatch { snake_id: String, length: i32, segments: usize },
    SegmentOutOfBounds { snake_id: String, coord: Coord },
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotError::InvalidDimensions { width, height } => {
                write!(f, "invalid board dimensions {}x{}", width, height)
            }
            SnapshotError::EmptyBody { snake_id } => {
                write!(f, "snake '{}' has an empty body", snake_id)
            }
            SnapshotError::HeadMismatch { snake_id } => {
                write!(f, "snake '{}' head does not match body[0]", snake_id)
            }
            SnapshotError::LengthMismatch { snake_id, length, segments } => write!(
                f,
                "snake '{}' reports length {} but has {} segments",
                snake_id, length, segments
            ),
            SnapshotError::SegmentOutOfBounds { snake_id, coord } => write!(
                f,
                "snake '{}' has a segment off the board at ({}, {})",
                snake_id, coord.x, coord.y
            ),
        }
    }
}

impl std::error::Error for SnapshotError {}

/// Checks the preconditions the evaluation relies on, for `you` and every
/// snake on the board
pub fn validate(board: &Board, you: &Battlesnake) -> Result<(), SnapshotError> {
    if board.width <= 0 || board.height <= 0 {
        return Err(SnapshotError::InvalidDimensions {
            width: board.width,
            height: board.height,
        });
    }

    let bounds = Bounds::of(board);
    validate_snake(you, &bounds)?;
    for other in board.others(&you.id) {
        validate_snake(other, &bounds)?;
    }

    Ok(())
}

fn validate_snake(snake: &Battlesnake, bounds: &Bounds) -> Result<(), SnapshotError> {
    let head = snake.body.first().ok_or_else(|| SnapshotError::EmptyBody {
        snake_id: snake.id.clone(),
    })?;
    if *head != snake.head {
        return Err(SnapshotError::HeadMismatch {
            snake_id: snake.id.clone(),
        });
    }
    if snake.length as usize != snake.body.len() {
        return Err(SnapshotError::LengthMismatch {
            snake_id: snake.id.clone(),
            length: snake.length,
            segments: snake.body.len(),
        });
    }
    if let Some(coord) = snake.body.iter().find(|c| !bounds.contains(c)) {
        return Err(SnapshotError::SegmentOutOfBounds {
            snake_id: snake.id.clone(),
            coord: *coord,
        });
    }

    Ok(())
}

/// Safe-move records after each stage of one turn's evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluation {
    /// After reverse lock, edges and body collisions
    pub locally_safe: SafeMoves,
    /// After head-to-head vetoes (or unchanged if they would empty the set)
    pub confrontation_safe: SafeMoves,
    /// Final candidates after closed-space ranking
    pub safe: SafeMoves,
}

impl Evaluation {
    pub fn has_safe_move(&self) -> bool {
        !self.safe.is_empty()
    }
}

/// Runs every filter stage for `you` on `board`.
/// Assumes `validate` has passed.
pub fn evaluate(board: &Board, you: &Battlesnake) -> Evaluation {
    let bounds = Bounds::of(board);
    let obstacles = ObstacleSet::from_board(board, you);
    let others: Vec<&Battlesnake> = board.others(&you.id).collect();

    let locally_safe = filter_unsafe_moves(you, &others, &bounds);
    let confrontation_safe = avoid_head_confrontations(locally_safe, you, &others);
    let safe = rank_by_space(confrontation_safe, &you.head, &bounds, &obstacles);

    debug!(
        "Evaluation: local={:?} confrontation={:?} final={:?}",
        locally_safe.directions(),
        confrontation_safe.directions(),
        safe.directions()
    );

    Evaluation {
        locally_safe,
        confrontation_safe,
        safe,
    }
}
