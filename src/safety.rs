// Move safety filtering
//
// Every stage takes the current candidate record and returns a narrowed copy.
// A direction can only go from safe to unsafe; nothing here re-opens a move.

use log::debug;

use crate::grid::Bounds;
use crate::types::{Battlesnake, Coord, Direction};

/// Candidate moves for one turn, keyed by direction in `Direction::all()` order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SafeMoves {
    safe: [bool; 4],
}

impl SafeMoves {
    /// Every direction starts out safe
    pub fn all_safe() -> Self {
        SafeMoves { safe: [true; 4] }
    }

    pub fn is_safe(&self, dir: Direction) -> bool {
        self.safe[dir.index()]
    }

    /// Returns a copy with `dir` marked unsafe
    #[must_use]
    pub fn without(self, dir: Direction) -> Self {
        let mut safe = self.safe;
        safe[dir.index()] = false;
        SafeMoves { safe }
    }

    pub fn count(&self) -> usize {
        self.safe.iter().filter(|&&s| s).count()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Safe directions in up, right, down, left order
    pub fn directions(&self) -> Vec<Direction> {
        Direction::all()
            .iter()
            .copied()
            .filter(|dir| self.is_safe(*dir))
            .collect()
    }
}

/// Forbids moving back onto the neck. Bodies shorter than two segments, or a
/// neck stacked on the head, lock nothing.
pub fn reverse_lock(moves: SafeMoves, body: &[Coord]) -> SafeMoves {
    if body.len() < 2 {
        return moves;
    }
    match body[0].direction_to(&body[1]) {
        Some(dir) => moves.without(dir),
        None => moves,
    }
}

/// Forbids leaving the board from an edge cell
pub fn boundary(moves: SafeMoves, head: &Coord, bounds: &Bounds) -> SafeMoves {
    let mut moves = moves;
    if head.x == 0 {
        moves = moves.without(Direction::Left);
    }
    if head.x == bounds.width - 1 {
        moves = moves.without(Direction::Right);
    }
    if head.y == 0 {
        moves = moves.without(Direction::Down);
    }
    if head.y == bounds.height - 1 {
        moves = moves.without(Direction::Up);
    }
    moves
}

/// Forbids any direction whose target cell holds one of `segments`
pub fn body_collision<'a, I>(moves: SafeMoves, head: &Coord, segments: I) -> SafeMoves
where
    I: IntoIterator<Item = &'a Coord>,
{
    segments
        .into_iter()
        .filter_map(|segment| head.direction_to(segment))
        .fold(moves, |acc, dir| acc.without(dir))
}

/// Runs the four immediate-death checks: reverse lock, board edges, own body
/// and other bodies.
pub fn filter_unsafe_moves(
    you: &Battlesnake,
    others: &[&Battlesnake],
    bounds: &Bounds,
) -> SafeMoves {
    let head = you.head;
    let mut moves = SafeMoves::all_safe();

    moves = reverse_lock(moves, &you.body);
    moves = boundary(moves, &head, bounds);
    moves = body_collision(moves, &head, &you.body);
    for other in others {
        moves = body_collision(moves, &head, &other.body);
    }

    debug!("Locally safe moves: {:?}", moves.directions());
    moves
}

/// True when moving in `dir` lands next to a head of a snake at least as long
/// as us. Landing on the head itself is a body collision, not a confrontation.
pub fn is_losing_confrontation(
    dir: Direction,
    head: &Coord,
    length: i32,
    other_heads: &[(Coord, i32)],
) -> bool {
    let target = dir.apply(head);
    other_heads
        .iter()
        .any(|(other_head, other_len)| target.manhattan(other_head) == 1 && *other_len >= length)
}

/// Vetoes moves into possible head-to-head collisions we would lose or tie.
/// If every remaining move would be vetoed, the input is returned unchanged.
pub fn avoid_head_confrontations(
    moves: SafeMoves,
    you: &Battlesnake,
    others: &[&Battlesnake],
) -> SafeMoves {
    let other_heads: Vec<(Coord, i32)> = others.iter().map(|s| (s.head, s.length)).collect();

    let vetoed = moves
        .directions()
        .into_iter()
        .filter(|dir| is_losing_confrontation(*dir, &you.head, you.length, &other_heads))
        .fold(moves, |acc, dir| acc.without(dir));

    if vetoed.is_empty() {
        if !moves.is_empty() {
            debug!("All moves risk a head-to-head, keeping {:?}", moves.directions());
        }
        moves
    } else {
        vetoed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snake(id: &str, body: &[(i32, i32)]) -> Battlesnake {
        let body: Vec<Coord> = body.iter().map(|&(x, y)| Coord::new(x, y)).collect();
        Battlesnake {
            id: id.to_string(),
            name: id.to_string(),
            health: 100,
            head: body[0],
            length: body.len() as i32,
            body,
            latency: String::new(),
            shout: None,
        }
    }

    #[test]
    fn test_without_never_reopens() {
        let moves = SafeMoves::all_safe().without(Direction::Up);
        let moves = moves.without(Direction::Up).without(Direction::Left);
        assert!(!moves.is_safe(Direction::Up));
        assert_eq!(moves.directions(), vec![Direction::Right, Direction::Down]);
    }

    #[test]
    fn test_directions_order() {
        assert_eq!(
            SafeMoves::all_safe().directions(),
            vec![Direction::Up, Direction::Right, Direction::Down, Direction::Left]
        );
    }

    #[test]
    fn test_reverse_lock_each_neck_position() {
        let cases = [
            ((4, 5), Direction::Left),
            ((6, 5), Direction::Right),
            ((5, 4), Direction::Down),
            ((5, 6), Direction::Up),
        ];
        for &((nx, ny), locked) in &cases {
            let body = vec![Coord::new(5, 5), Coord::new(nx, ny)];
            let moves = reverse_lock(SafeMoves::all_safe(), &body);
            assert!(!moves.is_safe(locked));
            assert_eq!(moves.count(), 3);
        }
    }

    #[test]
    fn test_reverse_lock_skipped_for_single_segment() {
        let body = vec![Coord::new(5, 5)];
        assert_eq!(reverse_lock(SafeMoves::all_safe(), &body).count(), 4);
    }

    #[test]
    fn test_reverse_lock_skipped_for_stacked_neck() {
        let body = vec![Coord::new(5, 5), Coord::new(5, 5), Coord::new(5, 5)];
        assert_eq!(reverse_lock(SafeMoves::all_safe(), &body).count(), 4);
    }

    #[test]
    fn test_boundary_corners() {
        let bounds = Bounds::new(11, 11);
        let moves = boundary(SafeMoves::all_safe(), &Coord::new(0, 0), &bounds);
        assert_eq!(moves.directions(), vec![Direction::Up, Direction::Right]);

        let moves = boundary(SafeMoves::all_safe(), &Coord::new(10, 10), &bounds);
        assert_eq!(moves.directions(), vec![Direction::Down, Direction::Left]);
    }

    #[test]
    fn test_self_collision_with_coiled_body() {
        // Head at (5,5) with body wrapping around to (6,5)
        let me = snake("me", &[(5, 5), (5, 4), (6, 4), (6, 5), (6, 6)]);
        let moves = body_collision(SafeMoves::all_safe(), &me.head, &me.body);
        assert!(!moves.is_safe(Direction::Down));
        assert!(!moves.is_safe(Direction::Right));
        assert!(moves.is_safe(Direction::Up));
        assert!(moves.is_safe(Direction::Left));
    }

    #[test]
    fn test_other_snake_body_blocks() {
        let me = snake("me", &[(5, 5), (5, 4)]);
        let enemy = snake("enemy", &[(3, 6), (4, 6), (5, 6), (6, 6)]);
        let moves = filter_unsafe_moves(&me, &[&enemy], &Bounds::new(11, 11));
        assert_eq!(moves.directions(), vec![Direction::Right, Direction::Left]);
    }

    #[test]
    fn test_filter_marks_at_most_four() {
        // Boxed in on every side
        let me = snake("me", &[(1, 1), (1, 0), (0, 0), (0, 1), (0, 2), (1, 2), (2, 2), (2, 1)]);
        let moves = filter_unsafe_moves(&me, &[], &Bounds::new(3, 3));
        assert!(moves.is_empty());
        assert_eq!(moves.directions().len(), 0);
    }

    #[test]
    fn test_confrontation_adjacency_excludes_direct_hit() {
        let head = Coord::new(5, 5);
        // Other head two cells up: moving up lands adjacent to it
        let heads = vec![(Coord::new(5, 7), 3)];
        assert!(is_losing_confrontation(Direction::Up, &head, 3, &heads));
        assert!(!is_losing_confrontation(Direction::Down, &head, 3, &heads));

        // Other head directly on the target cell is not a confrontation
        let heads = vec![(Coord::new(5, 6), 3)];
        assert!(!is_losing_confrontation(Direction::Up, &head, 3, &heads));
    }

    #[test]
    fn test_confrontation_with_shorter_snake_is_allowed() {
        let head = Coord::new(5, 5);
        let heads = vec![(Coord::new(6, 6), 2)];
        assert!(!is_losing_confrontation(Direction::Up, &head, 3, &heads));
        assert!(is_losing_confrontation(Direction::Up, &head, 2, &heads));
    }

    #[test]
    fn test_confrontation_overlay_discarded_when_it_empties_set() {
        let me = snake("me", &[(5, 5), (5, 4), (5, 3)]);
        let enemy = snake("enemy", &[(6, 6), (7, 6), (8, 6), (9, 6)]);
        let moves = SafeMoves::all_safe()
            .without(Direction::Down)
            .without(Direction::Left);

        // Both up and right land next to the longer enemy head
        let result = avoid_head_confrontations(moves, &me, &[&enemy]);
        assert_eq!(result, moves);
    }
}
