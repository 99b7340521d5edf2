// Final move selection among the surviving safe moves

use rand::Rng;

use crate::safety::SafeMoves;
use crate::types::{Coord, Direction};

/// Nearest food by squared distance; the first one listed wins ties
pub fn nearest_food(head: &Coord, food: &[Coord]) -> Option<Coord> {
    let mut best: Option<(Coord, i64)> = None;
    for item in food {
        let dist = head.dist_sqr(item);
        match best {
            Some((_, best_dist)) if best_dist <= dist => {}
            _ => best = Some((*item, dist)),
        }
    }
    best.map(|(coord, _)| coord)
}

/// Greedy one-step bias toward `food`: scans `moves` in order and switches to
/// any step that beats the best squared distance seen so far, starting from
/// the head's own distance. Returns `current` if nothing improves.
pub fn step_toward_food(
    head: &Coord,
    food: &Coord,
    current: Direction,
    moves: &[Direction],
) -> Direction {
    let mut closest = head.dist_sqr(food);
    let mut chosen = current;
    for dir in moves {
        let dist = dir.apply(head).dist_sqr(food);
        if dist < closest {
            closest = dist;
            chosen = *dir;
        }
    }
    chosen
}

/// Picks the move to play. `None` means no safe move is left and the caller
/// must fall back to a fixed direction.
pub fn choose_move<R: Rng>(
    moves: &SafeMoves,
    head: &Coord,
    food: &[Coord],
    food_seeking: bool,
    rng: &mut R,
) -> Option<Direction> {
    let safe = moves.directions();
    if safe.is_empty() {
        return None;
    }

    let random = safe[rng.random_range(0..safe.len())];
    if !food_seeking {
        return Some(random);
    }

    match nearest_food(head, food) {
        Some(target) => Some(step_toward_food(head, &target, random, &safe)),
        None => Some(random),
    }
}
