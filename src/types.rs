// Battlesnake API Types
// See https://docs.battlesnake.com/api

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Game metadata including ID, ruleset, and timeout
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Game {
    pub id: String,
    #[serde(default)]
    pub ruleset: HashMap<String, Value>,
    pub timeout: u32,
    #[serde(default)]
    pub source: String,
}

/// Board state including dimensions, food, snakes, and hazards
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Board {
    pub height: i32,
    pub width: i32,
    pub food: Vec<Coord>,
    pub snakes: Vec<Battlesnake>,
    #[serde(default)]
    pub hazards: Vec<Coord>,
}

impl Board {
    /// Snakes other than the one identified by `you_id`
    pub fn others<'a>(&'a self, you_id: &'a str) -> impl Iterator<Item = &'a Battlesnake> + 'a {
        self.snakes.iter().filter(move |s| s.id != you_id)
    }
}

/// Snake representation with all state information
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Battlesnake {
    pub id: String,
    pub name: String,
    pub health: i32,
    pub body: Vec<Coord>,
    pub head: Coord,
    pub length: i32,
    #[serde(default)]
    pub latency: String,
    #[serde(default)]
    pub shout: Option<String>,
}

/// 2D coordinate on the board
#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub fn new(x: i32, y: i32) -> Self {
        Coord { x, y }
    }

    /// Manhattan distance to another coordinate
    pub fn manhattan(&self, other: &Coord) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    /// Squared Euclidean distance to another coordinate
    pub fn dist_sqr(&self, other: &Coord) -> i64 {
        let dx = (self.x - other.x) as i64;
        let dy = (self.y - other.y) as i64;
        dx * dx + dy * dy
    }

    /// Direction in which `other` lies one cardinal step away, if it does
    pub fn direction_to(&self, other: &Coord) -> Option<Direction> {
        Direction::all()
            .iter()
            .copied()
            .find(|dir| dir.apply(self) == *other)
    }
}

/// Represents the four possible movement directions for a Battlesnake
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Returns all possible directions in tie-break order: up, right, down, left
    pub fn all() -> [Direction; 4] {
        [Direction::Up, Direction::Right, Direction::Down, Direction::Left]
    }

    /// Position of this direction in `Direction::all()`
    pub fn index(&self) -> usize {
        match self {
            Direction::Up => 0,
            Direction::Right => 1,
            Direction::Down => 2,
            Direction::Left => 3,
        }
    }

    /// Converts direction to string representation for API response
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }

    /// Parses an API direction symbol (case-insensitive)
    pub fn parse(s: &str) -> Option<Direction> {
        match s.to_lowercase().as_str() {
            "up" => Some(Direction::Up),
            "down" => Some(Direction::Down),
            "left" => Some(Direction::Left),
            "right" => Some(Direction::Right),
            _ => None,
        }
    }

    /// Calculates the next coordinate when moving in this direction
    pub fn apply(&self, coord: &Coord) -> Coord {
        match self {
            Direction::Up => Coord { x: coord.x, y: coord.y + 1 },
            Direction::Down => Coord { x: coord.x, y: coord.y - 1 },
            Direction::Left => Coord { x: coord.x - 1, y: coord.y },
            Direction::Right => Coord { x: coord.x + 1, y: coord.y },
        }
    }
}

/// Complete game state received from the API
#[derive(Deserialize, Serialize, Debug)]
pub struct GameState {
    pub game: Game,
    pub turn: i32,
    pub board: Board,
    pub you: Battlesnake,
}
