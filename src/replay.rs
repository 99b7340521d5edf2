// Replay module for checking logged decisions against the move engine
//
// This module provides functionality to:
// 1. Parse JSONL debug logs
// 2. Re-run the safety and space filters on each logged snapshot
// 3. Compare the recomputed safe set and the logged move
// 4. Generate a report

use log::{info, warn};
use rayon::prelude::*;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Instant;

use crate::config::Config;
use crate::debug_logger::TurnRecord;
use crate::engine;
use crate::grid::{next_coord, Bounds};
use crate::obstacles::ObstacleSet;
use crate::types::{Coord, Direction};

/// Result of replaying a single turn
#[derive(Debug, Clone)]
pub struct ReplayResult {
    pub turn: i32,
    pub logged_move: String,
    pub logged_safe: Vec<Direction>,
    pub replayed_safe: Vec<Direction>,
    /// Recomputed safe set equals the logged one
    pub safe_set_matches: bool,
    /// Logged move is one of the recomputed safe moves, or the fallback when none
    pub move_consistent: bool,
    /// Cell the logged move lands on
    pub landing: Coord,
    /// Landing cell is on the board, unoccupied and not the current head
    pub landing_free: bool,
    pub computation_time_us: u128,
}

impl ReplayResult {
    pub fn matches(&self) -> bool {
        self.safe_set_matches && self.move_consistent
    }
}

/// Statistics for a complete replay session
#[derive(Debug, Default)]
pub struct ReplayStats {
    pub total_turns: usize,
    pub matches: usize,
    pub mismatches: usize,
    pub blocked_landings: usize,
    pub match_rate: f64,
}

/// Replay engine for analyzing debug logs
pub struct ReplayEngine {
    config: Config,
    verbose: bool,
}

impl ReplayEngine {
    /// Creates a new replay engine with the given configuration
    pub fn new(config: Config, verbose: bool) -> Self {
        ReplayEngine { config, verbose }
    }

    /// Loads all log entries from a JSONL file
    pub fn load_log_file<P: AsRef<Path>>(&self, log_path: P) -> Result<Vec<TurnRecord>, String> {
        let file = File::open(log_path.as_ref())
            .map_err(|e| format!("Failed to open log file: {}", e))?;

        let reader = BufReader::new(file);
        let mut entries = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| format!("Failed to read line {}: {}", line_num + 1, e))?;

            if line.trim().is_empty() {
                continue;
            }

            let entry: TurnRecord = serde_json::from_str(&line)
                .map_err(|e| format!("Failed to parse JSON on line {}: {}", line_num + 1, e))?;

            entries.push(entry);
        }

        info!("Loaded {} log entries", entries.len());
        Ok(entries)
    }

    /// Re-evaluates a single logged turn
    pub fn replay_entry(&self, entry: &TurnRecord) -> Result<ReplayResult, String> {
        engine::validate(&entry.board, &entry.you)
            .map_err(|e| format!("Turn {}: {}", entry.turn, e))?;

        let start_time = Instant::now();
        let evaluation = engine::evaluate(&entry.board, &entry.you);
        let computation_time_us = start_time.elapsed().as_micros();

        let replayed_safe = evaluation.safe.directions();
        let safe_set_matches = replayed_safe == in_direction_order(&entry.safe_moves);

        let move_consistent = match Direction::parse(&entry.chosen_move) {
            Some(dir) if replayed_safe.is_empty() => {
                dir == self.config.move_selection.fallback_direction
            }
            Some(dir) => replayed_safe.contains(&dir),
            None => false,
        };

        let head = entry.you.head;
        let landing = next_coord(&head, &entry.chosen_move);
        let obstacles = ObstacleSet::from_board(&entry.board, &entry.you);
        let landing_free = landing != head
            && Bounds::of(&entry.board).contains(&landing)
            && !obstacles.contains(&landing);

        let result = ReplayResult {
            turn: entry.turn,
            logged_move: entry.chosen_move.clone(),
            logged_safe: entry.safe_moves.clone(),
            replayed_safe,
            safe_set_matches,
            move_consistent,
            landing,
            landing_free,
            computation_time_us,
        };

        if self.verbose {
            if result.matches() {
                info!("Turn {}: ✓ MATCH - {}", entry.turn, entry.chosen_move);
            } else {
                warn!(
                    "Turn {}: ✗ MISMATCH - logged {} with safe {:?}, replayed safe {:?}",
                    entry.turn,
                    entry.chosen_move,
                    Self::names(&result.logged_safe),
                    Self::names(&result.replayed_safe)
                );
            }
        }

        Ok(result)
    }

    /// Replays all entries in parallel; results keep log order
    pub fn replay_all(&self, entries: &[TurnRecord]) -> Vec<ReplayResult> {
        entries
            .par_iter()
            .filter_map(|entry| match self.replay_entry(entry) {
                Ok(result) => Some(result),
                Err(e) => {
                    warn!("Failed to replay turn {}: {}", entry.turn, e);
                    None
                }
            })
            .collect()
    }

    /// Replays specific turns from a log file
    pub fn replay_turns(
        &self,
        entries: &[TurnRecord],
        turn_numbers: &[i32],
    ) -> Result<Vec<ReplayResult>, String> {
        let selected: Vec<TurnRecord> = turn_numbers
            .iter()
            .map(|turn_num| {
                entries
                    .iter()
                    .find(|e| e.turn == *turn_num)
                    .cloned()
                    .ok_or_else(|| format!("Turn {} not found in log file", turn_num))
            })
            .collect::<Result<_, _>>()?;

        Ok(self.replay_all(&selected))
    }

    /// Generates statistics from replay results
    pub fn generate_stats(&self, results: &[ReplayResult]) -> ReplayStats {
        let total_turns = results.len();
        let matches = results.iter().filter(|r| r.matches()).count();
        let mismatches = total_turns - matches;
        let blocked_landings = results.iter().filter(|r| !r.landing_free).count();
        let match_rate = if total_turns > 0 {
            (matches as f64 / total_turns as f64) * 100.0
        } else {
            0.0
        };

        ReplayStats {
            total_turns,
            matches,
            mismatches,
            blocked_landings,
            match_rate,
        }
    }

    /// Prints a detailed report of replay results
    pub fn print_report(&self, results: &[ReplayResult]) {
        let stats = self.generate_stats(results);

        println!("\n═══════════════════════════════════════════════════════════");
        println!("                    REPLAY REPORT");
        println!("═══════════════════════════════════════════════════════════");
        println!("Total Turns:      {}", stats.total_turns);
        println!("Matches:          {} ({:.1}%)", stats.matches, stats.match_rate);
        println!("Mismatches:       {}", stats.mismatches);
        println!("Blocked Landings: {}", stats.blocked_landings);
        println!("═══════════════════════════════════════════════════════════\n");

        if !results.is_empty() {
            let avg_time: f64 = results
                .iter()
                .map(|r| r.computation_time_us as f64)
                .sum::<f64>()
                / results.len() as f64;
            println!("Average Evaluation Time:   {:.1}us\n", avg_time);
        }

        let mismatches: Vec<_> = results.iter().filter(|r| !r.matches()).collect();
        if !mismatches.is_empty() {
            println!("═══════════════════════════════════════════════════════════");
            println!("                  DETAILED MISMATCHES");
            println!("═══════════════════════════════════════════════════════════");

            for result in mismatches {
                println!(
                    "Turn {}: logged {} (safe {:?}) → replayed safe {:?}",
                    result.turn,
                    result.logged_move,
                    Self::names(&result.logged_safe),
                    Self::names(&result.replayed_safe)
                );
            }
            println!();
        }
    }

    fn names(dirs: &[Direction]) -> Vec<&'static str> {
        dirs.iter().map(|d| d.as_str()).collect()
    }
}

/// Sorts and dedups into `Direction::all()` order
fn in_direction_order(dirs: &[Direction]) -> Vec<Direction> {
    let mut dirs = dirs.to_vec();
    dirs.sort_by_key(|d| d.index());
    dirs.dedup();
    dirs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Battlesnake, Board};

    fn entry(chosen: &str, safe: Vec<Direction>) -> TurnRecord {
        let body = vec![Coord::new(5, 5), Coord::new(5, 4), Coord::new(5, 3)];
        let you = Battlesnake {
            id: "me".to_string(),
            name: "me".to_string(),
            health: 100,
            head: body[0],
            length: 3,
            body,
            latency: String::new(),
            shout: None,
        };
        let board = Board {
            width: 11,
            height: 11,
            food: vec![],
            snakes: vec![you.clone()],
            hazards: vec![],
        };
        TurnRecord {
            turn: 4,
            game_id: "g".to_string(),
            you,
            board,
            safe_moves: safe,
            chosen_move: chosen.to_string(),
            timestamp: String::new(),
        }
    }

    #[test]
    fn test_consistent_entry_matches() {
        let replay = ReplayEngine::new(Config::default_hardcoded(), false);
        let e = entry(
            "left",
            vec![Direction::Left, Direction::Up, Direction::Right],
        );
        let result = replay.replay_entry(&e).unwrap();
        assert!(result.safe_set_matches);
        assert!(result.move_consistent);
        assert!(result.landing_free);
        assert_eq!(result.landing, Coord::new(4, 5));
    }

    #[test]
    fn test_unsafe_logged_move_is_flagged() {
        let replay = ReplayEngine::new(Config::default_hardcoded(), false);
        let e = entry(
            "down",
            vec![Direction::Up, Direction::Right, Direction::Left],
        );
        let result = replay.replay_entry(&e).unwrap();
        assert!(!result.move_consistent);
        assert!(!result.landing_free);
        assert!(!result.matches());
    }

    #[test]
    fn test_unrecognised_logged_move_stays_in_place() {
        let replay = ReplayEngine::new(Config::default_hardcoded(), false);
        let e = entry("north", vec![Direction::Up, Direction::Right, Direction::Left]);
        let result = replay.replay_entry(&e).unwrap();
        assert_eq!(result.landing, Coord::new(5, 5));
        assert!(!result.landing_free);
        assert!(!result.move_consistent);
    }

    #[test]
    fn test_stats_count_mismatches() {
        let replay = ReplayEngine::new(Config::default_hardcoded(), false);
        let entries = vec![
            entry("up", vec![Direction::Up, Direction::Right, Direction::Left]),
            entry("down", vec![Direction::Up, Direction::Right, Direction::Left]),
        ];
        let results = replay.replay_all(&entries);
        let stats = replay.generate_stats(&results);
        assert_eq!(stats.total_turns, 2);
        assert_eq!(stats.matches, 1);
        assert_eq!(stats.mismatches, 1);
        assert_eq!(stats.blocked_landings, 1);
        assert!((stats.match_rate - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_replay_turns_reports_missing_turn() {
        let replay = ReplayEngine::new(Config::default_hardcoded(), false);
        let entries = vec![entry("up", vec![])];
        assert!(replay.replay_turns(&entries, &[99]).is_err());
    }
}
