// Welcome to
// __________         __    __  .__                               __
// \______   \_____ _/  |__/  |_|  |   ____   ______ ____ _____  |  | __ ____
//  |    |  _/\__  \\   __\   __\  | _/ __ \ /  ___//    \\__  \ |  |/ // __ \
//  |    |   \ / __ \|  |  |  | |  |_\  ___/ \___ \|   |  \/ __ \|    <\  ___/
//  |________/(______/__|  |__| |____/\_____>______>___|__(______/__|__\\_____>
//
// This file wires the move engine to the Battlesnake API endpoints.
// For more info see docs.battlesnake.com

use log::{error, info, warn};
use rand::Rng;
use serde_json::{json, Value};
use std::time::Instant;

use crate::config::Config;
use crate::debug_logger::{DebugLogger, TurnRecord};
use crate::engine;
use crate::selection::choose_move;
use crate::types::{Battlesnake, Board, Direction, Game};

/// Outcome of one turn's decision
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveDecision {
    pub direction: Direction,
    /// Moves that survived every filter
    pub safe_moves: Vec<Direction>,
    /// True when no move was safe (or the snapshot was rejected)
    pub used_fallback: bool,
}

/// Battlesnake Bot with OOP-style API
/// Takes static configuration dependencies and exposes methods corresponding to API endpoints
pub struct Bot {
    config: Config,
    logger: DebugLogger,
}

impl Bot {
    /// Creates a new Bot instance with the given configuration and no debug log
    ///
    /// # Arguments
    /// * `config` - Static configuration that does not change during the bot's lifetime
    pub fn new(config: Config) -> Self {
        Bot::with_logger(config, DebugLogger::disabled())
    }

    /// Creates a Bot that records every turn to `logger`
    pub fn with_logger(config: Config, logger: DebugLogger) -> Self {
        Bot { config, logger }
    }

    /// Returns bot metadata and appearance
    /// Corresponds to GET / endpoint
    pub fn info(&self) -> Value {
        info!("INFO");

        let appearance = &self.config.appearance;
        json!({
            "apiversion": "1",
            "author": appearance.author,
            "color": appearance.color,
            "head": appearance.head,
            "tail": appearance.tail,
        })
    }

    /// Called when a game starts
    /// Corresponds to POST /start endpoint
    pub fn start(&self, game: &Game, _turn: &i32, _board: &Board, _you: &Battlesnake) {
        info!("GAME START {}", game.id);
    }

    /// Called when a game ends
    /// Corresponds to POST /end endpoint
    pub fn end(&self, game: &Game, turn: &i32, _board: &Board, _you: &Battlesnake) {
        info!("GAME OVER {} after {} turns", game.id, turn);
    }

    /// Computes and returns the next move
    /// Corresponds to POST /move endpoint
    ///
    /// # Arguments
    /// * `game` - Current game metadata
    /// * `turn` - Current turn number
    /// * `board` - Current board state
    /// * `you` - Your snake's current state
    ///
    /// # Returns
    /// * `Value` - JSON response containing the chosen move direction
    pub fn get_move(&self, game: &Game, turn: &i32, board: &Board, you: &Battlesnake) -> Value {
        let start_time = Instant::now();

        let decision = self.decide(board, you, &mut rand::rng());
        let elapsed = start_time.elapsed().as_millis();

        info!(
            "MOVE {}: {} (safe: {:?}, time: {}ms)",
            turn,
            decision.direction.as_str(),
            decision
                .safe_moves
                .iter()
                .map(|d| d.as_str())
                .collect::<Vec<_>>(),
            elapsed
        );

        if elapsed as u64 > self.config.timing.effective_budget_ms() {
            warn!(
                "Turn {} took {}ms, over the {}ms budget",
                turn,
                elapsed,
                self.config.timing.effective_budget_ms()
            );
        }

        if self.logger.is_enabled() {
            self.logger.log_turn(TurnRecord::new(
                *turn,
                &game.id,
                you.clone(),
                board.clone(),
                decision.safe_moves.clone(),
                decision.direction,
            ));
        }

        json!({ "move": decision.direction.as_str() })
    }

    /// Runs the move engine on one snapshot with an explicit random source.
    /// Falls back to the configured direction when the snapshot is invalid or
    /// nothing is safe.
    pub fn decide<R: Rng>(&self, board: &Board, you: &Battlesnake, rng: &mut R) -> MoveDecision {
        let fallback = self.config.move_selection.fallback_direction;

        if let Err(e) = engine::validate(board, you) {
            error!("Rejected snapshot: {}. Moving {}", e, fallback.as_str());
            return MoveDecision {
                direction: fallback,
                safe_moves: vec![],
                used_fallback: true,
            };
        }

        let evaluation = engine::evaluate(board, you);
        let safe_moves = evaluation.safe.directions();

        match choose_move(
            &evaluation.safe,
            &you.head,
            &board.food,
            self.config.move_selection.food_seeking,
            rng,
        ) {
            Some(direction) => MoveDecision {
                direction,
                safe_moves,
                used_fallback: false,
            },
            None => {
                warn!("No safe moves detected! Moving {}", fallback.as_str());
                MoveDecision {
                    direction: fallback,
                    safe_moves,
                    used_fallback: true,
                }
            }
        }
    }
}
