// Debug logging module for asynchronous game state logging
//
// This module provides fire-and-forget async logging to avoid blocking
// the main request/response cycle. Each turn's snapshot and decision is
// written as one line of a JSONL file, which the replay tool reads back.

use log::error;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::types::{Battlesnake, Board, Direction};

/// A single logged turn: the snapshot we saw and what we decided
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnRecord {
    pub turn: i32,
    pub game_id: String,
    pub you: Battlesnake,
    pub board: Board,
    /// Candidates left after every filter, in up, right, down, left order
    pub safe_moves: Vec<Direction>,
    /// Move symbol as sent in the response
    pub chosen_move: String,
    pub timestamp: String,
}

impl TurnRecord {
    pub fn new(
        turn: i32,
        game_id: &str,
        you: Battlesnake,
        board: Board,
        safe_moves: Vec<Direction>,
        chosen_move: Direction,
    ) -> Self {
        TurnRecord {
            turn,
            game_id: game_id.to_string(),
            you,
            board,
            safe_moves,
            chosen_move: chosen_move.as_str().to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Shared debug logger state
/// Uses Arc<Mutex<File>> to allow concurrent async writes from multiple tasks
#[derive(Clone)]
pub struct DebugLogger {
    file: Arc<Mutex<Option<File>>>,
    enabled: bool,
}

impl DebugLogger {
    /// Creates a new debug logger
    /// If enabled is true, initializes the log file (truncating if it exists)
    pub async fn new(enabled: bool, log_file_path: &str) -> Self {
        if !enabled {
            return DebugLogger::disabled();
        }

        match OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(log_file_path)
            .await
        {
            Ok(file) => {
                log::info!("Debug logging enabled: {}", log_file_path);
                DebugLogger {
                    file: Arc::new(Mutex::new(Some(file))),
                    enabled: true,
                }
            }
            Err(e) => {
                error!("Failed to create debug log file '{}': {}", log_file_path, e);
                DebugLogger::disabled()
            }
        }
    }

    /// Creates a disabled debug logger (no-op)
    pub fn disabled() -> Self {
        DebugLogger {
            file: Arc::new(Mutex::new(None)),
            enabled: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Logs a turn asynchronously (fire-and-forget)
    /// This spawns a tokio task that writes to the file without blocking
    pub fn log_turn(&self, record: TurnRecord) {
        if !self.enabled {
            return;
        }

        let file_handle = self.file.clone();
        tokio::spawn(async move {
            Self::write_record(file_handle, record).await;
        });
    }

    /// Serializes and appends one record; awaited by `log_turn`'s task
    pub(crate) async fn write_record(file_handle: Arc<Mutex<Option<File>>>, record: TurnRecord) {
        let mut file_guard = file_handle.lock().await;

        if let Some(file) = file_guard.as_mut() {
            match serde_json::to_string(&record) {
                Ok(json_line) => {
                    let line_with_newline = format!("{}\n", json_line);
                    if let Err(e) = file.write_all(line_with_newline.as_bytes()).await {
                        error!("Failed to write debug log entry: {}", e);
                    } else if let Err(e) = file.flush().await {
                        error!("Failed to flush debug log: {}", e);
                    }
                }
                Err(e) => {
                    error!("Failed to serialize debug log entry: {}", e);
                }
            }
        }
    }
}
