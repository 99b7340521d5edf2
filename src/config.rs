// Configuration module for reading Snake.toml
// This module provides OOP-style configuration management for the Battlesnake bot

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::types::Direction;

/// Main configuration structure containing all tunable parameters
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub timing: TimingConfig,
    pub appearance: AppearanceConfig,
    pub move_selection: MoveSelectionConfig,
    pub debug: DebugConfig,
}

/// Response time limits
#[derive(Debug, Deserialize, Clone)]
pub struct TimingConfig {
    pub response_time_budget_ms: u64,
    pub network_overhead_ms: u64,
}

impl TimingConfig {
    /// Computes the effective computation budget
    pub fn effective_budget_ms(&self) -> u64 {
        self.response_time_budget_ms.saturating_sub(self.network_overhead_ms)
    }
}

/// Values reported on GET /
#[derive(Debug, Deserialize, Clone)]
pub struct AppearanceConfig {
    pub author: String,
    pub color: String,
    pub head: String,
    pub tail: String,
}

/// Final move selection
#[derive(Debug, Deserialize, Clone)]
pub struct MoveSelectionConfig {
    /// Played when no move survives the safety filters
    pub fallback_direction: Direction,
    /// Bias the random pick toward the nearest food
    pub food_seeking: bool,
}

/// Debug configuration
#[derive(Debug, Deserialize, Clone)]
pub struct DebugConfig {
    pub enabled: bool,
    pub log_file_path: String,
}

impl Config {
    /// Loads configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the Snake.toml configuration file
    ///
    /// # Returns
    /// * `Result<Config, String>` - Parsed configuration or error message
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let contents = fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        Self::from_toml_str(&contents)
    }

    /// Parses configuration from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self, String> {
        toml::from_str(contents).map_err(|e| format!("Failed to parse config file: {}", e))
    }

    /// Loads default configuration from Snake.toml in the project root
    pub fn load_default() -> Result<Self, String> {
        Self::from_file("Snake.toml")
    }

    /// Creates a configuration with hardcoded default values as fallback
    /// This should match the constants defined in Snake.toml
    pub fn default_hardcoded() -> Self {
        Config {
            timing: TimingConfig {
                response_time_budget_ms: 500,
                network_overhead_ms: 100,
            },
            appearance: AppearanceConfig {
                author: "space-aware-snake".to_string(),
                color: "#02d9e8".to_string(),
                head: "dragon".to_string(),
                tail: "default".to_string(),
            },
            move_selection: MoveSelectionConfig {
                fallback_direction: Direction::Down,
                food_seeking: true,
            },
            debug: DebugConfig {
                enabled: false,
                log_file_path: "battlesnake_debug.jsonl".to_string(),
            },
        }
    }

    /// Attempts to load from file, falls back to hardcoded defaults on error
    pub fn load_or_default() -> Self {
        Self::load_default().unwrap_or_else(|e| {
            log::warn!("Could not load Snake.toml ({}), using hardcoded defaults", e);
            Self::default_hardcoded()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_budget_calculation() {
        let config = Config::default_hardcoded();
        assert_eq!(config.timing.effective_budget_ms(), 400);
    }

    #[test]
    fn test_snake_toml_can_be_parsed() {
        // This test ensures Snake.toml is valid and can be parsed
        let result = Config::from_file("Snake.toml");
        assert!(
            result.is_ok(),
            "Failed to parse Snake.toml: {:?}",
            result.err()
        );
    }

    #[test]
    fn test_all_config_values_match_hardcoded_defaults() {
        let file_config = Config::from_file("Snake.toml").expect("Snake.toml should be parseable");
        let hardcoded_config = Config::default_hardcoded();

        assert_eq!(
            file_config.timing.response_time_budget_ms,
            hardcoded_config.timing.response_time_budget_ms
        );
        assert_eq!(
            file_config.timing.network_overhead_ms,
            hardcoded_config.timing.network_overhead_ms
        );
        assert_eq!(file_config.appearance.author, hardcoded_config.appearance.author);
        assert_eq!(file_config.appearance.color, hardcoded_config.appearance.color);
        assert_eq!(file_config.appearance.head, hardcoded_config.appearance.head);
        assert_eq!(file_config.appearance.tail, hardcoded_config.appearance.tail);
        assert_eq!(
            file_config.move_selection.fallback_direction,
            hardcoded_config.move_selection.fallback_direction
        );
        assert_eq!(
            file_config.move_selection.food_seeking,
            hardcoded_config.move_selection.food_seeking
        );
        assert_eq!(file_config.debug.enabled, hardcoded_config.debug.enabled);
        assert_eq!(
            file_config.debug.log_file_path,
            hardcoded_config.debug.log_file_path
        );
    }

    #[test]
    fn test_fallback_direction_parses_lowercase() {
        let config = Config::from_toml_str(
            r##"
            [timing]
            response_time_budget_ms = 500
            network_overhead_ms = 100

            [appearance]
            author = "a"
            color = "#000000"
            head = "default"
            tail = "default"

            [move_selection]
            fallback_direction = "left"
            food_seeking = false

            [debug]
            enabled = false
            log_file_path = "x.jsonl"
            "##,
        )
        .expect("inline config should parse");
        assert_eq!(config.move_selection.fallback_direction, Direction::Left);
        assert!(!config.move_selection.food_seeking);
    }

    #[test]
    fn test_unknown_fallback_direction_is_rejected() {
        let result = Config::from_toml_str(
            r##"
            [timing]
            response_time_budget_ms = 500
            network_overhead_ms = 100

            [appearance]
            author = "a"
            color = "#000000"
            head = "default"
            tail = "default"

            [move_selection]
            fallback_direction = "sideways"
            food_seeking = false

            [debug]
            enabled = false
            log_file_path = "x.jsonl"
            "##,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_toml_returns_error() {
        // Test with a non-existent file
        let result = Config::from_file("nonexistent.toml");
        assert!(result.is_err());
    }
}
