// Library exports for the Battlesnake bot
// This allows the replay tool and integration tests to use the move engine

pub mod bot;
pub mod config;
pub mod debug_logger;
pub mod engine;
pub mod grid;
pub mod obstacles;
pub mod reachability;
pub mod replay;
pub mod safety;
pub mod selection;
pub mod space;
pub mod types;
