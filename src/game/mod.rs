//! Core game logic module for Snake
//!
//! Everything here is free of terminal I/O: the grid, the state machine, the
//! tick engine, and the synchronized container both loops share.

pub mod action;
pub mod config;
pub mod engine;
pub mod error;
pub mod grid;
pub mod shared;
pub mod state;
pub mod ticker;

// Re-export commonly used types
pub use action::Direction;
pub use config::GameConfig;
pub use engine::{GameEngine, TickOutcome};
pub use error::{GameError, GameResult};
pub use grid::Grid;
pub use shared::SharedGame;
pub use state::{CollisionType, GameState, Phase, Position, Snake, Snapshot};
pub use ticker::{run_update_loop, spawn_update_engine};
