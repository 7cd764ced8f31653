use thiserror::Error;

use super::action::Direction;
use super::state::Position;

/// Errors raised by the game core
#[derive(Debug, Error)]
pub enum GameError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("snake has no segments")]
    EmptySnake,

    #[error("moving {direction:?} from {from} overflows the coordinate space")]
    PositionOverflow { from: Position, direction: Direction },

    #[error("tick panicked: {0}")]
    TickPanicked(String),
}

pub type GameResult<T> = Result<T, GameError>;
