use rand::{SeedableRng, rngs::StdRng};
use tracing::{debug, info};

use super::{
    action::Direction,
    config::GameConfig,
    error::{GameError, GameResult},
    state::{CollisionType, GameState, Phase, Position, Snake},
};

/// What a single tick did to the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Game was paused or over; nothing changed
    Idle,
    /// Snake advanced one cell
    Moved,
    /// Snake advanced onto the food and grew
    Ate,
    /// Snake crashed and the game is over
    Crashed(CollisionType),
    /// Snake grew to cover every cell, leaving nowhere to put food
    BoardFilled,
}

impl TickOutcome {
    pub fn ends_game(&self) -> bool {
        matches!(self, TickOutcome::Crashed(_) | TickOutcome::BoardFilled)
    }
}

/// The game engine that handles all game logic
#[derive(Debug)]
pub struct GameEngine {
    config: GameConfig,
    rng: StdRng,
}

impl GameEngine {
    /// Create a new game engine with the given configuration
    pub fn new(config: GameConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self { config, rng }
    }

    /// Fresh game: snake at the center heading right, food somewhere free
    pub fn reset(&mut self) -> GameState {
        let grid = self.config.grid();
        let snake = Snake::new(
            grid.center(),
            Direction::Right,
            self.config.initial_length,
            grid.cell_size(),
        );
        let food = grid
            .spawn_food(&mut self.rng, &snake.occupancy())
            .unwrap_or(grid.origin(0, 0));

        GameState::new(grid, snake, food)
    }

    /// Put `state` back to its starting values, keeping `running`
    pub fn restart(&mut self, state: &mut GameState) {
        let running = state.running;
        *state = self.reset();
        state.running = running;
    }

    /// Advance the game by one tick.
    ///
    /// Collision checks happen before any mutation, so a crash leaves the
    /// body exactly as it was on the previous tick.
    pub fn tick(&mut self, state: &mut GameState) -> GameResult<TickOutcome> {
        if state.phase != Phase::Playing {
            return Ok(TickOutcome::Idle);
        }

        state.snake.direction = state.next_direction;
        let direction = state.snake.direction;

        let head = state.snake.head().ok_or(GameError::EmptySnake)?;
        let new_head = head
            .checked_step(direction, state.grid.cell_size())
            .ok_or(GameError::PositionOverflow {
                from: head,
                direction,
            })?;

        if let Some(collision) = Self::check_collision(state, new_head) {
            self.end_game(state, TickOutcome::Crashed(collision));
            return Ok(TickOutcome::Crashed(collision));
        }

        state.snake.push_head(new_head);
        state.ticks += 1;

        if new_head != state.food {
            state.snake.pop_tail();
            return Ok(TickOutcome::Moved);
        }

        state.score += self.config.score_increment;
        state.color_index = (state.color_index + 1) % self.config.palette_size.max(1);
        debug!(score = state.score, length = state.snake.len(), "food eaten");

        match state.grid.spawn_food(&mut self.rng, &state.snake.occupancy()) {
            Some(food) => {
                state.food = food;
                Ok(TickOutcome::Ate)
            }
            None => {
                self.end_game(state, TickOutcome::BoardFilled);
                Ok(TickOutcome::BoardFilled)
            }
        }
    }

    /// Check if the new head position causes a collision
    fn check_collision(state: &GameState, pos: Position) -> Option<CollisionType> {
        if !state.grid.contains(pos) {
            return Some(CollisionType::Wall);
        }

        // The tail still counts: it only moves out after the head moves in
        if state.snake.contains(pos) {
            return Some(CollisionType::SelfCollision);
        }

        None
    }

    fn end_game(&self, state: &mut GameState, outcome: TickOutcome) {
        state.phase = Phase::GameOver;
        if !self.config.restart_enabled {
            state.running = false;
        }

        info!(?outcome, score = state.score, ticks = state.ticks, "game over");
    }
}
