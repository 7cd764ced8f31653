use std::collections::{HashSet, VecDeque};
use std::fmt;

use super::action::Direction;
use super::grid::Grid;

/// A cell origin on the game grid, in the same units as the cell size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta, or `None` if a coordinate overflows
    pub fn checked_moved_by(&self, dx: i32, dy: i32) -> Option<Self> {
        Some(Self {
            x: self.x.checked_add(dx)?,
            y: self.y.checked_add(dy)?,
        })
    }

    /// Move position one cell in a direction
    pub fn checked_step(&self, direction: Direction, cell_size: i32) -> Option<Self> {
        let (dx, dy) = direction.delta();
        self.checked_moved_by(dx.checked_mul(cell_size)?, dy.checked_mul(cell_size)?)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

/// The snake in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at the front
    body: VecDeque<Position>,
    /// Committed direction of movement
    pub direction: Direction,
}

impl Snake {
    /// Create a snake of `length` segments trailing behind `head`
    pub fn new(head: Position, direction: Direction, length: usize, cell_size: i32) -> Self {
        let (dx, dy) = direction.opposite().delta();
        let body = (0..length.max(1) as i32)
            .map(|i| Position::new(head.x + dx * cell_size * i, head.y + dy * cell_size * i))
            .collect();

        Self { body, direction }
    }

    /// Build a snake from explicit segments, head first
    pub fn from_segments<I>(segments: I, direction: Direction) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Position>,
    {
        Self {
            body: segments.into_iter().map(Into::into).collect(),
            direction,
        }
    }

    /// Head position, `None` only for a degenerate empty snake
    pub fn head(&self) -> Option<Position> {
        self.body.front().copied()
    }

    pub fn tail(&self) -> Option<Position> {
        self.body.back().copied()
    }

    /// All segments, head first
    pub fn segments(&self) -> impl ExactSizeIterator<Item = &Position> + '_ {
        self.body.iter()
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// The set of positions covered by the body
    pub fn occupancy(&self) -> HashSet<Position> {
        self.body.iter().copied().collect()
    }

    pub(crate) fn push_head(&mut self, pos: Position) {
        self.body.push_front(pos);
    }

    pub(crate) fn pop_tail(&mut self) -> Option<Position> {
        self.body.pop_back()
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Lifecycle phase of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Playing,
    Paused,
    GameOver,
}

/// Type of collision that ended a game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    /// Snake left the grid
    Wall,
    /// Snake ran into its own body
    SelfCollision,
}

/// Complete game state
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub grid: Grid,
    pub snake: Snake,
    /// Direction requested by input, committed at the start of the next tick
    pub next_direction: Direction,
    pub food: Position,
    pub score: u32,
    pub ticks: u64,
    pub phase: Phase,
    /// Cleared to stop both the update task and the frame loop
    pub running: bool,
    /// Cosmetic palette index, advanced whenever food is eaten
    pub color_index: usize,
}

impl GameState {
    pub fn new(grid: Grid, snake: Snake, food: Position) -> Self {
        let next_direction = snake.direction;

        Self {
            grid,
            snake,
            next_direction,
            food,
            score: 0,
            ticks: 0,
            phase: Phase::Playing,
            running: true,
            color_index: 0,
        }
    }

    pub fn direction(&self) -> Direction {
        self.snake.direction
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    pub fn is_paused(&self) -> bool {
        self.phase == Phase::Paused
    }

    /// Queue a direction change for the next tick.
    ///
    /// Rejected (returns false) while not playing, or when `requested` would
    /// reverse the committed direction.
    pub fn request_direction(&mut self, requested: Direction) -> bool {
        if self.phase != Phase::Playing || self.snake.direction.is_opposite(requested) {
            return false;
        }

        self.next_direction = requested;
        true
    }

    /// Flip between playing and paused. Has no effect once the game is over.
    pub fn toggle_pause(&mut self) -> bool {
        self.phase = match self.phase {
            Phase::Playing => Phase::Paused,
            Phase::Paused => Phase::Playing,
            Phase::GameOver => return false,
        };
        true
    }

    /// Read-only copy for the renderer
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            grid: self.grid,
            snake: self.snake.segments().copied().collect(),
            direction: self.snake.direction,
            food: self.food,
            score: self.score,
            ticks: self.ticks,
            phase: self.phase,
            running: self.running,
            color_index: self.color_index,
        }
    }
}

/// Consistent view of a game taken under the lock, once per frame
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub grid: Grid,
    /// Segments, head first
    pub snake: Vec<Position>,
    pub direction: Direction,
    pub food: Position,
    pub score: u32,
    pub ticks: u64,
    pub phase: Phase,
    pub running: bool,
    pub color_index: usize,
}

impl Snapshot {
    pub fn head(&self) -> Option<Position> {
        self.snake.first().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> Grid {
        Grid::new(600, 400, 20)
    }

    #[test]
    fn test_position_step() {
        let pos = Position::new(100, 100);
        assert_eq!(pos.checked_step(Direction::Right, 20), Some(Position::new(120, 100)));
        assert_eq!(pos.checked_step(Direction::Left, 20), Some(Position::new(80, 100)));
        assert_eq!(pos.checked_step(Direction::Up, 20), Some(Position::new(100, 80)));
        assert_eq!(pos.checked_step(Direction::Down, 20), Some(Position::new(100, 120)));
        assert_eq!(Position::new(i32::MAX, 0).checked_step(Direction::Right, 20), None);
    }

    #[test]
    fn test_snake_creation() {
        let snake = Snake::new(Position::new(300, 200), Direction::Right, 3, 20);
        let segments: Vec<_> = snake.segments().copied().collect();
        assert_eq!(
            segments,
            vec![
                Position::new(300, 200),
                Position::new(280, 200),
                Position::new(260, 200)
            ]
        );
        assert_eq!(snake.head(), Some(Position::new(300, 200)));
        assert_eq!(snake.tail(), Some(Position::new(260, 200)));
    }

    #[test]
    fn test_snake_never_empty_on_creation() {
        let snake = Snake::new(Position::new(300, 200), Direction::Right, 0, 20);
        assert_eq!(snake.len(), 1);
    }

    #[test]
    fn test_occupancy() {
        let snake = Snake::from_segments([(0, 0), (20, 0)], Direction::Left);
        let occupied = snake.occupancy();
        assert_eq!(occupied.len(), 2);
        assert!(occupied.contains(&Position::new(20, 0)));
    }

    #[test]
    fn test_reversal_rejected() {
        let snake = Snake::new(Position::new(300, 200), Direction::Right, 3, 20);
        let mut state = GameState::new(grid(), snake, Position::new(0, 0));

        assert!(!state.request_direction(Direction::Left));
        assert_eq!(state.next_direction, Direction::Right);

        assert!(state.request_direction(Direction::Up));
        assert_eq!(state.next_direction, Direction::Up);
    }

    #[test]
    fn test_reversal_checked_against_committed_direction() {
        let snake = Snake::new(Position::new(300, 200), Direction::Right, 3, 20);
        let mut state = GameState::new(grid(), snake, Position::new(0, 0));

        // Up is pending but Right is still committed, so Left stays illegal
        assert!(state.request_direction(Direction::Up));
        assert!(!state.request_direction(Direction::Left));
        assert_eq!(state.next_direction, Direction::Up);
    }

    #[test]
    fn test_direction_ignored_unless_playing() {
        let snake = Snake::new(Position::new(300, 200), Direction::Right, 3, 20);
        let mut state = GameState::new(grid(), snake, Position::new(0, 0));

        state.phase = Phase::Paused;
        assert!(!state.request_direction(Direction::Up));

        state.phase = Phase::GameOver;
        assert!(!state.request_direction(Direction::Up));
        assert_eq!(state.next_direction, Direction::Right);
    }

    #[test]
    fn test_toggle_pause() {
        let snake = Snake::new(Position::new(300, 200), Direction::Right, 1, 20);
        let mut state = GameState::new(grid(), snake, Position::new(0, 0));

        assert!(state.toggle_pause());
        assert!(state.is_paused());
        assert!(state.toggle_pause());
        assert_eq!(state.phase, Phase::Playing);

        state.phase = Phase::GameOver;
        assert!(!state.toggle_pause());
        assert!(state.is_game_over());
    }

    #[test]
    fn test_snapshot_copies_state() {
        let snake = Snake::new(Position::new(300, 200), Direction::Right, 2, 20);
        let mut state = GameState::new(grid(), snake, Position::new(40, 40));
        state.score = 30;
        state.color_index = 3;

        let snapshot = state.snapshot();
        assert_eq!(snapshot.head(), Some(Position::new(300, 200)));
        assert_eq!(snapshot.snake.len(), 2);
        assert_eq!(snapshot.food, Position::new(40, 40));
        assert_eq!(snapshot.score, 30);
        assert_eq!(snapshot.color_index, 3);
        assert!(snapshot.running);
    }
}
