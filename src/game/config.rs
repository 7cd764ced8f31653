use std::time::Duration;

use super::error::{GameError, GameResult};
use super::grid::Grid;

/// Most cells a board may have along either side and still fit a terminal
pub const MAX_GRID_SIDE: i32 = 1000;

/// Configuration for the game.
///
/// The two presets reproduce the two rule sets the game ships with:
/// [`GameConfig::classic`] ends the process on the first crash, while
/// [`GameConfig::arcade`] adds pause, restart and a cycling snake color.
#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    /// Width of the playing area, in the same units as `cell_size`
    pub width: u32,
    /// Height of the playing area
    pub height: u32,
    /// Side of one square cell
    pub cell_size: u32,
    /// Update engine ticks per second
    pub tick_rate: u32,
    /// Frames drawn per second
    pub frame_rate: u32,
    /// Points awarded per food eaten
    pub score_increment: u32,
    /// Segments in a freshly spawned snake
    pub initial_length: usize,
    pub pause_enabled: bool,
    /// Whether a finished game can be restarted in place; when false, game
    /// over stops the process
    pub restart_enabled: bool,
    /// Number of snake colors cycled through as food is eaten
    pub palette_size: usize,
    /// Wait for Enter after the final score is printed
    pub prompt_on_exit: bool,
    /// Upper bound on waiting for the update task at shutdown
    pub shutdown_timeout: Duration,
    /// Fixed seed for food placement
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::arcade()
    }
}

impl GameConfig {
    /// Single-life rules: +1 per food, 15 Hz, no pause
    pub fn classic() -> Self {
        Self {
            width: 600,
            height: 400,
            cell_size: 20,
            tick_rate: 15,
            frame_rate: 15,
            score_increment: 1,
            initial_length: 1,
            pause_enabled: false,
            restart_enabled: false,
            palette_size: 1,
            prompt_on_exit: false,
            shutdown_timeout: Duration::from_secs(1),
            seed: None,
        }
    }

    /// Pause/restart rules: +10 per food, 8 Hz updates, 60 Hz rendering
    pub fn arcade() -> Self {
        Self {
            tick_rate: 8,
            frame_rate: 60,
            score_increment: 10,
            initial_length: 3,
            pause_enabled: true,
            restart_enabled: true,
            palette_size: 9,
            prompt_on_exit: true,
            ..Self::classic()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self {
            width: 200,
            height: 200,
            ..Self::arcade()
        }
    }

    pub fn grid(&self) -> Grid {
        Grid::new(self.width, self.height, self.cell_size)
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_secs(1) / self.tick_rate.max(1)
    }

    pub fn frame_period(&self) -> Duration {
        Duration::from_secs(1) / self.frame_rate.max(1)
    }

    /// Check that a game can actually be started with these settings
    pub fn validate(&self) -> GameResult<()> {
        let invalid = |msg: String| Err(GameError::InvalidConfig(msg));

        if self.cell_size == 0 {
            return invalid("cell size must be positive".into());
        }
        if self.width > i32::MAX as u32 || self.height > i32::MAX as u32 {
            return invalid(format!("{}x{} area is too large", self.width, self.height));
        }
        if self.tick_rate == 0 || self.frame_rate == 0 {
            return invalid("tick and frame rates must be positive".into());
        }
        if self.score_increment == 0 {
            return invalid("score increment must be positive".into());
        }
        if self.palette_size == 0 {
            return invalid("palette needs at least one color".into());
        }

        let grid = self.grid();
        if grid.cell_count() == 0 {
            return invalid(format!(
                "{}x{} area holds no {}-sized cells",
                self.width, self.height, self.cell_size
            ));
        }
        if grid.columns() > MAX_GRID_SIDE || grid.rows() > MAX_GRID_SIDE {
            return invalid(format!(
                "{}x{} cells exceeds the {MAX_GRID_SIDE} cell limit per side",
                grid.columns(),
                grid.rows()
            ));
        }

        // The snake starts at the center and trails off to the left
        let room = grid.center().x / grid.cell_size() + 1;
        if self.initial_length == 0 || self.initial_length > room as usize {
            return invalid(format!(
                "initial length {} does not fit in {} columns left of center",
                self.initial_length, room
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config, GameConfig::arcade());
        assert_eq!(config.width, 600);
        assert_eq!(config.height, 400);
        assert_eq!(config.initial_length, 3);
        assert_eq!(config.score_increment, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_classic_config() {
        let config = GameConfig::classic();
        assert_eq!(config.initial_length, 1);
        assert_eq!(config.score_increment, 1);
        assert!(!config.pause_enabled);
        assert!(!config.restart_enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_periods() {
        let config = GameConfig::arcade();
        assert_eq!(config.tick_period(), Duration::from_millis(125));
        assert_eq!(config.frame_period(), Duration::from_secs(1) / 60);
    }

    #[test]
    fn test_rejects_zero_cell_size() {
        let config = GameConfig {
            cell_size: 0,
            ..GameConfig::default()
        };
        assert!(matches!(config.validate(), Err(GameError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_grid_without_cells() {
        let config = GameConfig {
            width: 10,
            ..GameConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_oversized_snake() {
        let config = GameConfig {
            width: 100,
            initial_length: 4,
            ..GameConfig::default()
        };
        // center column is 2, so at most 3 segments fit
        assert!(config.validate().is_err());

        let config = GameConfig {
            initial_length: 3,
            ..config
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_grid_too_large_to_draw() {
        let config = GameConfig {
            width: 40000,
            height: 40,
            cell_size: 1,
            ..GameConfig::arcade()
        };
        assert!(matches!(config.validate(), Err(GameError::InvalidConfig(_))));

        let config = GameConfig {
            width: 1000,
            height: 1000,
            cell_size: 1,
            ..GameConfig::arcade()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_rates() {
        let config = GameConfig {
            tick_rate: 0,
            ..GameConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
