use tracing::{info, trace};

use super::handler::KeyAction;
use crate::game::{Direction, GameConfig, Phase, SharedGame};

/// Result of applying one key action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputResponse {
    Applied,
    /// Not valid right now (reversal, wrong phase, feature disabled)
    Ignored,
    Quit,
}

/// Applies key actions to the shared game, enforcing which ones the current
/// rules and phase allow.
#[derive(Debug, Clone, Copy)]
pub struct InputController {
    pause_enabled: bool,
    restart_enabled: bool,
}

impl InputController {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            pause_enabled: config.pause_enabled,
            restart_enabled: config.restart_enabled,
        }
    }

    pub fn apply(&self, game: &SharedGame, action: KeyAction) -> InputResponse {
        match action {
            KeyAction::Move(direction) => self.on_direction_key(game, direction),
            KeyAction::TogglePause => self.on_pause_key(game),
            KeyAction::Restart => self.on_restart_key(game),
            KeyAction::Quit => {
                info!("quit requested");
                game.stop();
                InputResponse::Quit
            }
            KeyAction::None => InputResponse::Ignored,
        }
    }

    /// Queue `requested` unless it reverses the committed direction
    pub fn on_direction_key(&self, game: &SharedGame, requested: Direction) -> InputResponse {
        if game.update(|state| state.request_direction(requested)) {
            InputResponse::Applied
        } else {
            trace!(?requested, "direction change rejected");
            InputResponse::Ignored
        }
    }

    fn on_pause_key(&self, game: &SharedGame) -> InputResponse {
        if !self.pause_enabled {
            return InputResponse::Ignored;
        }

        match game.update(|state| state.toggle_pause().then_some(state.phase)) {
            Some(phase) => {
                info!(paused = phase == Phase::Paused, "pause toggled");
                InputResponse::Applied
            }
            None => InputResponse::Ignored,
        }
    }

    fn on_restart_key(&self, game: &SharedGame) -> InputResponse {
        if !self.restart_enabled {
            return InputResponse::Ignored;
        }

        // Checked and applied as two lock scopes; only this loop restarts
        if !game.update(|state| state.is_game_over()) {
            trace!("restart ignored while game is in progress");
            return InputResponse::Ignored;
        }

        game.restart();
        InputResponse::Applied
    }
}
