use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stdout, stdout};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval, timeout};
use tracing::{error, info, warn};

use crate::game::{GameConfig, GameError, GameResult, SharedGame, spawn_update_engine};
use crate::input::{InputController, InputHandler, InputResponse};
use crate::render::Renderer;

/// How a session ended
#[derive(Debug)]
pub struct GameSummary {
    pub score: u32,
    pub ticks: u64,
    /// Set when the update task stopped on a tick fault
    pub fault: Option<GameError>,
}

/// Interactive play: the update task advances the game on its own clock while
/// this loop reads keys and draws frames.
pub struct HumanMode {
    config: GameConfig,
    game: SharedGame,
    renderer: Renderer,
    input_handler: InputHandler,
    controller: InputController,
}

impl HumanMode {
    pub fn new(config: GameConfig) -> Self {
        Self {
            game: SharedGame::new(config.clone()),
            renderer: Renderer::new(&config),
            input_handler: InputHandler::new(),
            controller: InputController::new(&config),
            config,
        }
    }

    pub fn game(&self) -> &SharedGame {
        &self.game
    }

    pub async fn run(&mut self) -> Result<GameSummary> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut terminal = or_restore(enter_screen(), abandon_terminal)?;

        info!(
            tick_rate = self.config.tick_rate,
            frame_rate = self.config.frame_rate,
            "game started"
        );
        let engine = spawn_update_engine(self.game.clone(), self.config.tick_period());

        let result = self.run_frame_loop(&mut terminal).await;

        // The frame loop may have bailed out on an error with the game still live
        self.game.stop();
        let fault = join_update_engine(engine, self.config.shutdown_timeout).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;
        result?;

        let snapshot = self.game.snapshot();
        info!(score = snapshot.score, ticks = snapshot.ticks, "game finished");

        Ok(GameSummary {
            score: snapshot.score,
            ticks: snapshot.ticks,
            fault,
        })
    }

    async fn run_frame_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        let mut frame_timer = interval(self.config.frame_period());
        frame_timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

        while self.game.is_running() {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => {
                            self.handle_event(event);
                        }
                        Some(Err(err)) => {
                            return Err(err).context("Failed to read terminal event");
                        }
                        None => self.game.stop(),
                    }
                }

                // Render frame
                _ = frame_timer.tick() => {
                    let snapshot = self.game.snapshot();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &snapshot);
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.game.stop();
                }
            }
        }

        Ok(())
    }

    fn handle_event(&self, event: Event) -> InputResponse {
        let Event::Key(key) = event else {
            return InputResponse::Ignored;
        };

        // Only process key press events, not release
        if key.kind != KeyEventKind::Press {
            return InputResponse::Ignored;
        }

        let action = self.input_handler.handle_key_event(key);
        self.controller.apply(&self.game, action)
    }

    fn cleanup_terminal(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

fn enter_screen() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
    terminal.hide_cursor().context("Failed to hide cursor")?;
    terminal.clear().context("Failed to clear terminal")?;
    Ok(terminal)
}

/// Undo raw mode and the alternate screen after a failed setup
fn abandon_terminal() {
    if let Err(err) = execute!(stdout(), LeaveAlternateScreen) {
        warn!(error = %err, "failed to leave alternate screen");
    }
    if let Err(err) = disable_raw_mode() {
        warn!(error = %err, "failed to disable raw mode");
    }
}

/// Run `restore` when a setup step failed
fn or_restore<T>(result: Result<T>, restore: impl FnOnce()) -> Result<T> {
    if result.is_err() {
        restore();
    }
    result
}

/// Wait for the update task to wind down, giving up after `limit`.
///
/// Returns the tick fault the task stopped on, if any.
pub async fn join_update_engine(
    mut handle: JoinHandle<GameResult<()>>,
    limit: Duration,
) -> Option<GameError> {
    match timeout(limit, &mut handle).await {
        Ok(Ok(Ok(()))) => None,
        Ok(Ok(Err(fault))) => Some(fault),
        Ok(Err(err)) => {
            error!(error = %err, "update task did not complete");
            None
        }
        Err(_) => {
            warn!(?limit, "update task still running at shutdown, aborting it");
            handle.abort();
            None
        }
    }
}
