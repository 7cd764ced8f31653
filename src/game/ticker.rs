//! Fixed-rate update task.
//!
//! The update engine runs on its own tokio task, paced by an interval that
//! knows nothing about how fast frames are drawn. Tests drive it with tokio's
//! paused clock instead of real time.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, error};

use super::{
    engine::TickOutcome,
    error::{GameError, GameResult},
    shared::SharedGame,
};

/// Spawn the update loop on the current runtime
pub fn spawn_update_engine(game: SharedGame, period: Duration) -> JoinHandle<GameResult<()>> {
    tokio::spawn(run_update_loop(game, period))
}

/// Tick `game` every `period` until it stops running.
///
/// A failing or panicking tick clears `running` and ends the loop with the
/// fault, leaving the rest of the process alive to shut down normally.
pub async fn run_update_loop(game: SharedGame, period: Duration) -> GameResult<()> {
    let ticker = game.clone();
    drive(game, period, move || ticker.apply_tick()).await
}

async fn drive<F>(game: SharedGame, period: Duration, mut tick: F) -> GameResult<()>
where
    F: FnMut() -> GameResult<TickOutcome>,
{
    let mut timer = interval(period);
    // A late tick is dropped rather than replayed in a burst
    timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        timer.tick().await;
        if !game.is_running() {
            debug!("update loop stopping");
            return Ok(());
        }

        let fault = match panic::catch_unwind(AssertUnwindSafe(&mut tick)) {
            Ok(Ok(_)) => continue,
            Ok(Err(err)) => err,
            Err(payload) => GameError::TickPanicked(panic_message(payload.as_ref())),
        };

        error!(error = %fault, "update tick failed, stopping game");
        game.stop();
        return Err(fault);
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
