use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::info;

use super::{
    config::GameConfig,
    engine::{GameEngine, TickOutcome},
    error::GameResult,
    state::{GameState, Snapshot},
};

struct Inner {
    state: GameState,
    engine: GameEngine,
}

/// Single owner of the game state shared by the update task and the frame
/// loop.
///
/// Every operation takes the one lock for its whole duration, so a reader
/// either sees the state before a tick or after it, never halfway.
#[derive(Clone)]
pub struct SharedGame {
    inner: Arc<Mutex<Inner>>,
}

impl SharedGame {
    pub fn new(config: GameConfig) -> Self {
        let mut engine = GameEngine::new(config);
        let state = engine.reset();
        Self::with_state(engine, state)
    }

    /// Wrap an existing state, e.g. a hand-built position
    pub fn with_state(engine: GameEngine, state: GameState) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner { state, engine })),
        }
    }

    // The engine never leaves a half-applied tick behind, so a poisoned lock
    // still guards a usable state
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> Snapshot {
        self.lock().state.snapshot()
    }

    /// Run one engine tick as a single critical section
    pub fn apply_tick(&self) -> GameResult<TickOutcome> {
        let mut guard = self.lock();
        let Inner { state, engine } = &mut *guard;
        engine.tick(state)
    }

    /// Mutate the state under the lock
    pub fn update<T>(&self, f: impl FnOnce(&mut GameState) -> T) -> T {
        f(&mut self.lock().state)
    }

    /// Start a new game in place
    pub fn restart(&self) {
        let mut guard = self.lock();
        let Inner { state, engine } = &mut *guard;
        engine.restart(state);
        info!(food = %state.food, "game restarted");
    }

    /// Ask both loops to wind down
    pub fn stop(&self) {
        self.lock().state.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.lock().state.running
    }
}
