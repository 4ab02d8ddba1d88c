//! Application state for the scheduling API.

use std::sync::Arc;

use crate::engine::Scheduler;

/// Shared application state.
///
/// Holds the engine every handler calls into.
#[derive(Clone)]
pub struct AppState {
    scheduler: Arc<Scheduler>,
}

impl AppState {
    /// Creates a new application state around an engine.
    pub fn new(scheduler: Scheduler) -> Self {
        Self {
            scheduler: Arc::new(scheduler),
        }
    }

    /// Returns the engine.
    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }
}
