//! Best-effort activity log.
//!
//! Engine operations record an [`ActivityEntry`] after they commit. A sink
//! failure is logged and swallowed; it never undoes or fails the operation.

use std::sync::{Arc, RwLock};

use thiserror::Error;
use tracing::warn;

use crate::models::ActivityEntry;

/// Failure to persist an activity entry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("activity log unavailable: {0}")]
pub struct ActivityError(pub String);

/// Destination for activity entries.
pub trait ActivitySink: Send + Sync {
    /// Persists one entry.
    fn record(&self, entry: &ActivityEntry) -> Result<(), ActivityError>;
}

/// In-memory activity log.
#[derive(Debug, Clone, Default)]
pub struct MemoryActivityLog {
    entries: Arc<RwLock<Vec<ActivityEntry>>>,
}

impl MemoryActivityLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every entry, oldest first.
    pub fn entries(&self) -> Vec<ActivityEntry> {
        match self.entries.read() {
            Ok(entries) => entries.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl ActivitySink for MemoryActivityLog {
    fn record(&self, entry: &ActivityEntry) -> Result<(), ActivityError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| ActivityError(e.to_string()))?;
        entries.push(entry.clone());
        Ok(())
    }
}

/// Records `entry`, logging instead of failing when the sink is unavailable.
pub(crate) fn record_best_effort(sink: &dyn ActivitySink, entry: ActivityEntry) {
    if let Err(error) = sink.record(&entry) {
        warn!(
            actor = %entry.actor,
            action = ?entry.action,
            error = %error,
            "Failed to record activity"
        );
    }
}
