//! In-memory persistence.
//!
//! [`MemoryStore`] wraps the [`Tables`] behind a lock. Reads take the read
//! lock; writes go through [`MemoryStore::transaction`], which stages every
//! change on a copy and swaps it in only when the closure succeeds.

mod tables;

pub use tables::Tables;

use std::sync::{Arc, RwLock};

use crate::error::{SchedulerError, SchedulerResult};

/// Shared, transactional in-memory store.
///
/// # Example
///
/// ```
/// use makerspace_scheduler::error::SchedulerError;
/// use makerspace_scheduler::models::{Profile, Role};
/// use makerspace_scheduler::store::MemoryStore;
///
/// let store = MemoryStore::new();
/// let profile = Profile::new("alee", Role::TeamMember);
/// let id = profile.id;
///
/// // A failing transaction leaves nothing behind.
/// let result: Result<(), _> = store.transaction(|tables| {
///     tables.upsert_profile(profile.clone());
///     Err(SchedulerError::conflict("rolled back"))
/// });
/// assert!(result.is_err());
/// assert!(store.read(|tables| tables.profile(id).map(|_| ())).is_err());
///
/// store.transaction(|tables| {
///     tables.upsert_profile(profile);
///     Ok(())
/// }).unwrap();
/// assert!(store.read(|tables| tables.profile(id).map(|_| ())).is_ok());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    data: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `f` against a consistent snapshot.
    pub fn read<T>(&self, f: impl FnOnce(&Tables) -> SchedulerResult<T>) -> SchedulerResult<T> {
        let tables = self.data.read().map_err(|e| SchedulerError::Storage {
            message: e.to_string(),
        })?;
        f(&tables)
    }

    /// Runs `f` as one atomic unit.
    ///
    /// Writers are serialised by the write lock. Changes become visible only
    /// if `f` returns `Ok`.
    pub fn transaction<T>(
        &self,
        f: impl FnOnce(&mut Tables) -> SchedulerResult<T>,
    ) -> SchedulerResult<T> {
        let mut tables = self.data.write().map_err(|e| SchedulerError::Storage {
            message: e.to_string(),
        })?;
        let mut staged = tables.clone();
        let value = f(&mut staged)?;
        *tables = staged;
        Ok(value)
    }
}
