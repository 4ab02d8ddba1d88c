//! Time source for the engine.
//!
//! Every timestamp is a naive local wall-clock time. Operations that compare
//! against "now" (past-training checks, `published_at`, `created_at`) read it
//! through a [`Clock`] so tests can pin it.

use chrono::{Local, NaiveDateTime};
use std::sync::{Arc, RwLock};

/// Source of the current local time.
pub trait Clock: Send + Sync {
    /// Returns the current local wall-clock time.
    fn now(&self) -> NaiveDateTime;
}

/// The host's local clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock that returns a settable instant.
///
/// # Example
///
/// ```
/// use makerspace_scheduler::clock::{Clock, FixedClock};
/// use chrono::NaiveDate;
///
/// let noon = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap().and_hms_opt(12, 0, 0).unwrap();
/// let clock = FixedClock::new(noon);
/// assert_eq!(clock.now(), noon);
///
/// clock.advance(chrono::Duration::hours(1));
/// assert_eq!(clock.now(), noon + chrono::Duration::hours(1));
/// ```
#[derive(Debug, Clone)]
pub struct FixedClock {
    instant: Arc<RwLock<NaiveDateTime>>,
}

impl FixedClock {
    /// Creates a clock pinned at `instant`.
    pub fn new(instant: NaiveDateTime) -> Self {
        Self {
            instant: Arc::new(RwLock::new(instant)),
        }
    }

    /// Moves the clock to `instant`.
    pub fn set(&self, instant: NaiveDateTime) {
        if let Ok(mut guard) = self.instant.write() {
            *guard = instant;
        }
    }

    /// Moves the clock forward.
    pub fn advance(&self, by: chrono::Duration) {
        if let Ok(mut guard) = self.instant.write() {
            *guard += by;
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        match self.instant.read() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}
