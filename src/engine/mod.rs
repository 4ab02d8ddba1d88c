//! The scheduling and booking engine.
//!
//! [`Scheduler`] is the single entry point. Every mutating operation takes
//! the acting profile's id, runs inside one store transaction and returns an
//! [`Outcome`] with the user-facing notices. Operations are grouped by area:
//!
//! - [`weeks`]: draft/published lifecycle
//! - [`calendar`]: semesters, open hours and holidays
//! - [`availability`]: member availability and semester replication
//! - [`shifts`]: shift creation, editing and the weekly-hour cap
//! - [`swaps`]: swap and give-up requests
//! - [`training`]: training sessions and booking
//! - [`waitlist`]: FIFO waitlist and invitations
//! - [`cancellation`]: staff review of training cancellations
//! - [`certifications`]: granting and revoking certifications
//! - [`reservations`]: room reservations
//! - [`queries`]: visibility-gated read models

pub mod availability;
pub mod calendar;
pub mod cancellation;
pub mod certifications;
pub mod queries;
pub mod reservations;
pub mod shifts;
pub mod swaps;
pub mod training;
pub mod waitlist;
pub mod weeks;

pub use certifications::{CertificationGrant, CertificationSpec};
pub use training::BookingCancellation;

use std::sync::Arc;

use chrono::NaiveDateTime;
use tracing::{info, warn};
use uuid::Uuid;

use crate::activity::{ActivitySink, MemoryActivityLog, record_best_effort};
use crate::clock::{Clock, SystemClock};
use crate::config::{SchedulerConfig, SchedulerSettings};
use crate::error::SchedulerResult;
use crate::models::{ActivityAction, ActivityEntry, Outcome, Profile, Semester};
use crate::store::MemoryStore;

/// Coordinates schedule weeks, shifts, swaps and training bookings.
///
/// # Example
///
/// ```
/// use makerspace_scheduler::engine::Scheduler;
/// use makerspace_scheduler::models::{Profile, Role};
/// use chrono::NaiveDate;
///
/// let scheduler = Scheduler::new();
/// let staff = scheduler.register_profile(Profile::new("boss", Role::Staff)).unwrap();
///
/// let monday = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
/// let outcome = scheduler.publish_week(staff.id, monday).unwrap();
/// assert!(outcome.value.is_published());
/// assert_eq!(outcome.notices[0].text, "Schedule published to the team.");
/// ```
#[derive(Clone)]
pub struct Scheduler {
    store: MemoryStore,
    settings: SchedulerSettings,
    clock: Arc<dyn Clock>,
    activity: Arc<dyn ActivitySink>,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl Scheduler {
    /// Creates an engine with default settings, the system clock and an
    /// in-memory activity log.
    pub fn new() -> Self {
        Self::with_settings(SchedulerSettings::default())
    }

    /// Creates an engine with the given settings.
    pub fn with_settings(settings: SchedulerSettings) -> Self {
        Self {
            store: MemoryStore::new(),
            settings,
            clock: Arc::new(SystemClock),
            activity: Arc::new(MemoryActivityLog::new()),
        }
    }

    /// Creates an engine from loaded configuration, seeding its calendar.
    pub fn from_config(config: &SchedulerConfig) -> SchedulerResult<Self> {
        let scheduler = Self::with_settings(config.settings().clone());
        for semester in config.semesters() {
            scheduler.seed_semester(semester)?;
        }
        info!(
            weekly_hour_cap = %config.settings().weekly_hour_cap,
            semesters = config.calendar().semesters.len(),
            "Scheduler initialised from configuration"
        );
        Ok(scheduler)
    }

    /// Replaces the time source.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Replaces the activity sink.
    pub fn with_activity_sink(mut self, sink: impl ActivitySink + 'static) -> Self {
        self.activity = Arc::new(sink);
        self
    }

    /// Returns the engine settings.
    pub fn settings(&self) -> &SchedulerSettings {
        &self.settings
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &MemoryStore {
        &self.store
    }

    /// Returns the current local time.
    pub fn now(&self) -> NaiveDateTime {
        self.clock.now()
    }

    /// Adds or replaces a profile supplied by the identity provider.
    pub fn register_profile(&self, profile: Profile) -> SchedulerResult<Profile> {
        self.store.transaction(|tables| {
            tables.upsert_profile(profile.clone());
            Ok(profile)
        })
    }

    /// Looks up a profile.
    pub fn profile(&self, id: Uuid) -> SchedulerResult<Profile> {
        self.store.read(|tables| tables.profile(id).cloned())
    }

    /// Adds a semester without a permission check, for startup seeding.
    ///
    /// An active semester deactivates the others.
    pub fn seed_semester(&self, semester: Semester) -> SchedulerResult<Semester> {
        self.store.transaction(|tables| {
            tables.insert_semester(semester.clone());
            Ok(semester)
        })
    }

    /// Appends to the activity log; failures are logged and ignored.
    pub(crate) fn record(&self, actor: Uuid, action: ActivityAction, description: String) {
        record_best_effort(
            self.activity.as_ref(),
            ActivityEntry {
                actor,
                action,
                description,
                created_at: self.now(),
            },
        );
    }
}

/// Logs a rejected operation and passes the result through.
pub(crate) fn logged<T>(
    operation: &'static str,
    actor: Uuid,
    result: SchedulerResult<Outcome<T>>,
) -> SchedulerResult<Outcome<T>> {
    if let Err(error) = &result {
        warn!(operation, actor = %actor, error = %error, "Operation rejected");
    }
    result
}
