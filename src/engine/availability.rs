//! Availability registry.
//!
//! Members submit windows they can work inside a week. Holiday and
//! open-hour checks use the semester active on the window's start date.

use chrono::{Duration, NaiveDate};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{SchedulerError, SchedulerResult};
use crate::models::{
    ActivityAction, Availability, AvailabilityDraft, Capability, Outcome, Semester, monday_of,
};
use crate::policy;
use crate::store::Tables;

use super::{Scheduler, logged};

/// Checks a window against its week and the governing semester.
fn validate_window(tables: &Tables, week_start: NaiveDate, draft: &AvailabilityDraft) -> SchedulerResult<()> {
    if draft.end <= draft.start {
        return Err(SchedulerError::field("end", "End must be after start time."));
    }
    let week_end = (week_start + Duration::days(7)).and_hms_opt(0, 0, 0);
    let inside_week = draft.start.date() >= week_start && week_end.is_some_and(|end| draft.end <= end);
    if !inside_week {
        return Err(SchedulerError::field(
            "start",
            "Availability must fall within the selected week.",
        ));
    }
    if let Some(semester) = policy::active_semester_for(tables.semesters(), draft.start.date()) {
        if policy::is_holiday(semester, draft.start.date()) {
            return Err(SchedulerError::validation(format!(
                "{} is marked as a holiday for {}.",
                draft.start.date(),
                semester.name
            )));
        }
        if !policy::within_open_hours(Some(semester), draft.start, draft.end) {
            return Err(SchedulerError::validation(format!(
                "This slot is outside the open hours for {}.",
                semester.name
            )));
        }
    }
    Ok(())
}

/// Loads a slot owned by `actor` in the given week.
fn owned_slot(tables: &Tables, actor: Uuid, week_start: NaiveDate, id: Uuid) -> SchedulerResult<Availability> {
    let slot = tables.availability(id)?;
    if slot.profile_id != actor || slot.week_start != week_start {
        return Err(SchedulerError::not_found("Availability", id));
    }
    Ok(slot.clone())
}

impl Scheduler {
    /// Records an availability window in the week containing `week_start`.
    pub fn submit_availability(
        &self,
        actor: Uuid,
        week_start: NaiveDate,
        draft: AvailabilityDraft,
    ) -> SchedulerResult<Outcome<Availability>> {
        let now = self.now();
        let week_start = monday_of(week_start);
        let result = self.store.transaction(|tables| {
            tables
                .profile(actor)?
                .require(Capability::SubmitAvailability, "submit availability")?;
            validate_window(tables, week_start, &draft)?;
            tables.ensure_week(week_start, Some(actor), now);
            let slot = Availability {
                id: Uuid::new_v4(),
                profile_id: actor,
                week_start,
                start: draft.start,
                end: draft.end,
                note: draft.note.clone(),
                skills: draft.skills.clone(),
                created_at: now,
            };
            tables.upsert_availability(slot.clone());
            Ok(Outcome::new(slot).success("Availability saved for this week."))
        });
        if let Ok(outcome) = &result {
            info!(
                profile_id = %actor,
                week_start = %week_start,
                availability_id = %outcome.value.id,
                "Availability submitted"
            );
        }
        logged("submit_availability", actor, result)
    }

    /// Replaces the window of one of the actor's slots.
    pub fn update_availability(
        &self,
        actor: Uuid,
        week_start: NaiveDate,
        availability_id: Uuid,
        draft: AvailabilityDraft,
    ) -> SchedulerResult<Outcome<Availability>> {
        let week_start = monday_of(week_start);
        let result = self.store.transaction(|tables| {
            tables
                .profile(actor)?
                .require(Capability::SubmitAvailability, "submit availability")?;
            let mut slot = owned_slot(tables, actor, week_start, availability_id)?;
            validate_window(tables, week_start, &draft)?;
            slot.start = draft.start;
            slot.end = draft.end;
            slot.note = draft.note;
            slot.skills = draft.skills;
            tables.upsert_availability(slot.clone());
            Ok(Outcome::new(slot).success("Availability updated."))
        });
        logged("update_availability", actor, result)
    }

    /// Deletes one of the actor's slots.
    pub fn remove_availability(
        &self,
        actor: Uuid,
        week_start: NaiveDate,
        availability_id: Uuid,
    ) -> SchedulerResult<Outcome<Availability>> {
        let week_start = monday_of(week_start);
        let result = self.store.transaction(|tables| {
            tables.profile(actor)?;
            owned_slot(tables, actor, week_start, availability_id)?;
            let slot = tables.remove_availability(availability_id)?;
            Ok(Outcome::new(slot).success("Availability removed."))
        });
        logged("remove_availability", actor, result)
    }

    /// Copies a slot into every later week of the semester governing it.
    ///
    /// Weeks whose copy lands on a holiday, outside open hours, outside the
    /// semester, or on an identical existing slot are skipped. Each week is
    /// committed on its own; a failure stops the run and keeps the weeks
    /// already written. Returns the number of weeks created.
    pub fn replicate_across_semester(
        &self,
        actor: Uuid,
        availability_id: Uuid,
    ) -> SchedulerResult<Outcome<usize>> {
        let result = self.replicate(actor, availability_id);
        logged("replicate_across_semester", actor, result)
    }

    fn replicate(&self, actor: Uuid, availability_id: Uuid) -> SchedulerResult<Outcome<usize>> {
        let (source, semester): (Availability, Semester) = self.store.read(|tables| {
            let source = tables.availability(availability_id)?.clone();
            let profile = tables.profile(actor)?;
            if source.profile_id != actor && !profile.can(Capability::EditSchedule) {
                return Err(SchedulerError::not_found("Availability", availability_id));
            }
            let semester = policy::active_semester_for(tables.semesters(), source.start.date())
                .cloned()
                .ok_or_else(|| {
                    SchedulerError::validation(
                        "Availability saved for this week, but no active semester is set to copy across.",
                    )
                })?;
            Ok((source, semester))
        })?;

        let mut created = 0usize;
        let mut stopped = None;
        let mut cursor = source.week_start + Duration::days(7);
        while cursor <= semester.end_date {
            let offset = cursor - source.week_start;
            let start = source.start + offset;
            let end = source.end + offset;
            let skip = !semester.contains_date(start.date())
                || policy::is_holiday(&semester, start.date())
                || !policy::within_open_hours(Some(&semester), start, end);
            if !skip {
                let now = self.now();
                let week = cursor;
                let written = self.store.transaction(|tables| {
                    if tables.has_availability(source.profile_id, week, start, end) {
                        return Ok(false);
                    }
                    tables.ensure_week(week, None, now);
                    tables.upsert_availability(source.shifted(offset, week, now));
                    Ok(true)
                });
                match written {
                    Ok(true) => created += 1,
                    Ok(false) => {}
                    Err(error) => {
                        warn!(
                            availability_id = %availability_id,
                            week_start = %week,
                            error = %error,
                            "Replication stopped"
                        );
                        stopped = Some(error);
                        break;
                    }
                }
            }
            cursor += Duration::days(7);
        }

        info!(
            availability_id = %availability_id,
            semester = %semester.name,
            weeks_created = created,
            "Availability replicated"
        );
        self.record(
            actor,
            ActivityAction::Schedule,
            format!("Copied availability to {} week(s) in {}", created, semester.name),
        );

        let mut outcome = Outcome::new(created);
        outcome = if created > 0 {
            outcome.success(format!(
                "Availability saved and applied to {} future week(s) in {}.",
                created, semester.name
            ))
        } else {
            outcome.success(
                "Availability saved for this week. No future weeks were updated (holidays, closed hours, or duplicate slots skipped).",
            )
        };
        if let Some(error) = stopped {
            outcome = outcome.with(
                crate::models::Severity::Warning,
                format!("Copying stopped early: {}", error.message()),
            );
        }
        Ok(outcome)
    }
}
