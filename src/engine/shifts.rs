//! Shift scheduler.
//!
//! Every save runs the full rule set in [`validate_shift`], in this order:
//! title, time order, week bounds, semester, holiday, open hours, assignee
//! role, weekly-hour cap. Swap approval reuses the same function.

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use tracing::info;
use uuid::Uuid;

use crate::error::{SchedulerError, SchedulerResult};
use crate::models::{
    ActivityAction, Capability, Outcome, Role, Shift, ShiftDraft, minutes_to_hours, monday_of,
};
use crate::policy;
use crate::store::Tables;

use super::{Scheduler, logged};

const EDIT: &str = "edit schedules";

/// Checks a candidate shift against every scheduling rule.
///
/// The weekly-hour cap sums the assignee's other shifts in the week,
/// skipping the candidate's own id so an edit is not counted twice.
/// Profiles with [`Capability::BypassHourCap`] are exempt.
pub fn validate_shift(tables: &Tables, shift: &Shift, weekly_hour_cap: Decimal) -> SchedulerResult<()> {
    if shift.title.trim().is_empty() {
        return Err(SchedulerError::field("title", "Title is required."));
    }
    if shift.end <= shift.start {
        return Err(SchedulerError::field("end", "End must be after start time."));
    }
    let week_end = shift.week_start + Duration::days(7);
    if shift.start.date() < shift.week_start || shift.end.date() >= week_end {
        return Err(SchedulerError::field(
            "start",
            "Shift must be scheduled within the selected week.",
        ));
    }

    let start_semester = policy::active_semester_for(tables.semesters(), shift.start.date());
    let end_semester = policy::active_semester_for(tables.semesters(), shift.end.date());
    let semester = match (start_semester, end_semester) {
        (Some(start), Some(end)) if start.id == end.id => start,
        _ => {
            return Err(SchedulerError::field(
                "start",
                "Shift must start and end within an active semester.",
            ));
        }
    };
    if policy::is_holiday(semester, shift.start.date()) {
        return Err(SchedulerError::field(
            "start",
            format!(
                "{} is marked as a holiday for {}.",
                shift.start.date(),
                semester.name
            ),
        ));
    }
    if !policy::within_open_hours(Some(semester), shift.start, shift.end) {
        return Err(SchedulerError::field(
            "start",
            format!("This shift is outside the open hours for {}.", semester.name),
        ));
    }

    let Some(assignee_id) = shift.assigned_to else {
        return Ok(());
    };
    let assignee = tables.profile(assignee_id)?;
    if !matches!(assignee.role, Role::Student | Role::TeamMember | Role::Staff) {
        return Err(SchedulerError::field("assigned_to", "Select a valid assignee."));
    }
    if assignee.can(Capability::BypassHourCap) {
        return Ok(());
    }
    let existing = tables.assigned_minutes(assignee_id, shift.week_start, Some(shift.id));
    let projected = minutes_to_hours(existing + shift.duration_minutes());
    if projected > weekly_hour_cap {
        return Err(SchedulerError::field(
            "assigned_to",
            format!(
                "{} would exceed {} hours for this week.",
                assignee.full_name(),
                weekly_hour_cap.normalize()
            ),
        ));
    }
    Ok(())
}

fn apply_draft(shift: &mut Shift, draft: ShiftDraft) {
    shift.title = draft.title.trim().to_string();
    shift.location = draft.location;
    shift.start = draft.start;
    shift.end = draft.end;
    shift.min_staffing = draft.min_staffing;
    shift.assigned_to = draft.assigned_to;
    shift.required_certifications = draft.required_certifications;
    shift.notes = draft.notes;
}

impl Scheduler {
    /// Adds a shift to the week containing `week_start`.
    pub fn create_shift(
        &self,
        actor: Uuid,
        week_start: NaiveDate,
        draft: ShiftDraft,
    ) -> SchedulerResult<Outcome<Shift>> {
        let now = self.now();
        let cap = self.settings.weekly_hour_cap;
        let result = self.store.transaction(|tables| {
            tables.profile(actor)?.require(Capability::EditSchedule, EDIT)?;
            let week_start = tables.ensure_week(week_start, Some(actor), now).week_start;
            let mut shift = Shift {
                id: Uuid::new_v4(),
                week_start,
                title: String::new(),
                location: draft.location,
                start: draft.start,
                end: draft.end,
                min_staffing: draft.min_staffing,
                assigned_to: None,
                created_by: Some(actor),
                required_certifications: Default::default(),
                notes: None,
            };
            apply_draft(&mut shift, draft);
            validate_shift(tables, &shift, cap)?;
            tables.upsert_shift(shift.clone());
            Ok(Outcome::new(shift).success("Shift added."))
        });
        if let Ok(outcome) = &result {
            let shift = &outcome.value;
            info!(
                shift_id = %shift.id,
                week_start = %shift.week_start,
                location = shift.location.key(),
                hours = %shift.duration_hours(),
                "Shift created"
            );
            self.record(
                actor,
                ActivityAction::Schedule,
                format!("Added shift {} on {}", shift.title, shift.start.date()),
            );
        }
        logged("create_shift", actor, result)
    }

    /// Replaces the fields of a shift in the week containing `week_start`.
    pub fn update_shift(
        &self,
        actor: Uuid,
        week_start: NaiveDate,
        shift_id: Uuid,
        draft: ShiftDraft,
    ) -> SchedulerResult<Outcome<Shift>> {
        let cap = self.settings.weekly_hour_cap;
        let week_start = monday_of(week_start);
        let result = self.store.transaction(|tables| {
            tables.profile(actor)?.require(Capability::EditSchedule, EDIT)?;
            let mut shift = tables.shift_in_week(shift_id, week_start)?.clone();
            apply_draft(&mut shift, draft);
            shift.created_by = shift.created_by.or(Some(actor));
            validate_shift(tables, &shift, cap)?;
            tables.upsert_shift(shift.clone());
            Ok(Outcome::new(shift).success("Shift updated."))
        });
        if let Ok(outcome) = &result {
            info!(shift_id = %outcome.value.id, week_start = %week_start, "Shift updated");
        }
        logged("update_shift", actor, result)
    }

    /// Deletes a shift and its swap requests.
    ///
    /// Shifts in a published week cannot be deleted until it is unpublished.
    pub fn delete_shift(
        &self,
        actor: Uuid,
        week_start: NaiveDate,
        shift_id: Uuid,
    ) -> SchedulerResult<Outcome<Shift>> {
        let week_start = monday_of(week_start);
        let result = self.store.transaction(|tables| {
            tables.profile(actor)?.require(Capability::EditSchedule, EDIT)?;
            tables.shift_in_week(shift_id, week_start)?;
            if tables.existing_week(week_start)?.is_published() {
                return Err(SchedulerError::validation(
                    "Published schedules cannot have shifts deleted. Please unpublish or approve a change first.",
                ));
            }
            let shift = tables.remove_shift(shift_id)?;
            Ok(Outcome::new(shift).success("Shift deleted."))
        });
        if let Ok(outcome) = &result {
            info!(shift_id = %outcome.value.id, week_start = %week_start, "Shift deleted");
        }
        logged("delete_shift", actor, result)
    }
}
