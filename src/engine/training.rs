//! Training sessions and single-seat booking.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::error::{SchedulerError, SchedulerResult};
use crate::models::{
    ActivityAction, CancellationStatus, Capability, Outcome, Profile, Role, Training,
    TrainingCancellationRequest, TrainingDraft, WaitlistEntry, WaitlistStatus, monday_of,
};
use crate::store::Tables;

use super::waitlist::promote_next;
use super::{Scheduler, logged};

/// What happened when a student dropped a training.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BookingCancellation {
    /// The seat was released; the next waitlisted profile may have been invited.
    Released {
        /// The newly invited entry, if any.
        invited: Option<WaitlistEntry>,
    },
    /// The training is staffed and scheduled, so staff must approve.
    Requested {
        /// The pending request.
        request: TrainingCancellationRequest,
    },
}

fn validate_draft(tables: &Tables, draft: &TrainingDraft) -> SchedulerResult<()> {
    if draft.name.trim().is_empty() {
        return Err(SchedulerError::field("name", "Name is required."));
    }
    if draft.machine.trim().is_empty() {
        return Err(SchedulerError::field("machine", "Machine is required."));
    }
    if !(1..=3).contains(&draft.level) {
        return Err(SchedulerError::field("level", "Level must be between 1 and 3."));
    }
    if let Some(staff_id) = draft.staff {
        let leader = tables.profile(staff_id)?;
        if !matches!(leader.role, Role::Staff | Role::TeamMember) {
            return Err(SchedulerError::field(
                "staff",
                "Select a staff member or team member to lead this training.",
            ));
        }
    }
    Ok(())
}

fn build(draft: TrainingDraft) -> Training {
    Training {
        id: Uuid::new_v4(),
        name: draft.name.trim().to_string(),
        machine: draft.machine.trim().to_string(),
        level: draft.level,
        certification_type: draft
            .certification_type
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty()),
        time: draft.time,
        staff: draft.staff,
        student: None,
        capacity: 1,
    }
}

/// Returns the rejection for a booking attempt, in priority order.
fn signup_rejection(
    tables: &Tables,
    training: &Training,
    profile: &Profile,
    now: chrono::NaiveDateTime,
) -> Option<SchedulerError> {
    if training.level > 1 {
        let required = training.level - 1;
        if !profile.holds_certification(training.certification_type.as_deref(), required) {
            return Some(SchedulerError::validation(format!(
                "You need {} before joining a level {} training.",
                training.prerequisite_label(required),
                training.level
            )));
        }
    }
    if training.is_full() {
        return Some(SchedulerError::conflict(
            "That training already has a student assigned.",
        ));
    }
    if training.time.is_some_and(|time| time < now) {
        return Some(SchedulerError::validation(
            "That training has already taken place.",
        ));
    }
    if tables
        .invited_entry(training.id)
        .is_some_and(|entry| entry.profile_id != profile.id)
    {
        return Some(SchedulerError::conflict(
            "This training is reserved for another student who was invited from the waitlist.",
        ));
    }
    let unpublished = training
        .week_start()
        .and_then(|week_start| tables.week(week_start))
        .is_some_and(|week| !week.is_published());
    if unpublished {
        return Some(SchedulerError::validation(
            "This schedule is not published yet. Please check back after staff publishes it.",
        ));
    }
    None
}

impl Scheduler {
    /// Creates a training, scheduled or in the open signup pool.
    pub fn create_training(&self, actor: Uuid, draft: TrainingDraft) -> SchedulerResult<Outcome<Training>> {
        let result = self.store.transaction(|tables| {
            tables
                .profile(actor)?
                .require(Capability::EditSchedule, "create trainings")?;
            validate_draft(tables, &draft)?;
            let training = build(draft);
            tables.upsert_training(training.clone());
            Ok(Outcome::new(training).success("Training created."))
        });
        if let Ok(outcome) = &result {
            info!(training_id = %outcome.value.id, level = outcome.value.level, "Training created");
            self.record(
                actor,
                ActivityAction::Training,
                format!("Created training {}", outcome.value.name),
            );
        }
        logged("create_training", actor, result)
    }

    /// Schedules a training inside the week containing `week_start`.
    pub fn add_training_to_week(
        &self,
        actor: Uuid,
        week_start: NaiveDate,
        draft: TrainingDraft,
    ) -> SchedulerResult<Outcome<Training>> {
        let now = self.now();
        let week_start = monday_of(week_start);
        let result = self.store.transaction(|tables| {
            tables
                .profile(actor)?
                .require(Capability::EditSchedule, "schedule trainings")?;
            let Some(time) = draft.time else {
                return Err(SchedulerError::field(
                    "time",
                    "Time is required to schedule a training.",
                ));
            };
            if time.date() < week_start || time.date() >= week_start + Duration::days(7) {
                return Err(SchedulerError::field(
                    "time",
                    "Training must be scheduled within the selected week.",
                ));
            }
            validate_draft(tables, &draft)?;
            tables.ensure_week(week_start, Some(actor), now);
            let training = build(draft);
            tables.upsert_training(training.clone());
            Ok(Outcome::new(training).success("Training added to the schedule."))
        });
        if let Ok(outcome) = &result {
            info!(
                training_id = %outcome.value.id,
                week_start = %week_start,
                "Training scheduled"
            );
        }
        logged("add_training_to_week", actor, result)
    }

    /// Deletes a training scheduled in the week containing `week_start`,
    /// along with its waitlist and cancellation requests.
    pub fn remove_training_from_week(
        &self,
        actor: Uuid,
        week_start: NaiveDate,
        training_id: Uuid,
    ) -> SchedulerResult<Outcome<Training>> {
        let week_start = monday_of(week_start);
        let result = self.store.transaction(|tables| {
            tables
                .profile(actor)?
                .require(Capability::EditSchedule, "remove trainings")?;
            if tables.training(training_id)?.week_start() != Some(week_start) {
                return Err(SchedulerError::not_found("Training", training_id));
            }
            let training = tables.remove_training(training_id)?;
            Ok(Outcome::new(training).success("Training removed from this week."))
        });
        if let Ok(outcome) = &result {
            info!(training_id = %outcome.value.id, week_start = %week_start, "Training removed");
        }
        logged("remove_training_from_week", actor, result)
    }

    /// Books the actor into a training's seat.
    ///
    /// Checked in order: prerequisite, vacancy, not in the past, no other
    /// profile holding the invitation, and the training's week (if one
    /// exists) being published. An invitation held by the actor is marked
    /// accepted.
    pub fn sign_up(&self, actor: Uuid, training_id: Uuid) -> SchedulerResult<Outcome<Training>> {
        let now = self.now();
        let result = self.store.transaction(|tables| {
            let profile = tables.profile(actor)?.clone();
            profile.require(Capability::BookTraining, "book trainings")?;
            let training = tables.training(training_id)?.clone();
            if let Some(rejection) = signup_rejection(tables, &training, &profile, now) {
                return Err(rejection);
            }
            let held = tables
                .invited_entry(training_id)
                .filter(|entry| entry.profile_id == actor)
                .map(|entry| entry.id);
            if let Some(entry_id) = held {
                tables.set_waitlist_status(entry_id, WaitlistStatus::Accepted)?;
            }
            let training = tables.training_mut(training_id)?;
            training.student = Some(actor);
            let training = training.clone();
            let text = format!("You are signed up for {}.", training.name);
            Ok(Outcome::new(training).success(text))
        });
        if let Ok(outcome) = &result {
            info!(training_id = %training_id, student = %actor, "Training booked");
            self.record(
                actor,
                ActivityAction::Booking,
                format!("Signed up for {}", outcome.value.name),
            );
        }
        logged("sign_up", actor, result)
    }

    /// Drops the actor's booking.
    ///
    /// A future training with a staff leader needs staff approval, so a
    /// pending request is filed instead. Otherwise the seat is released and
    /// the next waitlisted profile is invited.
    pub fn cancel_training(
        &self,
        actor: Uuid,
        training_id: Uuid,
        reason: Option<String>,
    ) -> SchedulerResult<Outcome<BookingCancellation>> {
        let now = self.now();
        let result = self.store.transaction(|tables| {
            tables.profile(actor)?;
            let training = tables.training(training_id)?.clone();
            if training.student != Some(actor) {
                return Err(SchedulerError::permission(
                    "You can only cancel trainings you are signed up for.",
                ));
            }
            if let Some(time) = training.time {
                if time < now {
                    return Err(SchedulerError::validation(
                        "You cannot cancel a training that has already occurred.",
                    ));
                }
                if training.staff.is_some() {
                    let request = TrainingCancellationRequest {
                        id: Uuid::new_v4(),
                        training_id,
                        requester: actor,
                        reason: reason
                            .as_deref()
                            .map(str::trim)
                            .filter(|r| !r.is_empty())
                            .map(str::to_string),
                        status: CancellationStatus::Pending,
                        reviewed_by: None,
                        reviewed_at: None,
                        created_at: now,
                    };
                    tables.insert_cancellation(request.clone())?;
                    return Ok(Outcome::new(BookingCancellation::Requested { request }).success(
                        "Cancellation request submitted. Staff will review it in the schedule release tab.",
                    ));
                }
            }

            tables.training_mut(training_id)?.student = None;
            let invited = promote_next(tables, training_id)?;
            let mut outcome = Outcome::new(BookingCancellation::Released {
                invited: invited.clone(),
            })
            .success(format!("Canceled your reservation for {}.", training.name));
            if let Some(entry) = &invited {
                let name = tables.profile(entry.profile_id)?.full_name();
                outcome = outcome.info(format!(
                    "{} has been invited to join {}.",
                    name, training.name
                ));
            }
            Ok(outcome)
        });
        if let Ok(outcome) = &result {
            match &outcome.value {
                BookingCancellation::Released { invited } => {
                    info!(
                        training_id = %training_id,
                        invited = ?invited.as_ref().map(|e| e.profile_id),
                        "Training seat released"
                    );
                    self.record(
                        actor,
                        ActivityAction::Booking,
                        format!("Canceled booking for training {}", training_id),
                    );
                }
                BookingCancellation::Requested { request } => {
                    info!(
                        training_id = %training_id,
                        request_id = %request.id,
                        "Training cancellation requested"
                    );
                }
            }
        }
        logged("cancel_training", actor, result)
    }
}
