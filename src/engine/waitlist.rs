//! FIFO training waitlist.
//!
//! A vacancy invites the earliest `waiting` entry; it is not auto-booked.
//! At most one entry per training holds `invited` at a time, and promotion
//! does nothing while an invitation is outstanding.

use tracing::info;
use uuid::Uuid;

use crate::error::{SchedulerError, SchedulerResult};
use crate::models::{
    ActivityAction, Capability, InvitationResponse, Outcome, WaitlistEntry, WaitlistStatus,
};
use crate::store::Tables;

use super::{Scheduler, logged};

/// Invites the earliest waiting entry for a training.
///
/// Returns `None` when nobody is waiting or an invitation is already out.
pub(crate) fn promote_next(tables: &mut Tables, training_id: Uuid) -> SchedulerResult<Option<WaitlistEntry>> {
    if tables.invited_entry(training_id).is_some() {
        return Ok(None);
    }
    let Some(next) = tables.next_waiting(training_id).cloned() else {
        return Ok(None);
    };
    tables.set_waitlist_status(next.id, WaitlistStatus::Invited)?;
    Ok(Some(WaitlistEntry {
        status: WaitlistStatus::Invited,
        ..next
    }))
}

/// Builds the "X has been invited" notice text for a promoted entry.
fn invited_notice(tables: &Tables, entry: &WaitlistEntry, training_name: &str) -> SchedulerResult<String> {
    let name = tables.profile(entry.profile_id)?.full_name();
    Ok(format!("{} has been invited to join {}.", name, training_name))
}

impl Scheduler {
    /// Puts the actor in line for a training.
    ///
    /// Joining twice is a no-op with an info notice.
    pub fn join_waitlist(&self, actor: Uuid, training_id: Uuid) -> SchedulerResult<Outcome<WaitlistEntry>> {
        let now = self.now();
        let result = self.store.transaction(|tables| {
            tables
                .profile(actor)?
                .require(Capability::BookTraining, "join training waitlists")?;
            let training = tables.training(training_id)?.clone();
            if training.student == Some(actor) {
                return Err(SchedulerError::validation(
                    "You are already signed up for this training.",
                ));
            }
            if let Some(existing) = tables.waitlist_entry_for(training_id, actor) {
                return Ok(Outcome::new(existing.clone())
                    .info("You are already on the waitlist for this training."));
            }
            let entry = tables.insert_waitlist_entry(training_id, actor, now)?;
            Ok(Outcome::new(entry).success(format!(
                "You have been added to the waitlist for {}.",
                training.name
            )))
        });
        if let Ok(outcome) = &result {
            info!(training_id = %training_id, profile_id = %actor, "Joined waitlist");
            self.record(
                actor,
                ActivityAction::Booking,
                format!("Joined the waitlist for training {}", outcome.value.training_id),
            );
        }
        logged("join_waitlist", actor, result)
    }

    /// Removes the actor from a training's line.
    ///
    /// Leaving while holding the invitation passes it to the next in line.
    pub fn leave_waitlist(&self, actor: Uuid, training_id: Uuid) -> SchedulerResult<Outcome<Option<WaitlistEntry>>> {
        let result = self.store.transaction(|tables| {
            tables.profile(actor)?;
            let training = tables.training(training_id)?.clone();
            let Some(entry) = tables.waitlist_entry_for(training_id, actor).cloned() else {
                return Ok(Outcome::new(None).info("You are not on the waitlist for this training."));
            };
            tables.remove_waitlist_entry(entry.id)?;
            let mut outcome = Outcome::new(Some(entry.clone())).success(format!(
                "You have left the waitlist for {}.",
                training.name
            ));
            if entry.status == WaitlistStatus::Invited {
                if let Some(next) = promote_next(tables, training_id)? {
                    outcome = outcome.info(invited_notice(tables, &next, &training.name)?);
                }
            }
            Ok(outcome)
        });
        if let Ok(Outcome { value: Some(_), .. }) = &result {
            info!(training_id = %training_id, profile_id = %actor, "Left waitlist");
        }
        logged("leave_waitlist", actor, result)
    }

    /// Answers an invitation held by the actor.
    ///
    /// Accepting a seat that was filled some other way fails with a
    /// conflict and leaves the entry `invited`.
    pub fn respond_to_invitation(
        &self,
        actor: Uuid,
        entry_id: Uuid,
        response: InvitationResponse,
    ) -> SchedulerResult<Outcome<WaitlistEntry>> {
        let result = self.store.transaction(|tables| {
            let entry = tables.waitlist_entry(entry_id)?.clone();
            if entry.profile_id != actor {
                return Err(SchedulerError::not_found("Waitlist entry", entry_id));
            }
            if entry.status != WaitlistStatus::Invited {
                return Err(SchedulerError::validation("This invitation is no longer available."));
            }
            let training_name = tables.training(entry.training_id)?.name.clone();
            match response {
                InvitationResponse::Accept => {
                    let training = tables.training_mut(entry.training_id)?;
                    if training.is_full() {
                        return Err(SchedulerError::conflict("Sorry, the training is already full."));
                    }
                    training.student = Some(actor);
                    tables.set_waitlist_status(entry_id, WaitlistStatus::Accepted)?;
                    let entry = WaitlistEntry {
                        status: WaitlistStatus::Accepted,
                        ..entry
                    };
                    Ok(Outcome::new(entry)
                        .success(format!("You are now booked for {}.", training_name)))
                }
                InvitationResponse::Decline => {
                    tables.set_waitlist_status(entry_id, WaitlistStatus::Declined)?;
                    let mut outcome = Outcome::new(WaitlistEntry {
                        status: WaitlistStatus::Declined,
                        ..entry.clone()
                    })
                    .info(format!("You declined the invitation for {}.", training_name));
                    if let Some(next) = promote_next(tables, entry.training_id)? {
                        outcome = outcome.info(invited_notice(tables, &next, &training_name)?);
                    }
                    Ok(outcome)
                }
            }
        });
        if let Ok(outcome) = &result {
            info!(
                entry_id = %entry_id,
                training_id = %outcome.value.training_id,
                status = ?outcome.value.status,
                "Invitation answered"
            );
            self.record(
                actor,
                ActivityAction::Booking,
                format!("Answered waitlist invitation {:?}", response),
            );
        }
        logged("respond_to_invitation", actor, result)
    }

    /// Invites the next waiting profile for a vacant training.
    pub fn promote_next_waitlisted(
        &self,
        actor: Uuid,
        training_id: Uuid,
    ) -> SchedulerResult<Outcome<Option<WaitlistEntry>>> {
        let result = self.store.transaction(|tables| {
            tables
                .profile(actor)?
                .require(Capability::ModerateCancellations, "manage training waitlists")?;
            let training = tables.training(training_id)?.clone();
            if training.is_full() {
                return Ok(Outcome::new(None).info("This training has no open seat."));
            }
            match promote_next(tables, training_id)? {
                Some(next) => {
                    let text = invited_notice(tables, &next, &training.name)?;
                    Ok(Outcome::new(Some(next)).info(text))
                }
                None => Ok(Outcome::new(None).info("Nobody new was invited.")),
            }
        });
        logged("promote_next_waitlisted", actor, result)
    }
}
