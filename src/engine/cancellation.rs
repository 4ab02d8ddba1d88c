//! Staff review of training cancellation requests.

use tracing::info;
use uuid::Uuid;

use crate::error::{SchedulerError, SchedulerResult};
use crate::models::{
    ActivityAction, CancellationStatus, Capability, Outcome, TrainingCancellationRequest,
};

use super::waitlist::promote_next;
use super::{Scheduler, logged};

impl Scheduler {
    /// Approves a pending request, releasing the seat if the requester
    /// still holds it and inviting the next waitlisted profile.
    pub fn approve_cancellation(
        &self,
        actor: Uuid,
        request_id: Uuid,
    ) -> SchedulerResult<Outcome<TrainingCancellationRequest>> {
        let now = self.now();
        let result = self.store.transaction(|tables| {
            tables
                .profile(actor)?
                .require(Capability::ModerateCancellations, "review training cancellations")?;
            let request = tables.cancellation(request_id)?.clone();
            if request.status != CancellationStatus::Pending {
                return Err(SchedulerError::validation(
                    "This cancellation request has already been reviewed.",
                ));
            }
            let training = tables.training(request.training_id)?.clone();
            let reviewed =
                tables.review_cancellation(request_id, CancellationStatus::Approved, actor, now)?;

            let mut outcome = Outcome::new(reviewed).success(format!(
                "Approved cancellation for {}. Student unassigned.",
                training.name
            ));
            if training.student == Some(request.requester) {
                tables.training_mut(training.id)?.student = None;
                if let Some(next) = promote_next(tables, training.id)? {
                    let name = tables.profile(next.profile_id)?.full_name();
                    outcome = outcome.info(format!(
                        "{} has been invited to join {}.",
                        name, training.name
                    ));
                }
            }
            Ok(outcome)
        });
        if let Ok(outcome) = &result {
            info!(
                request_id = %request_id,
                training_id = %outcome.value.training_id,
                "Training cancellation approved"
            );
            self.record(
                actor,
                ActivityAction::Booking,
                format!("Approved cancellation request {}", request_id),
            );
        }
        logged("approve_cancellation", actor, result)
    }

    /// Denies a pending request; the booking stands.
    pub fn deny_cancellation(
        &self,
        actor: Uuid,
        request_id: Uuid,
    ) -> SchedulerResult<Outcome<TrainingCancellationRequest>> {
        let now = self.now();
        let result = self.store.transaction(|tables| {
            tables
                .profile(actor)?
                .require(Capability::ModerateCancellations, "review training cancellations")?;
            if tables.cancellation(request_id)?.status != CancellationStatus::Pending {
                return Err(SchedulerError::validation(
                    "This cancellation request has already been reviewed.",
                ));
            }
            let reviewed =
                tables.review_cancellation(request_id, CancellationStatus::Denied, actor, now)?;
            Ok(Outcome::new(reviewed).info("Cancellation request denied."))
        });
        if result.is_ok() {
            info!(request_id = %request_id, "Training cancellation denied");
        }
        logged("deny_cancellation", actor, result)
    }
}
