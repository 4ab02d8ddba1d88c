//! Room reservation requests and their review.

use tracing::info;
use uuid::Uuid;

use crate::error::{SchedulerError, SchedulerResult};
use crate::models::{
    ActivityAction, Capability, Outcome, ReservationDraft, ReservationStatus, RoomReservation,
};

use super::{Scheduler, logged};

impl Scheduler {
    /// Files a pending reservation. Pending and approved reservations both
    /// block overlapping requests for the same room.
    pub fn request_reservation(
        &self,
        actor: Uuid,
        draft: ReservationDraft,
    ) -> SchedulerResult<Outcome<RoomReservation>> {
        let now = self.now();
        let result = self.store.transaction(|tables| {
            tables.profile(actor)?;
            if draft.end_time <= draft.start_time {
                return Err(SchedulerError::field(
                    "end_time",
                    "End time must be after the start time.",
                ));
            }
            if draft.start_time.date() != draft.end_time.date() {
                return Err(SchedulerError::field(
                    "end_time",
                    "Reservations must start and end on the same day.",
                ));
            }
            let affiliation = draft.affiliation.trim();
            if affiliation.is_empty() {
                return Err(SchedulerError::field("affiliation", "Affiliation is required."));
            }
            if tables
                .overlapping_reservation(draft.room, draft.start_time, draft.end_time, None)
                .is_some()
            {
                return Err(SchedulerError::field(
                    "start_time",
                    "This room is already reserved during the selected time.",
                ));
            }
            let reservation = RoomReservation {
                id: Uuid::new_v4(),
                requester: actor,
                room: draft.room,
                start_time: draft.start_time,
                end_time: draft.end_time,
                affiliation: affiliation.to_string(),
                is_exclusive_request: draft.is_exclusive_request,
                status: ReservationStatus::Pending,
                reviewed_by: None,
                reviewed_at: None,
                created_at: now,
            };
            tables.upsert_reservation(reservation.clone());
            Ok(Outcome::new(reservation).success("Reservation request submitted."))
        });
        if let Ok(outcome) = &result {
            info!(
                reservation_id = %outcome.value.id,
                room = %outcome.value.room,
                start = %outcome.value.start_time,
                "Reservation requested"
            );
            self.record(
                actor,
                ActivityAction::Reservation,
                format!(
                    "Requested {} on {}",
                    outcome.value.room.label(),
                    outcome.value.start_time.date()
                ),
            );
        }
        logged("request_reservation", actor, result)
    }

    /// Sets a reservation's review status.
    ///
    /// Approval re-checks for overlaps with other non-denied reservations.
    pub fn review_reservation(
        &self,
        actor: Uuid,
        reservation_id: Uuid,
        status: ReservationStatus,
    ) -> SchedulerResult<Outcome<RoomReservation>> {
        let now = self.now();
        let result = self.store.transaction(|tables| {
            tables
                .profile(actor)?
                .require(Capability::ReviewReservations, "review room reservations")?;
            let mut reservation = tables.reservation(reservation_id)?.clone();
            if status == ReservationStatus::Pending {
                return Err(SchedulerError::field(
                    "status",
                    "Choose approve or deny.",
                ));
            }
            if reservation.status == status {
                return Ok(Outcome::new(reservation).info("This reservation is already up to date."));
            }
            if status == ReservationStatus::Approved
                && tables
                    .overlapping_reservation(
                        reservation.room,
                        reservation.start_time,
                        reservation.end_time,
                        Some(reservation.id),
                    )
                    .is_some()
            {
                return Err(SchedulerError::conflict(
                    "This room is already reserved during the selected time.",
                ));
            }
            reservation.status = status;
            reservation.reviewed_by = Some(actor);
            reservation.reviewed_at = Some(now);
            tables.upsert_reservation(reservation.clone());
            let text = match status {
                ReservationStatus::Approved => "Reservation approved.",
                _ => "Reservation denied.",
            };
            Ok(Outcome::new(reservation).success(text))
        });
        if let Ok(outcome) = &result {
            info!(
                reservation_id = %reservation_id,
                status = ?outcome.value.status,
                "Reservation reviewed"
            );
            self.record(
                actor,
                ActivityAction::Reservation,
                format!("Marked reservation {} as {:?}", reservation_id, outcome.value.status),
            );
        }
        logged("review_reservation", actor, result)
    }
}
