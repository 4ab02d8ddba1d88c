//! Swap coordinator.
//!
//! Approval re-runs the shift rules against the new assignee inside the
//! same transaction. A failed check leaves both the shift and the request
//! untouched and reports the violated rule as a conflict.

use chrono::NaiveDate;
use tracing::info;
use uuid::Uuid;

use crate::error::{SchedulerError, SchedulerResult};
use crate::models::{
    ActivityAction, Capability, Outcome, Role, ShiftSwapRequest, SwapProposal, SwapStatus,
    monday_of,
};
use crate::store::Tables;

use super::shifts::validate_shift;
use super::{Scheduler, logged};

fn pending_swap(tables: &Tables, swap_id: Uuid) -> SchedulerResult<ShiftSwapRequest> {
    let swap = tables.swap(swap_id)?;
    if !swap.is_pending() {
        return Err(SchedulerError::validation(format!(
            "This swap request has already been {}.",
            swap.status
        )));
    }
    Ok(swap.clone())
}

impl Scheduler {
    /// Asks staff to move one of the actor's shifts to a partner, or to
    /// release it when no partner is named.
    pub fn request_swap(
        &self,
        actor: Uuid,
        week_start: NaiveDate,
        shift_id: Uuid,
        proposal: SwapProposal,
    ) -> SchedulerResult<Outcome<ShiftSwapRequest>> {
        let now = self.now();
        let week_start = monday_of(week_start);
        let result = self.store.transaction(|tables| {
            tables.profile(actor)?;
            let shift = tables.shift_in_week(shift_id, week_start)?;
            if shift.assigned_to != Some(actor) {
                return Err(SchedulerError::permission(
                    "You can only request swaps for your own shifts.",
                ));
            }
            if proposal.is_give_up && proposal.proposed_to.is_some() {
                return Err(SchedulerError::field(
                    "proposed_to",
                    "A give-up request cannot name a teammate.",
                ));
            }
            if let Some(partner_id) = proposal.proposed_to {
                if partner_id == actor {
                    return Err(SchedulerError::field(
                        "proposed_to",
                        "You cannot swap a shift with yourself.",
                    ));
                }
                let partner = tables.profile(partner_id)?;
                if !matches!(partner.role, Role::Student | Role::TeamMember) {
                    return Err(SchedulerError::field("proposed_to", "Select a valid teammate."));
                }
            }
            let swap = ShiftSwapRequest {
                id: Uuid::new_v4(),
                shift_id,
                requester: actor,
                proposed_to: proposal.proposed_to,
                is_give_up: proposal.proposed_to.is_none(),
                reason: proposal.reason.clone(),
                status: SwapStatus::Pending,
                reviewed_by: None,
                reviewed_at: None,
                response_note: None,
                created_at: now,
            };
            tables.upsert_swap(swap.clone());
            Ok(Outcome::new(swap).success("Swap request submitted."))
        });
        if let Ok(outcome) = &result {
            info!(
                swap_id = %outcome.value.id,
                shift_id = %shift_id,
                give_up = outcome.value.is_give_up,
                "Swap requested"
            );
        }
        logged("request_swap", actor, result)
    }

    /// Withdraws the actor's pending swap request.
    pub fn cancel_swap(&self, actor: Uuid, swap_id: Uuid) -> SchedulerResult<Outcome<ShiftSwapRequest>> {
        let result = self.store.transaction(|tables| {
            let swap = tables.swap(swap_id)?;
            if swap.requester != actor {
                return Err(SchedulerError::permission(
                    "You can only cancel your own swap requests.",
                ));
            }
            let mut swap = pending_swap(tables, swap_id)?;
            swap.status = SwapStatus::Cancelled;
            tables.upsert_swap(swap.clone());
            Ok(Outcome::new(swap).success("Swap request cancelled."))
        });
        logged("cancel_swap", actor, result)
    }

    /// Approves a pending swap, reassigning the shift.
    ///
    /// The shift must still belong to the requester, and the new assignment
    /// must pass every shift rule, including the weekly-hour cap.
    pub fn approve_swap(
        &self,
        actor: Uuid,
        swap_id: Uuid,
        note: Option<String>,
    ) -> SchedulerResult<Outcome<ShiftSwapRequest>> {
        let now = self.now();
        let cap = self.settings.weekly_hour_cap;
        let result = self.store.transaction(|tables| {
            tables
                .profile(actor)?
                .require(Capability::ModerateSwaps, "review swap requests")?;
            let mut swap = pending_swap(tables, swap_id)?;
            let mut shift = tables.shift(swap.shift_id)?.clone();
            if shift.assigned_to != Some(swap.requester) {
                return Err(SchedulerError::conflict(
                    "This shift is no longer assigned to the requester.",
                ));
            }
            shift.assigned_to = swap.proposed_to;
            validate_shift(tables, &shift, cap).map_err(SchedulerError::into_conflict)?;
            tables.upsert_shift(shift);

            swap.status = SwapStatus::Approved;
            swap.reviewed_by = Some(actor);
            swap.reviewed_at = Some(now);
            swap.response_note = note;
            tables.upsert_swap(swap.clone());
            Ok(Outcome::new(swap).success("Swap request approved."))
        });
        if let Ok(outcome) = &result {
            let swap = &outcome.value;
            info!(
                swap_id = %swap.id,
                shift_id = %swap.shift_id,
                assigned_to = ?swap.proposed_to,
                "Swap approved"
            );
            self.record(
                actor,
                ActivityAction::Schedule,
                format!("Approved swap request {}", swap.id),
            );
        }
        logged("approve_swap", actor, result)
    }

    /// Denies a pending swap. The shift is not changed.
    pub fn deny_swap(
        &self,
        actor: Uuid,
        swap_id: Uuid,
        note: Option<String>,
    ) -> SchedulerResult<Outcome<ShiftSwapRequest>> {
        let now = self.now();
        let result = self.store.transaction(|tables| {
            tables
                .profile(actor)?
                .require(Capability::ModerateSwaps, "review swap requests")?;
            let mut swap = pending_swap(tables, swap_id)?;
            swap.status = SwapStatus::Denied;
            swap.reviewed_by = Some(actor);
            swap.reviewed_at = Some(now);
            swap.response_note = note;
            tables.upsert_swap(swap.clone());
            Ok(Outcome::new(swap).success("Swap request denied."))
        });
        if let Ok(outcome) = &result {
            info!(swap_id = %outcome.value.id, "Swap denied");
        }
        logged("deny_swap", actor, result)
    }
}

#[cfg(test)]
mod tests {
    use crate::clock::FixedClock;
    use crate::engine::Scheduler;
    use crate::error::SchedulerError;
    use crate::models::{
        Location, OpenHour, Profile, Role, Semester, Shift, ShiftDraft, SwapProposal, SwapStatus,
    };
    use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Weekday};
    use uuid::Uuid;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, day).unwrap()
    }

    fn at(day: u32, h: u32) -> NaiveDateTime {
        d(day).and_hms_opt(h, 0, 0).unwrap()
    }

    struct Fixture {
        scheduler: Scheduler,
        staff: Profile,
        mia: Profile,
        noah: Profile,
    }

    fn setup() -> Fixture {
        let scheduler = Scheduler::new().with_clock(FixedClock::new(at(12, 8)));
        let mut semester = Semester::new(
            "Fall 2026",
            NaiveDate::from_ymd_opt(2026, 8, 24).unwrap(),
            NaiveDate::from_ymd_opt(2026, 12, 18).unwrap(),
            true,
        );
        semester.open_hours = [Weekday::Mon, Weekday::Tue, Weekday::Wed, Weekday::Thu, Weekday::Fri]
            .into_iter()
            .map(|weekday| OpenHour {
                id: Uuid::new_v4(),
                weekday,
                open_time: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
                close_time: NaiveTime::from_hms_opt(20, 0, 0).unwrap(),
            })
            .collect();
        scheduler.seed_semester(semester).unwrap();
        let staff = scheduler.register_profile(Profile::new("boss", Role::Staff)).unwrap();
        let mia = scheduler
            .register_profile(Profile::new("mia", Role::TeamMember).with_name("Mia", "Park"))
            .unwrap();
        let noah = scheduler
            .register_profile(Profile::new("noah", Role::TeamMember).with_name("Noah", "Kim"))
            .unwrap();
        Fixture { scheduler, staff, mia, noah }
    }

    fn shift_for(f: &Fixture, who: Uuid, day: u32, from: u32, to: u32) -> Shift {
        f.scheduler
            .create_shift(
                f.staff.id,
                d(19),
                ShiftDraft::new("Shop floor", Location::ThirdProtoShop, at(day, from), at(day, to))
                    .assigned_to(who),
            )
            .unwrap()
            .value
    }

    /// SW-001: only the assignee can ask.
    #[test]
    fn test_only_assignee_requests() {
        let f = setup();
        let shift = shift_for(&f, f.mia.id, 19, 9, 13);
        let result = f
            .scheduler
            .request_swap(f.noah.id, d(19), shift.id, SwapProposal::to(f.mia.id));
        assert!(matches!(result, Err(SchedulerError::PermissionDenied { .. })));
    }

    /// SW-002: a missing partner turns the request into a give-up.
    #[test]
    fn test_missing_partner_is_give_up() {
        let f = setup();
        let shift = shift_for(&f, f.mia.id, 19, 9, 13);
        let swap = f
            .scheduler
            .request_swap(f.mia.id, d(19), shift.id, SwapProposal::default())
            .unwrap()
            .value;
        assert!(swap.is_give_up);
        assert_eq!(swap.status, SwapStatus::Pending);
    }

    /// SW-003: approval moves the shift.
    #[test]
    fn test_approve_reassigns() {
        let f = setup();
        let shift = shift_for(&f, f.mia.id, 19, 9, 13);
        let swap = f
            .scheduler
            .request_swap(f.mia.id, d(19), shift.id, SwapProposal::to(f.noah.id))
            .unwrap()
            .value;

        let approved = f.scheduler.approve_swap(f.staff.id, swap.id, None).unwrap().value;
        assert_eq!(approved.status, SwapStatus::Approved);
        assert_eq!(approved.reviewed_by, Some(f.staff.id));

        let mine = f.scheduler.my_shifts(f.noah.id, d(19)).unwrap();
        assert!(mine.is_empty(), "draft weeks stay hidden from members");
        let all = f.scheduler.week_shifts(f.staff.id, d(19)).unwrap();
        assert_eq!(all[0].assigned_to, Some(f.noah.id));
    }

    /// SW-004: a give-up leaves the shift open.
    #[test]
    fn test_give_up_clears_assignee() {
        let f = setup();
        let shift = shift_for(&f, f.mia.id, 19, 9, 13);
        let swap = f
            .scheduler
            .request_swap(f.mia.id, d(19), shift.id, SwapProposal::give_up())
            .unwrap()
            .value;
        f.scheduler.approve_swap(f.staff.id, swap.id, None).unwrap();
        let all = f.scheduler.week_shifts(f.staff.id, d(19)).unwrap();
        assert_eq!(all[0].assigned_to, None);
    }

    /// SW-005: the cap is re-checked at approval.
    #[test]
    fn test_approve_rechecks_cap() {
        let f = setup();
        shift_for(&f, f.noah.id, 20, 8, 20);
        shift_for(&f, f.noah.id, 21, 8, 16);
        let shift = shift_for(&f, f.mia.id, 19, 9, 13);
        let swap = f
            .scheduler
            .request_swap(f.mia.id, d(19), shift.id, SwapProposal::to(f.noah.id))
            .unwrap()
            .value;

        let result = f.scheduler.approve_swap(f.staff.id, swap.id, None);
        match result {
            Err(SchedulerError::Conflict { message }) => {
                assert_eq!(message, "Noah Kim would exceed 20 hours for this week.")
            }
            other => panic!("Expected Conflict, got {:?}", other),
        }

        let pending = f.scheduler.pending_swaps(f.staff.id, d(19)).unwrap();
        assert_eq!(pending.len(), 1);
        let all = f.scheduler.week_shifts(f.staff.id, d(19)).unwrap();
        let kept = all.iter().find(|s| s.id == shift.id).unwrap();
        assert_eq!(kept.assigned_to, Some(f.mia.id));
    }

    /// SW-006: cancelled requests cannot be approved.
    #[test]
    fn test_cancel_then_approve_rejected() {
        let f = setup();
        let shift = shift_for(&f, f.mia.id, 19, 9, 13);
        let swap = f
            .scheduler
            .request_swap(f.mia.id, d(19), shift.id, SwapProposal::to(f.noah.id))
            .unwrap()
            .value;

        let other = f.scheduler.cancel_swap(f.noah.id, swap.id);
        assert!(matches!(other, Err(SchedulerError::PermissionDenied { .. })));

        f.scheduler.cancel_swap(f.mia.id, swap.id).unwrap();
        let result = f.scheduler.approve_swap(f.staff.id, swap.id, None);
        assert!(matches!(result, Err(SchedulerError::Validation { .. })));
    }

    /// SW-007: denial leaves the shift alone.
    #[test]
    fn test_deny_keeps_shift() {
        let f = setup();
        let shift = shift_for(&f, f.mia.id, 19, 9, 13);
        let swap = f
            .scheduler
            .request_swap(f.mia.id, d(19), shift.id, SwapProposal::to(f.noah.id))
            .unwrap()
            .value;
        let denied = f
            .scheduler
            .deny_swap(f.staff.id, swap.id, Some("Short staffed".to_string()))
            .unwrap()
            .value;
        assert_eq!(denied.status, SwapStatus::Denied);
        assert_eq!(denied.response_note.as_deref(), Some("Short staffed"));

        let all = f.scheduler.week_shifts(f.staff.id, d(19)).unwrap();
        assert_eq!(all[0].assigned_to, Some(f.mia.id));
    }

    /// SW-008: members cannot moderate.
    #[test]
    fn test_member_cannot_approve() {
        let f = setup();
        let shift = shift_for(&f, f.mia.id, 19, 9, 13);
        let swap = f
            .scheduler
            .request_swap(f.mia.id, d(19), shift.id, SwapProposal::give_up())
            .unwrap()
            .value;
        let result = f.scheduler.approve_swap(f.noah.id, swap.id, None);
        assert!(matches!(result, Err(SchedulerError::PermissionDenied { .. })));
    }
}
