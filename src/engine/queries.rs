//! Read models.
//!
//! Reads never create weeks and never fail because something is hidden:
//! gated collections come back empty instead.

use chrono::NaiveDate;
use tracing::debug;
use uuid::Uuid;

use crate::error::SchedulerResult;
use crate::models::{
    Availability, CancellationStatus, Capability, RoomReservation, ScheduleWeek, Shift,
    ShiftSwapRequest, Training, TrainingCancellationRequest, WaitlistEntry, monday_of,
};
use crate::policy::{shifts_visible, training_visible};

use super::Scheduler;

impl Scheduler {
    /// Returns the stored week containing `date`, if one exists.
    pub fn week(&self, date: NaiveDate) -> SchedulerResult<Option<ScheduleWeek>> {
        let week_start = monday_of(date);
        self.store.read(|tables| Ok(tables.week(week_start).cloned()))
    }

    /// Returns every shift in the week, or nothing if the viewer may not
    /// see it yet.
    pub fn week_shifts(&self, viewer: Uuid, week_start: NaiveDate) -> SchedulerResult<Vec<Shift>> {
        let week_start = monday_of(week_start);
        self.store.read(|tables| {
            let profile = tables.profile(viewer)?;
            if !shifts_visible(profile, tables.week(week_start)) {
                debug!(viewer = %viewer, week_start = %week_start, "Week hidden from viewer");
                return Ok(Vec::new());
            }
            Ok(tables.shifts_in_week(week_start).into_iter().cloned().collect())
        })
    }

    /// Returns the viewer's own shifts in the week, gated like
    /// [`Scheduler::week_shifts`].
    pub fn my_shifts(&self, viewer: Uuid, week_start: NaiveDate) -> SchedulerResult<Vec<Shift>> {
        let week_start = monday_of(week_start);
        self.store.read(|tables| {
            let profile = tables.profile(viewer)?;
            if !shifts_visible(profile, tables.week(week_start)) {
                return Ok(Vec::new());
            }
            Ok(tables
                .shifts_in_week(week_start)
                .into_iter()
                .filter(|s| s.assigned_to == Some(viewer))
                .cloned()
                .collect())
        })
    }

    /// Returns every training the viewer may see: unscheduled ones first,
    /// then scheduled ones by time.
    pub fn visible_trainings(&self, viewer: Uuid) -> SchedulerResult<Vec<Training>> {
        self.store.read(|tables| {
            let profile = tables.profile(viewer)?;
            Ok(tables
                .trainings()
                .into_iter()
                .filter(|t| {
                    let week = t.week_start().and_then(|start| tables.week(start));
                    training_visible(profile, t, week)
                })
                .cloned()
                .collect())
        })
    }

    /// Returns the trainings the viewer leads in the week.
    pub fn led_trainings(&self, viewer: Uuid, week_start: NaiveDate) -> SchedulerResult<Vec<Training>> {
        let week_start = monday_of(week_start);
        self.store.read(|tables| {
            tables.profile(viewer)?;
            Ok(tables
                .trainings()
                .into_iter()
                .filter(|t| t.staff == Some(viewer) && t.week_start() == Some(week_start))
                .cloned()
                .collect())
        })
    }

    /// Returns a week's availability. Staff see everyone's; others see
    /// their own.
    pub fn week_availabilities(
        &self,
        viewer: Uuid,
        week_start: NaiveDate,
    ) -> SchedulerResult<Vec<Availability>> {
        let week_start = monday_of(week_start);
        self.store.read(|tables| {
            let sees_all = tables.profile(viewer)?.can(Capability::EditSchedule);
            Ok(tables
                .availabilities_in_week(week_start)
                .into_iter()
                .filter(|a| sees_all || a.profile_id == viewer)
                .cloned()
                .collect())
        })
    }

    /// Returns the pending swap requests for shifts in the week.
    pub fn pending_swaps(
        &self,
        viewer: Uuid,
        week_start: NaiveDate,
    ) -> SchedulerResult<Vec<ShiftSwapRequest>> {
        let week_start = monday_of(week_start);
        self.store.read(|tables| {
            tables
                .profile(viewer)?
                .require(Capability::ModerateSwaps, "review swap requests")?;
            Ok(tables
                .swaps()
                .into_iter()
                .filter(|swap| swap.is_pending())
                .filter(|swap| {
                    tables
                        .shift(swap.shift_id)
                        .is_ok_and(|shift| shift.week_start == week_start)
                })
                .cloned()
                .collect())
        })
    }

    /// Returns every pending training cancellation request, oldest first.
    pub fn pending_cancellations(
        &self,
        viewer: Uuid,
    ) -> SchedulerResult<Vec<TrainingCancellationRequest>> {
        self.store.read(|tables| {
            tables
                .profile(viewer)?
                .require(Capability::ModerateCancellations, "review training cancellations")?;
            Ok(tables
                .cancellations()
                .into_iter()
                .filter(|c| c.status == CancellationStatus::Pending)
                .cloned()
                .collect())
        })
    }

    /// Returns a training's waitlist in FIFO order. Staff see every entry;
    /// others see only their own.
    pub fn waitlist_for(&self, viewer: Uuid, training_id: Uuid) -> SchedulerResult<Vec<WaitlistEntry>> {
        self.store.read(|tables| {
            let sees_all = tables.profile(viewer)?.can(Capability::ModerateCancellations);
            tables.training(training_id)?;
            Ok(tables
                .waitlist_for(training_id)
                .into_iter()
                .filter(|e| sees_all || e.profile_id == viewer)
                .cloned()
                .collect())
        })
    }

    /// Returns room reservations. Reviewers see all; others see their own.
    pub fn reservations(&self, viewer: Uuid) -> SchedulerResult<Vec<RoomReservation>> {
        self.store.read(|tables| {
            let sees_all = tables.profile(viewer)?.can(Capability::ReviewReservations);
            Ok(tables
                .reservations()
                .into_iter()
                .filter(|r| sees_all || r.requester == viewer)
                .cloned()
                .collect())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::models::{
        AvailabilityDraft, Location, OpenHour, Profile, Role, Semester, ShiftDraft, TrainingDraft,
    };
    use chrono::{NaiveDateTime, NaiveTime, Weekday};

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, day).unwrap()
    }

    fn at(day: u32, h: u32) -> NaiveDateTime {
        d(day).and_hms_opt(h, 0, 0).unwrap()
    }

    fn setup() -> (Scheduler, Profile, Profile) {
        let scheduler = Scheduler::new().with_clock(FixedClock::new(at(12, 8)));
        let mut semester = Semester::new(
            "Fall 2026",
            NaiveDate::from_ymd_opt(2026, 8, 24).unwrap(),
            NaiveDate::from_ymd_opt(2026, 12, 18).unwrap(),
            true,
        );
        semester.open_hours = vec![OpenHour {
            id: Uuid::new_v4(),
            weekday: Weekday::Mon,
            open_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            close_time: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
        }];
        scheduler.seed_semester(semester).unwrap();
        let staff = scheduler.register_profile(Profile::new("boss", Role::Staff)).unwrap();
        let member = scheduler.register_profile(Profile::new("alee", Role::TeamMember)).unwrap();
        (scheduler, staff, member)
    }

    /// QY-001: draft shifts are hidden from members until publish.
    #[test]
    fn test_draft_week_hidden() {
        let (scheduler, staff, member) = setup();
        scheduler
            .create_shift(
                staff.id,
                d(19),
                ShiftDraft::new("Front desk", Location::SecondHatchFront, at(19, 10), at(19, 14))
                    .assigned_to(member.id),
            )
            .unwrap();

        assert!(scheduler.week_shifts(member.id, d(19)).unwrap().is_empty());
        assert!(scheduler.my_shifts(member.id, d(19)).unwrap().is_empty());
        assert_eq!(scheduler.week_shifts(staff.id, d(19)).unwrap().len(), 1);

        scheduler.publish_week(staff.id, d(19)).unwrap();
        assert_eq!(scheduler.my_shifts(member.id, d(21)).unwrap().len(), 1);
    }

    /// QY-002: reads never create weeks.
    #[test]
    fn test_reads_do_not_create_weeks() {
        let (scheduler, staff, member) = setup();
        scheduler.week_shifts(member.id, d(26)).unwrap();
        scheduler.week_shifts(staff.id, d(26)).unwrap();
        assert!(scheduler.week(d(26)).unwrap().is_none());
    }

    /// QY-003: scheduled trainings follow their week; unscheduled ones are
    /// always listed.
    #[test]
    fn test_training_visibility() {
        let (scheduler, staff, member) = setup();
        scheduler
            .create_training(staff.id, TrainingDraft::new("Open pool", "Epilog", 1))
            .unwrap();
        let mut draft = TrainingDraft::new("Week session", "Epilog", 1);
        draft.time = Some(at(21, 10));
        scheduler.add_training_to_week(staff.id, d(19), draft).unwrap();

        let names: Vec<String> = scheduler
            .visible_trainings(member.id)
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, vec!["Open pool".to_string()]);
        assert_eq!(scheduler.visible_trainings(staff.id).unwrap().len(), 2);
    }

    /// QY-004: members only see their own availability.
    #[test]
    fn test_availability_scoped_to_owner() {
        let (scheduler, staff, member) = setup();
        let other = scheduler.register_profile(Profile::new("bo", Role::TeamMember)).unwrap();
        for who in [member.id, other.id] {
            scheduler
                .submit_availability(
                    who,
                    d(19),
                    AvailabilityDraft::new(at(19, 10), at(19, 12)),
                )
                .unwrap();
        }
        assert_eq!(scheduler.week_availabilities(member.id, d(19)).unwrap().len(), 1);
        assert_eq!(scheduler.week_availabilities(staff.id, d(19)).unwrap().len(), 2);
    }

    /// QY-005: moderation queues need the capability.
    #[test]
    fn test_queues_require_capability() {
        let (scheduler, _, member) = setup();
        assert!(scheduler.pending_swaps(member.id, d(19)).is_err());
        assert!(scheduler.pending_cancellations(member.id).is_err());
    }
}
