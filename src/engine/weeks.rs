//! Schedule week lifecycle: `draft ⇄ published`.

use chrono::NaiveDate;
use tracing::info;
use uuid::Uuid;

use crate::error::SchedulerResult;
use crate::models::{ActivityAction, Capability, Outcome, ScheduleWeek, WeekStatus};

use super::{Scheduler, logged};

impl Scheduler {
    /// Returns the week containing `date`, creating a draft if none exists.
    ///
    /// The creator is recorded only when the week is created by this call.
    pub fn ensure_week(&self, actor: Uuid, date: NaiveDate) -> SchedulerResult<Outcome<ScheduleWeek>> {
        let now = self.now();
        let result = self.store.transaction(|tables| {
            tables.profile(actor)?;
            let week = tables.ensure_week(date, Some(actor), now).clone();
            Ok(Outcome::new(week))
        });
        logged("ensure_week", actor, result)
    }

    /// Publishes the week containing `date`.
    ///
    /// Publishing an already-published week changes nothing.
    pub fn publish_week(&self, actor: Uuid, date: NaiveDate) -> SchedulerResult<Outcome<ScheduleWeek>> {
        let now = self.now();
        let result = self.store.transaction(|tables| {
            tables
                .profile(actor)?
                .require(Capability::PublishSchedule, "publish schedules")?;
            let week = tables.ensure_week(date, Some(actor), now);
            if week.is_published() {
                return Ok(Outcome::new(week.clone()).info("This schedule is already published."));
            }
            week.status = WeekStatus::Published;
            week.published_at = Some(now);
            Ok(Outcome::new(week.clone()).success("Schedule published to the team."))
        });
        if let Ok(outcome) = &result {
            info!(week_start = %outcome.value.week_start, "Schedule week published");
            self.record(
                actor,
                ActivityAction::Schedule,
                format!("Published the week of {}", outcome.value.week_start),
            );
        }
        logged("publish_week", actor, result)
    }

    /// Returns the week containing `date` to draft.
    ///
    /// `published_at` is kept as history.
    pub fn unpublish_week(&self, actor: Uuid, date: NaiveDate) -> SchedulerResult<Outcome<ScheduleWeek>> {
        let now = self.now();
        let result = self.store.transaction(|tables| {
            tables
                .profile(actor)?
                .require(Capability::PublishSchedule, "unpublish schedules")?;
            let week = tables.ensure_week(date, Some(actor), now);
            week.status = WeekStatus::Draft;
            Ok(Outcome::new(week.clone()).info("Schedule set back to draft."))
        });
        if let Ok(outcome) = &result {
            info!(week_start = %outcome.value.week_start, "Schedule week set to draft");
        }
        logged("unpublish_week", actor, result)
    }
}

#[cfg(test)]
mod tests {
    use crate::clock::FixedClock;
    use crate::engine::Scheduler;
    use crate::error::SchedulerError;
    use crate::models::{Profile, Role, WeekStatus};
    use chrono::{Duration, NaiveDate};

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn setup() -> (Scheduler, FixedClock, Profile) {
        let clock = FixedClock::new(monday().and_hms_opt(8, 0, 0).unwrap());
        let scheduler = Scheduler::new().with_clock(clock.clone());
        let staff = scheduler
            .register_profile(Profile::new("boss", Role::Staff))
            .unwrap();
        (scheduler, clock, staff)
    }

    /// WK-001: publish is idempotent.
    #[test]
    fn test_publish_is_idempotent() {
        let (scheduler, clock, staff) = setup();
        let first = scheduler.publish_week(staff.id, monday()).unwrap();
        clock.advance(Duration::hours(2));
        let second = scheduler.publish_week(staff.id, monday()).unwrap();

        assert_eq!(first.value, second.value);
        assert_eq!(second.notices[0].text, "This schedule is already published.");
    }

    /// WK-002: unpublish keeps the published_at history.
    #[test]
    fn test_unpublish_keeps_published_at() {
        let (scheduler, _, staff) = setup();
        let published = scheduler.publish_week(staff.id, monday()).unwrap().value;
        let draft = scheduler.unpublish_week(staff.id, monday()).unwrap().value;

        assert_eq!(draft.status, WeekStatus::Draft);
        assert_eq!(draft.published_at, published.published_at);
    }

    /// WK-003: only publishers may publish.
    #[test]
    fn test_team_member_cannot_publish() {
        let (scheduler, _, _) = setup();
        let member = scheduler
            .register_profile(Profile::new("alee", Role::TeamMember))
            .unwrap();

        let result = scheduler.publish_week(member.id, monday());
        assert!(matches!(result, Err(SchedulerError::PermissionDenied { .. })));
    }

    /// WK-004: any date in the week resolves to its Monday.
    #[test]
    fn test_ensure_week_uses_monday() {
        let (scheduler, _, staff) = setup();
        let friday = monday() + Duration::days(4);
        let week = scheduler.ensure_week(staff.id, friday).unwrap().value;
        assert_eq!(week.week_start, monday());
        assert_eq!(week.created_by, Some(staff.id));
    }
}
