//! Semester settings: semesters, open hours and holidays.
//!
//! Edits take effect for the next operation; nothing caches policy results.

use chrono::{NaiveDate, NaiveTime, Weekday};
use tracing::info;
use uuid::Uuid;

use crate::error::{SchedulerError, SchedulerResult};
use crate::models::{Capability, Holiday, OpenHour, Outcome, Semester};
use crate::policy;

use super::{Scheduler, logged};

const MANAGE: &str = "manage semester settings";

impl Scheduler {
    /// Creates a semester. A semester created active deactivates the others.
    pub fn create_semester(
        &self,
        actor: Uuid,
        name: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
        is_active: bool,
    ) -> SchedulerResult<Outcome<Semester>> {
        let result = self.store.transaction(|tables| {
            tables.profile(actor)?.require(Capability::ManageCalendar, MANAGE)?;
            let name = name.trim();
            if name.is_empty() {
                return Err(SchedulerError::field("name", "Name is required."));
            }
            if end_date < start_date {
                return Err(SchedulerError::field(
                    "end_date",
                    "End date must be on or after the start date.",
                ));
            }
            let semester = Semester::new(name, start_date, end_date, is_active);
            tables.insert_semester(semester.clone());
            Ok(Outcome::new(semester).success("Semester saved."))
        });
        if let Ok(outcome) = &result {
            info!(semester = %outcome.value.name, active = outcome.value.is_active, "Semester created");
        }
        logged("create_semester", actor, result)
    }

    /// Makes a semester the only active one.
    pub fn set_active_semester(&self, actor: Uuid, semester_id: Uuid) -> SchedulerResult<Outcome<Semester>> {
        let result = self.store.transaction(|tables| {
            tables.profile(actor)?.require(Capability::ManageCalendar, MANAGE)?;
            tables.semester(semester_id)?;
            tables.deactivate_semesters();
            let semester = tables.semester_mut(semester_id)?;
            semester.is_active = true;
            let name = semester.name.clone();
            Ok(Outcome::new(semester.clone()).success(format!("{} set as active.", name)))
        });
        logged("set_active_semester", actor, result)
    }

    /// Clears a semester's active flag.
    pub fn unset_active_semester(&self, actor: Uuid, semester_id: Uuid) -> SchedulerResult<Outcome<Semester>> {
        let result = self.store.transaction(|tables| {
            tables.profile(actor)?.require(Capability::ManageCalendar, MANAGE)?;
            let semester = tables.semester_mut(semester_id)?;
            semester.is_active = false;
            let name = semester.name.clone();
            Ok(Outcome::new(semester.clone()).info(format!("{} is no longer active.", name)))
        });
        logged("unset_active_semester", actor, result)
    }

    /// Adds an open-hour window to a semester.
    pub fn add_open_hour(
        &self,
        actor: Uuid,
        semester_id: Uuid,
        weekday: Weekday,
        open_time: NaiveTime,
        close_time: NaiveTime,
    ) -> SchedulerResult<Outcome<OpenHour>> {
        let result = self.store.transaction(|tables| {
            tables.profile(actor)?.require(Capability::ManageCalendar, MANAGE)?;
            if close_time <= open_time {
                return Err(SchedulerError::field(
                    "close_time",
                    "Close time must be after open time.",
                ));
            }
            let semester = tables.semester_mut(semester_id)?;
            let duplicate = semester.open_hours.iter().any(|w| {
                w.weekday == weekday && w.open_time == open_time && w.close_time == close_time
            });
            if duplicate {
                return Err(SchedulerError::conflict("Those open hours already exist."));
            }
            let window = OpenHour {
                id: Uuid::new_v4(),
                weekday,
                open_time,
                close_time,
            };
            semester.open_hours.push(window.clone());
            Ok(Outcome::new(window).success("Open hours added."))
        });
        logged("add_open_hour", actor, result)
    }

    /// Removes an open-hour window.
    pub fn remove_open_hour(&self, actor: Uuid, semester_id: Uuid, open_hour_id: Uuid) -> SchedulerResult<Outcome<OpenHour>> {
        let result = self.store.transaction(|tables| {
            tables.profile(actor)?.require(Capability::ManageCalendar, MANAGE)?;
            let semester = tables.semester_mut(semester_id)?;
            let index = semester
                .open_hours
                .iter()
                .position(|w| w.id == open_hour_id)
                .ok_or_else(|| SchedulerError::not_found("Open hour", open_hour_id))?;
            let window = semester.open_hours.remove(index);
            Ok(Outcome::new(window).success("Open hours removed."))
        });
        logged("remove_open_hour", actor, result)
    }

    /// Adds a holiday inside a semester's dates.
    pub fn add_holiday(
        &self,
        actor: Uuid,
        semester_id: Uuid,
        date: NaiveDate,
        name: &str,
    ) -> SchedulerResult<Outcome<Holiday>> {
        let result = self.store.transaction(|tables| {
            tables.profile(actor)?.require(Capability::ManageCalendar, MANAGE)?;
            let semester = tables.semester_mut(semester_id)?;
            if !semester.contains_date(date) {
                return Err(SchedulerError::field(
                    "date",
                    "Holiday must fall within the semester dates.",
                ));
            }
            if semester.holiday_on(date).is_some() {
                return Err(SchedulerError::conflict(format!(
                    "A holiday is already set for {}.",
                    date
                )));
            }
            let holiday = Holiday {
                id: Uuid::new_v4(),
                date,
                name: name.trim().to_string(),
            };
            semester.holidays.push(holiday.clone());
            Ok(Outcome::new(holiday).success("Holiday added."))
        });
        logged("add_holiday", actor, result)
    }

    /// Removes a holiday.
    pub fn remove_holiday(&self, actor: Uuid, semester_id: Uuid, holiday_id: Uuid) -> SchedulerResult<Outcome<Holiday>> {
        let result = self.store.transaction(|tables| {
            tables.profile(actor)?.require(Capability::ManageCalendar, MANAGE)?;
            let semester = tables.semester_mut(semester_id)?;
            let index = semester
                .holidays
                .iter()
                .position(|h| h.id == holiday_id)
                .ok_or_else(|| SchedulerError::not_found("Holiday", holiday_id))?;
            let holiday = semester.holidays.remove(index);
            Ok(Outcome::new(holiday).success("Holiday removed."))
        });
        logged("remove_holiday", actor, result)
    }

    /// Returns every semester.
    pub fn semesters(&self) -> SchedulerResult<Vec<Semester>> {
        self.store.read(|tables| Ok(tables.semesters().to_vec()))
    }

    /// Returns the active semester governing `date`, if any.
    pub fn active_semester_for(&self, date: NaiveDate) -> SchedulerResult<Option<Semester>> {
        self.store
            .read(|tables| Ok(policy::active_semester_for(tables.semesters(), date).cloned()))
    }
}

#[cfg(test)]
mod tests {
    use crate::engine::Scheduler;
    use crate::error::SchedulerError;
    use crate::models::{Profile, Role};
    use chrono::{NaiveDate, NaiveTime, Weekday};

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, m, day).unwrap()
    }

    fn t(h: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, 0, 0).unwrap()
    }

    fn setup() -> (Scheduler, Profile) {
        let scheduler = Scheduler::new();
        let admin = scheduler
            .register_profile(Profile::new("root", Role::Admin))
            .unwrap();
        (scheduler, admin)
    }

    /// SEM-001: activating one semester deactivates the rest.
    #[test]
    fn test_set_active_is_exclusive() {
        let (scheduler, admin) = setup();
        let spring = scheduler
            .create_semester(admin.id, "Spring", d(1, 12), d(5, 8), true)
            .unwrap()
            .value;
        let fall = scheduler
            .create_semester(admin.id, "Fall", d(8, 24), d(12, 18), false)
            .unwrap()
            .value;

        let outcome = scheduler.set_active_semester(admin.id, fall.id).unwrap();
        assert_eq!(outcome.notices[0].text, "Fall set as active.");

        let semesters = scheduler.semesters().unwrap();
        let active: Vec<_> = semesters.iter().filter(|s| s.is_active).collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, fall.id);
        assert!(scheduler.active_semester_for(d(3, 2)).unwrap().is_none());
        assert_ne!(spring.id, fall.id);
    }

    /// SEM-002: inverted dates are rejected.
    #[test]
    fn test_inverted_semester_rejected() {
        let (scheduler, admin) = setup();
        let result = scheduler.create_semester(admin.id, "Bad", d(5, 8), d(1, 12), false);
        match result {
            Err(SchedulerError::Validation { message, .. }) => {
                assert_eq!(message, "End date must be on or after the start date.")
            }
            other => panic!("Expected Validation, got {:?}", other),
        }
    }

    /// SEM-003: open-hour windows are unique and ordered.
    #[test]
    fn test_open_hours_validation() {
        let (scheduler, admin) = setup();
        let fall = scheduler
            .create_semester(admin.id, "Fall", d(8, 24), d(12, 18), true)
            .unwrap()
            .value;

        scheduler
            .add_open_hour(admin.id, fall.id, Weekday::Mon, t(9), t(17))
            .unwrap();
        let duplicate = scheduler.add_open_hour(admin.id, fall.id, Weekday::Mon, t(9), t(17));
        assert!(matches!(duplicate, Err(SchedulerError::Conflict { .. })));

        let inverted = scheduler.add_open_hour(admin.id, fall.id, Weekday::Tue, t(17), t(9));
        assert!(matches!(inverted, Err(SchedulerError::Validation { .. })));
    }

    /// SEM-004: holidays stay inside the semester and are unique per date.
    #[test]
    fn test_holiday_validation() {
        let (scheduler, admin) = setup();
        let fall = scheduler
            .create_semester(admin.id, "Fall", d(8, 24), d(12, 18), true)
            .unwrap()
            .value;

        let outside = scheduler.add_holiday(admin.id, fall.id, d(7, 4), "Independence Day");
        assert!(matches!(outside, Err(SchedulerError::Validation { .. })));

        let holiday = scheduler
            .add_holiday(admin.id, fall.id, d(11, 26), "Thanksgiving")
            .unwrap()
            .value;
        let again = scheduler.add_holiday(admin.id, fall.id, d(11, 26), "Turkey Day");
        assert!(matches!(again, Err(SchedulerError::Conflict { .. })));

        scheduler.remove_holiday(admin.id, fall.id, holiday.id).unwrap();
        let semester = scheduler.active_semester_for(d(11, 26)).unwrap().unwrap();
        assert!(semester.holidays.is_empty());
    }

    /// SEM-005: students cannot change the calendar.
    #[test]
    fn test_student_cannot_manage_calendar() {
        let (scheduler, _) = setup();
        let student = scheduler
            .register_profile(Profile::new("jdoe", Role::Student))
            .unwrap();
        let result = scheduler.create_semester(student.id, "Fall", d(8, 24), d(12, 18), true);
        assert!(matches!(result, Err(SchedulerError::PermissionDenied { .. })));
    }
}
