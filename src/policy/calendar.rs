//! Calendar policy: active semester, holidays and open hours.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use tracing::debug;

use crate::models::Semester;

/// Returns the active semester whose dates contain `date`.
///
/// When several active semesters overlap, the one that started last wins.
///
/// # Example
///
/// ```
/// use makerspace_scheduler::models::Semester;
/// use makerspace_scheduler::policy::active_semester_for;
/// use chrono::NaiveDate;
///
/// let d = |m, day| NaiveDate::from_ymd_opt(2026, m, day).unwrap();
/// let fall = Semester::new("Fall", d(8, 24), d(12, 18), true);
/// let spring = Semester::new("Spring", d(1, 12), d(5, 8), false);
/// let semesters = vec![fall, spring];
///
/// assert_eq!(active_semester_for(&semesters, d(10, 19)).map(|s| s.name.as_str()), Some("Fall"));
/// assert!(active_semester_for(&semesters, d(3, 2)).is_none()); // spring is inactive
/// ```
pub fn active_semester_for(semesters: &[Semester], date: NaiveDate) -> Option<&Semester> {
    let semester = semesters
        .iter()
        .filter(|s| s.is_active && s.contains_date(date))
        .max_by_key(|s| s.start_date);
    debug!(
        %date,
        semester = semester.map(|s| s.name.as_str()),
        "Resolved active semester"
    );
    semester
}

/// Returns true if `date` is a holiday in `semester`.
pub fn is_holiday(semester: &Semester, date: NaiveDate) -> bool {
    semester.holiday_on(date).is_some()
}

/// Returns true if `[start, end]` fits inside one open-hour window for the
/// weekday of `start`.
///
/// No semester means no restriction. Windows spanning midnight are not
/// supported: only the times of day are compared.
pub fn within_open_hours(
    semester: Option<&Semester>,
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> bool {
    let Some(semester) = semester else {
        return true;
    };
    semester
        .windows_for(start.weekday())
        .iter()
        .any(|window| window.contains(start.time(), end.time()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Holiday, OpenHour};
    use chrono::{NaiveTime, Weekday};
    use uuid::Uuid;

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, m, day).unwrap()
    }

    fn at(m: u32, day: u32, h: u32, min: u32) -> NaiveDateTime {
        d(m, day).and_hms_opt(h, min, 0).unwrap()
    }

    fn window(weekday: Weekday, open: u32, close: u32) -> OpenHour {
        OpenHour {
            id: Uuid::new_v4(),
            weekday,
            open_time: NaiveTime::from_hms_opt(open, 0, 0).unwrap(),
            close_time: NaiveTime::from_hms_opt(close, 0, 0).unwrap(),
        }
    }

    fn fall() -> Semester {
        let mut semester = Semester::new("Fall 2026", d(8, 24), d(12, 18), true);
        semester.open_hours = vec![
            window(Weekday::Mon, 9, 17),
            window(Weekday::Wed, 9, 12),
            window(Weekday::Wed, 13, 19),
        ];
        semester.holidays = vec![Holiday {
            id: Uuid::new_v4(),
            date: d(11, 26),
            name: "Thanksgiving".to_string(),
        }];
        semester
    }

    /// CAL-001: overlapping active semesters resolve to the latest start.
    #[test]
    fn test_latest_start_wins_on_overlap() {
        let early = Semester::new("Early", d(1, 5), d(12, 18), true);
        let late = Semester::new("Late", d(8, 24), d(12, 18), true);
        let semesters = vec![late, early];

        let resolved = active_semester_for(&semesters, d(10, 19)).unwrap();
        assert_eq!(resolved.name, "Late");

        let resolved = active_semester_for(&semesters, d(3, 2)).unwrap();
        assert_eq!(resolved.name, "Early");
    }

    /// CAL-002: semester bounds are inclusive.
    #[test]
    fn test_semester_bounds_inclusive() {
        let semesters = vec![fall()];
        assert!(active_semester_for(&semesters, d(8, 24)).is_some());
        assert!(active_semester_for(&semesters, d(12, 18)).is_some());
        assert!(active_semester_for(&semesters, d(12, 19)).is_none());
    }

    #[test]
    fn test_is_holiday() {
        let semester = fall();
        assert!(is_holiday(&semester, d(11, 26)));
        assert!(!is_holiday(&semester, d(11, 25)));
    }

    /// CAL-003: a window must be fully covered.
    #[test]
    fn test_window_must_be_fully_covered() {
        let semester = fall();
        // 2026-10-19 is a Monday
        assert!(within_open_hours(Some(&semester), at(10, 19, 9, 0), at(10, 19, 17, 0)));
        assert!(!within_open_hours(Some(&semester), at(10, 19, 16, 0), at(10, 19, 18, 0)));
        assert!(!within_open_hours(Some(&semester), at(10, 19, 8, 30), at(10, 19, 10, 0)));
    }

    /// CAL-004: split windows do not join across the gap.
    #[test]
    fn test_split_windows_do_not_join() {
        let semester = fall();
        // 2026-10-21 is a Wednesday
        assert!(within_open_hours(Some(&semester), at(10, 21, 13, 0), at(10, 21, 15, 0)));
        assert!(!within_open_hours(Some(&semester), at(10, 21, 11, 0), at(10, 21, 14, 0)));
    }

    #[test]
    fn test_weekday_without_windows_is_closed() {
        let semester = fall();
        // 2026-10-20 is a Tuesday
        assert!(!within_open_hours(Some(&semester), at(10, 20, 10, 0), at(10, 20, 11, 0)));
    }

    #[test]
    fn test_no_semester_is_permissive() {
        assert!(within_open_hours(None, at(10, 20, 2, 0), at(10, 20, 3, 0)));
    }
}
