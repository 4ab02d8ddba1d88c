//! Schedule week model and week-start derivation.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Publish state of a schedule week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeekStatus {
    /// Being built; hidden from non-staff viewers.
    Draft,
    /// Released to the team.
    Published,
}

/// The weekly aggregation unit, keyed by its Monday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleWeek {
    /// The Monday that starts the week. Unique across weeks.
    pub week_start: NaiveDate,
    /// Current publish state.
    pub status: WeekStatus,
    /// When the week was last published. Kept when unpublishing.
    pub published_at: Option<NaiveDateTime>,
    /// The profile that first materialized the week, if recorded.
    pub created_by: Option<Uuid>,
    /// When the week was materialized.
    pub created_at: NaiveDateTime,
}

impl ScheduleWeek {
    /// Creates a draft week starting on the Monday of `week_start`'s week.
    pub fn draft(week_start: NaiveDate, created_by: Option<Uuid>, now: NaiveDateTime) -> Self {
        Self {
            week_start: monday_of(week_start),
            status: WeekStatus::Draft,
            published_at: None,
            created_by,
            created_at: now,
        }
    }

    /// Returns true if the week is published.
    pub fn is_published(&self) -> bool {
        self.status == WeekStatus::Published
    }

    /// Returns the exclusive end of the week (the following Monday).
    pub fn week_end(&self) -> NaiveDate {
        self.week_start + Duration::days(7)
    }

    /// Returns true if the date falls within `[week_start, week_start + 7)`.
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.week_start && date < self.week_end()
    }
}

/// Returns the Monday of the week containing `date`.
///
/// # Example
///
/// ```
/// use makerspace_scheduler::models::monday_of;
/// use chrono::NaiveDate;
///
/// // 2026-10-22 is a Thursday
/// let thursday = NaiveDate::from_ymd_opt(2026, 10, 22).unwrap();
/// assert_eq!(monday_of(thursday), NaiveDate::from_ymd_opt(2026, 10, 19).unwrap());
/// ```
pub fn monday_of(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// Returns the `week_start` a timestamp belongs to.
///
/// Trainings have no stored link to a week; callers always derive it from
/// the training's current time through this function.
pub fn week_start_for(timestamp: NaiveDateTime) -> NaiveDate {
    monday_of(timestamp.date())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_monday_of_monday_is_itself() {
        assert_eq!(monday_of(d(2026, 10, 19)), d(2026, 10, 19));
    }

    #[test]
    fn test_monday_of_sunday_is_previous_monday() {
        assert_eq!(monday_of(d(2026, 10, 25)), d(2026, 10, 19));
    }

    #[test]
    fn test_week_start_for_late_sunday() {
        let ts = d(2026, 10, 25).and_hms_opt(23, 59, 0).unwrap();
        assert_eq!(week_start_for(ts), d(2026, 10, 19));
    }

    #[test]
    fn test_draft_normalizes_to_monday() {
        let now = d(2026, 10, 18).and_hms_opt(8, 0, 0).unwrap();
        let week = ScheduleWeek::draft(d(2026, 10, 21), None, now);
        assert_eq!(week.week_start, d(2026, 10, 19));
        assert_eq!(week.status, WeekStatus::Draft);
        assert!(!week.is_published());
    }

    #[test]
    fn test_contains_date_excludes_next_monday() {
        let now = d(2026, 10, 18).and_hms_opt(8, 0, 0).unwrap();
        let week = ScheduleWeek::draft(d(2026, 10, 19), None, now);
        assert!(week.contains_date(d(2026, 10, 25)));
        assert!(!week.contains_date(d(2026, 10, 26)));
        assert!(!week.contains_date(d(2026, 10, 18)));
    }

    #[test]
    fn test_week_status_serialization() {
        assert_eq!(
            serde_json::to_string(&WeekStatus::Published).unwrap(),
            "\"published\""
        );
    }
}
