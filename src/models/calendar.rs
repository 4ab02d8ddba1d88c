//! Semester, open-hour and holiday models.

use chrono::{NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A weekly window during which the space is open.
///
/// Several windows may exist for the same weekday (e.g. a split morning and
/// afternoon). Windows never span midnight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenHour {
    /// Unique identifier for the window.
    pub id: Uuid,
    /// The weekday the window applies to.
    pub weekday: Weekday,
    /// Opening time.
    pub open_time: NaiveTime,
    /// Closing time.
    pub close_time: NaiveTime,
}

impl OpenHour {
    /// Returns true if `[start, end]` on this window's weekday fits inside it.
    pub fn contains(&self, start: NaiveTime, end: NaiveTime) -> bool {
        self.open_time <= start && self.close_time >= end
    }
}

/// A date on which nothing may be scheduled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holiday {
    /// Unique identifier for the holiday.
    pub id: Uuid,
    /// The blocked date.
    pub date: NaiveDate,
    /// Display name, e.g. "Thanksgiving".
    pub name: String,
}

/// An academic term that governs open hours and holidays.
///
/// The semester owns its open hours and holidays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Semester {
    /// Unique identifier for the semester.
    pub id: Uuid,
    /// Display name, e.g. "Fall 2026".
    pub name: String,
    /// First day (inclusive).
    pub start_date: NaiveDate,
    /// Last day (inclusive).
    pub end_date: NaiveDate,
    /// Whether the semester is the active one.
    pub is_active: bool,
    /// Open-hour windows.
    #[serde(default)]
    pub open_hours: Vec<OpenHour>,
    /// Holidays.
    #[serde(default)]
    pub holidays: Vec<Holiday>,
}

impl Semester {
    /// Creates a semester with no open hours or holidays.
    pub fn new(
        name: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
        is_active: bool,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            start_date,
            end_date,
            is_active,
            open_hours: Vec::new(),
            holidays: Vec::new(),
        }
    }

    /// Checks if the date falls within the semester (inclusive).
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    /// Returns the open-hour windows for a weekday, ordered by opening time.
    pub fn windows_for(&self, weekday: Weekday) -> Vec<&OpenHour> {
        let mut windows: Vec<&OpenHour> = self
            .open_hours
            .iter()
            .filter(|w| w.weekday == weekday)
            .collect();
        windows.sort_by_key(|w| w.open_time);
        windows
    }

    /// Returns the holiday on a date, if any.
    pub fn holiday_on(&self, date: NaiveDate) -> Option<&Holiday> {
        self.holidays.iter().find(|h| h.date == date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_contains_date_is_inclusive() {
        let semester = Semester::new("Fall", d(2026, 8, 24), d(2026, 12, 11), true);
        assert!(semester.contains_date(d(2026, 8, 24)));
        assert!(semester.contains_date(d(2026, 12, 11)));
        assert!(!semester.contains_date(d(2026, 12, 12)));
        assert!(!semester.contains_date(d(2026, 8, 23)));
    }

    #[test]
    fn test_window_contains_is_inclusive_at_edges() {
        let window = OpenHour {
            id: Uuid::new_v4(),
            weekday: Weekday::Mon,
            open_time: t(9, 0),
            close_time: t(17, 0),
        };
        assert!(window.contains(t(9, 0), t(17, 0)));
        assert!(!window.contains(t(16, 0), t(18, 0)));
        assert!(!window.contains(t(8, 59), t(10, 0)));
    }

    #[test]
    fn test_windows_for_sorts_by_open_time() {
        let mut semester = Semester::new("Fall", d(2026, 8, 24), d(2026, 12, 11), true);
        for (open, close) in [(t(13, 0), t(17, 0)), (t(9, 0), t(12, 0))] {
            semester.open_hours.push(OpenHour {
                id: Uuid::new_v4(),
                weekday: Weekday::Tue,
                open_time: open,
                close_time: close,
            });
        }
        let windows = semester.windows_for(Weekday::Tue);
        assert_eq!(windows.len(), 2);
        assert_eq!(windows[0].open_time, t(9, 0));
        assert!(semester.windows_for(Weekday::Wed).is_empty());
    }
}
