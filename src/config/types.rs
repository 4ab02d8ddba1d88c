//! Configuration types for the scheduling engine.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use chrono::{NaiveDate, NaiveTime, Weekday};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use crate::models::{Holiday, OpenHour, Semester};

/// Engine-wide settings from `scheduler.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SchedulerSettings {
    /// Maximum scheduled hours per capped member per week.
    #[serde(default = "default_weekly_hour_cap")]
    pub weekly_hour_cap: Decimal,
    /// Name of the local timezone all naive timestamps are expressed in.
    #[serde(default = "default_timezone_label")]
    pub timezone_label: String,
}

fn default_weekly_hour_cap() -> Decimal {
    Decimal::new(20, 0)
}

fn default_timezone_label() -> String {
    "local".to_string()
}

impl Default for SchedulerSettings {
    fn default() -> Self {
        Self {
            weekly_hour_cap: default_weekly_hour_cap(),
            timezone_label: default_timezone_label(),
        }
    }
}

/// An open-hour window as written in `calendar.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OpenHourConfig {
    /// Day of the week (e.g. `Mon`).
    pub weekday: Weekday,
    /// Opening time.
    pub open_time: NaiveTime,
    /// Closing time.
    pub close_time: NaiveTime,
}

/// A holiday as written in `calendar.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HolidayConfig {
    /// The closed date.
    pub date: NaiveDate,
    /// Display name.
    pub name: String,
}

/// A semester as written in `calendar.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SemesterConfig {
    /// Display name.
    pub name: String,
    /// First day.
    pub start_date: NaiveDate,
    /// Last day.
    pub end_date: NaiveDate,
    /// Whether scheduling policy uses this semester.
    #[serde(default)]
    pub is_active: bool,
    /// Open-hour windows.
    #[serde(default)]
    pub open_hours: Vec<OpenHourConfig>,
    /// Closed dates.
    #[serde(default)]
    pub holidays: Vec<HolidayConfig>,
}

impl SemesterConfig {
    /// Builds the stored semester record, assigning fresh ids.
    pub fn to_semester(&self) -> Semester {
        let mut semester = Semester::new(
            self.name.clone(),
            self.start_date,
            self.end_date,
            self.is_active,
        );
        semester.open_hours = self
            .open_hours
            .iter()
            .map(|w| OpenHour {
                id: Uuid::new_v4(),
                weekday: w.weekday,
                open_time: w.open_time,
                close_time: w.close_time,
            })
            .collect();
        semester.holidays = self
            .holidays
            .iter()
            .map(|h| Holiday {
                id: Uuid::new_v4(),
                date: h.date,
                name: h.name.clone(),
            })
            .collect();
        semester
    }
}

/// Calendar configuration file structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CalendarConfig {
    /// All configured semesters.
    #[serde(default)]
    pub semesters: Vec<SemesterConfig>,
}

/// Complete configuration for the scheduling engine.
///
/// This struct aggregates the settings and the calendar loaded from a
/// configuration directory.
#[derive(Debug, Clone, Default)]
pub struct SchedulerConfig {
    settings: SchedulerSettings,
    calendar: CalendarConfig,
}

impl SchedulerConfig {
    /// Creates a SchedulerConfig from its component parts.
    pub fn new(settings: SchedulerSettings, calendar: CalendarConfig) -> Self {
        Self { settings, calendar }
    }

    /// Returns the engine settings.
    pub fn settings(&self) -> &SchedulerSettings {
        &self.settings
    }

    /// Returns the calendar as configured.
    pub fn calendar(&self) -> &CalendarConfig {
        &self.calendar
    }

    /// Builds the semester records to seed the store with.
    pub fn semesters(&self) -> Vec<Semester> {
        self.calendar
            .semesters
            .iter()
            .map(SemesterConfig::to_semester)
            .collect()
    }
}
