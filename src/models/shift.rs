//! Shift model and related types.
//!
//! This module defines the Shift struct, the room [`Location`] enum and the
//! [`ShiftDraft`] input used when creating or editing a shift.

use std::collections::BTreeSet;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, NaiveDateTime, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::SchedulerError;

/// One of the four physical rooms a shift or reservation can use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Location {
    /// Second floor, hatch front.
    SecondHatchFront,
    /// Second floor, hatch back.
    SecondHatchBack,
    /// Third floor, prototyping studio.
    ThirdProtoStudio,
    /// Third floor, prototyping shop.
    ThirdProtoShop,
}

impl Location {
    /// All valid locations.
    pub const ALL: [Location; 4] = [
        Location::SecondHatchFront,
        Location::SecondHatchBack,
        Location::ThirdProtoStudio,
        Location::ThirdProtoShop,
    ];

    /// The stored key, e.g. `second_hatch_front`.
    pub fn key(self) -> &'static str {
        match self {
            Location::SecondHatchFront => "second_hatch_front",
            Location::SecondHatchBack => "second_hatch_back",
            Location::ThirdProtoStudio => "third_proto_studio",
            Location::ThirdProtoShop => "third_proto_shop",
        }
    }

    /// The human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Location::SecondHatchFront => "Second Floor • Hatch Front",
            Location::SecondHatchBack => "Second Floor • Hatch Back",
            Location::ThirdProtoStudio => "Third Floor • Prototyping Studio",
            Location::ThirdProtoShop => "Third Floor • Prototyping Shop",
        }
    }
}

impl FromStr for Location {
    type Err = SchedulerError;

    /// Parses a stored key.
    ///
    /// # Example
    ///
    /// ```
    /// use makerspace_scheduler::models::Location;
    ///
    /// let room: Location = "third_proto_shop".parse().unwrap();
    /// assert_eq!(room, Location::ThirdProtoShop);
    /// assert!("basement".parse::<Location>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Location::ALL
            .into_iter()
            .find(|l| l.key() == s)
            .ok_or_else(|| SchedulerError::field("location", "Select a valid location."))
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A staffed time block within a schedule week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shift {
    /// Unique identifier for the shift.
    pub id: Uuid,
    /// The Monday of the owning schedule week.
    pub week_start: NaiveDate,
    /// Short title, e.g. "Front desk".
    pub title: String,
    /// The room being staffed.
    pub location: Location,
    /// Start of the shift.
    pub start: NaiveDateTime,
    /// End of the shift.
    pub end: NaiveDateTime,
    /// Minimum number of people needed.
    pub min_staffing: u32,
    /// The single assignee, if any.
    pub assigned_to: Option<Uuid>,
    /// The profile that created the shift.
    pub created_by: Option<Uuid>,
    /// Certification tracks needed to cover the shift.
    #[serde(default)]
    pub required_certifications: BTreeSet<String>,
    /// Free-form notes.
    #[serde(default)]
    pub notes: Option<String>,
}

impl Shift {
    /// Returns the wall-clock length of the shift in minutes.
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// Returns the wall-clock length of the shift in hours.
    ///
    /// # Examples
    ///
    /// ```
    /// use makerspace_scheduler::models::{Location, Shift};
    /// use chrono::{NaiveDate, NaiveDateTime};
    /// use rust_decimal::Decimal;
    /// use uuid::Uuid;
    ///
    /// let shift = Shift {
    ///     id: Uuid::new_v4(),
    ///     week_start: NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
    ///     title: "Front desk".to_string(),
    ///     location: Location::SecondHatchFront,
    ///     start: NaiveDateTime::parse_from_str("2026-10-19 09:00:00", "%Y-%m-%d %H:%M:%S").unwrap(),
    ///     end: NaiveDateTime::parse_from_str("2026-10-19 13:30:00", "%Y-%m-%d %H:%M:%S").unwrap(),
    ///     min_staffing: 1,
    ///     assigned_to: None,
    ///     created_by: None,
    ///     required_certifications: Default::default(),
    ///     notes: None,
    /// };
    /// assert_eq!(shift.duration_hours(), Decimal::new(45, 1)); // 4.5 hours
    /// ```
    pub fn duration_hours(&self) -> Decimal {
        minutes_to_hours(self.duration_minutes())
    }

    /// Returns the day of the week the shift starts on.
    pub fn day_of_week(&self) -> Weekday {
        self.start.weekday()
    }
}

/// Input for creating or editing a shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftDraft {
    /// Short title.
    pub title: String,
    /// The room being staffed.
    pub location: Location,
    /// Start of the shift.
    pub start: NaiveDateTime,
    /// End of the shift.
    pub end: NaiveDateTime,
    /// Minimum number of people needed.
    #[serde(default = "default_min_staffing")]
    pub min_staffing: u32,
    /// The assignee, if any.
    #[serde(default)]
    pub assigned_to: Option<Uuid>,
    /// Certification tracks needed.
    #[serde(default)]
    pub required_certifications: BTreeSet<String>,
    /// Free-form notes.
    #[serde(default)]
    pub notes: Option<String>,
}

fn default_min_staffing() -> u32 {
    1
}

impl ShiftDraft {
    /// Creates a draft with default staffing and no assignee.
    pub fn new(
        title: impl Into<String>,
        location: Location,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Self {
        Self {
            title: title.into(),
            location,
            start,
            end,
            min_staffing: default_min_staffing(),
            assigned_to: None,
            required_certifications: BTreeSet::new(),
            notes: None,
        }
    }

    /// Sets the assignee.
    pub fn assigned_to(mut self, profile_id: Uuid) -> Self {
        self.assigned_to = Some(profile_id);
        self
    }
}

/// Converts whole minutes to decimal hours.
pub fn minutes_to_hours(minutes: i64) -> Decimal {
    Decimal::new(minutes, 0) / Decimal::new(60, 0)
}
