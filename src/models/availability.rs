//! Availability model.

use std::collections::BTreeSet;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A window in which a member says they can work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Availability {
    /// Unique identifier for the availability slot.
    pub id: Uuid,
    /// The member who submitted it.
    pub profile_id: Uuid,
    /// The Monday of the week it belongs to.
    pub week_start: NaiveDate,
    /// Start of the window.
    pub start: NaiveDateTime,
    /// End of the window.
    pub end: NaiveDateTime,
    /// Optional note.
    #[serde(default)]
    pub note: Option<String>,
    /// Certification tracks the member can cover in this window.
    #[serde(default)]
    pub skills: BTreeSet<String>,
    /// When it was submitted.
    pub created_at: NaiveDateTime,
}

impl Availability {
    /// Returns a copy of the window moved forward by `offset`, for `week_start`.
    pub fn shifted(&self, offset: Duration, week_start: NaiveDate, now: NaiveDateTime) -> Self {
        Self {
            id: Uuid::new_v4(),
            profile_id: self.profile_id,
            week_start,
            start: self.start + offset,
            end: self.end + offset,
            note: self.note.clone(),
            skills: self.skills.clone(),
            created_at: now,
        }
    }
}

/// Input for submitting or editing availability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityDraft {
    /// Start of the window.
    pub start: NaiveDateTime,
    /// End of the window.
    pub end: NaiveDateTime,
    /// Optional note.
    #[serde(default)]
    pub note: Option<String>,
    /// Certification tracks covered.
    #[serde(default)]
    pub skills: BTreeSet<String>,
}

impl AvailabilityDraft {
    /// Creates a draft with no note or skills.
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            start,
            end,
            note: None,
            skills: BTreeSet::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(day: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, day)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_shifted_copies_note_and_skills() {
        let source = Availability {
            id: Uuid::new_v4(),
            profile_id: Uuid::new_v4(),
            week_start: NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
            start: at(20, 9),
            end: at(20, 12),
            note: Some("mornings".to_string()),
            skills: BTreeSet::from(["Laser".to_string()]),
            created_at: at(18, 8),
        };
        let next_week = NaiveDate::from_ymd_opt(2026, 10, 26).unwrap();

        let copy = source.shifted(Duration::days(7), next_week, at(19, 8));

        assert_ne!(copy.id, source.id);
        assert_eq!(copy.profile_id, source.profile_id);
        assert_eq!(copy.week_start, next_week);
        assert_eq!(copy.start, at(27, 9));
        assert_eq!(copy.end, at(27, 12));
        assert_eq!(copy.note, source.note);
        assert_eq!(copy.skills, source.skills);
    }
}
