//! Publish-gated visibility for shifts and trainings.

use crate::models::{Capability, Profile, ScheduleWeek, Training};

/// Returns true if the viewer sees weeks regardless of publish state.
pub fn can_view_drafts(viewer: &Profile) -> bool {
    viewer.can(Capability::ViewDraftSchedules)
}

/// Returns true if the viewer may see the shifts of `week`.
///
/// An absent week has no shifts, so only draft viewers get `true` there.
pub fn shifts_visible(viewer: &Profile, week: Option<&ScheduleWeek>) -> bool {
    can_view_drafts(viewer) || week.is_some_and(ScheduleWeek::is_published)
}

/// Returns true if the viewer may see `training`.
///
/// `week` is the stored week for the training's derived `week_start`, if
/// one exists. Unscheduled trainings and trainings in weeks nobody has
/// opened yet are always visible.
pub fn training_visible(viewer: &Profile, training: &Training, week: Option<&ScheduleWeek>) -> bool {
    if can_view_drafts(viewer) || training.time.is_none() {
        return true;
    }
    week.is_none_or(ScheduleWeek::is_published)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn week(published: bool) -> ScheduleWeek {
        let monday = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let mut week = ScheduleWeek::draft(monday, None, monday.and_hms_opt(8, 0, 0).unwrap());
        if published {
            week.status = crate::models::WeekStatus::Published;
        }
        week
    }

    fn training(scheduled: bool) -> Training {
        Training {
            id: Uuid::new_v4(),
            name: "Laser intro".to_string(),
            machine: "Epilog Fusion".to_string(),
            level: 1,
            certification_type: None,
            time: scheduled.then(|| {
                NaiveDate::from_ymd_opt(2026, 10, 21)
                    .unwrap()
                    .and_hms_opt(10, 0, 0)
                    .unwrap()
            }),
            staff: None,
            student: None,
            capacity: 1,
        }
    }

    /// VIS-001: members only see published weeks.
    #[test]
    fn test_member_sees_published_shifts_only() {
        let member = Profile::new("alee", Role::TeamMember);
        assert!(shifts_visible(&member, Some(&week(true))));
        assert!(!shifts_visible(&member, Some(&week(false))));
        assert!(!shifts_visible(&member, None));
    }

    /// VIS-002: staff and admin see drafts.
    #[test]
    fn test_staff_and_admin_see_drafts() {
        for role in [Role::Staff, Role::Admin] {
            let viewer = Profile::new("boss", role);
            assert!(shifts_visible(&viewer, Some(&week(false))));
            assert!(training_visible(&viewer, &training(true), Some(&week(false))));
        }
    }

    /// VIS-003: unscheduled trainings are always visible.
    #[test]
    fn test_unscheduled_training_always_visible() {
        let student = Profile::new("jdoe", Role::Student);
        assert!(training_visible(&student, &training(false), Some(&week(false))));
    }

    #[test]
    fn test_scheduled_training_follows_week() {
        let student = Profile::new("jdoe", Role::Student);
        assert!(!training_visible(&student, &training(true), Some(&week(false))));
        assert!(training_visible(&student, &training(true), Some(&week(true))));
        assert!(training_visible(&student, &training(true), None));
    }
}
