//! The engine's record tables and their repository operations.

use std::collections::{BTreeMap, HashMap};

use chrono::{NaiveDate, NaiveDateTime};
use uuid::Uuid;

use crate::error::{SchedulerError, SchedulerResult};
use crate::models::{
    Availability, CancellationStatus, Location, Profile, RoomReservation, ScheduleWeek, Semester,
    Shift, ShiftSwapRequest, Training, TrainingCancellationRequest, WaitlistEntry, WaitlistStatus,
};

/// Every stored record.
///
/// Lookups that miss return [`SchedulerError::NotFound`]; inserts that would
/// break a uniqueness rule return [`SchedulerError::Conflict`].
#[derive(Debug, Clone, Default)]
pub struct Tables {
    profiles: HashMap<Uuid, Profile>,
    semesters: Vec<Semester>,
    weeks: BTreeMap<NaiveDate, ScheduleWeek>,
    shifts: HashMap<Uuid, Shift>,
    availabilities: HashMap<Uuid, Availability>,
    swaps: HashMap<Uuid, ShiftSwapRequest>,
    trainings: HashMap<Uuid, Training>,
    waitlist: Vec<WaitlistEntry>,
    cancellations: Vec<TrainingCancellationRequest>,
    reservations: HashMap<Uuid, RoomReservation>,
    next_sequence: u64,
}

impl Tables {
    // Profiles

    /// Looks up a profile.
    pub fn profile(&self, id: Uuid) -> SchedulerResult<&Profile> {
        self.profiles
            .get(&id)
            .ok_or_else(|| SchedulerError::not_found("Profile", id))
    }

    /// Looks up a profile for modification.
    pub fn profile_mut(&mut self, id: Uuid) -> SchedulerResult<&mut Profile> {
        self.profiles
            .get_mut(&id)
            .ok_or_else(|| SchedulerError::not_found("Profile", id))
    }

    /// Inserts or replaces a profile.
    pub fn upsert_profile(&mut self, profile: Profile) {
        self.profiles.insert(profile.id, profile);
    }

    // Semesters

    /// Returns every semester.
    pub fn semesters(&self) -> &[Semester] {
        &self.semesters
    }

    /// Looks up a semester.
    pub fn semester(&self, id: Uuid) -> SchedulerResult<&Semester> {
        self.semesters
            .iter()
            .find(|s| s.id == id)
            .ok_or_else(|| SchedulerError::not_found("Semester", id))
    }

    /// Looks up a semester for modification.
    pub fn semester_mut(&mut self, id: Uuid) -> SchedulerResult<&mut Semester> {
        self.semesters
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| SchedulerError::not_found("Semester", id))
    }

    /// Adds a semester. An active semester deactivates all others.
    pub fn insert_semester(&mut self, semester: Semester) {
        if semester.is_active {
            self.deactivate_semesters();
        }
        self.semesters.push(semester);
    }

    /// Clears the active flag on every semester.
    pub fn deactivate_semesters(&mut self) {
        for semester in &mut self.semesters {
            semester.is_active = false;
        }
    }

    // Weeks

    /// Looks up a week by its Monday.
    pub fn week(&self, week_start: NaiveDate) -> Option<&ScheduleWeek> {
        self.weeks.get(&week_start)
    }

    /// Looks up a week that must exist.
    pub fn existing_week(&self, week_start: NaiveDate) -> SchedulerResult<&ScheduleWeek> {
        self.week(week_start)
            .ok_or_else(|| SchedulerError::not_found("Schedule week", week_start))
    }

    /// Looks up a week for modification.
    pub fn week_mut(&mut self, week_start: NaiveDate) -> SchedulerResult<&mut ScheduleWeek> {
        self.weeks
            .get_mut(&week_start)
            .ok_or_else(|| SchedulerError::not_found("Schedule week", week_start))
    }

    /// Returns the week for `week_start`, creating a draft if absent.
    ///
    /// `created_by` is recorded only when the week is created here.
    pub fn ensure_week(
        &mut self,
        week_start: NaiveDate,
        created_by: Option<Uuid>,
        now: NaiveDateTime,
    ) -> &mut ScheduleWeek {
        let week = ScheduleWeek::draft(week_start, created_by, now);
        self.weeks.entry(week.week_start).or_insert(week)
    }

    // Shifts

    /// Looks up a shift.
    pub fn shift(&self, id: Uuid) -> SchedulerResult<&Shift> {
        self.shifts
            .get(&id)
            .ok_or_else(|| SchedulerError::not_found("Shift", id))
    }

    /// Looks up a shift that must belong to `week_start`.
    pub fn shift_in_week(&self, id: Uuid, week_start: NaiveDate) -> SchedulerResult<&Shift> {
        match self.shifts.get(&id) {
            Some(shift) if shift.week_start == week_start => Ok(shift),
            _ => Err(SchedulerError::not_found("Shift", id)),
        }
    }

    /// Inserts or replaces a shift.
    pub fn upsert_shift(&mut self, shift: Shift) {
        self.shifts.insert(shift.id, shift);
    }

    /// Removes a shift and its swap requests.
    pub fn remove_shift(&mut self, id: Uuid) -> SchedulerResult<Shift> {
        let shift = self
            .shifts
            .remove(&id)
            .ok_or_else(|| SchedulerError::not_found("Shift", id))?;
        self.swaps.retain(|_, swap| swap.shift_id != id);
        Ok(shift)
    }

    /// Returns the shifts of a week ordered by start time.
    pub fn shifts_in_week(&self, week_start: NaiveDate) -> Vec<&Shift> {
        let mut shifts: Vec<&Shift> = self
            .shifts
            .values()
            .filter(|s| s.week_start == week_start)
            .collect();
        shifts.sort_by_key(|s| (s.start, s.location));
        shifts
    }

    /// Returns every shift assigned to a profile ordered by start time.
    pub fn shifts_assigned_to(&self, profile_id: Uuid) -> Vec<&Shift> {
        let mut shifts: Vec<&Shift> = self
            .shifts
            .values()
            .filter(|s| s.assigned_to == Some(profile_id))
            .collect();
        shifts.sort_by_key(|s| s.start);
        shifts
    }

    /// Sums the minutes assigned to a profile in a week, skipping `excluding`.
    pub fn assigned_minutes(
        &self,
        profile_id: Uuid,
        week_start: NaiveDate,
        excluding: Option<Uuid>,
    ) -> i64 {
        self.shifts
            .values()
            .filter(|s| {
                s.week_start == week_start
                    && s.assigned_to == Some(profile_id)
                    && Some(s.id) != excluding
            })
            .map(Shift::duration_minutes)
            .sum()
    }

    // Availability

    /// Looks up an availability slot.
    pub fn availability(&self, id: Uuid) -> SchedulerResult<&Availability> {
        self.availabilities
            .get(&id)
            .ok_or_else(|| SchedulerError::not_found("Availability", id))
    }

    /// Inserts or replaces an availability slot.
    pub fn upsert_availability(&mut self, availability: Availability) {
        self.availabilities.insert(availability.id, availability);
    }

    /// Removes an availability slot.
    pub fn remove_availability(&mut self, id: Uuid) -> SchedulerResult<Availability> {
        self.availabilities
            .remove(&id)
            .ok_or_else(|| SchedulerError::not_found("Availability", id))
    }

    /// Returns a week's availability ordered by start time.
    pub fn availabilities_in_week(&self, week_start: NaiveDate) -> Vec<&Availability> {
        let mut slots: Vec<&Availability> = self
            .availabilities
            .values()
            .filter(|a| a.week_start == week_start)
            .collect();
        slots.sort_by_key(|a| (a.start, a.profile_id));
        slots
    }

    /// Returns true if the exact window is already recorded for the profile.
    pub fn has_availability(
        &self,
        profile_id: Uuid,
        week_start: NaiveDate,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> bool {
        self.availabilities.values().any(|a| {
            a.profile_id == profile_id && a.week_start == week_start && a.start == start && a.end == end
        })
    }

    // Swaps

    /// Looks up a swap request.
    pub fn swap(&self, id: Uuid) -> SchedulerResult<&ShiftSwapRequest> {
        self.swaps
            .get(&id)
            .ok_or_else(|| SchedulerError::not_found("Swap request", id))
    }

    /// Inserts or replaces a swap request.
    pub fn upsert_swap(&mut self, swap: ShiftSwapRequest) {
        self.swaps.insert(swap.id, swap);
    }

    /// Returns every swap request, oldest first.
    pub fn swaps(&self) -> Vec<&ShiftSwapRequest> {
        let mut swaps: Vec<&ShiftSwapRequest> = self.swaps.values().collect();
        swaps.sort_by_key(|s| s.created_at);
        swaps
    }

    // Trainings

    /// Looks up a training.
    pub fn training(&self, id: Uuid) -> SchedulerResult<&Training> {
        self.trainings
            .get(&id)
            .ok_or_else(|| SchedulerError::not_found("Training", id))
    }

    /// Looks up a training for modification.
    pub fn training_mut(&mut self, id: Uuid) -> SchedulerResult<&mut Training> {
        self.trainings
            .get_mut(&id)
            .ok_or_else(|| SchedulerError::not_found("Training", id))
    }

    /// Inserts or replaces a training.
    pub fn upsert_training(&mut self, training: Training) {
        self.trainings.insert(training.id, training);
    }

    /// Removes a training with its waitlist and cancellation requests.
    pub fn remove_training(&mut self, id: Uuid) -> SchedulerResult<Training> {
        let training = self
            .trainings
            .remove(&id)
            .ok_or_else(|| SchedulerError::not_found("Training", id))?;
        self.waitlist.retain(|e| e.training_id != id);
        self.cancellations.retain(|c| c.training_id != id);
        Ok(training)
    }

    /// Returns every training ordered by time, unscheduled last, then name.
    pub fn trainings(&self) -> Vec<&Training> {
        let mut trainings: Vec<&Training> = self.trainings.values().collect();
        trainings.sort_by(|a, b| {
            (a.time.is_none(), a.time, &a.name).cmp(&(b.time.is_none(), b.time, &b.name))
        });
        trainings
    }

    // Waitlist

    /// Looks up a waitlist entry by id.
    pub fn waitlist_entry(&self, id: Uuid) -> SchedulerResult<&WaitlistEntry> {
        self.waitlist
            .iter()
            .find(|e| e.id == id)
            .ok_or_else(|| SchedulerError::not_found("Waitlist entry", id))
    }

    /// Looks up the entry for a (training, profile) pair.
    pub fn waitlist_entry_for(&self, training_id: Uuid, profile_id: Uuid) -> Option<&WaitlistEntry> {
        self.waitlist
            .iter()
            .find(|e| e.training_id == training_id && e.profile_id == profile_id)
    }

    /// Adds a `waiting` entry at the back of the line.
    pub fn insert_waitlist_entry(
        &mut self,
        training_id: Uuid,
        profile_id: Uuid,
        now: NaiveDateTime,
    ) -> SchedulerResult<WaitlistEntry> {
        if self.waitlist_entry_for(training_id, profile_id).is_some() {
            return Err(SchedulerError::conflict(
                "That profile is already on the waitlist for this training.",
            ));
        }
        self.next_sequence += 1;
        let entry = WaitlistEntry {
            id: Uuid::new_v4(),
            training_id,
            profile_id,
            status: WaitlistStatus::Waiting,
            created_at: now,
            sequence: self.next_sequence,
        };
        self.waitlist.push(entry.clone());
        Ok(entry)
    }

    /// Removes a waitlist entry.
    pub fn remove_waitlist_entry(&mut self, id: Uuid) -> SchedulerResult<WaitlistEntry> {
        let index = self
            .waitlist
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| SchedulerError::not_found("Waitlist entry", id))?;
        Ok(self.waitlist.remove(index))
    }

    /// Changes an entry's status, refusing a second `invited` entry per training.
    pub fn set_waitlist_status(&mut self, id: Uuid, status: WaitlistStatus) -> SchedulerResult<()> {
        let training_id = self.waitlist_entry(id)?.training_id;
        if status == WaitlistStatus::Invited {
            if let Some(holder) = self.invited_entry(training_id) {
                if holder.id != id {
                    return Err(SchedulerError::conflict(
                        "Another profile already holds the invitation for this training.",
                    ));
                }
            }
        }
        if let Some(entry) = self.waitlist.iter_mut().find(|e| e.id == id) {
            entry.status = status;
        }
        Ok(())
    }

    /// Returns the entry currently holding the invitation, if any.
    pub fn invited_entry(&self, training_id: Uuid) -> Option<&WaitlistEntry> {
        self.waitlist
            .iter()
            .find(|e| e.training_id == training_id && e.status == WaitlistStatus::Invited)
    }

    /// Returns the earliest `waiting` entry.
    pub fn next_waiting(&self, training_id: Uuid) -> Option<&WaitlistEntry> {
        self.waitlist
            .iter()
            .filter(|e| e.training_id == training_id && e.status == WaitlistStatus::Waiting)
            .min_by_key(|e| (e.created_at, e.sequence))
    }

    /// Returns a training's waitlist in FIFO order.
    pub fn waitlist_for(&self, training_id: Uuid) -> Vec<&WaitlistEntry> {
        let mut entries: Vec<&WaitlistEntry> = self
            .waitlist
            .iter()
            .filter(|e| e.training_id == training_id)
            .collect();
        entries.sort_by_key(|e| (e.created_at, e.sequence));
        entries
    }

    // Training cancellation requests

    /// Looks up a cancellation request.
    pub fn cancellation(&self, id: Uuid) -> SchedulerResult<&TrainingCancellationRequest> {
        self.cancellations
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| SchedulerError::not_found("Cancellation request", id))
    }

    /// Returns the requester's pending request for a training, if any.
    pub fn pending_cancellation(
        &self,
        training_id: Uuid,
        requester: Uuid,
    ) -> Option<&TrainingCancellationRequest> {
        self.cancellations.iter().find(|c| {
            c.training_id == training_id
                && c.requester == requester
                && c.status == CancellationStatus::Pending
        })
    }

    /// Adds a pending request, refusing a duplicate (training, requester, status).
    pub fn insert_cancellation(&mut self, request: TrainingCancellationRequest) -> SchedulerResult<()> {
        let duplicate = self.cancellations.iter().any(|c| {
            c.training_id == request.training_id
                && c.requester == request.requester
                && c.status == request.status
        });
        if duplicate {
            return Err(SchedulerError::conflict(
                "A cancellation request is already awaiting approval.",
            ));
        }
        self.cancellations.push(request);
        Ok(())
    }

    /// Records a review on a pending request.
    ///
    /// An older reviewed request with the same (training, requester, status)
    /// is replaced by this one.
    pub fn review_cancellation(
        &mut self,
        id: Uuid,
        status: CancellationStatus,
        reviewer: Uuid,
        now: NaiveDateTime,
    ) -> SchedulerResult<TrainingCancellationRequest> {
        let (training_id, requester) = {
            let request = self.cancellation(id)?;
            (request.training_id, request.requester)
        };
        self.cancellations.retain(|c| {
            c.id == id
                || !(c.training_id == training_id && c.requester == requester && c.status == status)
        });
        let request = self
            .cancellations
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| SchedulerError::not_found("Cancellation request", id))?;
        request.status = status;
        request.reviewed_by = Some(reviewer);
        request.reviewed_at = Some(now);
        Ok(request.clone())
    }

    /// Returns every cancellation request, oldest first.
    pub fn cancellations(&self) -> Vec<&TrainingCancellationRequest> {
        let mut requests: Vec<&TrainingCancellationRequest> = self.cancellations.iter().collect();
        requests.sort_by_key(|c| c.created_at);
        requests
    }

    // Room reservations

    /// Looks up a reservation.
    pub fn reservation(&self, id: Uuid) -> SchedulerResult<&RoomReservation> {
        self.reservations
            .get(&id)
            .ok_or_else(|| SchedulerError::not_found("Reservation", id))
    }

    /// Inserts or replaces a reservation.
    pub fn upsert_reservation(&mut self, reservation: RoomReservation) {
        self.reservations.insert(reservation.id, reservation);
    }

    /// Returns the first non-denied reservation other than `excluding` that
    /// overlaps the window in `room`.
    pub fn overlapping_reservation(
        &self,
        room: Location,
        start: NaiveDateTime,
        end: NaiveDateTime,
        excluding: Option<Uuid>,
    ) -> Option<&RoomReservation> {
        self.reservations
            .values()
            .filter(|r| Some(r.id) != excluding)
            .find(|r| r.blocks(room, start, end))
    }

    /// Returns every reservation ordered by start time.
    pub fn reservations(&self) -> Vec<&RoomReservation> {
        let mut reservations: Vec<&RoomReservation> = self.reservations.values().collect();
        reservations.sort_by_key(|r| (r.start_time, r.room));
        reservations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    /// ST-001: ensure_week keeps the first creator.
    #[test]
    fn test_ensure_week_is_get_or_create() {
        let mut tables = Tables::default();
        let first = Uuid::new_v4();
        let monday = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();

        tables.ensure_week(monday, Some(first), now());
        tables.ensure_week(monday, Some(Uuid::new_v4()), now());

        assert_eq!(tables.existing_week(monday).unwrap().created_by, Some(first));
    }

    /// ST-002: ensure_week normalises to the Monday.
    #[test]
    fn test_ensure_week_normalises_date() {
        let mut tables = Tables::default();
        let thursday = NaiveDate::from_ymd_opt(2026, 10, 22).unwrap();
        let week = tables.ensure_week(thursday, None, now());
        assert_eq!(week.week_start, NaiveDate::from_ymd_opt(2026, 10, 19).unwrap());
    }

    /// ST-003: inserting an active semester deactivates the rest.
    #[test]
    fn test_single_active_semester() {
        let mut tables = Tables::default();
        let d = |m, day| NaiveDate::from_ymd_opt(2026, m, day).unwrap();
        tables.insert_semester(Semester::new("Spring", d(1, 12), d(5, 8), true));
        tables.insert_semester(Semester::new("Fall", d(8, 24), d(12, 18), true));

        let active: Vec<&str> = tables
            .semesters()
            .iter()
            .filter(|s| s.is_active)
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(active, vec!["Fall"]);
    }

    /// ST-004: the waitlist pair is unique.
    #[test]
    fn test_waitlist_pair_unique() {
        let mut tables = Tables::default();
        let (training, profile) = (Uuid::new_v4(), Uuid::new_v4());
        tables.insert_waitlist_entry(training, profile, now()).unwrap();
        let second = tables.insert_waitlist_entry(training, profile, now());
        assert!(matches!(second, Err(SchedulerError::Conflict { .. })));
    }

    /// ST-005: at most one invited entry per training.
    #[test]
    fn test_single_invited_entry() {
        let mut tables = Tables::default();
        let training = Uuid::new_v4();
        let a = tables.insert_waitlist_entry(training, Uuid::new_v4(), now()).unwrap();
        let b = tables.insert_waitlist_entry(training, Uuid::new_v4(), now()).unwrap();

        tables.set_waitlist_status(a.id, WaitlistStatus::Invited).unwrap();
        let result = tables.set_waitlist_status(b.id, WaitlistStatus::Invited);

        assert!(matches!(result, Err(SchedulerError::Conflict { .. })));
        assert_eq!(tables.invited_entry(training).unwrap().id, a.id);
    }

    /// ST-006: equal timestamps fall back to insertion order.
    #[test]
    fn test_next_waiting_breaks_ties_by_sequence() {
        let mut tables = Tables::default();
        let training = Uuid::new_v4();
        let first = tables.insert_waitlist_entry(training, Uuid::new_v4(), now()).unwrap();
        tables.insert_waitlist_entry(training, Uuid::new_v4(), now()).unwrap();

        assert_eq!(tables.next_waiting(training).unwrap().id, first.id);
    }

    #[test]
    fn test_assigned_minutes_excludes_edited_shift() {
        let mut tables = Tables::default();
        let member = Profile::new("alee", Role::TeamMember);
        let monday = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let make = |h: u32| Shift {
            id: Uuid::new_v4(),
            week_start: monday,
            title: "Desk".to_string(),
            location: Location::SecondHatchFront,
            start: monday.and_hms_opt(h, 0, 0).unwrap(),
            end: monday.and_hms_opt(h + 3, 0, 0).unwrap(),
            min_staffing: 1,
            assigned_to: Some(member.id),
            created_by: None,
            required_certifications: Default::default(),
            notes: None,
        };
        let a = make(9);
        let b = make(13);
        let a_id = a.id;
        tables.upsert_shift(a);
        tables.upsert_shift(b);

        assert_eq!(tables.assigned_minutes(member.id, monday, None), 360);
        assert_eq!(tables.assigned_minutes(member.id, monday, Some(a_id)), 180);
    }

    #[test]
    fn test_removing_training_cascades() {
        let mut tables = Tables::default();
        let training = Training {
            id: Uuid::new_v4(),
            name: "Laser intro".to_string(),
            machine: "Epilog".to_string(),
            level: 1,
            certification_type: None,
            time: None,
            staff: None,
            student: None,
            capacity: 1,
        };
        let id = training.id;
        tables.upsert_training(training);
        tables.insert_waitlist_entry(id, Uuid::new_v4(), now()).unwrap();

        tables.remove_training(id).unwrap();

        assert!(tables.waitlist_for(id).is_empty());
        assert!(tables.training(id).is_err());
    }
}
