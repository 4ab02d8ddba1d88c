//! Training, waitlist and cancellation-request models.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::week::week_start_for;

/// A bookable single-seat training session on a machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Training {
    /// Unique identifier for the training.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// The machine being taught.
    pub machine: String,
    /// Certification level the session grants (1 through 3).
    pub level: u8,
    /// The certification track, if the session belongs to one.
    #[serde(default)]
    pub certification_type: Option<String>,
    /// Scheduled time; `None` for the open signup pool.
    #[serde(default)]
    pub time: Option<NaiveDateTime>,
    /// The staff leader, if assigned.
    #[serde(default)]
    pub staff: Option<Uuid>,
    /// The booked student, if any.
    #[serde(default)]
    pub student: Option<Uuid>,
    /// Seat count. Only the default of 1 is honoured.
    pub capacity: u32,
}

impl Training {
    /// Returns true when the seat is taken.
    pub fn is_full(&self) -> bool {
        self.student.is_some()
    }

    /// Returns the week the training falls in, derived from its time.
    pub fn week_start(&self) -> Option<NaiveDate> {
        self.time.map(week_start_for)
    }

    /// Returns the prerequisite label for a level, e.g. "Electronics level 1".
    pub fn prerequisite_label(&self, level: u8) -> String {
        match &self.certification_type {
            Some(track) => format!("{} level {}", track, level),
            None => format!("level {}", level),
        }
    }
}

/// Input for creating a training.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingDraft {
    /// Display name.
    pub name: String,
    /// The machine being taught.
    pub machine: String,
    /// Certification level (1 through 3).
    pub level: u8,
    /// The certification track, if any.
    #[serde(default)]
    pub certification_type: Option<String>,
    /// Scheduled time, if any.
    #[serde(default)]
    pub time: Option<NaiveDateTime>,
    /// The staff leader, if any.
    #[serde(default)]
    pub staff: Option<Uuid>,
}

impl TrainingDraft {
    /// Creates an unscheduled draft with no track or leader.
    pub fn new(name: impl Into<String>, machine: impl Into<String>, level: u8) -> Self {
        Self {
            name: name.into(),
            machine: machine.into(),
            level,
            certification_type: None,
            time: None,
            staff: None,
        }
    }
}

/// State of a waitlist entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaitlistStatus {
    /// In line.
    Waiting,
    /// Holding the seat until they accept or decline.
    Invited,
    /// Took the seat.
    Accepted,
    /// Turned the seat down.
    Declined,
}

/// A profile's place in line for a training.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitlistEntry {
    /// Unique identifier for the entry.
    pub id: Uuid,
    /// The training.
    pub training_id: Uuid,
    /// The waiting profile.
    pub profile_id: Uuid,
    /// Current state.
    pub status: WaitlistStatus,
    /// When the entry was created.
    pub created_at: NaiveDateTime,
    /// Insertion order, breaking ties between equal `created_at` values.
    pub sequence: u64,
}

/// The invitee's answer to a waitlist invitation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvitationResponse {
    /// Take the seat.
    Accept,
    /// Turn it down and pass it on.
    Decline,
}

/// State of a training cancellation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CancellationStatus {
    /// Awaiting staff review.
    Pending,
    /// Approved; the seat was released.
    Approved,
    /// Denied; the booking stands.
    Denied,
}

/// A student's request to drop a staffed, scheduled training.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingCancellationRequest {
    /// Unique identifier for the request.
    pub id: Uuid,
    /// The training.
    pub training_id: Uuid,
    /// The booked student.
    pub requester: Uuid,
    /// Why they want to drop.
    #[serde(default)]
    pub reason: Option<String>,
    /// Current state.
    pub status: CancellationStatus,
    /// The staff member who reviewed it.
    pub reviewed_by: Option<Uuid>,
    /// When it was reviewed.
    pub reviewed_at: Option<NaiveDateTime>,
    /// When it was created.
    pub created_at: NaiveDateTime,
}
