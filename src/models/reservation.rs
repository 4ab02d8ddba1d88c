//! Room reservation model.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::shift::Location;

/// Review state of a room reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    /// Awaiting staff review. Still blocks the room.
    Pending,
    /// Approved.
    Approved,
    /// Denied; no longer blocks the room.
    Denied,
}

/// A request to book a room for a class or organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomReservation {
    /// Unique identifier for the reservation.
    pub id: Uuid,
    /// The requesting profile.
    pub requester: Uuid,
    /// The room.
    pub room: Location,
    /// Start of the booking.
    pub start_time: NaiveDateTime,
    /// End of the booking (same day as the start).
    pub end_time: NaiveDateTime,
    /// Class or organization the room is for.
    pub affiliation: String,
    /// The requester needs the room to themselves.
    pub is_exclusive_request: bool,
    /// Review state.
    pub status: ReservationStatus,
    /// The staff member who reviewed it.
    pub reviewed_by: Option<Uuid>,
    /// When it was reviewed.
    pub reviewed_at: Option<NaiveDateTime>,
    /// When it was requested.
    pub created_at: NaiveDateTime,
}

impl RoomReservation {
    /// Returns true if this reservation blocks `[start, end)` in `room`.
    pub fn blocks(&self, room: Location, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        self.status != ReservationStatus::Denied
            && self.room == room
            && self.start_time < end
            && self.end_time > start
    }
}

/// Input for a room reservation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationDraft {
    /// The room.
    pub room: Location,
    /// Start of the booking.
    pub start_time: NaiveDateTime,
    /// End of the booking.
    pub end_time: NaiveDateTime,
    /// Class or organization.
    pub affiliation: String,
    /// Exclusive use requested.
    #[serde(default)]
    pub is_exclusive_request: bool,
}
