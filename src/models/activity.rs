//! Activity log entries.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The area an activity belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityAction {
    /// Training bookings and waitlist changes.
    Booking,
    /// Certification grants and revocations.
    Certification,
    /// Room reservations.
    Reservation,
    /// Training sessions themselves.
    Training,
    /// Weeks, shifts, availability and swaps.
    Schedule,
    /// Anything else.
    Other,
}

/// One line of the audit trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEntry {
    /// The acting profile.
    pub actor: Uuid,
    /// The area.
    pub action: ActivityAction,
    /// What happened, in words.
    pub description: String,
    /// When it happened.
    pub created_at: NaiveDateTime,
}
