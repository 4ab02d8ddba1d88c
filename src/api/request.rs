//! Request types for the scheduling API.
//!
//! Shift, availability, training and reservation bodies deserialize
//! straight into the engine's draft types. The types here cover the
//! remaining bodies and the profile sync from the identity provider.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Certification, InvitationResponse, Profile, ReservationStatus, Role};

/// A profile pushed by the identity provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileRequest {
    /// Profile id; generated when absent.
    #[serde(default)]
    pub id: Option<Uuid>,
    /// Login name.
    pub username: String,
    /// First name.
    #[serde(default)]
    pub first_name: Option<String>,
    /// Last name.
    #[serde(default)]
    pub last_name: Option<String>,
    /// Role.
    pub role: Role,
    /// Certifications already held.
    #[serde(default)]
    pub certifications: Vec<Certification>,
}

impl From<ProfileRequest> for Profile {
    fn from(req: ProfileRequest) -> Self {
        let mut profile = Profile::new(req.username, req.role);
        if let Some(id) = req.id {
            profile.id = id;
        }
        profile.first_name = req.first_name;
        profile.last_name = req.last_name;
        profile.certifications = req.certifications;
        profile
    }
}

/// An optional reviewer note.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReviewNoteRequest {
    /// Note shown to the requester.
    #[serde(default)]
    pub note: Option<String>,
}

/// An optional reason for dropping a training.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CancelTrainingRequest {
    /// Why the student is dropping.
    #[serde(default)]
    pub reason: Option<String>,
}

/// The invitee's answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvitationRequest {
    /// Accept or decline.
    pub response: InvitationResponse,
}

/// A staff decision on a room reservation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationReviewRequest {
    /// The new status.
    pub status: ReservationStatus,
}
