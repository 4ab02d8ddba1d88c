//! Shift swap request model.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle state of a swap request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwapStatus {
    /// Awaiting staff review.
    Pending,
    /// Approved; the shift was reassigned.
    Approved,
    /// Denied by staff.
    Denied,
    /// Withdrawn by the requester.
    Cancelled,
}

impl std::fmt::Display for SwapStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SwapStatus::Pending => write!(f, "pending"),
            SwapStatus::Approved => write!(f, "approved"),
            SwapStatus::Denied => write!(f, "denied"),
            SwapStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// A request by a shift's assignee to hand it to someone else or give it up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftSwapRequest {
    /// Unique identifier for the request.
    pub id: Uuid,
    /// The shift being swapped.
    pub shift_id: Uuid,
    /// The assignee at request time.
    pub requester: Uuid,
    /// The proposed new assignee; `None` for a give-up.
    pub proposed_to: Option<Uuid>,
    /// True when the shift is relinquished without a partner.
    pub is_give_up: bool,
    /// Why the swap is requested.
    #[serde(default)]
    pub reason: Option<String>,
    /// Current state.
    pub status: SwapStatus,
    /// The staff member who reviewed it.
    pub reviewed_by: Option<Uuid>,
    /// When it was reviewed.
    pub reviewed_at: Option<NaiveDateTime>,
    /// Staff note attached at review.
    #[serde(default)]
    pub response_note: Option<String>,
    /// When it was created.
    pub created_at: NaiveDateTime,
}

impl ShiftSwapRequest {
    /// Returns true while the request awaits review.
    pub fn is_pending(&self) -> bool {
        self.status == SwapStatus::Pending
    }
}

/// Input for a swap request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapProposal {
    /// The proposed partner, if any.
    #[serde(default)]
    pub proposed_to: Option<Uuid>,
    /// Give the shift up without a partner.
    #[serde(default)]
    pub is_give_up: bool,
    /// Why the swap is requested.
    #[serde(default)]
    pub reason: Option<String>,
}

impl SwapProposal {
    /// A swap to a named partner.
    pub fn to(partner: Uuid) -> Self {
        Self {
            proposed_to: Some(partner),
            is_give_up: false,
            reason: None,
        }
    }

    /// A give-up with no partner.
    pub fn give_up() -> Self {
        Self {
            proposed_to: None,
            is_give_up: true,
            reason: None,
        }
    }
}
