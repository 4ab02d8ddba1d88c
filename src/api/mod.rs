//! HTTP API module for the scheduling engine.
//!
//! This module exposes the engine's operations as JSON endpoints. The
//! acting profile is taken from the `x-profile-id` header.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::{ACTOR_HEADER, create_router};
pub use request::{
    CancelTrainingRequest, InvitationRequest, ProfileRequest, ReservationReviewRequest,
    ReviewNoteRequest,
};
pub use response::{ApiError, ApiErrorResponse};
pub use state::AppState;
