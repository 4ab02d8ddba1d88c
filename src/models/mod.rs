//! Core data models for the scheduling engine.
//!
//! This module contains all the domain records the engine stores and the
//! input drafts and outcome types its operations exchange.

mod activity;
mod availability;
mod calendar;
mod notice;
mod profile;
mod reservation;
mod shift;
mod swap;
mod training;
mod week;

pub use activity::{ActivityAction, ActivityEntry};
pub use availability::{Availability, AvailabilityDraft};
pub use calendar::{Holiday, OpenHour, Semester};
pub use notice::{Notice, Outcome, Severity};
pub use profile::{Capability, Certification, Profile, Role};
pub use reservation::{ReservationDraft, ReservationStatus, RoomReservation};
pub use shift::{Location, Shift, ShiftDraft, minutes_to_hours};
pub use swap::{ShiftSwapRequest, SwapProposal, SwapStatus};
pub use training::{
    CancellationStatus, InvitationResponse, Training, TrainingCancellationRequest, TrainingDraft,
    WaitlistEntry, WaitlistStatus,
};
pub use week::{ScheduleWeek, WeekStatus, monday_of, week_start_for};
