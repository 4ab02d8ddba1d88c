//! Calendar and visibility rules.
//!
//! These are pure functions over stored records. The engine re-reads
//! current state for every check; nothing here caches.

pub mod calendar;
pub mod visibility;

pub use calendar::{active_semester_for, is_holiday, within_open_hours};
pub use visibility::{can_view_drafts, shifts_visible, training_visible};
