//! Weekly scheduling and training-booking engine for a maker space.
//!
//! This crate validates and coordinates a week's shifts, availability
//! submissions, swap requests and single-seat training bookings, and
//! releases them to members through a draft/published lifecycle.

#![warn(missing_docs)]

pub mod activity;
pub mod api;
pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod policy;
pub mod store;
