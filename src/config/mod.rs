//! Configuration loading for the scheduling engine.
//!
//! This module loads the engine settings and the seeded academic calendar
//! (semesters, open hours and holidays) from YAML files.
//!
//! # Example
//!
//! ```no_run
//! use makerspace_scheduler::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/default").unwrap();
//! println!("Weekly cap: {} hours", config.settings().weekly_hour_cap);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    CalendarConfig, HolidayConfig, OpenHourConfig, SchedulerConfig, SchedulerSettings,
    SemesterConfig,
};
