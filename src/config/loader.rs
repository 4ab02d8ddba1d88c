//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the engine
//! settings and calendar from YAML files.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::error::{SchedulerError, SchedulerResult};
use crate::models::Semester;

use super::types::{CalendarConfig, SchedulerConfig, SchedulerSettings, SemesterConfig};

/// Loads and validates scheduling configuration.
///
/// # Directory Structure
///
/// ```text
/// config/default/
/// ├── scheduler.yaml   # Weekly hour cap and timezone label
/// └── calendar.yaml    # Semesters with open hours and holidays
/// ```
///
/// # Example
///
/// ```no_run
/// use makerspace_scheduler::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/default")?;
/// for semester in loader.semesters() {
///     println!("{} ({} - {})", semester.name, semester.start_date, semester.end_date);
/// }
/// # Ok::<(), makerspace_scheduler::error::SchedulerError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: SchedulerConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// Returns an error if either file is missing, contains invalid YAML,
    /// or describes an inconsistent calendar.
    pub fn load<P: AsRef<Path>>(path: P) -> SchedulerResult<Self> {
        let path = path.as_ref();

        let settings = Self::load_yaml::<SchedulerSettings>(&path.join("scheduler.yaml"))?;

        let calendar_path = path.join("calendar.yaml");
        let calendar = Self::load_yaml::<CalendarConfig>(&calendar_path)?;
        Self::validate_calendar(&calendar).map_err(|message| {
            SchedulerError::ConfigParseError {
                path: calendar_path.display().to_string(),
                message,
            }
        })?;

        Ok(Self {
            config: SchedulerConfig::new(settings, calendar),
        })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> SchedulerResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| SchedulerError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| SchedulerError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Checks the calendar for inconsistencies the store would reject.
    fn validate_calendar(calendar: &CalendarConfig) -> Result<(), String> {
        let active = calendar.semesters.iter().filter(|s| s.is_active).count();
        if active > 1 {
            return Err(format!(
                "{} semesters are marked active; at most one may be",
                active
            ));
        }
        calendar.semesters.iter().try_for_each(Self::validate_semester)
    }

    fn validate_semester(semester: &SemesterConfig) -> Result<(), String> {
        if semester.end_date < semester.start_date {
            return Err(format!(
                "semester '{}' ends before it starts",
                semester.name
            ));
        }

        let mut windows = HashSet::new();
        for window in &semester.open_hours {
            if window.close_time <= window.open_time {
                return Err(format!(
                    "semester '{}': close time must be after open time on {}",
                    semester.name, window.weekday
                ));
            }
            if !windows.insert((window.weekday, window.open_time, window.close_time)) {
                return Err(format!(
                    "semester '{}': duplicate open-hour window on {}",
                    semester.name, window.weekday
                ));
            }
        }

        let mut dates = HashSet::new();
        for holiday in &semester.holidays {
            if holiday.date < semester.start_date || holiday.date > semester.end_date {
                return Err(format!(
                    "semester '{}': holiday '{}' on {} is outside the semester",
                    semester.name, holiday.name, holiday.date
                ));
            }
            if !dates.insert(holiday.date) {
                return Err(format!(
                    "semester '{}': more than one holiday on {}",
                    semester.name, holiday.date
                ));
            }
        }
        Ok(())
    }

    /// Returns the underlying configuration.
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Returns the engine settings.
    pub fn settings(&self) -> &SchedulerSettings {
        self.config.settings()
    }

    /// Builds the semester records described by the calendar.
    pub fn semesters(&self) -> Vec<Semester> {
        self.config.semesters()
    }

    /// Consumes the loader, returning the configuration.
    pub fn into_config(self) -> SchedulerConfig {
        self.config
    }
}
