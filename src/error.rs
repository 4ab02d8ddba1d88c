//! Error types for the scheduling engine.
//!
//! Every engine operation returns [`SchedulerResult`]. The variants follow
//! the four recoverable kinds surfaced to callers (validation, permission,
//! not found, conflict) plus the startup and storage failures.

use thiserror::Error;

/// The main error type for the scheduling engine.
///
/// # Example
///
/// ```
/// use makerspace_scheduler::error::SchedulerError;
///
/// let error = SchedulerError::NotFound {
///     entity: "Shift".to_string(),
///     id: "42".to_string(),
/// };
/// assert_eq!(error.to_string(), "Shift not found: 42");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulerError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed or failed validation.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// User input or current state does not satisfy a scheduling rule.
    #[error("{message}")]
    Validation {
        /// The input field the message belongs to, if any.
        field: Option<String>,
        /// The user-facing message.
        message: String,
    },

    /// The acting profile's role does not allow the action.
    #[error("Permission denied: {message}")]
    PermissionDenied {
        /// What was refused.
        message: String,
    },

    /// A referenced entity does not exist or is not under the expected parent.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of entity (e.g. "Shift").
        entity: String,
        /// The identifier that was looked up.
        id: String,
    },

    /// Re-validation at commit time failed because state changed underneath
    /// the request, or a uniqueness constraint would be violated.
    #[error("{message}")]
    Conflict {
        /// The specific rule that was violated.
        message: String,
    },

    /// The backing store could not be accessed.
    #[error("Storage failure: {message}")]
    Storage {
        /// A description of the failure.
        message: String,
    },
}

impl SchedulerError {
    /// Builds a global (non-field) validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            field: None,
            message: message.into(),
        }
    }

    /// Builds a validation error attached to an input field.
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: Some(field.into()),
            message: message.into(),
        }
    }

    /// Builds a permission error.
    pub fn permission(message: impl Into<String>) -> Self {
        Self::PermissionDenied {
            message: message.into(),
        }
    }

    /// Builds a not-found error for an entity kind and id.
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Builds a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Turns a validation failure into a conflict, keeping the message.
    ///
    /// Used when a rule that held at request time fails at approval time.
    pub fn into_conflict(self) -> Self {
        match self {
            Self::Validation { message, .. } => Self::Conflict { message },
            other => other,
        }
    }

    /// Returns the user-facing message without any prefix.
    pub fn message(&self) -> String {
        match self {
            Self::Validation { message, .. }
            | Self::PermissionDenied { message }
            | Self::Conflict { message }
            | Self::Storage { message } => message.clone(),
            other => other.to_string(),
        }
    }
}

/// A type alias for Results that return SchedulerError.
pub type SchedulerResult<T> = Result<T, SchedulerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_displays_path() {
        let error = SchedulerError::ConfigNotFound {
            path: "/missing/scheduler.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/scheduler.yaml"
        );
    }

    #[test]
    fn test_config_parse_error_displays_path_and_message() {
        let error = SchedulerError::ConfigParseError {
            path: "/config/calendar.yaml".to_string(),
            message: "invalid YAML syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration file '/config/calendar.yaml': invalid YAML syntax"
        );
    }

    #[test]
    fn test_validation_displays_bare_message() {
        let error = SchedulerError::field("end", "End must be after start time.");
        assert_eq!(error.to_string(), "End must be after start time.");
        match error {
            SchedulerError::Validation { field, .. } => assert_eq!(field.as_deref(), Some("end")),
            _ => panic!("Expected Validation error"),
        }
    }

    #[test]
    fn test_permission_denied_is_prefixed() {
        let error = SchedulerError::permission("only staff can publish schedules");
        assert_eq!(
            error.to_string(),
            "Permission denied: only staff can publish schedules"
        );
        assert_eq!(error.message(), "only staff can publish schedules");
    }

    #[test]
    fn test_into_conflict_keeps_message() {
        let error = SchedulerError::field(
            "assigned_to",
            "Sam Lee would exceed 20 hours for this week.",
        )
        .into_conflict();
        assert_eq!(
            error,
            SchedulerError::Conflict {
                message: "Sam Lee would exceed 20 hours for this week.".to_string()
            }
        );
    }

    #[test]
    fn test_into_conflict_leaves_other_kinds_alone() {
        let error = SchedulerError::not_found("Shift", 7).into_conflict();
        assert_eq!(error.to_string(), "Shift not found: 7");
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<SchedulerError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_conflict() -> SchedulerResult<()> {
            Err(SchedulerError::conflict("seat taken"))
        }

        fn propagates_error() -> SchedulerResult<()> {
            returns_conflict()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
