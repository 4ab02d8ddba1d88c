//! User-facing outcome messages.
//!
//! Operations never print; they return an [`Outcome`] carrying the value
//! plus any [`Notice`]s the caller should display.

use serde::{Deserialize, Serialize};

use crate::error::SchedulerError;

/// How a notice should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// The requested change was applied.
    Success,
    /// Neutral information, e.g. a no-op or a side effect.
    Info,
    /// Applied, but something needs attention.
    Warning,
    /// The request was rejected.
    Error,
}

/// A human-readable message with a severity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    /// Presentation level.
    pub severity: Severity,
    /// The message text.
    pub text: String,
}

impl Notice {
    /// Creates a notice.
    pub fn new(severity: Severity, text: impl Into<String>) -> Self {
        Self {
            severity,
            text: text.into(),
        }
    }
}

impl From<&SchedulerError> for Notice {
    fn from(error: &SchedulerError) -> Self {
        Notice::new(Severity::Error, error.message())
    }
}

/// The result value of an operation plus its messages.
///
/// # Example
///
/// ```
/// use makerspace_scheduler::models::{Outcome, Severity};
///
/// let outcome = Outcome::new(3).success("Applied to 3 future week(s).");
/// assert_eq!(outcome.value, 3);
/// assert_eq!(outcome.notices[0].severity, Severity::Success);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome<T> {
    /// The operation's result.
    pub value: T,
    /// Messages for the caller, in the order they were produced.
    pub notices: Vec<Notice>,
}

impl<T> Outcome<T> {
    /// Wraps a value with no notices.
    pub fn new(value: T) -> Self {
        Self {
            value,
            notices: Vec::new(),
        }
    }

    /// Appends a notice.
    pub fn with(mut self, severity: Severity, text: impl Into<String>) -> Self {
        self.notices.push(Notice::new(severity, text));
        self
    }

    /// Appends a success notice.
    pub fn success(self, text: impl Into<String>) -> Self {
        self.with(Severity::Success, text)
    }

    /// Appends an info notice.
    pub fn info(self, text: impl Into<String>) -> Self {
        self.with(Severity::Info, text)
    }

    /// Returns true if any notice contains `needle`.
    pub fn mentions(&self, needle: &str) -> bool {
        self.notices.iter().any(|n| n.text.contains(needle))
    }

    /// Maps the value, keeping the notices.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        Outcome {
            value: f(self.value),
            notices: self.notices,
        }
    }
}
