//! Profile, role and capability models.
//!
//! Profiles come from the identity provider; the engine only reads their
//! role and certifications. Roles map to a fixed capability set once, in
//! [`Role::capabilities`], so operations ask "can this profile do X" rather
//! than comparing role names.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{SchedulerError, SchedulerResult};

/// The role a profile holds in the maker space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// A student using the space and booking trainings.
    Student,
    /// A staff member who builds and publishes schedules.
    Staff,
    /// An administrator.
    Admin,
    /// A student worker on the team; subject to the weekly hour cap.
    TeamMember,
}

/// A named permission derived from a [`Role`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Publish or unpublish a schedule week.
    PublishSchedule,
    /// Create, edit and delete shifts and week-scoped trainings.
    EditSchedule,
    /// See shifts and trainings of unpublished weeks.
    ViewDraftSchedules,
    /// Approve or deny shift swap requests.
    ModerateSwaps,
    /// Approve or deny training cancellation requests.
    ModerateCancellations,
    /// Manage semesters, open hours and holidays.
    ManageCalendar,
    /// Grant and revoke certifications.
    ManageCertifications,
    /// Exempt from the weekly hour cap when assigned shifts.
    BypassHourCap,
    /// Submit availability and request swaps.
    SubmitAvailability,
    /// Sign up for trainings.
    BookTraining,
    /// Approve or deny room reservations.
    ReviewReservations,
}

const STUDENT_CAPABILITIES: &[Capability] = &[Capability::BypassHourCap, Capability::BookTraining];

const TEAM_MEMBER_CAPABILITIES: &[Capability] =
    &[Capability::SubmitAvailability, Capability::BookTraining];

const STAFF_CAPABILITIES: &[Capability] = &[
    Capability::PublishSchedule,
    Capability::EditSchedule,
    Capability::ViewDraftSchedules,
    Capability::ModerateSwaps,
    Capability::ModerateCancellations,
    Capability::ManageCalendar,
    Capability::ManageCertifications,
    Capability::BypassHourCap,
    Capability::SubmitAvailability,
    Capability::BookTraining,
    Capability::ReviewReservations,
];

const ADMIN_CAPABILITIES: &[Capability] = &[
    Capability::PublishSchedule,
    Capability::EditSchedule,
    Capability::ViewDraftSchedules,
    Capability::ModerateSwaps,
    Capability::ModerateCancellations,
    Capability::ManageCalendar,
    Capability::ManageCertifications,
    Capability::BypassHourCap,
    Capability::SubmitAvailability,
    Capability::ReviewReservations,
];

impl Role {
    /// Returns the capability set granted to this role.
    ///
    /// # Example
    ///
    /// ```
    /// use makerspace_scheduler::models::{Capability, Role};
    ///
    /// assert!(Role::Staff.capabilities().contains(&Capability::PublishSchedule));
    /// assert!(!Role::TeamMember.capabilities().contains(&Capability::BypassHourCap));
    /// ```
    pub fn capabilities(self) -> &'static [Capability] {
        match self {
            Role::Student => STUDENT_CAPABILITIES,
            Role::TeamMember => TEAM_MEMBER_CAPABILITIES,
            Role::Staff => STAFF_CAPABILITIES,
            Role::Admin => ADMIN_CAPABILITIES,
        }
    }

    /// Returns true if the role grants the capability.
    pub fn has(self, capability: Capability) -> bool {
        self.capabilities().contains(&capability)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Student => write!(f, "student"),
            Role::Staff => write!(f, "staff"),
            Role::Admin => write!(f, "admin"),
            Role::TeamMember => write!(f, "team_member"),
        }
    }
}

/// A certification held by a profile: a track (type) at a level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certification {
    /// Unique identifier for the certification record.
    pub id: Uuid,
    /// The certification track, e.g. "Electronics".
    pub certification_type: String,
    /// The level, 1 through 3.
    pub level: u8,
    /// When the certification was granted.
    pub granted_at: NaiveDateTime,
}

/// A member of the maker space as resolved by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Unique identifier for the profile.
    pub id: Uuid,
    /// Login name, used when no display name is set.
    pub username: String,
    /// Optional first name.
    #[serde(default)]
    pub first_name: Option<String>,
    /// Optional last name.
    #[serde(default)]
    pub last_name: Option<String>,
    /// The profile's role.
    pub role: Role,
    /// Certifications held.
    #[serde(default)]
    pub certifications: Vec<Certification>,
}

impl Profile {
    /// Creates a profile with no names or certifications.
    pub fn new(username: impl Into<String>, role: Role) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            first_name: None,
            last_name: None,
            role,
            certifications: Vec::new(),
        }
    }

    /// Sets the first and last name.
    pub fn with_name(mut self, first: impl Into<String>, last: impl Into<String>) -> Self {
        self.first_name = Some(first.into());
        self.last_name = Some(last.into());
        self
    }

    /// Returns "First Last" when both names are set, otherwise the username.
    ///
    /// # Example
    ///
    /// ```
    /// use makerspace_scheduler::models::{Profile, Role};
    ///
    /// let named = Profile::new("alee", Role::TeamMember).with_name("Alex", "Lee");
    /// assert_eq!(named.full_name(), "Alex Lee");
    ///
    /// let bare = Profile::new("jdoe", Role::Student);
    /// assert_eq!(bare.full_name(), "jdoe");
    /// ```
    pub fn full_name(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) if !first.is_empty() && !last.is_empty() => {
                format!("{} {}", first, last)
            }
            _ => self.username.clone(),
        }
    }

    /// Returns true if the profile's role grants the capability.
    pub fn can(&self, capability: Capability) -> bool {
        self.role.has(capability)
    }

    /// Fails with a permission error unless the profile holds the capability.
    pub fn require(&self, capability: Capability, action: &str) -> SchedulerResult<()> {
        if self.can(capability) {
            Ok(())
        } else {
            Err(SchedulerError::permission(format!(
                "a {} cannot {}",
                self.role, action
            )))
        }
    }

    /// Returns true if the profile holds a certification at `level`,
    /// restricted to `certification_type` when one is given.
    pub fn holds_certification(&self, certification_type: Option<&str>, level: u8) -> bool {
        self.certifications.iter().any(|c| {
            c.level == level
                && certification_type.is_none_or(|t| c.certification_type == t)
        })
    }
}
