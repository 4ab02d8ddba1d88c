//! Granting and revoking certifications.

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::error::{SchedulerError, SchedulerResult};
use crate::models::{ActivityAction, Capability, Certification, Outcome, Profile, Role, Severity};

use super::{Scheduler, logged};

/// One certification to grant: a track at a level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificationSpec {
    /// The track, e.g. "Electronics".
    pub certification_type: String,
    /// The level, 1 through 3.
    pub level: u8,
}

impl CertificationSpec {
    /// Creates a spec.
    pub fn new(certification_type: impl Into<String>, level: u8) -> Self {
        Self {
            certification_type: certification_type.into(),
            level,
        }
    }

    fn label(&self) -> String {
        format!("{} - Level {}", self.certification_type, self.level)
    }
}

/// A batch of certifications for one profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificationGrant {
    /// The profile being certified.
    pub profile_id: Uuid,
    /// What to grant.
    pub certifications: Vec<CertificationSpec>,
}

impl Scheduler {
    /// Grants certifications, skipping any the profile already holds.
    pub fn grant_certifications(
        &self,
        actor: Uuid,
        grant: CertificationGrant,
    ) -> SchedulerResult<Outcome<Profile>> {
        let now = self.now();
        let result = self.store.transaction(|tables| {
            tables
                .profile(actor)?
                .require(Capability::ManageCertifications, "grant certifications")?;
            if grant.certifications.is_empty() {
                return Err(SchedulerError::field(
                    "certifications",
                    "Please select at least one certification first.",
                ));
            }
            let profile = tables.profile_mut(grant.profile_id)?;
            if !matches!(profile.role, Role::Student | Role::TeamMember) {
                return Err(SchedulerError::field(
                    "profile_id",
                    "Certifications can only be granted to students and team members.",
                ));
            }

            let mut granted = Vec::new();
            let mut skipped = Vec::new();
            for spec in &grant.certifications {
                let track = spec.certification_type.trim();
                if track.is_empty() {
                    return Err(SchedulerError::field(
                        "certification_type",
                        "Certification type is required.",
                    ));
                }
                if !(1..=3).contains(&spec.level) {
                    return Err(SchedulerError::field("level", "Level must be between 1 and 3."));
                }
                let spec = CertificationSpec::new(track, spec.level);
                let held = profile
                    .certifications
                    .iter()
                    .any(|c| c.certification_type == spec.certification_type && c.level == spec.level);
                if held || granted.contains(&spec) {
                    skipped.push(spec);
                    continue;
                }
                profile.certifications.push(Certification {
                    id: Uuid::new_v4(),
                    certification_type: spec.certification_type.clone(),
                    level: spec.level,
                    granted_at: now,
                });
                granted.push(spec);
            }

            let name = profile.full_name();
            let list = |specs: &[CertificationSpec]| {
                specs.iter().map(CertificationSpec::label).collect::<Vec<_>>().join(", ")
            };
            let mut outcome = Outcome::new(profile.clone());
            if !granted.is_empty() {
                outcome = outcome.success(format!("Certified {} with: {}", name, list(&granted)));
            }
            if !skipped.is_empty() {
                outcome = outcome.with(
                    Severity::Warning,
                    format!("{} already had: {}", name, list(&skipped)),
                );
            }
            Ok(outcome)
        });
        if let Ok(outcome) = &result {
            info!(
                profile_id = %grant.profile_id,
                held = outcome.value.certifications.len(),
                "Certifications granted"
            );
            self.record(
                actor,
                ActivityAction::Certification,
                format!("Certified {}", outcome.value.full_name()),
            );
        }
        logged("grant_certifications", actor, result)
    }

    /// Removes one certification record from a profile.
    pub fn revoke_certification(
        &self,
        actor: Uuid,
        profile_id: Uuid,
        certification_id: Uuid,
    ) -> SchedulerResult<Outcome<Certification>> {
        let result = self.store.transaction(|tables| {
            tables
                .profile(actor)?
                .require(Capability::ManageCertifications, "revoke certifications")?;
            let profile = tables.profile_mut(profile_id)?;
            let index = profile
                .certifications
                .iter()
                .position(|c| c.id == certification_id)
                .ok_or_else(|| SchedulerError::not_found("Certification", certification_id))?;
            let removed = profile.certifications.remove(index);
            let text = format!(
                "Removed {} - Level {} from {}.",
                removed.certification_type,
                removed.level,
                profile.full_name()
            );
            Ok(Outcome::new(removed).success(text))
        });
        if result.is_ok() {
            info!(profile_id = %profile_id, certification_id = %certification_id, "Certification revoked");
            self.record(
                actor,
                ActivityAction::Certification,
                format!("Revoked certification {}", certification_id),
            );
        }
        logged("revoke_certification", actor, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (Scheduler, Profile, Profile) {
        let scheduler = Scheduler::new();
        let staff = scheduler.register_profile(Profile::new("boss", Role::Staff)).unwrap();
        let student = scheduler
            .register_profile(Profile::new("jdoe", Role::Student).with_name("Jo", "Doe"))
            .unwrap();
        (scheduler, staff, student)
    }

    /// CE-001: new certifications are listed, held ones warned about.
    #[test]
    fn test_grant_skips_duplicates() {
        let (scheduler, staff, student) = setup();
        scheduler
            .grant_certifications(
                staff.id,
                CertificationGrant {
                    profile_id: student.id,
                    certifications: vec![CertificationSpec::new("Electronics", 1)],
                },
            )
            .unwrap();

        let outcome = scheduler
            .grant_certifications(
                staff.id,
                CertificationGrant {
                    profile_id: student.id,
                    certifications: vec![
                        CertificationSpec::new("Electronics", 1),
                        CertificationSpec::new("Woodworking", 2),
                    ],
                },
            )
            .unwrap();

        assert_eq!(outcome.value.certifications.len(), 2);
        assert_eq!(outcome.notices[0].text, "Certified Jo Doe with: Woodworking - Level 2");
        assert_eq!(outcome.notices[1].severity, Severity::Warning);
        assert_eq!(outcome.notices[1].text, "Jo Doe already had: Electronics - Level 1");
    }

    /// CE-002: an empty batch is rejected.
    #[test]
    fn test_empty_grant_rejected() {
        let (scheduler, staff, student) = setup();
        let result = scheduler.grant_certifications(
            staff.id,
            CertificationGrant {
                profile_id: student.id,
                certifications: Vec::new(),
            },
        );
        match result {
            Err(SchedulerError::Validation { message, .. }) => {
                assert_eq!(message, "Please select at least one certification first.")
            }
            other => panic!("Expected Validation, got {:?}", other),
        }
    }

    /// CE-003: staff cannot be certified and levels are bounded.
    #[test]
    fn test_target_and_level_checked() {
        let (scheduler, staff, student) = setup();
        let to_staff = scheduler.grant_certifications(
            staff.id,
            CertificationGrant {
                profile_id: staff.id,
                certifications: vec![CertificationSpec::new("Electronics", 1)],
            },
        );
        assert!(matches!(to_staff, Err(SchedulerError::Validation { .. })));

        let level_four = scheduler.grant_certifications(
            staff.id,
            CertificationGrant {
                profile_id: student.id,
                certifications: vec![CertificationSpec::new("Electronics", 4)],
            },
        );
        assert!(matches!(level_four, Err(SchedulerError::Validation { .. })));
    }

    /// CE-004: revoking removes the record.
    #[test]
    fn test_revoke() {
        let (scheduler, staff, student) = setup();
        let profile = scheduler
            .grant_certifications(
                staff.id,
                CertificationGrant {
                    profile_id: student.id,
                    certifications: vec![CertificationSpec::new("Electronics", 1)],
                },
            )
            .unwrap()
            .value;
        let cert_id = profile.certifications[0].id;

        scheduler.revoke_certification(staff.id, student.id, cert_id).unwrap();
        assert!(scheduler.profile(student.id).unwrap().certifications.is_empty());
    }

    /// CE-005: students cannot grant.
    #[test]
    fn test_student_cannot_grant() {
        let (scheduler, _, student) = setup();
        let result = scheduler.grant_certifications(
            student.id,
            CertificationGrant {
                profile_id: student.id,
                certifications: vec![CertificationSpec::new("Electronics", 1)],
            },
        );
        assert!(matches!(result, Err(SchedulerError::PermissionDenied { .. })));
    }
}
