use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::resource::{Entity, ResourceId};

/// Lifecycle state of a trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrialStatus {
    Planned,
    Active,
    Suspended,
    Completed,
}

impl TrialStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TrialStatus::Planned => "Planned",
            TrialStatus::Active => "Active",
            TrialStatus::Suspended => "Suspended",
            TrialStatus::Completed => "Completed",
        }
    }
}

/// A clinical trial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trial {
    pub id: String,
    pub title: String,
    /// Protocol number assigned by the sponsor.
    pub protocol: String,
    pub phase: String,
    pub status: TrialStatus,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
}

impl Entity for Trial {
    const RESOURCE: &'static str = "trials";

    fn id(&self) -> ResourceId {
        ResourceId::from(self.id.as_str())
    }
}

/// A site running one trial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Site {
    pub id: String,
    pub trial_id: String,
    pub name: String,
    /// ISO 3166-1 alpha-2 country code.
    pub country: String,
    #[serde(default)]
    pub principal_investigator: Option<String>,
}

impl Entity for Site {
    const RESOURCE: &'static str = "sites";

    fn id(&self) -> ResourceId {
        ResourceId::from(self.id.as_str())
    }
}

/// Participation state of a patient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PatientStatus {
    Screening,
    Enrolled,
    Withdrawn,
    Completed,
}

/// A trial participant, identified outside the system only by subject code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: String,
    pub trial_id: String,
    pub site_id: String,
    pub subject_code: String,
    pub status: PatientStatus,
    #[serde(default)]
    pub enrolled_on: Option<NaiveDate>,
}

impl Entity for Patient {
    const RESOURCE: &'static str = "patients";

    fn id(&self) -> ResourceId {
        ResourceId::from(self.id.as_str())
    }
}

/// Severity grading of an adverse event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Mild,
    Moderate,
    Severe,
    LifeThreatening,
}

/// An adverse event reported for a patient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdverseEvent {
    pub id: String,
    pub patient_id: String,
    pub description: String,
    pub severity: Severity,
    pub onset_date: NaiveDate,
    #[serde(default)]
    pub resolved: bool,
}

impl AdverseEvent {
    /// Severe and life-threatening events require expedited reporting.
    pub fn is_serious(&self) -> bool {
        self.severity >= Severity::Severe
    }
}

impl Entity for AdverseEvent {
    const RESOURCE: &'static str = "adverse-events";

    fn id(&self) -> ResourceId {
        ResourceId::from(self.id.as_str())
    }
}

/// A GDPR consent record for one processing purpose.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Consent {
    pub id: String,
    pub patient_id: String,
    pub purpose: String,
    pub granted_at: DateTime<Utc>,
    #[serde(default)]
    pub withdrawn_at: Option<DateTime<Utc>>,
}

impl Consent {
    /// Returns true if consent was given and not withdrawn as of `at`.
    pub fn is_active_at(&self, at: DateTime<Utc>) -> bool {
        self.granted_at <= at && self.withdrawn_at.is_none_or(|withdrawn| withdrawn > at)
    }
}

impl Entity for Consent {
    const RESOURCE: &'static str = "consents";

    fn id(&self) -> ResourceId {
        ResourceId::from(self.id.as_str())
    }
}

/// Outcome state of a site audit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuditStatus {
    Scheduled,
    InProgress,
    Closed,
}

/// A monitoring audit of a site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Audit {
    pub id: String,
    pub site_id: String,
    pub auditor: String,
    pub scheduled_for: NaiveDate,
    pub status: AuditStatus,
    #[serde(default)]
    pub findings: Option<String>,
}

impl Entity for Audit {
    const RESOURCE: &'static str = "audits";

    fn id(&self) -> ResourceId {
        ResourceId::from(self.id.as_str())
    }
}

/// Role of a back-office user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserRole {
    Admin,
    Investigator,
    Monitor,
    DataManager,
}

/// A back-office user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
}

impl Entity for User {
    const RESOURCE: &'static str = "users";

    fn id(&self) -> ResourceId {
        ResourceId::from(self.id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_patient_wire_format() {
        let patient: Patient = serde_json::from_value(json!({
            "id": "p-1",
            "trialId": "t-1",
            "siteId": "s-1",
            "subjectCode": "SUBJ-001",
            "status": "Enrolled"
        }))
        .unwrap();

        assert_eq!(patient.enrolled_on, None);
        assert_eq!(patient.id(), ResourceId::from("p-1"));
        assert_eq!(Patient::RESOURCE, "patients");
        assert_eq!(Patient::ID_FIELD, "id");
    }

    #[test]
    fn test_adverse_event_seriousness() {
        let mut event = AdverseEvent {
            id: "ae-1".to_string(),
            patient_id: "p-1".to_string(),
            description: "Headache".to_string(),
            severity: Severity::Moderate,
            onset_date: NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
            resolved: false,
        };
        assert!(!event.is_serious());

        event.severity = Severity::LifeThreatening;
        assert!(event.is_serious());
    }

    #[test]
    fn test_consent_activity_window() {
        let granted = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let withdrawn = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let consent = Consent {
            id: "c-1".to_string(),
            patient_id: "p-1".to_string(),
            purpose: "genomic-analysis".to_string(),
            granted_at: granted,
            withdrawn_at: Some(withdrawn),
        };

        let before = Utc.with_ymd_and_hms(2023, 12, 31, 0, 0, 0).unwrap();
        let during = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        assert!(!consent.is_active_at(before));
        assert!(consent.is_active_at(during));
        assert!(!consent.is_active_at(withdrawn));
    }

    #[test]
    fn test_trial_status_round_trips_as_text() {
        assert_eq!(
            serde_json::to_value(TrialStatus::Active).unwrap(),
            json!(TrialStatus::Active.as_str())
        );
    }
}
