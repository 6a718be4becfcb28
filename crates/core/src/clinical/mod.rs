//! Clinical-trial domain types.

mod types;

pub use types::{
    AdverseEvent, Audit, AuditStatus, Consent, Patient, PatientStatus, Severity, Site, Trial,
    TrialStatus, User, UserRole,
};
