//! Domain repositories for the clinical-trial resources.

use std::sync::Arc;

use serde_json::json;

use trialsync_core::clinical::{
    AdverseEvent, Audit, Consent, Patient, Site, Trial, TrialStatus, User,
};
use trialsync_core::resource::{AccessMode, Page, Result, Transport, TransportError};

use crate::config::Config;
use crate::repository::ResourceRepository;
use crate::transport::HttpTransport;

pub type TrialsRepository = ResourceRepository<Trial>;
pub type SitesRepository = ResourceRepository<Site>;
pub type PatientsRepository = ResourceRepository<Patient>;
pub type AdverseEventsRepository = ResourceRepository<AdverseEvent>;
pub type ConsentsRepository = ResourceRepository<Consent>;
pub type AuditsRepository = ResourceRepository<Audit>;
pub type UsersRepository = ResourceRepository<User>;

impl ResourceRepository<Trial> {
    pub async fn find_by_status(&self, status: TrialStatus, page: u32) -> Result<Page<Trial>> {
        self.find_with_filters(&json!({ "status": status.as_str(), "page": page }))
            .await
    }
}

impl ResourceRepository<Site> {
    pub async fn find_by_trial(&self, trial_id: &str, page: u32) -> Result<Page<Site>> {
        self.find_with_filters(&json!({ "trialId": trial_id, "page": page }))
            .await
    }
}

impl ResourceRepository<Patient> {
    pub async fn find_by_trial(&self, trial_id: &str, page: u32) -> Result<Page<Patient>> {
        self.find_with_filters(&json!({ "trialId": trial_id, "page": page }))
            .await
    }
}

impl ResourceRepository<AdverseEvent> {
    pub async fn find_by_patient(
        &self,
        patient_id: &str,
        page: u32,
    ) -> Result<Page<AdverseEvent>> {
        self.find_with_filters(&json!({ "patientId": patient_id, "page": page }))
            .await
    }
}

/// Every domain repository over one shared transport.
///
/// Audits and users use the cached stack; the other resources also retry.
pub struct Repositories {
    pub trials: TrialsRepository,
    pub sites: SitesRepository,
    pub patients: PatientsRepository,
    pub adverse_events: AdverseEventsRepository,
    pub consents: ConsentsRepository,
    pub audits: AuditsRepository,
    pub users: UsersRepository,
}

impl Repositories {
    pub fn new(transport: Arc<dyn Transport>, config: &Config) -> Self {
        Self {
            trials: ResourceRepository::new(transport.clone(), config, AccessMode::Resilient),
            sites: ResourceRepository::new(transport.clone(), config, AccessMode::Resilient),
            patients: ResourceRepository::new(transport.clone(), config, AccessMode::Resilient),
            adverse_events: ResourceRepository::new(
                transport.clone(),
                config,
                AccessMode::Resilient,
            ),
            consents: ResourceRepository::new(transport.clone(), config, AccessMode::Resilient),
            audits: ResourceRepository::new(transport.clone(), config, AccessMode::Cached),
            users: ResourceRepository::new(transport, config, AccessMode::Cached),
        }
    }

    /// Builds every repository over an [`HttpTransport`] for `config.api_url`.
    pub fn from_config(config: &Config) -> std::result::Result<Self, TransportError> {
        let transport = HttpTransport::from_config(config)?;
        tracing::debug!(api_url = %config.api_url, "Repositories configured");
        Ok(Self::new(Arc::new(transport), config))
    }
}
