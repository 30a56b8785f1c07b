use std::sync::Arc;

use follower_core::{CollectorSettings, Credential, ProfileId};
use scrape_logging::{scrape_error, scrape_info, scrape_warn};

use crate::{
    AuthSession, CollectionReport, Collector, CredentialProvider, FetchSettings,
    HandshakeLoginProvider, JobId, NoopProgressSink, OrchestratorError, Pacing, PageSource,
    ProgressSink, ReqwestPageSource, ServiceEndpoints,
};

/// Wires credential acquisition and the collector together for one request.
#[derive(Clone)]
pub struct Orchestrator {
    provider: Arc<dyn CredentialProvider>,
    source: Arc<dyn PageSource>,
    settings: CollectorSettings,
    pacing: Pacing,
}

impl Orchestrator {
    pub fn new(
        provider: Arc<dyn CredentialProvider>,
        source: Arc<dyn PageSource>,
        settings: CollectorSettings,
        pacing: Pacing,
    ) -> Self {
        Self {
            provider,
            source,
            settings,
            pacing,
        }
    }

    /// Handshake/login provider and page source sharing one HTTP client.
    pub fn over_http(
        endpoints: ServiceEndpoints,
        fetch: &FetchSettings,
        settings: CollectorSettings,
    ) -> Result<Self, OrchestratorError> {
        let client = fetch.build_client()?;
        let source = ReqwestPageSource::new(client.clone(), endpoints.api_base.clone());
        let provider = HandshakeLoginProvider::new(client, endpoints);
        Ok(Self::new(
            Arc::new(provider),
            Arc::new(source),
            settings,
            fetch.pacing(),
        ))
    }

    pub fn settings(&self) -> &CollectorSettings {
        &self.settings
    }

    pub async fn run(
        &self,
        profile_id: &ProfileId,
        credential: &Credential,
    ) -> Result<CollectionReport, OrchestratorError> {
        self.run_with_progress(0, profile_id, credential, &NoopProgressSink)
            .await
    }

    pub async fn run_with_progress(
        &self,
        job_id: JobId,
        profile_id: &ProfileId,
        credential: &Credential,
        progress: &dyn ProgressSink,
    ) -> Result<CollectionReport, OrchestratorError> {
        scrape_info!("Starting scrape job_id={} profile={}", job_id, profile_id);

        let mut session = AuthSession::initialize(credential.clone(), self.provider.clone())
            .await
            .map_err(|err| {
                scrape_error!("No initial token for profile {}: {}", profile_id, err);
                OrchestratorError::from(err)
            })?;

        let report = Collector::new(self.source.as_ref(), self.settings, self.pacing)
            .run(job_id, profile_id, &mut session, progress)
            .await;

        match report.termination.failure_reason() {
            None => scrape_info!(
                "Finished profile {}: {} followers in {} page calls ({:?})",
                profile_id,
                report.count(),
                report.page_calls,
                report.termination
            ),
            Some(reason) => scrape_warn!(
                "Profile {} stopped after {} page calls with {} followers: {}",
                profile_id,
                report.page_calls,
                report.count(),
                reason
            ),
        }
        Ok(report)
    }
}
