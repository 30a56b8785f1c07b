use follower_core::{
    update, CollectionState, CollectorSettings, Effect, Msg, PageOutcome, PageRequest, ProfileId,
    Termination,
};
use scrape_logging::{scrape_debug, scrape_info, scrape_warn};

use crate::{AuthSession, EngineEvent, JobId, Pacing, PageSource, ScrapeProgress};

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopProgressSink;

impl ProgressSink for NoopProgressSink {
    fn emit(&self, _event: EngineEvent) {}
}

pub struct ChannelProgressSink {
    tx: std::sync::mpsc::Sender<EngineEvent>,
}

impl ChannelProgressSink {
    pub fn new(tx: std::sync::mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressSink for ChannelProgressSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

/// Outcome of one collection run. `names` holds whatever was gathered, even on failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionReport {
    pub profile_id: ProfileId,
    pub names: Vec<String>,
    pub termination: Termination,
    pub page_calls: u32,
    pub refreshes: u32,
}

impl CollectionReport {
    pub fn is_success(&self) -> bool {
        self.termination.is_success()
    }

    pub fn count(&self) -> usize {
        self.names.len()
    }
}

/// Executes the effects of the collection state machine, one at a time.
pub struct Collector<'a> {
    source: &'a dyn PageSource,
    settings: CollectorSettings,
    pacing: Pacing,
}

impl<'a> Collector<'a> {
    pub fn new(source: &'a dyn PageSource, settings: CollectorSettings, pacing: Pacing) -> Self {
        Self {
            source,
            settings,
            pacing,
        }
    }

    pub async fn run(
        &self,
        job_id: JobId,
        profile_id: &ProfileId,
        session: &mut AuthSession,
        progress: &dyn ProgressSink,
    ) -> CollectionReport {
        let mut state = CollectionState::new(self.settings);
        let mut effect = state.pending_effect();
        let mut first_request = true;

        let termination = loop {
            let before = state.sink().len();
            let mut page_summary = None;

            let msg = match effect {
                Effect::FetchPage { page } => {
                    if !first_request && !self.pacing.page_delay.is_zero() {
                        tokio::time::sleep(self.pacing.page_delay).await;
                    }
                    first_request = false;

                    let request = PageRequest {
                        profile_id: profile_id.clone(),
                        page,
                        page_size: self.settings.page_size,
                    };
                    let outcome = self.source.fetch_page(session.token(), &request).await;
                    match &outcome {
                        PageOutcome::Items(records) => page_summary = Some((page, records.len())),
                        PageOutcome::AuthExpired => {
                            scrape_warn!("Page {}: token rejected", page)
                        }
                        PageOutcome::TransientFailure(message)
                        | PageOutcome::FatalFailure(message) => {
                            scrape_warn!("Page {}: {}", page, message)
                        }
                    }
                    Msg::PageFetched { page, outcome }
                }
                Effect::RefreshToken => match session.refresh().await {
                    Ok(_) => {
                        if let Some(page) = state.current_page() {
                            progress.emit(EngineEvent::TokenRefreshed { job_id, page });
                        }
                        Msg::TokenRefreshed
                    }
                    Err(err) => Msg::RefreshFailed(err.to_string()),
                },
                Effect::Backoff { page, attempt } => {
                    let delay = self.pacing.backoff_delay(attempt);
                    scrape_info!(
                        "Page {}: retry {} after {:?}",
                        page,
                        attempt,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    Msg::BackoffElapsed
                }
                Effect::Finish(termination) => break termination,
            };

            let (next, next_effect) = update(state, msg);
            if let Some((page, received)) = page_summary {
                let total = next.sink().len();
                let added = total - before;
                if received == 0 {
                    scrape_debug!("Page {}: empty list", page);
                } else {
                    scrape_info!("Page {}: received {} items ({} new)", page, received, added);
                }
                progress.emit(EngineEvent::Progress(ScrapeProgress {
                    job_id,
                    page,
                    received,
                    added,
                    total,
                }));
            }
            state = next;
            effect = next_effect;
        };

        let page_calls = state.page_calls();
        let refreshes = state.refreshes();
        CollectionReport {
            profile_id: profile_id.clone(),
            names: state.into_sink().into_names(),
            termination,
            page_calls,
            refreshes,
        }
    }
}
