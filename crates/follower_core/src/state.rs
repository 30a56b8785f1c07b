use crate::{CollectorSettings, DedupSink, Effect};

pub const AUTH_EXHAUSTED_REASON: &str = "token expired, auto-refresh exhausted";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Termination {
    /// The empty-page streak reached its threshold.
    EndOfList,
    /// The page ceiling stopped the run; the list may be partial.
    CeilingReached,
    Failed(String),
}

impl Termination {
    pub fn is_success(&self) -> bool {
        !matches!(self, Termination::Failed(_))
    }

    pub fn failure_reason(&self) -> Option<&str> {
        match self {
            Termination::Failed(reason) => Some(reason),
            Termination::EndOfList | Termination::CeilingReached => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Fetching { page: u32 },
    Refreshing { page: u32 },
    BackingOff { page: u32, attempt: u32 },
    Finished(Termination),
}

/// State of one collection run. Created per request and dropped afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionState {
    settings: CollectorSettings,
    sink: DedupSink,
    phase: Phase,
    consecutive_empty_pages: u32,
    auth_retry_budget: u32,
    transient_retry_budget: u32,
    page_calls: u32,
    refreshes: u32,
}

impl CollectionState {
    pub fn new(settings: CollectorSettings) -> Self {
        let phase = if settings.page_ceiling == 0 {
            Phase::Finished(Termination::CeilingReached)
        } else {
            Phase::Fetching { page: 1 }
        };
        Self {
            settings,
            sink: DedupSink::new(),
            phase,
            consecutive_empty_pages: 0,
            auth_retry_budget: settings.auth_retry_budget,
            transient_retry_budget: settings.transient_retry_budget,
            page_calls: 0,
            refreshes: 0,
        }
    }

    pub fn settings(&self) -> &CollectorSettings {
        &self.settings
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// Page being fetched, refreshed for, or backed off from.
    pub fn current_page(&self) -> Option<u32> {
        match self.phase {
            Phase::Fetching { page }
            | Phase::Refreshing { page }
            | Phase::BackingOff { page, .. } => Some(page),
            Phase::Finished(_) => None,
        }
    }

    pub fn termination(&self) -> Option<&Termination> {
        match &self.phase {
            Phase::Finished(termination) => Some(termination),
            _ => None,
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.phase, Phase::Finished(_))
    }

    pub fn sink(&self) -> &DedupSink {
        &self.sink
    }

    pub fn into_sink(self) -> DedupSink {
        self.sink
    }

    pub fn consecutive_empty_pages(&self) -> u32 {
        self.consecutive_empty_pages
    }

    pub fn auth_retry_budget(&self) -> u32 {
        self.auth_retry_budget
    }

    pub fn transient_retry_budget(&self) -> u32 {
        self.transient_retry_budget
    }

    /// Page source calls answered so far, retries included.
    pub fn page_calls(&self) -> u32 {
        self.page_calls
    }

    /// Successful token refreshes.
    pub fn refreshes(&self) -> u32 {
        self.refreshes
    }

    /// The effect implied by the current phase.
    pub fn pending_effect(&self) -> Effect {
        match &self.phase {
            Phase::Fetching { page } => Effect::FetchPage { page: *page },
            Phase::Refreshing { .. } => Effect::RefreshToken,
            Phase::BackingOff { page, attempt } => Effect::Backoff {
                page: *page,
                attempt: *attempt,
            },
            Phase::Finished(termination) => Effect::Finish(termination.clone()),
        }
    }

    pub(crate) fn sink_mut(&mut self) -> &mut DedupSink {
        &mut self.sink
    }

    pub(crate) fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }

    pub(crate) fn finish(&mut self, termination: Termination) {
        self.phase = Phase::Finished(termination);
    }

    pub(crate) fn record_page_call(&mut self) {
        self.page_calls += 1;
    }

    pub(crate) fn record_refresh(&mut self) {
        self.refreshes += 1;
    }

    pub(crate) fn reset_empty_streak(&mut self) {
        self.consecutive_empty_pages = 0;
    }

    /// Returns the streak length after counting this page.
    pub(crate) fn bump_empty_streak(&mut self) -> u32 {
        self.consecutive_empty_pages += 1;
        self.consecutive_empty_pages
    }

    /// Moves past a handled page, stopping at the ceiling.
    pub(crate) fn advance_from(&mut self, page: u32) {
        if page >= self.settings.page_ceiling {
            self.finish(Termination::CeilingReached);
        } else {
            self.phase = Phase::Fetching { page: page + 1 };
        }
    }

    pub(crate) fn consume_auth_retry(&mut self) -> bool {
        if self.auth_retry_budget == 0 {
            return false;
        }
        self.auth_retry_budget -= 1;
        true
    }

    /// Returns the 1-based attempt number, or `None` when the budget is spent.
    pub(crate) fn consume_transient_retry(&mut self) -> Option<u32> {
        if self.transient_retry_budget == 0 {
            return None;
        }
        self.transient_retry_budget -= 1;
        Some(self.settings.transient_retry_budget - self.transient_retry_budget)
    }
}
