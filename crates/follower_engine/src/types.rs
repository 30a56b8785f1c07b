use follower_core::ProfileId;

use crate::ScrapeResponse;

pub type JobId = u64;

/// Per-page progress of a running scrape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeProgress {
    pub job_id: JobId,
    pub page: u32,
    /// Records on the page, named or not.
    pub received: usize,
    pub added: usize,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    Progress(ScrapeProgress),
    TokenRefreshed {
        job_id: JobId,
        page: u32,
    },
    ScrapeCompleted {
        job_id: JobId,
        profile_id: ProfileId,
        response: ScrapeResponse,
    },
}
