pub const DEFAULT_PAGE_SIZE: u32 = 100;
pub const DEFAULT_PAGE_CEILING: u32 = 500;
pub const DEFAULT_AUTH_RETRY_BUDGET: u32 = 2;
pub const DEFAULT_EMPTY_PAGE_THRESHOLD: u32 = 2;

/// Knobs of a single collection run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectorSettings {
    pub page_size: u32,
    /// Highest page number that will ever be requested.
    pub page_ceiling: u32,
    /// Token refreshes allowed per run.
    pub auth_retry_budget: u32,
    /// Consecutive empty pages that mark the end of the list. Values below 1 act as 1.
    pub empty_page_threshold: u32,
    /// Backoff-and-retry attempts for transient page failures per run.
    pub transient_retry_budget: u32,
}

impl Default for CollectorSettings {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            page_ceiling: DEFAULT_PAGE_CEILING,
            auth_retry_budget: DEFAULT_AUTH_RETRY_BUDGET,
            empty_page_threshold: DEFAULT_EMPTY_PAGE_THRESHOLD,
            transient_retry_budget: 0,
        }
    }
}
