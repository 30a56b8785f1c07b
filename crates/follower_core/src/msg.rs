use crate::PageOutcome;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Page source answered for `page`.
    PageFetched { page: u32, outcome: PageOutcome },
    /// Auth session replaced its token.
    TokenRefreshed,
    /// Auth session could not obtain a new token.
    RefreshFailed(String),
    /// Backoff sleep finished.
    BackoffElapsed,
}
