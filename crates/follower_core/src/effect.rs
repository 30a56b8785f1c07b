use crate::Termination;

/// Work the driver must perform next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchPage { page: u32 },
    RefreshToken,
    /// Sleep before retrying `page`; `attempt` is 1-based.
    Backoff { page: u32, attempt: u32 },
    Finish(Termination),
}
