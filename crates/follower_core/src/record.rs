/// One follower entry as returned by the page source.
///
/// Only `name` is interpreted; the source decides how raw payloads map onto it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FollowerRecord {
    pub name: Option<String>,
}

impl FollowerRecord {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }

    pub fn unnamed() -> Self {
        Self { name: None }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub profile_id: crate::ProfileId,
    /// 1-based.
    pub page: u32,
    pub page_size: u32,
}

/// Result of fetching a single page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    Items(Vec<FollowerRecord>),
    /// The source rejected the token (HTTP 401 or equivalent).
    AuthExpired,
    TransientFailure(String),
    FatalFailure(String),
}
