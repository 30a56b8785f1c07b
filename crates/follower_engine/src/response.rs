use follower_core::ProfileIdError;
use serde::Serialize;

use crate::{CollectionReport, OrchestratorError};

/// JSON shape returned to callers for one scrape.
///
/// Failed collections still carry the partial `followers` gathered before the
/// failure; setup failures carry only `error`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub followers: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip)]
    status: u16,
}

impl ScrapeResponse {
    pub fn from_report(report: CollectionReport) -> Self {
        let error = report
            .termination
            .failure_reason()
            .map(ToOwned::to_owned);
        let success = error.is_none();
        Self {
            success,
            profile_id: Some(report.profile_id.to_string()),
            count: Some(report.names.len()),
            followers: Some(report.names),
            error,
            status: if success { 200 } else { 502 },
        }
    }

    pub fn from_error(err: &OrchestratorError) -> Self {
        Self::failure(err.to_string(), err.http_status())
    }

    pub fn invalid_request(err: &ProfileIdError) -> Self {
        Self::failure(err.to_string(), 400)
    }

    fn failure(message: String, status: u16) -> Self {
        Self {
            success: false,
            profile_id: None,
            count: None,
            followers: None,
            error: Some(message),
            status,
        }
    }

    /// Status an HTTP front end should answer with.
    pub fn http_status(&self) -> u16 {
        self.status
    }

    /// Partial data exists when a failed run still gathered names.
    pub fn has_partial_data(&self) -> bool {
        !self.success && self.count.unwrap_or(0) > 0
    }
}

impl From<Result<CollectionReport, OrchestratorError>> for ScrapeResponse {
    fn from(result: Result<CollectionReport, OrchestratorError>) -> Self {
        match result {
            Ok(report) => Self::from_report(report),
            Err(err) => Self::from_error(&err),
        }
    }
}
