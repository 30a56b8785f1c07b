use follower_core::{FollowerRecord, PageOutcome, PageRequest, Token};
use reqwest::header::ACCEPT;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use url::Url;

/// Fetches one page of followers.
///
/// Must report a rejected token as [`PageOutcome::AuthExpired`] so the
/// collector can decide to refresh.
#[async_trait::async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_page(&self, token: &Token, request: &PageRequest) -> PageOutcome;
}

#[derive(Deserialize)]
struct FollowersEnvelope {
    #[serde(default)]
    data: Option<Vec<Value>>,
}

impl FollowersEnvelope {
    fn into_records(self) -> Vec<FollowerRecord> {
        self.data
            .unwrap_or_default()
            .iter()
            .map(|item| FollowerRecord {
                name: item.get("name").and_then(Value::as_str).map(str::to_owned),
            })
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct ReqwestPageSource {
    client: reqwest::Client,
    api_base: String,
}

impl ReqwestPageSource {
    pub fn new(client: reqwest::Client, api_base: impl Into<String>) -> Self {
        Self {
            client,
            api_base: api_base.into(),
        }
    }

    /// `{api_base}/v2/userinfo/v3/profile/{id}/followers?count=..&page=..`
    pub fn page_url(&self, request: &PageRequest) -> Result<Url, String> {
        let mut url = Url::parse(&self.api_base).map_err(|err| err.to_string())?;
        url.path_segments_mut()
            .map_err(|_| format!("api base {} cannot carry a path", self.api_base))?
            .pop_if_empty()
            .extend([
                "v2",
                "userinfo",
                "v3",
                "profile",
                request.profile_id.as_str(),
                "followers",
            ]);
        url.query_pairs_mut()
            .append_pair("count", &request.page_size.to_string())
            .append_pair("page", &request.page.to_string());
        Ok(url)
    }
}

#[async_trait::async_trait]
impl PageSource for ReqwestPageSource {
    async fn fetch_page(&self, token: &Token, request: &PageRequest) -> PageOutcome {
        let url = match self.page_url(request) {
            Ok(url) => url,
            Err(message) => return PageOutcome::FatalFailure(message),
        };

        let response = match self
            .client
            .get(url)
            .bearer_auth(token.as_str())
            .header(ACCEPT, "application/json")
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => return map_reqwest_error(err),
        };

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return PageOutcome::AuthExpired;
        }
        if !status.is_success() {
            let message = format!("http status {}", status.as_u16());
            return if is_transient_status(status) {
                PageOutcome::TransientFailure(message)
            } else {
                PageOutcome::FatalFailure(message)
            };
        }

        match response.json::<FollowersEnvelope>().await {
            Ok(envelope) => PageOutcome::Items(envelope.into_records()),
            Err(err) if err.is_decode() => {
                PageOutcome::FatalFailure(format!("undecodable response: {err}"))
            }
            Err(err) => map_reqwest_error(err),
        }
    }
}

fn is_transient_status(status: StatusCode) -> bool {
    status == StatusCode::REQUEST_TIMEOUT
        || status == StatusCode::TOO_MANY_REQUESTS
        || status.is_server_error()
}

fn map_reqwest_error(err: reqwest::Error) -> PageOutcome {
    if err.is_timeout() {
        return PageOutcome::TransientFailure(format!("timeout: {err}"));
    }
    if err.is_builder() {
        return PageOutcome::FatalFailure(err.to_string());
    }
    PageOutcome::TransientFailure(format!("network error: {err}"))
}
