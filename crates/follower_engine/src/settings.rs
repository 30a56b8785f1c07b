use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Remote endpoints of the follower service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceEndpoints {
    /// Anonymous handshake issuing the pre-login token.
    pub handshake_url: String,
    pub login_url: String,
    /// Base for `/v2/userinfo/v3/profile/{id}/followers`.
    pub api_base: String,
}

impl Default for ServiceEndpoints {
    fn default() -> Self {
        Self {
            handshake_url: "https://www.sololearn.com/user/publicToken".to_string(),
            login_url: "https://api2.sololearn.com/v2/authentication/user:login".to_string(),
            api_base: "https://api2.sololearn.com".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub user_agent: String,
    /// Pause between consecutive page requests.
    pub page_delay: Duration,
    /// First transient-retry delay; doubles per attempt.
    pub backoff_base: Duration,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            page_delay: Duration::from_millis(250),
            backoff_base: Duration::from_secs(1),
        }
    }
}

impl FetchSettings {
    pub fn build_client(&self) -> Result<reqwest::Client, reqwest::Error> {
        reqwest::Client::builder()
            .connect_timeout(self.connect_timeout)
            .timeout(self.request_timeout)
            .user_agent(self.user_agent.clone())
            .build()
    }

    pub fn pacing(&self) -> Pacing {
        Pacing {
            page_delay: self.page_delay,
            backoff_base: self.backoff_base,
        }
    }
}

/// Sleeps the collector inserts between requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pacing {
    pub page_delay: Duration,
    pub backoff_base: Duration,
}

impl Pacing {
    pub fn none() -> Self {
        Self::default()
    }

    /// `attempt` is 1-based.
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let shift = attempt.saturating_sub(1).min(16);
        self.backoff_base.saturating_mul(1 << shift)
    }
}
