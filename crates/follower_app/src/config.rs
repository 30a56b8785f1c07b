//! Application configuration: defaults, an optional RON file, then environment overrides.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use follower_core::{CollectorSettings, Credential, Token};
use follower_engine::{FetchSettings, ServiceEndpoints};
use serde::Deserialize;
use thiserror::Error;

pub const ENV_IDENTITY: &str = "SCRAPER_EMAIL";
pub const ENV_SECRET: &str = "SCRAPER_PASSWORD";
pub const ENV_MANUAL_TOKEN: &str = "SCRAPER_MANUAL_TOKEN";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

/// On-disk shape. Every field is optional; missing ones keep their defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    identity: Option<String>,
    secret: Option<String>,
    manual_token: Option<String>,
    page_size: Option<u32>,
    page_ceiling: Option<u32>,
    auth_retry_budget: Option<u32>,
    empty_page_threshold: Option<u32>,
    transient_retry_budget: Option<u32>,
    page_delay_ms: Option<u64>,
    backoff_base_ms: Option<u64>,
    connect_timeout_secs: Option<u64>,
    request_timeout_secs: Option<u64>,
    user_agent: Option<String>,
    handshake_url: Option<String>,
    login_url: Option<String>,
    api_base: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub credential: Credential,
    pub collector: CollectorSettings,
    pub fetch: FetchSettings,
    pub endpoints: ServiceEndpoints,
}

impl AppConfig {
    /// `env` looks up one variable by name; `None` or empty means unset.
    pub fn load(
        path: Option<&Path>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => {
                let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;
                ron::from_str::<FileConfig>(&text)?
            }
            None => FileConfig::default(),
        };

        let mut config = Self::from_file(file);
        config.apply_env(env);
        Ok(config)
    }

    fn from_file(file: FileConfig) -> Self {
        let defaults = CollectorSettings::default();
        let collector = CollectorSettings {
            page_size: file.page_size.unwrap_or(defaults.page_size),
            page_ceiling: file.page_ceiling.unwrap_or(defaults.page_ceiling),
            auth_retry_budget: file.auth_retry_budget.unwrap_or(defaults.auth_retry_budget),
            empty_page_threshold: file
                .empty_page_threshold
                .unwrap_or(defaults.empty_page_threshold),
            transient_retry_budget: file
                .transient_retry_budget
                .unwrap_or(defaults.transient_retry_budget),
        };

        let mut fetch = FetchSettings::default();
        if let Some(ms) = file.page_delay_ms {
            fetch.page_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = file.backoff_base_ms {
            fetch.backoff_base = Duration::from_millis(ms);
        }
        if let Some(secs) = file.connect_timeout_secs {
            fetch.connect_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = file.request_timeout_secs {
            fetch.request_timeout = Duration::from_secs(secs);
        }
        if let Some(user_agent) = file.user_agent {
            fetch.user_agent = user_agent;
        }

        let mut endpoints = ServiceEndpoints::default();
        if let Some(url) = file.handshake_url {
            endpoints.handshake_url = url;
        }
        if let Some(url) = file.login_url {
            endpoints.login_url = url;
        }
        if let Some(url) = file.api_base {
            endpoints.api_base = url;
        }

        let credential = Credential {
            identity: non_empty(file.identity),
            secret: non_empty(file.secret),
            manual_token: non_empty(file.manual_token).map(Token::new),
        };

        Self {
            credential,
            collector,
            fetch,
            endpoints,
        }
    }

    fn apply_env(&mut self, env: impl Fn(&str) -> Option<String>) {
        if let Some(identity) = non_empty(env(ENV_IDENTITY)) {
            self.credential.identity = Some(identity);
        }
        if let Some(secret) = non_empty(env(ENV_SECRET)) {
            self.credential.secret = Some(secret);
        }
        if let Some(token) = non_empty(env(ENV_MANUAL_TOKEN)) {
            self.credential.manual_token = Some(Token::new(token));
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
