//! Follower engine: credential lifecycle, page fetching and collection runs.
mod collect;
mod engine;
mod error;
mod fetch;
mod orchestrator;
mod provider;
mod response;
mod session;
mod settings;
mod types;

pub use collect::{
    ChannelProgressSink, CollectionReport, Collector, NoopProgressSink, ProgressSink,
};
pub use engine::EngineHandle;
pub use error::{AuthError, OrchestratorError, ProviderError};
pub use fetch::{PageSource, ReqwestPageSource};
pub use orchestrator::Orchestrator;
pub use provider::{CredentialProvider, HandshakeLoginProvider};
pub use response::ScrapeResponse;
pub use session::AuthSession;
pub use settings::{FetchSettings, Pacing, ServiceEndpoints, DEFAULT_USER_AGENT};
pub use types::{EngineEvent, JobId, ScrapeProgress};
