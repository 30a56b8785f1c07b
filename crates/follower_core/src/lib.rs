//! Follower core: data model and the pure collection state machine.
mod credential;
mod effect;
mod msg;
mod profile;
mod record;
mod settings;
mod sink;
mod state;
mod update;

pub use credential::{Credential, Token};
pub use effect::Effect;
pub use msg::Msg;
pub use profile::{ProfileId, ProfileIdError};
pub use record::{FollowerRecord, PageOutcome, PageRequest};
pub use settings::{
    CollectorSettings, DEFAULT_AUTH_RETRY_BUDGET, DEFAULT_EMPTY_PAGE_THRESHOLD,
    DEFAULT_PAGE_CEILING, DEFAULT_PAGE_SIZE,
};
pub use sink::{AddStats, DedupSink};
pub use state::{CollectionState, Phase, Termination, AUTH_EXHAUSTED_REASON};
pub use update::update;
