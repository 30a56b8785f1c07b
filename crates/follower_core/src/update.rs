use crate::state::AUTH_EXHAUSTED_REASON;
use crate::{CollectionState, Effect, Msg, PageOutcome, Phase, Termination};

/// Pure transition function: applies a message to state and returns the next effect.
///
/// A message that does not fit the current phase leaves the state untouched and
/// re-emits the pending effect.
pub fn update(mut state: CollectionState, msg: Msg) -> (CollectionState, Effect) {
    let phase = state.phase().clone();
    match (phase, msg) {
        (Phase::Fetching { page }, Msg::PageFetched { page: fetched, outcome })
            if fetched == page =>
        {
            state.record_page_call();
            apply_page(&mut state, page, outcome);
        }
        (Phase::Refreshing { page }, Msg::TokenRefreshed) => {
            state.record_refresh();
            // Same page again: an auth failure never advances the cursor.
            state.set_phase(Phase::Fetching { page });
        }
        (Phase::Refreshing { .. }, Msg::RefreshFailed(reason)) => {
            state.finish(Termination::Failed(format!(
                "token expired and auto-refresh failed: {reason}"
            )));
        }
        (Phase::BackingOff { page, .. }, Msg::BackoffElapsed) => {
            state.set_phase(Phase::Fetching { page });
        }
        _ => {}
    }

    let effect = state.pending_effect();
    (state, effect)
}

fn apply_page(state: &mut CollectionState, page: u32, outcome: PageOutcome) {
    match outcome {
        PageOutcome::Items(records) if !records.is_empty() => {
            state.sink_mut().add(&records);
            state.reset_empty_streak();
            state.advance_from(page);
        }
        PageOutcome::Items(_) => {
            let threshold = state.settings().empty_page_threshold.max(1);
            if state.bump_empty_streak() >= threshold {
                state.finish(Termination::EndOfList);
            } else {
                state.advance_from(page);
            }
        }
        PageOutcome::AuthExpired => {
            if state.consume_auth_retry() {
                state.set_phase(Phase::Refreshing { page });
            } else {
                state.finish(Termination::Failed(AUTH_EXHAUSTED_REASON.to_string()));
            }
        }
        PageOutcome::TransientFailure(message) => match state.consume_transient_retry() {
            Some(attempt) => state.set_phase(Phase::BackingOff { page, attempt }),
            None => state.finish(Termination::Failed(format!("page {page}: {message}"))),
        },
        PageOutcome::FatalFailure(message) => {
            state.finish(Termination::Failed(format!("page {page}: {message}")));
        }
    }
}
