use soliloquy_logging::{sq_debug, sq_info};

use crate::{AppState, Effect, Msg, OverlapPolicy, RequestFailure, RequestId, RequestState};

/// The only failure text ever shown to the user.
pub const GENERIC_ERROR: &str = "Something went wrong. Try again.";

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::InputChanged(text) => {
            state.set_input(text);
            Vec::new()
        }
        Msg::SubmitClicked => {
            let query = state.input().to_owned();
            submit(&mut state, &query)
        }
        Msg::Submit(query) => submit(&mut state, &query),
        Msg::RecommendationReceived {
            request_id,
            message,
        } => {
            if accepts_resolution(&state, request_id) {
                state.settle(RequestState::Succeeded { message });
            }
            Vec::new()
        }
        Msg::RecommendationFailed {
            request_id,
            failure,
        } => {
            if accepts_resolution(&state, request_id) {
                log_failure(request_id, failure);
                state.settle(RequestState::Failed {
                    error_description: GENERIC_ERROR.to_string(),
                });
            }
            Vec::new()
        }
        Msg::HeadingAnimationComplete => {
            state.mark_heading_ready();
            Vec::new()
        }
    };

    (state, effects)
}

fn submit(state: &mut AppState, raw: &str) -> Vec<Effect> {
    let query = raw.trim();
    if query.is_empty() {
        return Vec::new();
    }

    let superseded = state.pending_request_id();
    if superseded.is_some() && state.settings().overlap == OverlapPolicy::Reject {
        sq_debug!("submit rejected while request {:?} is pending", superseded);
        return Vec::new();
    }

    let request_id = state.begin_request(query.to_owned());
    sq_info!(
        "recommendation request_id={} query_len={}",
        request_id,
        query.len()
    );

    let mut effects = Vec::with_capacity(1 + usize::from(superseded.is_some()));
    if let Some(old) = superseded {
        effects.push(Effect::CancelRecommendation { request_id: old });
    }
    effects.push(Effect::SendRecommendation {
        request_id,
        title: query.to_owned(),
    });
    effects
}

/// Only the currently pending request may settle the state.
fn accepts_resolution(state: &AppState, request_id: RequestId) -> bool {
    let current = state.pending_request_id();
    if current != Some(request_id) {
        sq_debug!(
            "ignoring stale resolution for request {} (pending: {:?})",
            request_id,
            current
        );
        return false;
    }
    true
}

/// The effect runner logs the technical detail at `warn`; this records the class only.
fn log_failure(request_id: RequestId, failure: RequestFailure) {
    sq_debug!("recommendation request {} failed: {}", request_id, failure);
}
