use std::time::Duration;

use soliloquy_core::{Effect, Msg, RequestFailure};
use soliloquy_engine::{
    ClientSettings, EngineEvent, EngineHandle, EngineStopped, FailureKind, RecommendError,
};
use soliloquy_logging::{sq_debug, sq_warn};

/// Executes core effects on the engine and turns engine events back into messages.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(settings: ClientSettings) -> Result<Self, RecommendError> {
        Ok(Self::with_engine(EngineHandle::new(settings)?))
    }

    pub fn with_engine(engine: EngineHandle) -> Self {
        Self { engine }
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::SendRecommendation { request_id, title } => {
                    sq_debug!(
                        "SendRecommendation request_id={} title_len={}",
                        request_id,
                        title.len()
                    );
                    self.engine.recommend(request_id, title);
                }
                Effect::CancelRecommendation { request_id } => {
                    self.engine.cancel(request_id);
                }
            }
        }
    }

    /// Waits up to `timeout` for the engine to settle a request.
    pub fn poll(&self, timeout: Duration) -> Result<Option<Msg>, EngineStopped> {
        Ok(self.engine.recv_timeout(timeout)?.map(event_to_msg))
    }
}

fn event_to_msg(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::Completed { request_id, result } => match result {
            Ok(recommendation) => Msg::RecommendationReceived {
                request_id,
                message: recommendation.message,
            },
            Err(err) => {
                sq_warn!("Request {} failed: {}", request_id, err);
                Msg::RecommendationFailed {
                    request_id,
                    failure: map_failure(&err.kind),
                }
            }
        },
    }
}

fn map_failure(kind: &FailureKind) -> RequestFailure {
    match kind {
        FailureKind::HttpStatus(status) => RequestFailure::Server { status: *status },
        FailureKind::Parse | FailureKind::TooLarge { .. } => RequestFailure::Parse,
        FailureKind::InvalidEndpoint | FailureKind::Timeout | FailureKind::Network => {
            RequestFailure::Transport
        }
    }
}
