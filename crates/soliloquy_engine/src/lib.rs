//! Soliloquy engine: HTTP recommendation client and effect execution.
mod client;
mod engine;
mod types;

pub use client::{
    ClientSettings, RecommendationClient, ReqwestRecommendationClient, DEFAULT_ENDPOINT,
};
pub use engine::{EngineHandle, EngineStopped};
pub use types::{EngineEvent, FailureKind, Recommendation, RecommendError, RequestId};
