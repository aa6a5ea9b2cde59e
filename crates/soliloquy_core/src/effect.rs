use crate::RequestId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// POST `{"title": title}` to the recommendation endpoint.
    SendRecommendation { request_id: RequestId, title: String },
    /// Abort a request that was superseded before it settled.
    CancelRecommendation { request_id: RequestId },
}
