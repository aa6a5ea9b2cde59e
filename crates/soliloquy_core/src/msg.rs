use std::fmt;

use crate::RequestId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User edited the title input box.
    InputChanged(String),
    /// User clicked Find: submit the current input text.
    SubmitClicked,
    /// Submit a query for recommendation.
    Submit(String),
    /// Backend answered with a 2xx JSON body.
    RecommendationReceived {
        request_id: RequestId,
        message: Option<String>,
    },
    /// Request failed at the transport, status or parse level.
    RecommendationFailed {
        request_id: RequestId,
        failure: RequestFailure,
    },
    /// The heading finished its reveal animation.
    HeadingAnimationComplete,
}

/// Diagnostic classification of a failed request. Never shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestFailure {
    Transport,
    Server { status: u16 },
    Parse,
}

impl fmt::Display for RequestFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestFailure::Transport => write!(f, "transport failure"),
            RequestFailure::Server { status } => write!(f, "server failure (status {status})"),
            RequestFailure::Parse => write!(f, "parse failure"),
        }
    }
}
