use crate::view_model::{AppViewModel, BUTTON_LABEL_IDLE, BUTTON_LABEL_LOADING};
use crate::{linkify, linkify_untrusted};

pub type RequestId = u64;

/// Discriminant of [`RequestState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Pending,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RequestState {
    #[default]
    Idle,
    Pending {
        request_id: RequestId,
        query: String,
    },
    Succeeded {
        message: Option<String>,
    },
    Failed {
        error_description: String,
    },
}

impl RequestState {
    pub fn phase(&self) -> Phase {
        match self {
            RequestState::Idle => Phase::Idle,
            RequestState::Pending { .. } => Phase::Pending,
            RequestState::Succeeded { .. } => Phase::Succeeded,
            RequestState::Failed { .. } => Phase::Failed,
        }
    }
}

/// What happens to a submit that arrives while another request is pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverlapPolicy {
    /// The new request replaces the pending one; only its resolution counts.
    #[default]
    Supersede,
    /// The submit is ignored until the pending request settles.
    Reject,
}

/// How far the backend message is trusted when rendered as markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MessageTrust {
    /// Escape the whole message before wrapping URLs.
    #[default]
    Untrusted,
    /// Wrap URLs in the raw message as-is.
    TrustedFirstParty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Settings {
    pub overlap: OverlapPolicy,
    pub trust: MessageTrust,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    settings: Settings,
    input: String,
    request: RequestState,
    next_request_id: RequestId,
    heading_ready: bool,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_settings(Settings::default())
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: Settings) -> Self {
        Self {
            settings,
            input: String::new(),
            request: RequestState::Idle,
            next_request_id: 1,
            heading_ready: false,
            dirty: false,
        }
    }

    pub fn settings(&self) -> Settings {
        self.settings
    }

    pub fn phase(&self) -> Phase {
        self.request.phase()
    }

    pub fn request(&self) -> &RequestState {
        &self.request
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Builds the presentation view. The linked message is recomputed on every call.
    pub fn view(&self) -> AppViewModel {
        let pending = self.phase() == Phase::Pending;
        let (query, message, error_description) = match &self.request {
            RequestState::Idle => (None, None, None),
            RequestState::Pending { query, .. } => (Some(query.clone()), None, None),
            RequestState::Succeeded { message } => (
                None,
                message.clone().filter(|m| !m.is_empty()),
                None,
            ),
            RequestState::Failed { error_description } => {
                (None, None, Some(error_description.clone()))
            }
        };
        let linked_message = message.as_deref().map(|text| match self.settings.trust {
            MessageTrust::Untrusted => linkify_untrusted(text),
            MessageTrust::TrustedFirstParty => linkify(text),
        });

        AppViewModel {
            phase: self.phase(),
            query,
            message,
            linked_message,
            error_description,
            submit_enabled: !(pending && self.settings.overlap == OverlapPolicy::Reject),
            button_label: if pending {
                BUTTON_LABEL_LOADING
            } else {
                BUTTON_LABEL_IDLE
            },
            heading_ready: self.heading_ready,
        }
    }

    /// Returns whether anything changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn set_input(&mut self, text: String) {
        if self.input != text {
            self.input = text;
            self.mark_dirty();
        }
    }

    pub(crate) fn pending_request_id(&self) -> Option<RequestId> {
        match &self.request {
            RequestState::Pending { request_id, .. } => Some(*request_id),
            _ => None,
        }
    }

    /// Moves to `Pending` under a fresh id. Returns the new id.
    pub(crate) fn begin_request(&mut self, query: String) -> RequestId {
        let request_id = self.next_request_id;
        self.next_request_id += 1;
        self.request = RequestState::Pending { request_id, query };
        self.mark_dirty();
        request_id
    }

    pub(crate) fn settle(&mut self, outcome: RequestState) {
        debug_assert!(outcome.phase() != Phase::Pending);
        self.request = outcome;
        self.mark_dirty();
    }

    pub(crate) fn mark_heading_ready(&mut self) {
        if !self.heading_ready {
            self.heading_ready = true;
            self.mark_dirty();
        }
    }
}
