use crate::Phase;

pub const BUTTON_LABEL_IDLE: &str = "Find";
pub const BUTTON_LABEL_LOADING: &str = "Loading...";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub phase: Phase,
    /// Query in flight, set only while pending.
    pub query: Option<String>,
    /// Raw backend message; `None` when there is nothing to render.
    pub message: Option<String>,
    /// Markup for `message` with URLs wrapped in anchors.
    pub linked_message: Option<String>,
    pub error_description: Option<String>,
    pub submit_enabled: bool,
    pub button_label: &'static str,
    pub heading_ready: bool,
}
