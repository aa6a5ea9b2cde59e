//! Soliloquy core: pure request state machine, view model and text linker.
mod effect;
mod linkify;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use linkify::{escape_html, linkify, linkify_untrusted};
pub use msg::{Msg, RequestFailure};
pub use state::{AppState, MessageTrust, OverlapPolicy, Phase, RequestId, RequestState, Settings};
pub use update::{update, GENERIC_ERROR};
pub use view_model::{AppViewModel, BUTTON_LABEL_IDLE, BUTTON_LABEL_LOADING};
