use soliloquy_core::{AppViewModel, Phase};

pub const INPUT_PLACEHOLDER: &str = "Enter title of book...";

/// Text shown for one view. Equal frames are printed once.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Frame {
    pub lines: Vec<String>,
}

/// `prompt` adds the input line shown while the user may submit.
pub fn render(view: &AppViewModel, prompt: bool) -> Frame {
    let mut lines = Vec::new();
    match view.phase {
        Phase::Idle => {}
        Phase::Pending => {
            let query = view.query.as_deref().unwrap_or_default();
            lines.push(format!("{} {query}", view.button_label));
        }
        Phase::Succeeded => {
            // A success without a message renders nothing.
            if let Some(message) = &view.message {
                lines.extend(message.lines().map(ToOwned::to_owned));
            }
        }
        Phase::Failed => {
            if let Some(error) = &view.error_description {
                lines.push(error.clone());
            }
        }
    }
    if prompt && view.submit_enabled && view.phase != Phase::Pending {
        lines.push(format!("[{}] {INPUT_PLACEHOLDER}", view.button_label));
    }
    Frame { lines }
}
