use std::sync::LazyLock;

use regex::{Captures, Regex};

static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    // Greedy: everything up to the next whitespace belongs to the link,
    // trailing punctuation included.
    Regex::new(r"https?://\S+").expect("valid url pattern")
});

/// Wraps every bare `http(s)://` URL in `text` in an anchor that opens a new
/// browsing context without an opener or referrer.
///
/// The rest of the text is copied through untouched, so the input must be
/// trusted markup-safe text. Applying this twice double-wraps the links.
pub fn linkify(text: &str) -> String {
    URL_PATTERN
        .replace_all(text, |caps: &Captures| {
            let url = &caps[0];
            format!(r#"<a href="{url}" target="_blank" rel="noopener noreferrer">{url}</a>"#)
        })
        .into_owned()
}

/// Escapes `text` for markup first, then wraps the URLs found in the escaped text.
pub fn linkify_untrusted(text: &str) -> String {
    linkify(&escape_html(text))
}

/// Replaces the five markup-significant characters with their entities.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
