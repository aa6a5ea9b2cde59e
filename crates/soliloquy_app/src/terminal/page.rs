use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use soliloquy_core::escape_html;
use tempfile::NamedTempFile;

use super::heading::HEADING;

#[derive(Debug, thiserror::Error)]
pub enum PageError {
    #[error("results page path has no parent directory: {0:?}")]
    NoParent(PathBuf),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Writes the linked recommendation as a standalone HTML page.
pub struct ResultsPage {
    path: PathBuf,
}

impl ResultsPage {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// `linked_message` is inserted verbatim; it must already be linkified markup.
    pub fn write(&self, query: &str, linked_message: &str) -> Result<&Path, PageError> {
        let html = build_page(query, linked_message);
        write_atomically(&self.path, &html)?;
        Ok(&self.path)
    }
}

fn build_page(query: &str, linked_message: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{heading}: {query}</title>
</head>
<body>
<h1>{heading}</h1>
<div class="results" style="white-space: pre-wrap; font-family: monospace;">{linked_message}</div>
</body>
</html>
"#,
        heading = HEADING,
        query = escape_html(query),
        linked_message = linked_message,
    )
}

/// Write to a temp file next to `target`, then rename over it.
fn write_atomically(target: &Path, content: &str) -> Result<(), PageError> {
    let dir = match target.parent() {
        Some(parent) if parent.as_os_str().is_empty() => Path::new("."),
        Some(parent) => parent,
        None => return Err(PageError::NoParent(target.to_path_buf())),
    };
    fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.flush()?;
    tmp.as_file_mut().sync_all()?;
    tmp.persist(target).map_err(|e| PageError::Io(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn page_contains_linked_message_and_escaped_query() {
        let temp = TempDir::new().unwrap();
        let page = ResultsPage::new(temp.path().join("nested").join("results.html"));
        let linked = r#"see <a href="https://x.example" target="_blank" rel="noopener noreferrer">https://x.example</a>"#;

        let path = page.write("<Dune>", linked).unwrap().to_path_buf();
        let html = fs::read_to_string(path).unwrap();

        assert!(html.contains(linked));
        assert!(html.contains("<title>Soliloquy: &lt;Dune&gt;</title>"));
    }

    #[test]
    fn rewriting_replaces_previous_page() {
        let temp = TempDir::new().unwrap();
        let page = ResultsPage::new(temp.path().join("results.html"));

        page.write("first", "first-recommendation").unwrap();
        let path = page
            .write("second", "second-recommendation")
            .unwrap()
            .to_path_buf();
        let html = fs::read_to_string(path).unwrap();

        assert!(html.contains("second-recommendation"));
        assert!(!html.contains("first-recommendation"));
    }

    #[test]
    fn parent_that_is_a_file_fails_without_partial_output() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("not_a_dir");
        fs::write(&blocker, "x").unwrap();

        let page = ResultsPage::new(blocker.join("results.html"));
        assert!(page.write("q", "m").is_err());
        assert_eq!(fs::read_to_string(&blocker).unwrap(), "x");
    }
}
