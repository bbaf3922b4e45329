//! HTML export
//!
//! Exported files are the same themed pages the preview shows, written
//! with the document saver so a failed export never leaves a truncated
//! file behind.

use super::convert::Converter;
use crate::error::FileResult;
use crate::file_handler::save_text;
use crate::theme::Theme;
use std::path::{Path, PathBuf};

/// Extension given to exported pages
pub const HTML_EXTENSION: &str = "html";

/// File name of the page opened in the external browser
pub const BROWSER_PREVIEW_FILE: &str = "preview.html";

/// Convert `markdown` and write the page to `output`
pub fn export_html(
    converter: &Converter,
    markdown: &str,
    theme: Theme,
    output: &Path,
) -> FileResult<()> {
    let html = converter.convert(markdown, theme);
    save_text(output, &html)?;
    log::info!("Exported HTML to {}", output.display());
    Ok(())
}

/// Write an already converted page
pub fn write_page(html: &str, output: &Path) -> FileResult<()> {
    save_text(output, html)
}

/// `/docs/readme.md` becomes `/docs/readme.html`; untitled documents
/// become `untitled.html` in the current directory
pub fn suggest_output_path(input: Option<&Path>) -> PathBuf {
    match input {
        Some(path) => path.with_extension(HTML_EXTENSION),
        None => PathBuf::from(format!("untitled.{}", HTML_EXTENSION)),
    }
}

/// Append `.html` when the chosen path has no extension
pub fn with_html_extension(path: PathBuf) -> PathBuf {
    if path.extension().is_some() {
        path
    } else {
        path.with_extension(HTML_EXTENSION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_html_writes_themed_page() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out").join("notes.html");

        export_html(&Converter::builtin(), "# Hello\n\nWorld", Theme::Dark, &output).unwrap();

        let html = std::fs::read_to_string(&output).unwrap();
        assert!(html.contains("<h1>Hello</h1>"));
        assert!(html.contains("<p>World</p>"));
        assert!(html.contains("#24292e"));
    }

    #[test]
    fn test_suggest_output_path() {
        assert_eq!(
            suggest_output_path(Some(Path::new("/docs/readme.md"))),
            PathBuf::from("/docs/readme.html")
        );
        assert_eq!(suggest_output_path(None), PathBuf::from("untitled.html"));
    }

    #[test]
    fn test_with_html_extension() {
        assert_eq!(with_html_extension(PathBuf::from("/a/b")), PathBuf::from("/a/b.html"));
        assert_eq!(with_html_extension(PathBuf::from("/a/b.htm")), PathBuf::from("/a/b.htm"));
    }
}
