//! Markdown to HTML conversion
//!
//! Conversion is delegated to a list of [`Renderer`]s tried in priority
//! order. The default list puts pandoc first and the built-in
//! pulldown-cmark renderer second. When every renderer fails the caller
//! gets the themed error page instead of a document.

use super::templates;
use crate::theme::Theme;
use pulldown_cmark::{html, Event, Options, Parser};
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use thiserror::Error;

/// Errors produced by renderers
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConvertError {
    /// The renderer cannot run at all on this system
    #[error("{renderer} is not available: {reason}")]
    Unavailable {
        renderer: &'static str,
        reason: String,
    },

    /// The renderer ran and reported a failure
    #[error("{renderer} failed: {message}")]
    Failed {
        renderer: &'static str,
        message: String,
    },

    /// The converter was built without renderers
    #[error("No markdown converter available")]
    NoRenderers,
}

pub type ConvertResult<T> = Result<T, ConvertError>;

/// A markdown to HTML fragment renderer
pub trait Renderer: Send + Sync {
    /// Short name used in logs and errors
    fn name(&self) -> &'static str;

    /// Render markdown to an HTML body fragment
    fn render(&self, markdown: &str) -> ConvertResult<String>;
}

/// Renders through an external `pandoc` process
#[derive(Debug, Clone)]
pub struct PandocRenderer {
    program: PathBuf,
    args: Vec<String>,
}

impl PandocRenderer {
    pub const NAME: &'static str = "pandoc";

    pub fn new() -> Self {
        Self::with_program("pandoc")
    }

    /// Use a specific pandoc executable
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: vec![
                "--from=markdown".to_string(),
                "--to=html5".to_string(),
                "--mathjax".to_string(),
            ],
        }
    }

    fn failed(message: impl Into<String>) -> ConvertError {
        ConvertError::Failed {
            renderer: Self::NAME,
            message: message.into(),
        }
    }
}

impl Default for PandocRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for PandocRenderer {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn render(&self, markdown: &str) -> ConvertResult<String> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| ConvertError::Unavailable {
                renderer: Self::NAME,
                reason: e.to_string(),
            })?;

        // Feed stdin from a separate thread so a large document cannot
        // deadlock against a full stdout pipe.
        let writer = child.stdin.take().map(|mut stdin| {
            let input = markdown.to_owned();
            std::thread::spawn(move || stdin.write_all(input.as_bytes()))
        });

        let output = child
            .wait_with_output()
            .map_err(|e| Self::failed(e.to_string()))?;

        if let Some(writer) = writer {
            match writer.join() {
                Ok(Ok(())) => {}
                Ok(Err(e)) => return Err(Self::failed(e.to_string())),
                Err(_) => return Err(Self::failed("stdin writer panicked")),
            }
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Self::failed(format!(
                "exit status {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        String::from_utf8(output.stdout).map_err(|_| Self::failed("output is not valid UTF-8"))
    }
}

/// Built-in renderer based on pulldown-cmark
#[derive(Debug, Clone)]
pub struct CmarkRenderer {
    options: Options,
}

impl CmarkRenderer {
    pub const NAME: &'static str = "pulldown-cmark";

    pub fn new() -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);
        options.insert(Options::ENABLE_SMART_PUNCTUATION);
        options.insert(Options::ENABLE_HEADING_ATTRIBUTES);

        Self { options }
    }
}

impl Default for CmarkRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for CmarkRenderer {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn render(&self, markdown: &str) -> ConvertResult<String> {
        // Single newlines inside a paragraph become line breaks.
        let parser = Parser::new_ext(markdown, self.options).map(|event| match event {
            Event::SoftBreak => Event::HardBreak,
            other => other,
        });

        let mut out = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut out, parser);
        Ok(out)
    }
}

/// A successfully rendered fragment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub html: String,
    /// Name of the renderer that produced `html`
    pub renderer: &'static str,
}

/// How a page came about
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PageStatus {
    /// Blank text
    #[default]
    Placeholder,
    /// Converted by the named renderer
    Rendered(&'static str),
    /// Every renderer failed; the message is the one shown on the page
    Failed(String),
}

/// A complete themed HTML page
#[derive(Debug, Clone)]
pub struct Page {
    pub html: String,
    pub status: PageStatus,
}

/// Renderers in priority order
pub struct Converter {
    renderers: Vec<Box<dyn Renderer>>,
}

impl Converter {
    pub fn new(renderers: Vec<Box<dyn Renderer>>) -> Self {
        Self { renderers }
    }

    /// Only the built-in renderer; no external processes
    pub fn builtin() -> Self {
        Self::new(vec![Box::new(CmarkRenderer::new())])
    }

    pub fn renderer_names(&self) -> Vec<&'static str> {
        self.renderers.iter().map(|r| r.name()).collect()
    }

    /// Render with the first renderer that succeeds
    ///
    /// Returns the last renderer's error when all of them fail.
    pub fn render_fragment(&self, markdown: &str) -> ConvertResult<Rendered> {
        let mut last_error = None;

        for renderer in &self.renderers {
            match renderer.render(markdown) {
                Ok(html) => {
                    return Ok(Rendered {
                        html,
                        renderer: renderer.name(),
                    })
                }
                Err(e) => {
                    log::debug!("Renderer {} failed: {}", renderer.name(), e);
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or(ConvertError::NoRenderers))
    }

    /// Render a complete themed HTML document, or the themed error page
    pub fn convert(&self, markdown: &str, theme: Theme) -> String {
        self.page(markdown, theme).html
    }

    /// Like [`convert`](Self::convert), but blank text yields the placeholder page
    pub fn preview_page(&self, markdown: &str, theme: Theme) -> String {
        self.preview(markdown, theme).html
    }

    /// Preview page together with what produced it
    pub fn preview(&self, markdown: &str, theme: Theme) -> Page {
        if markdown.trim().is_empty() {
            return Page {
                html: templates::placeholder_page(theme),
                status: PageStatus::Placeholder,
            };
        }
        self.page(markdown, theme)
    }

    fn page(&self, markdown: &str, theme: Theme) -> Page {
        match self.render_fragment(markdown) {
            Ok(rendered) => Page {
                html: templates::page(&rendered.html, theme),
                status: PageStatus::Rendered(rendered.renderer),
            },
            Err(e) => {
                log::warn!("Markdown conversion failed: {}", e);
                let message = format!("Markdown conversion error: {}", e);
                Page {
                    html: templates::error_page(&message, theme),
                    status: PageStatus::Failed(message),
                }
            }
        }
    }
}

impl Default for Converter {
    fn default() -> Self {
        Self::new(vec![
            Box::new(PandocRenderer::new()),
            Box::new(CmarkRenderer::new()),
        ])
    }
}

impl std::fmt::Debug for Converter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Converter")
            .field("renderers", &self.renderer_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Broken(&'static str);

    impl Renderer for Broken {
        fn name(&self) -> &'static str {
            self.0
        }

        fn render(&self, _markdown: &str) -> ConvertResult<String> {
            Err(ConvertError::Failed {
                renderer: self.0,
                message: "boom <b>".to_string(),
            })
        }
    }

    struct Counting(Arc<AtomicUsize>);

    impl Renderer for Counting {
        fn name(&self) -> &'static str {
            "counting"
        }

        fn render(&self, markdown: &str) -> ConvertResult<String> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(format!("<p>{}</p>", markdown))
        }
    }

    #[test]
    fn test_cmark_extensions() {
        let html = CmarkRenderer::new()
            .render("# Title\n\nline one\nline two\n\n| a | b |\n|---|---|\n| 1 | 2 |\n\n~~gone~~\n\n- [x] done\n")
            .unwrap();
        assert!(html.contains("<h1>Title</h1>"));
        assert!(html.contains("line one<br />"));
        assert!(html.contains("<table>"));
        assert!(html.contains("<del>gone</del>"));
        assert!(html.contains("type=\"checkbox\""));
    }

    #[test]
    fn test_falls_back_in_priority_order() {
        let converter = Converter::new(vec![
            Box::new(Broken("first")),
            Box::new(CmarkRenderer::new()),
        ]);
        let rendered = converter.render_fragment("*hi*").unwrap();
        assert_eq!(rendered.renderer, CmarkRenderer::NAME);
        assert!(rendered.html.contains("<em>hi</em>"));
    }

    #[test]
    fn test_first_success_stops() {
        let calls = Arc::new(AtomicUsize::new(0));
        let converter = Converter::new(vec![
            Box::new(CmarkRenderer::new()),
            Box::new(Counting(calls.clone())),
        ]);
        converter.render_fragment("text").unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_all_fail_gives_error_page() {
        let converter = Converter::new(vec![Box::new(Broken("a")), Box::new(Broken("b"))]);
        let err = converter.render_fragment("x").unwrap_err();
        assert!(matches!(err, ConvertError::Failed { renderer: "b", .. }));

        let page = converter.convert("x", Theme::Dark);
        assert!(page.contains("Markdown conversion error: b failed: boom &lt;b&gt;"));
        assert!(page.contains("#f85149"));
    }

    #[test]
    fn test_no_renderers() {
        let converter = Converter::new(Vec::new());
        assert_eq!(
            converter.render_fragment("x").unwrap_err(),
            ConvertError::NoRenderers
        );
    }

    #[test]
    fn test_conversion_is_deterministic() {
        let converter = Converter::builtin();
        let text = "# Notes\n\nSome *text* with `code` and a [link](https://example.com).\n";
        for theme in [Theme::Light, Theme::Dark] {
            assert_eq!(converter.convert(text, theme), converter.convert(text, theme));
        }
    }

    #[test]
    fn test_preview_page_placeholder() {
        let converter = Converter::builtin();
        let page = converter.preview_page("  \n\t", Theme::Light);
        assert!(page.contains(templates::PLACEHOLDER_MESSAGE));
        assert!(!converter.preview_page("text", Theme::Light).contains(templates::PLACEHOLDER_MESSAGE));
    }

    #[test]
    fn test_preview_reports_status() {
        let converter = Converter::builtin();
        assert_eq!(converter.preview("", Theme::Light).status, PageStatus::Placeholder);
        assert_eq!(
            converter.preview("# x", Theme::Light).status,
            PageStatus::Rendered(CmarkRenderer::NAME)
        );

        let failed = Converter::new(Vec::new()).preview("# x", Theme::Dark);
        assert_eq!(
            failed.status,
            PageStatus::Failed("Markdown conversion error: No markdown converter available".to_string())
        );
        assert!(failed.html.contains("No markdown converter available"));
    }

    #[test]
    fn test_missing_pandoc_is_unavailable() {
        let renderer = PandocRenderer::with_program("/nonexistent/pandoc-binary");
        assert!(matches!(
            renderer.render("# x"),
            Err(ConvertError::Unavailable { renderer: "pandoc", .. })
        ));
    }
}
