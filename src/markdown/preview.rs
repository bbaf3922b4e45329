//! Markdown preview
//!
//! The preview handler owns a [`PreviewTarget`] and pushes a freshly
//! converted page into it on every refresh. The desktop pane is a
//! [`NativePreview`], which keeps the HTML page (for export and the
//! browser) and an element tree for display with native widgets. The tree
//! follows the page status: nothing for the placeholder, an error block
//! when conversion failed, otherwise the text parsed with pulldown-cmark.

use super::convert::{Converter, PageStatus};
use crate::theme::Theme;
use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag};
use std::path::{Path, PathBuf};

/// One converted page handed to a target
#[derive(Debug, Clone, Copy)]
pub struct PreviewFrame<'a> {
    /// Source text the page was produced from
    pub markdown: &'a str,
    /// Complete HTML document
    pub html: &'a str,
    pub status: &'a PageStatus,
    pub theme: Theme,
}

/// Anything that can display converted pages
pub trait PreviewTarget {
    fn present(&mut self, frame: PreviewFrame<'_>);

    /// The open document moved; relative links resolve against `dir`
    fn set_document_dir(&mut self, _dir: Option<&Path>) {}
}

/// Converts text and feeds the result to its target
#[derive(Debug)]
pub struct PreviewHandler<T: PreviewTarget> {
    converter: Converter,
    target: T,
    renders: u64,
}

impl<T: PreviewTarget> PreviewHandler<T> {
    pub fn new(converter: Converter, target: T) -> Self {
        Self {
            converter,
            target,
            renders: 0,
        }
    }

    /// Convert `markdown` and present it; blank text shows the placeholder
    pub fn refresh(&mut self, markdown: &str, theme: Theme) {
        let page = self.converter.preview(markdown, theme);
        self.renders += 1;
        log::debug!(
            "Preview render #{} ({} bytes in, {} bytes out, {:?})",
            self.renders,
            markdown.len(),
            page.html.len(),
            page.status
        );
        self.target.present(PreviewFrame {
            markdown,
            html: &page.html,
            status: &page.status,
            theme,
        });
    }

    /// Number of conversions performed so far
    pub fn render_count(&self) -> u64 {
        self.renders
    }

    pub fn converter(&self) -> &Converter {
        &self.converter
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn target_mut(&mut self) -> &mut T {
        &mut self.target
    }
}

/// Target that only keeps the latest page
#[derive(Debug, Clone, Default)]
pub struct HtmlPreview {
    pub html: String,
    pub theme: Theme,
    /// Number of pages presented
    pub presented: usize,
}

impl PreviewTarget for HtmlPreview {
    fn present(&mut self, frame: PreviewFrame<'_>) {
        self.html = frame.html.to_string();
        self.theme = frame.theme;
        self.presented += 1;
    }
}

/// Target backing the desktop preview pane
#[derive(Debug, Clone, Default)]
pub struct NativePreview {
    renderer: PreviewRenderer,
    elements: Vec<PreviewElement>,
    html: String,
    status: PageStatus,
    theme: Theme,
}

impl NativePreview {
    pub fn new() -> Self {
        Self::default()
    }

    /// Element tree of the latest page; empty for a blank document
    pub fn elements(&self) -> &[PreviewElement] {
        &self.elements
    }

    /// Latest complete HTML page
    pub fn html(&self) -> &str {
        &self.html
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn status(&self) -> &PageStatus {
        &self.status
    }

    pub fn is_placeholder(&self) -> bool {
        self.status == PageStatus::Placeholder
    }

    pub fn renderer(&self) -> &PreviewRenderer {
        &self.renderer
    }
}

impl PreviewTarget for NativePreview {
    fn present(&mut self, frame: PreviewFrame<'_>) {
        self.html = frame.html.to_string();
        self.theme = frame.theme;
        self.status = frame.status.clone();
        self.elements = match frame.status {
            PageStatus::Placeholder => Vec::new(),
            PageStatus::Failed(message) => vec![PreviewElement::Error(message.clone())],
            PageStatus::Rendered(_) => self.renderer.render(frame.markdown),
        };
    }

    fn set_document_dir(&mut self, dir: Option<&Path>) {
        self.renderer.base_dir = dir.map(Path::to_path_buf);
    }
}

/// A block of the rendered document
#[derive(Debug, Clone, PartialEq)]
pub enum PreviewElement {
    Paragraph(Vec<Span>),
    Heading {
        level: u8,
        content: Vec<Span>,
    },
    CodeBlock {
        language: Option<String>,
        code: String,
    },
    Blockquote(Vec<PreviewElement>),
    /// Ordered when `start` is set
    List {
        start: Option<u64>,
        items: Vec<ListItem>,
    },
    Table {
        alignments: Vec<TableAlignment>,
        header: Vec<Vec<Span>>,
        rows: Vec<Vec<Vec<Span>>>,
    },
    Rule,
    Image {
        alt: String,
        url: String,
        title: Option<String>,
    },
    /// Raw HTML block, shown as source
    Html(String),
    FootnoteDefinition {
        label: String,
        content: Vec<PreviewElement>,
    },
    /// Conversion failed; shown instead of the document
    Error(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListItem {
    /// `Some(checked)` for task list items
    pub task: Option<bool>,
    pub content: Vec<PreviewElement>,
}

/// Table column alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableAlignment {
    #[default]
    None,
    Left,
    Center,
    Right,
}

/// A run of text sharing one style
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Span {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
    pub strikethrough: bool,
    pub code: bool,
    pub link: Option<String>,
}

impl Span {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }
}

/// Where an image link points
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    Local(PathBuf),
    Remote(String),
}

#[derive(Debug, Clone, Default)]
struct InlineStyle {
    bold: bool,
    italic: bool,
    strikethrough: bool,
    link: Option<String>,
    buffer: Vec<Span>,
}

impl InlineStyle {
    fn push_text(&mut self, text: &str, code: bool) {
        if text.is_empty() {
            return;
        }
        self.buffer.push(Span {
            text: text.to_string(),
            bold: self.bold,
            italic: self.italic,
            strikethrough: self.strikethrough,
            code,
            link: self.link.clone(),
        });
    }

    fn take(&mut self) -> Vec<Span> {
        std::mem::take(&mut self.buffer)
    }
}

#[derive(Debug)]
enum Builder {
    Paragraph {
        parts: Vec<PreviewElement>,
        spans: Vec<Span>,
    },
    Heading {
        level: u8,
        content: Vec<Span>,
    },
    Blockquote(Vec<PreviewElement>),
    CodeBlock {
        language: Option<String>,
        code: String,
    },
    List {
        start: Option<u64>,
        items: Vec<ListItem>,
    },
    Item {
        task: Option<bool>,
        content: Vec<PreviewElement>,
    },
    Table {
        alignments: Vec<TableAlignment>,
        header: Vec<Vec<Span>>,
        rows: Vec<Vec<Vec<Span>>>,
    },
    Row(Vec<Vec<Span>>),
    Cell(Vec<Span>),
    Image {
        url: String,
        title: Option<String>,
        alt: String,
    },
    Footnote {
        label: String,
        content: Vec<PreviewElement>,
    },
}

impl Builder {
    fn is_inline_container(&self) -> bool {
        matches!(
            self,
            Builder::Paragraph { .. }
                | Builder::Heading { .. }
                | Builder::CodeBlock { .. }
                | Builder::Cell(_)
                | Builder::Image { .. }
        )
    }

    fn add_spans(&mut self, spans: Vec<Span>) {
        match self {
            Builder::Paragraph { spans: own, .. } => own.extend(spans),
            Builder::Heading { content, .. } | Builder::Cell(content) => content.extend(spans),
            Builder::CodeBlock { code, .. } => spans.iter().for_each(|s| code.push_str(&s.text)),
            Builder::Image { alt, .. } => spans.iter().for_each(|s| alt.push_str(&s.text)),
            Builder::Blockquote(children)
            | Builder::Item {
                content: children, ..
            }
            | Builder::Footnote {
                content: children, ..
            } => children.push(PreviewElement::Paragraph(spans)),
            Builder::List { .. } | Builder::Table { .. } | Builder::Row(_) => {}
        }
    }

    fn add_child(&mut self, element: PreviewElement) {
        match self {
            Builder::Paragraph { parts, spans } => {
                if !spans.is_empty() {
                    parts.push(PreviewElement::Paragraph(std::mem::take(spans)));
                }
                parts.push(element);
            }
            Builder::Blockquote(children)
            | Builder::Item {
                content: children, ..
            }
            | Builder::Footnote {
                content: children, ..
            } => children.push(element),
            Builder::Heading { content, .. } | Builder::Cell(content) => {
                if let PreviewElement::Image { alt, .. } = element {
                    content.push(Span::plain(alt));
                }
            }
            _ => {}
        }
    }
}

/// Builds [`PreviewElement`] trees from markdown
#[derive(Debug, Clone)]
pub struct PreviewRenderer {
    options: Options,
    base_dir: Option<PathBuf>,
}

impl PreviewRenderer {
    pub fn new() -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);
        options.insert(Options::ENABLE_SMART_PUNCTUATION);

        Self {
            options,
            base_dir: None,
        }
    }

    pub fn with_base_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.base_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Parse markdown into preview elements
    pub fn render(&self, markdown: &str) -> Vec<PreviewElement> {
        let mut elements = Vec::new();
        let mut style = InlineStyle::default();
        let mut stack: Vec<Builder> = Vec::new();

        for event in Parser::new_ext(markdown, self.options) {
            match event {
                Event::Start(tag) => self.start(tag, &mut style, &mut stack, &mut elements),
                Event::End(tag) => {
                    for element in self.end(tag, &mut style, &mut stack) {
                        emit(element, &mut stack, &mut elements);
                    }
                }
                Event::Text(text) => style.push_text(&text, false),
                Event::Code(code) => style.push_text(&code, true),
                // Line breaks inside paragraphs are kept, as in the HTML page
                Event::SoftBreak | Event::HardBreak => style.push_text("\n", false),
                Event::Rule => {
                    flush(&mut style, &mut stack, &mut elements);
                    emit(PreviewElement::Rule, &mut stack, &mut elements);
                }
                Event::Html(html) => {
                    if stack.last().map_or(false, Builder::is_inline_container) {
                        style.push_text(&html, true);
                    } else {
                        flush(&mut style, &mut stack, &mut elements);
                        emit(PreviewElement::Html(html.to_string()), &mut stack, &mut elements);
                    }
                }
                Event::FootnoteReference(label) => style.push_text(&format!("[{}]", label), false),
                Event::TaskListMarker(checked) => {
                    let item = stack.iter_mut().rev().find_map(|b| match b {
                        Builder::Item { task, .. } => Some(task),
                        _ => None,
                    });
                    if let Some(task) = item {
                        *task = Some(checked);
                    }
                }
            }
        }

        flush(&mut style, &mut stack, &mut elements);
        elements
    }

    fn start(
        &self,
        tag: Tag<'_>,
        style: &mut InlineStyle,
        stack: &mut Vec<Builder>,
        elements: &mut Vec<PreviewElement>,
    ) {
        let builder = match tag {
            Tag::Emphasis => {
                style.italic = true;
                return;
            }
            Tag::Strong => {
                style.bold = true;
                return;
            }
            Tag::Strikethrough => {
                style.strikethrough = true;
                return;
            }
            Tag::Link(_, url, _) => {
                style.link = Some(url.to_string());
                return;
            }
            Tag::Paragraph => Builder::Paragraph {
                parts: Vec::new(),
                spans: Vec::new(),
            },
            Tag::Heading(level, _, _) => Builder::Heading {
                level: heading_level(level),
                content: Vec::new(),
            },
            Tag::BlockQuote => Builder::Blockquote(Vec::new()),
            Tag::CodeBlock(kind) => Builder::CodeBlock {
                language: match kind {
                    CodeBlockKind::Fenced(lang) if !lang.is_empty() => Some(lang.to_string()),
                    _ => None,
                },
                code: String::new(),
            },
            Tag::List(start) => Builder::List {
                start,
                items: Vec::new(),
            },
            Tag::Item => Builder::Item {
                task: None,
                content: Vec::new(),
            },
            Tag::Table(alignments) => Builder::Table {
                alignments: alignments
                    .iter()
                    .map(|a| match a {
                        pulldown_cmark::Alignment::None => TableAlignment::None,
                        pulldown_cmark::Alignment::Left => TableAlignment::Left,
                        pulldown_cmark::Alignment::Center => TableAlignment::Center,
                        pulldown_cmark::Alignment::Right => TableAlignment::Right,
                    })
                    .collect(),
                header: Vec::new(),
                rows: Vec::new(),
            },
            Tag::TableHead | Tag::TableRow => Builder::Row(Vec::new()),
            Tag::TableCell => Builder::Cell(Vec::new()),
            Tag::Image(_, url, title) => Builder::Image {
                url: url.to_string(),
                title: (!title.is_empty()).then(|| title.to_string()),
                alt: String::new(),
            },
            Tag::FootnoteDefinition(label) => Builder::Footnote {
                label: label.to_string(),
                content: Vec::new(),
            },
        };

        flush(style, stack, elements);
        stack.push(builder);
    }

    fn end(
        &self,
        tag: Tag<'_>,
        style: &mut InlineStyle,
        stack: &mut Vec<Builder>,
    ) -> Vec<PreviewElement> {
        match tag {
            Tag::Emphasis => style.italic = false,
            Tag::Strong => style.bold = false,
            Tag::Strikethrough => style.strikethrough = false,
            Tag::Link(..) => style.link = None,
            _ => {
                let spans = style.take();
                if let Some(top) = stack.last_mut() {
                    if !spans.is_empty() {
                        top.add_spans(spans);
                    }
                }
                return match stack.pop() {
                    Some(builder) => self.finish(builder, stack),
                    None => Vec::new(),
                };
            }
        }
        Vec::new()
    }

    fn finish(&self, builder: Builder, stack: &mut [Builder]) -> Vec<PreviewElement> {
        match builder {
            Builder::Paragraph { mut parts, spans } => {
                if !spans.is_empty() {
                    parts.push(PreviewElement::Paragraph(spans));
                }
                parts
            }
            Builder::Heading { level, content } => vec![PreviewElement::Heading { level, content }],
            Builder::Blockquote(children) => vec![PreviewElement::Blockquote(children)],
            Builder::CodeBlock { language, code } => vec![PreviewElement::CodeBlock { language, code }],
            Builder::List { start, items } => vec![PreviewElement::List { start, items }],
            Builder::Item { task, content } => {
                if let Some(Builder::List { items, .. }) = stack.last_mut() {
                    items.push(ListItem { task, content });
                }
                Vec::new()
            }
            Builder::Table {
                alignments,
                header,
                rows,
            } => vec![PreviewElement::Table {
                alignments,
                header,
                rows,
            }],
            Builder::Row(cells) => {
                if let Some(Builder::Table { header, rows, .. }) = stack.last_mut() {
                    if header.is_empty() && rows.is_empty() {
                        *header = cells;
                    } else {
                        rows.push(cells);
                    }
                }
                Vec::new()
            }
            Builder::Cell(content) => {
                if let Some(Builder::Row(cells)) = stack.last_mut() {
                    cells.push(content);
                }
                Vec::new()
            }
            Builder::Image { url, title, alt } => vec![PreviewElement::Image { alt, url, title }],
            Builder::Footnote { label, content } => {
                vec![PreviewElement::FootnoteDefinition { label, content }]
            }
        }
    }

    /// Resolve an image URL against the base directory
    pub fn resolve_image(&self, url: &str) -> ImageSource {
        if url.starts_with("http://") || url.starts_with("https://") || url.starts_with("data:") {
            return ImageSource::Remote(url.to_string());
        }

        if let Some(path) = crate::file_handler::drop::file_uri_to_path(url) {
            return ImageSource::Local(path);
        }

        let path = PathBuf::from(url);
        if path.is_absolute() {
            return ImageSource::Local(path);
        }

        match &self.base_dir {
            Some(base) => ImageSource::Local(base.join(path)),
            None => ImageSource::Local(path),
        }
    }
}

impl Default for PreviewRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Hand buffered text to the innermost builder before a new block opens
fn flush(style: &mut InlineStyle, stack: &mut [Builder], elements: &mut Vec<PreviewElement>) {
    let spans = style.take();
    if spans.is_empty() {
        return;
    }
    match stack.last_mut() {
        Some(top) => top.add_spans(spans),
        None => elements.push(PreviewElement::Paragraph(spans)),
    }
}

fn emit(element: PreviewElement, stack: &mut [Builder], elements: &mut Vec<PreviewElement>) {
    match stack.last_mut() {
        Some(parent) => parent.add_child(element),
        None => elements.push(element),
    }
}
