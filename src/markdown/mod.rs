//! Markdown module for Cosmic MdEdit
//!
//! Handles everything between the text buffer and the preview:
//! - Conversion to HTML through prioritized renderers
//! - Light and dark page templates
//! - Preview targets and the native element tree
//! - Pasted image files and links
//! - HTML export

pub mod convert;
pub mod export;
pub mod image;
pub mod preview;
pub mod templates;

pub use convert::{
    CmarkRenderer, ConvertError, ConvertResult, Converter, Page, PageStatus, PandocRenderer,
    Rendered, Renderer,
};
pub use image::{ImageError, ImageHandler, ImageResult, SavedImage};
pub use preview::{
    HtmlPreview, ImageSource, ListItem, NativePreview, PreviewElement, PreviewFrame,
    PreviewHandler, PreviewRenderer, PreviewTarget, Span, TableAlignment,
};
