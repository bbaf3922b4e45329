//! Editor module for Cosmic MdEdit
//!
//! Editing support that lives outside the text widget:
//! - Clipboard reads that tell pasted images from text
//! - Toolbar formatting insertions

pub mod clipboard;
pub mod format;

pub use clipboard::{ClipboardContent, ClipboardImage, ClipboardManager};
pub use format::{FormatAction, Insertion};
