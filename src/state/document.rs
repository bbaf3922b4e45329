//! The open document
//!
//! Holds the file path, a copy of the editor text and the modified flag.
//! The editor widget owns the cursor; edits arrive here as whole texts.
//! The flag is set by every edit and cleared by load and save; it is not
//! recomputed by comparing text.

use crate::utils::path::file_name;
use ropey::Rope;
use std::path::{Path, PathBuf};

/// Name shown for a document that has never been saved
pub const UNTITLED: &str = "Untitled";

#[derive(Debug, Clone, Default)]
pub struct Document {
    path: Option<PathBuf>,
    rope: Rope,
    modified: bool,
}

impl Document {
    /// Create an empty, unmodified document
    pub fn new() -> Self {
        Self::default()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Directory of the document, used to build relative links
    pub fn directory(&self) -> Option<&Path> {
        self.path.as_deref().and_then(Path::parent)
    }

    /// File name for titles and dialogs
    pub fn display_name(&self) -> String {
        self.path
            .as_deref()
            .map(file_name)
            .unwrap_or_else(|| UNTITLED.to_string())
    }

    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Replace everything with the loaded file; clears the modified flag
    pub fn load(&mut self, path: impl Into<PathBuf>, text: &str) {
        self.rope = Rope::from_str(&text.replace("\r\n", "\n"));
        self.path = Some(path.into());
        self.modified = false;
    }

    /// Back to an empty untitled document
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Record a successful save to `path`
    pub fn mark_saved(&mut self, path: impl Into<PathBuf>) {
        self.path = Some(path.into());
        self.modified = false;
    }

    /// Mirror the editor widget after an edit; marks the document modified
    pub fn set_text(&mut self, text: &str) {
        self.rope = Rope::from_str(text);
        self.modified = true;
    }
}
