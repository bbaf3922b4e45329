//! File handler module for Cosmic MdEdit
//!
//! Handles all file system operations:
//! - Reading UTF-8 documents with typed decode errors
//! - Saving with parent-directory creation and atomic rename
//! - Validating drag-and-drop payloads

pub mod drop;
pub mod io;

pub use drop::{accepts, markdown_paths, DropItem};
pub use io::*;
