//! State management module for Cosmic MdEdit
//!
//! - `document`: the single open document (path, text, cursor, modified flag)

mod document;

pub use document::*;
