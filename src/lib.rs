//! Cosmic MdEdit - a split-pane Markdown editor with live preview
//!
//! The library holds everything that does not need a window: the document,
//! conversion to HTML, the preview pipeline, pasted image handling, themes
//! and settings. The desktop shell in the binary drives it through
//! [`controller::EditorController`].

pub mod config;
pub mod controller;
pub mod editor;
pub mod error;
pub mod file_handler;
pub mod markdown;
pub mod state;
pub mod theme;
pub mod utils;

pub use config::Config;
pub use controller::{EditorController, EventLog, WindowEvent, WindowListener};
pub use error::{AppError, AppResult};
