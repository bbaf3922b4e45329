//! Error types for Cosmic MdEdit
//!
//! Errors are organized by category. None of them end the session; the
//! window reports them as modal dialogs. Conversion failures never get
//! here, they become the preview's error page instead.

use crate::markdown::image::ImageError;
use std::path::PathBuf;
use thiserror::Error;

/// Main application error type encompassing all error categories
#[derive(Error, Debug)]
pub enum AppError {
    /// File I/O related errors
    #[error(transparent)]
    FileIO(#[from] FileError),

    /// Configuration errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Pasted image errors
    #[error(transparent)]
    Image(#[from] ImageError),

    /// Clipboard errors
    #[error(transparent)]
    Clipboard(#[from] ClipboardError),
}

impl AppError {
    /// Title for the dialog that reports this error
    pub fn dialog_title(&self) -> &'static str {
        match self {
            AppError::FileIO(e) => e.kind().dialog_title(),
            AppError::Config(_) => "Settings Error",
            AppError::Image(_) => "Save Image Error",
            AppError::Clipboard(_) => "Clipboard Error",
        }
    }

    /// Body text for the dialog that reports this error
    pub fn user_message(&self) -> String {
        match self {
            AppError::FileIO(e) => e.user_message(),
            AppError::Image(e) => format!("Could not save image:\n{}", e),
            AppError::Clipboard(e) => e.user_message(),
            AppError::Config(e) => e.to_string(),
        }
    }
}

/// Coarse classification of file errors, one dialog per kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileErrorKind {
    NotFound,
    Decode,
    Other,
}

impl FileErrorKind {
    pub fn dialog_title(&self) -> &'static str {
        match self {
            FileErrorKind::NotFound => "File Not Found",
            FileErrorKind::Decode => "Encoding Error",
            FileErrorKind::Other => "Error",
        }
    }
}

/// File I/O related errors
#[derive(Error, Debug)]
pub enum FileError {
    /// File not found at specified path
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// File is too large to open
    #[error("File too large: {path} ({size} bytes, max {max_size} bytes)")]
    FileTooLarge {
        path: PathBuf,
        size: u64,
        max_size: u64,
    },

    /// File content is not valid UTF-8
    #[error("Unable to decode file as UTF-8: {path}")]
    EncodingError { path: PathBuf },

    /// Error reading file
    #[error("Could not read file: {path}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error writing file
    #[error("Could not save file: {path}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Parent directory could not be created
    #[error("Directory error: {path}")]
    DirectoryError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FileError {
    pub fn kind(&self) -> FileErrorKind {
        match self {
            FileError::NotFound(_) => FileErrorKind::NotFound,
            FileError::EncodingError { .. } => FileErrorKind::Decode,
            _ => FileErrorKind::Other,
        }
    }

    /// Create a user-friendly error message suitable for display in dialogs
    pub fn user_message(&self) -> String {
        match self {
            FileError::NotFound(path) => {
                format!("The file '{}' could not be found.", path.display())
            }
            FileError::EncodingError { path } => format!(
                "The file '{}' could not be decoded with UTF-8 encoding.",
                path.display()
            ),
            FileError::FileTooLarge { max_size, .. } => format!(
                "An error occurred while opening the file: it is larger than {} MB.",
                max_size / (1024 * 1024)
            ),
            FileError::ReadError { source, .. } => {
                format!("An error occurred while opening the file: {}", source)
            }
            FileError::WriteError { source, .. } | FileError::DirectoryError { source, .. } => {
                format!("An error occurred while saving the file: {}", source)
            }
        }
    }
}

/// Configuration related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Error loading configuration file
    #[error("Could not load configuration: {0}")]
    LoadError(String),

    /// Error saving configuration
    #[error("Could not save configuration: {0}")]
    SaveError(String),

    /// Error parsing configuration
    #[error("Invalid configuration format: {0}")]
    ParseError(String),

    /// Configuration directory error
    #[error("Could not access configuration directory")]
    DirectoryError,
}

/// Clipboard related errors
#[derive(Error, Debug, Clone)]
pub enum ClipboardError {
    /// Could not access clipboard
    #[error("Could not access clipboard: {0}")]
    AccessError(String),

    /// Clipboard is empty
    #[error("Clipboard is empty")]
    Empty,

    /// Error setting clipboard content
    #[error("Could not write to clipboard: {0}")]
    WriteError(String),
}

impl ClipboardError {
    /// Create a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            ClipboardError::AccessError(_) => {
                "Could not access the clipboard. Another application may be using it.".to_string()
            }
            ClipboardError::Empty => "The clipboard is empty.".to_string(),
            _ => self.to_string(),
        }
    }
}

/// Result type alias for operations that can fail with AppError
pub type AppResult<T> = Result<T, AppError>;

/// Result type alias for file operations
pub type FileResult<T> = Result<T, FileError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_error_display() {
        let err = FileError::NotFound(PathBuf::from("/test/file.md"));
        assert!(err.to_string().contains("/test/file.md"));
    }

    #[test]
    fn test_file_error_kinds() {
        assert_eq!(
            FileError::NotFound(PathBuf::from("a.md")).kind(),
            FileErrorKind::NotFound
        );
        assert_eq!(
            FileError::EncodingError { path: PathBuf::from("a.md") }.kind(),
            FileErrorKind::Decode
        );
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = FileError::ReadError { path: PathBuf::from("a.md"), source: io };
        assert_eq!(err.kind(), FileErrorKind::Other);
        assert!(err.user_message().contains("denied"));
    }

    #[test]
    fn test_app_error_dialog_title() {
        let app_err: AppError = FileError::EncodingError { path: PathBuf::from("x.md") }.into();
        assert!(matches!(app_err, AppError::FileIO(_)));
        assert_eq!(app_err.dialog_title(), "Encoding Error");
        assert!(app_err.user_message().contains("UTF-8"));
    }
}
