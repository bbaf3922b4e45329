//! Document file I/O
//!
//! Reads and writes UTF-8 text. Loading is strict: bytes that are not valid
//! UTF-8 are reported as an encoding error rather than decoded lossily, so
//! the editor never receives mangled text. Saving writes to a temporary file
//! next to the target and renames it into place.

use crate::error::{FileError, FileResult};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Maximum file size allowed (10 MB)
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// File extensions recognized as markdown documents
pub const MARKDOWN_EXTENSIONS: [&str; 2] = ["md", "markdown"];

const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// Read a file as UTF-8 text
pub fn load_text(path: impl AsRef<Path>) -> FileResult<String> {
    let path = path.as_ref();
    let path_buf = path.to_path_buf();

    let metadata = std::fs::metadata(path).map_err(|e| read_error(&path_buf, e))?;
    if metadata.len() > MAX_FILE_SIZE {
        return Err(FileError::FileTooLarge {
            path: path_buf,
            size: metadata.len(),
            max_size: MAX_FILE_SIZE,
        });
    }

    let bytes = std::fs::read(path).map_err(|e| read_error(&path_buf, e))?;
    decode_utf8(bytes, &path_buf)
}

fn read_error(path: &Path, source: std::io::Error) -> FileError {
    if source.kind() == std::io::ErrorKind::NotFound {
        FileError::NotFound(path.to_path_buf())
    } else {
        FileError::ReadError {
            path: path.to_path_buf(),
            source,
        }
    }
}

fn decode_utf8(mut bytes: Vec<u8>, path: &Path) -> FileResult<String> {
    if bytes.starts_with(&UTF8_BOM) {
        bytes.drain(..UTF8_BOM.len());
    }

    String::from_utf8(bytes).map_err(|_| FileError::EncodingError {
        path: path.to_path_buf(),
    })
}

/// Write text to a file, creating missing parent directories
///
/// The content goes to a uniquely named hidden temporary file in the same
/// directory first and is renamed over the target once fully flushed. The
/// temporary file is removed on every failure path.
pub fn save_text(path: impl AsRef<Path>, content: &str) -> FileResult<()> {
    let path = path.as_ref();
    let write_error = |source: std::io::Error| FileError::WriteError {
        path: path.to_path_buf(),
        source,
    };

    ensure_parent_dir(path)?;

    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let mut temp = tempfile::Builder::new()
        .prefix(".")
        .suffix(".tmp")
        .tempfile_in(parent)
        .map_err(write_error)?;

    temp.write_all(content.as_bytes()).map_err(write_error)?;
    temp.flush().map_err(write_error)?;
    temp.as_file().sync_all().map_err(write_error)?;
    temp.persist(path).map_err(|e| write_error(e.error))?;

    log::debug!("Wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}

/// Ensure parent directory exists
pub fn ensure_parent_dir(path: impl AsRef<Path>) -> FileResult<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent).map_err(|e| FileError::DirectoryError {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
    }
    Ok(())
}

/// Append `.md` unless the path already carries a markdown extension
pub fn with_markdown_extension(path: PathBuf) -> PathBuf {
    if crate::utils::path::is_markdown(&path) {
        return path;
    }
    let mut name = path.as_os_str().to_os_string();
    name.push(".md");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FileErrorKind;

    #[test]
    fn test_load_utf8_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.md");
        std::fs::write(&path, "# Tïtle\n").unwrap();
        assert_eq!(load_text(&path).unwrap(), "# Tïtle\n");
    }

    #[test]
    fn test_load_strips_bom() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bom.md");
        std::fs::write(&path, [0xEF, 0xBB, 0xBF, b'h', b'i']).unwrap();
        assert_eq!(load_text(&path).unwrap(), "hi");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_text(dir.path().join("nope.md")).unwrap_err();
        assert_eq!(err.kind(), FileErrorKind::NotFound);
    }

    #[test]
    fn test_load_invalid_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("latin1.md");
        std::fs::write(&path, [b'c', b'a', b'f', 0xE9, b'\n']).unwrap();
        let err = load_text(&path).unwrap_err();
        assert_eq!(err.kind(), FileErrorKind::Decode);
    }

    #[test]
    fn test_load_directory_is_generic_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_text(dir.path()).unwrap_err();
        assert_eq!(err.kind(), FileErrorKind::Other);
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a").join("b").join("notes.md");
        save_text(&path, "content").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "content");

        let leftovers: Vec<_> = std::fs::read_dir(path.parent().unwrap())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_back_to_back_saves_do_not_collide() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.md");
        for i in 0..50 {
            save_text(&path, &format!("version {}", i)).unwrap();
        }
        assert_eq!(load_text(&path).unwrap(), "version 49");

        let entries = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[test]
    fn test_save_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.md");
        save_text(&path, "first").unwrap();
        save_text(&path, "second").unwrap();
        assert_eq!(load_text(&path).unwrap(), "second");
    }

    #[test]
    fn test_with_markdown_extension() {
        assert_eq!(
            with_markdown_extension(PathBuf::from("/tmp/notes")),
            PathBuf::from("/tmp/notes.md")
        );
        assert_eq!(
            with_markdown_extension(PathBuf::from("/tmp/notes.markdown")),
            PathBuf::from("/tmp/notes.markdown")
        );
        assert_eq!(
            with_markdown_extension(PathBuf::from("/tmp/notes.txt")),
            PathBuf::from("/tmp/notes.txt.md")
        );
    }
}
